//! Adaptive digital-maturity assessment engine.
//!
//! [`assessment`] holds the domain: catalogs, traversal, scoring, the assessment
//! state machine and its HTTP router. [`config`], [`telemetry`] and [`error`] are
//! the application plumbing shared with the API service.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
