//! Digital-maturity assessment: question graph traversal, scoring and the
//! assessment lifecycle.
//!
//! Catalogs are built once through [`Catalogs::initialize`] and shared behind an
//! `Arc`; the engines are pure over them. [`AssessmentService`] composes the
//! engines with a repository and is what the HTTP router drives.

pub mod catalog;
pub mod domain;
pub mod error;
pub mod hooks;
pub mod progress;
pub mod questions;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod state;
pub mod traversal;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogConfig, Catalogs, Dimension, DimensionCatalog, MaturityProfile, Pillar,
    DIMENSION_COUNT, MAX_DIMENSION_SCORE, MAX_PILLAR_SCORE, PILLARS_PER_DIMENSION,
};
pub use domain::{
    AssessmentId, AssessmentStatus, CompanyInfo, DimensionId, OptionId, PillarId, QuestionId,
    ScoreLevel,
};
pub use error::{AssessmentError, CatalogError};
pub use hooks::{AnswerHook, CompanyProfileHook};
pub use progress::{DimensionProgress, DimensionStatus, ProgressSnapshot, ProgressTracker, TimeEstimate};
pub use questions::{AnswerOption, PillarRef, Question, QuestionBank, QuestionKind, QuestionView};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{AssessmentResult, DimensionScore, PillarScore, ScoringEngine};
pub use service::{
    AnswerOutcome, AssessmentService, AssessmentServiceError, ErrorClass, QuestionFilter,
    QuestionListing, Recalculation,
};
pub use state::{Assessment, Response};
pub use traversal::{NextStep, TraversalEngine};
