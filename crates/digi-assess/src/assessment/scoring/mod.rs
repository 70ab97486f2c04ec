mod analysis;
mod result;
mod rules;

pub use result::{
    ActionPriority, AssessmentResult, DimensionChange, DimensionGap, DimensionHighlight,
    DimensionRanking, DimensionScore, PillarScore, PriorityAction, ResultComparison,
    ResultSummary, ScoreDistribution, Trend, CRITICAL_THRESHOLD,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::catalog::Catalogs;
use super::domain::AssessmentId;
use super::error::AssessmentError;
use super::state::{Assessment, Response};

/// Stateless scorer over the shared catalogs.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalogs: Arc<Catalogs>,
}

impl ScoringEngine {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }

    pub fn calculate_scores(
        &self,
        assessment: &Assessment,
        at: DateTime<Utc>,
    ) -> Result<AssessmentResult, AssessmentError> {
        self.score_responses(&assessment.id, &assessment.responses, at)
    }

    /// Scores a response list against every catalog dimension; unanswered dimensions count as 0%.
    pub fn score_responses(
        &self,
        assessment_id: &AssessmentId,
        responses: &[Response],
        at: DateTime<Utc>,
    ) -> Result<AssessmentResult, AssessmentError> {
        let dimension_scores: Vec<DimensionScore> = self
            .catalogs
            .dimensions
            .dimensions()
            .iter()
            .map(|dimension| rules::dimension_score(dimension, responses))
            .collect();

        let global_score = rules::global_score(&dimension_scores);
        let maturity_profile = self.catalogs.dimensions.profile_for(global_score)?.clone();
        let analysis::Analysis {
            strengths,
            gaps,
            priority_actions,
        } = analysis::analyze(&dimension_scores);

        debug!(
            assessment_id = %assessment_id,
            global_score,
            profile = %maturity_profile.id,
            "scores calculated"
        );

        Ok(AssessmentResult {
            assessment_id: assessment_id.clone(),
            global_score,
            maturity_profile,
            dimension_scores,
            strengths,
            gaps,
            priority_actions,
            calculated_at: at,
        })
    }

    /// `round(sum / (scored × 9) × 100)`; 0 without scored responses.
    pub fn progress_score(responses: &[Response]) -> u32 {
        rules::progress_score(responses)
    }
}
