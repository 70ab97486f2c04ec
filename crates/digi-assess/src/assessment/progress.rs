//! Progress reporting for assessments that are still being answered.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use super::catalog::{Catalogs, Dimension};
use super::domain::{percentage, AssessmentStatus, DimensionId, OptionId, PillarId, QuestionId};
use super::scoring::ScoringEngine;
use super::state::{Assessment, ResponseLevel};

pub const SECONDS_PER_QUESTION: u32 = 20;
pub const MILESTONES: [u32; 4] = [25, 50, 75, 100];
const MILESTONE_WINDOW: u32 = 5;
const LOW_AVERAGE_SCORE: f64 = 4.0;
const RECENT_SCORE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionProgress {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub progress: u32,
    pub questions_answered: usize,
    pub status: DimensionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeEstimate {
    pub questions_remaining: usize,
    pub estimated_minutes: u32,
    pub percent_complete: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub milestone: u32,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InProgressRecommendation {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub step: usize,
    pub question_id: QuestionId,
    pub answer_id: OptionId,
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<ResponseLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_percentage: Option<u32>,
    pub dimension: Option<DimensionId>,
    pub pillar: Option<PillarId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentScore {
    pub dimension: Option<DimensionId>,
    pub pillar: Option<PillarId>,
    pub score: u32,
}

/// Everything a client needs to render progress between two questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub status: AssessmentStatus,
    pub questions_answered: usize,
    pub progress_score: u32,
    pub dimension_progress: Vec<DimensionProgress>,
    pub estimated_time_remaining: TimeEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<InProgressRecommendation>,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    catalogs: Arc<Catalogs>,
}

impl ProgressTracker {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }

    pub fn snapshot(&self, assessment: &Assessment) -> ProgressSnapshot {
        let estimate = self.estimate_time_remaining(assessment);
        ProgressSnapshot {
            status: assessment.status,
            questions_answered: assessment.responses.len(),
            progress_score: ScoringEngine::progress_score(&assessment.responses),
            dimension_progress: self.dimension_progress(assessment),
            estimated_time_remaining: estimate,
            milestone: self.milestone(assessment),
            recommendations: self.in_progress_recommendations(assessment),
        }
    }

    pub fn dimension_progress(&self, assessment: &Assessment) -> Vec<DimensionProgress> {
        self.catalogs
            .dimensions
            .dimensions()
            .iter()
            .map(|dimension| progress_for(dimension, assessment))
            .collect()
    }

    /// Counts the default path from the current question, so branches answered
    /// off that path do not inflate the estimate.
    pub fn estimate_time_remaining(&self, assessment: &Assessment) -> TimeEstimate {
        let answered = assessment.responses.len();
        let remaining = match assessment.status {
            AssessmentStatus::InProgress => self
                .catalogs
                .questions
                .question_flow(&assessment.current_question_id)
                .len(),
            AssessmentStatus::Completed | AssessmentStatus::Abandoned => 0,
        };

        let percent_complete = if assessment.is_completed() {
            100
        } else {
            percentage(answered as u32, (answered + remaining) as u32)
        };

        let seconds = remaining as u32 * SECONDS_PER_QUESTION;
        TimeEstimate {
            questions_remaining: remaining,
            estimated_minutes: (f64::from(seconds) / 60.0).round() as u32,
            percent_complete,
        }
    }

    pub fn milestone(&self, assessment: &Assessment) -> Option<Milestone> {
        milestone_for(self.estimate_time_remaining(assessment).percent_complete)
    }

    /// Flags completed dimensions whose average answer score is below 4.
    pub fn in_progress_recommendations(
        &self,
        assessment: &Assessment,
    ) -> Vec<InProgressRecommendation> {
        self.catalogs
            .dimensions
            .dimensions()
            .iter()
            .filter(|dimension| {
                progress_for(dimension, assessment).status == DimensionStatus::Completed
            })
            .filter_map(|dimension| {
                let responses = assessment.responses_by_dimension(&dimension.id);
                if responses.is_empty() {
                    return None;
                }
                let total: u32 = responses.iter().filter_map(|response| response.score).sum();
                let average = f64::from(total) / responses.len() as f64;
                (average < LOW_AVERAGE_SCORE).then(|| InProgressRecommendation {
                    dimension_id: dimension.id.clone(),
                    dimension_name: dimension.name.clone(),
                    message: format!(
                        "The \"{}\" dimension will need particular attention.",
                        dimension.name
                    ),
                })
            })
            .collect()
    }
}

fn progress_for(dimension: &Dimension, assessment: &Assessment) -> DimensionProgress {
    let responses = assessment.responses_by_dimension(&dimension.id);
    let answered: BTreeSet<&PillarId> = responses
        .iter()
        .filter_map(|response| response.pillar.as_ref())
        .filter(|pillar| dimension.pillar(pillar).is_some())
        .collect();

    let total = dimension.pillars.len();
    let status = match answered.len() {
        0 => DimensionStatus::NotStarted,
        count if count >= total => DimensionStatus::Completed,
        _ => DimensionStatus::InProgress,
    };

    DimensionProgress {
        dimension_id: dimension.id.clone(),
        dimension_name: dimension.name.clone(),
        progress: percentage(answered.len() as u32, total as u32),
        questions_answered: responses.len(),
        status,
    }
}

fn milestone_for(percent_complete: u32) -> Option<Milestone> {
    MILESTONES
        .into_iter()
        .find(|&mark| percent_complete >= mark && percent_complete < mark + MILESTONE_WINDOW)
        .map(|mark| Milestone {
            milestone: mark,
            message: milestone_message(mark),
        })
}

fn milestone_message(mark: u32) -> &'static str {
    match mark {
        25 => "Great start! You have completed 25% of the assessment.",
        50 => "Well done! You are halfway through.",
        75 => "Almost there! Only a few questions left.",
        _ => "Congratulations! The assessment is complete.",
    }
}

/// Ordered trace of every recorded answer.
pub fn question_path(assessment: &Assessment) -> Vec<PathStep> {
    assessment
        .responses
        .iter()
        .enumerate()
        .map(|(index, response)| PathStep {
            step: index + 1,
            question_id: response.question_id.clone(),
            answer_id: response.answer_id.clone(),
            score: response.score,
            level: response.score_level(),
            score_percentage: response.score_percentage(),
            dimension: response.dimension.clone(),
            pillar: response.pillar.clone(),
        })
        .collect()
}

/// The last three scored answers, oldest first.
pub fn recent_scores(assessment: &Assessment) -> Vec<RecentScore> {
    let scored: Vec<RecentScore> = assessment
        .responses
        .iter()
        .filter_map(|response| {
            response.score.map(|score| RecentScore {
                dimension: response.dimension.clone(),
                pillar: response.pillar.clone(),
                score,
            })
        })
        .collect();
    let skip = scored.len().saturating_sub(RECENT_SCORE_COUNT);
    scored.into_iter().skip(skip).collect()
}
