use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::catalog::MaturityProfile;
use crate::assessment::domain::{AssessmentId, DimensionId, PillarId, ScoreLevel};

/// Dimensions under this percentage are reported as critical.
pub const CRITICAL_THRESHOLD: u32 = 40;
/// Global score swing (in points) beyond which a comparison reports a trend.
pub const TREND_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar_id: PillarId,
    pub pillar_name: String,
    /// Capped at `max_points`.
    pub points: u32,
    pub max_points: u32,
    pub percentage: u32,
    pub response_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub description: String,
    pub total_points: u32,
    pub max_points: u32,
    pub percentage: u32,
    pub pillar_scores: Vec<PillarScore>,
}

impl DimensionScore {
    pub fn level(&self) -> ScoreLevel {
        ScoreLevel::for_percentage(self.percentage)
    }

    /// Lowest pillar percentage; ties resolve to the first declared pillar.
    pub fn weakest_pillar(&self) -> Option<&PillarScore> {
        self.pillar_scores.iter().fold(None, |weakest, pillar| match weakest {
            Some(current) if current.percentage <= pillar.percentage => Some(current),
            _ => Some(pillar),
        })
    }

    /// Highest pillar percentage; ties resolve to the first declared pillar.
    pub fn strongest_pillar(&self) -> Option<&PillarScore> {
        self.pillar_scores.iter().fold(None, |strongest, pillar| match strongest {
            Some(current) if current.percentage >= pillar.percentage => Some(current),
            _ => Some(pillar),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRanking {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub percentage: u32,
    pub level: ScoreLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionGap {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub percentage: u32,
    pub level: ScoreLevel,
    pub improvement_potential: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

impl ActionPriority {
    /// Priority of a gap dimension from its percentage.
    pub const fn for_gap(percentage: u32) -> Self {
        if percentage < 25 {
            Self::High
        } else if percentage < 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityAction {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub pillar_id: PillarId,
    pub pillar_name: String,
    /// Percentage of the weakest pillar.
    pub current_score: u32,
    pub priority: ActionPriority,
}

/// Immutable scoring snapshot of a completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub assessment_id: AssessmentId,
    pub global_score: u32,
    pub maturity_profile: MaturityProfile,
    pub dimension_scores: Vec<DimensionScore>,
    pub strengths: Vec<DimensionRanking>,
    pub gaps: Vec<DimensionGap>,
    pub priority_actions: Vec<PriorityAction>,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub moderate: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionHighlight {
    pub dimension_id: DimensionId,
    pub name: String,
    pub score: u32,
    pub potential: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub assessment_id: AssessmentId,
    pub global_score: u32,
    pub overall_level: ScoreLevel,
    pub profile_id: String,
    pub profile_name: String,
    pub profile_color: String,
    pub average_dimension_score: u32,
    pub distribution: ScoreDistribution,
    pub top_dimensions: Vec<DimensionHighlight>,
    pub areas_for_improvement: Vec<DimensionHighlight>,
    pub critical_count: usize,
    pub recommendations: Vec<String>,
    pub priority_actions_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionChange {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub previous_score: u32,
    pub current_score: u32,
    pub change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultComparison {
    pub global_score_change: i64,
    pub profile_changed: bool,
    pub dimension_changes: Vec<DimensionChange>,
    pub trend: Trend,
}

impl AssessmentResult {
    pub fn dimension_score(&self, id: &DimensionId) -> Option<&DimensionScore> {
        self.dimension_scores
            .iter()
            .find(|score| &score.dimension_id == id)
    }

    pub fn overall_level(&self) -> ScoreLevel {
        ScoreLevel::for_percentage(self.global_score)
    }

    pub fn improvement_potential(&self) -> u32 {
        100u32.saturating_sub(self.global_score)
    }

    pub fn average_dimension_score(&self) -> u32 {
        if self.dimension_scores.is_empty() {
            return 0;
        }
        let sum: u32 = self.dimension_scores.iter().map(|score| score.percentage).sum();
        (f64::from(sum) / self.dimension_scores.len() as f64).round() as u32
    }

    pub fn distribution(&self) -> ScoreDistribution {
        let mut distribution = ScoreDistribution {
            excellent: 0,
            good: 0,
            moderate: 0,
            low: 0,
        };
        for score in &self.dimension_scores {
            match score.level() {
                ScoreLevel::Excellent => distribution.excellent += 1,
                ScoreLevel::Good => distribution.good += 1,
                ScoreLevel::Moderate => distribution.moderate += 1,
                ScoreLevel::Low => distribution.low += 1,
            }
        }
        distribution
    }

    pub fn critical_dimensions(&self) -> Vec<&DimensionScore> {
        self.dimension_scores
            .iter()
            .filter(|score| score.percentage < CRITICAL_THRESHOLD)
            .collect()
    }

    pub fn high_priority_actions(&self) -> Vec<&PriorityAction> {
        self.priority_actions
            .iter()
            .filter(|action| action.priority == ActionPriority::High)
            .collect()
    }

    /// Dimensions sorted by percentage, highest first; equal scores keep catalog order.
    pub fn top_dimensions(&self, count: usize) -> Vec<&DimensionScore> {
        let mut sorted: Vec<&DimensionScore> = self.dimension_scores.iter().collect();
        sorted.sort_by(|a, b| b.percentage.cmp(&a.percentage));
        sorted.truncate(count);
        sorted
    }

    /// Dimensions sorted by percentage, lowest first; equal scores keep catalog order.
    pub fn lowest_dimensions(&self, count: usize) -> Vec<&DimensionScore> {
        let mut sorted: Vec<&DimensionScore> = self.dimension_scores.iter().collect();
        sorted.sort_by(|a, b| a.percentage.cmp(&b.percentage));
        sorted.truncate(count);
        sorted
    }

    pub fn summary(&self) -> ResultSummary {
        let highlight = |score: &&DimensionScore| DimensionHighlight {
            dimension_id: score.dimension_id.clone(),
            name: score.dimension_name.clone(),
            score: score.percentage,
            potential: 100u32.saturating_sub(score.percentage),
        };

        ResultSummary {
            assessment_id: self.assessment_id.clone(),
            global_score: self.global_score,
            overall_level: self.overall_level(),
            profile_id: self.maturity_profile.id.clone(),
            profile_name: self.maturity_profile.name.clone(),
            profile_color: self.maturity_profile.color.clone(),
            average_dimension_score: self.average_dimension_score(),
            distribution: self.distribution(),
            top_dimensions: self.top_dimensions(3).iter().map(highlight).collect(),
            areas_for_improvement: self.lowest_dimensions(3).iter().map(highlight).collect(),
            critical_count: self.critical_dimensions().len(),
            recommendations: self.maturity_profile.recommendations.clone(),
            priority_actions_count: self.priority_actions.len(),
        }
    }

    pub fn compare_with(&self, previous: &AssessmentResult) -> ResultComparison {
        let global_score_change = i64::from(self.global_score) - i64::from(previous.global_score);

        let dimension_changes = self
            .dimension_scores
            .iter()
            .filter_map(|current| {
                previous
                    .dimension_score(&current.dimension_id)
                    .map(|before| DimensionChange {
                        dimension_id: current.dimension_id.clone(),
                        dimension_name: current.dimension_name.clone(),
                        previous_score: before.percentage,
                        current_score: current.percentage,
                        change: i64::from(current.percentage) - i64::from(before.percentage),
                    })
            })
            .collect();

        let trend = if global_score_change > TREND_THRESHOLD {
            Trend::Improving
        } else if global_score_change < -TREND_THRESHOLD {
            Trend::Declining
        } else {
            Trend::Stable
        };

        ResultComparison {
            global_score_change,
            profile_changed: self.maturity_profile.id != previous.maturity_profile.id,
            dimension_changes,
            trend,
        }
    }
}
