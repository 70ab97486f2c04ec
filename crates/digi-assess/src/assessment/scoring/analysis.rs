use crate::assessment::domain::ScoreLevel;

use super::result::{
    ActionPriority, DimensionGap, DimensionRanking, DimensionScore, PriorityAction,
};

const STRENGTH_COUNT: usize = 2;
const GAP_COUNT: usize = 2;

pub(super) struct Analysis {
    pub strengths: Vec<DimensionRanking>,
    pub gaps: Vec<DimensionGap>,
    pub priority_actions: Vec<PriorityAction>,
}

/// Ranks dimensions (stable, descending) and derives strengths, gaps and actions.
pub(super) fn analyze(dimension_scores: &[DimensionScore]) -> Analysis {
    let mut sorted: Vec<&DimensionScore> = dimension_scores.iter().collect();
    sorted.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    let strengths = sorted
        .iter()
        .take(STRENGTH_COUNT)
        .map(|score| DimensionRanking {
            dimension_id: score.dimension_id.clone(),
            dimension_name: score.dimension_name.clone(),
            percentage: score.percentage,
            level: ScoreLevel::for_percentage(score.percentage),
        })
        .collect();

    let bottom = &sorted[sorted.len().saturating_sub(GAP_COUNT)..];
    let gaps = bottom
        .iter()
        .map(|score| DimensionGap {
            dimension_id: score.dimension_id.clone(),
            dimension_name: score.dimension_name.clone(),
            percentage: score.percentage,
            level: ScoreLevel::for_percentage(score.percentage),
            improvement_potential: 100u32.saturating_sub(score.percentage),
        })
        .collect();

    let priority_actions = bottom.iter().filter_map(|score| priority_action(score)).collect();

    Analysis {
        strengths,
        gaps,
        priority_actions,
    }
}

fn priority_action(score: &DimensionScore) -> Option<PriorityAction> {
    let weakest = score.weakest_pillar()?;
    Some(PriorityAction {
        dimension_id: score.dimension_id.clone(),
        dimension_name: score.dimension_name.clone(),
        pillar_id: weakest.pillar_id.clone(),
        pillar_name: weakest.pillar_name.clone(),
        current_score: weakest.percentage,
        priority: ActionPriority::for_gap(score.percentage),
    })
}
