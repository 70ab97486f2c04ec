use crate::assessment::catalog::{Dimension, Pillar, MAX_PILLAR_SCORE};
use crate::assessment::domain::{percentage, DimensionId};
use crate::assessment::state::Response;

use super::result::{DimensionScore, PillarScore};

/// Sum of the scored responses tagged with the pillar, capped at its maximum.
pub(super) fn pillar_score(
    dimension: &DimensionId,
    pillar: &Pillar,
    responses: &[Response],
) -> PillarScore {
    let (raw, response_count) = responses
        .iter()
        .filter(|response| {
            response.dimension.as_ref() == Some(dimension)
                && response.pillar.as_ref() == Some(&pillar.id)
        })
        .filter_map(|response| response.score)
        .fold((0u32, 0usize), |(sum, count), score| {
            (sum.saturating_add(score), count + 1)
        });

    let points = raw.min(pillar.max_score);
    PillarScore {
        pillar_id: pillar.id.clone(),
        pillar_name: pillar.name.clone(),
        points,
        max_points: pillar.max_score,
        percentage: percentage(points, pillar.max_score),
        response_count,
    }
}

pub(super) fn dimension_score(dimension: &Dimension, responses: &[Response]) -> DimensionScore {
    let pillar_scores: Vec<PillarScore> = dimension
        .pillars
        .iter()
        .map(|pillar| pillar_score(&dimension.id, pillar, responses))
        .collect();

    let total_points = pillar_scores.iter().map(|score| score.points).sum();
    let max_points = dimension.max_points();

    DimensionScore {
        dimension_id: dimension.id.clone(),
        dimension_name: dimension.name.clone(),
        description: dimension.description.clone(),
        total_points,
        max_points,
        percentage: percentage(total_points, max_points),
        pillar_scores,
    }
}

/// Rounded mean of the dimension percentages; 0 for no dimensions.
pub(super) fn global_score(dimension_scores: &[DimensionScore]) -> u32 {
    if dimension_scores.is_empty() {
        return 0;
    }
    let sum: u32 = dimension_scores.iter().map(|score| score.percentage).sum();
    (f64::from(sum) / dimension_scores.len() as f64).round() as u32
}

/// Running score over scored responses, each measured against the pillar maximum.
pub(super) fn progress_score(responses: &[Response]) -> u32 {
    let (total, count) = responses
        .iter()
        .filter_map(|response| response.score)
        .fold((0u32, 0u32), |(sum, count), score| {
            (sum.saturating_add(score), count + 1)
        });
    percentage(total, count.saturating_mul(MAX_PILLAR_SCORE))
}
