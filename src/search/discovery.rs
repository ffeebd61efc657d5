//! Project recommendations for the member dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::strategy::{Bonus, BonusRules, ScoringStrategy};
use crate::error::AppError;
use crate::models::project::Project;

/// Number of projects shown in the "recommended for you" panel.
pub const DEFAULT_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub project_id: String,
    pub title: String,
    pub score: f64,
    pub reasons: Vec<Bonus>,
}

/// Rank projects with the additive model and keep the best `limit`.
///
/// Ties keep collection order.
pub fn recommend_projects(
    projects: &[Project],
    rules: &BonusRules,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Vec<Recommendation>, AppError> {
    let strategy = ScoringStrategy::AdditiveBonus(rules.clone());
    strategy.validate()?;

    let mut ranked: Vec<Recommendation> = projects
        .iter()
        .map(|project| {
            let scored = strategy.score(project, "", now);
            Recommendation {
                project_id: project.id.clone(),
                title: project.title.clone(),
                score: scored.score,
                reasons: scored.bonuses,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    Ok(ranked)
}
