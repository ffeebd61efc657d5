//! Scoring strategies shared by search and discovery.
//!
//! `MaxWeightedField` is the "best single signal wins" model used by the
//! search box. `AdditiveBonus` is the points model used to recommend
//! projects. Call sites pick one; the filter pipeline is the same.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Searchable;
use super::relevance::score_field;
use crate::error::AppError;
use crate::models::project::ImpactLevel;

/// What a searchable field represents, which decides its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Title or name.
    Title,
    /// Description, body, bio.
    Body,
    /// Short labels: category, location, position.
    Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub body: f64,
    pub tag: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 1.0,
            body: 0.7,
            tag: 0.5,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, role: FieldRole) -> f64 {
        match role {
            FieldRole::Title => self.title,
            FieldRole::Body => self.body,
            FieldRole::Tag => self.tag,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, w) in [("title", self.title), ("body", self.body), ("tag", self.tag)] {
            if !w.is_finite() || w < 0.0 {
                return Err(AppError::Config(format!(
                    "field weight '{name}' must be a finite non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Record attributes the additive model awards points for.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signals<'a> {
    pub priority: Option<u8>,
    pub impact: Option<ImpactLevel>,
    pub created_at: Option<DateTime<Utc>>,
    pub category: Option<&'a str>,
    pub status: &'a str,
}

/// A bonus that contributed to an additive score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bonus {
    HighPriority,
    HighImpact,
    Recent,
    FeaturedCategory,
    Active,
}

/// Upper bound on `recent_days`, one century.
pub const MAX_RECENT_DAYS: i64 = 36_525;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusRules {
    pub base: f64,
    /// Priority scores at or above this earn `high_priority_bonus`.
    pub high_priority_threshold: u8,
    pub high_priority_bonus: f64,
    pub high_impact_bonus: f64,
    pub recent_days: i64,
    pub recent_bonus: f64,
    pub featured_categories: Vec<String>,
    pub featured_category_bonus: f64,
    pub active_status: String,
    pub active_bonus: f64,
}

impl Default for BonusRules {
    fn default() -> Self {
        Self {
            base: 50.0,
            high_priority_threshold: 8,
            high_priority_bonus: 20.0,
            high_impact_bonus: 15.0,
            recent_days: 30,
            recent_bonus: 10.0,
            featured_categories: vec![
                "education".to_string(),
                "environment".to_string(),
                "community".to_string(),
            ],
            featured_category_bonus: 10.0,
            active_status: "active".to_string(),
            active_bonus: 5.0,
        }
    }
}

impl BonusRules {
    pub fn validate(&self) -> Result<(), AppError> {
        let amounts = [
            ("base", self.base),
            ("high_priority_bonus", self.high_priority_bonus),
            ("high_impact_bonus", self.high_impact_bonus),
            ("recent_bonus", self.recent_bonus),
            ("featured_category_bonus", self.featured_category_bonus),
            ("active_bonus", self.active_bonus),
        ];
        for (name, v) in amounts {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::Config(format!(
                    "bonus '{name}' must be a finite non-negative number, got {v}"
                )));
            }
        }
        if !(0..=MAX_RECENT_DAYS).contains(&self.recent_days) {
            return Err(AppError::Config(format!(
                "recent_days must be between 0 and {MAX_RECENT_DAYS}, got {}",
                self.recent_days
            )));
        }
        Ok(())
    }

    /// Start of the "recently created" window. A window reaching past the
    /// earliest representable time covers everything.
    fn recent_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(self.recent_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Sum the base and every bonus whose condition holds.
    pub fn evaluate(&self, signals: &Signals<'_>, now: DateTime<Utc>) -> Scored {
        let mut score = self.base;
        let mut bonuses = Vec::new();

        if signals
            .priority
            .is_some_and(|p| p >= self.high_priority_threshold)
        {
            score += self.high_priority_bonus;
            bonuses.push(Bonus::HighPriority);
        }

        if signals.impact == Some(ImpactLevel::High) {
            score += self.high_impact_bonus;
            bonuses.push(Bonus::HighImpact);
        }

        if let Some(created_at) = signals.created_at {
            if created_at >= self.recent_since(now) {
                score += self.recent_bonus;
                bonuses.push(Bonus::Recent);
            }
        }

        if let Some(category) = signals.category {
            if self
                .featured_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
            {
                score += self.featured_category_bonus;
                bonuses.push(Bonus::FeaturedCategory);
            }
        }

        if signals.status.eq_ignore_ascii_case(&self.active_status) {
            score += self.active_bonus;
            bonuses.push(Bonus::Active);
        }

        Scored { score, bonuses }
    }
}

/// A record's score and, for additive scoring, the bonuses behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub score: f64,
    pub bonuses: Vec<Bonus>,
}

impl Scored {
    fn plain(score: f64) -> Self {
        Self {
            score,
            bonuses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringStrategy {
    MaxWeightedField(FieldWeights),
    AdditiveBonus(BonusRules),
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        ScoringStrategy::MaxWeightedField(FieldWeights::default())
    }
}

impl ScoringStrategy {
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            ScoringStrategy::MaxWeightedField(weights) => weights.validate(),
            ScoringStrategy::AdditiveBonus(rules) => rules.validate(),
        }
    }

    /// Score a record against a normalized query.
    ///
    /// Both strategies return 0 when a non-empty query matches no field.
    pub fn score<R: Searchable>(&self, record: &R, query: &str, now: DateTime<Utc>) -> Scored {
        match self {
            ScoringStrategy::MaxWeightedField(weights) => Scored::plain(
                record
                    .fields()
                    .into_iter()
                    .map(|(role, text)| score_field(text, query) * weights.weight(role))
                    .fold(0.0, f64::max),
            ),
            ScoringStrategy::AdditiveBonus(rules) => {
                let matched = query.is_empty()
                    || record
                        .fields()
                        .into_iter()
                        .any(|(_, text)| score_field(text, query) > 0.0);
                if matched {
                    rules.evaluate(&record.signals(), now)
                } else {
                    Scored::plain(0.0)
                }
            }
        }
    }
}
