// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted lead scoring and temperature classification.

use inmobot_config::model::ScoringConfig;
use inmobot_core::{LeadDataDelta, Temperature};

/// Highest possible score.
pub const MAX_SCORE: u32 = 100;

/// Point weights and thresholds used to qualify leads.
#[derive(Debug, Clone, Default)]
pub struct ScoringPolicy {
    config: ScoringConfig,
}

impl ScoringPolicy {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted point sum of the known signals, capped at [`MAX_SCORE`].
    pub fn score(&self, data: &LeadDataDelta, message_count: usize) -> u8 {
        let c = &self.config;
        let signals = [
            (data.has_name(), c.name_points),
            (data.has_phone(), c.phone_points),
            (data.has_email(), c.email_points),
            (data.has_budget(), c.budget_points),
            (data.has_zone(), c.zone_points),
            (data.has_property_preference(), c.preference_points),
            (data.has_interested_property(), c.interested_property_points),
            (data.wants_visit == Some(true), c.wants_visit_points),
            (
                message_count >= c.engagement_min_messages,
                c.engagement_points,
            ),
        ];

        let total: u32 = signals
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, points)| *points)
            .sum();
        // Capped at 100, so the cast is lossless.
        total.min(MAX_SCORE) as u8
    }

    pub fn temperature(&self, score: u8) -> Temperature {
        let score = u32::from(score);
        if score <= self.config.cold_max {
            Temperature::Cold
        } else if score <= self.config.warm_max {
            Temperature::Warm
        } else {
            Temperature::Hot
        }
    }

    /// Score and temperature together.
    pub fn evaluate(&self, data: &LeadDataDelta, message_count: usize) -> (u8, Temperature) {
        let score = self.score(data, message_count);
        (score, self.temperature(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_boundaries() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.temperature(0), Temperature::Cold);
        assert_eq!(policy.temperature(30), Temperature::Cold);
        assert_eq!(policy.temperature(31), Temperature::Warm);
        assert_eq!(policy.temperature(60), Temperature::Warm);
        assert_eq!(policy.temperature(61), Temperature::Hot);
        assert_eq!(policy.temperature(100), Temperature::Hot);
    }

    #[test]
    fn name_and_phone_are_warm() {
        let data = LeadDataDelta {
            name: Some("Juan".into()),
            phone: Some("600123456".into()),
            ..LeadDataDelta::default()
        };
        let (score, temperature) = ScoringPolicy::default().evaluate(&data, 1);
        assert_eq!(score, 55);
        assert_eq!(temperature, Temperature::Warm);
    }

    #[test]
    fn full_profile_caps_at_100() {
        let data = LeadDataDelta {
            name: Some("Ana".into()),
            phone: Some("987654321".into()),
            email: Some("ana@example.com".into()),
            budget_min: Some(200_000),
            zone: Some("Miraflores".into()),
            bedrooms: Some(3),
            interested_property: Some("prop-002".into()),
            wants_visit: Some(true),
            ..LeadDataDelta::default()
        };
        // 25+30+15+10+5+5+10+20+10 = 130 before the cap.
        assert_eq!(ScoringPolicy::default().score(&data, 5), 100);
    }

    #[test]
    fn engagement_bonus_needs_three_user_turns() {
        let data = LeadDataDelta::default();
        let policy = ScoringPolicy::default();
        assert_eq!(policy.score(&data, 2), 0);
        assert_eq!(policy.score(&data, 3), 10);
    }

    #[test]
    fn declined_visit_scores_nothing() {
        let data = LeadDataDelta {
            wants_visit: Some(false),
            ..LeadDataDelta::default()
        };
        assert_eq!(ScoringPolicy::default().score(&data, 0), 0);
    }

    #[test]
    fn custom_weights_apply() {
        let policy = ScoringPolicy::new(ScoringConfig {
            phone_points: 50,
            ..ScoringConfig::default()
        });
        let data = LeadDataDelta {
            phone: Some("999".into()),
            ..LeadDataDelta::default()
        };
        assert_eq!(policy.score(&data, 0), 50);
    }
}
