// crates/renown-scoring/src/components.rs
//
// Score weights and the pure score function.
//
//   score = base
//         + articles          * per_article
//         + proposals_created * per_proposal
//         + proposals_funded  * per_funded_proposal
//         + tips_given        * per_tip
//         + gm_total          * per_gm
//         + streak_bonus(streak)
//         + accrued_snapshot_reward
//
// All arithmetic saturates at u64::MAX so the function stays total and
// monotonic in every input.

use serde::{Deserialize, Serialize};

use renown_core::{ActivitySignals, GmStats};

use crate::bonus::StreakBonus;

/// Immutable scoring weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreComponents {
    /// Points every account starts with.
    pub base: u64,
    pub per_article: u64,
    pub per_proposal: u64,
    pub per_funded_proposal: u64,
    pub per_tip: u64,
    pub per_gm: u64,
    /// Streak bonus policy.
    pub streak_bonus: StreakBonus,
}

impl Default for ScoreComponents {
    fn default() -> Self {
        Self {
            base: 20,
            per_article: 250,
            per_proposal: 20,
            per_funded_proposal: 100,
            per_tip: 20,
            per_gm: 10,
            streak_bonus: StreakBonus::default(),
        }
    }
}

/// Everything the score depends on. Nothing else is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub signals: ActivitySignals,
    pub gm_total: u64,
    pub streak: u64,
    pub accrued_reward: u64,
}

impl ScoreInputs {
    /// Assemble inputs from ledger signals, optional GM stats and the
    /// account's accrued snapshot reward.
    pub fn new(signals: ActivitySignals, gm: Option<&GmStats>, accrued_reward: u64) -> Self {
        Self {
            signals,
            gm_total: gm.map_or(0, |s| s.total),
            streak: gm.map_or(0, |s| s.streak),
            accrued_reward,
        }
    }
}

/// Per-term contribution to a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: u64,
    pub articles: u64,
    pub proposals: u64,
    pub funded_proposals: u64,
    pub tips: u64,
    pub gm: u64,
    pub streak_bonus: u64,
    pub snapshot_reward: u64,
}

impl ScoreBreakdown {
    /// Compute each term of the score.
    pub fn compute(components: &ScoreComponents, inputs: &ScoreInputs) -> Self {
        let s = &inputs.signals;
        Self {
            base: components.base,
            articles: s.articles.saturating_mul(components.per_article),
            proposals: s.proposals_created.saturating_mul(components.per_proposal),
            funded_proposals: s
                .proposals_funded
                .saturating_mul(components.per_funded_proposal),
            tips: s.tips_given.saturating_mul(components.per_tip),
            gm: inputs.gm_total.saturating_mul(components.per_gm),
            streak_bonus: components.streak_bonus.points(inputs.streak),
            snapshot_reward: inputs.accrued_reward,
        }
    }

    /// Sum of all terms.
    pub fn total(&self) -> u64 {
        [
            self.base,
            self.articles,
            self.proposals,
            self.funded_proposals,
            self.tips,
            self.gm,
            self.streak_bonus,
            self.snapshot_reward,
        ]
        .iter()
        .fold(0u64, |acc, term| acc.saturating_add(*term))
    }
}

/// The reputation score of an account with the given inputs.
pub fn score(components: &ScoreComponents, inputs: &ScoreInputs) -> u64 {
    ScoreBreakdown::compute(components, inputs).total()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(articles: u64, proposals: u64, funded: u64, tips: u64, gm: u64, streak: u64) -> ScoreInputs {
        ScoreInputs {
            signals: ActivitySignals {
                articles,
                proposals_created: proposals,
                proposals_funded: funded,
                tips_given: tips,
            },
            gm_total: gm,
            streak,
            accrued_reward: 0,
        }
    }

    #[test]
    fn test_reference_example() {
        // 1 article, 2 proposals, 0 funded, 0 tips, 5 GMs, streak 10.
        let components = ScoreComponents::default();
        let total = score(&components, &inputs(1, 2, 0, 0, 5, 10));
        assert_eq!(total, 20 + 250 + 40 + 0 + 0 + 50 + 10);
        assert_eq!(total, 370);
    }

    #[test]
    fn test_empty_account_scores_base() {
        let components = ScoreComponents::default();
        assert_eq!(score(&components, &ScoreInputs::default()), 20);
    }

    #[test]
    fn test_accrued_reward_is_added() {
        let components = ScoreComponents::default();
        let mut i = ScoreInputs::default();
        i.accrued_reward = 30;
        assert_eq!(score(&components, &i), 50);
    }

    #[test]
    fn test_threshold_policy() {
        let components = ScoreComponents {
            streak_bonus: StreakBonus::Threshold {
                min_streak: 7,
                bonus: 100,
            },
            ..ScoreComponents::default()
        };
        assert_eq!(score(&components, &inputs(0, 0, 0, 0, 6, 6)), 20 + 60);
        assert_eq!(score(&components, &inputs(0, 0, 0, 0, 7, 7)), 20 + 70 + 100);
    }

    #[test]
    fn test_monotonic_in_each_input() {
        let components = ScoreComponents::default();
        let start = inputs(3, 2, 1, 4, 9, 5);
        let base = score(&components, &start);

        let bumps: [fn(&mut ScoreInputs); 7] = [
            |i| i.signals.articles += 1,
            |i| i.signals.proposals_created += 1,
            |i| i.signals.proposals_funded += 1,
            |i| i.signals.tips_given += 1,
            |i| i.gm_total += 1,
            |i| i.streak += 1,
            |i| i.accrued_reward += 1,
        ];
        for bump in bumps.iter() {
            let mut bumped = start;
            bump(&mut bumped);
            assert!(score(&components, &bumped) >= base);
        }
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let components = ScoreComponents::default();
        let total = score(&components, &inputs(u64::MAX, 0, 0, 0, 0, 0));
        assert_eq!(total, u64::MAX);
    }

    #[test]
    fn test_breakdown_terms() {
        let components = ScoreComponents::default();
        let b = ScoreBreakdown::compute(&components, &inputs(1, 2, 3, 4, 5, 6));
        assert_eq!(b.articles, 250);
        assert_eq!(b.proposals, 40);
        assert_eq!(b.funded_proposals, 300);
        assert_eq!(b.tips, 80);
        assert_eq!(b.gm, 50);
        assert_eq!(b.streak_bonus, 6);
        assert_eq!(b.total(), 20 + 250 + 40 + 300 + 80 + 50 + 6);
    }

    #[test]
    fn test_components_from_toml() {
        let toml_str = r#"
            base = 5
            per_article = 100

            [streak_bonus]
            policy = "threshold"
            min_streak = 3
            bonus = 25
        "#;
        let c: ScoreComponents = toml::from_str(toml_str).unwrap();
        assert_eq!(c.base, 5);
        assert_eq!(c.per_article, 100);
        assert_eq!(c.per_gm, 10);
        assert_eq!(
            c.streak_bonus,
            StreakBonus::Threshold {
                min_streak: 3,
                bonus: 25
            }
        );
    }
}
