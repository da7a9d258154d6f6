// crates/renown-scoring/src/bonus.rs
//
// Streak bonus policies.
//
// Two policies exist on the platform: a linear bonus ("day N of the streak
// is worth N points") and a flat bonus paid once the streak crosses a
// threshold. Linear is the default. Both are monotonic non-decreasing in
// the streak length, which keeps the overall score monotonic.

use serde::{Deserialize, Serialize};

/// Bonus awarded for the current consecutive-day check-in streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StreakBonus {
    /// `streak * points_per_day`.
    Linear {
        /// Points per streak day.
        points_per_day: u64,
    },
    /// `bonus` once `streak >= min_streak`, otherwise 0.
    Threshold {
        /// Streak length at which the bonus starts to apply.
        min_streak: u64,
        /// Flat bonus.
        bonus: u64,
    },
}

impl StreakBonus {
    /// Bonus points for a streak of `streak` days.
    pub fn points(&self, streak: u64) -> u64 {
        match self {
            StreakBonus::Linear { points_per_day } => streak.saturating_mul(*points_per_day),
            StreakBonus::Threshold { min_streak, bonus } => {
                if streak >= *min_streak {
                    *bonus
                } else {
                    0
                }
            }
        }
    }
}

impl Default for StreakBonus {
    fn default() -> Self {
        StreakBonus::Linear { points_per_day: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_day_n_is_n_points() {
        let bonus = StreakBonus::default();
        assert_eq!(bonus.points(0), 0);
        assert_eq!(bonus.points(1), 1);
        assert_eq!(bonus.points(10), 10);
    }

    #[test]
    fn test_linear_scaled() {
        let bonus = StreakBonus::Linear { points_per_day: 5 };
        assert_eq!(bonus.points(7), 35);
    }

    #[test]
    fn test_linear_saturates() {
        let bonus = StreakBonus::Linear { points_per_day: u64::MAX };
        assert_eq!(bonus.points(2), u64::MAX);
    }

    #[test]
    fn test_threshold() {
        let bonus = StreakBonus::Threshold {
            min_streak: 7,
            bonus: 100,
        };
        assert_eq!(bonus.points(6), 0);
        assert_eq!(bonus.points(7), 100);
        assert_eq!(bonus.points(365), 100);
    }

    #[test]
    fn test_both_policies_monotonic() {
        let policies = [
            StreakBonus::default(),
            StreakBonus::Linear { points_per_day: 3 },
            StreakBonus::Threshold {
                min_streak: 5,
                bonus: 50,
            },
        ];
        for policy in &policies {
            let mut prev = 0;
            for streak in 0..100 {
                let points = policy.points(streak);
                assert!(points >= prev, "{:?} decreased at streak {}", policy, streak);
                prev = points;
            }
        }
    }
}
