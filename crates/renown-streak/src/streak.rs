// crates/renown-streak/src/streak.rs
//
// Pure GM stats transition.

use renown_core::{EpochDay, GmStats, RenownError};

/// Compute the stats after a check-in on `day`.
///
/// The caller must already have rejected a second check-in on the same
/// day. A `day` earlier than the last check-in means the clock moved
/// backwards and is rejected.
pub fn next_stats(prev: Option<&GmStats>, day: EpochDay) -> Result<GmStats, RenownError> {
    let prev = prev.cloned().unwrap_or_default();

    let streak = match prev.last_checkin_day {
        Some(last) if day == last => {
            return Err(RenownError::InvalidState(format!(
                "second check-in on {}",
                day
            )))
        }
        Some(last) if day < last => {
            return Err(RenownError::InvalidState(format!(
                "check-in on {} precedes last check-in on {}",
                day, last
            )))
        }
        Some(last) if day.follows(last) => prev.streak.saturating_add(1),
        _ => 1,
    };

    Ok(GmStats {
        total: prev.total.saturating_add(1),
        streak,
        best_streak: prev.best_streak.max(streak),
        last_checkin_day: Some(day),
        first_checkin_day: prev.first_checkin_day.or(Some(day)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(days: &[i64]) -> GmStats {
        let mut stats: Option<GmStats> = None;
        for &d in days {
            stats = Some(next_stats(stats.as_ref(), EpochDay(d)).unwrap());
        }
        stats.unwrap()
    }

    #[test]
    fn test_first_checkin() {
        let stats = next_stats(None, EpochDay(100)).unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.last_checkin_day, Some(EpochDay(100)));
        assert_eq!(stats.first_checkin_day, Some(EpochDay(100)));
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        for k in 0..10i64 {
            let days: Vec<i64> = (500..=500 + k).collect();
            let stats = run(&days);
            assert_eq!(stats.streak, (k + 1) as u64);
            assert_eq!(stats.total, (k + 1) as u64);
        }
    }

    #[test]
    fn test_gap_resets_streak() {
        // Days 100, 101, 102, skip 103, then 104.
        let stats = run(&[100, 101, 102]);
        assert_eq!(stats.streak, 3);

        let stats = next_stats(Some(&stats), EpochDay(104)).unwrap();
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.first_checkin_day, Some(EpochDay(100)));
    }

    #[test]
    fn test_long_gap_resets_streak() {
        let stats = run(&[1, 2, 30]);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 2);
    }

    #[test]
    fn test_same_day_rejected() {
        let stats = run(&[7]);
        assert!(next_stats(Some(&stats), EpochDay(7)).is_err());
    }

    #[test]
    fn test_clock_moving_backwards_rejected() {
        let stats = run(&[7]);
        let err = next_stats(Some(&stats), EpochDay(6)).unwrap_err();
        assert!(matches!(err, RenownError::InvalidState(_)));
    }
}
