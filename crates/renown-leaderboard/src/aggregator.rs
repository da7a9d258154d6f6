// crates/renown-leaderboard/src/aggregator.rs
//
// Bounded top-N leaderboard.
//
// Entries are kept unsorted; the list never grows past `capacity`. When it
// is full, a new account only gets in by beating the current lowest entry,
// which it then replaces.

use std::cmp::Ordering;

use renown_core::{AccountId, EpochDay, LeaderboardEntry};

/// Presentation order: score descending, then account id ascending.
pub fn rank_order(a_score: u64, a: &AccountId, b_score: u64, b: &AccountId) -> Ordering {
    b_score.cmp(&a_score).then_with(|| a.cmp(b))
}

/// What happened to a candidate offered to the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The account was already listed; its score was refreshed.
    Updated,
    /// The account took a free slot.
    Inserted,
    /// The account replaced the lowest-scoring entry.
    Replaced { evicted: AccountId },
    /// The board is full and the account did not beat the lowest entry.
    Rejected,
}

/// Capped top-N list of leaderboard entries.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Leaderboard {
    /// Create an empty leaderboard holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from persisted entries.
    ///
    /// If the capacity shrank since the entries were written, the lowest
    /// ranked entries are dropped.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>, capacity: usize) -> Self {
        if entries.len() > capacity {
            sort_ranked(&mut entries);
            entries.truncate(capacity);
        }
        Self { entries, capacity }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in storage order.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Look up an account's entry.
    pub fn get(&self, account: &AccountId) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| &e.account == account)
    }

    /// Index of the entry that would be evicted next: the lowest score, and
    /// among equal scores the one ranked last (largest account id).
    fn lowest_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| rank_order(a.score, &a.account, b.score, &b.account))
            .map(|(i, _)| i)
    }

    /// Offer a freshly computed score for `account`.
    pub fn offer(&mut self, account: &AccountId, score: u64, day: EpochDay) -> Placement {
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.account == account) {
            entry.score = score;
            entry.last_updated = day;
            return Placement::Updated;
        }

        let entry = LeaderboardEntry {
            account: account.clone(),
            score,
            last_updated: day,
        };

        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            return Placement::Inserted;
        }

        match self.lowest_index() {
            Some(i) if score > self.entries[i].score => {
                let evicted = std::mem::replace(&mut self.entries[i], entry).account;
                Placement::Replaced { evicted }
            }
            _ => Placement::Rejected,
        }
    }

    /// Entries in presentation order.
    pub fn ranked(&self) -> Vec<LeaderboardEntry> {
        let mut out = self.entries.clone();
        sort_ranked(&mut out);
        out
    }
}

fn sort_ranked(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| rank_order(a.score, &a.account, b.score, &b.account));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    #[test]
    fn test_insert_until_full() {
        let mut board = Leaderboard::new(2);
        assert_eq!(board.offer(&id("0xa"), 10, EpochDay(1)), Placement::Inserted);
        assert_eq!(board.offer(&id("0xb"), 20, EpochDay(1)), Placement::Inserted);
        assert_eq!(board.len(), 2);
        assert_eq!(board.offer(&id("0xc"), 5, EpochDay(1)), Placement::Rejected);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_higher_score_evicts_lowest() {
        let mut board = Leaderboard::new(2);
        board.offer(&id("0xa"), 10, EpochDay(1));
        board.offer(&id("0xb"), 20, EpochDay(1));
        assert_eq!(
            board.offer(&id("0xc"), 15, EpochDay(2)),
            Placement::Replaced { evicted: id("0xa") }
        );
        assert!(board.get(&id("0xa")).is_none());
        assert_eq!(board.get(&id("0xc")).unwrap().last_updated, EpochDay(2));
    }

    #[test]
    fn test_equal_score_does_not_evict() {
        let mut board = Leaderboard::new(1);
        board.offer(&id("0xb"), 10, EpochDay(1));
        assert_eq!(board.offer(&id("0xa"), 10, EpochDay(1)), Placement::Rejected);
    }

    #[test]
    fn test_existing_entry_updated_in_place() {
        let mut board = Leaderboard::new(2);
        board.offer(&id("0xa"), 10, EpochDay(1));
        board.offer(&id("0xb"), 20, EpochDay(1));
        assert_eq!(board.offer(&id("0xa"), 3, EpochDay(2)), Placement::Updated);
        let a = board.get(&id("0xa")).unwrap();
        assert_eq!((a.score, a.last_updated), (3, EpochDay(2)));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_eviction_tie_breaks_on_account() {
        let mut board = Leaderboard::new(3);
        board.offer(&id("0xa"), 5, EpochDay(1));
        board.offer(&id("0xc"), 5, EpochDay(1));
        board.offer(&id("0xb"), 9, EpochDay(1));
        // Of the two lowest, the one ranked last (larger id) goes first.
        assert_eq!(
            board.offer(&id("0xd"), 6, EpochDay(2)),
            Placement::Replaced { evicted: id("0xc") }
        );
        assert!(board.get(&id("0xa")).is_some());
    }

    #[test]
    fn test_ranked_order() {
        let mut board = Leaderboard::new(4);
        board.offer(&id("0xd"), 1, EpochDay(1));
        board.offer(&id("0xb"), 7, EpochDay(1));
        board.offer(&id("0xa"), 7, EpochDay(1));
        board.offer(&id("0xc"), 9, EpochDay(1));
        let order: Vec<String> = board.ranked().into_iter().map(|e| e.account.to_string()).collect();
        assert_eq!(order, vec!["0xc", "0xa", "0xb", "0xd"]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut board = Leaderboard::new(5);
        for i in 0..100u64 {
            board.offer(&id(&format!("0x{:03}", i)), (i * 37) % 101, EpochDay(1));
            assert!(board.len() <= 5);
        }
        // The five highest scores of the sequence survive.
        let mut expected: Vec<u64> = (0..100u64).map(|i| (i * 37) % 101).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        let kept: Vec<u64> = board.ranked().iter().map(|e| e.score).collect();
        assert_eq!(kept, expected[..5].to_vec());
    }

    #[test]
    fn test_from_entries_truncates_to_capacity() {
        let entries = vec![
            LeaderboardEntry { account: id("0xa"), score: 1, last_updated: EpochDay(1) },
            LeaderboardEntry { account: id("0xb"), score: 3, last_updated: EpochDay(1) },
            LeaderboardEntry { account: id("0xc"), score: 2, last_updated: EpochDay(1) },
        ];
        let board = Leaderboard::from_entries(entries, 2);
        assert_eq!(board.len(), 2);
        assert!(board.get(&id("0xa")).is_none());
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut board = Leaderboard::new(0);
        assert_eq!(board.offer(&id("0xa"), 100, EpochDay(1)), Placement::Rejected);
        assert!(board.is_empty());
    }
}
