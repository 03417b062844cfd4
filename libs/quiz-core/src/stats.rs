//! Derived statistics over a user's status map.

use crate::types::UserStatusMap;

/// Percentage of a deck's cards currently marked correct, rounded to the
/// nearest integer. An empty deck has a mastery rate of 0.
pub fn mastery_rate(total_cards: usize, status: &UserStatusMap) -> u32 {
    if total_cards == 0 {
        return 0;
    }
    let correct = correct_count(status);
    ((correct as f64 / total_cards as f64) * 100.0).round() as u32
}

/// Number of cards the user has answered at least once.
pub fn answered_count(status: &UserStatusMap) -> usize {
    status.values().filter(|s| s.is_answered).count()
}

/// Number of cards currently marked correct.
pub fn correct_count(status: &UserStatusMap) -> usize {
    status.values().filter(|s| s.is_correct).count()
}
