//! Change detection between runs.
//!
//! A pure key comparison: no timestamps are re-parsed and no provider
//! knowledge leaks in, so the decision is identical no matter which
//! adapter produced the snapshot.

use crate::types::ChangeKey;

/// Outcome of comparing the stored key against the latest fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Changed,
}

/// Compare the stored key for a flight against the key built from the
/// latest fetch. No stored key means the flight was never successfully
/// notified, which always counts as a change.
pub fn detect(previous: Option<&ChangeKey>, next: &ChangeKey) -> Change {
    match previous {
        Some(prev) if prev == next => Change::Unchanged,
        _ => Change::Changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_changed() {
        let next = ChangeKey::new("active|T1|");
        assert_eq!(detect(None, &next), Change::Changed);
    }

    #[test]
    fn test_equal_keys_are_unchanged() {
        let prev = ChangeKey::new("active|T1|");
        let next = ChangeKey::new("active|T1|");
        assert_eq!(detect(Some(&prev), &next), Change::Unchanged);
    }

    #[test]
    fn test_different_keys_are_changed() {
        let prev = ChangeKey::new("scheduled||");
        let next = ChangeKey::new("active|T1|");
        assert_eq!(detect(Some(&prev), &next), Change::Changed);
    }
}
