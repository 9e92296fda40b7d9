//! Trailing-edge debounce state, one per open document.
//!
//! A text change while `Idle` schedules exactly one delayed rescan;
//! further changes while `Pending` schedule nothing (at most one timer
//! per document). The timer always fires and re-reads the latest text,
//! so a rescan eventually runs with the newest snapshot. This caps scan
//! frequency during rapid typing; it is not a correctness mechanism.

use std::time::Duration;

/// Delay between an observed change and the rescan it triggers.
pub const SCAN_DELAY: Duration = Duration::from_millis(300);

/// Per-document scheduling state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DebounceState {
    #[default]
    Idle,
    Pending,
}

impl DebounceState {
    /// Change event. Returns `true` when the caller should schedule the
    /// delayed rescan (`Idle` -> `Pending`); a no-op while `Pending`.
    pub fn request(&mut self) -> bool {
        match self {
            DebounceState::Idle => {
                *self = DebounceState::Pending;
                true
            }
            DebounceState::Pending => false,
        }
    }

    /// Timer fired (`Pending` -> `Idle`). The caller scans now.
    pub fn fired(&mut self) {
        *self = DebounceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_schedules() {
        let mut state = DebounceState::Idle;
        assert!(state.request());
        assert_eq!(state, DebounceState::Pending);
    }

    #[test]
    fn requests_while_pending_are_no_ops() {
        let mut state = DebounceState::Idle;
        assert!(state.request());
        assert!(!state.request());
        assert!(!state.request());
        assert_eq!(state, DebounceState::Pending);
    }

    #[test]
    fn firing_allows_the_next_request() {
        let mut state = DebounceState::Idle;
        assert!(state.request());
        state.fired();
        assert_eq!(state, DebounceState::Idle);
        assert!(state.request());
    }
}
