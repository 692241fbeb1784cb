//! Coordinator state machine

use serde::{Deserialize, Serialize};

/// State of a round-robin coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CoordinatorState {
    /// Turns are being taken; `cursor` indexes the next participant
    Running { cursor: usize },
    /// No further turns will be taken
    Terminated,
}

impl CoordinatorState {
    pub fn initial() -> Self {
        CoordinatorState::Running { cursor: 0 }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, CoordinatorState::Terminated)
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            CoordinatorState::Running { cursor } => Some(*cursor),
            CoordinatorState::Terminated => None,
        }
    }

    /// Move the cursor to the next participant, wrapping after the last one.
    ///
    /// A terminated state stays terminated.
    pub fn advance(self, participant_count: usize) -> Self {
        match self {
            CoordinatorState::Running { cursor } if participant_count > 0 => {
                CoordinatorState::Running {
                    cursor: (cursor + 1) % participant_count,
                }
            }
            other => other,
        }
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinatorState::Running { cursor } => write!(f, "running (cursor {})", cursor),
            CoordinatorState::Terminated => write!(f, "terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = CoordinatorState::default();
        assert_eq!(state, CoordinatorState::Running { cursor: 0 });
        assert_eq!(state.cursor(), Some(0));
        assert!(!state.is_terminated());
    }

    #[test]
    fn test_advance_wraps() {
        let mut state = CoordinatorState::initial();
        let mut visited = Vec::new();
        for _ in 0..5 {
            visited.push(state.cursor().unwrap());
            state = state.advance(2);
        }
        assert_eq!(visited, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_terminated_is_sticky() {
        let state = CoordinatorState::Terminated.advance(3);
        assert!(state.is_terminated());
        assert_eq!(state.cursor(), None);
    }
}
