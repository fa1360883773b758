use std::fmt;

/// Lifecycle of a task inside a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// Declared, waiting on at least one dependency
    Pending,
    /// Every dependency has completed; eligible to be scheduled
    Ready,
    /// Currently executing on its agent
    Running,
    /// Produced an output
    Completed,
    /// The agent or one of its tools raised an error
    Failed(String),
    /// The agent did not answer within the task timeout
    TimedOut,
}

impl TaskState {
    /// Returns true once the task can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed(_) | TaskState::TimedOut
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Pending => write!(f, "Pending"),
            TaskState::Ready => write!(f, "Ready"),
            TaskState::Running => write!(f, "Running"),
            TaskState::Completed => write!(f, "Completed"),
            TaskState::Failed(msg) => write!(f, "Failed: {}", msg),
            TaskState::TimedOut => write!(f, "TimedOut"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_state_keeps_its_reason() {
        let state = TaskState::Failed("tool exploded".to_string());
        assert_eq!(state.to_string(), "Failed: tool exploded");
        assert!(state.is_terminal());
    }

    #[test]
    fn only_finished_states_are_terminal() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Ready.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::TimedOut.is_terminal());
    }
}
