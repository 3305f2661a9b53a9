use thiserror::Error;

// In-flight navigation request, applied on the next scheduling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDirection {
    Advancing,
    Retreating,
}

// Signals the session sends up to the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Ended,
    Restarted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("cannot play an empty slide sequence")]
    EmptySequence,
}
