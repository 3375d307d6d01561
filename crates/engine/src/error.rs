use std::fmt;

use crate::source::UpstreamError;

/// Step of the request pipeline that talks to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchEvents,
    ResolveNames,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchEvents => write!(f, "event fetch"),
            Self::ResolveNames => write!(f, "tool name resolution"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout { stage: Stage, timeout_ms: u64 },
    #[error("{stage} cancelled")]
    Cancelled { stage: Stage },
}

pub type Result<T> = std::result::Result<T, EngineError>;
