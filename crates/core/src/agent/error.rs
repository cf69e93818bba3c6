use std::fmt;

/// Failure outcome of a backend call. The HTTP layer maps variants to status
/// codes by matching on the tag, so backends never pick status codes
/// themselves.
#[derive(Debug)]
pub enum AgentError {
    /// Validation-class failure: the request (or derived inputs) were
    /// unacceptable to the backend. Maps to a client error.
    Invalid(String),
    /// Any other backend failure. Maps to a server error; the full chain is
    /// surfaced to the caller.
    Failed(anyhow::Error),
}

impl AgentError {
    /// The full error chain as a single string, for the `traceback` field of
    /// server-error responses. Includes a backtrace when the process captures
    /// one.
    pub fn trace(&self) -> String {
        match self {
            AgentError::Invalid(msg) => msg.clone(),
            AgentError::Failed(err) => format!("{err:?}"),
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Invalid(msg) => write!(f, "{msg}"),
            AgentError::Failed(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Invalid(_) => None,
            AgentError::Failed(err) => err.source(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Failed(err)
    }
}
