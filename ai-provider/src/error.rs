//! Error types for text-generation providers.

use serde::Serialize;
use std::fmt;

/// Universal error type that abstracts provider-specific failures into common variants.
///
/// All provider implementations map their native errors to these variants. The
/// failover executor treats every variant as a failed attempt; the variant only
/// decides how the attempt is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Quota or rate limit exhausted (HTTP 429, `RESOURCE_EXHAUSTED`, "quota" in the body).
    RateLimited(String),

    /// The provider answered successfully but produced no text.
    Empty(String),

    /// Connection failure, DNS error or timeout before a response was received.
    Transport(String),

    /// Any other provider failure: auth rejection, bad request, server error,
    /// unparseable body.
    Unknown(String),
}

/// Coarse classification of a failed attempt, safe to log and serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptErrorKind {
    RateLimited,
    Empty,
    Transport,
    Unknown,
}

impl Error {
    pub fn kind(&self) -> AttemptErrorKind {
        match self {
            Error::RateLimited(_) => AttemptErrorKind::RateLimited,
            Error::Empty(_) => AttemptErrorKind::Empty,
            Error::Transport(_) => AttemptErrorKind::Transport,
            Error::Unknown(_) => AttemptErrorKind::Unknown,
        }
    }
}

impl fmt::Display for AttemptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttemptErrorKind::RateLimited => "rate_limited",
            AttemptErrorKind::Empty => "empty",
            AttemptErrorKind::Transport => "transport",
            AttemptErrorKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            Error::Empty(msg) => write!(f, "Empty response: {}", msg),
            Error::Transport(msg) => write!(f, "Transport error: {}", msg),
            Error::Unknown(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
