use thiserror::Error;

/// Errors surfaced to callers of construction and resize.
///
/// Per-bot numeric edge cases (zero pointer distance, out-of-range knobs) are
/// recovered inside the tick and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwarmError {
    /// Zero bots, zero groups, or a degenerate environment.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A bot was addressed by an index past the end of the population.
    #[error("bot index {index} out of range for {len} bots")]
    BotIndexOutOfRange { index: usize, len: usize },
}

pub type SwarmResult<T> = Result<T, SwarmError>;
