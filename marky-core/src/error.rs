/// Errors raised at the edges of the model (file loading, configuration).
///
/// The chain operations themselves never fail: unknown tokens, empty input
/// and rounding drift all resolve to the terminator token.
#[derive(Debug, thiserror::Error)]
pub enum MarkyError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MarkyError>;
