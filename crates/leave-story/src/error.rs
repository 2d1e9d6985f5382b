use std::path::PathBuf;

/// Alias for `Result<T, LoadError>`.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur when loading a story document.
///
/// Loading either produces a complete document or one of these; there is no
/// partially loaded state.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The story resource could not be read.
    #[error("cannot read story resource {}: {source}", path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The resource is not a well-formed story document.
    #[error("cannot parse story document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but violates a load-time invariant.
    #[error("invalid story: {0}")]
    InvalidStory(String),

    /// An action token is outside the built-in vocabulary.
    #[error("invalid action \"{token}\" in {location}")]
    InvalidAction {
        /// Where the action appeared, e.g. `scene "cellar"`.
        location: String,
        /// The offending token.
        token: String,
    },
}
