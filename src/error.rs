//! Error types for content loading, querying and rendering

use std::path::PathBuf;

/// Errors raised while building the site
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no content entry matches slug {slug:?}")]
    EntryNotFound { slug: String },

    #[error("{first:?} and {second:?} both resolve to slug {slug:?}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("invalid path pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid ignore glob {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to parse front-matter: {0}")]
    FrontMatter(String),

    #[error("failed to parse config {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("unknown timezone {0:?}")]
    Timezone(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
