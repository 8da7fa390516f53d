use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the operator. Search-time dead ends (no candidates, a
/// bound conflict, an empty neighbor list) are not represented here -- they
/// are silent and trigger backtracking inside the search engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edge in `{file}` at line {line}")]
    MalformedEdge { file: PathBuf, line: usize },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
