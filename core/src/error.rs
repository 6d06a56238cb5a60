use std::path::PathBuf;

/// Problems found while reading a tag-weight table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line {line}: expected `<tag> <weight>`, got {content:?}")]
    Malformed { line: usize, content: String },

    #[error("line {line}: weight {value:?} is not a positive integer")]
    InvalidWeight { line: usize, value: String },

    #[error("line {line}: tag {tag:?} is listed more than once")]
    DuplicateTag { line: usize, tag: String },

    #[error("tag weights sum to zero")]
    ZeroTotalWeight,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid tag weights: {0}")]
    Config(#[from] ConfigError),

    #[error("corpus has no documents")]
    EmptyCorpus,

    /// The length-normalized TF denominator was exactly zero.
    #[error("degenerate term-frequency denominator for document {doc}, query term {term}")]
    NumericDegeneracy { doc: usize, term: usize },

    #[error("document {doc} has {found} query-term counts, expected {expected}")]
    MismatchedTerms { doc: usize, expected: usize, found: usize },

    #[error("{path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
