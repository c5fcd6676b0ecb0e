//! Error types for hermes-query

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("minimum_should_match is {min_should_match} but there are only {num_should} SHOULD clauses")]
    InvalidMinShouldMatch {
        min_should_match: usize,
        num_should: usize,
    },

    #[error("Boolean query needs at least one MUST, FILTER or SHOULD clause")]
    NoPositiveClause,

    #[error("Too many clauses: {count} (max {max})")]
    TooManyClauses { count: usize, max: usize },

    #[error("Segment is full: {max} documents")]
    SegmentFull { max: u64 },

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
