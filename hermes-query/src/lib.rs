//! Hermes query - boolean query execution engine
//!
//! Turns a combination of MUST, FILTER, SHOULD and MUST_NOT clauses into a
//! single scorer over a segment's sorted doc id space:
//! - Cost model that predicts iteration volume without materializing anything
//! - Lead-cost negotiation between a composition and its clauses
//! - Conjunction, disjunction (with minimum-should-match) and exclusion scorers
//! - Per-document and window-at-a-time (bulk) execution
//! - In-memory segments, term/boost/match-all leaves and a parallel searcher

pub mod config;
pub mod error;
pub mod query;
pub mod search;
pub mod segment;

pub use config::ExecutionConfig;
pub use error::{Error, Result};
pub use query::{
    AllQuery, BooleanQuery, BooleanScorerSupplier, BoostQuery, BulkScorer, Clause, ClauseGroup,
    ClauseShape, Collector, ConjunctionScorer, CountCollector, DisjunctionScorer, DocSet,
    ExecutionMode, LeadCost, Occur, Query, ScoreMode, Scorer, ScorerSupplier, SearchResult,
    TermQuery, TopKCollector,
};
pub use search::{DocAddress, SearchHit, SearchResponse, Searcher};
pub use segment::{PostingList, Segment, SegmentBuilder};

pub type DocId = u32;
pub type Score = f32;
/// Upper bound on the number of documents an iterator may produce
pub type Cost = u64;

/// Doc id returned by exhausted iterators
pub const TERMINATED: DocId = u32::MAX;
