//! Query, ScorerSupplier and Scorer traits
//!
//! Execution happens in two explicit phases. A `ScorerSupplier` is a cheap
//! descriptor that can report its cost any number of times; materializing it
//! consumes the supplier (`self: Box<Self>`), so a clause can never hand out
//! two scorers.

use std::fmt;
use std::sync::Arc;

use crate::config::ExecutionConfig;
use crate::segment::Segment;
use crate::{Cost, DocId, Result, Score};

use super::bulk::{BulkScorer, DefaultBulkScorer};
use super::docset::DocSet;

/// How the consumer of a scorer is going to use scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreMode {
    /// Every match is visited and scores are needed
    Complete,
    /// Every match is visited, scores are not needed
    CompleteNoScores,
    /// Only the top-scoring hits are needed; non-competitive docs may be skipped
    TopScores,
    /// Only the first hits in doc id order are needed, without scores
    TopDocs,
    /// Only the first hits in doc id order are needed, with scores
    TopDocsWithScores,
}

impl ScoreMode {
    pub const ALL: [ScoreMode; 5] = [
        ScoreMode::Complete,
        ScoreMode::CompleteNoScores,
        ScoreMode::TopScores,
        ScoreMode::TopDocs,
        ScoreMode::TopDocsWithScores,
    ];

    pub fn needs_scores(self) -> bool {
        matches!(
            self,
            ScoreMode::Complete | ScoreMode::TopScores | ScoreMode::TopDocsWithScores
        )
    }

    pub fn is_exhaustive(self) -> bool {
        matches!(self, ScoreMode::Complete | ScoreMode::CompleteNoScores)
    }
}

/// Hint given to a supplier when it is materialized
///
/// `Bounded(n)` means the consumer expects to drive iteration over about `n`
/// documents: a clause whose own cost is higher will mostly be probed with
/// `seek`. `Unbounded` means the clause leads iteration over all its matches
/// (bulk scoring). `Unbounded` compares greater than every bounded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeadCost {
    Bounded(Cost),
    Unbounded,
}

impl LeadCost {
    /// Cap this lead cost at `cost`
    #[inline]
    pub fn min_cost(self, cost: Cost) -> LeadCost {
        self.min(LeadCost::Bounded(cost))
    }

    /// Lead cost as a number, `Cost::MAX` when unbounded
    #[inline]
    pub fn as_cost(self) -> Cost {
        match self {
            LeadCost::Bounded(cost) => cost,
            LeadCost::Unbounded => Cost::MAX,
        }
    }
}

impl From<Cost> for LeadCost {
    fn from(cost: Cost) -> Self {
        LeadCost::Bounded(cost)
    }
}

impl fmt::Display for LeadCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadCost::Bounded(cost) => write!(f, "{}", cost),
            LeadCost::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Scorer that iterates over matching documents and computes scores
pub trait Scorer: DocSet {
    /// Score for current document
    fn score(&self) -> Score;

    /// Upper bound of `score()` over all documents of this scorer
    fn max_score(&self) -> Score;

    /// Documents scoring below `min_score` are no longer competitive and may be
    /// skipped from now on. Only honoured by top-level scoring clauses.
    fn set_min_competitive_score(&mut self, _min_score: Score) {}
}

impl DocSet for Box<dyn Scorer + '_> {
    #[inline]
    fn doc(&self) -> DocId {
        (**self).doc()
    }
    #[inline]
    fn advance(&mut self) -> DocId {
        (**self).advance()
    }
    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        (**self).seek(target)
    }
    #[inline]
    fn cost(&self) -> Cost {
        (**self).cost()
    }
}

impl Scorer for Box<dyn Scorer + '_> {
    #[inline]
    fn score(&self) -> Score {
        (**self).score()
    }
    #[inline]
    fn max_score(&self) -> Score {
        (**self).max_score()
    }
    #[inline]
    fn set_min_competitive_score(&mut self, min_score: Score) {
        (**self).set_min_competitive_score(min_score)
    }
}

/// Lazy, single-use factory of a clause's scorer
pub trait ScorerSupplier: Send {
    /// Estimated number of matches. Cheap, deterministic, callable before materialization.
    fn cost(&self) -> Cost;

    /// Materialize the scorer. `lead_cost` tells how many documents the
    /// consumer expects to drive iteration over.
    fn scorer(self: Box<Self>, lead_cost: LeadCost) -> Result<Box<dyn Scorer>>;

    /// Materialize a scorer that visits all matches a window at a time.
    fn bulk_scorer(self: Box<Self>) -> Result<Box<dyn BulkScorer>> {
        let scorer = self.scorer(LeadCost::Unbounded)?;
        Ok(Box::new(DefaultBulkScorer::new(scorer)))
    }

    /// Mark this clause as the only contributor to the top-level score, which
    /// allows it to skip non-competitive documents. Idempotent.
    fn set_top_level_scoring_clause(&mut self) {}
}

/// A search query
pub trait Query: fmt::Display + Send + Sync {
    /// Build a scorer supplier for one segment, or `None` when nothing can match there
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>>;
}

impl Query for Box<dyn Query> {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        (**self).scorer_supplier(segment, score_mode, config)
    }
}

impl Query for Arc<dyn Query> {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        (**self).scorer_supplier(segment, score_mode, config)
    }
}

/// Empty scorer for clauses that cannot match
pub struct EmptyScorer;

impl DocSet for EmptyScorer {
    fn doc(&self) -> DocId {
        crate::TERMINATED
    }

    fn advance(&mut self) -> DocId {
        crate::TERMINATED
    }

    fn seek(&mut self, _target: DocId) -> DocId {
        crate::TERMINATED
    }

    fn cost(&self) -> Cost {
        0
    }
}

impl Scorer for EmptyScorer {
    fn score(&self) -> Score {
        0.0
    }

    fn max_score(&self) -> Score {
        0.0
    }
}
