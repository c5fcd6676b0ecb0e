//! Constant-score wrapper

use crate::{Cost, DocId, Score, TERMINATED};

use super::{DocSet, Scorer};

/// Gives every document of the wrapped DocSet the same score.
///
/// Used for match-all queries and for filter clauses whose own score must not
/// leak into a scoring composition. Once the minimum competitive score rises
/// above the constant, no remaining document can compete and the scorer
/// reports itself exhausted.
pub struct ConstantScorer<D: DocSet> {
    inner: D,
    score: Score,
    exhausted: bool,
}

impl<D: DocSet> ConstantScorer<D> {
    pub fn new(inner: D, score: Score) -> Self {
        Self {
            inner,
            score,
            exhausted: false,
        }
    }
}

impl<D: DocSet> DocSet for ConstantScorer<D> {
    #[inline]
    fn doc(&self) -> DocId {
        if self.exhausted {
            TERMINATED
        } else {
            self.inner.doc()
        }
    }

    #[inline]
    fn advance(&mut self) -> DocId {
        if self.exhausted {
            return TERMINATED;
        }
        self.inner.advance()
    }

    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        if self.exhausted {
            return TERMINATED;
        }
        self.inner.seek(target)
    }

    fn cost(&self) -> Cost {
        self.inner.cost()
    }
}

impl<D: DocSet> Scorer for ConstantScorer<D> {
    #[inline]
    fn score(&self) -> Score {
        self.score
    }

    fn max_score(&self) -> Score {
        self.score
    }

    fn set_min_competitive_score(&mut self, min_score: Score) {
        if min_score > self.score {
            self.exhausted = true;
        }
    }
}
