//! Boost query - multiplies the score of the inner query

use std::fmt;
use std::sync::Arc;

use crate::config::ExecutionConfig;
use crate::segment::Segment;
use crate::{Cost, DocId, Error, Result, Score};

use super::{DocSet, LeadCost, Query, ScoreMode, Scorer, ScorerSupplier};

/// Boost query - multiplies the score of the inner query
pub struct BoostQuery {
    pub inner: Arc<dyn Query>,
    pub boost: f32,
}

impl fmt::Debug for BoostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoostQuery")
            .field("boost", &self.boost)
            .finish()
    }
}

impl fmt::Display for BoostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})^{}", self.inner, self.boost)
    }
}

impl BoostQuery {
    pub fn new(query: impl Query + 'static, boost: f32) -> Self {
        Self {
            inner: Arc::new(query),
            boost,
        }
    }
}

impl Query for BoostQuery {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        if !self.boost.is_finite() || self.boost < 0.0 {
            return Err(Error::Query(format!(
                "boost must be finite and non-negative, got {}",
                self.boost
            )));
        }
        let inner = self.inner.scorer_supplier(segment, score_mode, config)?;
        Ok(inner.map(|inner| {
            Box::new(BoostScorerSupplier {
                inner,
                boost: self.boost,
            }) as Box<dyn ScorerSupplier>
        }))
    }
}

struct BoostScorerSupplier {
    inner: Box<dyn ScorerSupplier>,
    boost: f32,
}

impl ScorerSupplier for BoostScorerSupplier {
    fn cost(&self) -> Cost {
        self.inner.cost()
    }

    fn scorer(self: Box<Self>, lead_cost: LeadCost) -> Result<Box<dyn Scorer>> {
        let inner = self.inner.scorer(lead_cost)?;
        Ok(Box::new(BoostScorer {
            inner,
            boost: self.boost,
        }))
    }

    fn set_top_level_scoring_clause(&mut self) {
        self.inner.set_top_level_scoring_clause();
    }
}

struct BoostScorer {
    inner: Box<dyn Scorer>,
    boost: f32,
}

impl DocSet for BoostScorer {
    fn doc(&self) -> DocId {
        self.inner.doc()
    }

    fn advance(&mut self) -> DocId {
        self.inner.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.inner.seek(target)
    }

    fn cost(&self) -> Cost {
        self.inner.cost()
    }
}

impl Scorer for BoostScorer {
    fn score(&self) -> Score {
        self.inner.score() * self.boost
    }

    fn max_score(&self) -> Score {
        self.inner.max_score() * self.boost
    }

    fn set_min_competitive_score(&mut self, min_score: Score) {
        if self.boost > 0.0 {
            self.inner.set_min_competitive_score(min_score / self.boost);
        }
    }
}
