//! Prohibited-clause exclusion

use crate::{Cost, DocId, Score, TERMINATED};

use super::{BulkScorer, Collector, DocSet, Scorer};

/// Matches of `required` that `excluded` does not match
///
/// Each candidate of the required side is checked by seeking the excluded
/// scorer to it; only the required side contributes to the score.
pub struct ReqExclScorer {
    required: Box<dyn Scorer>,
    excluded: Box<dyn Scorer>,
    doc: DocId,
}

impl ReqExclScorer {
    pub fn new(required: Box<dyn Scorer>, excluded: Box<dyn Scorer>) -> Self {
        let first = required.doc();
        let mut scorer = Self {
            required,
            excluded,
            doc: TERMINATED,
        };
        scorer.doc = scorer.accept_from(first);
        scorer
    }

    /// First doc at or after the required side's `doc` that is not excluded
    fn accept_from(&mut self, mut doc: DocId) -> DocId {
        while doc != TERMINATED {
            let mut excluded = self.excluded.doc();
            if excluded < doc {
                excluded = self.excluded.seek(doc);
            }
            if excluded != doc {
                return doc;
            }
            doc = self.required.advance();
        }
        TERMINATED
    }
}

impl DocSet for ReqExclScorer {
    #[inline]
    fn doc(&self) -> DocId {
        self.doc
    }

    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let next = self.required.advance();
        self.doc = self.accept_from(next);
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if target <= self.doc {
            return self.doc;
        }
        let next = self.required.seek(target);
        self.doc = self.accept_from(next);
        self.doc
    }

    fn cost(&self) -> Cost {
        self.required.cost()
    }
}

impl Scorer for ReqExclScorer {
    fn score(&self) -> Score {
        self.required.score()
    }

    fn max_score(&self) -> Score {
        self.required.max_score()
    }

    fn set_min_competitive_score(&mut self, min_score: Score) {
        self.required.set_min_competitive_score(min_score);
        // The required side may have skipped ahead
        let doc = self.required.doc();
        if doc != self.doc {
            self.doc = self.accept_from(doc);
        }
    }
}

/// Bulk counterpart of [`ReqExclScorer`]
///
/// Splits each requested range at every excluded doc and lets the positive
/// bulk scorer score the gaps.
pub struct ReqExclBulkScorer {
    positive: Box<dyn BulkScorer>,
    excluded: Box<dyn Scorer>,
}

impl ReqExclBulkScorer {
    pub fn new(positive: Box<dyn BulkScorer>, excluded: Box<dyn Scorer>) -> Self {
        Self { positive, excluded }
    }
}

impl BulkScorer for ReqExclBulkScorer {
    fn score_range(&mut self, collector: &mut dyn Collector, min: DocId, max: DocId) -> DocId {
        let mut up_to = min;
        let mut excluded = self.excluded.doc();
        while up_to < max {
            if excluded < up_to {
                excluded = self.excluded.seek(up_to);
            }
            if excluded == up_to {
                // Step over the excluded doc; the next range starts after it
                up_to += 1;
                excluded = self.excluded.advance();
            } else {
                up_to = self
                    .positive
                    .score_range(collector, up_to, excluded.min(max));
            }
        }
        if up_to == max {
            up_to = self.positive.score_range(collector, up_to, up_to);
        }
        up_to
    }

    fn cost(&self) -> Cost {
        self.positive.cost()
    }
}
