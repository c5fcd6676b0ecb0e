//! Required side plus scoring-only optional clauses

use crate::{Cost, DocId, Score, TERMINATED};

use super::{DocSet, Scorer};

/// Matches exactly the docs of `required`; `optional` only adds to the score
/// of the docs it also matches.
///
/// The optional side never leads: it is sought to each required doc.
pub struct ReqOptScorer {
    required: Box<dyn Scorer>,
    optional: Box<dyn Scorer>,
}

impl ReqOptScorer {
    pub fn new(required: Box<dyn Scorer>, optional: Box<dyn Scorer>) -> Self {
        let mut scorer = Self { required, optional };
        let doc = scorer.required.doc();
        scorer.sync_optional(doc);
        scorer
    }

    #[inline]
    fn sync_optional(&mut self, doc: DocId) {
        if doc != TERMINATED && self.optional.doc() < doc {
            self.optional.seek(doc);
        }
    }
}

impl DocSet for ReqOptScorer {
    #[inline]
    fn doc(&self) -> DocId {
        self.required.doc()
    }

    fn advance(&mut self) -> DocId {
        let doc = self.required.advance();
        self.sync_optional(doc);
        doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let doc = self.required.seek(target);
        self.sync_optional(doc);
        doc
    }

    fn cost(&self) -> Cost {
        self.required.cost()
    }
}

impl Scorer for ReqOptScorer {
    fn score(&self) -> Score {
        let doc = self.required.doc();
        let mut score = self.required.score();
        if self.optional.doc() == doc {
            score += self.optional.score();
        }
        score
    }

    fn max_score(&self) -> Score {
        self.required.max_score() + self.optional.max_score()
    }
}
