//! Term query - matches documents containing a specific term

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::config::ExecutionConfig;
use crate::segment::{PostingList, Segment};
use crate::{Cost, DocId, Result, Score, TERMINATED};

use super::bm25::{bm25_idf, bm25_score, bm25_upper_bound};
use super::{DocSet, LeadCost, Query, ScoreMode, Scorer, ScorerSupplier};

/// Term query - matches documents containing a specific term
#[derive(Debug, Clone)]
pub struct TermQuery {
    pub term: String,
}

impl TermQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}

impl fmt::Display for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({:?})", self.term)
    }
}

impl Query for TermQuery {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        _config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        let Some(postings) = segment.postings(&self.term) else {
            return Ok(None);
        };
        Ok(Some(Box::new(TermScorerSupplier {
            term: self.term.clone(),
            postings: Arc::clone(postings),
            stats: Bm25Stats::for_term(segment, postings),
            score_mode,
            top_level: false,
        })))
    }
}

/// Per-segment statistics a term scorer needs
#[derive(Debug, Clone)]
struct Bm25Stats {
    idf: f32,
    avg_doc_len: f32,
    doc_lengths: Arc<[u32]>,
}

impl Bm25Stats {
    fn for_term(segment: &Segment, postings: &PostingList) -> Self {
        Self {
            idf: bm25_idf(postings.len() as f32, segment.max_doc() as f32),
            avg_doc_len: segment.avg_doc_len(),
            doc_lengths: Arc::clone(segment.doc_lengths()),
        }
    }
}

/// Supplier of a single term's scorer
pub struct TermScorerSupplier {
    term: String,
    postings: Arc<PostingList>,
    stats: Bm25Stats,
    score_mode: ScoreMode,
    top_level: bool,
}

impl ScorerSupplier for TermScorerSupplier {
    fn cost(&self) -> Cost {
        self.postings.len() as Cost
    }

    fn scorer(self: Box<Self>, lead_cost: LeadCost) -> Result<Box<dyn Scorer>> {
        // Only a top-level clause may drop non-competitive docs
        let prune = self.top_level && self.score_mode == ScoreMode::TopScores;
        trace!(
            "TermScorer {:?}: cost={}, lead_cost={}, prune={}",
            self.term,
            self.postings.len(),
            lead_cost,
            prune
        );
        Ok(Box::new(TermScorer::new(self.postings, self.stats, prune)))
    }

    fn set_top_level_scoring_clause(&mut self) {
        self.top_level = true;
    }
}

/// BM25 scorer over one posting list
pub struct TermScorer {
    postings: Arc<PostingList>,
    pos: usize,
    stats: Bm25Stats,
    max_score: Score,
    prune: bool,
    min_competitive: Score,
}

impl TermScorer {
    fn new(postings: Arc<PostingList>, stats: Bm25Stats, prune: bool) -> Self {
        let max_score = bm25_upper_bound(postings.max_tf() as f32, stats.idf);
        Self {
            postings,
            pos: 0,
            stats,
            max_score,
            prune,
            min_competitive: 0.0,
        }
    }

    fn score_at(&self, pos: usize) -> Score {
        let doc = self.postings.doc_ids()[pos];
        let tf = self.postings.term_freqs()[pos] as f32;
        let doc_len = self
            .stats
            .doc_lengths
            .get(doc as usize)
            .copied()
            .unwrap_or(0) as f32;
        bm25_score(tf, self.stats.idf, doc_len, self.stats.avg_doc_len)
    }

    /// Move forward from `pos` past docs that cannot compete
    fn skip_non_competitive(&mut self) {
        if !self.prune || self.min_competitive <= 0.0 {
            return;
        }
        while self.pos < self.postings.len() && self.score_at(self.pos) < self.min_competitive {
            self.pos += 1;
        }
    }
}

impl DocSet for TermScorer {
    #[inline]
    fn doc(&self) -> DocId {
        self.postings
            .doc_ids()
            .get(self.pos)
            .copied()
            .unwrap_or(TERMINATED)
    }

    fn advance(&mut self) -> DocId {
        if self.pos < self.postings.len() {
            self.pos += 1;
        }
        self.skip_non_competitive();
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let doc_ids = self.postings.doc_ids();
        if self.pos >= doc_ids.len() {
            return TERMINATED;
        }
        self.pos += doc_ids[self.pos..].partition_point(|&d| d < target);
        self.skip_non_competitive();
        self.doc()
    }

    fn cost(&self) -> Cost {
        self.postings.len() as Cost
    }
}

impl Scorer for TermScorer {
    fn score(&self) -> Score {
        if self.pos >= self.postings.len() {
            return 0.0;
        }
        self.score_at(self.pos)
    }

    fn max_score(&self) -> Score {
        self.max_score
    }

    fn set_min_competitive_score(&mut self, min_score: Score) {
        if !self.prune || min_score <= self.min_competitive {
            return;
        }
        self.min_competitive = min_score;
        if self.max_score < min_score {
            self.pos = self.postings.len();
        } else {
            self.skip_non_competitive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentBuilder;

    fn segment() -> Segment {
        let mut builder = SegmentBuilder::new(1);
        builder.add_document(["rust", "fast"]).unwrap();
        builder.add_document(["python"]).unwrap();
        builder.add_document(["rust", "rust", "rust", "safe"]).unwrap();
        builder.add_document(["rust"]).unwrap();
        builder.build()
    }

    fn term_scorer(segment: &Segment, term: &str, top_level: bool) -> Box<dyn Scorer> {
        let mut supplier = TermQuery::new(term)
            .scorer_supplier(segment, ScoreMode::TopScores, &ExecutionConfig::default())
            .unwrap()
            .unwrap();
        if top_level {
            supplier.set_top_level_scoring_clause();
        }
        assert_eq!(supplier.cost(), segment.postings(term).unwrap().len() as Cost);
        supplier.scorer(LeadCost::Unbounded).unwrap()
    }

    #[test]
    fn test_term_scorer_iterates_postings() {
        let segment = segment();
        let mut scorer = term_scorer(&segment, "rust", false);
        assert_eq!(scorer.doc(), 0);
        assert_eq!(scorer.cost(), 3);
        assert_eq!(scorer.advance(), 2);
        assert!(scorer.score() > 0.0);
        assert!(scorer.score() <= scorer.max_score());
        assert_eq!(scorer.seek(3), 3);
        assert_eq!(scorer.advance(), TERMINATED);
    }

    #[test]
    fn test_missing_term_has_no_supplier() {
        let segment = segment();
        let supplier = TermQuery::new("java")
            .scorer_supplier(&segment, ScoreMode::Complete, &ExecutionConfig::default())
            .unwrap();
        assert!(supplier.is_none());
    }

    #[test]
    fn test_min_competitive_score_only_for_top_level() {
        let segment = segment();

        let mut scorer = term_scorer(&segment, "rust", false);
        scorer.set_min_competitive_score(f32::MAX);
        assert_eq!(scorer.doc(), 0);

        let mut scorer = term_scorer(&segment, "rust", true);
        let bound = scorer.max_score();
        scorer.set_min_competitive_score(bound * 2.0);
        assert_eq!(scorer.doc(), TERMINATED);
    }

    #[test]
    fn test_top_level_skips_low_scores() {
        let segment = segment();
        let mut plain = term_scorer(&segment, "rust", false);
        let mut scores = Vec::new();
        while plain.doc() != TERMINATED {
            scores.push((plain.doc(), plain.score()));
            plain.advance();
        }
        let best = scores
            .iter()
            .copied()
            .fold((TERMINATED, f32::MIN), |acc, s| if s.1 > acc.1 { s } else { acc });

        let mut pruned = term_scorer(&segment, "rust", true);
        pruned.set_min_competitive_score(best.1);
        assert_eq!(pruned.doc(), best.0);
        assert_eq!(pruned.advance(), TERMINATED);
    }
}
