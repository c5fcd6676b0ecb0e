//! Bulk scorers: visit matches a range (window) at a time
//!
//! A bulk scorer pushes every match of a doc id range into a [`Collector`]
//! instead of being pulled one doc at a time. Disjunctions profit most: all
//! clauses are drained into a window of buckets, which replaces the per-doc
//! heap maintenance of [`DisjunctionScorer`](super::DisjunctionScorer).

use log::trace;

use crate::{Cost, DocId, Score, TERMINATED};

use super::cost::{cost_with_min_should_match, disjunction_cost};
use super::{Collector, DocSet, Scorer};

/// Scores documents of a doc id range into a collector
pub trait BulkScorer: Send {
    /// Collect all matches in `[min, max)`.
    ///
    /// Returns the first candidate doc at or after `max`, or [`TERMINATED`]
    /// when there is none. Ranges must be requested in ascending order.
    fn score_range(&mut self, collector: &mut dyn Collector, min: DocId, max: DocId) -> DocId;

    /// Same value as the cost of the per-document scorer of the same clause
    fn cost(&self) -> Cost;

    /// Collect every match.
    fn score_all(&mut self, collector: &mut dyn Collector) {
        self.score_range(collector, 0, TERMINATED);
    }
}

// ── DefaultBulkScorer ────────────────────────────────────────────────────

/// Drives a per-document scorer over a range.
///
/// The collector's minimum competitive score is forwarded to the scorer
/// whenever it rises, so top-level scoring clauses can skip.
pub struct DefaultBulkScorer {
    scorer: Box<dyn Scorer>,
    min_competitive: Option<Score>,
}

impl DefaultBulkScorer {
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        Self {
            scorer,
            min_competitive: None,
        }
    }

    #[inline]
    fn update_min_competitive(&mut self, collector: &dyn Collector) {
        if let Some(min_score) = collector.min_competitive_score()
            && self.min_competitive.is_none_or(|prev| min_score > prev)
        {
            self.min_competitive = Some(min_score);
            self.scorer.set_min_competitive_score(min_score);
        }
    }
}

impl BulkScorer for DefaultBulkScorer {
    fn score_range(&mut self, collector: &mut dyn Collector, min: DocId, max: DocId) -> DocId {
        if self.scorer.doc() < min {
            self.scorer.seek(min);
        }
        loop {
            self.update_min_competitive(collector);
            let doc = self.scorer.doc();
            if doc >= max {
                return doc;
            }
            collector.collect(doc, self.scorer.score());
            self.scorer.advance();
        }
    }

    fn cost(&self) -> Cost {
        self.scorer.cost()
    }
}

// ── DisjunctionBulkScorer ────────────────────────────────────────────────

/// Window-at-a-time disjunction over SHOULD scorers
///
/// For each window every clause is drained into per-doc buckets (match bit,
/// match count, score sum). Buckets with at least `min_should_match` matches
/// are then collected in doc order.
pub struct DisjunctionBulkScorer {
    scorers: Vec<Box<dyn Scorer>>,
    min_should_match: usize,
    window_size: usize,
    matched: Vec<u64>,
    counts: Vec<u32>,
    scores: Vec<Score>,
    cost: Cost,
}

impl DisjunctionBulkScorer {
    pub fn new(scorers: Vec<Box<dyn Scorer>>, min_should_match: usize, window_size: usize) -> Self {
        let window_size = window_size.max(1);
        let min_should_match = min_should_match.max(1);
        let costs = scorers.iter().map(|s| s.cost());
        let cost = if min_should_match == 1 {
            disjunction_cost(costs)
        } else {
            cost_with_min_should_match(costs, scorers.len(), min_should_match)
        };
        trace!(
            "DisjunctionBulkScorer: {} clauses, min_should_match={}, window={}",
            scorers.len(),
            min_should_match,
            window_size
        );
        Self {
            scorers,
            min_should_match,
            window_size,
            matched: vec![0; window_size.div_ceil(64)],
            counts: vec![0; window_size],
            scores: vec![0.0; window_size],
            cost,
        }
    }

    /// Smallest doc at or after `target` among all clauses
    fn next_candidate(&mut self, target: DocId) -> DocId {
        let mut next = TERMINATED;
        for scorer in &mut self.scorers {
            let mut doc = scorer.doc();
            if doc < target {
                doc = scorer.seek(target);
            }
            next = next.min(doc);
        }
        next
    }

    fn fill_window(&mut self, base: DocId, end: DocId) {
        for scorer in &mut self.scorers {
            let mut doc = scorer.doc();
            while doc < end {
                let slot = (doc - base) as usize;
                self.matched[slot / 64] |= 1u64 << (slot % 64);
                self.counts[slot] += 1;
                self.scores[slot] += scorer.score();
                doc = scorer.advance();
            }
        }
    }

    fn flush_window(&mut self, base: DocId, collector: &mut dyn Collector) {
        for (word_idx, word) in self.matched.iter_mut().enumerate() {
            let mut bits = std::mem::take(word);
            while bits != 0 {
                let slot = word_idx * 64 + bits.trailing_zeros() as usize;
                bits &= bits - 1;
                if self.counts[slot] as usize >= self.min_should_match {
                    collector.collect(base + slot as DocId, self.scores[slot]);
                }
                self.counts[slot] = 0;
                self.scores[slot] = 0.0;
            }
        }
    }
}

impl BulkScorer for DisjunctionBulkScorer {
    fn score_range(&mut self, collector: &mut dyn Collector, min: DocId, max: DocId) -> DocId {
        let mut base = self.next_candidate(min);
        while base < max {
            let end = base.saturating_add(self.window_size as DocId).min(max);
            self.fill_window(base, end);
            self.flush_window(base, collector);
            base = self.next_candidate(end);
        }
        base
    }

    fn cost(&self) -> Cost {
        self.cost
    }
}
