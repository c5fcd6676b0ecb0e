//! Collectors: sinks for the matches a scorer or bulk scorer produces
//!
//! A collector may publish a minimum competitive score; scorers that are
//! allowed to prune use it to skip documents that cannot enter the results.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{DocId, Score};

/// Segment-local hit
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: Score,
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchResult {}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Better hits sort first: higher score, then lower doc id. The greatest
/// result is the least competitive one, so a `BinaryHeap<SearchResult>` keeps
/// the current worst hit on top.
impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Receives matches in ascending doc id order
pub trait Collector {
    fn collect(&mut self, doc_id: DocId, score: Score);

    /// Documents scoring below this value can no longer make it into the
    /// results. `None` means every match is needed.
    fn min_competitive_score(&self) -> Option<Score> {
        None
    }
}

/// Keeps the `k` best hits; among equal scores the earlier doc wins
pub struct TopKCollector {
    heap: BinaryHeap<SearchResult>,
    k: usize,
    total_seen: u32,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(k + 1),
            k,
            total_seen: 0,
        }
    }

    /// Number of docs passed to `collect`, competitive or not
    pub fn total_seen(&self) -> u32 {
        self.total_seen
    }

    /// Best hit first
    pub fn into_sorted_results(self) -> Vec<SearchResult> {
        self.heap.into_sorted_vec()
    }

    pub fn into_results_with_count(self) -> (Vec<SearchResult>, u32) {
        let seen = self.total_seen;
        (self.into_sorted_results(), seen)
    }
}

impl Collector for TopKCollector {
    fn collect(&mut self, doc_id: DocId, score: Score) {
        self.total_seen += 1;
        let hit = SearchResult { doc_id, score };
        if self.heap.len() < self.k {
            self.heap.push(hit);
        } else if let Some(mut worst) = self.heap.peek_mut()
            && score > worst.score
        {
            *worst = hit;
        }
    }

    fn min_competitive_score(&self) -> Option<Score> {
        // Ties lose against the earlier doc already in the heap
        if self.k > 0 && self.heap.len() >= self.k {
            self.heap.peek().map(|worst| worst.score.next_up())
        } else {
            None
        }
    }
}

/// Counts matches, never lets scorers skip
#[derive(Default)]
pub struct CountCollector {
    count: u64,
}

impl CountCollector {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Collector for CountCollector {
    #[inline]
    fn collect(&mut self, _doc_id: DocId, _score: Score) {
        self.count += 1;
    }
}

/// Collector that keeps every match in visiting order
#[derive(Debug, Default)]
pub struct DocListCollector {
    scored: Vec<(DocId, Score)>,
}

impl DocListCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docs(&self) -> Vec<DocId> {
        self.scored.iter().map(|&(doc, _)| doc).collect()
    }

    /// (doc, score) pairs in visiting order
    pub fn scored(&self) -> &[(DocId, Score)] {
        &self.scored
    }

    pub fn into_scored(self) -> Vec<(DocId, Score)> {
        self.scored
    }
}

impl Collector for DocListCollector {
    #[inline]
    fn collect(&mut self, doc_id: DocId, score: Score) {
        self.scored.push((doc_id, score));
    }
}

/// Feeds two collectors at once
impl<A: Collector, B: Collector> Collector for (&mut A, &mut B) {
    fn collect(&mut self, doc_id: DocId, score: Score) {
        self.0.collect(doc_id, score);
        self.1.collect(doc_id, score);
    }

    /// Skipping is only allowed when both collectors allow it
    fn min_competitive_score(&self) -> Option<Score> {
        match (self.0.min_competitive_score(), self.1.min_competitive_score()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            _ => None,
        }
    }
}
