//! Disjunction of optional clauses, with an optional minimum-should-match

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

use crate::{Cost, DocId, Score, TERMINATED};

use super::cost::{cost_with_min_should_match, disjunction_cost};
use super::{DocSet, Scorer};

/// Union of SHOULD scorers
///
/// Sub-scorers sit in a min-heap keyed by their current doc. A doc matches
/// when at least `min_should_match` (at least one) sub-scorers are on it; its
/// score is the sum of the scores of those sub-scorers.
pub struct DisjunctionScorer {
    scorers: Vec<Box<dyn Scorer>>,
    /// (doc, scorer index) of every positioned sub-scorer not on the current doc
    heap: BinaryHeap<Reverse<(DocId, usize)>>,
    /// Sub-scorers positioned on the current doc, in ascending index order
    matching: Vec<usize>,
    min_should_match: usize,
    cost: Cost,
    doc: DocId,
}

impl DisjunctionScorer {
    pub fn new(scorers: Vec<Box<dyn Scorer>>, min_should_match: usize) -> Self {
        let costs = scorers.iter().map(|s| s.cost());
        let cost = if min_should_match <= 1 {
            disjunction_cost(costs)
        } else {
            cost_with_min_should_match(costs, scorers.len(), min_should_match)
        };
        trace!(
            "DisjunctionScorer: {} clauses, min_should_match={}, cost={}",
            scorers.len(),
            min_should_match,
            cost
        );

        let heap = scorers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.doc() != TERMINATED)
            .map(|(i, s)| Reverse((s.doc(), i)))
            .collect();
        let mut disjunction = Self {
            scorers,
            heap,
            matching: Vec::new(),
            min_should_match: min_should_match.max(1),
            cost,
            doc: TERMINATED,
        };
        disjunction.settle();
        disjunction
    }

    /// Move to the smallest heap doc on which enough sub-scorers agree.
    fn settle(&mut self) {
        loop {
            let Some(&Reverse((doc, _))) = self.heap.peek() else {
                self.doc = TERMINATED;
                return;
            };
            while let Some(&Reverse((top, idx))) = self.heap.peek() {
                if top != doc {
                    break;
                }
                self.heap.pop();
                self.matching.push(idx);
            }
            if self.matching.len() >= self.min_should_match {
                self.doc = doc;
                return;
            }
            // Not enough clauses on this doc, none of them can contribute here
            let stragglers = std::mem::take(&mut self.matching);
            for idx in stragglers {
                self.reposition(idx, |s| s.advance());
            }
        }
    }

    #[inline]
    fn reposition(&mut self, idx: usize, step: impl FnOnce(&mut Box<dyn Scorer>) -> DocId) {
        let doc = step(&mut self.scorers[idx]);
        if doc != TERMINATED {
            self.heap.push(Reverse((doc, idx)));
        }
    }

    /// Number of sub-scorers matching the current doc
    pub fn num_matching(&self) -> usize {
        if self.doc == TERMINATED {
            0
        } else {
            self.matching.len()
        }
    }
}

impl DocSet for DisjunctionScorer {
    #[inline]
    fn doc(&self) -> DocId {
        self.doc
    }

    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let current = std::mem::take(&mut self.matching);
        for idx in current {
            self.reposition(idx, |s| s.advance());
        }
        self.settle();
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if target <= self.doc {
            return self.doc;
        }
        let mut behind = std::mem::take(&mut self.matching);
        while let Some(&Reverse((doc, idx))) = self.heap.peek() {
            if doc >= target {
                break;
            }
            self.heap.pop();
            behind.push(idx);
        }
        for idx in behind {
            self.reposition(idx, |s| s.seek(target));
        }
        self.settle();
        self.doc
    }

    fn cost(&self) -> Cost {
        self.cost
    }
}

impl Scorer for DisjunctionScorer {
    fn score(&self) -> Score {
        self.matching
            .iter()
            .map(|&idx| self.scorers[idx].score())
            .sum()
    }

    fn max_score(&self) -> Score {
        self.scorers.iter().map(|s| s.max_score()).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::query::{AllDocSet, ConstantScorer, SortedVecDocSet};

    fn docs(ids: &[DocId], score: Score) -> Box<dyn Scorer> {
        Box::new(ConstantScorer::new(
            SortedVecDocSet::new(Arc::new(ids.to_vec())),
            score,
        ))
    }

    fn collect_scored(scorer: &mut dyn Scorer) -> Vec<(DocId, Score)> {
        let mut out = Vec::new();
        let mut doc = scorer.doc();
        while doc != TERMINATED {
            out.push((doc, scorer.score()));
            doc = scorer.advance();
        }
        out
    }

    #[test]
    fn test_union_sums_scores() {
        let mut disj = DisjunctionScorer::new(
            vec![docs(&[1, 3, 5], 1.0), docs(&[3, 4], 2.0), docs(&[5, 9], 4.0)],
            0,
        );
        assert_eq!(
            collect_scored(&mut disj),
            vec![(1, 1.0), (3, 3.0), (4, 2.0), (5, 5.0), (9, 4.0)]
        );
        assert_eq!(disj.advance(), TERMINATED);
    }

    #[test]
    fn test_min_should_match() {
        let mut disj = DisjunctionScorer::new(
            vec![
                docs(&[1, 2, 3, 7], 1.0),
                docs(&[2, 3, 8], 1.0),
                docs(&[3, 7, 8], 1.0),
            ],
            2,
        );
        let matched: Vec<DocId> = collect_scored(&mut disj).into_iter().map(|(d, _)| d).collect();
        assert_eq!(matched, vec![2, 3, 7, 8]);
    }

    #[test]
    fn test_min_should_match_all_clauses() {
        let mut disj = DisjunctionScorer::new(
            vec![docs(&[1, 2, 3, 7], 1.0), docs(&[2, 3, 8], 1.0), docs(&[3, 7, 8], 1.0)],
            3,
        );
        assert_eq!(disj.doc(), 3);
        assert_eq!(disj.num_matching(), 3);
        assert_eq!(disj.score(), 3.0);
        assert_eq!(disj.advance(), TERMINATED);
        assert_eq!(disj.num_matching(), 0);
    }

    #[test]
    fn test_seek() {
        let mut disj = DisjunctionScorer::new(vec![docs(&[1, 10, 20], 1.0), docs(&[5, 15], 1.0)], 0);
        assert_eq!(disj.seek(6), 10);
        assert_eq!(disj.seek(2), 10);
        assert_eq!(disj.seek(15), 15);
        assert_eq!(disj.seek(16), 20);
        assert_eq!(disj.seek(21), TERMINATED);
    }

    #[test]
    fn test_costs() {
        let scorers = || -> Vec<Box<dyn Scorer>> {
            [42, 12, 20]
                .into_iter()
                .map(|n| Box::new(ConstantScorer::new(AllDocSet::new(n), 1.0)) as Box<dyn Scorer>)
                .collect()
        };
        assert_eq!(DisjunctionScorer::new(scorers(), 0).cost(), 74);
        assert_eq!(DisjunctionScorer::new(scorers(), 1).cost(), 74);
        assert_eq!(DisjunctionScorer::new(scorers(), 2).cost(), 32);
        assert_eq!(DisjunctionScorer::new(scorers(), 3).cost(), 12);
        assert_eq!(DisjunctionScorer::new(scorers(), 0).max_score(), 3.0);
    }

    #[test]
    fn test_empty() {
        let disj = DisjunctionScorer::new(vec![], 0);
        assert_eq!(disj.doc(), TERMINATED);
        assert_eq!(disj.cost(), 0);
    }
}
