//! Conjunction of required clauses

use log::trace;

use crate::{Cost, DocId, Score, TERMINATED};

use super::{DocSet, Scorer};

struct Required {
    scorer: Box<dyn Scorer>,
    scoring: bool,
}

/// Intersection of MUST and FILTER scorers
///
/// The cheapest scorer leads: its candidate is probed on every other scorer
/// with `seek`, and as soon as one of them lands past the candidate the leader
/// jumps there and probing restarts. The score is the sum of the scoring
/// (non-filter) scorers.
pub struct ConjunctionScorer {
    lead: Required,
    /// Remaining scorers in ascending cost order
    others: Vec<Required>,
    num_scoring: usize,
    doc: DocId,
}

impl ConjunctionScorer {
    /// `scoring` scorers contribute to the score, `filters` only restrict the doc set.
    /// At least one scorer is required.
    pub fn new(scoring: Vec<Box<dyn Scorer>>, filters: Vec<Box<dyn Scorer>>) -> Self {
        debug_assert!(
            !scoring.is_empty() || !filters.is_empty(),
            "conjunction needs at least one scorer"
        );
        let num_scoring = scoring.len();
        let mut all: Vec<Required> = scoring
            .into_iter()
            .map(|scorer| Required {
                scorer,
                scoring: true,
            })
            .chain(filters.into_iter().map(|scorer| Required {
                scorer,
                scoring: false,
            }))
            .collect();
        // Stable: equal costs keep insertion order
        all.sort_by_key(|r| r.scorer.cost());

        let mut others = all.into_iter();
        let Some(lead) = others.next() else {
            return Self {
                lead: Required {
                    scorer: Box::new(super::EmptyScorer),
                    scoring: false,
                },
                others: Vec::new(),
                num_scoring: 0,
                doc: TERMINATED,
            };
        };
        trace!(
            "ConjunctionScorer: lead cost={}, {} probed clauses",
            lead.scorer.cost(),
            others.len()
        );

        let mut conjunction = Self {
            lead,
            others: others.collect(),
            num_scoring,
            doc: TERMINATED,
        };
        let first = conjunction.lead.scorer.doc();
        conjunction.doc = conjunction.align(first);
        conjunction
    }

    /// Starting from the leader's `doc`, find the first doc every scorer agrees on.
    fn align(&mut self, mut doc: DocId) -> DocId {
        'advance_lead: loop {
            if doc == TERMINATED {
                return TERMINATED;
            }
            for other in &mut self.others {
                let mut other_doc = other.scorer.doc();
                if other_doc < doc {
                    other_doc = other.scorer.seek(doc);
                }
                if other_doc > doc {
                    doc = self.lead.scorer.seek(other_doc);
                    continue 'advance_lead;
                }
            }
            return doc;
        }
    }

    fn scorers(&self) -> impl Iterator<Item = &Required> {
        std::iter::once(&self.lead).chain(self.others.iter())
    }
}

impl DocSet for ConjunctionScorer {
    #[inline]
    fn doc(&self) -> DocId {
        self.doc
    }

    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let next = self.lead.scorer.advance();
        self.doc = self.align(next);
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if target <= self.doc {
            return self.doc;
        }
        let next = self.lead.scorer.seek(target);
        self.doc = self.align(next);
        self.doc
    }

    fn cost(&self) -> Cost {
        self.lead.scorer.cost()
    }
}

impl Scorer for ConjunctionScorer {
    fn score(&self) -> Score {
        self.scorers()
            .filter(|r| r.scoring)
            .map(|r| r.scorer.score())
            .sum()
    }

    fn max_score(&self) -> Score {
        self.scorers()
            .filter(|r| r.scoring)
            .map(|r| r.scorer.max_score())
            .sum()
    }

    fn set_min_competitive_score(&mut self, min_score: Score) {
        // Safe to forward only when a single scorer makes up the whole score
        if self.num_scoring != 1 || self.doc == TERMINATED {
            return;
        }
        let scoring = if self.lead.scoring {
            &mut self.lead
        } else if let Some(other) = self.others.iter_mut().find(|r| r.scoring) {
            other
        } else {
            return;
        };
        scoring.scorer.set_min_competitive_score(min_score);

        // The scoring clause may have skipped ahead of the agreed doc
        let skipped_to = scoring.scorer.doc();
        if skipped_to != self.doc {
            let next = if skipped_to == TERMINATED {
                TERMINATED
            } else {
                self.lead.scorer.seek(skipped_to)
            };
            self.doc = self.align(next);
        }
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

    fn collect(scorer: &mut dyn Scorer) -> Vec<DocId> {
        let mut out = Vec::new();
        let mut doc = scorer.doc();
        while doc != TERMINATED {
            out.push(doc);
            doc = scorer.advance();
        }
        out
    }

    #[test]
    fn test_intersection() {
        let mut conj = ConjunctionScorer::new(
            vec![docs(&[1, 3, 5, 7, 9], 1.0), docs(&[2, 3, 5, 8, 9, 10], 2.0)],
            vec![],
        );
        assert_eq!(conj.doc(), 3);
        assert_eq!(conj.score(), 3.0);
        assert_eq!(collect(&mut conj), vec![3, 5, 9]);
    }

    #[test]
    fn test_disjoint_is_empty() {
        let conj = ConjunctionScorer::new(vec![docs(&[1, 3, 5], 1.0)], vec![docs(&[2, 4, 6], 1.0)]);
        assert_eq!(conj.doc(), TERMINATED);
    }

    #[test]
    fn test_filters_do_not_score() {
        let mut conj = ConjunctionScorer::new(
            vec![docs(&[1, 5, 10, 20, 30], 2.0)],
            vec![docs(&[5, 10, 15, 20, 25, 30], 7.0)],
        );
        assert_eq!(conj.doc(), 5);
        assert_eq!(conj.score(), 2.0);
        assert_eq!(conj.max_score(), 2.0);
        assert_eq!(conj.seek(15), 20);
        assert_eq!(conj.seek(3), 20);
        assert_eq!(conj.advance(), 30);
        assert_eq!(conj.advance(), TERMINATED);
        assert_eq!(conj.advance(), TERMINATED);
    }

    #[test]
    fn test_cost_is_cheapest_clause() {
        let conj = ConjunctionScorer::new(
            vec![
                Box::new(ConstantScorer::new(AllDocSet::new(42), 1.0)),
                Box::new(ConstantScorer::new(AllDocSet::new(12), 1.0)),
            ],
            vec![Box::new(ConstantScorer::new(AllDocSet::new(20), 1.0))],
        );
        assert_eq!(conj.cost(), 12);
        assert_eq!(conj.max_score(), 2.0);
    }

    #[test]
    fn test_all_docs_intersection_produces_cost_docs() {
        let mut conj = ConjunctionScorer::new(
            vec![Box::new(ConstantScorer::new(AllDocSet::new(42), 1.0))],
            vec![Box::new(ConstantScorer::new(AllDocSet::new(17), 1.0))],
        );
        assert_eq!(collect(&mut conj).len() as Cost, conj.cost());
    }

    #[test]
    fn test_min_competitive_score_moves_conjunction() {
        // Scoring clause leads and gives up entirely
        let mut conj = ConjunctionScorer::new(
            vec![docs(&[1, 4, 9], 1.0)],
            vec![docs(&[0, 1, 2, 4, 6, 9], 1.0)],
        );
        assert_eq!(conj.doc(), 1);
        conj.set_min_competitive_score(2.0);
        assert_eq!(conj.doc(), TERMINATED);
        assert_eq!(conj.advance(), TERMINATED);

        // A cheaper filter leads the scoring clause
        let mut conj = ConjunctionScorer::new(
            vec![docs(&[1, 2, 3, 4, 5, 6], 1.0)],
            vec![docs(&[3, 6], 1.0)],
        );
        assert_eq!(conj.doc(), 3);
        conj.set_min_competitive_score(0.5);
        assert_eq!(conj.doc(), 3);
        conj.set_min_competitive_score(1.5);
        assert_eq!(conj.doc(), TERMINATED);
    }

    #[test]
    fn test_three_way_with_late_agreement() {
        let mut conj = ConjunctionScorer::new(
            vec![
                docs(&[1, 4, 8, 12, 16, 20], 1.0),
                docs(&[2, 4, 6, 12, 14, 20], 1.0),
            ],
            vec![docs(&[3, 6, 9, 12, 15, 18, 20], 1.0)],
        );
        assert_eq!(collect(&mut conj), vec![12, 20]);
    }
}
