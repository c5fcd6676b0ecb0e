//! Lead-cost negotiation
//!
//! A composition decides, before materializing anything, which lead cost each
//! of its clauses receives. These functions hold those rules so the boolean
//! supplier, its tests and nested compositions agree on them.

use crate::Cost;

use super::cost::conjunction_cost;
use super::{ClauseShape, LeadCost, Occur, ScoreMode};

/// Lead cost handed to every sub-clause of a per-document composition.
///
/// The consumer never drives more than `consumer` documents and the
/// composition never produces more than its own `cost`, so the smaller of the
/// two bounds the iteration of every clause, prohibited ones included.
#[inline]
pub fn scorer_lead_cost(consumer: LeadCost, cost: Cost) -> LeadCost {
    consumer.min_cost(cost)
}

/// Lead cost of the clauses of a required-bulk conjunction: the cheapest
/// required clause drives.
pub fn required_bulk_lead_cost(required_costs: &[Cost]) -> LeadCost {
    conjunction_cost(required_costs.iter().copied()).map_or(LeadCost::Unbounded, LeadCost::Bounded)
}

/// Clauses of an optional-bulk disjunction are each iterated to exhaustion.
pub const OPTIONAL_BULK_LEAD_COST: LeadCost = LeadCost::Unbounded;

/// Prohibited clauses of a bulk composition are probed once per positive match.
#[inline]
pub fn prohibited_lead_cost(positive_cost: Cost) -> LeadCost {
    LeadCost::Bounded(positive_cost)
}

/// The only clause whose score is the whole top-level score, if any.
///
/// Only `TopScores` consumers publish a minimum competitive score, so no
/// clause is flagged under any other mode.
pub fn top_level_scoring_clause(shape: &ClauseShape, score_mode: ScoreMode) -> Option<Occur> {
    if score_mode != ScoreMode::TopScores {
        return None;
    }
    match (shape.must, shape.filter, shape.should) {
        (1, _, 0) => Some(Occur::Must),
        (0, 0, 1) => Some(Occur::Should),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(must: usize, filter: usize, should: usize, must_not: usize) -> ClauseShape {
        ClauseShape {
            must,
            filter,
            should,
            must_not,
            min_should_match: 0,
        }
    }

    #[test]
    fn test_scorer_lead_cost_caps_at_cost() {
        assert_eq!(scorer_lead_cost(LeadCost::Unbounded, 12), LeadCost::Bounded(12));
        assert_eq!(scorer_lead_cost(LeadCost::Bounded(7), 12), LeadCost::Bounded(7));
        assert_eq!(scorer_lead_cost(LeadCost::Bounded(70), 12), LeadCost::Bounded(12));
    }

    #[test]
    fn test_bulk_lead_costs() {
        assert_eq!(required_bulk_lead_cost(&[42, 12, 20]), LeadCost::Bounded(12));
        assert_eq!(required_bulk_lead_cost(&[]), LeadCost::Unbounded);
        assert_eq!(OPTIONAL_BULK_LEAD_COST, LeadCost::Unbounded);
        assert_eq!(prohibited_lead_cost(30), LeadCost::Bounded(30));
    }

    #[test]
    fn test_top_level_clause_selection() {
        let top = ScoreMode::TopScores;
        assert_eq!(top_level_scoring_clause(&shape(1, 0, 0, 0), top), Some(Occur::Must));
        assert_eq!(top_level_scoring_clause(&shape(1, 1, 0, 0), top), Some(Occur::Must));
        assert_eq!(top_level_scoring_clause(&shape(1, 0, 0, 2), top), Some(Occur::Must));
        assert_eq!(top_level_scoring_clause(&shape(0, 0, 1, 0), top), Some(Occur::Should));
        assert_eq!(top_level_scoring_clause(&shape(0, 0, 1, 1), top), Some(Occur::Should));

        assert_eq!(top_level_scoring_clause(&shape(2, 0, 0, 0), top), None);
        assert_eq!(top_level_scoring_clause(&shape(0, 0, 2, 0), top), None);
        assert_eq!(top_level_scoring_clause(&shape(0, 2, 0, 0), top), None);
        assert_eq!(top_level_scoring_clause(&shape(1, 0, 1, 0), top), None);
        assert_eq!(top_level_scoring_clause(&shape(0, 1, 1, 0), top), None);
    }

    #[test]
    fn test_top_level_clause_needs_top_scores() {
        for mode in ScoreMode::ALL {
            if mode == ScoreMode::TopScores {
                continue;
            }
            assert_eq!(top_level_scoring_clause(&shape(1, 0, 0, 0), mode), None);
            assert_eq!(top_level_scoring_clause(&shape(0, 0, 1, 0), mode), None);
        }
    }
}
