//! Cost model for boolean compositions
//!
//! Pure functions over clause costs; nothing is materialized. The composed
//! scorers report their own cost through the same functions, which keeps the
//! estimate of a supplier and the cost of the scorer it produces equal.

use std::collections::BinaryHeap;

use crate::Cost;

/// Cost of a conjunction: the cheapest clause bounds the intersection.
///
/// `None` when there is no clause.
pub fn conjunction_cost(costs: impl IntoIterator<Item = Cost>) -> Option<Cost> {
    costs.into_iter().min()
}

/// Cost of a disjunction: saturating sum of clause costs.
pub fn disjunction_cost(costs: impl IntoIterator<Item = Cost>) -> Cost {
    costs.into_iter().fold(0, Cost::saturating_add)
}

/// Cost of a disjunction of `num_clauses` clauses of which at least
/// `min_should_match` must match.
///
/// A document matching `m` of `k` clauses matches at least one clause out of
/// any `k - m + 1` of them, so the `k - m + 1` cheapest clauses bound the
/// number of matches. `min_should_match` of 0 or 1 is a plain disjunction.
pub fn cost_with_min_should_match(
    costs: impl IntoIterator<Item = Cost>,
    num_clauses: usize,
    min_should_match: usize,
) -> Cost {
    let keep = num_clauses.saturating_sub(min_should_match.max(1)) + 1;
    // Max-heap holding the `keep` cheapest costs seen so far
    let mut cheapest = BinaryHeap::with_capacity(keep + 1);
    for cost in costs {
        cheapest.push(cost);
        if cheapest.len() > keep {
            cheapest.pop();
        }
    }
    disjunction_cost(cheapest)
}

/// Total cost of a boolean composition.
///
/// `required` holds MUST and FILTER costs, `should` the SHOULD costs.
/// MUST_NOT clauses never reduce the cost and are not part of the input.
pub fn boolean_cost(required: &[Cost], should: &[Cost], min_should_match: usize) -> Cost {
    let min_required = conjunction_cost(required.iter().copied());
    match min_required {
        Some(required_cost) if min_should_match == 0 => required_cost,
        _ => {
            let should_cost =
                cost_with_min_should_match(should.iter().copied(), should.len(), min_should_match);
            min_required.map_or(should_cost, |required_cost| required_cost.min(should_cost))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjunction_is_min() {
        assert_eq!(conjunction_cost([42]), Some(42));
        assert_eq!(conjunction_cost([42, 12]), Some(12));
        assert_eq!(conjunction_cost([42, 12, 20]), Some(12));
        assert_eq!(conjunction_cost(std::iter::empty()), None);
    }

    #[test]
    fn test_disjunction_is_sum() {
        assert_eq!(disjunction_cost([42, 12, 20]), 74);
        assert_eq!(disjunction_cost([Cost::MAX, 5]), Cost::MAX);
        assert_eq!(disjunction_cost(std::iter::empty()), 0);
    }

    #[test]
    fn test_min_should_match_keeps_cheapest() {
        let costs = [42, 12, 20];
        assert_eq!(cost_with_min_should_match(costs, 3, 0), 74);
        assert_eq!(cost_with_min_should_match(costs, 3, 1), 74);
        assert_eq!(cost_with_min_should_match(costs, 3, 2), 32);
        assert_eq!(cost_with_min_should_match(costs, 3, 3), 12);

        let costs = [42, 12, 20, 30];
        assert_eq!(cost_with_min_should_match(costs, 4, 2), 12 + 20 + 30);
        assert_eq!(cost_with_min_should_match(costs, 4, 3), 12 + 20);
    }

    #[test]
    fn test_boolean_cost_shapes() {
        // pure conjunction
        assert_eq!(boolean_cost(&[42, 12, 20], &[], 0), 12);
        // required + scoring-only SHOULD: required side bounds the result
        assert_eq!(boolean_cost(&[42], &[100, 200], 0), 42);
        // pure disjunction
        assert_eq!(boolean_cost(&[], &[42, 12], 0), 54);
        // required + SHOULD with msm: both sides bound the result
        assert_eq!(boolean_cost(&[42], &[30, 5, 10], 2), 15);
        assert_eq!(boolean_cost(&[3], &[30, 5, 10], 2), 3);
    }

    #[test]
    fn test_saturating_sum_never_wraps() {
        let costs = [Cost::MAX - 1, Cost::MAX - 1, 3];
        assert_eq!(boolean_cost(&[], &costs, 0), Cost::MAX);
        assert_eq!(cost_with_min_should_match(costs, 3, 2), Cost::MAX);
    }
}
