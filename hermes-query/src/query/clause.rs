//! Clause roles and per-segment clause groups

use std::fmt;

use crate::Cost;

use super::ScorerSupplier;

/// Role of a clause in a boolean query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// Required, contributes to the score
    Must,
    /// Required, does not contribute to the score
    Filter,
    /// Optional, contributes to the score, subject to minimum-should-match
    Should,
    /// Prohibited
    MustNot,
}

impl Occur {
    pub const ALL: [Occur; 4] = [Occur::Must, Occur::Filter, Occur::Should, Occur::MustNot];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Occur::Must => 0,
            Occur::Filter => 1,
            Occur::Should => 2,
            Occur::MustNot => 3,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Occur::Must | Occur::Filter)
    }

    pub fn is_scoring(self) -> bool {
        matches!(self, Occur::Must | Occur::Should)
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Occur::Must => "+",
            Occur::Filter => "#",
            Occur::Should => "",
            Occur::MustNot => "-",
        };
        f.write_str(prefix)
    }
}

/// A clause supplier together with its role
pub struct Clause {
    pub occur: Occur,
    pub supplier: Box<dyn ScorerSupplier>,
}

impl Clause {
    pub fn new(occur: Occur, supplier: impl ScorerSupplier + 'static) -> Self {
        Self {
            occur,
            supplier: Box::new(supplier),
        }
    }
}

/// Clause counts of a group, everything the planner needs to pick a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClauseShape {
    pub must: usize,
    pub filter: usize,
    pub should: usize,
    pub must_not: usize,
    pub min_should_match: usize,
}

impl ClauseShape {
    #[inline]
    pub fn num_required(&self) -> usize {
        self.must + self.filter
    }

    pub fn is_pure_conjunction(&self) -> bool {
        self.should == 0 && self.num_required() > 0
    }

    pub fn is_pure_disjunction(&self) -> bool {
        self.num_required() == 0 && self.should > 0
    }
}

/// Suppliers of one boolean query node on one segment, grouped by role
///
/// Insertion order within a role is kept; it only breaks ties between clauses
/// of equal cost.
#[derive(Default)]
pub struct ClauseGroup {
    slots: [Vec<Box<dyn ScorerSupplier>>; 4],
}

impl ClauseGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, occur: Occur, supplier: Box<dyn ScorerSupplier>) {
        self.slots[occur.slot()].push(supplier);
    }

    /// Builder-style `add`
    pub fn with(mut self, occur: Occur, supplier: impl ScorerSupplier + 'static) -> Self {
        self.add(occur, Box::new(supplier));
        self
    }

    pub fn get(&self, occur: Occur) -> &[Box<dyn ScorerSupplier>] {
        &self.slots[occur.slot()]
    }

    pub(crate) fn get_mut(&mut self, occur: Occur) -> &mut Vec<Box<dyn ScorerSupplier>> {
        &mut self.slots[occur.slot()]
    }

    /// Remove and return all suppliers of a role
    pub(crate) fn take(&mut self, occur: Occur) -> Vec<Box<dyn ScorerSupplier>> {
        std::mem::take(self.get_mut(occur))
    }

    pub fn len(&self, occur: Occur) -> usize {
        self.get(occur).len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    pub fn num_required(&self) -> usize {
        self.len(Occur::Must) + self.len(Occur::Filter)
    }

    pub fn has_positive_clause(&self) -> bool {
        self.num_required() + self.len(Occur::Should) > 0
    }

    pub fn costs(&self, occur: Occur) -> Vec<Cost> {
        self.get(occur).iter().map(|s| s.cost()).collect()
    }

    /// Costs of MUST then FILTER clauses
    pub fn required_costs(&self) -> Vec<Cost> {
        self.get(Occur::Must)
            .iter()
            .chain(self.get(Occur::Filter))
            .map(|s| s.cost())
            .collect()
    }

    pub fn shape(&self, min_should_match: usize) -> ClauseShape {
        ClauseShape {
            must: self.len(Occur::Must),
            filter: self.len(Occur::Filter),
            should: self.len(Occur::Should),
            must_not: self.len(Occur::MustNot),
            min_should_match,
        }
    }
}

impl FromIterator<Clause> for ClauseGroup {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        let mut group = ClauseGroup::new();
        for clause in iter {
            group.add(clause.occur, clause.supplier);
        }
        group
    }
}

impl fmt::Debug for ClauseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClauseGroup")
            .field("must", &self.costs(Occur::Must))
            .field("filter", &self.costs(Occur::Filter))
            .field("should", &self.costs(Occur::Should))
            .field("must_not", &self.costs(Occur::MustNot))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{EmptyScorer, LeadCost, Scorer};

    struct CostOnly(Cost);

    impl ScorerSupplier for CostOnly {
        fn cost(&self) -> Cost {
            self.0
        }

        fn scorer(self: Box<Self>, _lead_cost: LeadCost) -> crate::Result<Box<dyn Scorer>> {
            Ok(Box::new(EmptyScorer))
        }
    }

    #[test]
    fn test_group_by_role_keeps_insertion_order() {
        let group: ClauseGroup = [
            Clause::new(Occur::Should, CostOnly(3)),
            Clause::new(Occur::Must, CostOnly(10)),
            Clause::new(Occur::Should, CostOnly(1)),
            Clause::new(Occur::MustNot, CostOnly(7)),
            Clause::new(Occur::Filter, CostOnly(5)),
        ]
        .into_iter()
        .collect();

        assert_eq!(group.costs(Occur::Should), vec![3, 1]);
        assert_eq!(group.required_costs(), vec![10, 5]);
        assert_eq!(group.num_required(), 2);
        assert!(group.has_positive_clause());
        assert_eq!(
            group.shape(1),
            ClauseShape {
                must: 1,
                filter: 1,
                should: 2,
                must_not: 1,
                min_should_match: 1,
            }
        );
    }

    #[test]
    fn test_prohibited_only_group_has_no_positive_clause() {
        let group = ClauseGroup::new().with(Occur::MustNot, CostOnly(4));
        assert!(!group.has_positive_clause());
        assert!(!group.is_empty());
        assert!(ClauseGroup::new().is_empty());
    }

    #[test]
    fn test_occur_display() {
        let rendered: Vec<String> = Occur::ALL.iter().map(|o| o.to_string()).collect();
        assert_eq!(rendered, vec!["+", "#", "", "-"]);
    }
}
