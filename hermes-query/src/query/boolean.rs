//! Boolean query with MUST, FILTER, SHOULD and MUST_NOT clauses
//!
//! [`BooleanQuery`] resolves its clauses against a segment into a
//! [`ClauseGroup`]; [`BooleanScorerSupplier`] turns the group into one scorer
//! or bulk scorer. Planning order:
//!   1. Validate the group and drop clauses that cannot matter
//!   2. Compute the cost from the clause costs alone
//!   3. On materialization pass each clause its lead cost, then compose
//!      conjunction / disjunction / required-optional / exclusion scorers

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::ExecutionConfig;
use crate::segment::Segment;
use crate::{Cost, Error, Result};

use super::cost::boolean_cost;
use super::lead_cost::{
    OPTIONAL_BULK_LEAD_COST, prohibited_lead_cost, required_bulk_lead_cost, scorer_lead_cost,
    top_level_scoring_clause,
};
use super::mode::{ExecutionMode, select_mode};
use super::{
    BulkScorer, ClauseGroup, ClauseShape, ConjunctionScorer, ConstantScorer, DefaultBulkScorer,
    DisjunctionBulkScorer, DisjunctionScorer, EmptyScorer, LeadCost, Occur, Query, ReqExclBulkScorer,
    ReqExclScorer, ReqOptScorer, ScoreMode, Scorer, ScorerSupplier,
};

// ── BooleanQuery ─────────────────────────────────────────────────────────

/// Boolean combination of sub-queries
#[derive(Default, Clone)]
pub struct BooleanQuery {
    pub clauses: Vec<(Occur, Arc<dyn Query>)>,
    pub minimum_should_match: usize,
}

impl fmt::Debug for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |occur: Occur| self.clauses.iter().filter(|(o, _)| *o == occur).count();
        f.debug_struct("BooleanQuery")
            .field("must_count", &count(Occur::Must))
            .field("filter_count", &count(Occur::Filter))
            .field("should_count", &count(Occur::Should))
            .field("must_not_count", &count(Occur::MustNot))
            .field("minimum_should_match", &self.minimum_should_match)
            .finish()
    }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boolean(")?;
        for (i, (occur, query)) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", occur, query)?;
        }
        write!(f, ")")?;
        if self.minimum_should_match > 0 {
            write!(f, "~{}", self.minimum_should_match)?;
        }
        Ok(())
    }
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, occur: Occur, query: Arc<dyn Query>) -> Self {
        self.clauses.push((occur, query));
        self
    }

    pub fn must(self, query: impl Query + 'static) -> Self {
        self.add(Occur::Must, Arc::new(query))
    }

    pub fn filter(self, query: impl Query + 'static) -> Self {
        self.add(Occur::Filter, Arc::new(query))
    }

    pub fn should(self, query: impl Query + 'static) -> Self {
        self.add(Occur::Should, Arc::new(query))
    }

    pub fn must_not(self, query: impl Query + 'static) -> Self {
        self.add(Occur::MustNot, Arc::new(query))
    }

    pub fn with_minimum_should_match(mut self, minimum_should_match: usize) -> Self {
        self.minimum_should_match = minimum_should_match;
        self
    }

    fn count(&self, occur: Occur) -> usize {
        self.clauses.iter().filter(|(o, _)| *o == occur).count()
    }

    /// Segment-independent checks
    pub fn validate(&self, config: &ExecutionConfig) -> Result<()> {
        if self.clauses.len() > config.max_clause_count {
            return Err(Error::TooManyClauses {
                count: self.clauses.len(),
                max: config.max_clause_count,
            });
        }
        let num_should = self.count(Occur::Should);
        if self.minimum_should_match > num_should {
            return Err(Error::InvalidMinShouldMatch {
                min_should_match: self.minimum_should_match,
                num_should,
            });
        }
        if self.clauses.iter().all(|(occur, _)| *occur == Occur::MustNot) {
            return Err(Error::NoPositiveClause);
        }
        Ok(())
    }
}

impl Query for BooleanQuery {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        score_mode: ScoreMode,
        config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        self.validate(config)?;
        let msm = self.minimum_should_match;

        let mut group = ClauseGroup::new();
        for (occur, query) in &self.clauses {
            let clause_mode = if occur.is_scoring() {
                score_mode
            } else {
                ScoreMode::CompleteNoScores
            };
            match query.scorer_supplier(segment, clause_mode, config)? {
                Some(supplier) => group.add(*occur, supplier),
                None if occur.is_required() => {
                    debug!("BooleanQuery: required clause {}{} matches nothing", occur, query);
                    return Ok(None);
                }
                // A missing SHOULD or MUST_NOT clause cannot add or remove matches
                None => {}
            }
        }

        if group.len(Occur::Should) < msm || !group.has_positive_clause() {
            return Ok(None);
        }

        // Single-clause unwrap
        let shape = group.shape(msm);
        if shape.filter == 0 && shape.must_not == 0 {
            if shape.must == 1
                && shape.should == 0
                && let Some(single) = group.take(Occur::Must).pop()
            {
                return Ok(Some(single));
            }
            if shape.must == 0
                && shape.should == 1
                && msm <= 1
                && let Some(single) = group.take(Occur::Should).pop()
            {
                return Ok(Some(single));
            }
        }

        let supplier =
            BooleanScorerSupplier::new(group, score_mode, msm, segment.max_doc(), config)?;
        Ok(Some(Box::new(supplier)))
    }
}

// ── BooleanScorerSupplier ────────────────────────────────────────────────

/// Scorer supplier of a boolean clause group on one segment
pub struct BooleanScorerSupplier {
    group: ClauseGroup,
    score_mode: ScoreMode,
    min_should_match: usize,
    max_doc: u32,
    config: ExecutionConfig,
    cost: Cost,
}

impl fmt::Debug for BooleanScorerSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BooleanScorerSupplier")
            .field("group", &self.group)
            .field("score_mode", &self.score_mode)
            .field("min_should_match", &self.min_should_match)
            .field("cost", &self.cost)
            .finish()
    }
}

impl BooleanScorerSupplier {
    /// Validate and classify a clause group.
    ///
    /// Fails with [`Error::InvalidMinShouldMatch`] when `min_should_match`
    /// exceeds the number of SHOULD clauses and with
    /// [`Error::NoPositiveClause`] when only MUST_NOT clauses are given.
    pub fn new(
        mut group: ClauseGroup,
        score_mode: ScoreMode,
        min_should_match: usize,
        max_doc: u32,
        config: &ExecutionConfig,
    ) -> Result<Self> {
        let num_should = group.len(Occur::Should);
        if min_should_match > num_should {
            return Err(Error::InvalidMinShouldMatch {
                min_should_match,
                num_should,
            });
        }
        if !group.has_positive_clause() {
            return Err(Error::NoPositiveClause);
        }

        // SHOULD clauses only contribute scores here
        if !score_mode.needs_scores() && min_should_match == 0 && group.num_required() > 0 {
            let dropped = group.take(Occur::Should);
            if !dropped.is_empty() {
                debug!(
                    "BooleanScorerSupplier: dropping {} SHOULD clauses, scores not needed",
                    dropped.len()
                );
            }
        }

        let cost = boolean_cost(
            &group.required_costs(),
            &group.costs(Occur::Should),
            min_should_match,
        );
        debug!(
            "BooleanScorerSupplier: {:?} min_should_match={} score_mode={:?} cost={}",
            group, min_should_match, score_mode, cost
        );

        Ok(Self {
            group,
            score_mode,
            min_should_match,
            max_doc,
            config: config.clone(),
            cost,
        })
    }

    pub fn shape(&self) -> ClauseShape {
        self.group.shape(self.min_should_match)
    }

    /// Execution mode `bulk_scorer` will use
    pub fn execution_mode(&self) -> ExecutionMode {
        select_mode(&self.shape(), self.cost, self.max_doc, &self.config)
    }

    /// Conjunction of MUST and FILTER clauses, each materialized with `lead_cost`
    fn required_scorer(&mut self, lead_cost: LeadCost) -> Result<Box<dyn Scorer>> {
        let mut must = self.group.take(Occur::Must);
        let mut filter = self.group.take(Occur::Filter);
        if must.len() + filter.len() == 1 {
            if let Some(single) = must.pop() {
                return single.scorer(lead_cost);
            }
            if let Some(single) = filter.pop() {
                let scorer = single.scorer(lead_cost)?;
                return Ok(if self.score_mode.needs_scores() {
                    Box::new(ConstantScorer::new(scorer, 0.0))
                } else {
                    scorer
                });
            }
        }
        Ok(Box::new(ConjunctionScorer::new(
            materialize(must, lead_cost)?,
            materialize(filter, lead_cost)?,
        )))
    }

    /// Disjunction of the suppliers, each materialized with `lead_cost`
    fn optional_scorer(
        suppliers: Vec<Box<dyn ScorerSupplier>>,
        lead_cost: LeadCost,
        min_should_match: usize,
    ) -> Result<Box<dyn Scorer>> {
        let mut scorers = materialize(suppliers, lead_cost)?;
        if scorers.len() == 1
            && let Some(single) = scorers.pop()
        {
            return Ok(single);
        }
        if scorers.is_empty() {
            return Ok(Box::new(EmptyScorer));
        }
        Ok(Box::new(DisjunctionScorer::new(scorers, min_should_match)))
    }

    /// Wrap `positive` so the MUST_NOT clauses remove their matches
    fn excluded_scorer(
        &mut self,
        positive: Box<dyn Scorer>,
        lead_cost: LeadCost,
    ) -> Result<Box<dyn Scorer>> {
        let must_not = self.group.take(Occur::MustNot);
        if must_not.is_empty() {
            return Ok(positive);
        }
        let excluded = Self::optional_scorer(must_not, lead_cost, 1)?;
        Ok(Box::new(ReqExclScorer::new(positive, excluded)))
    }

    fn optional_bulk_scorer(&mut self) -> Result<Box<dyn BulkScorer>> {
        let mut should = self.group.take(Occur::Should);
        if should.len() == 1
            && let Some(single) = should.pop()
        {
            return single.bulk_scorer();
        }
        let scorers = materialize(should, OPTIONAL_BULK_LEAD_COST)?;
        Ok(Box::new(DisjunctionBulkScorer::new(
            scorers,
            self.min_should_match.max(1),
            self.config.bulk_window_size,
        )))
    }

    fn required_bulk_scorer(&mut self) -> Result<Box<dyn BulkScorer>> {
        let lead_cost = required_bulk_lead_cost(&self.group.required_costs());
        let mut must = self.group.take(Occur::Must);
        let mut filter = self.group.take(Occur::Filter);
        if must.len() + filter.len() == 1 {
            if let Some(single) = must.pop() {
                return single.bulk_scorer();
            }
            if let Some(single) = filter.pop() {
                if !self.score_mode.needs_scores() {
                    return single.bulk_scorer();
                }
                let scorer = single.scorer(LeadCost::Unbounded)?;
                return Ok(Box::new(DefaultBulkScorer::new(Box::new(
                    ConstantScorer::new(scorer, 0.0),
                ))));
            }
        }
        let no_scoring_clause = must.is_empty();
        let conjunction: Box<dyn Scorer> = Box::new(ConjunctionScorer::new(
            materialize(must, lead_cost)?,
            materialize(filter, lead_cost)?,
        ));
        let scorer: Box<dyn Scorer> = if no_scoring_clause && self.score_mode == ScoreMode::TopScores
        {
            Box::new(ConstantScorer::new(conjunction, 0.0))
        } else {
            conjunction
        };
        Ok(Box::new(DefaultBulkScorer::new(scorer)))
    }
}

fn materialize(
    suppliers: Vec<Box<dyn ScorerSupplier>>,
    lead_cost: LeadCost,
) -> Result<Vec<Box<dyn Scorer>>> {
    suppliers
        .into_iter()
        .map(|supplier| supplier.scorer(lead_cost))
        .collect()
}

impl ScorerSupplier for BooleanScorerSupplier {
    fn cost(&self) -> Cost {
        self.cost
    }

    fn scorer(mut self: Box<Self>, lead_cost: LeadCost) -> Result<Box<dyn Scorer>> {
        let shape = self.shape();
        let lead_cost = scorer_lead_cost(lead_cost, self.cost);
        debug!(
            "BooleanScorerSupplier::scorer: {:?} cost={} lead_cost={}",
            shape, self.cost, lead_cost
        );

        let msm = self.min_should_match;
        let positive: Box<dyn Scorer> = if shape.should == 0 {
            self.required_scorer(lead_cost)?
        } else if shape.num_required() == 0 {
            Self::optional_scorer(self.group.take(Occur::Should), lead_cost, msm)?
        } else {
            let required = self.required_scorer(lead_cost)?;
            let optional = Self::optional_scorer(self.group.take(Occur::Should), lead_cost, msm)?;
            if msm > 0 {
                Box::new(ConjunctionScorer::new(vec![required, optional], Vec::new()))
            } else {
                Box::new(ReqOptScorer::new(required, optional))
            }
        };

        let scorer = self.excluded_scorer(positive, lead_cost)?;
        if self.score_mode == ScoreMode::TopScores && shape.must == 0 && shape.should == 0 {
            // Nothing scores: stop as soon as the collector is full
            return Ok(Box::new(ConstantScorer::new(scorer, 0.0)));
        }
        Ok(scorer)
    }

    fn bulk_scorer(mut self: Box<Self>) -> Result<Box<dyn BulkScorer>> {
        let mode = self.execution_mode();
        debug!(
            "BooleanScorerSupplier::bulk_scorer: {:?} cost={} max_doc={} mode={}",
            self.shape(),
            self.cost,
            self.max_doc,
            mode
        );

        let positive: Box<dyn BulkScorer> = match mode {
            ExecutionMode::PerDocument => {
                return Ok(Box::new(DefaultBulkScorer::new(
                    self.scorer(LeadCost::Unbounded)?,
                )));
            }
            ExecutionMode::OptionalBulk => self.optional_bulk_scorer()?,
            ExecutionMode::RequiredBulk => self.required_bulk_scorer()?,
        };

        let must_not = self.group.take(Occur::MustNot);
        if must_not.is_empty() {
            return Ok(positive);
        }
        let lead_cost = prohibited_lead_cost(positive.cost());
        let excluded = Self::optional_scorer(must_not, lead_cost, 1)?;
        Ok(Box::new(ReqExclBulkScorer::new(positive, excluded)))
    }

    fn set_top_level_scoring_clause(&mut self) {
        if let Some(occur) = top_level_scoring_clause(&self.shape(), self.score_mode) {
            for supplier in self.group.get_mut(occur) {
                supplier.set_top_level_scoring_clause();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{AllQuery, DocSet, TermQuery};
    use crate::segment::SegmentBuilder;

    fn segment() -> Segment {
        let mut builder = SegmentBuilder::new(3);
        builder.add_document(["a", "b"]).unwrap();
        builder.add_document(["a"]).unwrap();
        builder.add_document(["b", "c"]).unwrap();
        builder.build()
    }

    #[test]
    fn test_display() {
        let query = BooleanQuery::new()
            .must(TermQuery::new("a"))
            .filter(TermQuery::new("b"))
            .should(TermQuery::new("c"))
            .must_not(TermQuery::new("d"))
            .with_minimum_should_match(1);
        assert_eq!(
            query.to_string(),
            r#"Boolean(+Term("a") #Term("b") Term("c") -Term("d"))~1"#
        );
    }

    #[test]
    fn test_validation_errors() {
        let config = ExecutionConfig::default();

        let query = BooleanQuery::new().must_not(TermQuery::new("a"));
        assert!(matches!(query.validate(&config), Err(Error::NoPositiveClause)));

        let query = BooleanQuery::new()
            .should(TermQuery::new("a"))
            .with_minimum_should_match(2);
        assert!(matches!(
            query.validate(&config),
            Err(Error::InvalidMinShouldMatch {
                min_should_match: 2,
                num_should: 1
            })
        ));

        let config = ExecutionConfig {
            max_clause_count: 2,
            ..ExecutionConfig::default()
        };
        let query = BooleanQuery::new()
            .should(TermQuery::new("a"))
            .should(TermQuery::new("b"))
            .should(TermQuery::new("c"));
        assert!(matches!(
            query.validate(&config),
            Err(Error::TooManyClauses { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_missing_required_clause_matches_nothing() {
        let segment = segment();
        let query = BooleanQuery::new()
            .must(TermQuery::new("a"))
            .must(TermQuery::new("zzz"));
        let supplier = query
            .scorer_supplier(&segment, ScoreMode::Complete, &ExecutionConfig::default())
            .unwrap();
        assert!(supplier.is_none());
    }

    #[test]
    fn test_missing_optional_clauses_are_dropped() {
        let segment = segment();
        let config = ExecutionConfig::default();

        // zzz cannot match, "a" alone is unwrapped
        let query = BooleanQuery::new()
            .should(TermQuery::new("a"))
            .should(TermQuery::new("zzz"))
            .must_not(TermQuery::new("yyy"));
        let supplier = query
            .scorer_supplier(&segment, ScoreMode::Complete, &config)
            .unwrap()
            .unwrap();
        assert_eq!(supplier.cost(), 2);

        // Too few SHOULD clauses left for minimum_should_match
        let query = query.with_minimum_should_match(2);
        assert!(
            query
                .scorer_supplier(&segment, ScoreMode::Complete, &config)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_filter_clause_does_not_score() {
        let segment = segment();
        let query = BooleanQuery::new()
            .must(AllQuery)
            .filter(TermQuery::new("b"));
        let supplier = query
            .scorer_supplier(&segment, ScoreMode::Complete, &ExecutionConfig::default())
            .unwrap()
            .unwrap();
        let mut scorer = supplier.scorer(LeadCost::Unbounded).unwrap();
        assert_eq!(scorer.doc(), 0);
        assert_eq!(scorer.score(), 1.0);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.score(), 1.0);
    }

    #[test]
    fn test_supplier_rejects_invalid_groups() {
        let config = ExecutionConfig::default();
        let err = BooleanScorerSupplier::new(ClauseGroup::new(), ScoreMode::Complete, 0, 10, &config)
            .unwrap_err();
        assert!(matches!(err, Error::NoPositiveClause));
    }
}
