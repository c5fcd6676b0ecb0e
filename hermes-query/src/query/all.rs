//! Match-all query

use std::fmt;

use crate::config::ExecutionConfig;
use crate::segment::Segment;
use crate::{Cost, Result};

use super::{AllDocSet, ConstantScorer, LeadCost, Query, ScoreMode, Scorer, ScorerSupplier};

/// Matches every document of a segment with score 1.0
#[derive(Debug, Clone, Copy, Default)]
pub struct AllQuery;

impl fmt::Display for AllQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All")
    }
}

impl Query for AllQuery {
    fn scorer_supplier(
        &self,
        segment: &Segment,
        _score_mode: ScoreMode,
        _config: &ExecutionConfig,
    ) -> Result<Option<Box<dyn ScorerSupplier>>> {
        Ok(Some(Box::new(AllScorerSupplier {
            max_doc: segment.max_doc(),
        })))
    }
}

struct AllScorerSupplier {
    max_doc: u32,
}

impl ScorerSupplier for AllScorerSupplier {
    fn cost(&self) -> Cost {
        self.max_doc as Cost
    }

    fn scorer(self: Box<Self>, _lead_cost: LeadCost) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(ConstantScorer::new(
            AllDocSet::new(self.max_doc),
            1.0,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TERMINATED;
    use crate::query::DocSet;
    use crate::segment::SegmentBuilder;

    #[test]
    fn test_matches_every_doc() {
        let mut builder = SegmentBuilder::new(0);
        for _ in 0..3 {
            builder.add_document(["x"]).unwrap();
        }
        let segment = builder.build();
        let supplier = AllQuery
            .scorer_supplier(&segment, ScoreMode::Complete, &ExecutionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(supplier.cost(), 3);
        let mut scorer = supplier.scorer(LeadCost::Unbounded).unwrap();
        assert_eq!(scorer.doc(), 0);
        assert_eq!(scorer.score(), 1.0);
        assert_eq!(scorer.advance(), 1);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.advance(), TERMINATED);
    }
}
