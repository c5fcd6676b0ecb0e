//! Execution-mode selection for boolean compositions

use std::fmt;

use crate::Cost;
use crate::config::ExecutionConfig;

use super::ClauseShape;

/// How a boolean composition visits its matches when scored in bulk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Composed scorer driven one document at a time
    PerDocument,
    /// SHOULD clauses only: windowed bucket scoring over all clauses
    OptionalBulk,
    /// MUST/FILTER clauses only: conjunction (or the single clause) in bulk
    RequiredBulk,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionMode::PerDocument => "per-document",
            ExecutionMode::OptionalBulk => "optional-bulk",
            ExecutionMode::RequiredBulk => "required-bulk",
        };
        f.write_str(name)
    }
}

/// Pick the bulk execution strategy for a clause shape.
///
/// `cost` is the composition's total cost and `max_doc` the segment size.
/// A min-should-match disjunction with m > 1 that is expected to match only a
/// small share of the segment is cheaper to drive per document, where the
/// cheapest clauses lead and the others are only probed.
pub fn select_mode(
    shape: &ClauseShape,
    cost: Cost,
    max_doc: u32,
    config: &ExecutionConfig,
) -> ExecutionMode {
    if shape.is_pure_disjunction() {
        let threshold = u64::from(max_doc) / config.msm_bulk_cost_divisor.max(1);
        if shape.min_should_match > 1 && cost < threshold {
            ExecutionMode::PerDocument
        } else {
            ExecutionMode::OptionalBulk
        }
    } else if shape.is_pure_conjunction() {
        ExecutionMode::RequiredBulk
    } else {
        ExecutionMode::PerDocument
    }
}
