//! Multi-segment search
//!
//! Each segment gets its own composition, built and driven on a rayon worker;
//! nothing is shared between segments except the query and the configuration.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::config::ExecutionConfig;
use crate::query::{
    CountCollector, DocListCollector, Query, ScoreMode, ScorerSupplier, SearchResult,
    TopKCollector,
};
use crate::segment::Segment;
use crate::{DocId, Result, Score};

/// Unique document address: segment_id (hex) + local doc_id within segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DocAddress {
    /// Segment ID as hex string (32 chars)
    pub segment_id: String,
    /// Document ID within the segment
    pub doc_id: DocId,
}

impl DocAddress {
    pub fn new(segment_id: u128, doc_id: DocId) -> Self {
        Self {
            segment_id: format!("{:032x}", segment_id),
            doc_id,
        }
    }

    /// Parse segment_id from hex string
    pub fn segment_id_u128(&self) -> Option<u128> {
        u128::from_str_radix(&self.segment_id, 16).ok()
    }
}

/// Search hit with unique document address and score
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHit {
    pub address: DocAddress,
    pub score: Score,
}

/// Search response with hits (IDs only, no documents)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    /// Documents scored across all segments; lower than the number of
    /// matches when non-competitive documents were skipped
    pub total_hits: u32,
}

/// Searches a fixed set of segments in parallel
pub struct Searcher {
    segments: Vec<Arc<Segment>>,
    config: ExecutionConfig,
}

impl Searcher {
    pub fn new(segments: Vec<Segment>, config: ExecutionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segments: segments.into_iter().map(Arc::new).collect(),
            config,
        })
    }

    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn num_docs(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.max_doc())).sum()
    }

    /// Top `limit` hits by descending score, ties broken by segment order then doc id
    pub fn search(&self, query: &dyn Query, limit: usize) -> Result<SearchResponse> {
        let per_segment: Vec<(Vec<SearchResult>, u32)> = self
            .segments
            .par_iter()
            .map(|segment| search_segment(segment, query, limit, &self.config))
            .collect::<Result<_>>()?;

        let mut total_hits = 0u32;
        let mut ranked: Vec<(usize, SearchResult)> = Vec::new();
        for (ord, (results, seen)) in per_segment.into_iter().enumerate() {
            total_hits = total_hits.saturating_add(seen);
            ranked.extend(results.into_iter().map(|r| (ord, r)));
        }
        ranked.sort_by(|(a_ord, a), (b_ord, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_ord.cmp(b_ord))
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        ranked.truncate(limit);

        debug!(
            "Searcher: {} -> {} hits ({} scored) over {} segments",
            query,
            ranked.len(),
            total_hits,
            self.segments.len()
        );

        let hits = ranked
            .into_iter()
            .map(|(ord, r)| SearchHit {
                address: DocAddress::new(self.segments[ord].id(), r.doc_id),
                score: r.score,
            })
            .collect();
        Ok(SearchResponse { hits, total_hits })
    }

    /// Count all documents matching `query`
    pub fn count(&self, query: &dyn Query) -> Result<u64> {
        let counts: Vec<u64> = self
            .segments
            .par_iter()
            .map(|segment| count_segment(segment, query, &self.config))
            .collect::<Result<_>>()?;
        Ok(counts.into_iter().sum())
    }
}

/// Top-k search on a single segment, returns (sorted results, docs scored)
pub fn search_segment(
    segment: &Segment,
    query: &dyn Query,
    limit: usize,
    config: &ExecutionConfig,
) -> Result<(Vec<SearchResult>, u32)> {
    let Some(mut supplier) = query.scorer_supplier(segment, ScoreMode::TopScores, config)? else {
        return Ok((Vec::new(), 0));
    };
    supplier.set_top_level_scoring_clause();
    let mut collector = TopKCollector::new(limit);
    supplier.bulk_scorer()?.score_all(&mut collector);
    Ok(collector.into_results_with_count())
}

/// Count matches on a single segment
pub fn count_segment(
    segment: &Segment,
    query: &dyn Query,
    config: &ExecutionConfig,
) -> Result<u64> {
    let Some(supplier) = query.scorer_supplier(segment, ScoreMode::CompleteNoScores, config)?
    else {
        return Ok(0);
    };
    let mut collector = CountCollector::new();
    supplier.bulk_scorer()?.score_all(&mut collector);
    Ok(collector.count())
}

/// Collect all matches of a supplier with scores, bypassing any pruning
pub fn collect_all(supplier: Box<dyn ScorerSupplier>) -> Result<Vec<SearchResult>> {
    let mut collector = DocListCollector::new();
    supplier.bulk_scorer()?.score_all(&mut collector);
    Ok(collector
        .into_scored()
        .into_iter()
        .map(|(doc_id, score)| SearchResult { doc_id, score })
        .collect())
}
