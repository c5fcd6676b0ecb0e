//! In-memory segments
//!
//! A segment is an immutable set of pre-tokenized documents with local doc ids
//! `0..max_doc`, indexed as term -> posting list. Queries resolve their
//! scorer suppliers against one segment at a time.

mod builder;

pub use builder::SegmentBuilder;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::DocId;

/// Doc ids and term frequencies of one term, doc ids strictly ascending
#[derive(Debug, Clone)]
pub struct PostingList {
    doc_ids: Arc<Vec<DocId>>,
    term_freqs: Vec<u32>,
    max_tf: u32,
}

impl PostingList {
    pub(crate) fn new(doc_ids: Vec<DocId>, term_freqs: Vec<u32>) -> Self {
        debug_assert_eq!(doc_ids.len(), term_freqs.len());
        let max_tf = term_freqs.iter().copied().max().unwrap_or(0);
        Self {
            doc_ids: Arc::new(doc_ids),
            term_freqs,
            max_tf,
        }
    }

    pub fn doc_ids(&self) -> &Arc<Vec<DocId>> {
        &self.doc_ids
    }

    pub fn term_freqs(&self) -> &[u32] {
        &self.term_freqs
    }

    /// Highest term frequency in this list
    pub fn max_tf(&self) -> u32 {
        self.max_tf
    }

    /// Document frequency
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }
}

/// Immutable in-memory segment
#[derive(Debug, Clone)]
pub struct Segment {
    id: u128,
    max_doc: u32,
    postings: FxHashMap<String, Arc<PostingList>>,
    doc_lengths: Arc<[u32]>,
    avg_doc_len: f32,
}

impl Segment {
    pub fn id(&self) -> u128 {
        self.id
    }

    /// Number of documents; doc ids are `0..max_doc`
    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    pub fn postings(&self, term: &str) -> Option<&Arc<PostingList>> {
        self.postings.get(term)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Token count of every document, indexed by doc id
    pub fn doc_lengths(&self) -> &Arc<[u32]> {
        &self.doc_lengths
    }

    pub fn avg_doc_len(&self) -> f32 {
        self.avg_doc_len
    }
}
