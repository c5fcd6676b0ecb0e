//! Segment builder

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

use crate::{DocId, Error, Result, TERMINATED};

use super::{PostingList, Segment};

/// Accumulates documents and freezes them into a [`Segment`]
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    id: u128,
    /// term -> (doc ids, term frequencies)
    postings: FxHashMap<String, (Vec<DocId>, Vec<u32>)>,
    doc_lengths: Vec<u32>,
    total_tokens: u64,
}

impl SegmentBuilder {
    pub fn new(id: u128) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Add a document given as a token stream. Returns its local doc id.
    ///
    /// Fails once the segment holds `TERMINATED` documents, since that id
    /// marks exhaustion.
    pub fn add_document<I, S>(&mut self, tokens: I) -> Result<DocId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doc_id = next_doc_id(self.doc_lengths.len())?;

        let mut term_freqs: FxHashMap<String, u32> = FxHashMap::default();
        let mut doc_len = 0u32;
        for token in tokens {
            *term_freqs.entry(token.as_ref().to_string()).or_insert(0) += 1;
            doc_len += 1;
        }

        for (term, tf) in term_freqs {
            let (doc_ids, freqs) = self.postings.entry(term).or_default();
            doc_ids.push(doc_id);
            freqs.push(tf);
        }
        self.doc_lengths.push(doc_len);
        self.total_tokens += u64::from(doc_len);
        Ok(doc_id)
    }

    /// Number of documents added so far
    pub fn num_docs(&self) -> u32 {
        self.doc_lengths.len() as u32
    }

    pub fn build(self) -> Segment {
        let max_doc = self.num_docs();
        let avg_doc_len = if max_doc == 0 {
            0.0
        } else {
            self.total_tokens as f32 / max_doc as f32
        };
        let postings: FxHashMap<String, Arc<PostingList>> = self
            .postings
            .into_iter()
            .map(|(term, (doc_ids, freqs))| (term, Arc::new(PostingList::new(doc_ids, freqs))))
            .collect();
        debug!(
            "Built segment {:032x}: {} docs, {} terms, avg_doc_len={:.2}",
            self.id,
            max_doc,
            postings.len(),
            avg_doc_len
        );
        Segment {
            id: self.id,
            max_doc,
            postings,
            doc_lengths: self.doc_lengths.into(),
            avg_doc_len,
        }
    }
}

fn next_doc_id(num_docs: usize) -> Result<DocId> {
    DocId::try_from(num_docs)
        .ok()
        .filter(|&doc_id| doc_id < TERMINATED)
        .ok_or(Error::SegmentFull {
            max: u64::from(TERMINATED),
        })
}
