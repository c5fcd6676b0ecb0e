//! Forward-only document cursors
//!
//! Every iterator in a composition, from a posting list up to the top-level
//! boolean scorer, is a [`DocSet`]. A freshly built DocSet already sits on its
//! first document (or on [`TERMINATED`] when it has none), so a composer can
//! read `doc()` of its clauses before moving any of them.

use std::sync::Arc;

use crate::{Cost, DocId, TERMINATED};

// ── DocSet trait ─────────────────────────────────────────────────────────

/// Cursor over ascending doc ids.
pub trait DocSet: Send {
    /// Doc the cursor is on, [`TERMINATED`] once exhausted.
    fn doc(&self) -> DocId;

    /// Step to the next doc and return it.
    fn advance(&mut self) -> DocId;

    /// Move to the first doc `>= target` and return it.
    ///
    /// A target at or before the current doc leaves the cursor where it is.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        while doc < target {
            doc = self.advance();
        }
        doc
    }

    /// Upper bound on the number of docs produced over the cursor's lifetime.
    ///
    /// Does not change while iterating.
    fn cost(&self) -> Cost;
}

impl DocSet for Box<dyn DocSet + '_> {
    #[inline]
    fn doc(&self) -> DocId {
        self.as_ref().doc()
    }

    #[inline]
    fn advance(&mut self) -> DocId {
        self.as_mut().advance()
    }

    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        self.as_mut().seek(target)
    }

    fn cost(&self) -> Cost {
        self.as_ref().cost()
    }
}

// ── SortedVecDocSet ──────────────────────────────────────────────────────

/// Cursor over a shared, strictly ascending doc id list
///
/// `seek` gallops ahead of the cursor (1, 2, 4, ... positions) before a binary
/// search, so short hops stay cheap when a conjunction leader is close by.
pub struct SortedVecDocSet {
    docs: Arc<Vec<DocId>>,
    cursor: usize,
}

impl SortedVecDocSet {
    pub fn new(docs: Arc<Vec<DocId>>) -> Self {
        debug_assert!(docs.windows(2).all(|w| w[0] < w[1]));
        Self { docs, cursor: 0 }
    }
}

impl DocSet for SortedVecDocSet {
    #[inline]
    fn doc(&self) -> DocId {
        match self.docs.get(self.cursor) {
            Some(&doc) => doc,
            None => TERMINATED,
        }
    }

    #[inline]
    fn advance(&mut self) -> DocId {
        self.cursor = (self.cursor + 1).min(self.docs.len());
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let rest = &self.docs[self.cursor..];
        let mut step = 1;
        while step < rest.len() && rest[step] < target {
            step *= 2;
        }
        let from = step / 2;
        let to = (step + 1).min(rest.len());
        self.cursor += from + rest[from..to].partition_point(|&d| d < target);
        self.doc()
    }

    fn cost(&self) -> Cost {
        self.docs.len() as Cost
    }
}

// ── AllDocSet ────────────────────────────────────────────────────────────

/// Every doc id in `0..max_doc`
pub struct AllDocSet {
    doc: DocId,
    max_doc: DocId,
}

impl AllDocSet {
    pub fn new(max_doc: u32) -> Self {
        Self { doc: 0, max_doc }
    }
}

impl DocSet for AllDocSet {
    #[inline]
    fn doc(&self) -> DocId {
        if self.doc < self.max_doc {
            self.doc
        } else {
            TERMINATED
        }
    }

    #[inline]
    fn advance(&mut self) -> DocId {
        self.doc = self.doc.saturating_add(1).min(self.max_doc);
        self.doc()
    }

    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        if target > self.doc {
            self.doc = target.min(self.max_doc);
        }
        self.doc()
    }

    fn cost(&self) -> Cost {
        Cost::from(self.max_doc)
    }
}
