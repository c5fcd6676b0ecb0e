//! BM25 scoring functions used by term scorers

/// Term frequency saturation
pub const BM25_K1: f32 = 1.2;

/// Length normalization strength: 0 disables it, 1 normalizes fully
pub const BM25_B: f32 = 0.75;

/// BM25 contribution of one term in one document
#[inline]
pub fn bm25_score(tf: f32, idf: f32, doc_len: f32, avg_doc_len: f32) -> f32 {
    let length_norm = 1.0 - BM25_B + BM25_B * (doc_len / avg_doc_len.max(1.0));
    let tf_norm = (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * length_norm);
    idf * tf_norm
}

/// Upper bound of [`bm25_score`] over a posting list
///
/// Assumes the highest term frequency of the list in the shortest possible
/// document (length norm `1 - b`).
#[inline]
pub fn bm25_upper_bound(max_tf: f32, idf: f32) -> f32 {
    let min_length_norm = 1.0 - BM25_B;
    let tf_norm = (max_tf * (BM25_K1 + 1.0)) / (max_tf + BM25_K1 * min_length_norm);
    idf * tf_norm
}

/// BM25 IDF, always positive
#[inline]
pub fn bm25_idf(doc_freq: f32, total_docs: f32) -> f32 {
    ((total_docs - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln()
}
