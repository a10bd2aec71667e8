use std::collections::HashMap;

use crate::tokenizer::tokenize;

/// L2-normalized term frequencies of one indexed document.
#[derive(Debug, Clone)]
struct DocumentVector {
    id: String,
    weights: HashMap<String, f64>,
}

/// An incremental TF-IDF index ranking documents by cosine-style similarity.
///
/// Each document is stored as its L2-normalized term-frequency vector.
/// IDF is never baked into stored vectors: it is recomputed from the live
/// document counts on every search, for both the query and the documents,
/// so early documents are weighted exactly like late ones.
///
/// The index is append-only. Documents keep their insertion order, which
/// is also the tie-break order for equal scores.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    /// Documents in insertion order.
    documents: Vec<DocumentVector>,
    /// doc_id -> position in `documents`
    positions: HashMap<String, usize>,
    /// term -> number of documents containing the term at least once
    document_frequency: HashMap<String, usize>,
}

impl VectorIndex {
    /// Create a new, empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to the index.
    ///
    /// Tokenizes `text`, stores its normalized term-frequency vector under
    /// `doc_id` and bumps the document frequency of every distinct term
    /// once. Each id must be added at most once.
    pub fn add(&mut self, doc_id: &str, text: &str) {
        let weights: HashMap<String, f64> = normalized_term_frequencies(&tokenize(text))
            .into_iter()
            .collect();

        for term in weights.keys() {
            *self.document_frequency.entry(term.clone()).or_insert(0) += 1;
        }

        debug_assert!(
            !self.positions.contains_key(doc_id),
            "document {doc_id} indexed twice"
        );
        self.positions.insert(doc_id.to_string(), self.documents.len());
        self.documents.push(DocumentVector {
            id: doc_id.to_string(),
            weights,
        });
    }

    /// Smoothed inverse document frequency of `term`:
    ///
    /// ```text
    /// idf(t) = ln((1 + N) / (1 + df(t))) + 1
    /// ```
    ///
    /// where `N` is the current document count and `df(t)` is 0 for unseen
    /// terms. Always positive.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.document_frequency.get(term).copied().unwrap_or(0) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    /// Rank every indexed document against `query`, returning at most
    /// `limit` `(doc_id, score)` pairs sorted by descending score.
    ///
    /// The query vector is the normalized term frequency of the query
    /// weighted by live IDF. A document scores
    /// `sum(query_weight(t) * tf(t) * idf(t))` over the query terms it
    /// contains. Documents without overlap score 0 and still take part in
    /// the ranking; equal scores keep insertion order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(String, f64)> {
        if self.documents.is_empty() {
            return Vec::new();
        }

        // (term, query weight, idf) in first-occurrence order
        let query_terms: Vec<(String, f64, f64)> = normalized_term_frequencies(&tokenize(query))
            .into_iter()
            .map(|(term, tf)| {
                let idf = self.idf(&term);
                (term, tf * idf, idf)
            })
            .collect();

        let mut scored: Vec<(String, f64)> = self
            .documents
            .iter()
            .map(|doc| {
                let score = query_terms
                    .iter()
                    .filter_map(|(term, weight, idf)| {
                        doc.weights.get(term).map(|tf| weight * (tf * idf))
                    })
                    .fold(0.0, |acc, s| acc + s);
                (doc.id.clone(), score)
            })
            .collect();

        // `sort_by` is stable: ties stay in insertion order.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        scored
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Whether `doc_id` has been indexed.
    pub fn contains(&self, doc_id: &str) -> bool {
        self.positions.contains_key(doc_id)
    }

    /// The stored normalized term-frequency vector of `doc_id`.
    pub fn term_vector(&self, doc_id: &str) -> Option<&HashMap<String, f64>> {
        self.positions
            .get(doc_id)
            .map(|&pos| &self.documents[pos].weights)
    }
}

/// Count term occurrences and divide by the Euclidean norm of the counts.
///
/// Terms are returned in first-occurrence order. No tokens means an empty
/// vector rather than a division by zero.
fn normalized_term_frequencies(tokens: &[String]) -> Vec<(String, f64)> {
    let mut counts: Vec<(String, f64)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        match slots.get(token.as_str()).copied() {
            Some(slot) => counts[slot].1 += 1.0,
            None => {
                slots.insert(token.as_str(), counts.len());
                counts.push((token.clone(), 1.0));
            }
        }
    }

    let norm = counts.iter().map(|(_, c)| c * c).sum::<f64>().sqrt();
    if norm == 0.0 {
        return counts;
    }
    for (_, count) in &mut counts {
        *count /= norm;
    }
    counts
}
