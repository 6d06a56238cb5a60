use crate::error::{Error, Result};
use crate::markup::{scan, MarkupEvent};
use crate::tokenizer::tokenize;
use crate::weights::TagWeightTable;

pub type DocId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedToken {
    pub word: String,
    /// Sum of the weights of the weighted tags open when the word appeared.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStats {
    /// Total characters across all words, not the word count.
    pub length: usize,
    pub tokens: Vec<WeightedToken>,
}

impl DocumentStats {
    pub fn new(tokens: Vec<WeightedToken>) -> Self {
        let length = tokens.iter().map(|t| t.word.chars().count()).sum();
        Self { length, tokens }
    }
}

/// Weighted token streams for a fixed set of documents, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusIndex {
    docs: Vec<DocumentStats>,
}

impl CorpusIndex {
    pub fn build<D, E>(documents: D, table: &TagWeightTable) -> Result<Self>
    where
        D: IntoIterator<Item = E>,
        E: IntoIterator<Item = MarkupEvent>,
    {
        let docs: Vec<DocumentStats> = documents
            .into_iter()
            .map(|events| DocumentStats::new(tokenize(events, table)))
            .collect();
        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        tracing::debug!(num_docs = docs.len(), "built corpus index");
        Ok(Self { docs })
    }

    /// Scan each raw HTML page and build the index from the resulting events.
    pub fn from_html<S: AsRef<str>>(pages: &[S], table: &TagWeightTable) -> Result<Self> {
        Self::build(pages.iter().map(|p| scan(p.as_ref())), table)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn documents(&self) -> &[DocumentStats] { &self.docs }

    pub fn document(&self, doc: DocId) -> Option<&DocumentStats> { self.docs.get(doc) }

    /// Mean of the per-document `length` values. Recomputed on every call.
    pub fn avg_doc_length(&self) -> f64 {
        let total: usize = self.docs.iter().map(|d| d.length).sum();
        total as f64 / self.docs.len() as f64
    }
}
