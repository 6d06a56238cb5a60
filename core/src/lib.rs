//! Structure-aware BM25 (BM25F) ranking of HTML documents.
//!
//! Words are weighted by the HTML tags they appear inside, using a normalized tag -> weight
//! table, and the weighted counts feed a BM25 formula with length normalization by total
//! word characters.

pub mod error;
pub mod index;
pub mod markup;
pub mod matcher;
pub mod scorer;
pub mod source;
pub mod tokenizer;
pub mod weights;

pub use error::{ConfigError, Error, Result};
pub use index::{CorpusIndex, DocId, DocumentStats, WeightedToken};
pub use markup::MarkupEvent;
pub use matcher::MatchInfo;
pub use scorer::ScoreParams;
pub use source::SourceDoc;
pub use weights::TagWeightTable;

/// Build an index over raw HTML pages. `tag_weight_source` is the text of a tag-weight
/// table; `None` uses the bundled default.
pub fn build_index<S: AsRef<str>>(pages: &[S], tag_weight_source: Option<&str>) -> Result<CorpusIndex> {
    let table = match tag_weight_source {
        Some(src) => TagWeightTable::parse(src)?,
        None => TagWeightTable::default(),
    };
    CorpusIndex::from_html(pages, &table)
}

/// Score every document against `query`. The result is aligned with the index's input order.
pub fn score(index: &CorpusIndex, query: &str, params: &ScoreParams) -> Result<Vec<f64>> {
    let infos = matcher::match_query(query, index, params.tags_weight_coef);
    let avgdl = index.avg_doc_length();
    tracing::trace!(query, avgdl, "scoring query");
    scorer::score(&infos, avgdl, params.k1, params.b)
}

/// Document indices ordered by descending score; ties keep input order and NaN scores go last.
pub fn rank(scores: &[f64]) -> Vec<(DocId, f64)> {
    let mut ranked: Vec<(DocId, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (false, false) => b.1.total_cmp(&a.1),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
    ranked
}
