use crate::index::CorpusIndex;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W+").expect("valid regex");
}

/// Per-document match statistics for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInfo {
    pub len: usize,
    /// One entry per query term, in query order, duplicates included.
    pub meet_cnt: Vec<f64>,
}

/// Lowercase and split on runs of non-word characters. Terms are not deduplicated.
pub fn query_terms(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    NON_WORD
        .split(&lowered)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Weighted occurrence counts of every query term in every document.
///
/// Each occurrence contributes `weight * tags_weight_coef + 1`.
pub fn match_query(query: &str, corpus: &CorpusIndex, tags_weight_coef: f64) -> Vec<MatchInfo> {
    let terms = query_terms(query);
    corpus
        .documents()
        .iter()
        .map(|doc| MatchInfo {
            len: doc.length,
            meet_cnt: terms
                .iter()
                .map(|term| {
                    doc.tokens
                        .iter()
                        .filter(|t| t.word == *term)
                        .map(|t| t.weight * tags_weight_coef + 1.0)
                        .sum::<f64>()
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupEvent::{EndTag, StartTag, Text};
    use crate::weights::TagWeightTable;

    #[test]
    fn splits_on_punctuation() {
        assert_eq!(query_terms("Rust, rust-lang!  CAFÉ"), vec!["rust", "rust", "lang", "café"]);
        assert!(query_terms("?!  ...").is_empty());
        assert_eq!(query_terms("snake_case"), vec!["snake_case"]);
    }

    #[test]
    fn counts_weighted_occurrences() {
        let table = TagWeightTable::parse("b 1\ni 3").unwrap();
        let idx = CorpusIndex::build(
            vec![
                vec![Text("cat cat".into()), StartTag("b".into()), Text("cat".into()), EndTag("b".into())],
                vec![Text("dog".into())],
            ],
            &table,
        )
        .unwrap();
        let info = match_query("cat dog cat", &idx, 2.0);
        assert_eq!(info.len(), 2);
        // 1 + 1 + (0.25 * 2 + 1)
        assert_eq!(info[0].meet_cnt, vec![3.5, 0.0, 3.5]);
        assert_eq!(info[0].len, 9);
        assert_eq!(info[1].meet_cnt, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_query_yields_empty_counts() {
        let idx = CorpusIndex::from_html(&["<p>anything</p>"], &TagWeightTable::default()).unwrap();
        let info = match_query("--", &idx, 1.0);
        assert_eq!(info.len(), 1);
        assert!(info[0].meet_cnt.is_empty());
    }

    #[test]
    fn punctuation_attached_to_words_does_not_match() {
        let idx = CorpusIndex::from_html(&["<p>cat, dog</p>"], &TagWeightTable::default()).unwrap();
        let info = match_query("cat dog", &idx, 1.0);
        assert_eq!(info[0].meet_cnt, vec![0.0, 1.0]);
    }
}
