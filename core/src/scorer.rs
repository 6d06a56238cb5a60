//! BM25F reduction of per-document match statistics to one score per document.

use crate::error::{Error, Result};
use crate::matcher::MatchInfo;
use serde::Deserialize;

/// Lower bound for IDF, so that very common terms never zero out or invert a score.
pub const IDF_FLOOR: f64 = 1e-7;

pub const DEFAULT_K1: f64 = 2.0;
pub const DEFAULT_B: f64 = 0.75;
pub const DEFAULT_TAGS_WEIGHT_COEF: f64 = 1.0;

/// Tuning knobs for one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreParams {
    /// TF saturation.
    #[serde(default = "default_k1")]
    pub k1: f64,
    /// Strength of length normalization.
    #[serde(default = "default_b")]
    pub b: f64,
    /// Scale applied to the structural weight of each matched word.
    #[serde(default = "default_tags_weight_coef")]
    pub tags_weight_coef: f64,
}
fn default_k1() -> f64 { DEFAULT_K1 }
fn default_b() -> f64 { DEFAULT_B }
fn default_tags_weight_coef() -> f64 { DEFAULT_TAGS_WEIGHT_COEF }

impl Default for ScoreParams {
    fn default() -> Self {
        Self { k1: DEFAULT_K1, b: DEFAULT_B, tags_weight_coef: DEFAULT_TAGS_WEIGHT_COEF }
    }
}

/// `max(ln((N - n + 0.5) / (n + 0.5)), IDF_FLOOR)`.
pub fn idf(n_docs: usize, n_containing: usize) -> f64 {
    let n_docs = n_docs as f64;
    let n = n_containing as f64;
    ((n_docs - n + 0.5) / (n + 0.5)).ln().max(IDF_FLOOR)
}

/// Saturated, length-normalized term frequency.
///
/// Returns `None` when the denominator is exactly zero or `avgdl` is zero.
pub fn saturation(tf: f64, k1: f64, b: f64, avgdl: f64, doc_len: usize) -> Option<f64> {
    if avgdl == 0.0 {
        return None;
    }
    let denom = tf + k1 * (1.0 - b + b * doc_len as f64 / avgdl);
    if denom == 0.0 {
        return None;
    }
    Some(tf * (k1 + 1.0) / denom)
}

/// One score per entry of `infos`, in the same order. Fails as a whole on any degenerate term.
pub fn score(infos: &[MatchInfo], avgdl: f64, k1: f64, b: f64) -> Result<Vec<f64>> {
    let n_docs = infos.len();
    let n_terms = infos.first().map_or(0, |i| i.meet_cnt.len());
    if let Some((doc, info)) = infos.iter().enumerate().find(|(_, i)| i.meet_cnt.len() != n_terms) {
        return Err(Error::MismatchedTerms { doc, expected: n_terms, found: info.meet_cnt.len() });
    }
    let idfs: Vec<f64> = (0..n_terms)
        .map(|j| {
            let containing = infos.iter().filter(|i| i.meet_cnt[j] != 0.0).count();
            idf(n_docs, containing)
        })
        .collect();

    infos
        .iter()
        .enumerate()
        .map(|(doc, info)| {
            info.meet_cnt.iter().zip(&idfs).enumerate().try_fold(0.0, |acc, (term, (&tf, &idf))| -> Result<f64> {
                let frac = saturation(tf, k1, b, avgdl, info.len).ok_or(Error::NumericDegeneracy { doc, term })?;
                Ok(acc + idf * frac)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(len: usize, meet_cnt: &[f64]) -> MatchInfo { MatchInfo { len, meet_cnt: meet_cnt.to_vec() } }

    #[test]
    fn idf_is_floored() {
        assert_eq!(idf(3, 3), IDF_FLOOR);
        assert_eq!(idf(3, 2), IDF_FLOOR);
        assert!((idf(10, 1) - (9.5f64 / 1.5).ln()).abs() < 1e-12);
    }

    #[test]
    fn saturation_matches_formula() {
        let f = saturation(1.0, 2.0, 0.75, 4.0, 3).unwrap();
        assert!((f - 3.0 / 2.625).abs() < 1e-12);
        assert_eq!(saturation(0.0, 2.0, 0.75, 4.0, 3), Some(0.0));
    }

    #[test]
    fn rare_term_scores_higher_doc() {
        let infos = vec![info(4, &[2.0]), info(4, &[0.0]), info(4, &[0.0]), info(4, &[0.0])];
        let scores = score(&infos, 4.0, 2.0, 0.75).unwrap();
        assert_eq!(scores.len(), 4);
        assert!(scores[0] > 0.0);
        assert_eq!(&scores[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn duplicate_terms_add_up() {
        let single = score(&[info(4, &[1.0]), info(4, &[0.0]), info(4, &[0.0])], 4.0, 2.0, 0.75).unwrap();
        let double = score(&[info(4, &[1.0, 1.0]), info(4, &[0.0, 0.0]), info(4, &[0.0, 0.0])], 4.0, 2.0, 0.75).unwrap();
        assert!((double[0] - 2.0 * single[0]).abs() < 1e-12);
    }

    #[test]
    fn zero_denominator_is_reported() {
        // tf + k1 * (1 - b + b * len / avgdl) = -2 + 2 * 1 = 0
        let err = score(&[info(4, &[0.0]), info(4, &[-2.0])], 4.0, 2.0, 0.75).unwrap_err();
        assert!(matches!(err, Error::NumericDegeneracy { doc: 1, term: 0 }));
    }

    #[test]
    fn zero_average_length_is_reported() {
        let err = score(&[info(0, &[0.0])], 0.0, 2.0, 0.75).unwrap_err();
        assert!(matches!(err, Error::NumericDegeneracy { doc: 0, term: 0 }));
    }

    #[test]
    fn ragged_counts_are_rejected() {
        let err = score(&[info(4, &[1.0, 0.0]), info(4, &[1.0])], 4.0, 2.0, 0.75).unwrap_err();
        assert!(matches!(err, Error::MismatchedTerms { doc: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn negative_counts_count_as_containing() {
        // n = 1 gives ln(3.5 / 1.5); treating -0.5 as absent would give ln(9).
        let infos = vec![info(4, &[-0.5]), info(4, &[0.0]), info(4, &[0.0]), info(4, &[0.0])];
        let scores = score(&infos, 4.0, 2.0, 0.75).unwrap();
        // saturation: -0.5 * 3 / (-0.5 + 2) = -1
        assert!((scores[0] + idf(4, 1)).abs() < 1e-12);
        assert!((idf(4, 1) - (3.5f64 / 1.5).ln()).abs() < 1e-12);
    }

    #[test]
    fn no_terms_scores_zero() {
        assert_eq!(score(&[info(0, &[]), info(3, &[])], 1.5, 2.0, 0.75).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn params_default() {
        let p: ScoreParams = serde_json::from_str("{\"b\": 0.5}").unwrap();
        assert_eq!(p, ScoreParams { b: 0.5, ..ScoreParams::default() });
    }
}
