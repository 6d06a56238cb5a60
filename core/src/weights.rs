use crate::error::{ConfigError, Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Tag weights compiled into the crate, used when the caller supplies none.
pub const DEFAULT_TAG_WEIGHTS: &str = include_str!("../tags_weights.txt");

/// Lowercase tag name -> normalized emphasis weight. Weights sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct TagWeightTable {
    weights: HashMap<String, f64>,
}

impl TagWeightTable {
    /// Parse the two-column `<tag> <weight>` format and normalize by the total raw weight.
    ///
    /// Weights must be positive integers; `0` is rejected like any other invalid weight.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(source: &str) -> Result<Self> {
        let mut raw: HashMap<String, u64> = HashMap::new();
        let mut total: u64 = 0;
        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let l = line.trim();
            if l.is_empty() || l.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = l.split_whitespace().collect();
            let [tag, weight] = fields.as_slice() else {
                return Err(ConfigError::Malformed { line: line_no, content: l.to_string() }.into());
            };
            let weight: u64 = match weight.parse() {
                Ok(w) if w > 0 => w,
                _ => return Err(ConfigError::InvalidWeight { line: line_no, value: weight.to_string() }.into()),
            };
            let tag = tag.to_lowercase();
            if raw.contains_key(&tag) {
                return Err(ConfigError::DuplicateTag { line: line_no, tag }.into());
            }
            total = total.saturating_add(weight);
            raw.insert(tag, weight);
        }
        if total == 0 {
            return Err(ConfigError::ZeroTotalWeight.into());
        }
        let total = total as f64;
        let weights = raw.into_iter().map(|(tag, w)| (tag, w as f64 / total)).collect();
        Ok(Self { weights })
    }

    /// Read and parse a tag-weight file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Source { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Normalized weight of `tag`, matched case-insensitively.
    pub fn get(&self, tag: &str) -> Option<f64> {
        match self.weights.get(tag) {
            Some(w) => Some(*w),
            None => self.weights.get(&tag.to_lowercase()).copied(),
        }
    }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for TagWeightTable {
    fn default() -> Self {
        // The embedded resource is checked by `default_table_parses` below.
        Self::parse(DEFAULT_TAG_WEIGHTS).unwrap_or_else(|e| panic!("bundled tag weights are invalid: {e}"))
    }
}
