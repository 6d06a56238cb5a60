//! Loading raw HTML documents from local storage.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

/// One raw document as handed to the index builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDoc {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub html: String,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Source { path: path.to_path_buf(), source })
}

/// A single HTML file; its id is the path as given.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SourceDoc> {
    let path = path.as_ref();
    Ok(SourceDoc { id: path.display().to_string(), url: None, html: read(path)? })
}

/// Every `.html`/`.htm` file under `dir`, in sorted path order.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<SourceDoc>> {
    let mut docs = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir.as_ref()).to_path_buf();
            Error::Source { path, source: e.into() }
        })?;
        let p = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
            if matches!(ext.to_ascii_lowercase().as_str(), "html" | "htm") {
                docs.push(load_file(p)?);
            }
        }
    }
    Ok(docs)
}

/// One JSON-encoded [`SourceDoc`] per line; blank lines are skipped.
pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<SourceDoc>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|source| Error::Source { path: path.to_path_buf(), source })?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line)?);
    }
    Ok(docs)
}

/// Directory, `.jsonl` file, or single HTML file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<SourceDoc>> {
    let path = path.as_ref();
    if path.is_dir() {
        load_dir(path)
    } else if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        load_jsonl(path)
    } else {
        Ok(vec![load_file(path)?])
    }
}
