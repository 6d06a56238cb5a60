use anyhow::{anyhow, Context, Result};
use bm25f::scorer::{DEFAULT_B, DEFAULT_K1, DEFAULT_TAGS_WEIGHT_COEF};
use bm25f::source::load_path;
use bm25f::{rank, score, CorpusIndex, ScoreParams, SourceDoc, TagWeightTable};
use clap::Parser;
use fetcher::{build_client, fetch_all, parse_url};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ranker")]
#[command(about = "Score HTML documents against a query with structure-aware BM25", long_about = None)]
struct Cli {
    /// Query text
    #[arg(long, short)]
    query: String,
    /// HTML file, directory of HTML files, or JSONL document file (repeatable)
    #[arg(long)]
    path: Vec<PathBuf>,
    /// URL to fetch; <script> and <style> are stripped (repeatable)
    #[arg(long)]
    url: Vec<String>,
    /// Tag weight file (`<tag> <weight>` per line); the bundled table is used when absent
    #[arg(long, env = "BM25F_TAG_WEIGHTS")]
    tag_weights: Option<PathBuf>,
    /// TF saturation
    #[arg(long, default_value_t = DEFAULT_K1)]
    k1: f64,
    /// Length normalization strength
    #[arg(long, default_value_t = DEFAULT_B)]
    b: f64,
    /// Scale of the structural weight bonus
    #[arg(long, default_value_t = DEFAULT_TAGS_WEIGHT_COEF)]
    tags_weight_coef: f64,
    /// Print documents by descending score instead of input order
    #[arg(long, default_value_t = false)]
    ranked: bool,
    /// Print a JSON array instead of tab-separated lines
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Print the first N characters of every page before scoring
    #[arg(long)]
    preview: Option<usize>,
    /// Maximum concurrent URL fetches
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ScoredDoc<'a> {
    doc: usize,
    id: &'a str,
    url: Option<&'a str>,
    score: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let docs = load_documents(&cli).await?;
    tracing::info!(num_docs = docs.len(), "loaded documents");
    if let Some(n) = cli.preview {
        for doc in &docs {
            print!("{}", preview(&doc.html, n));
        }
    }

    let table = match &cli.tag_weights {
        Some(p) => TagWeightTable::load(p)?,
        None => TagWeightTable::default(),
    };
    let pages: Vec<&str> = docs.iter().map(|d| d.html.as_str()).collect();
    let index = CorpusIndex::from_html(&pages, &table)?;
    let params = ScoreParams { k1: cli.k1, b: cli.b, tags_weight_coef: cli.tags_weight_coef };
    let scores = score(&index, &cli.query, &params)?;

    print!("{}", render(&docs, &scores, cli.ranked, cli.json)?);
    Ok(())
}

/// Every `--path` in order, then every `--url`. Any failure aborts the run.
async fn load_documents(cli: &Cli) -> Result<Vec<SourceDoc>> {
    let mut docs = Vec::new();
    for p in &cli.path {
        docs.extend(load_path(p)?);
    }
    if !cli.url.is_empty() {
        let urls = cli
            .url
            .iter()
            .map(|s| parse_url(s).ok_or_else(|| anyhow!("invalid url: {s}")))
            .collect::<Result<Vec<_>>>()?;
        let client = build_client("bm25f-ranker/0.1", Duration::from_secs(cli.timeout_secs))?;
        for res in fetch_all(&client, &urls, cli.concurrency).await {
            docs.push(res.context("fetching documents")?.into());
        }
    }
    if docs.is_empty() {
        return Err(anyhow!("no documents: pass --path or --url"));
    }
    Ok(docs)
}

fn preview(html: &str, n: usize) -> String {
    let head: String = html.chars().take(n).collect();
    format!("{head}\n\nEnd - html - End\n\n")
}

fn render(docs: &[SourceDoc], scores: &[f64], ranked: bool, json: bool) -> Result<String> {
    let order: Vec<(usize, f64)> = if ranked { rank(scores) } else { scores.iter().copied().enumerate().collect() };
    let rows: Vec<ScoredDoc> = order
        .into_iter()
        .map(|(doc, score)| ScoredDoc { doc, id: &docs[doc].id, url: docs[doc].url.as_deref(), score })
        .collect();
    if json {
        return Ok(serde_json::to_string_pretty(&rows)? + "\n");
    }
    let mut out = String::new();
    for r in rows {
        writeln!(out, "{}\t{}", r.score, r.id)?;
    }
    Ok(out)
}
