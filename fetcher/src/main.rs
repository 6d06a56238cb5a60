use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fetcher::{build_client, fetch_all, parse_url};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Fetch HTML pages to JSONL with <script>/<style> removed")]
struct Cli {
    /// Path to a file with URLs (one per line)
    #[arg(long)]
    urls: String,
    /// Output JSONL file path
    #[arg(long, default_value = "./sample_data/pages.jsonl")]
    output: String,
    /// Maximum requests in flight
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string
    #[arg(long, default_value = "bm25f-fetcher/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    if let Some(dir) = std::path::Path::new(&args.output).parent() {
        fs::create_dir_all(dir).ok();
    }

    let mut urls: Vec<Url> = Vec::new();
    let seeds = File::open(&args.urls).with_context(|| format!("opening {}", args.urls))?;
    for line in BufReader::new(seeds).lines() {
        let s = line?.trim().to_string();
        if s.is_empty() || s.starts_with('#') { continue; }
        match parse_url(&s) {
            Some(u) => urls.push(u),
            None => tracing::warn!(line = %s, "skipping invalid url"),
        }
    }
    if urls.is_empty() { return Err(anyhow!("no valid urls")); }
    tracing::info!(urls = urls.len(), concurrency = args.concurrency, output = %args.output, "fetching");

    let client = build_client(&args.user_agent, Duration::from_secs(args.timeout_secs))?;
    let mut out = BufWriter::new(File::create(&args.output)?);
    let mut emitted = 0usize;
    for (url, res) in urls.iter().zip(fetch_all(&client, &urls, args.concurrency).await) {
        match res {
            Ok(page) => {
                serde_json::to_writer(&mut out, &page)?;
                out.write_all(b"\n")?;
                emitted += 1;
            }
            Err(e) => tracing::warn!(%url, error = %e, "fetch failed"),
        }
    }
    out.flush()?;

    tracing::info!(emitted, failed = urls.len() - emitted, output = %args.output, "done");
    Ok(())
}
