//! Fetches HTML pages over HTTP and strips `<script>`/`<style>` before they are indexed.

use anyhow::{anyhow, Context, Result};
use bm25f::SourceDoc;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::sync::Arc;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Semaphore;
use url::Url;

lazy_static! {
    static ref SCRIPT_OR_STYLE: Selector = Selector::parse("script, style").expect("valid selector");
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchedPage {
    pub id: String,
    pub url: String,
    pub html: String,
    pub fetched_at: String,
}

impl From<FetchedPage> for SourceDoc {
    fn from(p: FetchedPage) -> Self {
        SourceDoc { id: p.id, url: Some(p.url), html: p.html }
    }
}

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Accepts full URLs or bare hosts (`example.com/page` becomes `https://example.com/page`).
pub fn parse_url(s: &str) -> Option<Url> {
    Url::parse(s).or_else(|_| Url::parse(&format!("https://{}", s))).ok()
}

/// Remove every `script` and `style` element, content included, and re-serialize.
pub fn strip_script_and_style(html: &str) -> String {
    let mut doc = Html::parse_document(html);
    let ids: Vec<_> = doc.select(&SCRIPT_OR_STYLE).map(|el| (*el).id()).collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    doc.html()
}

fn page_id(url: &Url) -> String {
    let mut hasher = Sha1::new();
    hasher.update(norm(url).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn norm(u: &Url) -> String { let mut s = u.clone(); s.set_fragment(None); s.to_string() }

pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    let resp = client.get(url.clone()).send().await.with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("GET {url}: status {status}"));
    }
    let body = resp.text().await.with_context(|| format!("reading body of {url}"))?;
    tracing::debug!(%url, bytes = body.len(), "fetched page");
    Ok(FetchedPage {
        id: page_id(url),
        url: norm(url),
        html: strip_script_and_style(&body),
        fetched_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
    })
}

async fn fetch_with_permit(client: Client, url: Url, permits: Arc<Semaphore>) -> Result<FetchedPage> {
    let _permit = permits.acquire_owned().await?;
    fetch_page(&client, &url).await
}

/// Fetch all `urls` with at most `concurrency` requests in flight. Results keep input order.
pub async fn fetch_all(client: &Client, urls: &[Url], concurrency: usize) -> Vec<Result<FetchedPage>> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let handles: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| {
            let client = client.clone();
            let permits = permits.clone();
            tokio::spawn(fetch_with_permit(client, url, permits))
        })
        .collect();

    let mut out = Vec::with_capacity(handles.len());
    for h in handles {
        out.push(match h.await {
            Ok(res) => res,
            Err(e) => Err(anyhow!("fetch task failed: {e}")),
        });
    }
    out
}
