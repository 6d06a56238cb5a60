use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use bm25f::scorer::{DEFAULT_B, DEFAULT_K1, DEFAULT_TAGS_WEIGHT_COEF};
use bm25f::source::load_path;
use bm25f::{rank, score, CorpusIndex, ScoreParams, SourceDoc, TagWeightTable};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_b")]
    pub b: f64,
    #[serde(default = "default_tags_weight_coef")]
    pub tags_weight_coef: f64,
}
fn default_k() -> usize { 10 }
fn default_k1() -> f64 { DEFAULT_K1 }
fn default_b() -> f64 { DEFAULT_B }
fn default_tags_weight_coef() -> f64 { DEFAULT_TAGS_WEIGHT_COEF }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// Documents with a positive score.
    pub total_hits: usize,
    /// One score per document, in corpus order.
    pub scores: Vec<f64>,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc: usize,
    pub id: String,
    pub url: Option<String>,
    pub score: f64,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc: usize,
    pub id: String,
    pub url: Option<String>,
    pub length: usize,
    pub tokens: usize,
}

pub struct DocMeta {
    pub id: String,
    pub url: Option<String>,
}

/// Immutable after startup; shared by every request.
pub struct Corpus {
    pub docs: Vec<DocMeta>,
    pub index: CorpusIndex,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
}

/// Load documents from `corpus_path` (HTML file, directory, or JSONL) and build the router.
pub fn build_app<P: AsRef<FsPath>>(corpus_path: P, tag_weights: Option<&FsPath>) -> Result<Router> {
    let docs = load_path(corpus_path.as_ref())?;
    let table = match tag_weights {
        Some(p) => TagWeightTable::load(p)?,
        None => TagWeightTable::default(),
    };
    app_from_docs(docs, &table)
}

pub fn app_from_docs(docs: Vec<SourceDoc>, table: &TagWeightTable) -> Result<Router> {
    let pages: Vec<&str> = docs.iter().map(|d| d.html.as_str()).collect();
    let index = CorpusIndex::from_html(&pages, table)?;
    tracing::info!(num_docs = index.len(), avgdl = index.avg_doc_length(), "corpus indexed");
    let docs = docs.into_iter().map(|d| DocMeta { id: d.id, url: d.url }).collect();
    let app_state = AppState { corpus: Arc::new(Corpus { docs, index }) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let corpus = &state.corpus;
    let score_params = ScoreParams { k1: params.k1, b: params.b, tags_weight_coef: params.tags_weight_coef };
    let scores = score(&corpus.index, &params.q, &score_params).map_err(|e| {
        tracing::warn!(query = %params.q, error = %e, "scoring failed");
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    let k = params.k.clamp(1, 100);
    let total_hits = scores.iter().filter(|s| **s > 0.0).count();
    let results = rank(&scores)
        .into_iter()
        .take(k)
        .map(|(doc, score)| {
            let meta = &corpus.docs[doc];
            SearchHit { doc, id: meta.id.clone(), url: meta.url.clone(), score }
        })
        .collect();

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, scores, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc): Path<usize>) -> Result<Json<DocResponse>, StatusCode> {
    let corpus = &state.corpus;
    let (meta, stats) = corpus.docs.get(doc).zip(corpus.index.document(doc)).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(DocResponse {
        doc,
        id: meta.id.clone(),
        url: meta.url.clone(),
        length: stats.length,
        tokens: stats.tokens.len(),
    }))
}
