//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing citation extraction and precedent network
//! building, with statistics and health endpoints.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with case documents (single or corpus)
//! - **Output**: JSON responses with citations, networks, system status
//! - **Endpoints**: Extract, network, stats, health
//!
//! ## Key Features
//! - RESTful API with JSON payloads
//! - Configurable payload limits and CORS
//! - Structured error responses
//! - CPU-bound network builds offloaded from the request executor

use crate::errors::{CitationError, Result};
use crate::extractor::{Citation, StatsSnapshot};
use crate::network::CitationNetwork;
use crate::utils::TextUtils;
use crate::CaseDocument;
use actix_cors::Cors;
use actix_web::{middleware::Condition, web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API server over shared application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Network build request payload
#[derive(Debug, Deserialize)]
pub struct NetworkRequest {
    pub documents: Vec<CaseDocument>,
}

/// Extraction response payload
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub citations: Vec<Citation>,
    pub citation_count: usize,
    pub processing_time_ms: u64,
}

/// Network build response payload
#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub networks: HashMap<String, CitationNetwork>,
    pub document_count: usize,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stats: StatsSnapshot,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let config = &self.app_state.config.server;
        let bind_addr = format!("{}:{}", config.host, config.port);
        let enable_cors = config.enable_cors;
        let payload_limit = config.max_payload_size_mb as usize * 1024 * 1024;

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(self.app_state.clone()))
                .app_data(web::JsonConfig::default().limit(payload_limit))
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .route("/extract", web::post().to(extract_handler))
                .route("/network", web::post().to(network_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/health", web::get().to(health_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| CitationError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| CitationError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Citation extraction endpoint handler
async fn extract_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<CaseDocument>,
) -> ActixResult<HttpResponse> {
    let start_time = std::time::Instant::now();

    let document = request.into_inner();
    tracing::debug!(
        "Extract request for '{}' ({} words)",
        TextUtils::truncate(&document.title, 60),
        TextUtils::word_count(&document.content)
    );
    let citations = app_state.extractor.extract_citations(&document);

    let response = ExtractResponse {
        citation_count: citations.len(),
        citations,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Network build endpoint handler
async fn network_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<NetworkRequest>,
) -> ActixResult<HttpResponse> {
    let start_time = std::time::Instant::now();

    let documents = request.into_inner().documents;
    let document_count = documents.len();
    let builder = app_state.network_builder.clone();

    // O(N²) edge resolution; keep it off the request executor
    let built = web::block(move || builder.build_citation_network(&documents)).await;

    match built {
        Ok(networks) => {
            let response = NetworkResponse {
                networks,
                document_count,
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            };
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            tracing::error!("Network build error: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Network build failed",
                "message": e.to_string(),
            })))
        }
    }
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app_state.extractor.stats()))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stats: app_state.extractor.stats(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Citation Network Engine</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Citation Network API</h1>
        <p>Extract legal citations from case documents and build precedent networks with authority scoring.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /extract
            <p>Extract structured citations from a single case document.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /network
            <p>Build a precedent network over a corpus of case documents.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /stats
            <p>Get extraction statistics (documents processed, success rate, averages).</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Check the health status of the service.</p>
        </div>

        <h2>Example Extraction Request</h2>
        <pre>{
  "id": "smith-v-jones",
  "title": "Smith v. Jones",
  "content": "In Smith v. Jones, 123 U.S. 456 (2020), the Supreme Court held..."
}</pre>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
