//! # Legal Citation Extraction & Precedent Network Builder
//!
//! ## Overview
//! This library extracts structured legal citations from U.S. case documents
//! and assembles a corpus-wide precedent network with per-document authority
//! and influence scores.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `patterns`: Static regex tables for citation formats, courts, and rhetorical context
//! - `extractor`: Citation extraction, enrichment, and confidence scoring
//! - `network`: Precedent graph assembly and authority/influence ranking
//! - `api`: REST API endpoints for extraction and network building
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Case documents (`id`, `title`, `content`), individually or as a corpus
//! - **Output**: Structured `Citation` records; a `CitationNetwork` per corpus document
//! - **Guarantees**: Extraction is a pure function of document text; malformed
//!   input degrades to empty or `unknown` results, never an error
//!
//! ## Usage
//! ```rust,no_run
//! use citation_network::{CaseDocument, CitationExtractor, NetworkBuilder};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Arc::new(CitationExtractor::new()?);
//!     let builder = NetworkBuilder::new(extractor.clone());
//!
//!     let doc = CaseDocument {
//!         id: "case-1".to_string(),
//!         title: "Smith v. Jones".to_string(),
//!         content: "See Brown v. Board, 347 U.S. 483 (1954).".to_string(),
//!     };
//!
//!     let citations = extractor.extract_citations(&doc);
//!     println!("Found {} citations", citations.len());
//!
//!     let network = builder.build_citation_network(&[doc]);
//!     println!("Built network with {} nodes", network.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod patterns;
pub mod extractor;
pub mod network;
pub mod api;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use errors::{CitationError, Result};
pub use extractor::{Citation, CitationExtractor, StatsSnapshot};
pub use network::{CitationNetwork, NetworkBuilder};
pub use patterns::{CitationContext, CitationType, CourtLevel, PatternLibrary};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A case document submitted for citation extraction.
///
/// The source of the document (database, filesystem, HTTP upload) is the
/// caller's concern; missing `title`/`content` fields deserialize to empty
/// strings and simply yield fewer matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDocument {
    /// Caller-supplied unique identifier
    pub id: String,
    /// Case name/title (searched ahead of the body text)
    #[serde(default)]
    pub title: String,
    /// Full document text
    #[serde(default)]
    pub content: String,
}

/// Application state shared across API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub extractor: Arc<extractor::CitationExtractor>,
    pub network_builder: Arc<network::NetworkBuilder>,
}
