//! # Citation Extractor Module
//!
//! ## Purpose
//! Scans case documents for citation-like substrings using the pattern
//! library and enriches each match into a structured `Citation` record with
//! court, jurisdiction, year, rhetorical context, and confidence scoring.
//!
//! ## Input/Output Specification
//! - **Input**: Case documents (`id`, `title`, `content`)
//! - **Output**: Deduplicated `Citation` records, in pattern-iteration order
//! - **Guarantees**: Pure function of document text and the static pattern
//!   tables; never fails — internal errors degrade to an empty result and a
//!   failure counter increment
//!
//! ## Key Features
//! - Title and content searched as one buffer (title first)
//! - Context snippets (±100 chars) for stance and case-name inference
//! - Heuristic confidence scoring with clamped [0, 1] output
//! - Per-instance running statistics, safe under parallel extraction

use crate::config::ExtractionConfig;
use crate::errors::{CitationError, Result};
use crate::patterns::{CitationContext, CitationType, CourtLevel, PatternLibrary};
use crate::utils::TextUtils;
use crate::CaseDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Literal substrings that mark a high-confidence reporter citation
const CONFIDENCE_MARKERS: [&str; 4] = ["U.S.", "F.2d", "F.3d", "F. Supp"];

/// One recognized reference to an external legal authority.
///
/// Created once per pattern match during extraction and immutable thereafter;
/// deduplicated by `citation_string` within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Exact matched substring (e.g. "123 U.S. 456")
    pub citation_string: String,
    /// Case name pulled from the surrounding text, if found
    pub case_name: Option<String>,
    /// Court classification derived from the matched pattern
    pub court: Option<String>,
    /// Jurisdiction classification ("US_9_Circuit", "State_Cal", ...)
    pub jurisdiction: Option<String>,
    /// Decision year parsed from the matched citation text
    pub year: Option<i32>,
    /// Authority system classification
    pub citation_type: CitationType,
    /// Rhetorical stance of the citing text
    pub citation_context: CitationContext,
    /// Static weight keyed by citation type, in [0, 1]
    pub authority_level: f64,
    /// Ordinal court hierarchy rank, if identifiable
    pub court_level: Option<CourtLevel>,
    /// ~200 characters of surrounding text for inference and audit
    pub context_snippet: String,
    /// Heuristic extraction confidence, in [0, 1]
    pub confidence_score: f64,
}

/// Running extraction counters, monotonically incrementing, never reset.
///
/// Owned by one extractor instance; callers running multiple extractors
/// aggregate snapshots explicitly rather than sharing one set of counters.
#[derive(Debug, Default)]
pub struct ExtractionStats {
    documents_processed: AtomicU64,
    citations_extracted: AtomicU64,
    successful_extractions: AtomicU64,
    failed_extractions: AtomicU64,
}

impl ExtractionStats {
    fn record_success(&self, citation_count: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.citations_extracted
            .fetch_add(citation_count, Ordering::Relaxed);
        self.successful_extractions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.failed_extractions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-only statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub documents_processed: u64,
    pub citations_extracted: u64,
    pub successful_extractions: u64,
    pub failed_extractions: u64,
    /// Successful extractions as a percentage of documents processed, 2dp
    pub success_rate: f64,
    /// Citations extracted per document processed, 2dp
    pub average_citations_per_document: f64,
    pub generated_at: DateTime<Utc>,
}

/// Citation extractor over the static pattern library
pub struct CitationExtractor {
    patterns: PatternLibrary,
    config: ExtractionConfig,
    stats: ExtractionStats,
}

impl CitationExtractor {
    /// Create an extractor with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create an extractor with explicit extraction settings
    pub fn with_config(config: ExtractionConfig) -> Result<Self> {
        Ok(Self {
            patterns: PatternLibrary::new()?,
            config,
            stats: ExtractionStats::default(),
        })
    }

    /// Extract all citations from a document.
    ///
    /// Returns an empty list for documents with no recognizable citations.
    /// Internal failures are logged, counted, and degrade to an empty list —
    /// this operation never fails from the caller's perspective.
    pub fn extract_citations(&self, document: &CaseDocument) -> Vec<Citation> {
        match self.extract_inner(document) {
            Ok(citations) => {
                tracing::debug!(
                    "Extracted {} citations from document '{}'",
                    citations.len(),
                    document.id
                );
                self.stats.record_success(citations.len() as u64);
                citations
            }
            Err(e) => {
                tracing::error!(
                    "Citation extraction failed for document '{}': {}",
                    document.id,
                    e
                );
                self.stats.record_failure();
                Vec::new()
            }
        }
    }

    /// Read-only snapshot of the running counters
    pub fn stats(&self) -> StatsSnapshot {
        let documents = self.stats.documents_processed.load(Ordering::Relaxed);
        let citations = self.stats.citations_extracted.load(Ordering::Relaxed);
        let successful = self.stats.successful_extractions.load(Ordering::Relaxed);
        let failed = self.stats.failed_extractions.load(Ordering::Relaxed);

        let (success_rate, average) = if documents == 0 {
            (0.0, 0.0)
        } else {
            (
                round2(successful as f64 / documents as f64 * 100.0),
                round2(citations as f64 / documents as f64),
            )
        };

        StatsSnapshot {
            documents_processed: documents,
            citations_extracted: citations,
            successful_extractions: successful,
            failed_extractions: failed,
            success_rate,
            average_citations_per_document: average,
            generated_at: Utc::now(),
        }
    }

    fn extract_inner(&self, document: &CaseDocument) -> Result<Vec<Citation>> {
        // Title first, so citations appearing in titles are also found
        let buffer = format!("{} {}", document.title, document.content);

        let mut citations = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (citation_type, patterns) in self.patterns.citation_formats() {
            for pattern in patterns {
                for matched in pattern.find_iter(&buffer) {
                    if !seen.insert(matched.as_str().to_string()) {
                        continue;
                    }
                    let citation = self.enrich_match(
                        &buffer,
                        matched.as_str(),
                        matched.start(),
                        matched.end(),
                        *citation_type,
                    )?;
                    citations.push(citation);
                }
            }
        }

        Ok(citations)
    }

    /// Build a full `Citation` record from one pattern match
    fn enrich_match(
        &self,
        buffer: &str,
        matched: &str,
        start: usize,
        end: usize,
        citation_type: CitationType,
    ) -> Result<Citation> {
        let snippet = TextUtils::char_window(buffer, start, end, self.config.context_window_chars)
            .ok_or_else(|| CitationError::Internal {
                message: format!("Invalid match bounds {}..{} in search buffer", start, end),
            })?;

        let year = self.patterns.year_in(matched);

        let (court, court_level) = match self.patterns.identify_court(matched) {
            Some((court, _, level)) => (Some(court.to_string()), level),
            None => (None, None),
        };

        let jurisdiction = self.derive_jurisdiction(matched);
        let citation_context = self.patterns.classify_context(&snippet.to_lowercase());
        let case_name = self.patterns.extract_case_name(snippet);
        let confidence_score = self.confidence_score(matched, year, snippet);

        Ok(Citation {
            citation_string: matched.to_string(),
            case_name,
            court,
            jurisdiction,
            year,
            citation_type,
            citation_context,
            authority_level: citation_type.authority_level(),
            court_level,
            context_snippet: snippet.to_string(),
            confidence_score,
        })
    }

    /// Derive a jurisdiction label from the citation text.
    ///
    /// Federal citations resolve to a circuit or district when a fragment is
    /// present, else "US_Federal"; state citations resolve to "State_<code>".
    fn derive_jurisdiction(&self, citation_text: &str) -> Option<String> {
        if self.patterns.has_federal_marker(citation_text) {
            if let Some(n) = self.patterns.circuit_number(citation_text) {
                return Some(format!("US_{}_Circuit", n));
            }
            if let Some(fragment) = self.patterns.district_fragment(citation_text) {
                return Some(format!("US_{}_District", fragment));
            }
            return Some("US_Federal".to_string());
        }

        self.patterns
            .state_fragment(citation_text)
            .map(|code| format!("State_{}", code))
    }

    /// Heuristic confidence in a match, clamped to [0, 1].
    ///
    /// Base 0.5; +0.3 for a generic well-formed reporter shape, +0.2 for a
    /// parseable year, +0.2 for a known reporter marker, −0.2 for a short
    /// context snippet.
    fn confidence_score(&self, matched: &str, year: Option<i32>, snippet: &str) -> f64 {
        let mut score: f64 = 0.5;

        if self.patterns.is_well_formed(matched) {
            score += 0.3;
        }
        if year.is_some() {
            score += 0.2;
        }
        if CONFIDENCE_MARKERS.iter().any(|m| matched.contains(m)) {
            score += 0.2;
        }
        if snippet.chars().count() < self.config.short_snippet_threshold {
            score -= 0.2;
        }

        score.clamp(0.0, 1.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
