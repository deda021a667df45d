//! # Network Builder Module
//!
//! ## Purpose
//! Assembles a corpus of extracted documents into a directed precedent graph:
//! citations are resolved to other in-corpus documents by case-name matching,
//! and each document receives authority/influence scores and a precedent rank.
//!
//! ## Input/Output Specification
//! - **Input**: A corpus of case documents
//! - **Output**: One `CitationNetwork` per document, keyed by case id
//! - **Phases**: parallel extraction map → sequential edge resolution →
//!   sequential scoring and ranking
//!
//! ## Key Features
//! - Embarrassingly parallel Phase-1 extraction over the corpus
//! - Deterministic first-match-wins edge resolution in input order
//! - One-pass authority/influence scoring with stable rank assignment
//! - Per-document failure isolation: a bad document still gets a node
//!
//! Edge resolution is O(N²) in the worst case (every citation checked against
//! every node); callers building very large corpora should impose their own
//! deadline around the whole build.

use crate::config::NetworkConfig;
use crate::extractor::{Citation, CitationExtractor};
use crate::utils::Timer;
use crate::CaseDocument;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Divisor mapping inbound-edge counts onto the [0, 1] authority scale
const AUTHORITY_SATURATION: f64 = 50.0;

/// Weight each citing document's authority contributes to influence
const INFLUENCE_WEIGHT: f64 = 0.1;

/// One corpus document's position in the citation graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationNetwork {
    /// Caller-supplied identity
    pub case_id: String,
    /// Caller-supplied case name (matched against other documents' citations)
    pub case_name: String,
    /// Citations this document makes (edges leaving this node)
    pub outbound_citations: Vec<Citation>,
    /// Ids of corpus documents found to cite this one (edges entering)
    pub inbound_citations: Vec<String>,
    /// Monotonic function of inbound-edge count, in [0, 1]
    pub authority_score: f64,
    /// Reward for being cited by already-authoritative documents, in [0, 1]
    pub influence_score: f64,
    /// 1-based rank by combined score, ties broken by input order
    pub precedent_rank: usize,
}

/// Builds precedent networks over a shared extractor instance
pub struct NetworkBuilder {
    extractor: Arc<CitationExtractor>,
    parallel: bool,
    large_corpus_warning: usize,
}

impl NetworkBuilder {
    /// Create a builder with default settings (parallel extraction on)
    pub fn new(extractor: Arc<CitationExtractor>) -> Self {
        Self {
            extractor,
            parallel: true,
            large_corpus_warning: 10_000,
        }
    }

    /// Create a builder from network configuration
    pub fn from_config(extractor: Arc<CitationExtractor>, config: &NetworkConfig) -> Self {
        Self {
            extractor,
            parallel: config.parallel_extraction,
            large_corpus_warning: config.large_corpus_warning_threshold,
        }
    }

    /// Build the citation network for a corpus of documents.
    ///
    /// Safe to call with an empty corpus. A document whose extraction fails
    /// internally still gets a node with an empty outbound list; the build
    /// never aborts due to one bad document.
    pub fn build_citation_network(
        &self,
        documents: &[CaseDocument],
    ) -> HashMap<String, CitationNetwork> {
        if documents.is_empty() {
            return HashMap::new();
        }
        if documents.len() > self.large_corpus_warning {
            tracing::warn!(
                "Building citation network over {} documents; edge resolution is O(N²)",
                documents.len()
            );
        }

        let timer = Timer::new("build_citation_network");

        // Phase 1: per-document extraction, an order-preserving parallel map
        let extracted: Vec<Vec<Citation>> = if self.parallel {
            documents
                .par_iter()
                .map(|d| self.extractor.extract_citations(d))
                .collect()
        } else {
            documents
                .iter()
                .map(|d| self.extractor.extract_citations(d))
                .collect()
        };

        let mut nodes: Vec<CitationNetwork> = documents
            .iter()
            .zip(extracted)
            .map(|(document, outbound)| CitationNetwork {
                case_id: document.id.clone(),
                case_name: document.title.clone(),
                outbound_citations: outbound,
                inbound_citations: Vec::new(),
                authority_score: 0.0,
                influence_score: 0.0,
                precedent_rank: 0,
            })
            .collect();

        let edges = self.resolve_edges(&mut nodes);
        self.score_nodes(&mut nodes);

        let elapsed = timer.stop();
        tracing::info!(
            "Built citation network: {} nodes, {} edges in {}ms",
            nodes.len(),
            edges,
            elapsed
        );

        nodes
            .into_iter()
            .map(|node| (node.case_id.clone(), node))
            .collect()
    }

    /// Phase 2: resolve outbound citations to in-corpus documents.
    ///
    /// Nodes are visited in input order and the first name match wins. A
    /// citation that resolves to no corpus member is silently dropped from
    /// the graph but remains in the citing document's outbound list.
    fn resolve_edges(&self, nodes: &mut [CitationNetwork]) -> usize {
        let node_names: Vec<String> = nodes
            .iter()
            .map(|n| normalize_case_name(&n.case_name))
            .collect();

        let mut edges = 0;
        for citing_index in 0..nodes.len() {
            let citing_id = nodes[citing_index].case_id.clone();
            let cited_names: Vec<String> = nodes[citing_index]
                .outbound_citations
                .iter()
                .filter_map(|c| c.case_name.as_deref())
                .map(normalize_case_name)
                .collect();

            for cited_name in cited_names {
                // The empty string is a substring of everything
                if cited_name.is_empty() {
                    continue;
                }
                let target = (0..nodes.len()).find(|&i| {
                    i != citing_index
                        && !node_names[i].is_empty()
                        && names_match(&node_names[i], &cited_name)
                });
                if let Some(target_index) = target {
                    nodes[target_index].inbound_citations.push(citing_id.clone());
                    edges += 1;
                }
            }
        }
        edges
    }

    /// Phase 3: authority and influence scoring, then stable rank assignment
    fn score_nodes(&self, nodes: &mut [CitationNetwork]) {
        for node in nodes.iter_mut() {
            node.authority_score =
                (node.inbound_citations.len() as f64 / AUTHORITY_SATURATION).min(1.0);
        }

        // Influence uses the authority scores computed above; a single pass,
        // not a fixed-point iteration.
        let authority_by_id: HashMap<&str, f64> = nodes
            .iter()
            .map(|n| (n.case_id.as_str(), n.authority_score))
            .collect();
        let influences: Vec<f64> = nodes
            .iter()
            .map(|node| {
                let total: f64 = node
                    .inbound_citations
                    .iter()
                    .map(|id| authority_by_id.get(id.as_str()).copied().unwrap_or(0.0))
                    .map(|authority| authority * INFLUENCE_WEIGHT)
                    .sum();
                total.min(1.0)
            })
            .collect();
        for (node, influence) in nodes.iter_mut().zip(influences) {
            node.influence_score = influence;
        }

        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by(|&a, &b| {
            let score_a = nodes[a].authority_score + nodes[a].influence_score;
            let score_b = nodes[b].authority_score + nodes[b].influence_score;
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (rank, &index) in order.iter().enumerate() {
            nodes[index].precedent_rank = rank + 1;
        }
    }
}

/// Lower-case and collapse " v. " to " v " for name comparison
fn normalize_case_name(name: &str) -> String {
    name.to_lowercase().replace(" v. ", " v ")
}

/// Substring containment in either direction
fn names_match(node_name: &str, cited_name: &str) -> bool {
    node_name.contains(cited_name) || cited_name.contains(node_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CitationExtractor;

    fn builder() -> NetworkBuilder {
        let extractor = Arc::new(CitationExtractor::new().expect("extractor builds"));
        NetworkBuilder::new(extractor)
    }

    fn doc(id: &str, title: &str, content: &str) -> CaseDocument {
        CaseDocument {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn assert_graph_consistent(network: &HashMap<String, CitationNetwork>) {
        for node in network.values() {
            for citing_id in &node.inbound_citations {
                let citing = network.get(citing_id).expect("citing node exists");
                let node_name = normalize_case_name(&node.case_name);
                assert!(
                    citing.outbound_citations.iter().any(|c| {
                        c.case_name
                            .as_deref()
                            .map(|n| names_match(&node_name, &normalize_case_name(n)))
                            .unwrap_or(false)
                    }),
                    "inbound edge {} -> {} has no matching outbound citation",
                    citing_id,
                    node.case_id
                );
            }
        }
    }

    #[test]
    fn test_empty_corpus() {
        assert!(builder().build_citation_network(&[]).is_empty());
    }

    #[test]
    fn test_single_document_without_citations() {
        let network =
            builder().build_citation_network(&[doc("only", "Lone v. Case", "No citations here.")]);
        let node = network.get("only").expect("node exists");
        assert!(node.outbound_citations.is_empty());
        assert!(node.inbound_citations.is_empty());
        assert_eq!(node.authority_score, 0.0);
        assert_eq!(node.influence_score, 0.0);
        assert_eq!(node.precedent_rank, 1);
    }

    #[test]
    fn test_edge_resolution_by_containment() {
        let documents = vec![
            doc("target", "Smith v. Jones", "The controlling opinion."),
            doc(
                "citer",
                "Later Opinion",
                "We follow In Smith v. Jones, 123 U.S. 456 (2020), on this point.",
            ),
        ];
        let network = builder().build_citation_network(&documents);

        let target = network.get("target").expect("target node");
        assert_eq!(target.inbound_citations, vec!["citer".to_string()]);
        assert_graph_consistent(&network);
    }

    #[test]
    fn test_unresolvable_citations_are_dropped_from_graph() {
        let documents = vec![doc(
            "citer",
            "Later Opinion",
            "This case follows Brown v. Board, 347 U.S. 483 (1954).",
        )];
        let network = builder().build_citation_network(&documents);

        let citer = network.get("citer").expect("citer node");
        assert!(!citer.outbound_citations.is_empty());
        assert!(citer.inbound_citations.is_empty());
    }

    #[test]
    fn test_self_citation_produces_no_edge() {
        let documents = vec![doc(
            "roe",
            "Roe v. Wade",
            "In Roe v. Wade, 410 U.S. 113 (1973), this Court held...",
        )];
        let network = builder().build_citation_network(&documents);
        let node = network.get("roe").expect("node exists");
        assert!(node.inbound_citations.is_empty());
    }

    #[test]
    fn test_authority_ordering_and_rank_permutation() {
        let mut documents = vec![
            doc("x", "Alpha v. Beta", "The landmark opinion."),
            doc("y", "Gamma v. Delta", "A narrower holding."),
        ];
        for i in 0..10 {
            documents.push(doc(
                &format!("citer-x-{}", i),
                &format!("Citing Opinion {}", i),
                "This case follows Alpha v. Beta, 123 U.S. 456 (2020), directly.",
            ));
        }
        documents.push(doc(
            "citer-y",
            "Citing Opinion 10",
            "This case follows Gamma v. Delta, 347 U.S. 483 (1954), directly.",
        ));

        let network = builder().build_citation_network(&documents);
        assert_eq!(network.len(), documents.len());

        let x = network.get("x").expect("x node");
        let y = network.get("y").expect("y node");
        assert_eq!(x.inbound_citations.len(), 10);
        assert_eq!(y.inbound_citations.len(), 1);
        assert!(x.authority_score > y.authority_score);
        assert!(x.precedent_rank < y.precedent_rank);

        // Ranks form a permutation of 1..=N
        let mut ranks: Vec<usize> = network.values().map(|n| n.precedent_rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=documents.len()).collect::<Vec<_>>());

        assert_graph_consistent(&network);
    }

    #[test]
    fn test_score_bounds() {
        let documents: Vec<CaseDocument> = (0..5)
            .map(|i| {
                doc(
                    &format!("doc-{}", i),
                    &format!("Opinion {}", i),
                    "This case follows Alpha v. Beta, 123 U.S. 456 (2020).",
                )
            })
            .collect();
        let network = builder().build_citation_network(&documents);
        for node in network.values() {
            assert!((0.0..=1.0).contains(&node.authority_score));
            assert!((0.0..=1.0).contains(&node.influence_score));
        }
    }

    #[test]
    fn test_sequential_and_parallel_builds_agree() {
        let padding = "Background. ".repeat(10);
        let documents = vec![
            doc(
                "a",
                "Alpha v. Beta",
                &format!("{}We follow Gamma v. Delta, 347 U.S. 483 (1954).", padding),
            ),
            doc(
                "b",
                "Gamma v. Delta",
                &format!("{}We follow Alpha v. Beta, 123 U.S. 456 (2020).", padding),
            ),
        ];
        let extractor = Arc::new(CitationExtractor::new().expect("extractor builds"));
        let sequential = NetworkBuilder {
            extractor: extractor.clone(),
            parallel: false,
            large_corpus_warning: 10_000,
        }
        .build_citation_network(&documents);
        let parallel = builder().build_citation_network(&documents);

        for id in ["a", "b"] {
            let s = sequential.get(id).expect("sequential node");
            let p = parallel.get(id).expect("parallel node");
            assert_eq!(s.inbound_citations, p.inbound_citations);
            assert_eq!(s.precedent_rank, p.precedent_rank);
        }
    }
}
