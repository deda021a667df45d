//! # Pattern Library Module
//!
//! ## Purpose
//! Static regex and lookup tables that drive citation extraction: citation
//! reporter formats per court system, court identification fragments,
//! rhetorical context markers, and case-name shapes.
//!
//! ## Input/Output Specification
//! - **Input**: Citation strings and context snippets from the extractor
//! - **Output**: Classification labels (`CitationType`, `CitationContext`,
//!   `CourtLevel`), court names, case names
//! - **Contract**: Pure functions over compiled tables; unmatched input yields
//!   `None`/default variants, never an error
//!
//! ## Key Features
//! - Reporter format patterns for federal and state citation systems
//! - Court hierarchy identification with ordinal levels
//! - Rhetorical stance markers (following, distinguishing, overruling...)
//! - Case-name recognition including "In re"/"Ex parte" forms
//!
//! Patterns are kept as plain data keyed by enum variant so the corpus of
//! patterns can be unit-tested independently of the extraction algorithm and
//! extended without touching extraction logic.

use crate::errors::{CitationError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Citation classification by authority system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationType {
    SupremeCourt,
    CircuitCourt,
    DistrictCourt,
    StateCourt,
    Statute,
    Regulation,
    Unknown,
}

impl CitationType {
    /// Types with reporter format patterns, in matching order
    pub fn matchable() -> [CitationType; 6] {
        [
            CitationType::SupremeCourt,
            CitationType::CircuitCourt,
            CitationType::DistrictCourt,
            CitationType::StateCourt,
            CitationType::Statute,
            CitationType::Regulation,
        ]
    }

    /// Static authority weight for this citation type.
    ///
    /// A pure function of the type, never mutated per-instance.
    pub fn authority_level(self) -> f64 {
        match self {
            CitationType::SupremeCourt => 1.0,
            CitationType::Statute => 0.90,
            CitationType::CircuitCourt => 0.85,
            CitationType::Regulation => 0.70,
            CitationType::DistrictCourt => 0.65,
            CitationType::StateCourt => 0.50,
            CitationType::Unknown => 0.30,
        }
    }
}

/// Rhetorical stance of the citing text toward the cited authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationContext {
    Following,
    Distinguishing,
    Overruling,
    Criticizing,
    Neutral,
    Unknown,
}

/// Ordinal court hierarchy rank, supreme = 1 through state trial = 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtLevel {
    Supreme = 1,
    CircuitAppellate = 2,
    District = 3,
    StateSupreme = 4,
    StateAppellate = 5,
    StateTrial = 6,
}

impl CourtLevel {
    /// Numeric rank for hierarchy comparisons (lower outranks higher)
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// A court identification entry: reporter fragment → court classification
#[derive(Debug)]
pub struct CourtPattern {
    regex: Regex,
    court: &'static str,
    citation_type: CitationType,
    level: Option<CourtLevel>,
}

/// How a matched case-name pattern is rendered
#[derive(Debug, Clone, Copy)]
enum CaseNameForm {
    /// Two captured parties joined with " v. "
    Versus,
    /// Single captured party prefixed "In re "
    InRe,
    /// Single captured party prefixed "Ex parte "
    ExParte,
}

#[derive(Debug)]
struct CaseNamePattern {
    regex: Regex,
    form: CaseNameForm,
}

/// Compiled pattern tables used by the extractor.
///
/// Built once at startup; holds no runtime state and performs no I/O.
#[derive(Debug)]
pub struct PatternLibrary {
    citation_formats: Vec<(CitationType, Vec<Regex>)>,
    court_patterns: Vec<CourtPattern>,
    context_patterns: Vec<(CitationContext, Vec<Regex>)>,
    case_name_patterns: Vec<CaseNamePattern>,
    year: Regex,
    well_formed: Regex,
    circuit_number: Regex,
    district_fragment: Regex,
    state_fragment: Regex,
}

/// Literal substrings marking a federal citation
const FEDERAL_MARKERS: [&str; 4] = ["U.S.", "F.", "Fed.", "S. Ct."];

impl PatternLibrary {
    /// Compile all pattern tables
    pub fn new() -> Result<Self> {
        let citation_formats = vec![
            (
                CitationType::SupremeCourt,
                compile_all(&[
                    r"(?i)\d{1,3}\s+U\.?\s?S\.?\s+\d{1,4}(?:\s*\((?:19|20)\d{2}\))?",
                    r"(?i)\d{1,3}\s+S\.\s?Ct\.\s+\d{1,4}(?:\s*\((?:19|20)\d{2}\))?",
                ])?,
            ),
            (
                CitationType::CircuitCourt,
                compile_all(&[
                    r"(?i)\d{1,4}\s+F\.\s?(?:2d|3d|4th)\s+\d{1,4}(?:\s*\([^)]{0,40}?(?:19|20)\d{2}\))?",
                ])?,
            ),
            (
                CitationType::DistrictCourt,
                compile_all(&[
                    r"(?i)\d{1,4}\s+F\.\s?Supp\.?\s?(?:2d|3d)?\s+\d{1,4}(?:\s*\([^)]{0,40}?(?:19|20)\d{2}\))?",
                ])?,
            ),
            (
                CitationType::StateCourt,
                compile_all(&[
                    // Regional reporters (P., N.E., N.W., S.E., S.W., A., So.)
                    r"(?i)\d{1,4}\s+(?:P|N\.E|N\.W|S\.E|S\.W|A|So)\.\s?(?:2d|3d)?\s+\d{1,4}(?:\s*\((?:19|20)\d{2}\))?",
                    // State reporter abbreviations ("123 Cal. 2d 456", "100 Mass. 200")
                    r"(?i)\d{1,4}\s+[A-Z][a-z]{1,9}\.\s?(?:2d|3d|App\.)?\s?\d{1,4}(?:\s*\((?:19|20)\d{2}\))?",
                ])?,
            ),
            (
                CitationType::Statute,
                compile_all(&[r"(?i)\d{1,3}\s+U\.?\s?S\.?\s?C\.?\s+(?:§+\s*)?\d+(?:\([a-z0-9]+\))*"])?,
            ),
            (
                CitationType::Regulation,
                compile_all(&[r"(?i)\d{1,3}\s+C\.?\s?F\.?\s?R\.?\s+(?:§+\s*)?\d+(?:\.\d+)?"])?,
            ),
        ];

        let court_patterns = vec![
            CourtPattern {
                regex: compile(r"(?i)\bS\.\s?Ct\.|\bU\.?\s?S\.?\s+\d")?,
                court: "U.S. Supreme Court",
                citation_type: CitationType::SupremeCourt,
                level: Some(CourtLevel::Supreme),
            },
            CourtPattern {
                regex: compile(r"(?i)\bF\.\s?(?:2d|3d|4th)\b|\bCir\.")?,
                court: "U.S. Court of Appeals",
                citation_type: CitationType::CircuitCourt,
                level: Some(CourtLevel::CircuitAppellate),
            },
            CourtPattern {
                regex: compile(r"(?i)\bF\.\s?Supp")?,
                court: "U.S. District Court",
                citation_type: CitationType::DistrictCourt,
                level: Some(CourtLevel::District),
            },
            CourtPattern {
                regex: compile(r"(?i)\bSup\.\s?Ct\.")?,
                court: "State Supreme Court",
                citation_type: CitationType::StateCourt,
                level: Some(CourtLevel::StateSupreme),
            },
            CourtPattern {
                regex: compile(r"(?i)\bApp\.")?,
                court: "State Appellate Court",
                citation_type: CitationType::StateCourt,
                level: Some(CourtLevel::StateAppellate),
            },
            CourtPattern {
                regex: compile(r"(?i)\b(?:P|N\.E|N\.W|S\.E|S\.W|So)\.\s?(?:2d|3d)?\s+\d")?,
                court: "State Court",
                citation_type: CitationType::StateCourt,
                level: Some(CourtLevel::StateSupreme),
            },
        ];

        let context_patterns = vec![
            (
                CitationContext::Following,
                compile_all(&[
                    r"follow(?:s|ed|ing)?\b",
                    r"\bapplie[sd]\b|\bapplying\b",
                    r"consistent with",
                    r"in accord(?:ance)? with",
                    r"adopt(?:s|ed|ing)?\b",
                    r"reaffirm",
                ])?,
            ),
            (
                CitationContext::Distinguishing,
                compile_all(&[
                    r"distinguish(?:es|ed|ing|able)?",
                    r"different from",
                    r"\bunlike\b",
                    r"inapposite",
                ])?,
            ),
            (
                CitationContext::Overruling,
                compile_all(&[
                    r"overrul(?:e|es|ed|ing)",
                    r"revers(?:e|es|ed|ing)",
                    r"vacat(?:e|es|ed|ing)",
                    r"abrogat(?:e|es|ed|ing)",
                ])?,
            ),
            (
                CitationContext::Criticizing,
                compile_all(&[
                    r"criticiz(?:e|es|ed|ing)",
                    r"cast(?:s)?\s+doubt",
                    r"declin(?:e|es|ed)\s+to\s+(?:follow|extend)",
                    r"reject(?:s|ed|ing)?\b",
                ])?,
            ),
        ];

        let case_name_patterns = vec![
            CaseNamePattern {
                regex: compile(
                    r"([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*)\s+v\.?\s+([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*)",
                )?,
                form: CaseNameForm::Versus,
            },
            // All-caps variant ("SMITH V. JONES")
            CaseNamePattern {
                regex: compile(
                    r"\b([A-Z]{2,}(?:\s+[A-Z]{2,})*)\s+V\.\s+([A-Z]{2,}(?:\s+[A-Z]{2,})*)",
                )?,
                form: CaseNameForm::Versus,
            },
            CaseNamePattern {
                regex: compile(r"(?:In re|IN RE)\s+([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*)")?,
                form: CaseNameForm::InRe,
            },
            CaseNamePattern {
                regex: compile(
                    r"(?:Ex parte|EX PARTE)\s+([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*)",
                )?,
                form: CaseNameForm::ExParte,
            },
        ];

        Ok(Self {
            citation_formats,
            court_patterns,
            context_patterns,
            case_name_patterns,
            year: compile(r"(?:19|20)\d{2}")?,
            well_formed: compile(r"\d{1,4}\s+[A-Z][a-z]*\.?\s+\d{1,4}")?,
            circuit_number: compile(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+Cir\b")?,
            district_fragment: compile(r"(?:[NSEW]\.\s?)?D\.(?:\s?[A-Za-z]{1,4}\.?){1,3}")?,
            state_fragment: compile(r"\b([A-Za-z]{2,4})\.?\s+(?:App\.|Sup\.|Ct\.)")?,
        })
    }

    /// Reporter format patterns, keyed by citation type in matching order
    pub fn citation_formats(&self) -> &[(CitationType, Vec<Regex>)] {
        &self.citation_formats
    }

    /// Identify the court behind a citation string. First hit wins.
    pub fn identify_court(
        &self,
        citation_text: &str,
    ) -> Option<(&'static str, CitationType, Option<CourtLevel>)> {
        self.court_patterns
            .iter()
            .find(|p| p.regex.is_match(citation_text))
            .map(|p| (p.court, p.citation_type, p.level))
    }

    /// Classify the rhetorical stance of a lower-cased context snippet.
    /// Stances are tried in table order; first match wins, default `Neutral`.
    pub fn classify_context(&self, snippet_lower: &str) -> CitationContext {
        for (stance, patterns) in &self.context_patterns {
            if patterns.iter().any(|p| p.is_match(snippet_lower)) {
                return *stance;
            }
        }
        CitationContext::Neutral
    }

    /// Opportunistically pull a human-readable case name out of a snippet
    pub fn extract_case_name(&self, snippet: &str) -> Option<String> {
        for pattern in &self.case_name_patterns {
            if let Some(captures) = pattern.regex.captures(snippet) {
                let name = match pattern.form {
                    CaseNameForm::Versus => {
                        let left = captures.get(1)?.as_str().trim();
                        let right = captures.get(2)?.as_str().trim();
                        format!("{} v. {}", left, right)
                    }
                    CaseNameForm::InRe => format!("In re {}", captures.get(1)?.as_str().trim()),
                    CaseNameForm::ExParte => {
                        format!("Ex parte {}", captures.get(1)?.as_str().trim())
                    }
                };
                return Some(name);
            }
        }
        None
    }

    /// First plausible 4-digit year in the given text
    pub fn year_in(&self, text: &str) -> Option<i32> {
        self.year
            .find(text)
            .and_then(|m| m.as_str().parse::<i32>().ok())
    }

    /// Whether the text contains a generic well-formed reporter shape
    pub fn is_well_formed(&self, text: &str) -> bool {
        self.well_formed.is_match(text)
    }

    /// Whether the citation text carries a federal reporter marker
    pub fn has_federal_marker(&self, text: &str) -> bool {
        FEDERAL_MARKERS.iter().any(|m| text.contains(m))
    }

    /// Circuit number fragment ("9th Cir.") in a federal citation, if any
    pub fn circuit_number(&self, text: &str) -> Option<String> {
        self.circuit_number
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// District fragment ("S.D.N.Y.", "D. Mass.") normalized to letters only
    pub fn district_fragment(&self, text: &str) -> Option<String> {
        self.district_fragment.find(text).map(|m| {
            m.as_str()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect()
        })
    }

    /// State code preceding an App./Sup./Ct. fragment, if any
    pub fn state_fragment(&self, text: &str) -> Option<String> {
        self.state_fragment
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| CitationError::PatternCompilation {
        pattern: pattern.to_string(),
        details: e.to_string(),
    })
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> PatternLibrary {
        PatternLibrary::new().expect("patterns compile")
    }

    #[test]
    fn test_all_tables_compile() {
        let lib = library();
        assert_eq!(lib.citation_formats().len(), 6);
    }

    #[test]
    fn test_authority_levels() {
        assert_eq!(CitationType::SupremeCourt.authority_level(), 1.0);
        assert_eq!(CitationType::Statute.authority_level(), 0.90);
        assert_eq!(CitationType::CircuitCourt.authority_level(), 0.85);
        assert_eq!(CitationType::Regulation.authority_level(), 0.70);
        assert_eq!(CitationType::DistrictCourt.authority_level(), 0.65);
        assert_eq!(CitationType::StateCourt.authority_level(), 0.50);
        for citation_type in CitationType::matchable() {
            let level = citation_type.authority_level();
            assert!((0.0..=1.0).contains(&level));
        }
    }

    #[test]
    fn test_supreme_court_formats() {
        let lib = library();
        let (_, patterns) = &lib.citation_formats()[0];
        assert!(patterns.iter().any(|p| p.is_match("123 U.S. 456 (2020)")));
        assert!(patterns.iter().any(|p| p.is_match("347 U.S. 483")));
        assert!(patterns.iter().any(|p| p.is_match("120 S. Ct. 1346")));
        assert!(!patterns.iter().any(|p| p.is_match("no citation here")));
    }

    #[test]
    fn test_statute_and_regulation_formats() {
        let lib = library();
        let statute = lib
            .citation_formats()
            .iter()
            .find(|(t, _)| *t == CitationType::Statute)
            .map(|(_, p)| p)
            .expect("statute patterns");
        assert!(statute.iter().any(|p| p.is_match("42 U.S.C. § 1983")));
        assert!(statute.iter().any(|p| p.is_match("18 U.S.C. 922(g)(1)")));

        let regulation = lib
            .citation_formats()
            .iter()
            .find(|(t, _)| *t == CitationType::Regulation)
            .map(|(_, p)| p)
            .expect("regulation patterns");
        assert!(regulation.iter().any(|p| p.is_match("29 C.F.R. § 1604.11")));
    }

    #[test]
    fn test_court_identification_first_hit_wins() {
        let lib = library();
        let (court, citation_type, level) = lib
            .identify_court("123 U.S. 456 (2020)")
            .expect("supreme court identified");
        assert_eq!(court, "U.S. Supreme Court");
        assert_eq!(citation_type, CitationType::SupremeCourt);
        assert_eq!(level, Some(CourtLevel::Supreme));

        let (court, _, level) = lib
            .identify_court("987 F.2d 654 (9th Cir. 1993)")
            .expect("circuit identified");
        assert_eq!(court, "U.S. Court of Appeals");
        assert_eq!(level, Some(CourtLevel::CircuitAppellate));

        let (court, _, level) = lib
            .identify_court("750 F. Supp. 1314")
            .expect("district identified");
        assert_eq!(court, "U.S. District Court");
        assert_eq!(level, Some(CourtLevel::District));

        assert!(lib.identify_court("nothing court-like").is_none());
    }

    #[test]
    fn test_court_levels_are_ordinal() {
        assert_eq!(CourtLevel::Supreme.rank(), 1);
        assert_eq!(CourtLevel::StateTrial.rank(), 6);
        assert!(CourtLevel::Supreme < CourtLevel::District);
    }

    #[test]
    fn test_context_classification() {
        let lib = library();
        assert_eq!(
            lib.classify_context("this case follows the precedent established in"),
            CitationContext::Following
        );
        assert_eq!(
            lib.classify_context("however, we distinguish this case from"),
            CitationContext::Distinguishing
        );
        assert_eq!(
            lib.classify_context("the decision below is reversed and the judgment vacated"),
            CitationContext::Overruling
        );
        assert_eq!(
            lib.classify_context("we decline to follow the reasoning of"),
            CitationContext::Following,
            "evaluation order is fixed; following markers are checked first"
        );
        assert_eq!(
            lib.classify_context("the court held that the statute applied"),
            CitationContext::Following
        );
        assert_eq!(
            lib.classify_context("the parties stipulated to the facts"),
            CitationContext::Neutral
        );
    }

    #[test]
    fn test_case_name_extraction() {
        let lib = library();
        assert_eq!(
            lib.extract_case_name("as established in Brown v. Board, 347 U.S. 483"),
            Some("Brown v. Board".to_string())
        );
        assert_eq!(
            lib.extract_case_name("see In re Winship, 397 U.S. 358"),
            Some("In re Winship".to_string())
        );
        assert_eq!(
            lib.extract_case_name("Ex parte Young settled the question"),
            Some("Ex parte Young".to_string())
        );
        assert_eq!(lib.extract_case_name("no names in this text"), None);
    }

    #[test]
    fn test_year_and_well_formed_helpers() {
        let lib = library();
        assert_eq!(lib.year_in("347 U.S. 483 (1954)"), Some(1954));
        assert_eq!(lib.year_in("no year"), None);
        assert!(lib.is_well_formed("123 Cal. 456"));
        assert!(lib.has_federal_marker("123 U.S. 456"));
        assert!(!lib.has_federal_marker("123 Cal. 456"));
    }

    #[test]
    fn test_jurisdiction_fragments() {
        let lib = library();
        assert_eq!(
            lib.circuit_number("987 F.2d 654 (9th Cir. 1993)"),
            Some("9".to_string())
        );
        assert_eq!(
            lib.district_fragment("750 F. Supp. 1314 (S.D.N.Y. 1990)"),
            Some("SDNY".to_string())
        );
        assert_eq!(
            lib.state_fragment("123 Cal. App. 456"),
            Some("Cal".to_string())
        );
    }
}
