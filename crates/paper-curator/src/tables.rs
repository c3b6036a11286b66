//! Default configuration tables for the PHM literature domain.
//!
//! Concept weights, venue quality entries, category keywords, methodology and
//! application-domain groups, and source priorities. Every table can be
//! replaced wholesale through [`crate::config::Config`]; the pipeline never
//! reads these defaults directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fallback category when no category keywords match a paper.
pub const DEFAULT_CATEGORY: &str = "fault-diagnosis";

/// A weighted concept with its keyword pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Concept identifier, e.g. `prognostics`
    pub name: String,
    /// Contribution weight within the relevance score
    pub weight: f64,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
}

impl Concept {
    fn new(name: &str, weight: f64, keywords: &[&str]) -> Self {
        Self { name: name.to_string(), weight, keywords: owned(keywords) }
    }
}

/// Publication venue kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Journal,
    Conference,
    Dataset,
}

/// Journal ranking quartile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

/// Derived venue quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueTier {
    TopTier,
    HighQuality,
    Standard,
    Emerging,
    Unknown,
}

impl VenueTier {
    /// Human-readable tier label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TopTier => "top tier",
            Self::HighQuality => "high quality",
            Self::Standard => "standard",
            Self::Emerging => "emerging",
            Self::Unknown => "unknown",
        }
    }
}

/// One entry in the venue quality table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueEntry {
    /// Canonical venue name (matched case-insensitively)
    pub name: String,
    /// Journal impact factor, when known
    #[serde(default)]
    pub impact_factor: Option<f64>,
    /// Hand-assigned quality score in [0,1], used when no impact factor exists
    #[serde(default)]
    pub score: Option<f64>,
    /// Journal quartile, when known
    #[serde(default)]
    pub quartile: Option<Quartile>,
    /// Venue kind
    pub kind: VenueKind,
}

impl VenueEntry {
    fn journal(name: &str, impact_factor: f64, quartile: Quartile) -> Self {
        Self {
            name: name.to_string(),
            impact_factor: Some(impact_factor),
            score: None,
            quartile: Some(quartile),
            kind: VenueKind::Journal,
        }
    }

    fn conference(name: &str, score: f64) -> Self {
        Self {
            name: name.to_string(),
            impact_factor: None,
            score: Some(score),
            quartile: None,
            kind: VenueKind::Conference,
        }
    }

    fn dataset(name: &str, score: f64) -> Self {
        Self { kind: VenueKind::Dataset, ..Self::conference(name, score) }
    }

    /// Quality score in [0,1]: impact factor / 10 capped at 1.0, or the
    /// hand-assigned score.
    #[must_use]
    pub fn quality_score(&self) -> f64 {
        self.impact_factor
            .map(|f| (f / 10.0).min(1.0))
            .or(self.score)
            .unwrap_or(0.5)
    }

    /// Quality tier from quartile or score.
    #[must_use]
    pub fn tier(&self) -> VenueTier {
        let score = self.score.unwrap_or(0.0);
        match self.quartile {
            Some(Quartile::Q1) => VenueTier::TopTier,
            Some(Quartile::Q2) => VenueTier::HighQuality,
            Some(Quartile::Q3 | Quartile::Q4) => VenueTier::Standard,
            None if score >= 0.8 => VenueTier::TopTier,
            None if score >= 0.6 => VenueTier::HighQuality,
            None if score >= 0.4 => VenueTier::Standard,
            None => VenueTier::Emerging,
        }
    }
}

/// Venue quality table with exact lookup and partial keyword matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTable {
    entries: HashMap<String, VenueEntry>,
    /// Domain keywords used for partial matching against unknown venues
    pub partial_keywords: Vec<String>,
}

impl VenueTable {
    /// Build a table; entries are keyed by lowercased name.
    #[must_use]
    pub fn new(entries: Vec<VenueEntry>, partial_keywords: Vec<String>) -> Self {
        let entries = entries.into_iter().map(|e| (e.name.to_lowercase(), e)).collect();
        Self { entries, partial_keywords }
    }

    /// Exact case-insensitive lookup.
    #[must_use]
    pub fn lookup(&self, venue: &str) -> Option<&VenueEntry> {
        self.entries.get(venue.trim().to_lowercase().as_str())
    }

    /// Number of partial keywords contained in the venue name.
    #[must_use]
    pub fn partial_matches(&self, venue: &str) -> usize {
        let venue = venue.to_lowercase();
        self.partial_keywords.iter().filter(|k| venue.contains(k.as_str())).count()
    }

    /// Number of exact entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no exact entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A knowledge-graph category with its trigger keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Stable category slug, e.g. `rul-prediction`
    pub slug: String,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
}

impl Category {
    fn new(slug: &str, keywords: &[&str]) -> Self {
        Self { slug: slug.to_string(), keywords: owned(keywords) }
    }
}

/// A labeled keyword group for methodology and application-domain tagging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    /// Display label, e.g. `Deep Learning`
    pub label: String,
    /// Lowercase keywords matched as substrings
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    fn new(label: &str, keywords: &[&str]) -> Self {
        Self { label: label.to_string(), keywords: owned(keywords) }
    }
}

/// Source priority table. Higher wins; unknown sources get 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcePriorities(HashMap<String, u8>);

impl SourcePriorities {
    /// Build from (source, priority) pairs.
    #[must_use]
    pub fn new(pairs: &[(&str, u8)]) -> Self {
        Self(pairs.iter().map(|(name, p)| ((*name).to_string(), *p)).collect())
    }

    /// Priority for a source tag; 0 when unknown.
    #[must_use]
    pub fn priority_for(&self, source: &str) -> u8 {
        self.0.get(source).copied().unwrap_or(0)
    }

    /// True when no priorities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Default concept table: prognostics, health management, fault diagnosis,
/// and reliability, weighted for PHM literature triage.
#[must_use]
pub fn default_concepts() -> Vec<Concept> {
    vec![
        Concept::new(
            "prognostics",
            0.40,
            &[
                "prognostics",
                "prognosis",
                "remaining useful life",
                "rul",
                "life prediction",
                "degradation modeling",
                "failure prediction",
                "time to failure",
                "ttf",
                "health prognosis",
                "predictive maintenance",
                "lifetime estimation",
            ],
        ),
        Concept::new(
            "health_management",
            0.30,
            &[
                "health management",
                "condition monitoring",
                "health assessment",
                "health state",
                "system health",
                "asset management",
                "maintenance optimization",
                "health indicator",
                "condition based maintenance",
                "cbm",
            ],
        ),
        Concept::new(
            "fault_diagnosis",
            0.25,
            &[
                "fault diagnosis",
                "fault detection",
                "anomaly detection",
                "defect detection",
                "failure diagnosis",
                "condition diagnosis",
                "diagnostic",
                "fault identification",
                "failure mode",
                "root cause analysis",
                "troubleshooting",
            ],
        ),
        Concept::new(
            "reliability",
            0.05,
            &[
                "reliability",
                "reliability analysis",
                "reliability assessment",
                "mtbf",
                "mean time between failures",
                "availability",
                "maintainability",
                "failure rate",
                "hazard rate",
                "survival analysis",
            ],
        ),
    ]
}

/// Default venue quality table for PHM journals, conferences, and datasets.
#[must_use]
pub fn default_venues() -> VenueTable {
    let entries = vec![
        VenueEntry::journal("Mechanical Systems and Signal Processing", 8.4, Quartile::Q1),
        VenueEntry::journal("IEEE Transactions on Industrial Electronics", 8.2, Quartile::Q1),
        VenueEntry::journal("Reliability Engineering & System Safety", 7.6, Quartile::Q1),
        VenueEntry::journal("IEEE Transactions on Reliability", 5.9, Quartile::Q1),
        VenueEntry::journal("Expert Systems with Applications", 8.5, Quartile::Q1),
        VenueEntry::journal("Engineering Applications of Artificial Intelligence", 8.0, Quartile::Q1),
        VenueEntry::journal("IEEE Access", 3.9, Quartile::Q2),
        VenueEntry::journal("Sensors", 3.8, Quartile::Q2),
        VenueEntry::journal("Applied Soft Computing", 8.7, Quartile::Q1),
        VenueEntry::journal("Knowledge-Based Systems", 8.8, Quartile::Q1),
        VenueEntry::journal("Journal of Manufacturing Systems", 9.3, Quartile::Q1),
        VenueEntry::journal("Computers & Industrial Engineering", 7.9, Quartile::Q1),
        VenueEntry::journal("ISA Transactions", 7.3, Quartile::Q1),
        VenueEntry::journal("Measurement", 5.6, Quartile::Q1),
        VenueEntry::journal("IEEE Transactions on Instrumentation and Measurement", 5.6, Quartile::Q1),
        VenueEntry::journal("Neurocomputing", 6.0, Quartile::Q1),
        VenueEntry::journal("Information Sciences", 8.1, Quartile::Q1),
        VenueEntry::journal("Pattern Recognition", 8.0, Quartile::Q1),
        VenueEntry::conference("PHM", 0.9),
        VenueEntry::conference("Prognostics and Health Management", 0.9),
        VenueEntry::conference("Annual Conference of the Prognostics and Health Management Society", 0.9),
        VenueEntry::conference("IEEE Conference on Prognostics and Health Management", 0.85),
        VenueEntry::conference(
            "International Conference on Condition Monitoring and Machinery Failure Prevention Technologies",
            0.8,
        ),
        VenueEntry::conference("Surveillance, Vibrations, Shock and Noise", 0.75),
        VenueEntry::dataset("Case Western Reserve University Bearing Data Center", 0.7),
    ];
    let partial_keywords = owned(&[
        "prognostics",
        "health management",
        "reliability",
        "maintenance",
        "condition monitoring",
        "fault diagnosis",
        "mechanical systems",
        "signal processing",
        "industrial electronics",
        "measurement",
    ]);
    VenueTable::new(entries, partial_keywords)
}

/// Default knowledge-graph categories.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "deep-learning",
            &["deep learning", "neural network", "cnn", "lstm", "transformer", "autoencoder"],
        ),
        Category::new(
            "fault-diagnosis",
            &["fault diagnosis", "fault detection", "anomaly detection", "classification"],
        ),
        Category::new(
            "rul-prediction",
            &["rul", "remaining useful life", "prognostics", "degradation", "time to failure"],
        ),
        Category::new(
            "digital-twin",
            &["digital twin", "cyber-physical system", "virtual sensor", "simulation"],
        ),
        Category::new(
            "transfer-learning",
            &["transfer learning", "domain adaptation", "few-shot learning", "meta-learning"],
        ),
        Category::new(
            "signal-processing",
            &["signal processing", "feature extraction", "spectral analysis", "time-frequency"],
        ),
    ]
}

/// Default methodology groups.
#[must_use]
pub fn default_methodologies() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "Deep Learning",
            &[
                "deep learning",
                "neural network",
                "cnn",
                "convolutional neural network",
                "lstm",
                "long short-term memory",
                "rnn",
                "recurrent neural network",
                "autoencoder",
                "gan",
                "generative adversarial network",
                "transformer",
                "attention mechanism",
                "deep neural network",
                "dnn",
            ],
        ),
        KeywordGroup::new(
            "Machine Learning",
            &[
                "machine learning",
                "support vector machine",
                "svm",
                "random forest",
                "decision tree",
                "k-means",
                "clustering",
                "classification",
                "regression",
                "ensemble learning",
                "boosting",
                "bagging",
                "artificial intelligence",
                "ai",
                "pattern recognition",
            ],
        ),
        KeywordGroup::new(
            "Signal Processing",
            &[
                "signal processing",
                "fourier transform",
                "fft",
                "wavelet",
                "stft",
                "time-frequency analysis",
                "spectral analysis",
                "frequency domain",
                "filtering",
                "digital signal processing",
                "dsp",
                "envelope analysis",
                "hilbert transform",
                "empirical mode decomposition",
                "emd",
            ],
        ),
        KeywordGroup::new(
            "Statistical Methods",
            &[
                "statistical",
                "statistics",
                "bayesian",
                "monte carlo",
                "hypothesis test",
                "confidence interval",
                "regression analysis",
                "time series",
                "stochastic process",
                "markov",
                "gaussian process",
                "statistical inference",
            ],
        ),
        KeywordGroup::new(
            "Physics-Based Modeling",
            &[
                "physics based",
                "physical model",
                "finite element",
                "fem",
                "computational fluid dynamics",
                "cfd",
                "thermodynamics",
                "mechanics",
                "structural analysis",
                "mathematical model",
                "first principles",
                "analytical model",
            ],
        ),
        KeywordGroup::new(
            "Hybrid Methods",
            &[
                "hybrid",
                "fusion",
                "multi-modal",
                "ensemble",
                "combination",
                "integrated approach",
                "data-physics fusion",
                "grey box model",
                "semi-supervised",
                "transfer learning",
                "multi-source",
            ],
        ),
    ]
}

/// Default application-domain groups.
#[must_use]
pub fn default_domains() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "Rotating Machinery",
            &[
                "bearing",
                "gear",
                "rotor",
                "shaft",
                "motor",
                "pump",
                "compressor",
                "turbine",
                "fan",
                "generator",
                "spindle",
                "rotating machinery",
                "rotating equipment",
                "mechanical drive",
                "drivetrain",
            ],
        ),
        KeywordGroup::new(
            "Aerospace",
            &[
                "aircraft",
                "airplane",
                "helicopter",
                "engine",
                "turbofan",
                "aerospace",
                "aviation",
                "flight",
                "propulsion",
                "jet engine",
                "gas turbine",
                "avionics",
                "structural health monitoring",
            ],
        ),
        KeywordGroup::new(
            "Automotive",
            &[
                "automotive",
                "vehicle",
                "car",
                "truck",
                "engine",
                "transmission",
                "brake",
                "suspension",
                "tire",
                "battery",
                "electric vehicle",
                "hybrid vehicle",
                "powertrain",
                "chassis",
            ],
        ),
        KeywordGroup::new(
            "Energy Systems",
            &[
                "wind turbine",
                "solar panel",
                "power plant",
                "generator",
                "transformer",
                "power grid",
                "energy storage",
                "battery",
                "fuel cell",
                "nuclear",
                "hydroelectric",
                "renewable energy",
            ],
        ),
        KeywordGroup::new(
            "Industrial Process",
            &[
                "manufacturing",
                "production",
                "industrial",
                "process",
                "chemical plant",
                "refinery",
                "pipeline",
                "valve",
                "heat exchanger",
                "boiler",
                "reactor",
                "distillation",
            ],
        ),
        KeywordGroup::new(
            "Marine Systems",
            &[
                "ship",
                "marine",
                "offshore",
                "naval",
                "maritime",
                "propeller",
                "hull",
                "engine room",
                "vessel",
                "underwater",
                "subsea",
                "ocean engineering",
            ],
        ),
        KeywordGroup::new(
            "Railway Systems",
            &[
                "railway",
                "train",
                "rail",
                "locomotive",
                "wagon",
                "track",
                "wheel",
                "axle",
                "pantograph",
                "traction",
            ],
        ),
        KeywordGroup::new(
            "Infrastructure",
            &[
                "bridge",
                "building",
                "structure",
                "civil engineering",
                "infrastructure",
                "concrete",
                "steel",
                "foundation",
                "dam",
                "tunnel",
                "road",
                "pavement",
            ],
        ),
    ]
}

/// Default source priorities. Higher priority sources win merge conflicts and
/// ranking ties.
#[must_use]
pub fn default_source_priorities() -> SourcePriorities {
    SourcePriorities::new(&[
        ("openalex", 5),
        ("crossref", 4),
        ("semantic_scholar", 3),
        ("pubmed", 2),
        ("lens", 1),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_lookup_is_case_insensitive() {
        let table = default_venues();
        let entry = table.lookup("  MECHANICAL Systems and Signal Processing ");
        assert!(entry.is_some());
        assert_eq!(entry.map(VenueEntry::tier), Some(VenueTier::TopTier));
    }

    #[test]
    fn test_venue_quality_score_from_impact_factor() {
        let table = default_venues();
        let msp = table.lookup("Mechanical Systems and Signal Processing");
        assert!(msp.is_some_and(|e| (e.quality_score() - 0.84).abs() < 1e-9));

        let phm = table.lookup("phm");
        assert!(phm.is_some_and(|e| (e.quality_score() - 0.9).abs() < 1e-9));
    }

    #[test]
    fn test_venue_tiers() {
        let table = default_venues();
        assert_eq!(table.lookup("IEEE Access").map(VenueEntry::tier), Some(VenueTier::HighQuality));
        assert_eq!(table.lookup("phm").map(VenueEntry::tier), Some(VenueTier::TopTier));
        assert_eq!(
            table
                .lookup("Case Western Reserve University Bearing Data Center")
                .map(VenueEntry::tier),
            Some(VenueTier::HighQuality),
        );
    }

    #[test]
    fn test_partial_matches_count_keywords() {
        let table = default_venues();
        assert_eq!(table.partial_matches("Journal of Prognostics and Reliability"), 2);
        assert_eq!(table.partial_matches("Quarterly Review of Botany"), 0);
    }

    #[test]
    fn test_concept_weights_sum_to_one() {
        let total: f64 = default_concepts().iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_source_priority_is_zero() {
        let priorities = default_source_priorities();
        assert_eq!(priorities.priority_for("openalex"), 5);
        assert_eq!(priorities.priority_for("scraped_pdf"), 0);
    }

    #[test]
    fn test_default_category_exists() {
        assert!(default_categories().iter().any(|c| c.slug == DEFAULT_CATEGORY));
    }
}
