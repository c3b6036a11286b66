//! Data models for candidates, canonical papers, scores, and reports.
//!
//! All models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` so serialized reports read naturally.

mod enums;
mod graph;
mod paper;
mod record;
mod report;
mod score;

pub use enums::{ExportFormat, OutputFormat};
pub use graph::{SimilarityEdge, SimilarityFactors};
pub use paper::{CanonicalPaper, SourceTag};
pub use record::CandidateRecord;
pub use report::{AggregationStats, PipelineReport, RankedPaper, RelatedPaper, SourceStats};
pub use score::{
    CitationImpact, CompositeScore, ConceptContribution, RelevanceBreakdown, RelevanceTier,
};
