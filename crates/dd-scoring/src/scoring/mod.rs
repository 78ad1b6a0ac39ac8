//! Due-diligence suitability scoring for prospective school sites.

pub mod cache;
pub mod classifier;
pub mod domain;
pub mod engine;
pub mod height;
pub mod jurisdiction;
pub(crate) mod normalizer;
pub mod occupancy;
pub mod outcome;
pub mod report;
pub mod router;
pub mod tables;
pub mod tenant;

pub use classifier::{CategoryClassifier, Classification};
pub use domain::{
    ApprovalType, Confidence, ConstraintKind, FallbackFlag, PropertyDescriptor,
    UnknownConstraint, Zone,
};
pub use engine::ScoringEngine;
pub use height::apply_height_ceiling;
pub use jurisdiction::{JurisdictionAssessment, JurisdictionResult, JurisdictionScorer};
pub use occupancy::{
    EvaluationScope, OccupancyAssessment, OccupancyResult, OccupancyScorer, Tier, TierMap,
    TierMapError, TimelineBand,
};
pub use outcome::Scored;
pub use report::{DueDiligenceReport, DueDiligenceScores, ReportMeta, ReportPlaceholders};
pub use router::{scoring_router, ReportRequest, RulesView};
pub use tables::{RulesError, Ruleset, BUILTIN_RULES_VERSION};
pub use tenant::apply_tenant_rules;
