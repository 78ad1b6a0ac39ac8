use super::cache::{OccupancyKey, ScoreCache};
use super::classifier::CategoryClassifier;
use super::domain::PropertyDescriptor;
use super::jurisdiction::{JurisdictionResult, JurisdictionScorer};
use super::occupancy::{OccupancyResult, OccupancyScorer, TierMap};
use super::report::{DueDiligenceReport, DueDiligenceScores, ReportMeta};
use super::tables::{RulesError, Ruleset};
use crate::config::RulesConfig;
use std::sync::Arc;
use tracing::debug;

/// Shared entry point for both scorers.
///
/// Holds the loaded rules behind an `Arc` so the engine can be cloned into request
/// handlers. The optional cache changes cost, never output.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: Arc<Ruleset>,
    tiers: TierMap,
    cache: Option<Arc<ScoreCache>>,
}

impl ScoringEngine {
    pub fn new(rules: Ruleset) -> Self {
        Self {
            rules: Arc::new(rules),
            tiers: TierMap::default(),
            cache: None,
        }
    }

    pub fn builtin() -> Result<Self, RulesError> {
        Ok(Self::new(Ruleset::builtin()?))
    }

    pub fn from_config(config: &RulesConfig) -> Result<Self, RulesError> {
        let engine = Self::new(Ruleset::load(config)?).with_tier_map(config.tier_map);
        Ok(if config.score_cache {
            engine.with_cache()
        } else {
            engine
        })
    }

    pub fn with_tier_map(mut self, tiers: TierMap) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Arc::new(ScoreCache::new()));
        self
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn tier_map(&self) -> &TierMap {
        &self.tiers
    }

    pub fn cache(&self) -> Option<&ScoreCache> {
        self.cache.as_deref()
    }

    pub fn score_occupancy(&self, descriptor: &PropertyDescriptor) -> OccupancyResult {
        let scorer = OccupancyScorer::new(&self.rules, &self.tiers);
        let result = match &self.cache {
            Some(cache) => {
                let classification = CategoryClassifier::new(self.rules.categories())
                    .classify(&descriptor.use_description);
                let key = OccupancyKey::new(descriptor, &classification);
                cache.occupancy_or_insert_with(key, || scorer.score(descriptor))
            }
            None => scorer.score(descriptor),
        };

        debug!(
            category = %result.body.category_id,
            score = result.body.score,
            confidence = %result.confidence,
            "occupancy scored"
        );
        result
    }

    pub fn score_jurisdiction(&self, code: &str) -> JurisdictionResult {
        let scorer = JurisdictionScorer::new(&self.rules);
        let result = match &self.cache {
            Some(cache) if self.rules.jurisdictions().lookup(code).is_some() => {
                cache.jurisdiction_or_insert_with(code, || scorer.score(code))
            }
            _ => scorer.score(code),
        };

        debug!(
            code = %result.body.code,
            score = result.body.score,
            confidence = %result.confidence,
            "jurisdiction scored"
        );
        result
    }

    /// Run both scorers independently and merge the results.
    pub fn assess(&self, descriptor: &PropertyDescriptor, code: &str) -> DueDiligenceScores {
        DueDiligenceScores::assemble(
            self.score_occupancy(descriptor),
            self.score_jurisdiction(code),
        )
    }

    pub fn report(
        &self,
        descriptor: &PropertyDescriptor,
        code: &str,
        meta: &ReportMeta,
    ) -> DueDiligenceReport {
        DueDiligenceReport::new(self.assess(descriptor, code), meta)
    }
}
