use super::classifier::Classification;
use super::domain::{ConstraintKind, PropertyDescriptor};
use super::jurisdiction::JurisdictionResult;
use super::normalizer::{normalize_code, normalize_text};
use super::occupancy::OccupancyResult;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

/// Memoized scorer output.
///
/// Occupancy entries are keyed by the classifier's output rather than the free-text
/// description, and only codes present in the jurisdiction table are stored, so the
/// keyspace follows the rule tables and entries are never evicted. A poisoned lock only
/// means another caller panicked mid-insert; the maps hold complete values, so the guard
/// is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct ScoreCache {
    occupancy: Mutex<HashMap<OccupancyKey, OccupancyResult>>,
    jurisdictions: Mutex<HashMap<String, JurisdictionResult>>,
}

/// Everything an occupancy score depends on once the description is classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccupancyKey {
    category_id: String,
    matched_keyword: Option<String>,
    blank_description: bool,
    stories: Option<u32>,
    floor: Option<u32>,
    constraints: BTreeSet<ConstraintKind>,
}

impl OccupancyKey {
    pub fn new(descriptor: &PropertyDescriptor, classification: &Classification<'_>) -> Self {
        Self {
            category_id: classification.category.id.clone(),
            matched_keyword: classification.matched_keyword.map(str::to_string),
            blank_description: normalize_text(&descriptor.use_description).is_empty(),
            stories: descriptor.known_stories(),
            floor: descriptor.occupied_floor,
            constraints: descriptor.constraints.clone(),
        }
    }
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupancy_or_insert_with<F>(&self, key: OccupancyKey, score: F) -> OccupancyResult
    where
        F: FnOnce() -> OccupancyResult,
    {
        let mut entries = self
            .occupancy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert_with(score).clone()
    }

    /// Callers pass only codes the jurisdiction table resolves.
    pub fn jurisdiction_or_insert_with<F>(&self, code: &str, score: F) -> JurisdictionResult
    where
        F: FnOnce() -> JurisdictionResult,
    {
        let key = normalize_code(code);
        let mut entries = self
            .jurisdictions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert_with(score).clone()
    }

    pub fn len(&self) -> usize {
        let occupancy = self
            .occupancy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let jurisdictions = self
            .jurisdictions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        occupancy + jurisdictions
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
