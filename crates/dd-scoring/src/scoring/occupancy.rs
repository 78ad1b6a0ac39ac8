use super::classifier::CategoryClassifier;
use super::domain::{Confidence, FallbackFlag, PropertyDescriptor, Zone};
use super::height::{apply_height_ceiling, height_ceiling};
use super::normalizer::normalize_text;
use super::outcome::Scored;
use super::tables::Ruleset;
use super::tenant::{apply_tenant_rules, Deduction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Expected time to open a school, bucketed by occupancy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineBand {
    Ready,
    ThreeToSixMonths,
    SixToNineMonths,
    NineToTwelveMonths,
    TwelveToEighteenMonths,
    EighteenToTwentyFourMonths,
    OverTwentyFourMonths,
    DoNotPursue,
}

impl TimelineBand {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Ready,
            Self::ThreeToSixMonths,
            Self::SixToNineMonths,
            Self::NineToTwelveMonths,
            Self::TwelveToEighteenMonths,
            Self::EighteenToTwentyFourMonths,
            Self::OverTwentyFourMonths,
            Self::DoNotPursue,
        ]
    }

    pub const fn for_score(score: u8) -> Self {
        match score {
            0 => Self::DoNotPursue,
            1..=14 => Self::OverTwentyFourMonths,
            15..=29 => Self::EighteenToTwentyFourMonths,
            30..=49 => Self::TwelveToEighteenMonths,
            50..=69 => Self::NineToTwelveMonths,
            70..=89 => Self::SixToNineMonths,
            90..=99 => Self::ThreeToSixMonths,
            _ => Self::Ready,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "ready to proceed",
            Self::ThreeToSixMonths => "3–6 months",
            Self::SixToNineMonths => "6–9 months",
            Self::NineToTwelveMonths => "9–12 months",
            Self::TwelveToEighteenMonths => "12–18 months",
            Self::EighteenToTwentyFourMonths => "18–24+ months",
            Self::OverTwentyFourMonths => "24+ months",
            Self::DoNotPursue => "N/A — do not pursue",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Ready => 0,
            Self::ThreeToSixMonths => 1,
            Self::SixToNineMonths => 2,
            Self::NineToTwelveMonths => 3,
            Self::TwelveToEighteenMonths => 4,
            Self::EighteenToTwentyFourMonths => 5,
            Self::OverTwentyFourMonths => 6,
            Self::DoNotPursue => 7,
        }
    }
}

/// Five-level ordinal difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Turnkey,
    LightConversion,
    ModerateConversion,
    HeavyConversion,
    NotViable,
}

impl Tier {
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Turnkey),
            2 => Some(Self::LightConversion),
            3 => Some(Self::ModerateConversion),
            4 => Some(Self::HeavyConversion),
            5 => Some(Self::NotViable),
            _ => None,
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            Self::Turnkey => 1,
            Self::LightConversion => 2,
            Self::ModerateConversion => 3,
            Self::HeavyConversion => 4,
            Self::NotViable => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Turnkey => "Tier 1 — Turnkey",
            Self::LightConversion => "Tier 2 — Light conversion",
            Self::ModerateConversion => "Tier 3 — Moderate conversion",
            Self::HeavyConversion => "Tier 4 — Heavy conversion",
            Self::NotViable => "Tier 5 — Not viable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierMapError {
    #[error("tier map needs 8 comma-separated levels, found {0}")]
    Length(usize),
    #[error("tier level '{0}' is not a number from 1 to 5")]
    Level(String),
    #[error("tier levels must not decrease as timeline bands lengthen")]
    NotMonotonic,
}

/// Collapse of the eight timeline bands onto the five tiers.
///
/// Entry `i` is the tier for the `i`-th band of [`TimelineBand::ordered`]. The mapping
/// is configuration rather than code; it only has to keep tiers non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierMap([Tier; 8]);

impl TierMap {
    pub fn new(levels: [u8; 8]) -> Result<Self, TierMapError> {
        let mut tiers = [Tier::Turnkey; 8];
        for (slot, level) in tiers.iter_mut().zip(levels) {
            *slot = Tier::from_level(level).ok_or_else(|| TierMapError::Level(level.to_string()))?;
        }

        if tiers.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(TierMapError::NotMonotonic);
        }

        Ok(Self(tiers))
    }

    pub fn tier_for(&self, band: TimelineBand) -> Tier {
        self.0[band.index()]
    }

    pub fn levels(&self) -> [u8; 8] {
        self.0.map(Tier::level)
    }
}

impl Default for TierMap {
    fn default() -> Self {
        Self([
            Tier::Turnkey,
            Tier::Turnkey,
            Tier::LightConversion,
            Tier::ModerateConversion,
            Tier::HeavyConversion,
            Tier::HeavyConversion,
            Tier::NotViable,
            Tier::NotViable,
        ])
    }
}

impl FromStr for TierMap {
    type Err = TierMapError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let levels: [&str; 8] = parts
            .as_slice()
            .try_into()
            .map_err(|_| TierMapError::Length(parts.len()))?;

        let mut parsed = [0_u8; 8];
        for (slot, part) in parsed.iter_mut().zip(levels) {
            *slot = part
                .parse()
                .map_err(|_| TierMapError::Level(part.to_string()))?;
        }

        Self::new(parsed)
    }
}

impl fmt::Display for TierMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels: Vec<String> = self.levels().iter().map(u8::to_string).collect();
        f.write_str(&levels.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationScope {
    WholeBuilding,
    TenantSpace,
}

impl EvaluationScope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WholeBuilding => "Whole building",
            Self::TenantSpace => "Tenant space",
        }
    }
}

/// Occupancy-specific body of an [`OccupancyResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyAssessment {
    pub category_id: String,
    pub category_label: String,
    pub matched_keyword: Option<String>,
    pub evaluation: EvaluationScope,
    pub base_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_ceiling: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deductions: Vec<Deduction>,
    pub score: u8,
    pub zone: Zone,
    pub tier: Tier,
    pub tier_label: &'static str,
    pub timeline: &'static str,
}

pub type OccupancyResult = Scored<OccupancyAssessment>;

/// Building-to-school conversion scorer.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyScorer<'a> {
    rules: &'a Ruleset,
    tiers: &'a TierMap,
}

impl<'a> OccupancyScorer<'a> {
    pub fn new(rules: &'a Ruleset, tiers: &'a TierMap) -> Self {
        Self { rules, tiers }
    }

    pub fn score(&self, descriptor: &PropertyDescriptor) -> OccupancyResult {
        let description = normalize_text(&descriptor.use_description);
        let classification =
            CategoryClassifier::new(self.rules.categories()).classify_normalized(&description);
        let category = classification.category;
        let stories = descriptor.known_stories();

        let data_missing = description.is_empty() || stories.is_none();
        let mut tenant_ambiguity = false;

        let (evaluation, score, ceiling, deductions) = match descriptor.occupied_floor {
            Some(floor) => {
                tenant_ambiguity = floor == 0 || stories.is_some_and(|total| floor > total);
                let adjustment =
                    apply_tenant_rules(category, floor, stories, &descriptor.constraints);
                (
                    EvaluationScope::TenantSpace,
                    adjustment.score,
                    adjustment.height_ceiling,
                    adjustment.deductions,
                )
            }
            None => {
                if !descriptor.constraints.is_empty() {
                    debug!(
                        constraints = descriptor.constraints.len(),
                        "space constraints ignored for whole-building evaluation"
                    );
                }
                let score = stories.map_or(category.base_score, |stories| {
                    apply_height_ceiling(category.base_score, stories)
                });
                let ceiling = stories.and_then(height_ceiling);
                (EvaluationScope::WholeBuilding, score, ceiling, Vec::new())
            }
        };

        // Hazard categories already score zero; this keeps a future hazard row from leaking.
        let score = if category.is_hazard() { 0 } else { score.min(100) };
        let band = TimelineBand::for_score(score);
        let tier = self.tiers.tier_for(band);

        let assessment = OccupancyAssessment {
            category_id: category.id.clone(),
            category_label: category.label.clone(),
            matched_keyword: classification.matched_keyword.map(str::to_string),
            evaluation,
            base_score: category.base_score,
            height_ceiling: ceiling,
            deductions,
            score,
            zone: Zone::for_occupancy(score),
            tier,
            tier_label: tier.label(),
            timeline: band.label(),
        };

        let mut result = Scored::resolved(assessment, self.rules.version());

        if !classification.matched() {
            debug!(fallback = %category.id, "use description matched no category keyword");
            result = result.degrade(FallbackFlag::CategoryUnmatched, Confidence::Low);
        } else if category.is_generic() {
            result = result.cap_confidence(Confidence::Medium);
        }

        if tenant_ambiguity {
            result = result.cap_confidence(Confidence::Medium);
        }

        if data_missing {
            debug!("occupancy inputs incomplete, defaults applied");
            result = result.degrade(FallbackFlag::DataMissingDefault, Confidence::Medium);
        }

        result
    }
}
