use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Traffic-light summary of a score. Variants are ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    Green,
    Yellow,
    Red,
}

impl Zone {
    /// Occupancy zones: only a perfect score is green and only a hazard zero is red.
    pub const fn for_occupancy(score: u8) -> Self {
        if score >= 100 {
            Self::Green
        } else if score == 0 {
            Self::Red
        } else {
            Self::Yellow
        }
    }

    pub const fn for_jurisdiction(score: u8) -> Self {
        if score >= 80 {
            Self::Green
        } else if score <= 40 {
            Self::Red
        } else {
            Self::Yellow
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much a reader should trust a score. `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Machine-readable marker attached whenever a scorer substitutes a documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackFlag {
    CategoryUnmatched,
    AddressStateUnresolved,
    DataMissingDefault,
}

impl FallbackFlag {
    pub const fn code(self) -> &'static str {
        match self {
            Self::CategoryUnmatched => "CATEGORY_UNMATCHED",
            Self::AddressStateUnresolved => "ADDRESS_STATE_UNRESOLVED",
            Self::DataMissingDefault => "DATA_MISSING_DEFAULT",
        }
    }
}

impl fmt::Display for FallbackFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Shared-space limitation of a tenant suite, each worth a fixed deduction.
///
/// Serialized as `snake_case`; deserialization goes through the lenient [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ConstraintKind {
    SharedHvac,
    SharedEgress,
    ManagementApprovalRequired,
    NoDedicatedEntrance,
    NoOutdoorAccess,
    SharedParking,
    IncompatibleMixedUseTenants,
}

impl ConstraintKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::SharedHvac,
            Self::SharedEgress,
            Self::ManagementApprovalRequired,
            Self::NoDedicatedEntrance,
            Self::NoOutdoorAccess,
            Self::SharedParking,
            Self::IncompatibleMixedUseTenants,
        ]
    }

    pub const fn deduction(self) -> u8 {
        match self {
            Self::SharedParking => 3,
            Self::SharedHvac
            | Self::SharedEgress
            | Self::ManagementApprovalRequired
            | Self::NoDedicatedEntrance
            | Self::NoOutdoorAccess
            | Self::IncompatibleMixedUseTenants => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SharedHvac => "Shared HVAC",
            Self::SharedEgress => "Shared egress",
            Self::ManagementApprovalRequired => "Management approval required",
            Self::NoDedicatedEntrance => "No dedicated entrance",
            Self::NoOutdoorAccess => "No outdoor access",
            Self::SharedParking => "Shared parking",
            Self::IncompatibleMixedUseTenants => "Incompatible mixed-use tenants",
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::SharedHvac => "sharedhvac",
            Self::SharedEgress => "sharedegress",
            Self::ManagementApprovalRequired => "managementapprovalrequired",
            Self::NoDedicatedEntrance => "nodedicatedentrance",
            Self::NoOutdoorAccess => "nooutdooraccess",
            Self::SharedParking => "sharedparking",
            Self::IncompatibleMixedUseTenants => "incompatiblemixedusetenants",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConstraint(pub String);

impl fmt::Display for UnknownConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown space constraint '{}'", self.0)
    }
}

impl std::error::Error for UnknownConstraint {}

/// Accepts `shared_hvac`, `shared-hvac`, `SharedHVAC` and similar spellings.
impl FromStr for ConstraintKind {
    type Err = UnknownConstraint;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ordered()
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| UnknownConstraint(raw.to_string()))
    }
}

impl TryFrom<String> for ConstraintKind {
    type Error = UnknownConstraint;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Regulatory path a state imposes before a private school may operate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalType {
    #[serde(rename = "NONE")]
    NotRequired,
    Notification,
    Registration,
    Accreditation,
    Approval,
    License,
    Unknown,
}

impl ApprovalType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotRequired => "NONE",
            Self::Notification => "NOTIFICATION",
            Self::Registration => "REGISTRATION",
            Self::Accreditation => "ACCREDITATION",
            Self::Approval => "APPROVAL",
            Self::License => "LICENSE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ApprovalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized building facts supplied by the upstream extraction workflow.
///
/// Every field is optional on the wire; a missing floor means a whole-building
/// evaluation and missing constraints mean none apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(default)]
    pub use_description: String,
    #[serde(default)]
    pub building_stories: Option<u32>,
    #[serde(default)]
    pub occupied_floor: Option<u32>,
    #[serde(default)]
    pub constraints: BTreeSet<ConstraintKind>,
}

impl PropertyDescriptor {
    pub fn whole_building(use_description: impl Into<String>, building_stories: u32) -> Self {
        Self {
            use_description: use_description.into(),
            building_stories: Some(building_stories),
            ..Self::default()
        }
    }

    pub fn on_floor(mut self, occupied_floor: u32) -> Self {
        self.occupied_floor = Some(occupied_floor);
        self
    }

    pub fn with_constraints<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = ConstraintKind>,
    {
        self.constraints.extend(constraints);
        self
    }

    /// Story count with zero treated as unknown.
    pub fn known_stories(&self) -> Option<u32> {
        self.building_stories.filter(|stories| *stories > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_zone_thresholds() {
        assert_eq!(Zone::for_occupancy(100), Zone::Green);
        assert_eq!(Zone::for_occupancy(99), Zone::Yellow);
        assert_eq!(Zone::for_occupancy(1), Zone::Yellow);
        assert_eq!(Zone::for_occupancy(0), Zone::Red);
    }

    #[test]
    fn jurisdiction_zone_thresholds() {
        assert_eq!(Zone::for_jurisdiction(80), Zone::Green);
        assert_eq!(Zone::for_jurisdiction(79), Zone::Yellow);
        assert_eq!(Zone::for_jurisdiction(41), Zone::Yellow);
        assert_eq!(Zone::for_jurisdiction(40), Zone::Red);
        assert_eq!(Zone::for_jurisdiction(0), Zone::Red);
    }

    #[test]
    fn confidence_orders_weakest_first() {
        assert_eq!(Confidence::High.min(Confidence::Medium), Confidence::Medium);
        assert_eq!(Confidence::Low.min(Confidence::Medium), Confidence::Low);
    }

    #[test]
    fn constraint_parsing_accepts_common_spellings() {
        assert_eq!("shared_hvac".parse(), Ok(ConstraintKind::SharedHvac));
        assert_eq!("SharedHVAC".parse(), Ok(ConstraintKind::SharedHvac));
        assert_eq!(
            "incompatible-mixed-use-tenants".parse(),
            Ok(ConstraintKind::IncompatibleMixedUseTenants)
        );
        assert!("rooftop".parse::<ConstraintKind>().is_err());
    }

    #[test]
    fn descriptor_json_accepts_any_constraint_spelling() {
        let descriptor: PropertyDescriptor = serde_json::from_str(
            r#"{"constraints": ["SharedHVAC", "shared_parking", "IncompatibleMixedUseTenants"]}"#,
        )
        .expect("descriptor parses");
        assert_eq!(
            descriptor.constraints.into_iter().collect::<Vec<_>>(),
            vec![
                ConstraintKind::SharedHvac,
                ConstraintKind::SharedParking,
                ConstraintKind::IncompatibleMixedUseTenants,
            ]
        );
        assert_eq!(
            serde_json::to_string(&ConstraintKind::NoOutdoorAccess).expect("serializes"),
            r#""no_outdoor_access""#
        );
    }

    #[test]
    fn constraint_deductions_match_schedule() {
        let total: u32 = ConstraintKind::ordered()
            .iter()
            .map(|kind| kind.deduction() as u32)
            .sum();
        assert_eq!(total, 33);
        assert_eq!(ConstraintKind::SharedParking.deduction(), 3);
    }

    #[test]
    fn descriptor_defaults_missing_fields() {
        let descriptor: PropertyDescriptor =
            serde_json::from_str(r#"{"use_description":"retail unit"}"#).expect("parses");
        assert_eq!(descriptor.building_stories, None);
        assert_eq!(descriptor.occupied_floor, None);
        assert!(descriptor.constraints.is_empty());

        let zero = PropertyDescriptor::whole_building("office", 0);
        assert_eq!(zero.known_stories(), None);
    }

    #[test]
    fn flags_serialize_as_screaming_codes() {
        let json = serde_json::to_string(&FallbackFlag::AddressStateUnresolved).expect("json");
        assert_eq!(json, "\"ADDRESS_STATE_UNRESOLVED\"");
        let json = serde_json::to_string(&ApprovalType::NotRequired).expect("json");
        assert_eq!(json, "\"NONE\"");
    }
}
