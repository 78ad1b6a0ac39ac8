use super::domain::{ApprovalType, Confidence, FallbackFlag, Zone};
use super::normalizer::normalize_code;
use super::outcome::Scored;
use super::tables::{JurisdictionRecord, Ruleset};
use serde::Serialize;
use tracing::warn;

/// Score assigned to codes that resolve to no jurisdiction.
pub const UNRESOLVED_SCORE: u8 = 70;

/// Regulatory-specific body of a [`JurisdictionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionAssessment {
    /// Normalized input code, kept even when unresolved.
    pub code: String,
    pub name: Option<String>,
    pub score: u8,
    pub zone: Zone,
    pub approval_type: ApprovalType,
    pub gating: bool,
    pub timeline_days: Option<u32>,
    pub summary: String,
    pub steps: Vec<String>,
}

pub type JurisdictionResult = Scored<JurisdictionAssessment>;

/// State school-registration scorer.
#[derive(Debug, Clone, Copy)]
pub struct JurisdictionScorer<'a> {
    rules: &'a Ruleset,
}

impl<'a> JurisdictionScorer<'a> {
    pub fn new(rules: &'a Ruleset) -> Self {
        Self { rules }
    }

    pub fn score(&self, code: &str) -> JurisdictionResult {
        let normalized = normalize_code(code);

        match self.rules.jurisdictions().lookup(&normalized) {
            Some(record) => Scored::resolved(resolved(record), self.rules.version()),
            None => {
                warn!(code = %normalized, "jurisdiction code not in table, using fallback");
                Scored::resolved(unresolved(normalized), self.rules.version())
                    .degrade(FallbackFlag::AddressStateUnresolved, Confidence::Low)
            }
        }
    }
}

fn resolved(record: &JurisdictionRecord) -> JurisdictionAssessment {
    JurisdictionAssessment {
        code: record.code.clone(),
        name: Some(record.name.clone()),
        score: record.score,
        zone: record.zone,
        approval_type: record.approval_type,
        gating: record.gating,
        timeline_days: Some(record.timeline_days),
        summary: summary(record.approval_type, Some(&record.name)),
        steps: steps(record.approval_type),
    }
}

fn unresolved(code: String) -> JurisdictionAssessment {
    JurisdictionAssessment {
        code,
        name: None,
        score: UNRESOLVED_SCORE,
        zone: Zone::for_jurisdiction(UNRESOLVED_SCORE),
        approval_type: ApprovalType::Unknown,
        gating: true,
        timeline_days: None,
        summary: summary(ApprovalType::Unknown, None),
        steps: steps(ApprovalType::Unknown),
    }
}

fn summary(approval: ApprovalType, state: Option<&str>) -> String {
    let state = state.unwrap_or("This jurisdiction");
    match approval {
        ApprovalType::NotRequired => format!(
            "{state} does not require state approval before a private school opens."
        ),
        ApprovalType::Notification => format!(
            "{state} requires a notice of operation but no approval before opening."
        ),
        ApprovalType::Registration => format!(
            "{state} requires the school to register with the state education agency."
        ),
        ApprovalType::Accreditation => format!(
            "{state} expects accreditation by a recognized agency to operate."
        ),
        ApprovalType::Approval => format!(
            "{state} requires state or local approval before the school may open."
        ),
        ApprovalType::License => {
            format!("{state} requires a state operating license before opening.")
        }
        ApprovalType::Unknown => {
            "The jurisdiction could not be resolved; treat registration as gating until confirmed."
                .to_string()
        }
    }
}

fn steps(approval: ApprovalType) -> Vec<String> {
    let steps: &[&str] = match approval {
        ApprovalType::NotRequired => &[
            "Confirm zoning and certificate of occupancy with the local AHJ",
            "Maintain attendance and immunization records per state statute",
        ],
        ApprovalType::Notification => &[
            "File the annual notice of intent with the state education agency",
            "Confirm zoning and certificate of occupancy with the local AHJ",
        ],
        ApprovalType::Registration => &[
            "Submit the private school registration form",
            "Provide proof of fire and health inspections",
            "Renew the registration on the state's annual cycle",
        ],
        ApprovalType::Accreditation => &[
            "Select a state-recognized accrediting agency",
            "Complete the accreditation self-study and site visit",
            "Register accreditation status with the state education agency",
        ],
        ApprovalType::Approval => &[
            "Prepare the school approval application and educational plan",
            "Schedule the approving body's site review",
            "Obtain written approval before enrolling students",
        ],
        ApprovalType::License => &[
            "Submit the operating license application and fees",
            "Pass the licensing agency's facility inspection",
            "Receive the license before the first day of instruction",
        ],
        ApprovalType::Unknown => &[
            "Confirm the property's state from the site address",
            "Research the state's private school requirements before committing",
        ],
    };
    steps.iter().map(|step| step.to_string()).collect()
}
