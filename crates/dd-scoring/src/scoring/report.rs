//! Result assembly for the downstream due-diligence report.
//!
//! The assembler adds no scoring logic. It pairs the two scorer results and renders them
//! as the flat `placeholder -> text` map the report template filler consumes. Keys use
//! dot notation (`occupancy.score`, `regulatory.steps`), lists become newline-joined
//! text and missing values become empty strings.

use super::domain::FallbackFlag;
use super::jurisdiction::JurisdictionResult;
use super::occupancy::OccupancyResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

const REPORT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Report-level facts that do not come from either scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
}

impl ReportMeta {
    /// `"<site> DD Report - MM/DD/YYYY"` when both parts are known.
    pub fn title(&self) -> Option<String> {
        let site = self.site_name.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let date = self.report_date?;
        Some(format!("{site} DD Report - {}", date.format(REPORT_DATE_FORMAT)))
    }

    /// Fill a missing report date with `today`.
    pub fn dated_or(mut self, today: NaiveDate) -> Self {
        self.report_date.get_or_insert(today);
        self
    }

    fn formatted_date(&self) -> Option<String> {
        self.report_date
            .map(|date| date.format(REPORT_DATE_FORMAT).to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueDiligenceScores {
    pub rules_version: String,
    pub occupancy: OccupancyResult,
    pub jurisdiction: JurisdictionResult,
    /// Union of both results' fallback flags.
    pub flags: BTreeSet<FallbackFlag>,
}

impl DueDiligenceScores {
    pub fn assemble(occupancy: OccupancyResult, jurisdiction: JurisdictionResult) -> Self {
        let flags = occupancy
            .flags
            .iter()
            .chain(jurisdiction.flags.iter())
            .copied()
            .collect();

        Self {
            rules_version: occupancy.rules_version.clone(),
            occupancy,
            jurisdiction,
            flags,
        }
    }

    pub fn placeholders(&self, meta: &ReportMeta) -> ReportPlaceholders {
        let occupancy = &self.occupancy.body;
        let regulatory = &self.jurisdiction.body;

        let deductions: Vec<String> = occupancy
            .deductions
            .iter()
            .map(|d| format!("{}: -{}", d.constraint.label(), d.points))
            .collect();
        let flags: Vec<&str> = self.flags.iter().map(|flag| flag.code()).collect();

        let site_name = meta.site_name.as_deref().map(str::trim);
        let report_date = meta.formatted_date();

        // Bare `site_name` and `report_date` keep older templates filling unchanged.
        let tree = json!({
            "site_name": site_name,
            "report_date": report_date,
            "meta": {
                "site_name": site_name,
                "report_date": report_date,
                "title": meta.title(),
                "rules_version": self.rules_version,
                "flags": flags,
            },
            "occupancy": {
                "category": occupancy.category_label,
                "matched_keyword": occupancy.matched_keyword,
                "evaluation": occupancy.evaluation.label(),
                "base_score": occupancy.base_score,
                "height_ceiling": occupancy.height_ceiling,
                "deductions": deductions,
                "score": occupancy.score,
                "zone": occupancy.zone.label(),
                "tier": occupancy.tier_label,
                "timeline": occupancy.timeline,
                "confidence": self.occupancy.confidence.label(),
            },
            "regulatory": {
                "state": regulatory.name,
                "code": regulatory.code,
                "score": regulatory.score,
                "zone": regulatory.zone.label(),
                "approval_type": regulatory.approval_type.code(),
                "gating": if regulatory.gating { "Yes" } else { "No" },
                "timeline_days": regulatory.timeline_days,
                "summary": regulatory.summary,
                "steps": regulatory.steps,
                "confidence": self.jurisdiction.confidence.label(),
            },
        });

        ReportPlaceholders::from_value(&tree)
    }
}

/// Scores plus their rendered placeholders, as returned to report callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueDiligenceReport {
    #[serde(flatten)]
    pub scores: DueDiligenceScores,
    pub placeholders: ReportPlaceholders,
}

impl DueDiligenceReport {
    pub fn new(scores: DueDiligenceScores, meta: &ReportMeta) -> Self {
        let placeholders = scores.placeholders(meta);
        Self {
            scores,
            placeholders,
        }
    }
}

/// Flat placeholder map, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportPlaceholders(BTreeMap<String, String>);

impl ReportPlaceholders {
    /// Flatten nested JSON objects into dot-notation keys.
    pub fn from_value(value: &Value) -> Self {
        let mut out = BTreeMap::new();
        if let Value::Object(map) = value {
            flatten_into("", map, &mut out);
        }
        Self(out)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every `{{key}}` token in `template`. Unknown tokens are left alone.
    pub fn fill(&self, template: &str) -> String {
        self.0
            .iter()
            .fold(template.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{{{key}}}}}"), value)
            })
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(nested) => flatten_into(&full_key, nested, out),
            Value::Array(items) => {
                let lines: Vec<String> = items.iter().map(scalar_text).collect();
                out.insert(full_key, lines.join("\n"));
            }
            other => {
                out.insert(full_key, scalar_text(other));
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
