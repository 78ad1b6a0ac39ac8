use super::domain::ConstraintKind;
use super::height::height_ceiling;
use super::tables::BuildingCategory;
use serde::Serialize;
use std::collections::BTreeSet;

/// Highest floor whose suites take constraint deductions.
pub const DEDUCTION_FLOOR_LIMIT: u32 = 3;
/// Deductions never push a non-hazard suite below this score.
pub const TENANT_SCORE_FLOOR: u8 = 1;

/// One applied constraint deduction, kept for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub constraint: ConstraintKind,
    pub points: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantAdjustment {
    pub score: u8,
    pub deductions: Vec<Deduction>,
    pub height_ceiling: Option<u8>,
}

/// Score a suite on `occupied_floor` of a building with `building_stories` stories.
///
/// Floors up to [`DEDUCTION_FLOOR_LIMIT`] start from the category's base score (never the
/// height-capped score) and subtract one deduction per constraint. Higher floors ignore
/// constraints and take the height ceiling of the whole building. When the story count is
/// unknown, the occupied floor is the only evidence of height and stands in for it.
/// Hazard categories score 0 with nothing itemized.
pub fn apply_tenant_rules(
    category: &BuildingCategory,
    occupied_floor: u32,
    building_stories: Option<u32>,
    constraints: &BTreeSet<ConstraintKind>,
) -> TenantAdjustment {
    if category.is_hazard() {
        return TenantAdjustment {
            score: 0,
            deductions: Vec::new(),
            height_ceiling: None,
        };
    }

    if occupied_floor <= DEDUCTION_FLOOR_LIMIT {
        let deductions: Vec<Deduction> = constraints
            .iter()
            .map(|constraint| Deduction {
                constraint: *constraint,
                points: constraint.deduction(),
            })
            .collect();

        let total: u32 = deductions.iter().map(|d| d.points as u32).sum();
        let remaining = (category.base_score as u32).saturating_sub(total);
        let score = remaining.max(TENANT_SCORE_FLOOR as u32) as u8;

        return TenantAdjustment {
            score,
            deductions,
            height_ceiling: None,
        };
    }

    let stories = building_stories
        .filter(|stories| *stories > 0)
        .unwrap_or(occupied_floor);
    let ceiling = height_ceiling(stories);
    let score = match ceiling {
        Some(ceiling) => category.base_score.min(ceiling),
        None => category.base_score,
    };

    TenantAdjustment {
        score,
        deductions: Vec::new(),
        height_ceiling: ceiling,
    }
}
