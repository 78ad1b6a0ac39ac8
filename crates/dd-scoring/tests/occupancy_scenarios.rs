use dd_scoring::scoring::{
    Confidence, ConstraintKind, EvaluationScope, FallbackFlag, PropertyDescriptor, ScoringEngine,
    Tier, TierMap, Zone,
};

fn engine() -> ScoringEngine {
    ScoringEngine::builtin().expect("builtin rules load")
}

fn tenant_constraints() -> [ConstraintKind; 5] {
    [
        ConstraintKind::SharedHvac,
        ConstraintKind::SharedEgress,
        ConstraintKind::ManagementApprovalRequired,
        ConstraintKind::NoDedicatedEntrance,
        ConstraintKind::NoOutdoorAccess,
    ]
}

#[test]
fn low_rise_office_building_scores_as_office() {
    let result =
        engine().score_occupancy(&PropertyDescriptor::whole_building("2-story office building", 2));

    assert_eq!(result.body.category_label, "Office 1–3 stories");
    assert_eq!(result.body.matched_keyword.as_deref(), Some("office building"));
    assert_eq!(result.body.evaluation, EvaluationScope::WholeBuilding);
    assert_eq!(result.body.score, 92);
    assert_eq!(result.body.zone, Zone::Yellow);
    assert_eq!(result.body.timeline, "3–6 months");
    assert_eq!(result.body.tier, Tier::Turnkey);
    assert_eq!(result.confidence, Confidence::High);
    assert!(result.flags.is_empty());
}

#[test]
fn low_floor_suite_takes_constraint_deductions_from_base_score() {
    let descriptor = PropertyDescriptor::whole_building("professional office", 26)
        .on_floor(2)
        .with_constraints(tenant_constraints());
    let result = engine().score_occupancy(&descriptor);

    assert_eq!(result.body.category_id, "professional_office");
    assert_eq!(result.body.evaluation, EvaluationScope::TenantSpace);
    assert_eq!(result.body.base_score, 82);
    assert_eq!(result.body.score, 57);
    assert_eq!(result.body.deductions.len(), 5);
    assert_eq!(result.body.height_ceiling, None);
    assert_eq!(result.body.zone, Zone::Yellow);
    assert_eq!(result.body.timeline, "9–12 months");
    assert_eq!(result.confidence, Confidence::High);
}

#[test]
fn upper_floor_suite_takes_building_height_ceiling_instead_of_deductions() {
    let descriptor = PropertyDescriptor::whole_building("professional office", 26)
        .on_floor(8)
        .with_constraints(tenant_constraints());
    let result = engine().score_occupancy(&descriptor);

    assert_eq!(result.body.score, 20);
    assert_eq!(result.body.height_ceiling, Some(20));
    assert!(result.body.deductions.is_empty());
    assert_eq!(result.body.zone, Zone::Yellow);
    assert_eq!(result.body.timeline, "18–24+ months");
}

#[test]
fn retail_suite_mixes_five_and_three_point_deductions() {
    let descriptor = PropertyDescriptor::whole_building("retail unit", 3)
        .on_floor(1)
        .with_constraints([
            ConstraintKind::SharedHvac,
            ConstraintKind::IncompatibleMixedUseTenants,
            ConstraintKind::SharedParking,
        ]);
    let result = engine().score_occupancy(&descriptor);

    assert_eq!(result.body.base_score, 85);
    assert_eq!(result.body.score, 72);
    assert_eq!(result.body.timeline, "6–9 months");
}

#[test]
fn existing_school_is_green_and_ready() {
    let result = engine().score_occupancy(&PropertyDescriptor::whole_building(
        "Former charter school campus",
        2,
    ));

    assert_eq!(result.body.score, 100);
    assert_eq!(result.body.zone, Zone::Green);
    assert_eq!(result.body.timeline, "ready to proceed");
}

#[test]
fn occupancy_wording_does_not_leak_into_school_category() {
    let engine = engine();

    let warehouse =
        engine.score_occupancy(&PropertyDescriptor::whole_building("warehouse occupancy", 1));
    assert_eq!(warehouse.body.category_id, "warehouse");
    assert_eq!(warehouse.body.score, 45);

    let office = engine.score_occupancy(&PropertyDescriptor::whole_building("office occupancy", 1));
    assert_eq!(office.body.category_id, "office_low_rise");

    let mercantile =
        engine.score_occupancy(&PropertyDescriptor::whole_building("mercantile occupancy", 1));
    assert_ne!(mercantile.body.category_id, "existing_school");

    let school =
        engine.score_occupancy(&PropertyDescriptor::whole_building("Group E occupancy", 2));
    assert_eq!(school.body.category_id, "existing_school");
}

#[test]
fn compound_house_words_are_not_residential() {
    let engine = engine();
    for description in ["former courthouse", "clubhouse", "firehouse annex"] {
        let result = engine.score_occupancy(&PropertyDescriptor::whole_building(description, 1));
        assert_ne!(result.body.category_id, "residential", "{description}");
    }
}

#[test]
fn mid_rise_building_is_capped_at_forty_two() {
    let result = engine().score_occupancy(&PropertyDescriptor::whole_building("church", 5));
    assert_eq!(result.body.base_score, 94);
    assert_eq!(result.body.score, 42);
    assert_eq!(result.body.height_ceiling, Some(42));
    assert_eq!(result.body.timeline, "12–18 months");
}

#[test]
fn hazard_category_overrides_every_other_rule() {
    let engine = engine();
    let whole = engine.score_occupancy(&PropertyDescriptor::whole_building(
        "Former gas station with convenience store",
        1,
    ));
    assert_eq!(whole.body.category_id, "gas_station");
    assert_eq!(whole.body.score, 0);
    assert_eq!(whole.body.zone, Zone::Red);
    assert_eq!(whole.body.timeline, "N/A — do not pursue");
    assert_eq!(whole.body.tier, Tier::NotViable);

    let suite = engine.score_occupancy(
        &PropertyDescriptor::whole_building("dry cleaner storefront", 2).on_floor(1),
    );
    assert_eq!(suite.body.category_id, "dry_cleaner");
    assert_eq!(suite.body.score, 0);
}

#[test]
fn unmatched_description_falls_back_with_low_confidence() {
    let result = engine().score_occupancy(&PropertyDescriptor::whole_building("vacant lot", 1));

    assert_eq!(result.body.category_id, "unclassified");
    assert_eq!(result.body.matched_keyword, None);
    assert_eq!(result.body.score, 50);
    assert_eq!(result.confidence, Confidence::Low);
    assert!(result.has_flag(FallbackFlag::CategoryUnmatched));
}

#[test]
fn generic_category_caps_confidence_at_medium() {
    let result =
        engine().score_occupancy(&PropertyDescriptor::whole_building("mixed-use building", 2));

    assert_eq!(result.body.category_id, "general_commercial");
    assert_eq!(result.confidence, Confidence::Medium);
    assert!(result.flags.is_empty());
}

#[test]
fn missing_story_count_is_flagged_and_uncapped() {
    let descriptor = PropertyDescriptor {
        use_description: "office".to_string(),
        ..PropertyDescriptor::default()
    };
    let result = engine().score_occupancy(&descriptor);

    assert_eq!(result.body.score, 92);
    assert_eq!(result.body.height_ceiling, None);
    assert_eq!(result.confidence, Confidence::Medium);
    assert!(result.has_flag(FallbackFlag::DataMissingDefault));
}

#[test]
fn inconsistent_floor_lowers_confidence_without_flag() {
    let engine = engine();

    let above_roof =
        engine.score_occupancy(&PropertyDescriptor::whole_building("office", 2).on_floor(3));
    assert_eq!(above_roof.body.score, 92);
    assert_eq!(above_roof.confidence, Confidence::Medium);
    assert!(above_roof.flags.is_empty());

    let ground = engine.score_occupancy(
        &PropertyDescriptor::whole_building("office", 2)
            .on_floor(0)
            .with_constraints([ConstraintKind::SharedParking]),
    );
    assert_eq!(ground.body.evaluation, EvaluationScope::TenantSpace);
    assert_eq!(ground.body.score, 89);
    assert_eq!(ground.confidence, Confidence::Medium);
}

#[test]
fn whole_building_evaluation_ignores_constraints() {
    let descriptor = PropertyDescriptor::whole_building("retail", 2)
        .with_constraints([ConstraintKind::SharedHvac, ConstraintKind::SharedEgress]);
    let result = engine().score_occupancy(&descriptor);

    assert_eq!(result.body.score, 85);
    assert!(result.body.deductions.is_empty());
}

#[test]
fn custom_tier_map_changes_tier_but_not_score() {
    let tiers: TierMap = "1,2,2,3,3,4,5,5".parse().expect("valid tier map");
    let custom = engine().with_tier_map(tiers);
    let default = engine();

    let descriptor = PropertyDescriptor::whole_building("office", 2);
    let custom_result = custom.score_occupancy(&descriptor);
    let default_result = default.score_occupancy(&descriptor);

    assert_eq!(custom_result.body.score, default_result.body.score);
    assert_eq!(default_result.body.tier, Tier::Turnkey);
    assert_eq!(custom_result.body.tier, Tier::LightConversion);
    assert_eq!(custom_result.body.tier_label, "Tier 2 — Light conversion");
}

#[test]
fn repeated_scoring_serializes_identically() {
    let engine = engine();
    let descriptor = PropertyDescriptor::whole_building("medical office building", 5)
        .on_floor(4)
        .with_constraints([ConstraintKind::SharedHvac]);

    let first = serde_json::to_string(&engine.score_occupancy(&descriptor)).expect("serializes");
    let second = serde_json::to_string(&engine.score_occupancy(&descriptor)).expect("serializes");
    assert_eq!(first, second);
}
