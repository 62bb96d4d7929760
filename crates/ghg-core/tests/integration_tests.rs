use ghg_core::*;
use serde_json::{json, Value};

fn disclosed_s1() -> Value {
    json!({
        "disclosure_items": ["S1"],
        "emissions": [{
            "scope": "S1",
            "fiscal_year_label": "2023年度",
            "value": 1234.5,
            "unit": "t-CO2",
            "evidence": [{"quote": "当社のCO2排出量は1,234.5t-CO2", "char_start": 10, "char_end": 30}]
        }],
        "disclosure_evidence": [{
            "item": "S1",
            "evidence": [{"quote": "スコープ1排出量を開示", "char_start": 0, "char_end": 9}]
        }]
    })
}

fn quote(text: &str) -> Value {
    json!([{"quote": text, "line_start": 12, "line_end": 12}])
}

fn with_reduction_rate(rate: f64) -> Value {
    let mut candidate = disclosed_s1();
    candidate["reductions"] = json!([{
        "scope": "S1",
        "baseline_year": 2013,
        "achievement_year": 2023,
        "reduction_rate": rate,
        "evidence": quote("2013年度比で排出量を削減")
    }]);
    candidate
}

fn with_target(target: Value) -> Value {
    let mut candidate = disclosed_s1();
    candidate["targets"] = json!([target]);
    candidate
}

#[test]
fn test_consistent_disclosure_is_accepted() {
    let validated = validate(&disclosed_s1()).unwrap();
    assert_eq!(validated.emissions.len(), 1);
    assert_eq!(validated.emissions[0].value, 1234.5);
}

#[test]
fn test_mismatched_disclosure_item_names_uncovered_scope() {
    let mut candidate = disclosed_s1();
    candidate["disclosure_items"] = json!(["S2"]);

    let report = validate(&candidate).unwrap_err();
    assert!(!report.has_structural());
    assert!(report.names(Rule::ScopeCoverage, "S1"));
    assert!(report.names(Rule::EvidenceCoverage, "S2"));
}

#[test]
fn test_none_must_exclude_records() {
    let candidate = json!({
        "disclosure_items": ["NONE"],
        "emissions": disclosed_s1()["emissions"].clone(),
        "disclosure_absence": {"reason": "no_traces_found"}
    });

    let report = validate(&candidate).unwrap_err();
    let paths: Vec<&str> = report
        .by_rule(Rule::NoneExclusivity)
        .map(|v| v.field_path.as_str())
        .collect();
    assert_eq!(paths, vec!["emissions"]);
}

#[test]
fn test_none_requires_absence() {
    let report = validate(&json!({"disclosure_items": ["NONE"]})).unwrap_err();
    assert!(report
        .by_rule(Rule::NoneExclusivity)
        .any(|v| v.field_path == "disclosure_absence"));
}

#[test]
fn test_none_must_stand_alone() {
    let mut candidate = disclosed_s1();
    candidate["disclosure_items"] = json!(["S1", "NONE"]);
    candidate["emissions"] = json!([]);
    candidate["disclosure_evidence"] = json!([]);
    candidate["disclosure_absence"] = json!({"reason": "no_traces_found", "evidence": []});

    let report = validate(&candidate).unwrap_err();
    assert!(report.names(Rule::NoneExclusivity, "NONE"));
}

#[test]
fn test_explicit_absence_requires_quote() {
    let candidate = json!({
        "disclosure_items": ["NONE"],
        "disclosure_absence": {"reason": "explicit_statement", "evidence": []}
    });

    let report = validate(&candidate).unwrap_err();
    assert_eq!(report.violations().len(), 1);
    assert_eq!(report.violations()[0].field_path, "disclosure_absence.evidence");
}

#[test]
fn test_undisclosed_emission_scope_is_named() {
    let mut candidate = disclosed_s1();
    candidate["emissions"][0]["scope"] = json!("S2");

    let report = validate(&candidate).unwrap_err();
    assert!(report.names(Rule::ScopeCoverage, "S2"));
    assert_eq!(report.violations().len(), 1);
}

#[test]
fn test_missing_item_evidence_is_named() {
    let mut candidate = disclosed_s1();
    candidate["disclosure_items"] = json!(["S1", "S2"]);

    let report = validate(&candidate).unwrap_err();
    assert!(report.names(Rule::EvidenceCoverage, "S2"));
    assert!(!report.names(Rule::EvidenceCoverage, "S1"));
}

#[test]
fn test_reduction_years_must_not_go_backwards() {
    let mut candidate = with_reduction_rate(0.1);
    candidate["reductions"][0]["baseline_year"] = json!(2023);
    candidate["reductions"][0]["achievement_year"] = json!(2020);

    let report = validate(&candidate).unwrap_err();
    assert!(report
        .by_rule(Rule::YearOrdering)
        .any(|v| v.field_path == "reductions[0].achievement_year"));
}

#[test]
fn test_target_years_must_be_strictly_ordered() {
    let candidate = with_target(json!({
        "scopes": ["S1"],
        "base_year": 2030,
        "target_year": 2030,
        "reduction_rate": 0.5,
        "goal_kind": "reduction",
        "evidence": quote("2030年度までに50%削減")
    }));

    let report = validate(&candidate).unwrap_err();
    assert!(report
        .by_rule(Rule::YearOrdering)
        .any(|v| v.field_path == "targets[0].target_year"));
}

#[test]
fn test_reduction_goal_requires_rate() {
    let candidate = with_target(json!({
        "scopes": ["S1"],
        "base_year": 2013,
        "target_year": 2030,
        "reduction_rate": null,
        "goal_kind": "reduction",
        "evidence": quote("2030年度までに削減")
    }));

    let report = validate(&candidate).unwrap_err();
    assert!(report
        .by_rule(Rule::ConditionalRequirement)
        .any(|v| v.field_path == "targets[0].reduction_rate"));
}

#[test]
fn test_net_zero_goal_needs_no_rate() {
    let candidate = with_target(json!({
        "scopes": ["S1"],
        "base_year": 2013,
        "target_year": 2050,
        "goal_kind": "net_zero",
        "evidence": quote("2050年ネットゼロを目指す")
    }));

    assert!(validate(&candidate).is_ok());
}

#[test]
fn test_reduction_rate_bounds_are_inclusive() {
    assert!(validate(&with_reduction_rate(-1.0)).is_ok());
    assert!(validate(&with_reduction_rate(1.0)).is_ok());

    let report = validate(&with_reduction_rate(1.0001)).unwrap_err();
    assert!(report
        .by_rule(Rule::Range)
        .any(|v| v.field_path == "reductions[0].reduction_rate"));
}

#[test]
fn test_year_beyond_32_bits_is_a_range_violation() {
    let mut candidate = with_reduction_rate(0.1);
    candidate["reductions"][0]["baseline_year"] = json!(5_000_000_000i64);

    let report = validate(&candidate).unwrap_err();
    assert!(!report.has_structural());
    assert!(report
        .by_rule(Rule::Range)
        .any(|v| v.field_path == "reductions[0].baseline_year"));
}

#[test]
fn test_integral_float_year_is_accepted() {
    let mut candidate = with_reduction_rate(0.1);
    candidate["reductions"][0]["baseline_year"] = json!(2013.0);
    candidate["emissions"][0]["evidence"][0]["char_end"] = json!(30.0);

    let validated = validate(&candidate).unwrap();
    assert_eq!(validated.reductions[0].baseline_year, 2013);
    assert_eq!(validated.emissions[0].evidence[0].char_end, Some(30));
}

#[test]
fn test_fractional_year_is_structural() {
    let mut candidate = with_reduction_rate(0.1);
    candidate["reductions"][0]["baseline_year"] = json!(2013.5);

    let report = validate(&candidate).unwrap_err();
    assert!(report
        .violations()
        .iter()
        .any(|v| v.is_structural() && v.field_path == "reductions[0].baseline_year"));
}

#[test]
fn test_unknown_key_does_not_hide_consistency_violations() {
    let mut candidate = disclosed_s1();
    candidate["extra"] = json!(1);
    candidate["disclosure_items"] = json!(["S2"]);

    let report = validate(&candidate).unwrap_err();
    assert!(report.by_rule(Rule::UnknownField).next().is_some());
    assert!(report.names(Rule::ScopeCoverage, "S1"));
    assert!(report.names(Rule::EvidenceCoverage, "S2"));
}

#[test]
fn test_simultaneous_violations_are_collected() {
    let candidate = json!({
        "disclosure_items": ["S1", "S1"],
        "disclosure_evidence": [{"item": "S1", "evidence": quote("スコープ1排出量")}],
        "reductions": [{
            "scope": "S3",
            "baseline_year": 2023,
            "achievement_year": 2020,
            "reduction_rate": 1.5,
            "evidence": quote("前年度比で削減")
        }],
        "targets": [{
            "scopes": ["S1"],
            "base_year": 2030,
            "target_year": 2030,
            "goal_kind": "reduction",
            "evidence": quote("削減目標を設定")
        }]
    });

    let report = validate(&candidate).unwrap_err();
    for rule in [
        Rule::Duplicate,
        Rule::Range,
        Rule::ScopeCoverage,
        Rule::YearOrdering,
        Rule::ConditionalRequirement,
    ] {
        assert!(report.by_rule(rule).next().is_some(), "missing {}", rule.as_str());
    }
    assert_eq!(report.by_rule(Rule::YearOrdering).count(), 2);
    assert!(report.names(Rule::ScopeCoverage, "S3"));
}

#[test]
fn test_structural_violations_are_reported_separately() {
    let mut candidate = disclosed_s1();
    candidate["emissions"][0]["scope"] = json!("SCOPE1");
    candidate["emissions"][0]["value"] = json!("1,234.5");
    candidate["disclosure_items"] = json!(["S2"]);

    let report = validate(&candidate).unwrap_err();
    assert!(report.has_structural());
    assert!(report
        .violations()
        .iter()
        .all(|v| v.class == ViolationClass::Structural));
    assert!(report.violations().len() >= 2);
}

#[test]
fn test_round_trip_preserves_data() {
    let candidate = json!({
        "issuer_id": "E01234",
        "disclosure_items": ["S1", "S2"],
        "disclosure_evidence": [
            {"item": "S1", "evidence": [{"quote": "Scope1排出量", "char_start": 0, "char_end": 9, "is_table_like": true}]},
            {"item": "S2", "evidence": [{"quote": "Scope2排出量", "line_start": 4, "line_end": 4, "is_table_like": true}]}
        ],
        "emissions": [{
            "scope": "S2",
            "fiscal_year_label": "2023年度",
            "value": 880.0,
            "unit": "t-CO2",
            "evidence": [{"quote": "Scope2: 880t-CO2", "line_start": 5, "line_end": 5, "is_table_like": true, "notes": "マーケット基準"}]
        }],
        "reductions": [{
            "scope": "S1",
            "baseline_year": 2013,
            "achievement_year": 2023,
            "reduction_rate": 0.25,
            "rate_basis": "derived",
            "baseline_value": 1000.0,
            "achievement_value": 750.0,
            "evidence": [
                {"quote": "2013年度 1,000t-CO2", "line_start": 8, "line_end": 8, "is_table_like": true},
                {"quote": "2023年度 750t-CO2", "line_start": 9, "line_end": 9, "is_table_like": true}
            ]
        }],
        "targets": [{
            "scopes": ["S1", "S2"],
            "base_year": 2013,
            "target_year": 2030,
            "reduction_rate": 0.46,
            "goal_kind": "reduction",
            "evidence": [{"quote": "2030年度に46%削減", "char_start": 120, "char_end": 132, "is_table_like": false}]
        }]
    });

    let validated = validate(&candidate).unwrap();
    assert_eq!(validated.to_value().unwrap(), candidate);
}

#[test]
fn test_integer_measurements_come_back_as_floats() {
    let mut candidate = disclosed_s1();
    candidate["emissions"][0]["value"] = json!(1234);

    let value = validate(&candidate).unwrap().to_value().unwrap();
    let emitted = &value["emissions"][0]["value"];
    assert!(emitted.is_f64());
    assert_eq!(emitted.as_f64(), Some(1234.0));
    assert_eq!(value["emissions"][0]["evidence"][0]["char_start"], json!(10));
}

#[test]
fn test_revalidation_is_idempotent() {
    let first = validate(&disclosed_s1()).unwrap();
    let second = validate(&first.to_value().unwrap()).unwrap();
    assert_eq!(first.result(), second.result());

    let third = ExtractionValidator::new()
        .validate_result(second.into_inner())
        .unwrap();
    assert_eq!(first.result(), third.result());
}

#[test]
fn test_yaml_candidate_validates() {
    let yaml = r#"
disclosure_items: [NONE]
disclosure_absence:
  reason: explicit_statement
  evidence:
    - quote: "温室効果ガス排出量の算定は行っておりません"
      line_start: 40
      line_end: 40
"#;
    let candidate = candidate::from_yaml(yaml).unwrap();
    assert!(validate(&candidate).is_ok());
}

#[test]
fn test_accepted_result_flattens() {
    let validated = validate(&with_reduction_rate(0.32)).unwrap();
    let rows = flatten(&validated);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].kind, RowKind::Emission);
    assert_eq!(rows[1].calendar_year, Some(2023));
    assert_eq!(rows[2].reduction_rate, Some(0.32));
}
