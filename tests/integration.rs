//! Integration tests: full pipeline against the exports in test-data/

use analytica::analyzer::Analyzer;
use analytica::parser::{classify_shape, normalize, ExportShape};
use analytica::{analyze_export, DiscriminationBand, FacilityBand};
use serde_json::Value;
use std::path::Path;

fn load_fixture(name: &str) -> Value {
    let path = Path::new("test-data").join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid JSON in {}: {}", path.display(), e))
}

// --- Shape handling ---

#[test]
fn nested_fixture_is_nested_shape() {
    let raw = load_fixture("exam-nested.json");
    assert_eq!(classify_shape(&raw), ExportShape::NestedMeta);
}

#[test]
fn flat_fixture_is_flat_shape() {
    let raw = load_fixture("exam-flat.json");
    assert_eq!(classify_shape(&raw), ExportShape::FlatMeta);
}

#[test]
fn nested_export_extracts_meta_and_question_order() {
    let raw = load_fixture("exam-nested.json");
    let normalized = normalize(&raw);

    let meta = normalized.meta.expect("meta should decode");
    assert_eq!(meta.title.as_deref(), Some("Examen 1 - Grupo A"));
    assert_eq!(meta.first_attempt_average.as_deref(), Some("62,11%"));
    assert_eq!(meta.internal_consistency.as_deref(), Some("78,54%"));
    assert_eq!(meta.completed_attempts.as_deref(), Some("128"));
    assert_eq!(meta.error_ratio.as_deref(), Some("41,23%"));
    // Unrecognized export columns survive untouched
    assert!(meta.extra.contains_key("desviacinestndar"));

    // The referenceless summary row is gone; order is export order
    let refs: Vec<&str> = normalized
        .questions
        .iter()
        .map(|q| q.reference.as_str())
        .collect();
    assert_eq!(refs, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn flat_export_extracts_meta_and_questions_from_index_one() {
    let raw = load_fixture("exam-flat.json");
    let normalized = normalize(&raw);

    let meta = normalized.meta.expect("meta should decode");
    assert_eq!(meta.title.as_deref(), Some("Examen 2 - Grupo B"));
    assert!(meta.internal_consistency.is_none());

    let refs: Vec<&str> = normalized
        .questions
        .iter()
        .map(|q| q.reference.as_str())
        .collect();
    assert_eq!(refs, vec!["1", "2", "3"]);
}

// --- Classification over real fixture values ---

#[test]
fn nested_fixture_bands() {
    let analysis = analyze_export(&load_fixture("exam-nested.json"));
    let by_ref = |r: &str| {
        analysis
            .table_rows
            .iter()
            .find(|row| row.reference == r)
            .unwrap_or_else(|| panic!("missing row {}", r))
    };

    assert_eq!(by_ref("1").facility_band, Some(FacilityBand::Optimal));
    assert_eq!(
        by_ref("1").discrimination_band,
        Some(DiscriminationBand::Excellent)
    );
    assert_eq!(by_ref("2").facility_band, Some(FacilityBand::Easy));
    assert_eq!(
        by_ref("2").discrimination_band,
        Some(DiscriminationBand::Good)
    );
    assert_eq!(by_ref("3").facility_band, Some(FacilityBand::Hard));
    assert_eq!(
        by_ref("3").discrimination_band,
        Some(DiscriminationBand::Poor)
    );
    // Facility exactly 70 and discrimination exactly 30 land in the
    // upper bands
    assert_eq!(by_ref("5").facility_band, Some(FacilityBand::Optimal));
    assert_eq!(
        by_ref("5").discrimination_band,
        Some(DiscriminationBand::Excellent)
    );
    // Empty index strings stay unclassified
    assert_eq!(by_ref("6").facility_band, None);
    assert_eq!(by_ref("6").discrimination_band, None);
}

#[test]
fn flat_fixture_boundary_bands() {
    let analysis = analyze_export(&load_fixture("exam-flat.json"));
    let rows = &analysis.table_rows;

    // 19,9% is just under the good threshold
    assert_eq!(rows[0].discrimination_band, Some(DiscriminationBand::Poor));
    // 20,0% is good, 29,9% facility is hard
    assert_eq!(rows[1].discrimination_band, Some(DiscriminationBand::Good));
    assert_eq!(rows[1].facility_band, Some(FacilityBand::Hard));
    // 70,1% facility is easy
    assert_eq!(rows[2].facility_band, Some(FacilityBand::Easy));
}

// --- Aggregation policies ---

#[test]
fn composite_rows_never_reach_the_chart() {
    let analysis = analyze_export(&load_fixture("exam-nested.json"));
    assert_eq!(analysis.table_rows.len(), 6);
    assert_eq!(analysis.chart_points.len(), 5);
    assert!(analysis
        .chart_points
        .iter()
        .all(|p| p.label != "Q 4"));
}

#[test]
fn chart_labels_prefer_display_names() {
    let analysis = analyze_export(&load_fixture("exam-nested.json"));
    let labels: Vec<&str> = analysis
        .chart_points
        .iter()
        .map(|p| p.label.as_str())
        .collect();
    assert!(labels.contains(&"Estructura celular"));
    assert!(labels.contains(&"Ecosistemas"));
}

#[test]
fn unparsable_indices_chart_as_zero_but_table_absent() {
    let analysis = analyze_export(&load_fixture("exam-nested.json"));

    let row = analysis
        .table_rows
        .iter()
        .find(|r| r.reference == "6")
        .unwrap();
    assert_eq!(row.facility_value, None);
    assert_eq!(row.discrimination_value, None);

    let point = analysis
        .chart_points
        .iter()
        .find(|p| p.label == "Ecosistemas")
        .unwrap();
    assert_eq!(point.facility, 0.0);
    assert_eq!(point.discrimination, 0.0);
}

#[test]
fn stats_count_bands_per_dataset() {
    let analysis = analyze_export(&load_fixture("exam-nested.json"));
    let stats = analysis.stats;
    assert_eq!(stats.total_items, 6);
    assert_eq!(stats.charted_items, 5);
    assert_eq!(stats.optimal_facility, 3);
    assert_eq!(stats.easy_facility, 1);
    assert_eq!(stats.hard_facility, 1);
    assert_eq!(stats.unclassified_facility, 1);
    assert_eq!(stats.excellent_discrimination, 2);
    assert_eq!(stats.good_discrimination, 2);
    assert_eq!(stats.review_discrimination, 1);
    assert_eq!(stats.unclassified_discrimination, 1);
}

#[test]
fn aggregate_stats_across_fixtures() {
    let results = vec![
        analyze_export(&load_fixture("exam-nested.json")),
        analyze_export(&load_fixture("exam-flat.json")),
    ];
    let stats = Analyzer::aggregate_stats(&results);
    assert_eq!(stats.datasets, 2);
    assert_eq!(stats.total_items, 9);
    assert_eq!(stats.review_items, 2);
    assert_eq!(stats.unclassified_items, 1);
}

// --- Referential transparency ---

#[test]
fn analysis_is_idempotent_on_fixtures() {
    for fixture in ["exam-nested.json", "exam-flat.json"] {
        let raw = load_fixture(fixture);
        assert_eq!(analyze_export(&raw), analyze_export(&raw), "{}", fixture);
    }
}

#[test]
fn empty_inputs_yield_the_defined_empty_state() {
    for raw in [Value::Null, serde_json::json!([])] {
        let analysis = analyze_export(&raw);
        assert!(analysis.is_empty());
        assert!(analysis.meta.is_none());
        assert!(analysis.table_rows.is_empty());
        assert!(analysis.chart_points.is_empty());
    }
}
