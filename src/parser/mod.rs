//! Export decoding: shape detection and normalization into the canonical
//! `{meta, questions}` model.
//!
//! The platform exports an item-analysis report as a JSON array whose
//! layout varies between export runs. Shape detection is a single
//! explicit classification step; everything downstream works from the
//! decoded model, never from the raw value.

mod metric;

pub use metric::parse_metric;

use crate::{ExamMeta, QuestionRecord};
use serde_json::Value;

/// The two observed export layouts, plus the degraded empty case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportShape {
    /// `raw[0]` is itself an array; meta is `raw[0][0]`
    NestedMeta,
    /// `raw[0]` is the meta record; questions follow from index 1
    FlatMeta,
    /// Absent, empty, or not an array at all
    Empty,
}

/// Classifies a raw export value. First match wins, no backtracking:
/// a nested first element always means `NestedMeta`, anything else
/// non-empty is read as `FlatMeta`.
pub fn classify_shape(raw: &Value) -> ExportShape {
    match raw.as_array() {
        Some(items) if !items.is_empty() => {
            if items[0].is_array() {
                ExportShape::NestedMeta
            } else {
                ExportShape::FlatMeta
            }
        }
        _ => ExportShape::Empty,
    }
}

/// Canonical `{meta, questions}` record extracted from one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedExport {
    pub meta: Option<ExamMeta>,
    pub questions: Vec<QuestionRecord>,
}

/// Normalizes a raw export of either observed shape.
///
/// An absent, empty, or unrecognizable export degrades to
/// `{meta: None, questions: []}` - the defined loading/empty state.
/// Question order is preserved; rows that are not objects or lack a
/// reference are dropped silently (the export is known to contain
/// aggregate summary rows without one).
pub fn normalize(raw: &Value) -> NormalizedExport {
    let items = match raw.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return NormalizedExport::default(),
    };

    let meta_value = match classify_shape(raw) {
        ExportShape::NestedMeta => items[0].get(0),
        ExportShape::FlatMeta => Some(&items[0]),
        ExportShape::Empty => None,
    };
    let meta = meta_value.and_then(decode_meta);

    let question_values: &[Value] = match items.get(1) {
        Some(Value::Array(nested)) => nested,
        _ => items.get(1..).unwrap_or(&[]),
    };
    let questions = question_values.iter().filter_map(decode_question).collect();

    NormalizedExport { meta, questions }
}

/// Decodes the meta slot. A non-object (or otherwise undecodable) value
/// degrades to `None` rather than failing the whole export.
fn decode_meta(value: &Value) -> Option<ExamMeta> {
    serde_json::from_value(value.clone()).ok()
}

/// Decodes one question row. Rows without a non-empty reference never
/// reach classification or aggregation.
fn decode_question(value: &Value) -> Option<QuestionRecord> {
    let record: QuestionRecord = serde_json::from_value(value.clone()).ok()?;
    if record.reference.trim().is_empty() {
        return None;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_nested_shape() {
        let raw = json!([[{"nombredelcuestionario": "Quiz A"}], []]);
        assert_eq!(classify_shape(&raw), ExportShape::NestedMeta);
    }

    #[test]
    fn classifies_flat_shape() {
        let raw = json!([{"nombredelcuestionario": "Quiz A"}, {"q": "1"}]);
        assert_eq!(classify_shape(&raw), ExportShape::FlatMeta);
    }

    #[test]
    fn classifies_empty_and_non_array() {
        assert_eq!(classify_shape(&Value::Null), ExportShape::Empty);
        assert_eq!(classify_shape(&json!([])), ExportShape::Empty);
        assert_eq!(classify_shape(&json!({"not": "an array"})), ExportShape::Empty);
        assert_eq!(classify_shape(&json!("text")), ExportShape::Empty);
    }

    #[test]
    fn normalizes_nested_export() {
        let raw = json!([
            [{"nombredelcuestionario": "Quiz A"}],
            [
                {"q": "1", "ndicedefacilidad": "45,0%"},
                {"q": "2", "ndicedefacilidad": "80,0%"}
            ]
        ]);
        let normalized = normalize(&raw);
        assert_eq!(
            normalized.meta.as_ref().and_then(|m| m.title.as_deref()),
            Some("Quiz A")
        );
        assert_eq!(normalized.questions.len(), 2);
        assert_eq!(normalized.questions[0].reference, "1");
        assert_eq!(normalized.questions[1].reference, "2");
    }

    #[test]
    fn normalizes_flat_export() {
        let raw = json!([
            {"nombredelcuestionario": "Quiz B"},
            {"q": "1"},
            {"q": "2"},
            {"q": "3"}
        ]);
        let normalized = normalize(&raw);
        assert_eq!(
            normalized.meta.as_ref().and_then(|m| m.title.as_deref()),
            Some("Quiz B")
        );
        let refs: Vec<&str> = normalized
            .questions
            .iter()
            .map(|q| q.reference.as_str())
            .collect();
        assert_eq!(refs, vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_inputs_yield_empty_state() {
        assert_eq!(normalize(&Value::Null), NormalizedExport::default());
        assert_eq!(normalize(&json!([])), NormalizedExport::default());
    }

    #[test]
    fn unknown_shape_degrades_to_empty() {
        assert_eq!(normalize(&json!("just a string")), NormalizedExport::default());
        assert_eq!(normalize(&json!(42)), NormalizedExport::default());
        assert_eq!(normalize(&json!({"meta": {}})), NormalizedExport::default());
    }

    #[test]
    fn meta_slot_not_an_object_degrades_to_none() {
        // Questions still decode even when the meta slot is junk
        let raw = json!(["oops", {"q": "1"}]);
        let normalized = normalize(&raw);
        assert!(normalized.meta.is_none());
        assert_eq!(normalized.questions.len(), 1);
    }

    #[test]
    fn nested_meta_with_empty_inner_array() {
        let raw = json!([[], [{"q": "1"}]]);
        let normalized = normalize(&raw);
        assert!(normalized.meta.is_none());
        assert_eq!(normalized.questions.len(), 1);
    }

    #[test]
    fn referenceless_rows_are_dropped() {
        let raw = json!([
            [{"nombredelcuestionario": "Quiz A"}],
            [
                {"q": "1", "tipodepregunta": "Multiple"},
                {"q": "", "tipodepregunta": "Aleatoria"},
                {"tipodepregunta": "Aleatoria"},
                {"q": "   "},
                {"q": "2"}
            ]
        ]);
        let normalized = normalize(&raw);
        let refs: Vec<&str> = normalized
            .questions
            .iter()
            .map(|q| q.reference.as_str())
            .collect();
        assert_eq!(refs, vec!["1", "2"]);
    }

    #[test]
    fn non_object_question_rows_are_dropped() {
        let raw = json!([
            {"nombredelcuestionario": "Quiz C"},
            "stray string",
            {"q": "1"},
            7
        ]);
        let normalized = normalize(&raw);
        assert_eq!(normalized.questions.len(), 1);
        assert_eq!(normalized.questions[0].reference, "1");
    }

    #[test]
    fn nested_shape_without_question_array_slices_from_one() {
        // raw[0] is nested but raw[1] is a bare record: the question
        // slice still starts at index 1
        let raw = json!([
            [{"nombredelcuestionario": "Quiz D"}],
            {"q": "1"},
            {"q": "2"}
        ]);
        let normalized = normalize(&raw);
        assert_eq!(normalized.questions.len(), 2);
    }

    #[test]
    fn meta_only_export_has_no_questions() {
        let raw = json!([{"nombredelcuestionario": "Quiz E"}]);
        let normalized = normalize(&raw);
        assert!(normalized.meta.is_some());
        assert!(normalized.questions.is_empty());
    }

    #[test]
    fn question_fields_decode_and_extras_survive() {
        let raw = json!([
            [{"nombredelcuestionario": "Quiz F"}],
            [{
                "q": "12",
                "nombredelapregunta": "Cell division",
                "tipodepregunta": "Multiple",
                "ndicedefacilidad": "61,9%",
                "ndicedediscriminacin": "27,3%",
                "eficienciadiscriminativa": "31,4%",
                "intentos": "88"
            }]
        ]);
        let normalized = normalize(&raw);
        let q = &normalized.questions[0];
        assert_eq!(q.reference, "12");
        assert_eq!(q.display_name.as_deref(), Some("Cell division"));
        assert_eq!(q.question_type.as_deref(), Some("Multiple"));
        assert_eq!(q.facility_index.as_deref(), Some("61,9%"));
        assert_eq!(q.discrimination_index.as_deref(), Some("27,3%"));
        assert_eq!(q.discriminative_efficiency.as_deref(), Some("31,4%"));
        assert_eq!(q.extra.get("intentos").and_then(|v| v.as_str()), Some("88"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!([
            [{"nombredelcuestionario": "Quiz G"}],
            [{"q": "1", "ndicedefacilidad": "45,0%"}]
        ]);
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
