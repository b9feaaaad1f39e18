//! View-model construction: table rows and chart points.

use crate::parser::parse_metric;
use crate::{ChartPoint, DiscriminationBand, FacilityBand, QuestionRecord, TableRow};

/// Builds the two presentation views from normalized questions, in input
/// order.
///
/// Table rows keep unparsable indices absent; chart points substitute
/// zero instead, because the chart tolerates missing data and the table
/// must not. Composite/random rows (matching `random_item_type`) appear
/// in the table but never in the chart.
pub(crate) fn build_view_model(
    questions: &[QuestionRecord],
    random_item_type: &str,
) -> (Vec<TableRow>, Vec<ChartPoint>) {
    let mut rows = Vec::with_capacity(questions.len());
    let mut points = Vec::new();

    for question in questions {
        let facility_value = parse_metric(question.facility_index.as_deref());
        let discrimination_value = parse_metric(question.discrimination_index.as_deref());
        let label = question.label();

        if question.question_type.as_deref() != Some(random_item_type) {
            let facility = facility_value.unwrap_or(0.0);
            let discrimination = discrimination_value.unwrap_or(0.0);
            points.push(ChartPoint {
                label: label.clone(),
                facility,
                discrimination,
                tier: DiscriminationBand::from_value(discrimination).color_tier(),
            });
        }

        rows.push(TableRow {
            reference: question.reference.clone(),
            label,
            question_type: question.question_type.clone(),
            facility: question.facility_index.clone(),
            facility_value,
            facility_band: FacilityBand::classify(facility_value),
            discrimination: question.discrimination_index.clone(),
            discrimination_value,
            discrimination_band: DiscriminationBand::classify(discrimination_value),
            efficiency: question.discriminative_efficiency.clone(),
            extra: question.extra.clone(),
        });
    }

    (rows, points)
}
