//! Classification and aggregation of normalized exports.

mod aggregate;

use crate::parser;
use crate::{ExamAnalysis, ItemStats};
use serde_json::Value;

/// Item type marking composite/random rows, which are excluded from
/// per-item charting.
pub const DEFAULT_RANDOM_ITEM_TYPE: &str = "Aleatoria";

/// Analysis engine: normalizes a raw export and builds the view model.
///
/// Stateless between calls; analyzing the same value twice yields equal
/// results.
pub struct Analyzer {
    random_item_type: String,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            random_item_type: DEFAULT_RANDOM_ITEM_TYPE.to_string(),
        }
    }

    /// Override the composite/random item marker (config-driven).
    pub fn with_random_item_type(mut self, marker: impl Into<String>) -> Self {
        self.random_item_type = marker.into();
        self
    }

    /// Full pipeline for one export: normalize, classify, aggregate.
    pub fn analyze(&self, raw: &Value) -> ExamAnalysis {
        let normalized = parser::normalize(raw);
        let (table_rows, chart_points) =
            aggregate::build_view_model(&normalized.questions, &self.random_item_type);
        let stats = ItemStats::from_rows(&table_rows, chart_points.len());
        ExamAnalysis {
            source: None,
            meta: normalized.meta,
            table_rows,
            chart_points,
            stats,
        }
    }

    /// Aggregate statistics across several analyzed datasets.
    pub fn aggregate_stats(results: &[ExamAnalysis]) -> DatasetStats {
        DatasetStats {
            datasets: results.len(),
            total_items: results.iter().map(|r| r.stats.total_items).sum(),
            review_items: results
                .iter()
                .map(|r| r.stats.review_discrimination)
                .sum(),
            unclassified_items: results
                .iter()
                .map(|r| r.stats.unclassified_discrimination)
                .sum(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary across all analyzed datasets (directory mode).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    /// Number of exports analyzed
    pub datasets: usize,
    /// Total questions surfaced across all tables
    pub total_items: usize,
    /// Items in the poor-discrimination (review) band
    pub review_items: usize,
    /// Items whose discrimination index did not parse
    pub unclassified_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiscriminationBand, FacilityBand};
    use serde_json::json;

    fn sample_export() -> Value {
        json!([
            [{"nombredelcuestionario": "Quiz A"}],
            [
                {
                    "q": "1",
                    "tipodepregunta": "Multiple",
                    "ndicedefacilidad": "45,0%",
                    "ndicedediscriminacin": "35,0%"
                },
                {"q": "", "tipodepregunta": "Aleatoria"}
            ]
        ])
    }

    #[test]
    fn end_to_end_scenario() {
        let analysis = Analyzer::new().analyze(&sample_export());

        assert_eq!(
            analysis.meta.as_ref().and_then(|m| m.title.as_deref()),
            Some("Quiz A")
        );
        // The referenceless row is dropped before aggregation
        assert_eq!(analysis.table_rows.len(), 1);
        let row = &analysis.table_rows[0];
        assert_eq!(row.facility_band, Some(FacilityBand::Optimal));
        assert_eq!(
            row.discrimination_band,
            Some(DiscriminationBand::Excellent)
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let raw = sample_export();
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.analyze(&raw), analyzer.analyze(&raw));
    }

    #[test]
    fn empty_export_is_empty_analysis() {
        let analysis = Analyzer::new().analyze(&Value::Null);
        assert!(analysis.is_empty());
        assert_eq!(analysis.stats.total_items, 0);
        assert!(analysis.chart_points.is_empty());
    }

    #[test]
    fn custom_random_item_marker() {
        let raw = json!([
            [{}],
            [
                {"q": "1", "tipodepregunta": "Pool", "ndicedefacilidad": "50,0%"},
                {"q": "2", "tipodepregunta": "Multiple", "ndicedefacilidad": "50,0%"}
            ]
        ]);
        let analysis = Analyzer::new().with_random_item_type("Pool").analyze(&raw);
        assert_eq!(analysis.table_rows.len(), 2);
        assert_eq!(analysis.chart_points.len(), 1);
        assert_eq!(analysis.chart_points[0].label, "Q 2");
    }

    #[test]
    fn aggregate_stats_sums_datasets() {
        let analyzer = Analyzer::new();
        let a = analyzer.analyze(&sample_export());
        let b = analyzer.analyze(&json!([
            [{}],
            [{"q": "1", "ndicedediscriminacin": "5,0%"}]
        ]));
        let stats = Analyzer::aggregate_stats(&[a, b]);
        assert_eq!(stats.datasets, 2);
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.review_items, 1);
        assert_eq!(stats.unclassified_items, 0);
    }

    #[test]
    fn aggregate_stats_empty() {
        assert_eq!(Analyzer::aggregate_stats(&[]), DatasetStats::default());
    }
}
