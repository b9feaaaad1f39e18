//! JSON reporter for machine-readable output

use crate::analyzer::DatasetStats;
use crate::ExamAnalysis;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single analyzed export as JSON
    pub fn report(&self, analysis: &ExamAnalysis) -> String {
        if self.pretty {
            serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(analysis).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Report multiple datasets as a JSON array
    pub fn report_many(&self, results: &[ExamAnalysis]) -> String {
        if self.pretty {
            serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Report with a cross-dataset summary
    pub fn report_with_summary(&self, results: &[ExamAnalysis], stats: &DatasetStats) -> String {
        self.report_with_summary_at(results, stats, Utc::now())
    }

    fn report_with_summary_at(
        &self,
        results: &[ExamAnalysis],
        stats: &DatasetStats,
        generated_at: DateTime<Utc>,
    ) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                datasets: stats.datasets,
                total_items: stats.total_items,
                review_items: stats.review_items,
                unclassified_items: stats.unclassified_items,
                generated_at: generated_at.to_rfc3339(),
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [ExamAnalysis],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    datasets: usize,
    total_items: usize,
    review_items: usize,
    unclassified_items: usize,
    generated_at: String,
}
