//! Analytica: item-analysis quality dashboard for quiz exports
//!
//! This library decodes the loosely structured JSON an assessment platform
//! exports for item analysis, classifies each item's facility and
//! discrimination indices into quality bands, and builds the view model
//! the reporters render.

pub mod analyzer;
pub mod config;
pub mod parser;
pub mod reporter;
pub mod watcher;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Discrimination index thresholds (percentage scale, 0-100).
///
/// This table is the single authority for banding: the table badges, the
/// chart color tiers, and the review gate all read from here. Values
/// outside 0-100 are classified by the same rule, without clamping.
pub const DISCRIMINATION_EXCELLENT_MIN: f64 = 30.0;
pub const DISCRIMINATION_GOOD_MIN: f64 = 20.0;

/// Facility index thresholds: the optimal band is the closed range 30-70.
pub const FACILITY_OPTIMAL_MIN: f64 = 30.0;
pub const FACILITY_OPTIMAL_MAX: f64 = 70.0;

/// Exam-level metadata extracted from the export's meta record.
///
/// All values come through as pre-formatted strings; recognized keys are
/// lifted into named fields and everything else is preserved untouched in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamMeta {
    /// Quiz title
    #[serde(
        rename(deserialize = "nombredelcuestionario"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Mean score of first attempts, pre-formatted
    #[serde(
        rename(deserialize = "promediodelosprimerosintentos"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub first_attempt_average: Option<String>,
    /// Internal-consistency coefficient for best-graded attempts
    #[serde(
        rename(deserialize = "coeficientedeconsistenciainternaparaintentosconmejorescalificaciones"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_consistency: Option<String>,
    /// Total completed attempts
    #[serde(
        rename(deserialize = "nmerototaldeintentoscompletados"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_attempts: Option<String>,
    /// Error ratio for best-graded attempts
    #[serde(
        rename(deserialize = "ratiodeerrorparaintentosconmejorescalificaciones"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_ratio: Option<String>,
    /// Unrecognized export keys, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A single item row decoded from the export.
///
/// Rows without a reference are aggregate/random-item summary rows; they
/// are filtered out during normalization, so a `QuestionRecord` always
/// carries a non-empty reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Question number or reference
    #[serde(rename(deserialize = "q"), default)]
    pub reference: String,
    /// Display name; the view label falls back to "Q {reference}"
    #[serde(
        rename(deserialize = "nombredelapregunta"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    /// Item type; "Aleatoria" marks composite/random rows
    #[serde(
        rename(deserialize = "tipodepregunta"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub question_type: Option<String>,
    /// Facility index, percentage-like string
    #[serde(
        rename(deserialize = "ndicedefacilidad"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub facility_index: Option<String>,
    /// Discrimination index, percentage-like string
    #[serde(
        rename(deserialize = "ndicedediscriminacin"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discrimination_index: Option<String>,
    /// Discriminative efficiency, passed through unclassified
    #[serde(
        rename(deserialize = "eficienciadiscriminativa"),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discriminative_efficiency: Option<String>,
    /// Unrecognized export keys, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl QuestionRecord {
    /// Label used by table and chart: display name, falling back to
    /// "Q {reference}".
    pub fn label(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Q {}", self.reference),
        }
    }
}

/// Quality band for the discrimination index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminationBand {
    Excellent,
    Good,
    Poor,
}

impl DiscriminationBand {
    /// Band for a parsed discrimination value. Total over all finite
    /// inputs; the boundaries 20 and 30 belong to the upper band.
    pub fn from_value(value: f64) -> Self {
        if value >= DISCRIMINATION_EXCELLENT_MIN {
            DiscriminationBand::Excellent
        } else if value >= DISCRIMINATION_GOOD_MIN {
            DiscriminationBand::Good
        } else {
            DiscriminationBand::Poor
        }
    }

    /// Null propagates: an unparsable index stays unclassified.
    pub fn classify(value: Option<f64>) -> Option<Self> {
        value.map(Self::from_value)
    }

    pub fn color_tier(self) -> ColorTier {
        match self {
            DiscriminationBand::Excellent => ColorTier::Good,
            DiscriminationBand::Good => ColorTier::Caution,
            DiscriminationBand::Poor => ColorTier::Warning,
        }
    }

    /// Badge description shown in verbose output
    pub fn description(self) -> &'static str {
        match self {
            DiscriminationBand::Excellent => "Separates high and low performers well",
            DiscriminationBand::Good => "Acceptable separation between performers",
            DiscriminationBand::Poor => "Weak separation - review this item",
        }
    }
}

impl std::fmt::Display for DiscriminationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscriminationBand::Excellent => write!(f, "Excellent"),
            DiscriminationBand::Good => write!(f, "Good"),
            DiscriminationBand::Poor => write!(f, "Review"),
        }
    }
}

/// Quality band for the facility index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityBand {
    Optimal,
    Easy,
    Hard,
}

impl FacilityBand {
    /// Band for a parsed facility value. The closed range 30-70 is
    /// optimal; both boundaries land inside it.
    pub fn from_value(value: f64) -> Self {
        if (FACILITY_OPTIMAL_MIN..=FACILITY_OPTIMAL_MAX).contains(&value) {
            FacilityBand::Optimal
        } else if value > FACILITY_OPTIMAL_MAX {
            FacilityBand::Easy
        } else {
            FacilityBand::Hard
        }
    }

    /// Null propagates: an unparsable index stays unclassified.
    pub fn classify(value: Option<f64>) -> Option<Self> {
        value.map(Self::from_value)
    }

    pub fn color_tier(self) -> ColorTier {
        match self {
            FacilityBand::Optimal => ColorTier::Good,
            FacilityBand::Easy => ColorTier::Caution,
            FacilityBand::Hard => ColorTier::Warning,
        }
    }

    /// Badge description shown in verbose output
    pub fn description(self) -> &'static str {
        match self {
            FacilityBand::Optimal => "Difficulty in the ideal range",
            FacilityBand::Easy => "Most test-takers answer correctly",
            FacilityBand::Hard => "Few test-takers answer correctly",
        }
    }
}

impl std::fmt::Display for FacilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityBand::Optimal => write!(f, "Optimal"),
            FacilityBand::Easy => write!(f, "Easy"),
            FacilityBand::Hard => write!(f, "Hard"),
        }
    }
}

/// Color tier shared by table badges and chart points.
///
/// Derived from the band enums only, so the chart and the table cannot
/// disagree on where a threshold sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Good,
    Caution,
    Warning,
}

/// One table row per surfaced question, in export order.
///
/// Raw index strings stay as exported; an unparsable index keeps `None`
/// in both the value and band columns so the table renders it as absent,
/// never as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub reference: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_band: Option<FacilityBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrimination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrimination_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrimination_band: Option<DiscriminationBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<String>,
    /// Unrecognized export keys, carried through from the source row
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One chart point per non-composite question.
///
/// Charting tolerates missing data as zero - the opposite policy from the
/// table, on purpose. The tier follows the discrimination band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub facility: f64,
    pub discrimination: f64,
    pub tier: ColorTier,
}

/// Per-band item counts for one dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    /// Questions surfaced in the table
    pub total_items: usize,
    /// Questions eligible for charting (non-composite)
    pub charted_items: usize,
    pub optimal_facility: usize,
    pub easy_facility: usize,
    pub hard_facility: usize,
    pub excellent_discrimination: usize,
    pub good_discrimination: usize,
    pub review_discrimination: usize,
    /// Items whose facility index did not parse
    pub unclassified_facility: usize,
    /// Items whose discrimination index did not parse
    pub unclassified_discrimination: usize,
}

impl ItemStats {
    pub fn from_rows(rows: &[TableRow], charted_items: usize) -> Self {
        let mut stats = ItemStats {
            total_items: rows.len(),
            charted_items,
            ..ItemStats::default()
        };
        for row in rows {
            match row.facility_band {
                Some(FacilityBand::Optimal) => stats.optimal_facility += 1,
                Some(FacilityBand::Easy) => stats.easy_facility += 1,
                Some(FacilityBand::Hard) => stats.hard_facility += 1,
                None => stats.unclassified_facility += 1,
            }
            match row.discrimination_band {
                Some(DiscriminationBand::Excellent) => stats.excellent_discrimination += 1,
                Some(DiscriminationBand::Good) => stats.good_discrimination += 1,
                Some(DiscriminationBand::Poor) => stats.review_discrimination += 1,
                None => stats.unclassified_discrimination += 1,
            }
        }
        stats
    }
}

/// The complete analysis of one export: canonical meta plus the view
/// model for table and chart rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalysis {
    /// Source file, when the analysis came from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ExamMeta>,
    pub table_rows: Vec<TableRow>,
    pub chart_points: Vec<ChartPoint>,
    pub stats: ItemStats,
}

impl ExamAnalysis {
    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    /// True when the export produced nothing to show - the defined
    /// "loading/empty" state, not an error.
    pub fn is_empty(&self) -> bool {
        self.meta.is_none() && self.table_rows.is_empty()
    }
}

/// Public API: analyze one already-materialized export value.
///
/// Pure and idempotent - two calls on the same value produce equal
/// results, so callers may simply recompute on every selection change.
pub fn analyze_export(raw: &Value) -> ExamAnalysis {
    analyzer::Analyzer::new().analyze(raw)
}
