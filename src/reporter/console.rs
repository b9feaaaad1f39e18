//! Console reporter with colored band badges

use crate::analyzer::DatasetStats;
use crate::{ColorTier, ExamAnalysis, ExamMeta, TableRow};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analyzed export
    pub fn report(&self, analysis: &ExamAnalysis) {
        self.print_header(analysis);

        if analysis.is_empty() {
            println!("   No data in this export.");
            println!();
            return;
        }

        if let Some(ref meta) = analysis.meta {
            self.print_meta(meta);
        }
        self.print_table(&analysis.table_rows);
        self.print_band_summary(analysis);
        println!();
    }

    /// Report multiple datasets with a closing summary
    pub fn report_many(&self, results: &[ExamAnalysis], stats: &DatasetStats) {
        for analysis in results {
            self.report(analysis);
            println!("{}", "─".repeat(72));
        }
        self.print_summary(stats);
    }

    /// Report in quiet mode (one line per dataset)
    pub fn report_quiet(&self, analysis: &ExamAnalysis) {
        let source = analysis
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<export>".to_string());
        let review = analysis.stats.review_discrimination;
        let review_str = if review > 0 {
            self.paint(ColorTier::Warning, &format!("{} to review", review))
        } else {
            self.paint(ColorTier::Good, "0 to review")
        };
        println!(
            "{}: {} items, {}",
            source, analysis.stats.total_items, review_str
        );
    }

    fn print_header(&self, analysis: &ExamAnalysis) {
        let title = analysis
            .meta
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or("(untitled)");
        println!();
        match &analysis.source {
            Some(source) => println!(
                "{}",
                format!("Item Analysis: {} ({})", title, source.display()).bold()
            ),
            None => println!("{}", format!("Item Analysis: {}", title).bold()),
        }
        println!();
    }

    fn print_meta(&self, meta: &ExamMeta) {
        let value_or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        println!("   {}", "Overview:".bold());
        println!(
            "   First-attempt average: {} | Internal consistency: {}",
            value_or_na(&meta.first_attempt_average),
            value_or_na(&meta.internal_consistency)
        );
        println!(
            "   Completed attempts: {} | Error ratio: {}",
            value_or_na(&meta.completed_attempts),
            value_or_na(&meta.error_ratio)
        );
        println!();
    }

    fn print_table(&self, rows: &[TableRow]) {
        if rows.is_empty() {
            println!("   No questions in this export.");
            return;
        }

        println!(
            "   {:<8} {:<14} {:>9} {:<10} {:>9} {:<10} {:>10}",
            "Q#".bold(),
            "Type".bold(),
            "Facil.".bold(),
            "Band".bold(),
            "Discr.".bold(),
            "Band".bold(),
            "Effic.".bold()
        );

        for row in rows {
            let facility_badge = match row.facility_band {
                Some(band) => self.paint(band.color_tier(), &band.to_string()),
                None => "-".to_string(),
            };
            let discrimination_badge = match row.discrimination_band {
                Some(band) => self.paint(band.color_tier(), &band.to_string()),
                None => "-".to_string(),
            };
            // Missing values render as a dash, never as zero
            println!(
                "   {:<8} {:<14} {:>9} {:<10} {:>9} {:<10} {:>10}",
                format!("Q {}", row.reference),
                display_or_dash(&row.question_type),
                display_or_dash(&row.facility),
                facility_badge,
                display_or_dash(&row.discrimination),
                discrimination_badge,
                display_or_dash(&row.efficiency)
            );

            if self.verbose {
                if let Some(band) = row.discrimination_band {
                    println!("       {}", band.description().dimmed());
                }
            }
        }
        println!();
    }

    fn print_band_summary(&self, analysis: &ExamAnalysis) {
        let stats = &analysis.stats;
        println!(
            "   Facility: {} optimal, {} easy, {} hard{}",
            self.paint(ColorTier::Good, &stats.optimal_facility.to_string()),
            self.paint(ColorTier::Caution, &stats.easy_facility.to_string()),
            self.paint(ColorTier::Warning, &stats.hard_facility.to_string()),
            unclassified_note(stats.unclassified_facility)
        );
        println!(
            "   Discrimination: {} excellent, {} good, {} to review{}",
            self.paint(ColorTier::Good, &stats.excellent_discrimination.to_string()),
            self.paint(ColorTier::Caution, &stats.good_discrimination.to_string()),
            self.paint(ColorTier::Warning, &stats.review_discrimination.to_string()),
            unclassified_note(stats.unclassified_discrimination)
        );
    }

    fn print_summary(&self, stats: &DatasetStats) {
        println!();
        println!("{}", "Summary".bold());
        println!(
            "   Datasets: {} | Items: {} | To review: {} | Unclassified: {}",
            stats.datasets,
            stats.total_items,
            self.paint(ColorTier::Warning, &stats.review_items.to_string()),
            stats.unclassified_items
        );
    }

    fn paint(&self, tier: ColorTier, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match tier {
            ColorTier::Good => text.green().to_string(),
            ColorTier::Caution => text.yellow().to_string(),
            ColorTier::Warning => text.red().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Absent or empty export values render as a dash, never as zero
fn display_or_dash(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => "-",
    }
}

fn unclassified_note(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!(" ({} unclassified)", count)
    }
}
