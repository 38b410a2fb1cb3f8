use crate::engine::AnonymizationReport;
use std::fmt;

/// Text report formatter for a per-file action log
pub struct TextReport<'a> {
    report: &'a AnonymizationReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a AnonymizationReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Anonymization Report")?;
        writeln!(f, "====================")?;
        writeln!(f)?;
        writeln!(f, "Changed:   {}", self.report.num_changed())?;
        writeln!(f, "Skipped:   {}", self.report.num_skipped())?;
        writeln!(f, "Unchanged: {}", self.report.num_unchanged())?;
        writeln!(f)?;

        for entry in &self.report.entries {
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}
