//! Output formatter trait

use dialectic_domain::{DebateEngineOutput, OutputFormat};

/// Trait for formatting debate results
pub trait OutputFormatter {
    /// Transcript, graph, camps and verdict
    fn format(&self, output: &DebateEngineOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &DebateEngineOutput) -> String;

    /// Verdict, camps, crux and concessions only
    fn format_summary(&self, output: &DebateEngineOutput) -> String;

    fn render(&self, output: &DebateEngineOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(output),
            OutputFormat::Summary => self.format_summary(output),
            OutputFormat::Json => self.format_json(output),
        }
    }
}
