//! Console output formatter for debate results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use dialectic_domain::{
    Camp, DebateEngineOutput, GraphSummary, Label, Regime, RunStatus, SemanticsView,
};

/// Formats debate results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Enable or disable ANSI colors for everything rendered afterwards
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete debate result
    pub fn format(output: &DebateEngineOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Dialectic Debate Results"));
        out.push('\n');
        out.push_str(&Self::topic_lines(output));

        // Transcript
        out.push_str(&Self::section_header("Transcript"));
        let mut phase = None;
        for turn in &output.transcript {
            if phase != Some(turn.phase) {
                phase = Some(turn.phase);
                out.push_str(&format!("\n{}\n", turn.phase.to_string().magenta().bold()));
            }
            out.push_str(&format!(
                "\n{}\n{}\n",
                format!(
                    "── Turn {} · {} · {} ──",
                    turn.turn_index, turn.persona_id, turn.move_type
                )
                .yellow()
                .bold(),
                Self::indent(&turn.dialogue, "  ")
            ));
            if let Some(hint) = &turn.steering_hint {
                out.push_str(&format!("  {} {}\n", "steer:".dimmed(), hint.dimmed()));
            }
        }

        // Argument graph
        out.push_str(&Self::section_header("Argument Graph"));
        let view = SemanticsView::compute(&output.graph.snapshot());
        let summary = GraphSummary::new(&output.graph, &view);
        if summary.arguments.is_empty() {
            out.push_str("\n(no arguments)\n");
        } else {
            out.push('\n');
            for arg in &summary.arguments {
                out.push_str(&format!(
                    "  {} {} ({}): {}\n",
                    Self::label(arg.label),
                    arg.id.to_string().bold(),
                    arg.speaker_id,
                    arg.claim
                ));
                if !arg.attacked_by.is_empty() {
                    let attackers: Vec<&str> = arg.attacked_by.iter().map(|a| a.as_str()).collect();
                    out.push_str(&format!(
                        "        {} {}\n",
                        "attacked by".dimmed(),
                        attackers.join(", ")
                    ));
                }
            }
            out.push_str(&format!(
                "\n  {} IN / {} OUT / {} UNDEC, {} attacks, contested frontier {}\n",
                summary.in_count,
                summary.out_count,
                summary.undec_count,
                summary.attack_count,
                summary.contested_frontier
            ));
        }

        out.push_str(&Self::verdict(output));
        out.push_str(&Self::footer());
        out
    }

    /// Format as JSON
    pub fn format_json(output: &DebateEngineOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    /// Verdict only (concise output)
    pub fn format_summary(output: &DebateEngineOutput) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n\n",
            "=== Dialectic Verdict ===".cyan().bold()
        ));
        out.push_str(&Self::topic_lines(output));
        out.push_str(&Self::verdict(output));
        out
    }

    fn topic_lines(output: &DebateEngineOutput) -> String {
        let personas: Vec<&str> = output.persona_ids.iter().map(|p| p.as_str()).collect();
        format!(
            "{} {}\n{} {}\n",
            "Topic:".cyan().bold(),
            output.topic,
            "Personas:".cyan().bold(),
            personas.join(", ")
        )
    }

    /// Regime, camps, common ground, crux, concessions and run stats
    fn verdict(output: &DebateEngineOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::section_header("Outcome"));
        out.push_str(&format!(
            "\n{} {}\n{}\n",
            "Regime:".bold(),
            Self::regime(output.regime),
            output.regime_description
        ));

        if !output.camps.is_empty() {
            out.push_str(&format!("\n{}\n", "Camps:".cyan().bold()));
            for camp in &output.camps {
                out.push_str(&format!("  * {}\n", Self::camp_line(camp)));
            }
        }

        if !output.common_ground.is_empty() {
            let ids: Vec<&str> = output.common_ground.iter().map(|a| a.as_str()).collect();
            out.push_str(&format!(
                "\n{} {}\n",
                "Common ground:".green().bold(),
                ids.join(", ")
            ));
        }

        if let Some(crux) = &output.crux {
            let status = if crux.acknowledged {
                "agreed".green()
            } else {
                "proposed".yellow()
            };
            out.push_str(&format!(
                "\n{} {} ({}, turn {})\n",
                "Crux:".cyan().bold(),
                crux.statement,
                status,
                crux.proposed_at_turn
            ));
        }

        if !output.concession_trail.is_empty() {
            out.push_str(&format!("\n{}\n", "Concessions:".yellow().bold()));
            for c in &output.concession_trail {
                out.push_str(&format!(
                    "  * turn {}: {} {} ({}): {}\n",
                    c.turn_index,
                    c.persona_id,
                    c.effect,
                    c.concession_type.as_str(),
                    c.conceded_claim
                ));
            }
        }

        out.push_str(&format!(
            "\n{} {} turns, final phase {}, {} tokens, {:.1}s\n",
            "Run:".dimmed(),
            output.turns(),
            output.final_phase.display_name(),
            output.token_usage.total(),
            output.duration_ms as f64 / 1000.0
        ));
        if output.status != RunStatus::Complete {
            out.push_str(&format!("{}\n", "Run did not complete; output is partial".red()));
        }
        let d = &output.diagnostics;
        if d.malformed_crystallizations > 0 || d.invariant_violations > 0 {
            out.push_str(&format!(
                "{} {} malformed crystallizations, {} dropped graph edits\n",
                "Warnings:".yellow(),
                d.malformed_crystallizations,
                d.invariant_violations
            ));
        }

        out
    }

    fn camp_line(camp: &Camp) -> String {
        let personas: Vec<String> = camp
            .persona_argument_counts
            .iter()
            .map(|(persona, count)| format!("{} ({})", persona, count))
            .collect();
        let args: Vec<&str> = camp.argument_ids.iter().map(|a| a.as_str()).collect();
        format!(
            "{} [{}]: {}",
            format!("Camp {}", camp.extension_index + 1).bold(),
            personas.join(", "),
            args.join(", ")
        )
    }

    fn label(label: Label) -> ColoredString {
        let text = format!("[{:<5}]", label.to_string());
        match label {
            Label::In => text.green(),
            Label::Out => text.red(),
            Label::Undec => text.yellow(),
        }
    }

    fn regime(regime: Regime) -> ColoredString {
        match regime {
            Regime::Consensus => regime.as_str().green().bold(),
            Regime::Polarized => regime.as_str().red().bold(),
            Regime::Partial => regime.as_str().yellow().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &DebateEngineOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &DebateEngineOutput) -> String {
        Self::format_json(output)
    }

    fn format_summary(&self, output: &DebateEngineOutput) -> String {
        Self::format_summary(output)
    }
}
