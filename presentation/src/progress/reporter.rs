//! Progress reporting for debate execution

use colored::Colorize;
use dialectic_application::EngineEventSink;
use dialectic_domain::EngineEvent;
use dialectic_domain::core::string::preview;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress over the turn budget with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn turn_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineEventSink for ProgressReporter {
    fn on_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::EngineStart { max_turns, .. } => {
                let bar = ProgressBar::new(*max_turns as u64);
                bar.set_style(Self::turn_style());
                bar.set_prefix("Phase 1: Opening");
                bar.set_message("Starting...");
                if let Ok(mut guard) = self.bar.lock() {
                    *guard = Some(bar);
                }
            }
            EngineEvent::PhaseStart { phase, .. } => {
                self.with_bar(|bar| bar.set_prefix(phase.to_string()));
            }
            EngineEvent::DialogueTurn { turn, .. } => {
                self.with_bar(|bar| {
                    bar.set_message(format!("{} {}", turn.persona_id, turn.move_type));
                    bar.inc(1);
                });
            }
            EngineEvent::Concession { concession } => {
                self.with_bar(|bar| {
                    bar.println(format!(
                        "  {} {} {}",
                        "~".yellow(),
                        concession.persona_id,
                        concession.effect
                    ))
                });
            }
            EngineEvent::CruxProposed { crux, .. } if crux.acknowledged => {
                self.with_bar(|bar| {
                    bar.println(format!("  {} crux agreed: {}", "*".green(), crux.statement))
                });
            }
            EngineEvent::EngineComplete { regime, .. } => {
                if let Ok(mut guard) = self.bar.lock()
                    && let Some(bar) = guard.take()
                {
                    bar.finish_with_message(format!("{} ({})", "complete!".green(), regime));
                }
            }
            EngineEvent::EngineError { message, .. } => {
                if let Ok(mut guard) = self.bar.lock()
                    && let Some(bar) = guard.take()
                {
                    bar.abandon_with_message(format!("{} {}", "failed:".red(), message));
                }
            }
            _ => {}
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl EngineEventSink for SimpleProgress {
    fn on_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::PhaseStart { phase, turn_index } => {
                println!(
                    "{} {} (from turn {})",
                    "->".cyan(),
                    phase.to_string().bold(),
                    turn_index
                );
            }
            EngineEvent::DialogueTurn { turn, .. } => {
                println!(
                    "  {} turn {}: {} {} {}",
                    "v".green(),
                    turn.turn_index,
                    turn.persona_id,
                    turn.move_type,
                    preview(&turn.dialogue, 60).dimmed()
                );
            }
            EngineEvent::Concession { concession } => {
                println!("  {} {} {}", "~".yellow(), concession.persona_id, concession.effect);
            }
            EngineEvent::EngineComplete { reason, regime, .. } => {
                println!("{} {} ({})\n", "done:".green(), regime, reason.description());
            }
            EngineEvent::EngineError { message, .. } => {
                println!("{} {}\n", "failed:".red(), message);
            }
            _ => {}
        }
    }
}
