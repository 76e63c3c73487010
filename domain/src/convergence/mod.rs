//! Convergence detection over the contested-frontier history.

use crate::concession::Concession;
use serde::{Deserialize, Serialize};

/// `true` when the last `window` samples exist and none of them rose
/// above its predecessor.
pub fn frontier_non_increasing(history: &[usize], window: usize) -> bool {
    let window = window.max(1);
    if history.len() < window {
        return false;
    }
    let start = history.len() - window;
    // The first sample of the window is compared with the one before it
    // when there is one.
    let from = start.max(1);
    (from..history.len()).all(|i| history[i] <= history[i - 1])
}

/// Result of one convergence evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceCheck {
    pub contested_frontier: usize,
    pub frontier_stable: bool,
    pub recent_concessions: usize,
    pub converged: bool,
}

/// Evaluate convergence after the current turn.
///
/// `history` must already hold the current turn's sample. Converged means
/// the frontier did not rise over the last `window` turns and nobody
/// conceded in those turns.
pub fn check_convergence(
    history: &[usize],
    concessions: &[Concession],
    current_turn: usize,
    window: usize,
) -> ConvergenceCheck {
    let window = window.max(1);
    let frontier_stable = frontier_non_increasing(history, window);
    let since = (current_turn + 1).saturating_sub(window).max(1);
    let recent_concessions = concessions.iter().filter(|c| c.turn_index >= since).count();

    ConvergenceCheck {
        contested_frontier: history.last().copied().unwrap_or(0),
        frontier_stable,
        recent_concessions,
        converged: frontier_stable && recent_concessions == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concession::ConcessionType;

    fn concession(turn_index: usize) -> Concession {
        Concession {
            turn_index,
            persona_id: "x".into(),
            concession_type: ConcessionType::Full,
            conceded_claim: "c".to_string(),
            effect: "withdrew".to_string(),
            removed_arg_ids: vec![],
            updated_arg_ids: vec![],
        }
    }

    #[test]
    fn test_needs_enough_samples() {
        assert!(!frontier_non_increasing(&[0, 0, 0], 4));
        assert!(frontier_non_increasing(&[0, 0, 0, 0], 4));
    }

    #[test]
    fn test_increase_inside_window_blocks() {
        assert!(!frontier_non_increasing(&[3, 2, 2, 3], 4));
        assert!(frontier_non_increasing(&[3, 3, 2, 2, 1], 4));
    }

    #[test]
    fn test_increase_into_window_blocks() {
        // 1 -> 3 happens at the first sample of the window
        assert!(!frontier_non_increasing(&[1, 3, 3, 2, 2], 4));
    }

    #[test]
    fn test_converges_on_flat_history() {
        let check = check_convergence(&[2, 2, 1, 1], &[], 4, 4);
        assert!(check.converged);
        assert_eq!(check.contested_frontier, 1);
    }

    #[test]
    fn test_recent_concession_blocks_convergence() {
        let concessions = [concession(4)];
        let check = check_convergence(&[2, 2, 1, 1, 1], &concessions, 5, 4);
        assert!(check.frontier_stable);
        assert_eq!(check.recent_concessions, 1);
        assert!(!check.converged);

        // Turn 9: the concession at turn 4 has left the window
        let later = check_convergence(&[2, 2, 1, 1, 1, 1, 1, 1, 1], &concessions, 9, 4);
        assert!(later.converged);
    }
}
