// ═══════════════════════════════════════════════════════════════════════
// Action Encoder — one line per turn, semicolon-joined
// ═══════════════════════════════════════════════════════════════════════

use crate::types::Action;

pub fn format_action(action: &Action) -> String {
    match action {
        Action::Move { id, to } => format!("MOVE {} {}", id, to),
        Action::Train { rank, at } => format!("TRAIN {} {}", rank, at),
        Action::Build { structure, at } => format!("BUILD {} {}", structure, at),
        Action::Wait => "WAIT".to_string(),
    }
}

/// The full turn line; `WAIT` when there is nothing to do.
pub fn format_turn(actions: &[Action]) -> String {
    if actions.is_empty() {
        return format_action(&Action::Wait);
    }
    actions.iter().map(format_action).collect::<Vec<_>>().join(";")
}
