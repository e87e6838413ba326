// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface every turn planner implements
//
// An agent receives one turn snapshot and the carried mine spots and
// returns the ordered action batch for that turn. It may mutate the
// snapshot's board to simulate its own actions; the snapshot is thrown
// away afterwards and the next turn is re-read from the referee.
// ═══════════════════════════════════════════════════════════════════════

use cof_engine::output::format_turn;
use cof_engine::types::*;

pub trait Agent: Send {
    /// Human-readable name for this agent (e.g., "Greedy", "Random").
    fn name(&self) -> &str;

    /// Decide every action for this turn. Never returns an empty list:
    /// a turn with nothing to do yields `[Action::Wait]`.
    fn plan(&mut self, turn: &mut Turn, mine_spots: &[MineSpot]) -> Vec<Action>;

    /// Plan and encode the turn as one protocol line.
    fn play(&mut self, turn: &mut Turn, mine_spots: &[MineSpot]) -> String {
        let actions: Vec<Action> = self.plan(turn, mine_spots)
            .into_iter()
            .filter(|a| *a != Action::Wait)
            .collect();
        format_turn(&actions)
    }
}

// ── Budget ─────────────────────────────────────────────────────────────

/// The turn's gold. Spending more than what is left is a planner bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    remaining: i32,
}

impl Budget {
    pub fn new(gold: i32) -> Self {
        Budget { remaining: gold.max(0) }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        cost <= self.remaining
    }

    pub fn spend(&mut self, cost: i32) {
        assert!(cost <= self.remaining, "spending {} with only {} gold left", cost, self.remaining);
        self.remaining -= cost;
    }
}
