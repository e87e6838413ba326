// ═══════════════════════════════════════════════════════════════════════
// Random Agent — wanders units and trains rank-1 units at random.
// Serves as a baseline and for checking the protocol end to end.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{Agent, Budget};
use cof_engine::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }

    fn plan(&mut self, turn: &mut Turn, _mine_spots: &[MineSpot]) -> Vec<Action> {
        let board = &mut turn.board;
        let mut budget = Budget::new(turn.gold);
        let mut actions = Vec::new();

        let units: Vec<(Pos, u32)> = board.cells()
            .filter_map(|c| match c.piece() {
                Some(p) if p.friendly && p.is_unit() => Some((c.pos, p.id)),
                _ => None,
            })
            .collect();

        for (at, id) in units {
            let options: Vec<Pos> = board.neighbor_cells(at)
                .filter(|c| c.is_empty() && c.pos != board.my_hq)
                .map(|c| c.pos)
                .collect();
            if let Some(&to) = options.choose(&mut self.rng) {
                if self.rng.gen_bool(0.7) && board.move_occupant(at, to) {
                    actions.push(Action::Move { id, to });
                }
            }
        }

        let mut frontier: Vec<Pos> = board.frontier()
            .into_iter()
            .filter(|&p| board.get(p).is_some_and(|c| c.is_empty()))
            .collect();
        frontier.shuffle(&mut self.rng);

        for at in frontier {
            if !budget.can_afford(train_cost(1)) {
                break;
            }
            if self.rng.gen_bool(0.5) {
                budget.spend(train_cost(1));
                let id = board.next_unit_id();
                board.place(at, Piece::unit(id, true, 1));
                actions.push(Action::Train { rank: 1, at });
            }
        }

        turn.gold = budget.remaining();
        if actions.is_empty() {
            actions.push(Action::Wait);
        }
        actions
    }
}
