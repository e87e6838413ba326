// ═══════════════════════════════════════════════════════════════════════
// Greedy Agent — five ordered phases spending one gold budget
//
//   1. mines      build on empty friendly mine spots
//   2. offense    move every unit, then push a corridor to the enemy HQ
//   3. defense    towers on empty friendly cells next to weak enemies
//   4. frontier   train and upgrade along the border
//   5. emit       the batch, or WAIT
//
// Every action is applied to the board as soon as it is chosen so the
// later phases read the post-action state. Each phase walks a snapshot
// of positions taken when it starts.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{Agent, Budget};
use crate::config::PlannerConfig;
use cof_engine::grid::Board;
use cof_engine::pathing::{self, Search};
use cof_engine::types::*;
use tracing::{debug, trace};

pub struct GreedyAgent {
    config: PlannerConfig,
}

impl GreedyAgent {
    pub fn new(config: PlannerConfig) -> Self {
        GreedyAgent { config }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        GreedyAgent::new(PlannerConfig::default())
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str { "Greedy" }

    fn plan(&mut self, turn: &mut Turn, mine_spots: &[MineSpot]) -> Vec<Action> {
        let mut plan = TurnPlan {
            board: &mut turn.board,
            budget: Budget::new(turn.gold),
            actions: Vec::new(),
            config: &self.config,
        };

        plan.build_mines(mine_spots);
        debug!(gold = plan.budget.remaining(), "after mines");
        plan.advance_units();
        debug!(gold = plan.budget.remaining(), "after move");
        plan.fortify();
        debug!(gold = plan.budget.remaining(), "after defense");
        plan.train_frontier();
        debug!(gold = plan.budget.remaining(), actions = plan.actions.len(), "after frontier");

        turn.gold = plan.budget.remaining();
        plan.finish()
    }
}

// ── Turn plan ──────────────────────────────────────────────────────────

struct TurnPlan<'a> {
    board: &'a mut Board,
    budget: Budget,
    actions: Vec<Action>,
    config: &'a PlannerConfig,
}

impl<'a> TurnPlan<'a> {
    /// Gold is above `floor` and covers `cost`.
    fn affords(&self, floor: i32, cost: i32) -> bool {
        self.budget.remaining() > floor && self.budget.can_afford(cost)
    }

    // ── Phase 1: mines ─────────────────────────────────────────────────

    fn build_mines(&mut self, spots: &[MineSpot]) {
        for spot in spots {
            let at = spot.pos;
            let open = self.board.get(at)
                .is_some_and(|c| c.ownership.is_friendly() && c.is_empty());
            if !open || self.board.has_mine(at) || self.board.is_hq(at) {
                continue;
            }
            let gold = self.budget.remaining() as f64;
            if gold * self.config.mine_gold_ratio > self.config.mine_gold_floor as f64
                && self.budget.can_afford(MINE_COST)
            {
                self.budget.spend(MINE_COST);
                self.actions.push(Action::Build { structure: Structure::Mine, at });
                self.board.mines.push(at);
                trace!(%at, "mine");
            }
        }
    }

    // ── Phase 2: offense ───────────────────────────────────────────────

    fn advance_units(&mut self) {
        let units: Vec<(Pos, u32)> = self.board.cells()
            .filter(|c| c.ownership.is_friendly())
            .filter_map(|c| match c.piece() {
                Some(p) if p.friendly && p.is_unit() => Some((c.pos, p.id)),
                _ => None,
            })
            .collect();

        for (at, id) in units {
            // Replaced by an upgrade earlier in the phase.
            if self.board.piece_at(at).map(|p| p.id) != Some(id) {
                continue;
            }
            let Some(piece) = self.board.piece_at(at).copied() else {
                continue;
            };
            // The unit moves first; the corridor starts from where it stands.
            let target = match piece.rank {
                1 => self.scout_target(at),
                2 => self.strike_target(at, 1),
                _ => self.strike_target(at, 2),
            };
            let mut stands = at;
            if let Some(to) = target {
                if self.board.move_occupant(at, to) {
                    trace!(id, from = %at, to = %to, rank = piece.rank, "move");
                    self.actions.push(Action::Move { id, to });
                    stands = to;
                }
            }
            self.push_corridor(stands);
        }
    }

    /// Rank 1: explore neutral ground, then empty enemy ground; hold if
    /// an enemy piece is adjacent; otherwise shuffle inside our territory.
    fn scout_target(&self, at: Pos) -> Option<Pos> {
        let enemy_hq = self.board.enemy_hq;
        let around: Vec<Cell> = self.board.neighbor_cells(at)
            .filter(|c| c.pos != self.board.my_hq)
            .copied()
            .collect();
        let nearest = |keep: &dyn Fn(&Cell) -> bool| {
            around.iter()
                .filter(|&c| keep(c))
                .map(|c| c.pos)
                .min_by_key(|p| p.distance(enemy_hq))
        };

        if let Some(to) = nearest(&|c: &Cell| c.is_empty() && c.ownership == Ownership::Neutral) {
            return Some(to);
        }
        if let Some(to) = nearest(&|c: &Cell| c.is_empty() && c.ownership.is_enemy()) {
            return Some(to);
        }
        if around.iter().any(|c| c.has_enemy_piece()) {
            return None;
        }
        nearest(&|c: &Cell| c.is_empty() && c.ownership.value() > 0)
    }

    /// Rank 2 and 3: nearest neighbour that is empty or holds an enemy
    /// unit of at most `max_victim` rank. Captures win distance ties.
    fn strike_target(&self, at: Pos, max_victim: u8) -> Option<Pos> {
        let enemy_hq = self.board.enemy_hq;
        self.board.neighbor_cells(at)
            .filter(|c| c.pos != self.board.my_hq)
            .filter(|c| match c.piece() {
                None => true,
                Some(p) => p.is_enemy_unit() && p.rank <= max_victim,
            })
            .min_by_key(|c| (c.pos.distance(enemy_hq), c.is_empty()))
            .map(|c| c.pos)
    }

    /// Claim the cheapest corridor from `from` to the enemy HQ if the
    /// whole corridor is affordable.
    fn push_corridor(&mut self, from: Pos) {
        let target = self.board.enemy_hq;
        let path = match pathing::bounded_attack_path(self.board, from, target, self.config.search_node_budget) {
            Search::Found(path) => path,
            Search::Unreachable => return,
            Search::Exhausted => {
                debug!(%from, "search budget exhausted, using greedy corridor");
                pathing::find_shortest_path(self.board, from, target)
            }
        };
        if path.corridor().is_empty() {
            return;
        }
        let cost = path.cost(self.board);
        if cost >= self.budget.remaining() {
            trace!(%from, cost, gold = self.budget.remaining(), "corridor too expensive");
            return;
        }

        debug!(%from, cost, steps = path.corridor().len(), "pushing corridor");
        for at in path.steps() {
            if let Some((rank, _)) = pathing::claim_action(self.board, at) {
                self.train(at, rank);
            }
        }
    }

    // ── Phase 3: defense ───────────────────────────────────────────────

    fn fortify(&mut self) {
        let candidates: Vec<Pos> = self.board.cells()
            .filter(|c| c.ownership.is_friendly() && c.is_empty())
            .map(|c| c.pos)
            .filter(|&p| !self.board.is_hq(p) && !self.board.has_mine(p))
            .collect();

        for at in candidates {
            if !self.board.get(at).is_some_and(|c| c.is_empty()) {
                continue;
            }
            let threatened = self.board.neighbor_cells(at)
                .any(|c| c.piece().is_some_and(|p| p.is_enemy_unit() && p.rank < MAX_RANK));
            if threatened && self.affords(self.config.tower_gold_floor, TOWER_COST) {
                self.budget.spend(TOWER_COST);
                self.actions.push(Action::Build { structure: Structure::Tower, at });
                self.board.place(at, Piece::tower(true, 1));
                trace!(%at, gold = self.budget.remaining(), "tower");
            }
        }
    }

    // ── Phase 4: frontier ──────────────────────────────────────────────

    fn train_frontier(&mut self) {
        let mut frontier = self.board.frontier();
        // Empty cells first, then by occupant rank; stable on ties.
        frontier.sort_by_key(|&p| self.board.get(p).and_then(|c| c.occupant.rank()));

        for at in frontier {
            let Some(cell) = self.board.get(at).copied() else {
                continue;
            };
            trace!(%at, "frontier");

            if cell.is_empty()
                && self.board.count_friendly_units(1) < self.config.max_rank1_units
                && self.affords(self.config.train_floor(1), train_cost(1))
            {
                self.recruit(at, 1);
            } else if rank_two_can_take(&cell) && self.affords(self.config.train_floor(2), train_cost(2)) {
                self.recruit(at, 2);
            }

            let Some(piece) = self.board.piece_at(at).copied() else {
                continue;
            };
            if !piece.friendly || !piece.is_unit() {
                continue;
            }
            if piece.rank == 1 && self.affords(self.config.train_floor(2), train_cost(2)) {
                self.recruit(at, 2);
            } else if piece.rank < MAX_RANK
                && (piece.rank > 1 || self.board.touches_tower(at))
                && self.affords(self.config.train_floor(3), train_cost(3))
            {
                self.recruit(at, 3);
            }
        }
    }

    /// Train on a cell and see whether the new piece can push through.
    fn recruit(&mut self, at: Pos, rank: u8) {
        self.train(at, rank);
        self.push_corridor(at);
    }

    // ── Shared ─────────────────────────────────────────────────────────

    fn train(&mut self, at: Pos, rank: u8) {
        self.budget.spend(train_cost(rank));
        self.actions.push(Action::Train { rank, at });
        let id = self.board.next_unit_id();
        self.board.place(at, Piece::unit(id, true, rank));
        trace!(%at, rank, id, gold = self.budget.remaining(), "train");
    }

    // ── Phase 5: emit ──────────────────────────────────────────────────

    fn finish(self) -> Vec<Action> {
        if self.actions.is_empty() {
            return vec![Action::Wait];
        }
        self.actions
    }
}

/// A rank-2 unit can be trained on an empty cell or over an enemy rank-1 unit.
fn rank_two_can_take(cell: &Cell) -> bool {
    match cell.piece() {
        None => true,
        Some(p) => p.is_enemy_unit() && p.rank == 1,
    }
}
