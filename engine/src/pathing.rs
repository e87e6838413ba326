// ═══════════════════════════════════════════════════════════════════════
// Pathfinder — attack corridors toward a target and their gold cost
//
// Two searches share one cost model:
//   find_shortest_path   greedy corridor, fast and approximate
//   compute_attack_path  A*, cost-optimal under claim_cost
// Both return an AttackPath ordered target-first, origin-last.
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::Board;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Heuristic weight per step; no step costs less than this.
const STEP_WEIGHT: i32 = 10;

// ── Cost model ─────────────────────────────────────────────────────────

/// Extra gold a cell demands beyond walking in:
/// 0 empty, 30 empty under an enemy tower, 20 over a rank-1 unit,
/// 30 over anything stronger or over a tower.
pub fn cost(board: &Board, pos: Pos) -> i32 {
    let Some(cell) = board.get(pos) else {
        return 0;
    };
    match cell.piece() {
        None if board.guarded_by_enemy_tower(pos) => train_cost(3),
        None => 0,
        Some(p) if p.is_unit() && p.rank == 1 => train_cost(2),
        Some(_) => train_cost(3),
    }
}

/// Gold needed to claim a cell by training on it. Also the A* step
/// weight, so it never drops below a rank-1 train.
pub fn claim_cost(board: &Board, pos: Pos) -> i32 {
    cost(board, pos).max(train_cost(1))
}

/// Empty friendly ground needs no claiming.
fn already_held(board: &Board, pos: Pos) -> bool {
    board.get(pos).is_some_and(|c| c.ownership.is_friendly() && c.is_empty())
}

/// What to train on a corridor cell, or None when the cell is empty
/// friendly ground or a friendly piece holds it at full strength.
pub fn claim_action(board: &Board, pos: Pos) -> Option<(u8, i32)> {
    let cell = board.get(pos)?;
    match cell.piece() {
        Some(p) if p.friendly && (p.is_tower() || p.rank >= MAX_RANK) => None,
        None if cell.ownership.is_friendly() => None,
        None if board.guarded_by_enemy_tower(pos) => Some((3, train_cost(3))),
        None => Some((1, train_cost(1))),
        Some(p) if p.is_unit() && p.rank == 1 => Some((2, train_cost(2))),
        Some(_) => Some((3, train_cost(3))),
    }
}

/// Total gold to claim every cell in `cells`; empty friendly ground is free.
pub fn evaluate_path(board: &Board, cells: &[Pos]) -> i32 {
    cells.iter()
        .filter(|&&p| !already_held(board, p))
        .map(|&p| claim_cost(board, p))
        .sum()
}

// ── AttackPath ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPath {
    /// Target first, origin last. Empty when no path exists.
    cells: Vec<Pos>,
}

impl AttackPath {
    pub fn from_cells(cells: Vec<Pos>) -> Self {
        AttackPath { cells }
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn origin(&self) -> Option<Pos> {
        self.cells.last().copied()
    }

    pub fn target(&self) -> Option<Pos> {
        self.cells.first().copied()
    }

    /// The corridor without the origin, still target-first.
    pub fn corridor(&self) -> &[Pos] {
        match self.cells.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Corridor cells nearest the origin first, the order they are claimed in.
    pub fn steps(&self) -> impl Iterator<Item = Pos> + '_ {
        self.corridor().iter().rev().copied()
    }

    /// Gold needed to claim the corridor; the origin is never charged.
    pub fn cost(&self, board: &Board) -> i32 {
        evaluate_path(board, self.corridor())
    }
}

// ── Greedy corridor ────────────────────────────────────────────────────

/// Chain non-friendly cells by ascending distance to `target`, keeping
/// each one only if it touches the previous link, until a link touches
/// `origin`. Not optimal; empty when no contiguous chain shows up.
pub fn find_shortest_path(board: &Board, origin: Pos, target: Pos) -> AttackPath {
    if origin == target {
        return AttackPath::from_cells(vec![origin]);
    }

    let mut candidates: Vec<Pos> = board.cells()
        .filter(|c| !c.ownership.is_friendly() && c.pos != origin)
        .map(|c| c.pos)
        .collect();
    candidates.sort_by_key(|p| p.distance(target));

    let mut chain: Vec<Pos> = Vec::new();
    for cell in candidates {
        let linked = match chain.last() {
            None => true,
            Some(last) => last.distance(cell) == 1,
        };
        if !linked {
            continue;
        }
        chain.push(cell);
        if cell.distance(origin) == 1 {
            chain.push(origin);
            return AttackPath::from_cells(chain);
        }
    }
    AttackPath::default()
}

// ── A* ─────────────────────────────────────────────────────────────────

/// Outcome of a bounded A* run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Search {
    Found(AttackPath),
    Unreachable,
    /// Node budget ran out before the goal was settled.
    Exhausted,
}

/// Cheapest path from `start` to `goal`, weighting each entered cell by
/// its claim cost. Empty when the goal cannot be reached.
pub fn compute_attack_path(board: &Board, start: Pos, goal: Pos) -> AttackPath {
    match bounded_attack_path(board, start, goal, usize::MAX) {
        Search::Found(path) => path,
        Search::Unreachable | Search::Exhausted => AttackPath::default(),
    }
}

/// A* that gives up after settling `node_budget` cells.
pub fn bounded_attack_path(board: &Board, start: Pos, goal: Pos, node_budget: usize) -> Search {
    if !board.contains(start) || !board.contains(goal) {
        return Search::Unreachable;
    }
    if start == goal {
        return Search::Found(AttackPath::from_cells(vec![start]));
    }

    let mut g_score = vec![i32::MAX; NUM_CELLS];
    let mut came_from: Vec<Option<usize>> = vec![None; NUM_CELLS];
    let mut closed = vec![false; NUM_CELLS];
    // (f, insertion order, cell); earlier insertions win ties.
    let mut open: BinaryHeap<Reverse<(i32, u32, usize)>> = BinaryHeap::new();
    let mut inserted = 0u32;

    g_score[start.index()] = 0;
    open.push(Reverse((start.distance(goal) * STEP_WEIGHT, inserted, start.index())));

    let mut settled = 0usize;
    while let Some(Reverse((_, _, current))) = open.pop() {
        if closed[current] {
            continue;
        }
        if current == goal.index() {
            return Search::Found(reconstruct(&came_from, current));
        }
        closed[current] = true;
        settled += 1;
        if settled > node_budget {
            return Search::Exhausted;
        }

        let here = Pos::from_index(current);
        for next in board.neighbors(here) {
            let n = next.index();
            if closed[n] || (next == board.my_hq && next != goal) {
                continue;
            }
            let candidate = g_score[current] + claim_cost(board, next);
            if candidate >= g_score[n] {
                continue;
            }
            came_from[n] = Some(current);
            g_score[n] = candidate;
            inserted += 1;
            open.push(Reverse((candidate + next.distance(goal) * STEP_WEIGHT, inserted, n)));
        }
    }
    Search::Unreachable
}

/// Walk the came-from chain back from the goal; yields goal-first order.
fn reconstruct(came_from: &[Option<usize>], goal: usize) -> AttackPath {
    let mut cells = vec![Pos::from_index(goal)];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        cells.push(Pos::from_index(prev));
        current = prev;
    }
    AttackPath::from_cells(cells)
}
