// ═══════════════════════════════════════════════════════════════════════
// Board setup — hand-built and seeded random turn snapshots
// Used by tests and by the runner's benchmark.
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::Board;
use crate::input::{self, InputError};
use crate::types::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_MY_HQ: Pos = Pos::new(0, 0);
pub const DEFAULT_ENEMY_HQ: Pos = Pos::new(11, 11);

/// Wrap a board into a turn with the given gold and no income.
pub fn turn_with(board: Board, gold: i32) -> Turn {
    Turn { gold, income: 0, opponent_gold: 0, opponent_income: 0, board }
}

/// Build a turn from map rows plus building and unit records.
pub fn turn_from_rows<S: AsRef<str>>(
    rows: &[S],
    gold: i32,
    buildings: &[Building],
    units: &[UnitRecord],
) -> Result<Turn, InputError> {
    let layout = input::parse_rows(rows)?;
    let board = input::assemble_board(layout, buildings, units, 0)?;
    Ok(turn_with(board, gold))
}

/// The two headquarters at their usual corners.
pub fn default_headquarters() -> Vec<Building> {
    vec![
        Building { friendly: true, kind: BuildingKind::Hq, pos: DEFAULT_MY_HQ },
        Building { friendly: false, kind: BuildingKind::Hq, pos: DEFAULT_ENEMY_HQ },
    ]
}

/// Neutral open board; only the two HQ cells are owned.
pub fn open_board() -> Board {
    let mut layout = vec![Some(Ownership::Neutral); NUM_CELLS];
    layout[DEFAULT_MY_HQ.index()] = Some(Ownership::MineActive);
    layout[DEFAULT_ENEMY_HQ.index()] = Some(Ownership::EnemyActive);
    Board::new(layout, DEFAULT_MY_HQ, DEFAULT_ENEMY_HQ)
}

// ── Random boards ──────────────────────────────────────────────────────

/// Knobs for random board generation.
#[derive(Debug, Clone, Copy)]
pub struct RandomBoardSpec {
    pub wall_chance: f64,
    pub friendly_units: usize,
    pub enemy_units: usize,
    pub enemy_towers: usize,
    pub gold: i32,
}

impl Default for RandomBoardSpec {
    fn default() -> Self {
        RandomBoardSpec {
            wall_chance: 0.12,
            friendly_units: 4,
            enemy_units: 4,
            enemy_towers: 1,
            gold: 120,
        }
    }
}

/// Seed-deterministic turn: each side owns the quadrant around its HQ,
/// scattered walls elsewhere, units and towers on owned territory.
pub fn random_turn(seed: u64, spec: &RandomBoardSpec) -> Turn {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut layout = vec![Some(Ownership::Neutral); NUM_CELLS];
    for (i, slot) in layout.iter_mut().enumerate() {
        let p = Pos::from_index(i);
        if p.distance(DEFAULT_MY_HQ) <= 4 {
            *slot = Some(Ownership::MineActive);
        } else if p.distance(DEFAULT_ENEMY_HQ) <= 4 {
            *slot = Some(Ownership::EnemyActive);
        } else if rng.gen_bool(spec.wall_chance) {
            *slot = None;
        }
    }

    let mut board = Board::new(layout, DEFAULT_MY_HQ, DEFAULT_ENEMY_HQ);

    let mut mine_side: Vec<Pos> = board.cells()
        .filter(|c| c.ownership.is_friendly() && c.pos != DEFAULT_MY_HQ)
        .map(|c| c.pos)
        .collect();
    let mut enemy_side: Vec<Pos> = board.cells()
        .filter(|c| c.ownership.is_enemy() && c.pos != DEFAULT_ENEMY_HQ)
        .map(|c| c.pos)
        .collect();
    mine_side.shuffle(&mut rng);
    enemy_side.shuffle(&mut rng);

    let mut next_id = 0u32;
    for at in mine_side.into_iter().take(spec.friendly_units) {
        next_id += 1;
        let rank = rng.gen_range(1..=MAX_RANK);
        board.place(at, Piece::unit(next_id, true, rank));
        board.observe_id(next_id);
    }
    let mut enemy_iter = enemy_side.into_iter();
    for at in enemy_iter.by_ref().take(spec.enemy_towers) {
        board.place(at, Piece::tower(false, MAX_RANK));
    }
    for at in enemy_iter.take(spec.enemy_units) {
        next_id += 1;
        let rank = rng.gen_range(1..=MAX_RANK);
        board.place(at, Piece::unit(next_id, false, rank));
        board.observe_id(next_id);
    }

    turn_with(board, spec.gold)
}

/// Random mine spots on passable, non-HQ cells.
pub fn random_mine_spots(seed: u64, board: &Board, count: usize) -> Vec<MineSpot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut spots: Vec<Pos> = board.cells()
        .map(|c| c.pos)
        .filter(|&p| !board.is_hq(p))
        .collect();
    spots.shuffle(&mut rng);
    spots.into_iter().take(count).map(|pos| MineSpot { pos }).collect()
}
