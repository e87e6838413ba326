// ═══════════════════════════════════════════════════════════════════════
// Core types — cells, pieces, buildings, actions and turn snapshots
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use crate::grid::Board;

// ── Constants ──────────────────────────────────────────────────────────

pub const WIDTH: usize = 12;
pub const HEIGHT: usize = 12;
pub const NUM_CELLS: usize = WIDTH * HEIGHT;

/// Id given to fixtures (towers) that never move.
pub const FIXTURE_ID: u32 = u32::MAX;

pub const MAX_RANK: u8 = 3;

/// Training cost by rank, index 0 unused.
pub const TRAIN_COST: [i32; 4] = [0, 10, 20, 30];
pub const MINE_COST: i32 = 20;
pub const TOWER_COST: i32 = 15;

pub fn train_cost(rank: u8) -> i32 {
    TRAIN_COST[rank.min(MAX_RANK) as usize]
}

// ── Position ───────────────────────────────────────────────────────────
// Compact, copyable coordinate. Index into the row-major cell array.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Pos { x, y }
    }

    /// Checked constructor for coordinates coming from outside.
    pub fn checked(x: i32, y: i32) -> Option<Pos> {
        if (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y) {
            Some(Pos { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.y as usize * WIDTH + self.x as usize
    }

    pub fn from_index(index: usize) -> Pos {
        Pos { x: (index % WIDTH) as u8, y: (index / WIDTH) as u8 }
    }

    /// Manhattan distance.
    pub fn distance(self, other: Pos) -> i32 {
        (self.x as i32 - other.x as i32).abs() + (self.y as i32 - other.y as i32).abs()
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

// ── Ownership ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ownership {
    EnemyActive,
    EnemyInactive,
    Neutral,
    MineInactive,
    MineActive,
}

impl Ownership {
    /// Signed strength: negative for the enemy, positive for us.
    pub fn value(self) -> i8 {
        match self {
            Ownership::EnemyActive => -2,
            Ownership::EnemyInactive => -1,
            Ownership::Neutral => 0,
            Ownership::MineInactive => 1,
            Ownership::MineActive => 2,
        }
    }

    pub fn from_glyph(ch: char) -> Option<Ownership> {
        match ch {
            'X' => Some(Ownership::EnemyActive),
            'x' => Some(Ownership::EnemyInactive),
            '.' => Some(Ownership::Neutral),
            'o' => Some(Ownership::MineInactive),
            'O' => Some(Ownership::MineActive),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Ownership::EnemyActive => 'X',
            Ownership::EnemyInactive => 'x',
            Ownership::Neutral => '.',
            Ownership::MineInactive => 'o',
            Ownership::MineActive => 'O',
        }
    }

    pub fn is_friendly(self) -> bool {
        self == Ownership::MineActive
    }

    pub fn is_enemy(self) -> bool {
        self.value() < 0
    }

    /// Neutral or enemy territory.
    pub fn is_unclaimed(self) -> bool {
        self.value() <= 0
    }
}

// ── Pieces ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Unit,
    Tower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u32,
    pub friendly: bool,
    pub rank: u8,
    pub kind: PieceKind,
}

impl Piece {
    pub fn unit(id: u32, friendly: bool, rank: u8) -> Self {
        Piece { id, friendly, rank, kind: PieceKind::Unit }
    }

    pub fn tower(friendly: bool, rank: u8) -> Self {
        Piece { id: FIXTURE_ID, friendly, rank, kind: PieceKind::Tower }
    }

    pub fn is_unit(&self) -> bool {
        self.kind == PieceKind::Unit
    }

    pub fn is_tower(&self) -> bool {
        self.kind == PieceKind::Tower
    }

    pub fn is_enemy_unit(&self) -> bool {
        !self.friendly && self.is_unit()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Occupant {
    pub fn piece(&self) -> Option<&Piece> {
        match self {
            Occupant::Empty => None,
            Occupant::Occupied(p) => Some(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn rank(&self) -> Option<u8> {
        self.piece().map(|p| p.rank)
    }
}

// ── Cell ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub pos: Pos,
    pub ownership: Ownership,
    pub occupant: Occupant,
}

impl Cell {
    pub fn new(pos: Pos, ownership: Ownership) -> Self {
        Cell { pos, ownership, occupant: Occupant::Empty }
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.occupant.piece()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_empty()
    }

    pub fn has_friendly_piece(&self) -> bool {
        self.piece().is_some_and(|p| p.friendly)
    }

    pub fn has_enemy_piece(&self) -> bool {
        self.piece().is_some_and(|p| !p.friendly)
    }
}

// ── Buildings & units as read from the input ──────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Hq,
    Mine,
    Tower,
}

impl BuildingKind {
    pub fn from_code(code: i32) -> Option<BuildingKind> {
        match code {
            0 => Some(BuildingKind::Hq),
            1 => Some(BuildingKind::Mine),
            2 => Some(BuildingKind::Tower),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub friendly: bool,
    pub kind: BuildingKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub friendly: bool,
    pub id: u32,
    pub rank: u8,
    pub pos: Pos,
}

/// A map position eligible for mine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MineSpot {
    pub pos: Pos,
}

// ── Actions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    Mine,
    Tower,
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Structure::Mine => write!(f, "MINE"),
            Structure::Tower => write!(f, "TOWER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { id: u32, to: Pos },
    Train { rank: u8, at: Pos },
    Build { structure: Structure, at: Pos },
    Wait,
}

impl Action {
    /// Gold spent by this action.
    pub fn cost(&self) -> i32 {
        match self {
            Action::Move { .. } | Action::Wait => 0,
            Action::Train { rank, .. } => train_cost(*rank),
            Action::Build { structure: Structure::Mine, .. } => MINE_COST,
            Action::Build { structure: Structure::Tower, .. } => TOWER_COST,
        }
    }
}

// ── Turn snapshot ──────────────────────────────────────────────────────

/// Everything the environment tells us at the start of one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub gold: i32,
    pub income: i32,
    pub opponent_gold: i32,
    pub opponent_income: i32,
    pub board: Board,
}

/// State carried from one turn to the next by the host process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub mine_spots: Vec<MineSpot>,
    pub last_id: u32,
}

/// A recorded turn: the carried mine spots plus the snapshot itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub mine_spots: Vec<MineSpot>,
    pub turn: Turn,
}
