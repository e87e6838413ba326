// ═══════════════════════════════════════════════════════════════════════
// Turn Input Reader — tokenizes the referee's text into a Turn snapshot
//
// Header (once):  mineSpotCount, then x y per spot
// Per turn:       gold income opponentGold opponentIncome
//                 12 map rows
//                 buildingCount, then owner type x y
//                 unitCount, then owner id level x y
// Coordinates are validated here so the planner can trust the board.
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::Board;
use crate::types::*;
use std::collections::VecDeque;
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input ended unexpectedly")]
    UnexpectedEof,
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected an integer, got {0:?}")]
    BadInteger(String),
    #[error("map has {0} rows, expected 12")]
    BadRowCount(usize),
    #[error("map row {y} has width {width}, expected 12")]
    BadRowWidth { y: usize, width: usize },
    #[error("unknown map glyph {glyph:?} at ({x}, {y})")]
    BadGlyph { x: usize, y: usize, glyph: char },
    #[error("coordinates ({x}, {y}) are off the board")]
    OutOfRange { x: i32, y: i32 },
    #[error("({x}, {y}) is impassable")]
    Impassable { x: i32, y: i32 },
    #[error("unknown building type {0}")]
    UnknownBuilding(i32),
    #[error("unit rank {0} is outside 1..=3")]
    BadRank(i32),
    #[error("no {0} headquarters in the building list")]
    MissingHeadquarters(&'static str),
}

// ── Tokens ─────────────────────────────────────────────────────────────

/// Pulls whitespace-separated tokens from a line source, reading lines
/// only when the buffer runs dry so a live referee is never over-read.
pub struct TokenReader<R> {
    source: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(source: R) -> Self {
        TokenReader { source, pending: VecDeque::new() }
    }

    /// Next token, or None at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>, InputError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.source.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    pub fn token(&mut self) -> Result<String, InputError> {
        self.next_token()?.ok_or(InputError::UnexpectedEof)
    }

    pub fn int(&mut self) -> Result<i32, InputError> {
        let token = self.token()?;
        token.parse().map_err(|_| InputError::BadInteger(token))
    }

    /// Like `int`, but a clean end of input yields None.
    pub fn try_int(&mut self) -> Result<Option<i32>, InputError> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => token.parse().map(Some).map_err(|_| InputError::BadInteger(token)),
        }
    }
}

fn pos(x: i32, y: i32) -> Result<Pos, InputError> {
    Pos::checked(x, y).ok_or(InputError::OutOfRange { x, y })
}

fn passable(board: &Board, x: i32, y: i32) -> Result<Pos, InputError> {
    let p = pos(x, y)?;
    if board.contains(p) { Ok(p) } else { Err(InputError::Impassable { x, y }) }
}

// ── Header ─────────────────────────────────────────────────────────────

pub fn read_mine_spots<R: BufRead>(input: &mut TokenReader<R>) -> Result<Vec<MineSpot>, InputError> {
    let count = input.int()?;
    (0..count)
        .map(|_| {
            let x = input.int()?;
            let y = input.int()?;
            Ok(MineSpot { pos: pos(x, y)? })
        })
        .collect()
}

// ── Turn ───────────────────────────────────────────────────────────────

/// Read one turn. Returns Ok(None) when the input is exhausted before
/// the turn starts. `last_id` is the counter carried from earlier turns.
pub fn read_turn<R: BufRead>(input: &mut TokenReader<R>, last_id: u32) -> Result<Option<Turn>, InputError> {
    let Some(gold) = input.try_int()? else {
        return Ok(None);
    };
    let income = input.int()?;
    let opponent_gold = input.int()?;
    let opponent_income = input.int()?;

    let rows = (0..HEIGHT).map(|_| input.token()).collect::<Result<Vec<_>, _>>()?;

    let building_count = input.int()?;
    let mut raw_buildings = Vec::new();
    for _ in 0..building_count {
        raw_buildings.push((input.int()?, input.int()?, input.int()?, input.int()?));
    }

    let unit_count = input.int()?;
    let mut raw_units = Vec::new();
    for _ in 0..unit_count {
        raw_units.push((input.int()?, input.int()?, input.int()?, input.int()?, input.int()?));
    }

    let layout = parse_rows(&rows)?;

    let mut buildings = Vec::with_capacity(raw_buildings.len());
    for (owner, code, x, y) in raw_buildings {
        let kind = BuildingKind::from_code(code).ok_or(InputError::UnknownBuilding(code))?;
        buildings.push(Building { friendly: owner == 0, kind, pos: pos(x, y)? });
    }

    let mut units = Vec::with_capacity(raw_units.len());
    for (owner, id, rank, x, y) in raw_units {
        if !(1..=MAX_RANK as i32).contains(&rank) {
            return Err(InputError::BadRank(rank));
        }
        let id = u32::try_from(id).map_err(|_| InputError::BadInteger(id.to_string()))?;
        units.push(UnitRecord { friendly: owner == 0, id, rank: rank as u8, pos: pos(x, y)? });
    }

    let board = assemble_board(layout, &buildings, &units, last_id)?;
    Ok(Some(Turn { gold, income, opponent_gold, opponent_income, board }))
}

/// Validate the map rows and turn them into per-position ownership.
pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Vec<Option<Ownership>>, InputError> {
    if rows.len() != HEIGHT {
        return Err(InputError::BadRowCount(rows.len()));
    }
    for (y, row) in rows.iter().enumerate() {
        let width = row.as_ref().chars().count();
        if width != WIDTH {
            return Err(InputError::BadRowWidth { y, width });
        }
    }
    Board::parse_layout(rows).map_err(|(x, y, glyph)| InputError::BadGlyph { x, y, glyph })
}

/// Place buildings and units onto a fresh board.
pub fn assemble_board(
    layout: Vec<Option<Ownership>>,
    buildings: &[Building],
    units: &[UnitRecord],
    last_id: u32,
) -> Result<Board, InputError> {
    let hq = |friendly: bool| {
        buildings.iter()
            .find(|b| b.kind == BuildingKind::Hq && b.friendly == friendly)
            .map(|b| b.pos)
    };
    let my_hq = hq(true).ok_or(InputError::MissingHeadquarters("friendly"))?;
    let enemy_hq = hq(false).ok_or(InputError::MissingHeadquarters("enemy"))?;

    let mut board = Board::new(layout, my_hq, enemy_hq);
    board.last_id = last_id;

    for b in buildings {
        let at = passable(&board, b.pos.x as i32, b.pos.y as i32)?;
        match b.kind {
            BuildingKind::Hq => {}
            BuildingKind::Mine => board.mines.push(at),
            // Towers read as full strength so nothing weaker walks through them.
            BuildingKind::Tower => board.place(at, Piece::tower(b.friendly, MAX_RANK)),
        }
    }

    for u in units {
        let at = passable(&board, u.pos.x as i32, u.pos.y as i32)?;
        board.place(at, Piece::unit(u.id, u.friendly, u.rank));
        board.observe_id(u.id);
    }

    Ok(board)
}
