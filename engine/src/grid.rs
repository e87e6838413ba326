// ═══════════════════════════════════════════════════════════════════════
// Grid Model — the 12×12 lattice, adjacency and per-cell occupancy
//
// Impassable positions are absent (None) rather than empty. Everything
// else the planner reads about "whose territory is this" lives here.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use crate::types::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Row-major, `None` for impassable positions.
    cells: Vec<Option<Cell>>,
    pub my_hq: Pos,
    pub enemy_hq: Pos,
    pub towers: Vec<Pos>,
    pub mines: Vec<Pos>,
    /// Highest unit id handed out so far.
    pub last_id: u32,
}

impl Board {
    /// Build a board from per-position ownership (`None` = impassable).
    pub fn new(layout: Vec<Option<Ownership>>, my_hq: Pos, enemy_hq: Pos) -> Self {
        debug_assert_eq!(layout.len(), NUM_CELLS);
        let cells = layout.into_iter().enumerate()
            .map(|(i, o)| o.map(|ownership| Cell::new(Pos::from_index(i), ownership)))
            .collect();
        Board {
            cells,
            my_hq,
            enemy_hq,
            towers: Vec::new(),
            mines: Vec::new(),
            last_id: 0,
        }
    }

    /// Parse the 12 map rows (`#`, `.`, `O`, `o`, `X`, `x`).
    /// Returns the offending (x, y, glyph) on failure.
    pub fn parse_layout<S: AsRef<str>>(rows: &[S]) -> Result<Vec<Option<Ownership>>, (usize, usize, char)> {
        let mut layout = Vec::with_capacity(NUM_CELLS);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                if ch == '#' {
                    layout.push(None);
                } else {
                    layout.push(Some(Ownership::from_glyph(ch).ok_or((x, y, ch))?));
                }
            }
        }
        Ok(layout)
    }

    // ── Access ─────────────────────────────────────────────────────────

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(pos.index()).and_then(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.cells.get_mut(pos.index()).and_then(|c| c.as_mut())
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.get(pos).is_some()
    }

    pub fn piece_at(&self, pos: Pos) -> Option<&Piece> {
        self.get(pos).and_then(|c| c.piece())
    }

    /// All passable cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn set_ownership(&mut self, pos: Pos, ownership: Ownership) {
        if let Some(cell) = self.get_mut(pos) {
            cell.ownership = ownership;
        }
    }

    /// Put a piece on a cell, replacing whatever stood there.
    pub fn place(&mut self, pos: Pos, piece: Piece) {
        if let Some(cell) = self.get_mut(pos) {
            cell.occupant = Occupant::Occupied(piece);
        }
        if piece.is_tower() && !self.towers.contains(&pos) {
            self.towers.push(pos);
        }
    }

    pub fn is_hq(&self, pos: Pos) -> bool {
        pos == self.my_hq || pos == self.enemy_hq
    }

    pub fn has_mine(&self, pos: Pos) -> bool {
        self.mines.contains(&pos)
    }

    // ── Adjacency ──────────────────────────────────────────────────────

    /// Passable orthogonal neighbours in a fixed order: down, up, right, left.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let (x, y) = (pos.x as i32, pos.y as i32);
        [(x, y + 1), (x, y - 1), (x + 1, y), (x - 1, y)]
            .into_iter()
            .filter_map(|(nx, ny)| Pos::checked(nx, ny))
            .filter(|&p| self.contains(p))
            .collect()
    }

    pub fn neighbor_cells(&self, pos: Pos) -> impl Iterator<Item = &Cell> + '_ {
        self.neighbors(pos).into_iter().filter_map(move |p| self.get(p))
    }

    /// Is any neighbour of `pos` an enemy tower?
    pub fn guarded_by_enemy_tower(&self, pos: Pos) -> bool {
        self.neighbor_cells(pos)
            .any(|c| c.piece().is_some_and(|p| p.is_tower() && !p.friendly))
    }

    /// Is any neighbour of `pos` a tower of either side?
    pub fn touches_tower(&self, pos: Pos) -> bool {
        self.neighbor_cells(pos).any(|c| c.piece().is_some_and(|p| p.is_tower()))
    }

    // ── Partitioning queries ───────────────────────────────────────────

    pub fn friendly_cells(&self) -> Vec<Pos> {
        self.cells()
            .filter(|c| c.ownership.is_friendly())
            .map(|c| c.pos)
            .collect()
    }

    /// Friendly cells holding a piece of the given rank.
    pub fn friendly_cells_with_rank(&self, rank: u8) -> Vec<Pos> {
        self.cells()
            .filter(|c| c.ownership.is_friendly() && c.occupant.rank() == Some(rank))
            .map(|c| c.pos)
            .collect()
    }

    /// Cells at or below neutral that border at least one friendly cell.
    pub fn frontier(&self) -> Vec<Pos> {
        self.cells()
            .filter(|c| c.ownership.is_unclaimed())
            .filter(|c| self.neighbor_cells(c.pos).any(|n| n.ownership.is_friendly()))
            .map(|c| c.pos)
            .collect()
    }

    /// Friendly units of a given rank anywhere on the board.
    pub fn count_friendly_units(&self, rank: u8) -> usize {
        self.cells()
            .filter_map(|c| c.piece())
            .filter(|p| p.friendly && p.is_unit() && p.rank == rank)
            .count()
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Move the occupant of `from` onto `to`, replacing anything there.
    /// Only adjacent moves are allowed; returns false otherwise.
    pub fn move_occupant(&mut self, from: Pos, to: Pos) -> bool {
        if from.distance(to) != 1 || !self.contains(to) {
            return false;
        }
        let occupant = match self.get_mut(from) {
            Some(cell) => std::mem::take(&mut cell.occupant),
            None => return false,
        };
        if let Some(cell) = self.get_mut(to) {
            cell.occupant = occupant;
        }
        true
    }

    /// Fresh id for a newly trained unit, always above every id seen.
    pub fn next_unit_id(&mut self) -> u32 {
        self.last_id += 1;
        self.last_id
    }

    /// Raise the id counter so it covers `id`.
    pub fn observe_id(&mut self, id: u32) {
        if id != FIXTURE_ID && id > self.last_id {
            self.last_id = id;
        }
    }

    /// Render the ownership rows back to the input glyphs.
    pub fn render(&self) -> Vec<String> {
        (0..HEIGHT)
            .map(|y| {
                (0..WIDTH)
                    .map(|x| match self.get(Pos::new(x as u8, y as u8)) {
                        Some(c) => c.ownership.glyph(),
                        None => '#',
                    })
                    .collect()
            })
            .collect()
    }
}
