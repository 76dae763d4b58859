use super::{Cover, GameState, Ground, Tile};
use crate::match_three::coords::Pos;

impl GameState {
    /// Whether the position names a cell on the board.
    pub fn in_bounds(&self, pos: &Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width() && (pos.y as usize) < self.height()
    }

    #[inline]
    pub(crate) fn idx(&self, pos: &Pos) -> usize {
        debug_assert!(self.in_bounds(pos), "position {pos} out of bounds");
        pos.y as usize * self.width() + pos.x as usize
    }

    pub fn tile(&self, pos: &Pos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.grid[self.idx(pos)])
    }

    pub fn tile_mut(&mut self, pos: &Pos) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.idx(pos);
        Some(&mut self.grid[idx])
    }

    pub fn ground_at(&self, pos: &Pos) -> Option<&Ground> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.grounds[self.idx(pos)])
    }

    pub fn ground_at_mut(&mut self, pos: &Pos) -> Option<&mut Ground> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.idx(pos);
        Some(&mut self.grounds[idx])
    }

    pub fn cover_at(&self, pos: &Pos) -> Option<&Cover> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.covers[self.idx(pos)])
    }

    pub fn cover_at_mut(&mut self, pos: &Pos) -> Option<&mut Cover> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.idx(pos);
        Some(&mut self.covers[idx])
    }

    /// Swaps two slots (tiles only; static overlays stay with their cells,
    /// and dynamic covers are moved by the caller when appropriate).
    pub(crate) fn swap_tiles(&mut self, a: &Pos, b: &Pos) {
        let (ia, ib) = (self.idx(a), self.idx(b));
        self.grid.swap(ia, ib);
    }

    /// Iterates all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width();
        (0..self.width() * self.height())
            .map(move |i| Pos::new((i % width) as i32, (i / width) as i32))
    }

    /// Iterates all slots in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.iter()
    }
}
