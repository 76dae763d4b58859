use super::GameState;
use crate::match_three::consts::{TileKind, GRAVITY, MAX_FALL_SPEED};
use crate::match_three::coords::Pos;

impl GameState {
    /// Whether a tile standing at `pos` could drop into the cell below:
    /// in bounds, empty, and not reserved by an explosion.
    fn below_available(&self, pos: &Pos) -> bool {
        let below = Pos::new(pos.x, pos.y + 1);
        self.in_bounds(&below)
            && self.tile(&below).map_or(false, |t| t.is_empty() && !t.suspended)
    }

    /// Whether the tile at `pos` is pinned by a static cover.
    fn pinned(&self, pos: &Pos) -> bool {
        self.cover_at(pos).map_or(false, |c| !c.is_none() && !c.kind.is_dynamic())
    }

    /// Advances gravity by one fixed step. Columns resolve bottom to top so
    /// that lower tiles vacate before the tiles above them are examined.
    /// Landed positions are appended to `landed`; returns whether any tile is
    /// still falling afterwards.
    pub(crate) fn advance_gravity(&mut self, dt: f32, landed: &mut Vec<Pos>) -> bool {
        for x in 0..self.width() as i32 {
            for y in (0..self.height() as i32).rev() {
                let pos = Pos::new(x, y);
                let idx = self.idx(&pos);

                let tile = self.grid[idx];
                if tile.is_empty() || tile.suspended {
                    continue;
                }

                if !tile.falling {
                    // A settled tile starts to fall when the cell below opens
                    // up, unless a static cover pins it.
                    if self.below_available(&pos) && !self.pinned(&pos) {
                        self.grid[idx].falling = true;
                        self.grid[idx].velocity = (0.0, 0.0);
                    } else {
                        continue;
                    }
                }

                self.integrate_fall(pos, dt, landed);
            }
        }

        self.any_falling()
    }

    /// One integration step for a single falling tile: accelerate, advance,
    /// hand the tile across cell boundaries, land when nothing below gives.
    fn integrate_fall(&mut self, start: Pos, dt: f32, landed: &mut Vec<Pos>) {
        let mut pos = start;
        let mut idx = self.idx(&pos);

        let vy = (self.grid[idx].velocity.1 + GRAVITY * dt).min(MAX_FALL_SPEED);
        self.grid[idx].velocity.1 = vy;
        self.grid[idx].visual.1 += vy * dt;

        // Never sink into the tile below: keep at least one cell of gap.
        let below = Pos::new(pos.x, pos.y + 1);
        if let Some(below_tile) = self.tile(&below) {
            if !below_tile.is_empty() {
                let ceiling = below_tile.visual.1 - 1.0;
                let idx_tile = &mut self.grid[idx];
                if idx_tile.visual.1 > ceiling {
                    idx_tile.visual.1 = ceiling.max(pos.y as f32 - 1.0);
                }
            }
        }

        // The logical slot follows the visual centre across cell boundaries,
        // carrying velocity (and any bubble) into the new cell.
        while self.grid[idx].visual.1 >= pos.y as f32 + 0.5 && self.below_available(&pos) {
            let next = Pos::new(pos.x, pos.y + 1);
            self.swap_tiles(&pos, &next);
            self.carry_dynamic_cover(&pos, &next);
            pos = next;
            idx = self.idx(&pos);
        }

        // Landing: at or past the resting point with nowhere further to go.
        if !self.below_available(&pos) && self.grid[idx].visual.1 >= pos.y as f32 {
            let tile = &mut self.grid[idx];
            tile.visual = (pos.x as f32, pos.y as f32);
            tile.velocity = (0.0, 0.0);
            tile.falling = false;
            tile.just_landed = true;
            landed.push(pos);
        }
    }

    /// Whether the top row of the column can take a refill spawn.
    pub(crate) fn needs_refill(&self, column: usize) -> bool {
        let top = Pos::new(column as i32, 0);
        self.tile(&top).map_or(false, |t| t.is_empty() && !t.suspended)
    }

    /// Materializes a fresh tile above the board in the given column; it
    /// falls in under normal gravity.
    pub(crate) fn spawn_tile(&mut self, column: usize, kind: TileKind) -> Pos {
        let top = Pos::new(column as i32, 0);
        debug_assert!(self.needs_refill(column), "refill into occupied column {column}");

        let id = self.fresh_tile_id();
        let idx = self.idx(&top);
        self.grid[idx] = super::Tile {
            id,
            kind,
            visual: (column as f32, -1.0),
            falling: true,
            ..super::Tile::empty()
        };
        top
    }

    /// Clears the one-tick landing flags; the engine calls this at the top of
    /// every tick.
    pub(crate) fn clear_landing_flags(&mut self) {
        for tile in &mut self.grid {
            tile.just_landed = false;
        }
    }
}
