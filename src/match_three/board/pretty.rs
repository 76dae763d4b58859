use itertools::Itertools;

use super::GameState;
use crate::match_three::coords::Pos;

impl GameState {
    /// Compact snapshot of the current tiles in level notation; feeding it
    /// back through the level parser reproduces the tile layout.
    pub fn notate(&self) -> String {
        let rows = (0..self.height() as i32)
            .map(|y| {
                (0..self.width() as i32)
                    .map(|x| {
                        let tile = self.tile(&Pos::new(x, y)).expect("in-bounds");
                        match tile.bomb.notate() {
                            Some(b) => format!("{}{}", tile.kind.notate(), b),
                            None => tile.kind.notate().to_string(),
                        }
                    })
                    .collect::<String>()
            })
            .join(",");
        format!("{}x{};tiles={}", self.width(), self.height(), rows)
    }
}

impl std::fmt::Display for GameState {
    /// Renders the grid for diagnostics: one row per line, each cell as its
    /// kind character plus an optional bomb suffix, suspended cells bracketed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let tile = self.tile(&Pos::new(x, y)).expect("in-bounds");
                let kind = tile.kind.notate();
                match (tile.suspended, tile.bomb.notate()) {
                    (true, Some(b)) => write!(f, "[{kind}{b}]")?,
                    (true, None) => write!(f, "[{kind}]")?,
                    (false, Some(b)) => write!(f, " {kind}{b} ")?,
                    (false, None) => write!(f, " {kind}  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
