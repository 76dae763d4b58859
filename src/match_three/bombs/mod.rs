pub mod combos;
pub mod effects;

pub use combos::{combo_result, ComboResult};
pub use effects::affected_cells;
