use crate::utils::prelude::*;

/// Fixed-step integration interval used by the engine tick.
pub const TICK_DT: f32 = 1.0 / 60.0;

/// Seconds a committed swap animates before the board is re-examined.
pub const SWAP_DURATION: f32 = 0.2;

/// Seconds between consecutive explosion waves.
pub const WAVE_INTERVAL: f32 = 0.1;

/// Downward acceleration applied to falling tiles, in cells per second squared.
pub const GRAVITY: f32 = 30.0;

/// Terminal velocity for falling tiles, in cells per second.
pub const MAX_FALL_SPEED: f32 = 12.0;

/// Number of regular (matchable) colours in the palette.
pub const REGULAR_COLOURS: usize = 6;

/// A level carries at most this many objectives.
pub const MAX_OBJECTIVES: usize = 4;

/// Tick budget for `run_until_stable`; exceeding it reports non-convergence.
pub const SETTLE_TICK_BUDGET: u64 = 100_000;

// A cell's colour typing. Enumeration order is the deterministic tie-break
// order everywhere a "most populous colour" question arises.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    None = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
    Yellow = 4,
    Purple = 5,
    Orange = 6,
    Rainbow = 7,
    Bomb = 8,
}

/// The matchable palette, in tie-break order.
pub const PALETTE: [TileKind; REGULAR_COLOURS] = [
    TileKind::Red,
    TileKind::Green,
    TileKind::Blue,
    TileKind::Yellow,
    TileKind::Purple,
    TileKind::Orange,
];

impl TileKind {
    /// The matchable palette, in tie-break order.
    pub fn palette() -> [TileKind; REGULAR_COLOURS] {
        PALETTE
    }

    /// Whether the kind is one of the six ordinary colours.
    pub fn is_regular(&self) -> bool {
        matches!(
            self,
            TileKind::Red
                | TileKind::Green
                | TileKind::Blue
                | TileKind::Yellow
                | TileKind::Purple
                | TileKind::Orange
        )
    }

    /// Notates the kind as a single board character.
    pub fn notate(&self) -> char {
        match self {
            TileKind::None => '.',
            TileKind::Red => 'R',
            TileKind::Green => 'G',
            TileKind::Blue => 'B',
            TileKind::Yellow => 'Y',
            TileKind::Purple => 'P',
            TileKind::Orange => 'O',
            TileKind::Rainbow => '*',
            TileKind::Bomb => '^',
        }
    }

    /// Parses a board character into a kind.
    pub fn parse(c: char) -> Result<TileKind> {
        match c {
            '.' | '_' => Ok(TileKind::None),
            'R' | 'r' => Ok(TileKind::Red),
            'G' | 'g' => Ok(TileKind::Green),
            'B' | 'b' => Ok(TileKind::Blue),
            'Y' | 'y' => Ok(TileKind::Yellow),
            'P' | 'p' => Ok(TileKind::Purple),
            'O' | 'o' => Ok(TileKind::Orange),
            '*' => Ok(TileKind::Rainbow),
            '^' => Ok(TileKind::Bomb),
            _ => Err(anyhow!("invalid notation {c} for TileKind")),
        }
    }
}

impl From<u8> for TileKind {
    fn from(value: u8) -> Self {
        match value {
            0 => TileKind::None,
            1 => TileKind::Red,
            2 => TileKind::Green,
            3 => TileKind::Blue,
            4 => TileKind::Yellow,
            5 => TileKind::Purple,
            6 => TileKind::Orange,
            7 => TileKind::Rainbow,
            8 => TileKind::Bomb,
            _ => panic!("expected TileKind of 0-8, received {value}"),
        }
    }
}

// A bomb decoration on a tile. A cell has both a TileKind and a BombKind.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BombKind {
    None = 0,
    HorizontalRocket = 1,
    VerticalRocket = 2,
    AreaBomb = 3,
    ColorBomb = 4,
    Ufo = 5,
}

impl BombKind {
    /// All live bomb kinds, in enumeration order.
    pub fn all() -> [BombKind; 5] {
        [
            BombKind::HorizontalRocket,
            BombKind::VerticalRocket,
            BombKind::AreaBomb,
            BombKind::ColorBomb,
            BombKind::Ufo,
        ]
    }

    pub fn is_rocket(&self) -> bool {
        matches!(self, BombKind::HorizontalRocket | BombKind::VerticalRocket)
    }

    /// Planner tie-break priority; higher wins between equal weights.
    pub fn priority(&self) -> u8 {
        match self {
            BombKind::ColorBomb => 4,
            BombKind::AreaBomb => 3,
            BombKind::HorizontalRocket | BombKind::VerticalRocket => 2,
            BombKind::Ufo => 1,
            BombKind::None => 0,
        }
    }

    /// Notates the decoration as a single suffix character.
    pub fn notate(&self) -> Option<char> {
        match self {
            BombKind::None => None,
            BombKind::HorizontalRocket => Some('-'),
            BombKind::VerticalRocket => Some('|'),
            BombKind::AreaBomb => Some('@'),
            BombKind::ColorBomb => Some('#'),
            BombKind::Ufo => Some('u'),
        }
    }

    /// Parses a decoration suffix character.
    pub fn parse(c: char) -> Result<BombKind> {
        match c {
            '-' => Ok(BombKind::HorizontalRocket),
            '|' => Ok(BombKind::VerticalRocket),
            '@' => Ok(BombKind::AreaBomb),
            '#' => Ok(BombKind::ColorBomb),
            'u' => Ok(BombKind::Ufo),
            _ => Err(anyhow!("invalid notation {c} for BombKind")),
        }
    }
}

impl From<u8> for BombKind {
    fn from(value: u8) -> Self {
        match value {
            0 => BombKind::None,
            1 => BombKind::HorizontalRocket,
            2 => BombKind::VerticalRocket,
            3 => BombKind::AreaBomb,
            4 => BombKind::ColorBomb,
            5 => BombKind::Ufo,
            _ => panic!("expected BombKind of 0-5, received {value}"),
        }
    }
}
