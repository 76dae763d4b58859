
use regex::Regex;

use crate::match_three::board::{CoverKind, GroundKind};
use crate::match_three::consts::{BombKind, TileKind, MAX_OBJECTIVES};
use crate::match_three::level::{LevelConfig, Objective, ObjectiveLayer};
use crate::utils::prelude::*;

/// A parsed level string. Segments are semicolon-separated:
///
/// `WxH` `;` `tiles=ROW,ROW,...` [`;colours=N`] [`;moves=N`]
/// [`;covers=ROW,...`] [`;grounds=ROW,...`] [`;obj=layer:elem:target,...`]
///
/// Tile rows are kind characters with optional bomb suffixes (`R- G B|`),
/// cover/ground rows are kind characters with optional hp digits (`c2`).
/// Parsing is syntactic only; semantic checks live in
/// [LevelConfig::validate].
#[derive(Clone, Debug)]
pub struct LevelString {
    pub repr: String,
    pub level: LevelConfig,
}

impl std::str::FromStr for LevelString {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut segments = s.split(';').map(str::trim);

        let header = segments.next().filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow!("level string cannot be empty"))?;
        let pattern = Regex::new("^(?<w>[0-9]+)x(?<h>[0-9]+)$")?;
        let Some(captures) = pattern.captures(header) else {
            return Err(anyhow!("could not parse level header {header}"));
        };
        let width = captures.name("w").unwrap().as_str().parse::<usize>()?;
        let height = captures.name("h").unwrap().as_str().parse::<usize>()?;

        let mut level = LevelConfig::blank(width, height);

        for segment in segments {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(anyhow!("unrecognized level segment {segment}"));
            };
            match key {
                "tiles" => parse_tile_rows(&mut level, value)?,
                "covers" => parse_cover_rows(&mut level, value)?,
                "grounds" => parse_ground_rows(&mut level, value)?,
                "colours" => level.tile_type_count = value.parse::<usize>()?,
                "moves" => level.move_limit = value.parse::<u16>()?,
                "obj" => parse_objectives(&mut level, value)?,
                _ => return Err(anyhow!("unrecognized level segment key {key}")),
            }
        }

        level.validate()?;
        Ok(LevelString { repr: s.to_owned(), level })
    }
}

fn rows_of<'v>(level: &LevelConfig, value: &'v str) -> Result<Vec<&'v str>> {
    let rows: Vec<&str> = value.split(',').map(str::trim).collect();
    if rows.len() != level.height {
        return Err(anyhow!("expected {} rows, received {}", level.height, rows.len()));
    }
    Ok(rows)
}

fn parse_tile_rows(level: &mut LevelConfig, value: &str) -> Result<()> {
    for (y, row) in rows_of(level, value)?.into_iter().enumerate() {
        let mut chars = row.chars().filter(|c| !c.is_whitespace()).peekable();
        for x in 0..level.width {
            let kind_char =
                chars.next().ok_or_else(|| anyhow!("tile row {y} is too short"))?;
            let cell = level.cell_mut(x, y);
            cell.kind = TileKind::parse(kind_char)?;
            if let Some(&suffix) = chars.peek() {
                if let Ok(bomb) = BombKind::parse(suffix) {
                    cell.bomb = bomb;
                    chars.next();
                }
            }
        }
        if chars.next().is_some() {
            return Err(anyhow!("tile row {y} is too long"));
        }
    }
    Ok(())
}

fn parse_cover_rows(level: &mut LevelConfig, value: &str) -> Result<()> {
    for (y, row) in rows_of(level, value)?.into_iter().enumerate() {
        let mut chars = row.chars().filter(|c| !c.is_whitespace()).peekable();
        for x in 0..level.width {
            let kind_char =
                chars.next().ok_or_else(|| anyhow!("cover row {y} is too short"))?;
            let kind = CoverKind::parse(kind_char)?;
            let hp = take_hp(&mut chars);
            let cell = level.cell_mut(x, y);
            cell.cover = kind;
            cell.cover_hp = if kind == CoverKind::None { 0 } else { hp };
        }
    }
    Ok(())
}

fn parse_ground_rows(level: &mut LevelConfig, value: &str) -> Result<()> {
    for (y, row) in rows_of(level, value)?.into_iter().enumerate() {
        let mut chars = row.chars().filter(|c| !c.is_whitespace()).peekable();
        for x in 0..level.width {
            let kind_char =
                chars.next().ok_or_else(|| anyhow!("ground row {y} is too short"))?;
            let kind = GroundKind::parse(kind_char)?;
            let hp = take_hp(&mut chars);
            let cell = level.cell_mut(x, y);
            cell.ground = kind;
            cell.ground_hp = if kind == GroundKind::None { 0 } else { hp };
        }
    }
    Ok(())
}

/// Optional single-digit hp suffix, defaulting to 1.
fn take_hp<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> u8 {
    match chars.peek().and_then(|c| c.to_digit(10)) {
        Some(d) => {
            chars.next();
            d as u8
        }
        None => 1,
    }
}

fn parse_objectives(level: &mut LevelConfig, value: &str) -> Result<()> {
    for (i, spec) in value.split(',').map(str::trim).enumerate() {
        if i >= MAX_OBJECTIVES {
            return Err(anyhow!("a level carries at most {MAX_OBJECTIVES} objectives"));
        }
        let parts: Vec<&str> = spec.split(':').collect();
        let &[layer, element, target] = parts.as_slice() else {
            return Err(anyhow!("could not parse objective {spec}"));
        };

        let layer = ObjectiveLayer::parse(layer)?;
        let element_char = element
            .chars()
            .next()
            .ok_or_else(|| anyhow!("objective {spec} names no element"))?;
        let element = match layer {
            ObjectiveLayer::Tile => TileKind::parse(element_char)? as i32,
            ObjectiveLayer::Cover => CoverKind::parse(element_char)? as i32,
            ObjectiveLayer::Ground => GroundKind::parse(element_char)? as i32,
        };
        level.objectives[i] =
            Objective { layer, element, target: target.parse::<u16>()?, current: 0 };
    }
    Ok(())
}

impl LevelString {
    /// Canonical notation for a config; parses back to an equal level.
    pub fn from_level(level: &LevelConfig) -> LevelString {
        let mut segments = vec![format!("{}x{}", level.width, level.height)];

        let tiles = (0..level.height)
            .map(|y| {
                (0..level.width)
                    .map(|x| {
                        let cell = level.cell(x, y);
                        match cell.bomb.notate() {
                            Some(b) => format!("{}{}", cell.kind.notate(), b),
                            None => cell.kind.notate().to_string(),
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(",");
        segments.push(format!("tiles={tiles}"));

        if level.tile_type_count != crate::match_three::consts::REGULAR_COLOURS {
            segments.push(format!("colours={}", level.tile_type_count));
        }
        if level.move_limit != u16::MAX {
            segments.push(format!("moves={}", level.move_limit));
        }

        if level.cells.iter().any(|c| c.cover != CoverKind::None) {
            let covers = (0..level.height)
                .map(|y| {
                    (0..level.width)
                        .map(|x| {
                            let cell = level.cell(x, y);
                            match cell.cover {
                                CoverKind::None => ".".to_string(),
                                kind => format!("{}{}", kind.notate(), cell.cover_hp),
                            }
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(",");
            segments.push(format!("covers={covers}"));
        }

        if level.cells.iter().any(|c| c.ground != GroundKind::None) {
            let grounds = (0..level.height)
                .map(|y| {
                    (0..level.width)
                        .map(|x| {
                            let cell = level.cell(x, y);
                            match cell.ground {
                                GroundKind::None => ".".to_string(),
                                kind => format!("{}{}", kind.notate(), cell.ground_hp),
                            }
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(",");
            segments.push(format!("grounds={grounds}"));
        }

        let objectives: Vec<String> = level
            .objectives
            .iter()
            .filter(|o| o.is_active())
            .map(|o| {
                let element = match o.layer {
                    ObjectiveLayer::Tile => TileKind::from(o.element as u8).notate(),
                    ObjectiveLayer::Cover => match o.element {
                        1 => 'c',
                        2 => 'n',
                        3 => 'b',
                        _ => '.',
                    },
                    ObjectiveLayer::Ground => match o.element {
                        1 => 'i',
                        _ => '.',
                    },
                };
                format!("{}:{}:{}", o.layer.notate(), element, o.target)
            })
            .collect();
        if !objectives.is_empty() {
            segments.push(format!("obj={}", objectives.join(",")));
        }

        LevelString { repr: segments.join(";"), level: level.clone() }
    }
}

impl std::fmt::Display for LevelString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_board() {
        let parsed: LevelString = "3x2;tiles=RGB,BGR".parse().unwrap();
        let level = &parsed.level;
        assert_eq!(level.width, 3);
        assert_eq!(level.height, 2);
        assert_eq!(level.cell(0, 0).kind, TileKind::Red);
        assert_eq!(level.cell(2, 1).kind, TileKind::Red);
        assert_eq!(level.move_limit, u16::MAX);
    }

    #[test]
    fn parses_bomb_suffixes() {
        let parsed: LevelString = "3x1;tiles=R-G|B@".parse().unwrap();
        assert_eq!(parsed.level.cell(0, 0).bomb, BombKind::HorizontalRocket);
        assert_eq!(parsed.level.cell(1, 0).bomb, BombKind::VerticalRocket);
        assert_eq!(parsed.level.cell(2, 0).bomb, BombKind::AreaBomb);
    }

    #[test]
    fn parses_overlays_and_objectives() {
        let parsed: LevelString =
            "2x2;tiles=RG,BY;covers=c2.,.b;grounds=i1.,..;moves=12;obj=tile:R:5,cover:c:1"
                .parse()
                .unwrap();
        let level = &parsed.level;

        assert_eq!(level.cell(0, 0).cover, CoverKind::Cage);
        assert_eq!(level.cell(0, 0).cover_hp, 2);
        assert_eq!(level.cell(1, 1).cover, CoverKind::Bubble);
        assert_eq!(level.cell(1, 1).cover_hp, 1);
        assert_eq!(level.cell(0, 0).ground, GroundKind::Ice);
        assert_eq!(level.move_limit, 12);
        assert_eq!(level.objectives[0].layer, ObjectiveLayer::Tile);
        assert_eq!(level.objectives[0].element, TileKind::Red as i32);
        assert_eq!(level.objectives[0].target, 5);
        assert_eq!(level.objectives[1].layer, ObjectiveLayer::Cover);
        assert!(!level.objectives[2].is_active());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("".parse::<LevelString>().is_err());
        assert!("3by3".parse::<LevelString>().is_err());
        assert!("3x1;tiles=RG".parse::<LevelString>().is_err());
        assert!("3x1;tiles=RGBB".parse::<LevelString>().is_err());
        assert!("3x1;tiles=RGB;frobnicate=1".parse::<LevelString>().is_err());
    }

    #[test]
    fn notation_round_trips() {
        let source = "4x2;tiles=RGB*,Y-POR;moves=30;obj=tile:G:8";
        let parsed: LevelString = source.parse().unwrap();
        let rendered = LevelString::from_level(&parsed.level);
        let reparsed: LevelString = rendered.repr.parse().unwrap();

        assert_eq!(reparsed.level.cells, parsed.level.cells);
        assert_eq!(reparsed.level.move_limit, parsed.level.move_limit);
        assert_eq!(reparsed.level.objectives, parsed.level.objectives);
    }
}
