// Board-level scenarios: bomb spawning from literal layouts, overlay
// behaviour, and objective tracking.
use lib_cascade::match_three::prelude::*;

fn engine_from(source: &str, seed: u64) -> (Engine, SharedCollector) {
    let level = source.parse::<LevelString>().unwrap().level;
    let collector = SharedCollector::new();
    let engine = Engine::new(&level, seed)
        .unwrap()
        .with_collector(Box::new(collector.clone()));
    (engine, collector)
}

fn settle(engine: &mut Engine) {
    for _ in 0..20_000 {
        if engine.is_stable() {
            return;
        }
        engine.tick();
    }
    panic!("engine failed to settle within the test budget");
}

fn spawned_bombs(events: &[Event]) -> Vec<(Pos, BombKind)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::BombCreated { position, kind } => Some((*position, *kind)),
            _ => None,
        })
        .collect()
}

#[test]
fn horizontal_four_line_spawns_a_vertical_rocket() {
    let (mut engine, collector) = engine_from("4x1;tiles=RRRR", 1);
    engine.tick();

    let bombs = spawned_bombs(&collector.events());
    assert_eq!(bombs.len(), 1);
    assert_eq!(bombs[0].1, BombKind::VerticalRocket);

    // Three of the four cells cleared; the origin keeps the rocket.
    let destroyed = collector
        .events()
        .iter()
        .filter(|e| matches!(e, Event::TileDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 3);
}

#[test]
fn five_line_spawns_a_rainbow_carrier() {
    let (mut engine, collector) = engine_from("5x1;tiles=GGGGG", 1);
    engine.tick();

    let bombs = spawned_bombs(&collector.events());
    assert_eq!(bombs.len(), 1);
    let (origin, kind) = bombs[0];
    assert_eq!(kind, BombKind::ColorBomb);
    assert_eq!(engine.state.tile(&origin).unwrap().kind, TileKind::Rainbow);
}

#[test]
fn square_spawns_a_ufo() {
    let (mut engine, collector) = engine_from("2x2;tiles=RR,RR", 1);
    engine.tick();

    let bombs = spawned_bombs(&collector.events());
    assert_eq!(bombs.len(), 1);
    assert_eq!(bombs[0].1, BombKind::Ufo);
}

#[test]
fn three_by_four_block_spawns_three_rockets() {
    let (mut engine, collector) = engine_from("3x4;tiles=RRR,RRR,RRR,RRR", 1);
    engine.tick();

    let events = collector.events();
    let bombs = spawned_bombs(&events);
    assert_eq!(bombs.len(), 3);
    assert!(bombs.iter().all(|(_, kind)| kind.is_rocket()));

    // Twelve cells minus the three origins.
    let destroyed =
        events.iter().filter(|e| matches!(e, Event::TileDestroyed { .. })).count();
    assert_eq!(destroyed, 9);
}

#[test]
fn chain_cover_absorbs_the_hit_and_keeps_the_tile() {
    let (mut engine, collector) = engine_from("3x1;tiles=RRR;covers=.n1.", 1);
    engine.tick();

    let events = collector.events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::CoverDestroyed { position: Pos { x: 1, y: 0 }, kind: CoverKind::Chain }
    )));
    // The covered tile survived its own match.
    assert_eq!(engine.state.tile(&Pos::new(1, 0)).unwrap().kind, TileKind::Red);
    assert!(engine.state.tile(&Pos::new(0, 0)).unwrap().is_empty());
}

#[test]
fn cage_blocks_matching_entirely() {
    let (mut engine, _) = engine_from("3x1;tiles=RRR;covers=.c1.", 1);
    // The caged middle splits the triple; nothing resolves.
    assert!(engine.is_stable());
    engine.tick();
    assert_eq!(engine.state.tile(&Pos::new(0, 0)).unwrap().kind, TileKind::Red);
}

#[test]
fn ground_damage_reports_remaining_hp() {
    let (mut engine, collector) = engine_from("3x1;tiles=RRR;grounds=i2..", 1);
    engine.tick();

    let events = collector.events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::GroundDamaged {
            position: Pos { x: 0, y: 0 },
            kind: GroundKind::Ice,
            remaining_hp: 1
        }
    )));
    assert_eq!(engine.state.ground_at(&Pos::new(0, 0)).unwrap().hp, 1);
}

#[test]
fn objectives_progress_and_complete() {
    let (mut engine, collector) = engine_from("3x1;tiles=RRR;colours=2;obj=tile:R:3", 1);
    settle(&mut engine);

    let events = collector.events();
    let completions =
        events.iter().filter(|e| matches!(e, Event::LevelCompleted)).count();
    assert_eq!(completions, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ObjectiveProgress { index: 0, current: 3 })));
    assert!(engine.level_complete());
}

#[test]
fn score_accumulates_and_never_drops_below_zero() {
    let (mut engine, collector) = engine_from("3x1;tiles=RRR", 1);
    engine.tick();

    assert!(engine.state.score > 0);
    let total: i64 = collector
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::ScoreChanged { delta } => Some(*delta as i64),
            _ => None,
        })
        .sum();
    assert_eq!(total, engine.state.score);
}

#[test]
fn swept_bombs_chain_wave_by_wave() {
    let (mut engine, collector) = engine_from("5x1;tiles=RGRGR", 1);
    engine.state.tile_mut(&Pos::new(0, 0)).unwrap().bomb = BombKind::HorizontalRocket;
    engine.state.tile_mut(&Pos::new(3, 0)).unwrap().bomb = BombKind::VerticalRocket;

    engine.apply_intent(MoveIntent::Tap { position: Pos::new(0, 0) }).unwrap();
    let mut saw_chain = false;
    while engine.explosions_active() > 0 {
        engine.tick();
        saw_chain |= engine.explosions_active() > 1;
    }

    // The first rocket's wave reaches the armed cell and hands it to the
    // activator; its own blast then finishes the lane.
    assert!(saw_chain, "the second rocket must fire as its own explosion");
    let destroyed = collector
        .events()
        .iter()
        .filter(|e| matches!(e, Event::TileDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 5);
    assert!(engine.state.tile(&Pos::new(3, 0)).unwrap().is_empty());
}

#[test]
fn bubble_rides_the_swap() {
    let (mut engine, _) = engine_from("4x4;tiles=RGRG,GRGR,RGRG,GRGR;covers=....,.b1..,....,....", 1);
    assert_eq!(engine.state.cover_at(&Pos::new(1, 1)).unwrap().kind, CoverKind::Bubble);

    engine.apply_move(&Pos::new(1, 1), &Pos::new(2, 1)).unwrap();
    // The bubble follows its tile to the new cell immediately.
    assert_eq!(engine.state.cover_at(&Pos::new(2, 1)).unwrap().kind, CoverKind::Bubble);
    assert!(engine.state.cover_at(&Pos::new(1, 1)).unwrap().is_none());
}
