//! Property tests for generated levels on both the carved and the fallback path.

use delve::utils::{is_connected, path_length};
use delve::{
    fallback_grid, CellKind, GeneratedLevel, GenerationConfig, GenerationPath, LevelGenerator,
    MonsterKind,
};
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn check_level(level: &GeneratedLevel, config: &GenerationConfig) {
    let grid = &level.grid;
    assert_eq!((grid.rows(), grid.cols()), (config.rows, config.cols));

    // Solid border on both paths
    for pos in grid.positions().filter(|&pos| grid.is_border(pos)) {
        assert_eq!(grid.get(pos), Some(CellKind::Wall), "border opened at {}", pos);
    }

    assert_eq!(grid.get(level.player_start), Some(CellKind::Floor));
    assert_eq!(grid.positions_of(CellKind::Exit), vec![level.exit]);
    assert!(level.player_start.manhattan_distance(level.exit) >= config.min_exit_distance);
    assert!(path_length(grid, level.player_start, level.exit).is_some());
    assert!(is_connected(grid));

    assert_eq!(level.chests.len(), 2);
    for chest in &level.chests {
        assert!((1..=50).contains(&chest.gold));
        assert_eq!(grid.get(chest.position), Some(CellKind::Chest));
    }

    let normal = level
        .monster_spawns
        .iter()
        .filter(|(kind, _)| *kind == MonsterKind::Normal)
        .count();
    assert_eq!(normal, 3);
    assert_eq!(level.monster_spawns.len(), 5);
    for &(_, pos) in &level.monster_spawns {
        assert!(grid.is_walkable(pos));
        assert_ne!(pos, level.player_start);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn generated_levels_are_playable(seed in any::<u64>(), rows in 7usize..32, cols in 7usize..32) {
        let config = GenerationConfig::for_testing(seed).with_size(rows, cols);
        let level = LevelGenerator::new(config.clone())
            .expect("valid config")
            .generate_blocking()
            .expect("generation never fails for valid config");
        check_level(&level, &config);
    }

    #[test]
    fn fallback_levels_are_playable(seed in any::<u64>(), rows in 7usize..24, cols in 7usize..24) {
        let mut config = GenerationConfig::for_testing(seed).with_size(rows, cols);
        config.time_budget = Duration::ZERO;
        config.max_attempts = 1;

        let level = LevelGenerator::new(config.clone())
            .expect("valid config")
            .generate_blocking()
            .expect("fallback never fails");
        if level.path == GenerationPath::Fallback {
            prop_assert_eq!(level.player_start.x, 1);
            prop_assert_eq!(level.exit.x as usize, cols - 2);
            prop_assert_eq!(level.exit.y as usize, rows - 2);
        }
        check_level(&level, &config);
    }

    #[test]
    fn fallback_grid_is_idempotent(rows in 7usize..40, cols in 7usize..40) {
        let grid = fallback_grid(rows, cols);
        prop_assert_eq!(&grid, &fallback_grid(rows, cols));
        prop_assert_eq!(grid.count(CellKind::Floor), (rows - 2) * (cols - 2));
    }
}

#[test]
fn test_seeded_levels_are_reproducible() {
    let generate = || {
        LevelGenerator::new(GenerationConfig::for_testing(31337))
            .expect("valid config")
            .generate_blocking()
            .expect("generation succeeds")
    };
    let first = generate();
    let second = generate();

    assert_eq!(first.grid, second.grid);
    assert_eq!(first.player_start, second.player_start);
    assert_eq!(first.exit, second.exit);
    assert_eq!(first.chests, second.chests);
    assert_eq!(first.monster_spawns, second.monster_spawns);
}

#[test]
fn test_generation_performance() {
    let start = Instant::now();
    for seed in 0..20 {
        let level = LevelGenerator::new(GenerationConfig::for_testing(seed))
            .expect("valid config")
            .generate_blocking()
            .expect("generation succeeds");
        assert!(matches!(level.path, GenerationPath::Carved { .. }));
    }
    let elapsed = start.elapsed();

    println!("Generated 20 levels in {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "generation took {:?}", elapsed);
}

#[test]
fn test_large_level_fits_default_budget() {
    let config = GenerationConfig::new(400).with_size(400, 400);
    let budget = config.time_budget;
    assert!(config.ensure_connectivity);

    let start = Instant::now();
    let level = LevelGenerator::new(config)
        .expect("valid config")
        .generate_blocking()
        .expect("generation succeeds");
    let elapsed = start.elapsed();

    println!("Generated a 400x400 level in {:?}", elapsed);
    assert!(matches!(level.path, GenerationPath::Carved { attempt: 1 }));
    assert!(is_connected(&level.grid));
    assert!(path_length(&level.grid, level.player_start, level.exit).is_some());
    assert!(elapsed < budget, "generation took {:?}", elapsed);
}
