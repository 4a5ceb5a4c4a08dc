//! Integration tests for turn resolution scenarios and moving between levels.

use delve::{
    attacks_to_kill, Action, CellKind, DelveResult, Direction, GenerationConfig, Grid, Item,
    LevelState, LevelStatus, Monster, MonsterKind, Player, Position, Run, RunConfig, RunStatus,
    Score,
};

/// A single open row between walls: `width` floor cells at y = 1.
fn corridor(width: i32) -> Grid {
    let mut grid = Grid::new(3, width as usize + 2, CellKind::Wall);
    for x in 1..=width {
        grid.set(Position::new(x, 1), CellKind::Floor)
            .expect("in bounds");
    }
    grid
}

fn run_config(max_levels: u32, seed: u64) -> RunConfig {
    RunConfig {
        max_levels,
        generation: GenerationConfig::for_testing(seed),
    }
}

#[test]
fn test_fast_monster_closes_three_tiles() -> DelveResult<()> {
    let player = Player::new("Hero", Position::new(8, 1));
    let monster = Monster::new(MonsterKind::Fast, Position::new(1, 1));
    let mut level = LevelState::new(corridor(8), player, vec![monster], Vec::new(), Position::new(1, 1))?;

    level.apply_action(Action::Move(Direction::North))?;
    assert_eq!(level.monsters()[0].position, Position::new(4, 1));

    // Four tiles away the full stride stops right next to the player
    level.apply_action(Action::Move(Direction::North))?;
    assert_eq!(level.monsters()[0].position, Position::new(7, 1));
    assert_eq!(level.player().health, 170);

    level.apply_action(Action::Move(Direction::North))?;
    assert_eq!(level.player().health, 150);

    Ok(())
}

#[test]
fn test_wall_breaker_frees_walled_in_player() -> DelveResult<()> {
    let mut grid = Grid::new(5, 5, CellKind::Wall);
    grid.set(Position::new(2, 2), CellKind::Floor)?;
    let mut player = Player::new("Mole", Position::new(2, 2));
    player.inventory.add_item(Item::WallBreak);
    let mut level = LevelState::new(grid, player, Vec::new(), Vec::new(), Position::new(3, 3))?;

    let outcome = level.apply_action(Action::UseSpecialItem)?;

    assert!(outcome.turn_consumed);
    for pos in Position::new(2, 2).cardinal_adjacent_positions() {
        assert_eq!(level.grid().get(pos), Some(CellKind::Floor));
    }
    assert!(level.player().inventory.special_item().is_none());

    level.apply_action(Action::Move(Direction::East))?;
    assert_eq!(level.player().position, Position::new(3, 2));
    Ok(())
}

#[test]
fn test_lightning_clears_level_and_pays() -> DelveResult<()> {
    let monsters = vec![
        Monster::new(MonsterKind::Normal, Position::new(5, 1)),
        Monster::new(MonsterKind::Normal, Position::new(6, 1)),
        Monster::new(MonsterKind::Fast, Position::new(7, 1)),
    ];
    let mut player = Player::new("Zeus", Position::new(1, 1));
    player.inventory.add_item(Item::MassKill);
    let mut level = LevelState::new(corridor(8), player, monsters, Vec::new(), Position::new(2, 1))?;

    level.apply_action(Action::UseSpecialItem)?;
    assert!(level.monsters().is_empty());
    assert_eq!(level.player().gold(), 30);

    let outcome = level.apply_action(Action::Move(Direction::East))?;
    assert_eq!(outcome.status, LevelStatus::Cleared);
    Ok(())
}

#[test]
fn test_kills_take_ceiling_of_health_over_attack() -> DelveResult<()> {
    for kind in [MonsterKind::Normal, MonsterKind::Fast] {
        let monster = Monster::new(kind, Position::new(2, 1));
        let expected = attacks_to_kill(monster.health, 10);
        let player = Player::new("Hero", Position::new(1, 1));
        let mut level = LevelState::new(corridor(4), player, vec![monster], Vec::new(), Position::new(4, 1))?;

        let mut swings = 0;
        while !level.monsters().is_empty() {
            level.apply_action(Action::MeleeAttack)?;
            swings += 1;
        }
        assert_eq!(swings, expected);
        assert_eq!(level.player().gold(), 10);
    }
    Ok(())
}

#[test]
fn test_heal_beyond_starting_health() -> DelveResult<()> {
    let mut player = Player::with_stats("Medic", Position::new(1, 1), 20, 0);
    player.inventory.add_item(Item::Heal);
    let mut level = LevelState::new(corridor(4), player, Vec::new(), Vec::new(), Position::new(4, 1))?;

    level.apply_action(Action::UseSpecialItem)?;
    assert_eq!(level.player().health, 120);
    Ok(())
}

#[tokio::test]
async fn test_player_carries_over_between_levels() -> DelveResult<()> {
    let mut player = Player::with_stats("Walker", Position::new(3, 1), 100, 25);
    player.inventory.add_item(Item::Heal);
    let level = LevelState::new(corridor(4), player, Vec::new(), Vec::new(), Position::new(4, 1))?;
    let mut run = Run::resume(run_config(5, 77), level, 2, Vec::<Score>::new())?;

    let turn = run.submit(Action::Move(Direction::East)).await?;

    assert!(turn.advanced);
    assert_eq!(run.level_number(), 3);
    let player = run.level().player();
    assert_eq!(player.health, 110);
    assert_eq!(player.gold(), 25);
    assert_eq!(player.attack, 10);
    assert!(player.inventory.special_item().is_none());
    assert_eq!(run.level().status(), LevelStatus::InProgress);
    Ok(())
}

#[tokio::test]
async fn test_victory_reports_score_once() -> DelveResult<()> {
    let player = Player::with_stats("Champion", Position::new(3, 1), 90, 321);
    let level = LevelState::new(corridor(4), player, Vec::new(), Vec::new(), Position::new(4, 1))?;
    let mut run = Run::resume(run_config(10, 1), level, 10, Vec::<Score>::new())?;

    let turn = run.submit(Action::Move(Direction::East)).await?;

    assert_eq!(turn.status, RunStatus::Victory);
    assert!(run.submit(Action::Move(Direction::West)).await.is_err());
    assert_eq!(run.into_score_sink(), vec![Score::new("Champion", 321)]);
    Ok(())
}

#[tokio::test]
async fn test_death_beats_clearing() -> DelveResult<()> {
    // Reaching the exit with no health left is still a death
    let player = Player::with_stats("Unlucky", Position::new(3, 1), 0, 4);
    let level = LevelState::new(corridor(4), player, Vec::new(), Vec::new(), Position::new(4, 1))?;
    let mut run = Run::resume(run_config(3, 1), level, 1, Vec::<Score>::new())?;

    let turn = run.submit(Action::Move(Direction::East)).await?;

    assert_eq!(turn.outcome.status, LevelStatus::PlayerDied);
    assert_eq!(run.status(), RunStatus::Defeat);
    assert_eq!(run.final_score(), Some(&Score::new("Unlucky", 4)));
    Ok(())
}
