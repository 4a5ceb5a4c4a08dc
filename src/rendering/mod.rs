//! # Rendering Module
//!
//! Plain-text views of a level for the terminal front end.

pub mod display;

pub use display::*;

use crate::game::{LevelState, MonsterKind};

/// Draws the level as one line of glyphs per grid row.
///
/// Entities are drawn over cells: the player as `@`, normal monsters as `m` and
/// fast monsters as `F`. The player wins over a monster on the same cell, which
/// only happens in hand-built levels.
///
/// # Examples
///
/// ```
/// use delve::{render_ascii, CellKind, Grid, LevelState, Player, Position};
///
/// let mut grid = Grid::new(3, 4, CellKind::Wall);
/// grid.set(Position::new(1, 1), CellKind::Floor).unwrap();
/// let player = Player::new("Hero", Position::new(1, 1));
/// let level = LevelState::new(grid, player, vec![], vec![], Position::new(2, 1)).unwrap();
///
/// assert_eq!(render_ascii(&level), "####\n#@>#\n####\n");
/// ```
pub fn render_ascii(level: &LevelState) -> String {
    let grid = level.grid();
    let mut canvas: Vec<Vec<char>> = (0..grid.rows())
        .map(|_| Vec::with_capacity(grid.cols()))
        .collect();
    for pos in grid.positions() {
        if let Some(kind) = grid.get(pos) {
            canvas[pos.y as usize].push(kind.glyph());
        }
    }

    let mut stamp = |x: i32, y: i32, glyph: char| {
        if let Some(cell) = canvas
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = glyph;
        }
    };
    for monster in level.monsters() {
        let glyph = match monster.kind {
            MonsterKind::Normal => 'm',
            MonsterKind::Fast => 'F',
        };
        stamp(monster.position.x, monster.position.y, glyph);
    }
    let player = level.player().position;
    stamp(player.x, player.y, '@');

    canvas
        .into_iter()
        .map(|row| row.into_iter().chain(std::iter::once('\n')).collect::<String>())
        .collect()
}

/// One-line summary of the player's state.
pub fn status_line(level: &LevelState, level_number: u32) -> String {
    let player = level.player();
    let item = player
        .inventory
        .special_item()
        .map(|item| item.name())
        .unwrap_or("none");
    format!(
        "Level {} | {} | HP {} | ATK {} | Gold {} | Item: {} | Monsters left: {}",
        level_number,
        player.name,
        player.health,
        player.attack,
        player.gold(),
        item,
        level.monsters().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellKind, Chest, Grid, Item, Monster, Player, Position};

    fn sample_level() -> LevelState {
        let mut grid = Grid::new(4, 6, CellKind::Floor);
        grid.set(Position::new(0, 0), CellKind::Wall).unwrap();
        grid.set(Position::new(5, 0), CellKind::Door).unwrap();
        let monsters = vec![
            Monster::new(MonsterKind::Normal, Position::new(2, 2)),
            Monster::new(MonsterKind::Fast, Position::new(3, 2)),
        ];
        let chests = vec![Chest::new(Position::new(4, 3), 5)];
        let player = Player::new("Hero", Position::new(1, 1));
        LevelState::new(grid, player, monsters, chests, Position::new(5, 3)).unwrap()
    }

    #[test]
    fn test_render_all_glyphs() {
        let expected = "#....+\n.@....\n..mF..\n....$>\n";
        assert_eq!(render_ascii(&sample_level()), expected);
    }

    #[test]
    fn test_status_line() {
        let mut level = sample_level();
        level.player_mut().inventory.add_item(Item::Heal);
        let line = status_line(&level, 3);
        assert!(line.starts_with("Level 3 | Hero | HP 170"));
        assert!(line.contains("Item: Vial of Life"));
        assert!(line.ends_with("Monsters left: 2"));
    }
}
