//! Tile map, player position and camera.

use crate::core::constants::{MAP_HEIGHT, MAP_WIDTH, PLAYER_MOVE_COOLDOWN_MS, PLAYER_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Path,
    Tree,
    Water,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Grass | Tile::Path)
    }

    /// Tall grass is where wild encounters happen.
    pub fn is_encounter(self) -> bool {
        matches!(self, Tile::Grass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Sampling order when several directions are held at once.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorldMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl WorldMap {
    /// A map filled with a single tile.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    /// The starting meadow: a tree border, a pond, a dirt path and two
    /// patches of tall grass.
    pub fn meadow(width: usize, height: usize) -> Self {
        let mut map = Self::filled(width, height, Tile::Path);

        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                if border {
                    map.set(x, y, Tile::Tree);
                }
            }
        }

        // Tall grass patches: north-east and south-west of the path
        for y in 2..(height / 2).max(2) {
            for x in (width / 2)..width.saturating_sub(3) {
                map.set(x, y, Tile::Grass);
            }
        }
        for y in (height / 2 + 2)..height.saturating_sub(2) {
            for x in 2..(width / 3).max(2) {
                map.set(x, y, Tile::Grass);
            }
        }

        // Pond in the south-east
        for y in (height * 2 / 3)..height.saturating_sub(2) {
            for x in (width * 2 / 3)..width.saturating_sub(3) {
                map.set(x, y, Tile::Water);
            }
        }

        // A few trees scattered along the path
        for &(x, y) in &[(8, 3), (9, 3), (12, 9), (20, 12), (6, 9)] {
            if x + 1 < width && y + 1 < height {
                map.set(x, y, Tile::Tree);
            }
        }

        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-bounds coordinates read as `None`.
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(Tile::is_walkable)
    }

    pub fn is_encounter_tile(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(Tile::is_encounter)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    pub last_move_ms: u64,
    pub move_cooldown_ms: u64,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            facing: Direction::Down,
            last_move_ms: 0,
            move_cooldown_ms: PLAYER_MOVE_COOLDOWN_MS,
        }
    }

    pub fn can_move(&self, now_ms: u64) -> bool {
        crate::core::clock::cooldown_elapsed(self.last_move_ms, now_ms, self.move_cooldown_ms)
    }
}

/// Everything the World mode walks around in.
#[derive(Debug, Clone)]
pub struct Overworld {
    pub map: WorldMap,
    pub player: Player,
}

impl Overworld {
    pub fn new(map: WorldMap, player: Player) -> Self {
        Self { map, player }
    }

    /// Top-left map cell of a `view_w` x `view_h` window centred on the
    /// player and clamped to the map edges.
    pub fn camera_origin(&self, view_w: usize, view_h: usize) -> (usize, usize) {
        fn axis(center: i32, view: usize, size: usize) -> usize {
            if size <= view {
                return 0;
            }
            let half = (view / 2) as i32;
            let max = (size - view) as i32;
            (center - half).clamp(0, max) as usize
        }
        (
            axis(self.player.x, view_w, self.map.width()),
            axis(self.player.y, view_h, self.map.height()),
        )
    }
}

impl Default for Overworld {
    fn default() -> Self {
        let (x, y) = PLAYER_START;
        Self::new(
            WorldMap::meadow(MAP_WIDTH, MAP_HEIGHT),
            Player::new(x as i32, y as i32),
        )
    }
}
