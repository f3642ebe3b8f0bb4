use crate::ecs::{Component, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Component for Position {}

/// Units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Component for Velocity {}

/// Axis-aligned box centred on the entity's `Position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Touching edges count as overlap.
    pub fn overlaps(self, at: Position, other: BoundingBox, other_at: Position) -> bool {
        (at.x - other_at.x).abs() <= (self.width + other.width) / 2.0
            && (at.y - other_at.y).abs() <= (self.height + other.height) / 2.0
    }
}

impl Component for BoundingBox {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

impl Component for Health {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    /// Health the player loses when this kind leaks past the last waypoint.
    pub fn player_damage(self) -> f64 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Fast => 2.0,
            EnemyKind::Tank => 3.0,
        }
    }

    pub fn speed(self) -> f64 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Fast => 2.0,
            EnemyKind::Tank => 0.6,
        }
    }

    pub fn max_health(self) -> f64 {
        match self {
            EnemyKind::Basic => 10.0,
            EnemyKind::Fast => 6.0,
            EnemyKind::Tank => 30.0,
        }
    }

    pub fn reward(self) -> f64 {
        match self {
            EnemyKind::Basic => 10.0,
            EnemyKind::Fast => 15.0,
            EnemyKind::Tank => 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub speed: f64,
    pub reward: f64,
}

impl Enemy {
    pub fn of_kind(kind: EnemyKind) -> Self {
        Self {
            kind,
            speed: kind.speed(),
            reward: kind.reward(),
        }
    }
}

impl Component for Enemy {}

/// Fires at the nearest enemy in range once its cooldown has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tower {
    pub damage: f64,
    pub range: f64,
    pub cooldown: f64,
    /// Seconds since the last shot, capped at `cooldown` while idle.
    pub charge: f64,
}

impl Tower {
    pub fn new(damage: f64, range: f64, cooldown: f64) -> Self {
        Self {
            damage,
            range,
            cooldown,
            charge: 0.0,
        }
    }
}

impl Component for Tower {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub damage: f64,
    pub speed: f64,
    /// Enemy the projectile homes in on while it is alive.
    pub target: Entity,
    /// Seconds left before the projectile is discarded.
    pub lifetime: f64,
}

impl Component for Projectile {}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub id: String,
    pub waypoints: Vec<Position>,
}

impl Component for Path {}

#[derive(Debug, Clone, PartialEq)]
pub struct PathFollow {
    pub path_id: String,
    pub waypoint_index: usize,
}

impl Component for PathFollow {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

impl Component for Player {}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wallet {
    pub money: f64,
}

impl Component for Wallet {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameState {
    pub game_over: bool,
    pub enemies_spawned: u64,
    pub enemies_killed: u64,
    pub enemies_leaked: u64,
}

impl Component for GameState {}
