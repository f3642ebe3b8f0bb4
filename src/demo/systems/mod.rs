mod collision;
mod enemy_movement;
mod movement;
mod projectile;
mod tower_fire;
mod wave;

pub use collision::CollisionSystem;
pub use enemy_movement::EnemyMovementSystem;
pub use movement::MovementSystem;
pub use projectile::{aim, ProjectileSystem};
pub use tower_fire::TowerFireSystem;
pub use wave::WaveSystem;
