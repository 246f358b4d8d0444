pub mod aim;
pub mod assets;
pub mod camera;
pub mod follower;
pub mod game;
pub mod hud;
pub mod shoot;
pub mod targeting;
pub mod turret;

// Re-export commonly used items
pub use game::GamePlugin;
