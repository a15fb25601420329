// Single-player Battleship engine

pub mod battlefield;
pub mod generator;
pub mod manager;
pub mod session;

pub use battlefield::{Battlefield, LayoutError, Orientation, Ship};
pub use manager::GameSessionManager;
pub use session::{GameSession, PlayerModel};
