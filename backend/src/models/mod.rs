pub mod game;

pub use game::{GameModelUi, PreparingModel};
