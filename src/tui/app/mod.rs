mod animation;
mod state;

pub use animation::ReelAnimation;
pub use state::{AppState, InputAction, StatsTab};
