//! slots-rs: terminal slot machine
//!
//! Goals:
//! - Deterministic spins when seeded; scripted reels for exact outcomes
//! - Game state that only spins, bet changes and mode changes can mutate
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: force a spin
//! ```
//! use slots_rs::game::{BetLimits, GameState};
//! use slots_rs::reel::ScriptedReel;
//! use slots_rs::spin::SpinEngine;
//! use slots_rs::symbols::{SymbolId, SymbolTable};
//!
//! let reels = ScriptedReel::repeat(SymbolId::Star);
//! let mut engine = SpinEngine::new(SymbolTable::classic(), reels, 3);
//! let mut state = GameState::new(100, 10, BetLimits::default());
//!
//! let result = engine.spin(10, &mut state).unwrap();
//! assert_eq!(result.payout, 500);
//! assert_eq!(state.balance(), 590);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin slots-rs -- --debug
//! ```

pub mod autospin;
pub mod config;
pub mod engine;
pub mod game;
pub mod logging;
pub mod machine;
pub mod payout;
pub mod persist;
pub mod reel;
pub mod session;
pub mod sound;
pub mod spin;
pub mod stats;
pub mod symbols;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
