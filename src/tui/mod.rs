//! Terminal UI: app state, rendering and the input/tick loop.

pub mod app;
pub mod controller;
pub mod ui;
