pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod launcher;
pub mod logging;
pub mod renderer;
pub mod terminal;
pub mod theme;
