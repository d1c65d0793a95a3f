// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dataset;
pub mod error;
pub mod hotkeys;
pub mod journal;
pub mod keymap;
pub mod logging;
pub mod playback;
pub mod runtime;
pub mod session;
pub mod ui;
