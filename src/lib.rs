// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod prefs;
pub mod runtime;
pub mod session_view;
pub mod store;
pub mod timer;
pub mod ui;
pub mod wizard;
