// Library surface for the CLI binary, headless/integration tests, and reuse.
pub mod app_dirs;
pub mod config;
pub mod grading;
pub mod logging;
pub mod progress;
pub mod session;
pub mod wordlist;
