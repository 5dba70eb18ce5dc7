pub mod challenge;
pub mod commands;
pub mod config;
pub mod console;
pub mod editor;
pub mod entropy;
pub mod error;
pub mod freed;
pub mod kernel;
pub mod matrix;
pub mod meter;
pub mod output;
pub mod profile;
pub mod session;
pub mod shell;
pub mod system;
pub mod vfs;

pub use output::{Mode, Output};
pub use session::Session;
pub use system::System;
