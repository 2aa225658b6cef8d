//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod content;
mod new_game;
mod read_state;
mod replay;

pub use content::{ExportContent, ValidateContent};
pub use new_game::NewGame;
pub use read_state::ReadState;
pub use replay::Replay;
