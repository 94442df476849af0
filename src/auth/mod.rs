//! Startup gate guarding vault access.

pub mod gate;
pub mod terminal;

pub use gate::{AuthGate, GateState, Prompter, Unlocked};
pub use terminal::TerminalPrompter;
