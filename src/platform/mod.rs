//! Platform layer
//!
//! Everything that talks to the host terminal:
//! - Key events and held-key tracking ([`input`])
//! - Raw mode, alternate screen and the event reader thread ([`session`])

pub mod input;
pub mod session;

pub use input::{Action, InputState, action_for};
pub use session::{TerminalEvent, TerminalSession};
