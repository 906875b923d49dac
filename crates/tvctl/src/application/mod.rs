//! Application layer for tvctl.
//!
//! - [`commands`]: the [`RemoteCommands`] façade and its [`RemoteSession`]
//!   seam.
//! - [`script`]: the key-script interpreter used by `tvctl key`.

pub mod commands;
pub mod script;

pub use commands::{InputDevice, InputList, RemoteCommands, RemoteSession};
pub use script::{parse_step, run_script, ScriptError, ScriptStep};
