//! Platform abstraction layer
//!
//! The simulation never talks to a window or the system clock directly:
//! - Input events and pointer position come through [`InputSource`]
//! - Time comes through [`Clock`]

pub mod input;
pub mod time;

pub use input::{InputEvent, InputSource, Key, ScriptedInput};
pub use time::{Clock, ManualClock, SystemClock};
