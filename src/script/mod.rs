//! Script codes, romanization systems, and script detection.

mod code;
mod detector;

pub use code::{default_system, supported_scripts, systems_for, RomanizationSystem, ScriptCode};
pub use detector::{DetectError, ScriptDetector};
