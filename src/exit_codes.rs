//! Stable exit codes for the launcher and installer binaries.
//!
//! A child that exits on its own propagates its own code; a child killed by
//! a signal has that signal re-raised instead of any code here.

/// Success.
pub const OK: i32 = 0;
/// Runtime missing or incompatible, cache unusable, launch or install failure.
pub const FAILURE: i32 = 1;
