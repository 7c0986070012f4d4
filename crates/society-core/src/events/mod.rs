//! Event stream
//!
//! The world records notable occurrences into an [`EventBuffer`] as they
//! happen; a driver drains the buffer after each tick and hands the events to
//! an [`EventLogger`].

pub mod logger;

pub use logger::{EventBuffer, EventLogger};
