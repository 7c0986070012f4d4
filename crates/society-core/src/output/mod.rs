//! Output Generation
//!
//! Periodic snapshot files for observers and full save documents for resuming.

pub mod save;
pub mod snapshot;

pub use save::*;
pub use snapshot::*;
