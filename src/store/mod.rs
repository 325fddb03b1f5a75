//! Offline place cache
//!
//! The store owns the durable JSON index, the downloaded photo files and
//! the rendered map files, and is the only component that writes any of
//! them.

mod key;
mod offline;
mod placeholder;
mod record;

pub use key::PlaceKey;
pub use offline::OfflineStore;
pub use placeholder::placeholder_map;
pub use record::{Coordinates, PlaceRecord, Suggestion};
