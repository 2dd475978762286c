//! Plain data types shared by the store, the engine and the broadcast hub.

mod id;
mod status;
mod table;

pub use id::TableId;
pub use status::{TableStatus, UnknownStatus};
pub use table::{Table, TablePatch, TableUpdate};
