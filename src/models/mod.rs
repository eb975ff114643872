//! Data models for the Chengyu study tool.
//!
//! Field names serialize in camelCase so snapshots stay readable by the web frontend.

mod collection;
mod discrimination;
mod idiom;

pub use collection::*;
pub use discrimination::*;
pub use idiom::*;
