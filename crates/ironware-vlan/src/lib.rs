//! ironware-vlan - VLAN membership reconciliation for IronWare switches
//!
//! Reads `show running-config vlan` output into per-VLAN membership,
//! projects it onto interfaces as access/trunk configuration, and plans the
//! commands that move an interface to a desired state.

mod cache;
mod classifier;
mod commands;
mod model;
mod parser;
mod projector;
mod reader;
mod writer;

pub use cache::ParseCache;
pub use classifier::*;
pub use commands::*;
pub use model::*;
pub use parser::*;
pub use projector::project;
pub use reader::*;
pub use writer::*;
