//! VLAN primitives shared by the CLI translation units.
//!
//! - [`VlanId`]: IEEE 802.1Q VLAN identifier restricted to 1-4094
//! - [`RangeToken`]: a singleton or `start..end` run of VLAN IDs
//! - [`compress`] / [`expand`]: conversion between explicit VLAN ID lists
//!   and the compact range notation used when rendering device config

mod range;
mod vlan;

pub use range::{compress, expand, format_tokens, parse_tokens, RangeToken, RANGE_SEPARATOR};
pub use vlan::VlanId;

/// Errors raised while building or validating VLAN values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VlanError {
    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("invalid VLAN range {start}..{end}: range must be specified from lower to higher number")]
    InvalidRange { start: u16, end: u16 },

    #[error("invalid VLAN range token: {0:?}")]
    InvalidToken(String),
}
