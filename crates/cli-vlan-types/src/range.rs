//! Compact VLAN range notation.
//!
//! A trunk VLAN set is exchanged with the config model as a list of range
//! tokens: `<id>` for a singleton and `<start>..<end>` for a contiguous run,
//! with `start < end` always.

use crate::{VlanError, VlanId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the bounds of a range token.
pub const RANGE_SEPARATOR: &str = "..";

/// One element of a compressed VLAN list.
///
/// Prefer [`RangeToken::range`] over building `Range` directly: it rejects
/// reversed and degenerate bounds. [`expand`] re-validates tokens built by
/// hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RangeToken {
    /// A single VLAN.
    Single(VlanId),
    /// An inclusive run of VLANs, `start < end`.
    Range(VlanId, VlanId),
}

impl RangeToken {
    /// Builds a range token, rejecting `start >= end`.
    ///
    /// A run of one VLAN is a `Single`, never a degenerate `Range`.
    pub fn range(start: VlanId, end: VlanId) -> Result<Self, VlanError> {
        if start < end {
            Ok(RangeToken::Range(start, end))
        } else {
            Err(VlanError::InvalidRange {
                start: start.as_u16(),
                end: end.as_u16(),
            })
        }
    }

    /// First VLAN covered by the token.
    pub fn start(&self) -> VlanId {
        match *self {
            RangeToken::Single(v) | RangeToken::Range(v, _) => v,
        }
    }

    /// Last VLAN covered by the token.
    pub fn end(&self) -> VlanId {
        match *self {
            RangeToken::Single(v) | RangeToken::Range(_, v) => v,
        }
    }

    fn validate(&self) -> Result<(), VlanError> {
        match *self {
            RangeToken::Single(_) => Ok(()),
            RangeToken::Range(start, end) => RangeToken::range(start, end).map(|_| ()),
        }
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeToken::Single(v) => write!(f, "{}", v),
            RangeToken::Range(start, end) => write!(f, "{}{}{}", start, RANGE_SEPARATOR, end),
        }
    }
}

impl FromStr for RangeToken {
    type Err = VlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(RANGE_SEPARATOR) {
            Some((start, end)) => {
                let start = parse_bound(start, s)?;
                let end = parse_bound(end, s)?;
                RangeToken::range(start, end)
            }
            None => Ok(RangeToken::Single(parse_bound(s, s)?)),
        }
    }
}

fn parse_bound(bound: &str, token: &str) -> Result<VlanId, VlanError> {
    let id: u16 = bound
        .trim()
        .parse()
        .map_err(|_| VlanError::InvalidToken(token.to_string()))?;
    VlanId::new(id)
}

impl TryFrom<String> for RangeToken {
    type Error = VlanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RangeToken> for String {
    fn from(token: RangeToken) -> String {
        token.to_string()
    }
}

/// Compresses VLAN IDs into the minimal ascending list of range tokens.
///
/// Input order and duplicates do not matter. Adjacent runs are always
/// merged, so the output never holds two tokens where one ends right
/// before the next starts.
///
/// ```
/// use cli_vlan_types::{compress, VlanId, RangeToken};
///
/// let ids: Vec<VlanId> = [12, 5, 10, 11].iter().map(|&v| VlanId::new(v).unwrap()).collect();
/// let tokens = compress(&ids);
/// assert_eq!(tokens[0], RangeToken::Single(VlanId::new(5).unwrap()));
/// assert_eq!(tokens[1].to_string(), "10..12");
/// ```
pub fn compress(ids: &[VlanId]) -> Vec<RangeToken> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut tokens = Vec::new();
    let mut ids = sorted.into_iter();
    let Some(first) = ids.next() else {
        return tokens;
    };

    let (mut run_start, mut run_end) = (first, first);
    for id in ids {
        if run_end.next() == Some(id) {
            run_end = id;
            continue;
        }
        tokens.push(close_run(run_start, run_end));
        run_start = id;
        run_end = id;
    }
    tokens.push(close_run(run_start, run_end));

    tokens
}

fn close_run(start: VlanId, end: VlanId) -> RangeToken {
    if start == end {
        RangeToken::Single(start)
    } else {
        RangeToken::Range(start, end)
    }
}

/// Expands range tokens into explicit VLAN IDs, in input order.
///
/// The output is neither sorted nor deduplicated.
///
/// # Errors
///
/// Returns [`VlanError::InvalidRange`] for any `Range` whose start is not
/// strictly below its end. Nothing is returned on failure.
pub fn expand(tokens: &[RangeToken]) -> Result<Vec<VlanId>, VlanError> {
    let mut ids = Vec::new();
    for token in tokens {
        token.validate()?;
        match *token {
            RangeToken::Single(v) => ids.push(v),
            RangeToken::Range(start, end) => ids.extend(
                (start.as_u16()..=end.as_u16()).filter_map(|v| VlanId::new(v).ok()),
            ),
        }
    }
    Ok(ids)
}

/// Parses a comma and/or whitespace separated list of range tokens,
/// e.g. `"5, 10..12 20"`.
pub fn parse_tokens(s: &str) -> Result<Vec<RangeToken>, VlanError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<RangeToken>())
        .collect()
}

/// Renders tokens as a comma separated list, the inverse of [`parse_tokens`].
pub fn format_tokens(tokens: &[RangeToken]) -> String {
    tokens
        .iter()
        .map(RangeToken::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
