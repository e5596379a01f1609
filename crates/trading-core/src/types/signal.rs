//! Directional trading signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a strategy wants the account to hold for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Hold a long position
    Long,
    /// Hold a short position
    Short,
    /// No directional view; leave the position untouched
    Neutral,
}

impl Signal {
    /// Check if the signal asks for a position.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Signal::Neutral)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "LONG"),
            Signal::Short => write!(f, "SHORT"),
            Signal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}
