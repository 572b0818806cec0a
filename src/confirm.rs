use std::fmt;

use crate::constants::chain::FINALITY_DEPTH;

/// Acceptance badge shown next to a transaction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    NotAccepted,
    /// Accepted, but the chain tip blue score has not been loaded yet
    Unknown,
    Count(u64),
    /// Deeper than the finality depth
    Finalized,
}

/// Classify a transaction from the current virtual blue score (0 = not loaded)
/// and the blue score of the block that accepted it.
pub fn classify(is_accepted: bool, blue_score: u64, accepting_blue_score: Option<u64>) -> Confirmation {
    if !is_accepted {
        return Confirmation::NotAccepted;
    }
    let Some(accepting) = accepting_blue_score else {
        return Confirmation::Unknown;
    };
    if blue_score == 0 {
        return Confirmation::Unknown;
    }

    let depth = blue_score as i128 - accepting as i128;
    if depth < FINALITY_DEPTH as i128 {
        Confirmation::Count(depth.max(0) as u64)
    } else {
        Confirmation::Finalized
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::NotAccepted => write!(f, "not accepted"),
            Confirmation::Unknown => Ok(()),
            Confirmation::Count(n) => write!(f, "{n} confirmations"),
            Confirmation::Finalized => write!(f, "confirmed"),
        }
    }
}
