//! The fixed set of broadcast rooms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named broadcast channel. The set is closed; rooms are never created
/// or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Room {
    Dashboard,
    RiskRegister,
    RiskMatrix,
    Kri,
    Kpi,
}

impl Room {
    pub const ALL: [Room; 5] = [
        Room::Dashboard,
        Room::RiskRegister,
        Room::RiskMatrix,
        Room::Kri,
        Room::Kpi,
    ];

    /// Wire name, as used in `subscribe` frames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::Dashboard => "dashboard",
            Room::RiskRegister => "riskRegister",
            Room::RiskMatrix => "riskMatrix",
            Room::Kri => "kri",
            Room::Kpi => "kpi",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a room name is not one of the fixed rooms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown room: {0}")]
pub struct UnknownRoom(pub String);

impl FromStr for Room {
    type Err = UnknownRoom;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Room::ALL
            .into_iter()
            .find(|room| room.as_str() == s)
            .ok_or_else(|| UnknownRoom(s.to_string()))
    }
}
