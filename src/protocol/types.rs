use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a live WebSocket connection. Sessions only ever hold this
/// as a lookup key — it does not extend the connection's lifetime.
pub type ConnectionId = Uuid;

/// Opaque identifier handed back to a host on `host:create-game`.
pub type HostId = Uuid;

/// Opaque identifier for a team within a session.
pub type TeamId = Uuid;

/// Opaque identifier for a question within a session.
pub type QuestionId = Uuid;

/// The 4-digit public handle of a game session (spec.md §6: "exactly 4
/// decimal digits; value in `[1000, 9999]`").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub String);

impl Pin {
    pub fn from_code(code: u16) -> Self {
        debug_assert!((1000..=9999).contains(&code));
        Self(format!("{code:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` iff the string is four decimal digits. Used to short-circuit
    /// lookups for obviously-malformed PINs without touching the registry.
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit())
    }
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for Pin {
    fn borrow(&self) -> &str {
        &self.0
    }
}
