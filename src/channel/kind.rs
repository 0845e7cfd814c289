// Action kinds: which of the three sub-events an operation targets

use super::ChannelError;
use std::fmt;
use std::str::FromStr;

/// Selects one of the three callback chains of a receiver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// The input completed its interaction (e.g. a button press)
    #[default]
    Performed,
    /// The input started an interaction
    Started,
    /// The input was released or its interaction aborted
    Cancelled,
}

impl ActionKind {
    /// All kinds, in chain order
    pub const ALL: [ActionKind; 3] = [
        ActionKind::Performed,
        ActionKind::Started,
        ActionKind::Cancelled,
    ];

    /// Lowercase name, the only accepted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Performed => "performed",
            ActionKind::Started => "started",
            ActionKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for ActionKind {
    type Error = ChannelError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ActionKind::Performed),
            1 => Ok(ActionKind::Started),
            2 => Ok(ActionKind::Cancelled),
            other => Err(ChannelError::UnknownKind(other.to_string())),
        }
    }
}

impl FromStr for ActionKind {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ChannelError::UnknownKind(s.to_string()))
    }
}

/// An untyped kind coming from scripts or tools
///
/// Either the chain index (0, 1, 2) or the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind<'a> {
    Index(u8),
    Name(&'a str),
}

impl From<u8> for RawKind<'_> {
    fn from(index: u8) -> Self {
        RawKind::Index(index)
    }
}

impl<'a> From<&'a str> for RawKind<'a> {
    fn from(name: &'a str) -> Self {
        RawKind::Name(name)
    }
}

impl From<ActionKind> for RawKind<'_> {
    fn from(kind: ActionKind) -> Self {
        RawKind::Name(kind.as_str())
    }
}

impl fmt::Display for RawKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawKind::Index(index) => write!(f, "{}", index),
            RawKind::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl TryFrom<RawKind<'_>> for ActionKind {
    type Error = ChannelError;

    fn try_from(raw: RawKind<'_>) -> Result<Self, Self::Error> {
        match raw {
            RawKind::Index(index) => ActionKind::try_from(index),
            RawKind::Name(name) => name.parse(),
        }
    }
}
