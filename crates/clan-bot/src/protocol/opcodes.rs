//! Gateway operation codes

use serde::{Deserialize, Serialize};

/// The `op` field of every gateway frame
///
/// Presence, voice and request-members ops are never sent by the bot and
/// fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OpCode {
    Dispatch = 0,
    Heartbeat = 1,
    Identify = 2,
    Resume = 6,
    /// Server asks for a reconnect followed by Resume
    Reconnect = 7,
    /// `d` says whether the session can still be resumed
    InvalidSession = 9,
    /// Carries the heartbeat interval
    Hello = 10,
    HeartbeatAck = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported op code: {0}")]
pub struct UnknownOpCode(pub u8);

impl TryFrom<u8> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(UnknownOpCode(other)),
        })
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        op as u8
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?} ({})", u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_u8() {
        assert_eq!(OpCode::try_from(6), Ok(OpCode::Resume));
        assert_eq!(OpCode::try_from(11), Ok(OpCode::HeartbeatAck));
        assert_eq!(OpCode::try_from(3), Err(UnknownOpCode(3)));
        assert_eq!(OpCode::try_from(8), Err(UnknownOpCode(8)));
    }

    #[test]
    fn test_wire_encoding() {
        assert_eq!(serde_json::from_str::<OpCode>("10").unwrap(), OpCode::Hello);
        assert_eq!(serde_json::to_string(&OpCode::InvalidSession).unwrap(), "9");
        assert!(serde_json::from_str::<OpCode>("42").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(OpCode::Resume.to_string(), "Resume (6)");
    }
}
