//! Gateway message envelope
//!
//! Every frame in either direction is `{ op, d, s, t }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HelloPayload, IdentifyPayload, OpCode, ResumePayload};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event name (Dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (Dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Payload; heartbeats send `null` explicitly
    #[serde(default)]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Outgoing ===

    /// Heartbeat (op 1) carrying the last sequence seen
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: last_sequence.map(|s| Value::Number(s.into())),
        }
    }

    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload)?),
        })
    }

    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Resume,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload)?),
        })
    }

    // === Incoming ===

    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// `Some(resumable)` for an Invalid Session message
    pub fn as_invalid_session(&self) -> Option<bool> {
        if self.op != OpCode::InvalidSession {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.t, self.s) {
            (Some(t), Some(s)) => write!(f, "GatewayMessage(op={}, t={t}, s={s})", self.op),
            (Some(t), None) => write!(f, "GatewayMessage(op={}, t={t})", self.op),
            _ => write!(f, "GatewayMessage(op={})", self.op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_hello() {
        let msg = GatewayMessage::from_json(r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#)
            .unwrap();
        assert_eq!(msg.as_hello().unwrap().heartbeat_interval, 41250);
        assert!(msg.as_invalid_session().is_none());
    }

    #[test]
    fn test_parse_dispatch() {
        let msg = GatewayMessage::from_json(
            r#"{"op":0,"t":"GUILD_MEMBER_UPDATE","s":42,"d":{"guild_id":"1"}}"#,
        )
        .unwrap();

        assert_eq!(msg.op, OpCode::Dispatch);
        assert_eq!(msg.t.as_deref(), Some("GUILD_MEMBER_UPDATE"));
        assert_eq!(msg.s, Some(42));
        assert_eq!(msg.to_string(), "GatewayMessage(op=Dispatch (0), t=GUILD_MEMBER_UPDATE, s=42)");
    }

    #[test]
    fn test_first_heartbeat_sends_null() {
        let json: Value = serde_json::from_str(&GatewayMessage::heartbeat(None).to_json().unwrap()).unwrap();
        assert_eq!(json, json!({ "op": 1, "d": null }));

        let json: Value = serde_json::from_str(&GatewayMessage::heartbeat(Some(7)).to_json().unwrap()).unwrap();
        assert_eq!(json["d"], 7);
    }

    #[test]
    fn test_invalid_session_flag() {
        let msg = GatewayMessage::from_json(r#"{"op":9,"d":true}"#).unwrap();
        assert_eq!(msg.as_invalid_session(), Some(true));

        let msg = GatewayMessage::from_json(r#"{"op":9,"d":false}"#).unwrap();
        assert_eq!(msg.as_invalid_session(), Some(false));
    }

    #[test]
    fn test_resume_payload() {
        let msg = GatewayMessage::resume(&ResumePayload {
            token: "t".to_string(),
            session_id: "abc".to_string(),
            seq: 9,
        })
        .unwrap();

        assert_eq!(msg.op, OpCode::Resume);
        assert_eq!(msg.d.unwrap()["session_id"], "abc");
    }
}
