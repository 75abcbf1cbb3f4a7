//! Session state kept across connections so a dropped connection can resume

use crate::protocol::ResumePayload;

/// Query string selecting protocol version and encoding
const GATEWAY_QUERY: &str = "?v=10&encoding=json";

#[derive(Debug, Default, Clone)]
pub struct ResumeState {
    session_id: Option<String>,
    resume_url: Option<String>,
    sequence: Option<u64>,
}

impl ResumeState {
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Track the latest Dispatch sequence number
    pub fn record_sequence(&mut self, seq: u64) {
        if self.sequence.is_none_or(|current| seq > current) {
            self.sequence = Some(seq);
        }
    }

    /// Remember the session established by READY
    pub fn start_session(&mut self, session_id: String, resume_url: Option<String>) {
        self.session_id = Some(session_id);
        self.resume_url = resume_url;
    }

    /// Forget the session; the next connection identifies from scratch
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn can_resume(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    pub fn resume_payload(&self, token: &str) -> Option<ResumePayload> {
        Some(ResumePayload {
            token: token.to_string(),
            session_id: self.session_id.clone()?,
            seq: self.sequence?,
        })
    }

    /// URL for the next connection: the resume host when resuming
    pub fn connect_url(&self, gateway_url: &str) -> String {
        let base = match &self.resume_url {
            Some(url) if self.can_resume() => url,
            _ => gateway_url,
        };
        format!("{}/{GATEWAY_QUERY}", base.trim_end_matches('/'))
    }
}
