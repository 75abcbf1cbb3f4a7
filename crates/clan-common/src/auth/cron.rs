//! Shared-secret check for the scheduled sweep trigger

use subtle::ConstantTimeEq;

/// Secret the external scheduler presents as a bearer token
#[derive(Clone)]
pub struct CronSecret(Option<String>);

impl CronSecret {
    /// `None` disables the trigger: every presented value is rejected
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.filter(|s| !s.is_empty()))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    /// Compare in constant time
    #[must_use]
    pub fn verify(&self, presented: &str) -> bool {
        match &self.0 {
            Some(expected) => expected.as_bytes().ct_eq(presented.as_bytes()).into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for CronSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronSecret")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
