//! Session report persisted at the end of a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CartSummary, GatekeeperGrant};

/// Record of one completed workflow run.
///
/// All tokens are carried verbatim; nothing here outlives the run except the
/// file the caller chooses to write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub fingerprint: String,
    pub turnstile_token: String,
    pub grant: GatekeeperGrant,
    #[serde(default)]
    pub cart: Option<CartSummary>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl SessionReport {
    pub fn new(fingerprint: String, turnstile_token: String, grant: GatekeeperGrant) -> Self {
        Self {
            fingerprint,
            turnstile_token,
            grant,
            cart: None,
            generated_at: chrono::Utc::now(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant() -> GatekeeperGrant {
        GatekeeperGrant {
            success: true,
            gatekeeper_token: "gk_token".into(),
            cart_token: Some("cart_token".into()),
            ttl_minutes: Some(10),
            expires_at: None,
            release_id: None,
        }
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let report = SessionReport::new("fp_abc123def_1700000000000".into(), "0.tok".into(), grant());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        report.save(&path).unwrap();

        let loaded: SessionReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.fingerprint, report.fingerprint);
        assert_eq!(loaded.grant.gatekeeper_token, "gk_token");
        assert!(loaded.cart.is_none());
    }
}
