use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::session::Session;

/// Configuration for the ghc_api module, read from `modules.ghc_api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GhcApiConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// How long a move stays locked for the office user viewing it.
    #[serde(default = "default_lock_duration_minutes")]
    pub lock_duration_minutes: i64,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
    /// Prefix for presigned download URLs.
    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,
    #[serde(default = "default_presign_ttl_seconds")]
    pub presign_ttl_seconds: i64,
    #[serde(default = "default_presign_secret")]
    pub presign_secret: String,
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    /// Bearer token -> session.
    #[serde(default)]
    pub sessions: BTreeMap<String, Session>,
}

fn default_base_path() -> String {
    "/ghc/v1".to_string()
}

fn default_lock_duration_minutes() -> i64 {
    30
}

fn default_per_page() -> u32 {
    20
}

fn default_max_per_page() -> u32 {
    100
}

fn default_storage_base_url() -> String {
    "http://127.0.0.1:8080/storage".to_string()
}

fn default_presign_ttl_seconds() -> i64 {
    900
}

fn default_presign_secret() -> String {
    "local-dev-secret".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for GhcApiConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            lock_duration_minutes: default_lock_duration_minutes(),
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            storage_base_url: default_storage_base_url(),
            presign_ttl_seconds: default_presign_ttl_seconds(),
            presign_secret: default_presign_secret(),
            seed_demo_data: default_seed_demo_data(),
            sessions: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_yields_defaults() {
        let cfg: GhcApiConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.base_path, "/ghc/v1");
        assert_eq!(cfg.default_per_page, 20);
        assert_eq!(cfg.lock_duration_minutes, 30);
        assert!(cfg.sessions.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<GhcApiConfig, _> =
            serde_json::from_value(serde_json::json!({ "base_pth": "/x" }));
        assert!(res.is_err());
    }

    #[test]
    fn sessions_parse_from_config() {
        let cfg: GhcApiConfig = serde_json::from_value(serde_json::json!({
            "sessions": {
                "too-token": {
                    "application": "office",
                    "user_id": "6f1f6c1a-7c2e-4b8a-9f0e-0a3e7b2c9d11",
                    "office_user_id": "0c2d8e7a-5b9f-4a13-8d2c-1f6e3a4b5c6d",
                    "email": "too@example.mil",
                    "roles": ["task_ordering_officer"]
                }
            }
        }))
        .unwrap();
        let s = &cfg.sessions["too-token"];
        assert!(s.is_office_user());
        assert!(s.has_role(crate::domain::session::RoleType::Too));
    }
}
