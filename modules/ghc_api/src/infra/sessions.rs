use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::ports::SessionResolver;
use crate::domain::session::Session;

/// Resolves bearer tokens from a fixed table, usually `GhcApiConfig::sessions`.
#[derive(Debug, Default, Clone)]
pub struct StaticSessionResolver {
    sessions: BTreeMap<String, Session>,
}

impl StaticSessionResolver {
    pub fn new(sessions: BTreeMap<String, Session>) -> Self {
        Self { sessions }
    }

    pub fn with(mut self, token: impl Into<String>, session: Session) -> Self {
        self.sessions.insert(token.into(), session);
        self
    }
}

#[async_trait]
impl SessionResolver for StaticSessionResolver {
    async fn resolve(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).cloned()
    }
}
