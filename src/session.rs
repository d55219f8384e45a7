//! Authenticated session context / 认证会话上下文
//!
//! Drivers with token-based auth reuse the Keystone token cached on the
//! caller's session. The session is passed into disk resolution explicitly
//! instead of being read from ambient global state, so independent disks can
//! be built for different callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cached Keystone token / 缓存的 Keystone 令牌
///
/// Carries at least the token `id`; whatever else the identity service
/// returned (catalog, expiry, ...) is kept as-is under `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub id: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl CachedToken {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: HashMap::new(),
        }
    }
}

/// Caller session threaded into disk resolution / 传入磁盘解析的调用方会话
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<CachedToken>,
    expire_on: Option<u32>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session carrying a cached auth token / 携带缓存令牌的会话
    pub fn with_token(token: CachedToken) -> Self {
        Self {
            token: Some(token),
            expire_on: None,
        }
    }

    /// Session-scoped object expiry override, in days / 会话级对象过期天数覆盖
    pub fn set_expire_on(&mut self, days: u32) {
        self.expire_on = Some(days);
    }

    pub fn cached_token(&self) -> Option<&CachedToken> {
        self.token.as_ref()
    }

    pub fn expire_on(&self) -> Option<u32> {
        self.expire_on
    }
}
