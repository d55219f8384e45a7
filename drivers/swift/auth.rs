//! Auth-options assembly / 认证选项构建
//!
//! Translates the typed driver configuration (plus the caller's session) into
//! the option set the OpenStack client consumes. Pure construction, no I/O.

use crate::error::StorageError;
use crate::session::{CachedToken, Session};

use super::config::{SwiftAuth, SwiftConfig};

const SECONDS_PER_DAY: u64 = 86_400;

/// User-Agent sent on every SDK request / SDK 请求使用的 User-Agent
pub const USER_AGENT: &str = concat!("swiftfs/", env!("CARGO_PKG_VERSION"));

/// Resolved auth options, one variant per auth method / 已解析的认证选项
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOptions {
    Token(TokenOptions),
    Account(AccountOptions),
}

/// Options for the cached-token variant / 令牌认证选项
#[derive(Debug, Clone, PartialEq)]
pub struct TokenOptions {
    pub cached_token: CachedToken,
    pub auth_url: String,
    pub region: String,
    /// Always the cached token's `id` / 恒为缓存令牌的 `id`
    pub token_id: String,
}

/// Options for the account/password variant / 账号密码认证选项
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOptions {
    pub auth_url: String,
    pub region: String,
    pub user: UserOptions,
    /// Project scope, present iff projectId was configured / 项目作用域
    pub scope: Option<ProjectScope>,
    pub debug_log: bool,
    /// TLS verification options, present iff certEnable / TLS 校验选项
    pub request_options: Option<RequestOptions>,
    /// Expiry for newly written objects, seconds / 新对象过期秒数
    pub delete_after: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserOptions {
    pub name: String,
    pub password: String,
    pub domain: DomainOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainOptions {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectScope {
    pub project_id: String,
}

/// Certificate verification options / 证书校验选项
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// CA bundle path handed to the HTTP client / 交给 HTTP 客户端的 CA 路径
    pub verify: String,
    pub user_agent: &'static str,
}

impl AuthOptions {
    pub fn auth_url(&self) -> &str {
        match self {
            AuthOptions::Token(options) => &options.auth_url,
            AuthOptions::Account(options) => &options.auth_url,
        }
    }

    pub fn region(&self) -> &str {
        match self {
            AuthOptions::Token(options) => &options.region,
            AuthOptions::Account(options) => &options.region,
        }
    }
}

/// Build auth options from config and session / 由配置和会话构建认证选项
///
/// The token variant requires a session carrying a cached token; the account
/// variant works without a session, which then can only contribute the
/// object-expiry override.
pub fn build_auth_options(
    config: &SwiftConfig,
    session: Option<&Session>,
) -> Result<AuthOptions, StorageError> {
    match &config.auth {
        SwiftAuth::Token => {
            let token = session
                .and_then(Session::cached_token)
                .ok_or(StorageError::NoAuthenticatedSession)?;

            Ok(AuthOptions::Token(TokenOptions {
                cached_token: token.clone(),
                auth_url: config.auth_url.clone(),
                region: config.region.clone(),
                token_id: token.id.clone(),
            }))
        }
        SwiftAuth::Account {
            user,
            password,
            domain,
            project_id,
            debug_log,
            cert_enable,
            cert_file,
            expired_on,
        } => {
            let request_options = if *cert_enable {
                // validate() 已保证 certFile 存在
                let verify = cert_file
                    .clone()
                    .filter(|file| !file.is_empty())
                    .ok_or(StorageError::MissingConfiguration("certFile"))?;
                Some(RequestOptions {
                    verify,
                    user_agent: USER_AGENT,
                })
            } else {
                None
            };

            // 会话级过期天数覆盖磁盘配置
            let delete_after = session
                .and_then(Session::expire_on)
                .or(*expired_on)
                .map(|days| u64::from(days) * SECONDS_PER_DAY);

            Ok(AuthOptions::Account(AccountOptions {
                auth_url: config.auth_url.clone(),
                region: config.region.clone(),
                user: UserOptions {
                    name: user.clone(),
                    password: password.clone(),
                    domain: DomainOptions {
                        name: domain.clone(),
                    },
                },
                scope: project_id.clone().map(|id| ProjectScope { project_id: id }),
                debug_log: *debug_log,
                request_options,
                delete_after,
            }))
        }
    }
}
