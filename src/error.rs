//! Storage error types / 存储错误类型
//!
//! Every failure is fatal to the disk construction that triggered it; there is
//! no retry and no fallback driver.

use thiserror::Error;

/// Errors surfaced by the filesystem manager and storage drivers
/// 文件系统管理器和存储驱动的错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// Driver options failed typed validation / 驱动配置解析失败
    #[error("invalid driver configuration: {0}")]
    InvalidConfiguration(String),

    /// A required configuration key is absent or empty / 缺少必需配置项
    #[error("missing required configuration key: {0}")]
    MissingConfiguration(&'static str),

    /// Token auth selected but the caller carries no session token
    /// 选择令牌认证但调用方没有会话令牌
    #[error("no authenticated session available for token auth")]
    NoAuthenticatedSession,

    /// The identity service rejected the credentials / 认证失败
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The named container does not exist / 容器不存在
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// The service catalog has no matching endpoint / 服务目录中无匹配端点
    #[error("no public {service} endpoint for region {region}")]
    EndpointNotFound { service: &'static str, region: String },

    /// The catalog endpoint URL could not be parsed / 端点 URL 无法解析
    #[error("invalid service endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// The backend answered with something unexpected / 后端返回异常响应
    #[error("unexpected response from object store: {0}")]
    UnexpectedResponse(String),

    /// No factory registered under this driver type / 未注册的驱动类型
    #[error("driver type not found: {0}")]
    DriverNotFound(String),

    /// No disk configured under this name / 未配置的磁盘
    #[error("disk not configured: {0}")]
    DiskNotFound(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
