//! Swift 驱动配置

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;

/// Swift driver configuration / Swift 驱动配置
///
/// Keys follow the host's camelCase convention. The two authentication
/// variants are a tagged union on the `auth` key, so a disk with a wrong or
/// missing variant fails when its options are parsed, not on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftConfig {
    /// Keystone identity endpoint / Keystone 认证端点
    pub auth_url: String,
    /// Region name / 区域
    pub region: String,
    /// Object-store container name / 对象存储容器名称
    pub container: String,
    /// Authentication variant, tagged on the `auth` key / 认证方式
    #[serde(flatten)]
    pub auth: SwiftAuth,
    /// Key prefix inside the container / 容器内对象键前缀
    #[serde(default)]
    pub prefix: Option<String>,
    /// Public base URL for generated links / 生成链接的公开基础 URL
    #[serde(default)]
    pub url: Option<String>,
    /// Disable write assertions in the filesystem layer / 禁用写入断言
    #[serde(default)]
    pub disable_asserts: bool,
    /// Large-object threshold, bytes / 大对象阈值（字节）
    #[serde(default)]
    pub swift_large_object_threshold: Option<u64>,
    /// Segment size for large objects, bytes / 大对象分段大小（字节）
    #[serde(default)]
    pub swift_segment_size: Option<u64>,
    /// Container receiving large-object segments / 接收分段的容器
    #[serde(default)]
    pub swift_segment_container: Option<String>,
}

/// Authentication variants / 认证方式变体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "auth", rename_all = "lowercase")]
pub enum SwiftAuth {
    /// Reuse the Keystone token cached on the caller's session
    /// 复用调用方会话缓存的 Keystone 令牌
    Token,
    /// Account + password authentication / 账号密码认证
    #[serde(rename_all = "camelCase")]
    Account {
        user: String,
        password: String,
        domain: String,
        /// Scope the token to this project when present / 作用域项目 ID
        #[serde(default)]
        project_id: Option<String>,
        /// Log identity requests at debug level / 调试日志
        #[serde(default)]
        debug_log: bool,
        /// Verify TLS against a custom CA bundle / 启用自定义 CA 校验
        #[serde(default)]
        cert_enable: bool,
        /// CA bundle path, required when certEnable is set / CA 证书路径
        #[serde(default)]
        cert_file: Option<String>,
        /// Expiry for newly written objects, in days / 新对象过期天数
        #[serde(default)]
        expired_on: Option<u32>,
    },
}

impl SwiftConfig {
    /// Parse and validate driver options / 解析并校验驱动配置
    pub fn from_value(options: Value) -> Result<Self, StorageError> {
        let config: SwiftConfig = serde_json::from_value(options)
            .map_err(|e| StorageError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.auth_url.is_empty() {
            return Err(StorageError::MissingConfiguration("authUrl"));
        }
        if self.region.is_empty() {
            return Err(StorageError::MissingConfiguration("region"));
        }
        if self.container.is_empty() {
            return Err(StorageError::MissingConfiguration("container"));
        }
        if let SwiftAuth::Account {
            cert_enable: true,
            cert_file,
            ..
        } = &self.auth
        {
            if cert_file.as_deref().map_or(true, str::is_empty) {
                return Err(StorageError::MissingConfiguration("certFile"));
            }
        }
        Ok(())
    }
}
