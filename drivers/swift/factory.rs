//! Swift驱动工厂

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;
use crate::filesystem::{DriverFactory, Filesystem, FilesystemConfig};
use crate::session::Session;

use super::adapter::SwiftAdapter;
use super::auth::build_auth_options;
use super::client::OpenStack;
use super::config::SwiftConfig;

/// Swift驱动工厂
pub struct SwiftDriverFactory;

impl SwiftDriverFactory {
    /// Pass-through filesystem options / 透传的文件系统配置
    fn filesystem_config(config: &SwiftConfig) -> FilesystemConfig {
        let mut fly_config = FilesystemConfig::new();
        fly_config.set("disable_asserts", config.disable_asserts);

        if let Some(threshold) = config.swift_large_object_threshold {
            fly_config.set("swiftLargeObjectThreshold", threshold);
        }
        if let Some(size) = config.swift_segment_size {
            fly_config.set("swiftSegmentSize", size);
        }
        if let Some(container) = &config.swift_segment_container {
            fly_config.set("swiftSegmentContainer", container.clone());
        }

        fly_config
    }
}

#[async_trait]
impl DriverFactory for SwiftDriverFactory {
    fn driver_type(&self) -> &'static str {
        "swift"
    }

    /// Build auth options, resolve the container, then wrap it in an adapter
    /// and filesystem / 构建认证选项、解析容器并包装为文件系统
    async fn create(
        &self,
        options: Value,
        session: Option<&Session>,
    ) -> Result<Filesystem, StorageError> {
        let config = SwiftConfig::from_value(options)?;
        let auth_options = build_auth_options(&config, session)?;

        let container = OpenStack::new(auth_options)?
            .object_store_v1()
            .get_container(&config.container)
            .await?;

        let adapter = SwiftAdapter::new(container, config.prefix.clone(), config.url.clone());
        let fly_config = Self::filesystem_config(&config);

        Ok(Filesystem::new(Box::new(adapter), fly_config))
    }
}
