use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::DiskConfig;
use crate::error::StorageError;
use crate::session::Session;

use super::Filesystem;

/// Driver factory trait / 驱动工厂 trait
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Driver type name / 驱动类型名称
    fn driver_type(&self) -> &'static str;

    /// Build a filesystem from a disk's driver options / 由磁盘配置构建文件系统
    ///
    /// The session carries the caller's cached auth token for drivers with
    /// token-based auth; drivers that do not need it ignore it.
    async fn create(
        &self,
        options: Value,
        session: Option<&Session>,
    ) -> Result<Filesystem, StorageError>;
}

/// Filesystem manager (driver registry + lazy per-disk instances)
/// 文件系统管理器（驱动注册表 + 按磁盘惰性实例化）
#[derive(Clone, Default)]
pub struct FilesystemManager {
    factories: Arc<RwLock<HashMap<String, Arc<dyn DriverFactory>>>>,
    disk_configs: Arc<RwLock<HashMap<String, DiskConfig>>>,
    disks: Arc<RwLock<HashMap<String, Arc<Filesystem>>>>,
}

impl FilesystemManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver factory under its type name / 注册驱动工厂
    pub async fn extend(&self, factory: Arc<dyn DriverFactory>) -> Result<(), StorageError> {
        let driver_type = factory.driver_type().to_string();

        let mut factories = self.factories.write().await;
        factories.insert(driver_type.clone(), factory);

        tracing::info!("Driver factory registered: {}", driver_type);
        Ok(())
    }

    /// Define a named disk / 定义命名磁盘
    pub async fn configure_disk(&self, name: &str, config: DiskConfig) {
        let mut configs = self.disk_configs.write().await;
        configs.insert(name.to_string(), config);
    }

    /// Resolve a disk without session context / 无会话上下文解析磁盘
    pub async fn disk(&self, name: &str) -> Result<Arc<Filesystem>, StorageError> {
        self.disk_with_session(name, None).await
    }

    /// Resolve a disk, creating it on first use / 解析磁盘，首次使用时创建
    ///
    /// The first successful construction is cached; later calls for the same
    /// disk return the cached instance regardless of session.
    pub async fn disk_with_session(
        &self,
        name: &str,
        session: Option<&Session>,
    ) -> Result<Arc<Filesystem>, StorageError> {
        {
            let disks = self.disks.read().await;
            if let Some(filesystem) = disks.get(name) {
                return Ok(filesystem.clone());
            }
        }

        let config = {
            let configs = self.disk_configs.read().await;
            configs
                .get(name)
                .cloned()
                .ok_or_else(|| StorageError::DiskNotFound(name.to_string()))?
        };

        let factory = {
            let factories = self.factories.read().await;
            factories
                .get(&config.driver)
                .cloned()
                .ok_or_else(|| StorageError::DriverNotFound(config.driver.clone()))?
        };

        match factory.create(config.options.clone(), session).await {
            Ok(filesystem) => {
                let mut disks = self.disks.write().await;
                // 并发首次解析时保留先写入的实例
                let filesystem = disks
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(filesystem))
                    .clone();
                tracing::info!("Disk created: {} ({})", name, config.driver);
                Ok(filesystem)
            }
            Err(e) => {
                tracing::error!("Disk creation failed: {} ({}) - {}", name, config.driver, e);
                Err(e)
            }
        }
    }

    /// Drop a cached disk instance / 移除缓存的磁盘实例
    pub async fn forget(&self, name: &str) -> Result<(), StorageError> {
        let mut disks = self.disks.write().await;
        disks
            .remove(name)
            .ok_or_else(|| StorageError::DiskNotFound(name.to_string()))?;

        tracing::info!("Disk removed: {}", name);
        Ok(())
    }

    /// List registered driver types / 列出已注册的驱动类型
    pub async fn list_driver_types(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        factories.keys().cloned().collect()
    }

    /// List configured disks / 列出已配置的磁盘
    pub async fn list_disks(&self) -> Vec<String> {
        let configs = self.disk_configs.read().await;
        configs.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{Adapter, FilesystemConfig};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullAdapter;

    impl Adapter for NullAdapter {
        fn driver_type(&self) -> &'static str {
            "null"
        }

        fn object_key(&self, path: &str) -> String {
            path.trim_start_matches('/').to_string()
        }

        fn public_url(&self, _path: &str) -> Option<String> {
            None
        }
    }

    struct NullDriverFactory {
        created: AtomicUsize,
    }

    #[async_trait]
    impl DriverFactory for NullDriverFactory {
        fn driver_type(&self) -> &'static str {
            "null"
        }

        async fn create(
            &self,
            _options: Value,
            _session: Option<&Session>,
        ) -> Result<Filesystem, StorageError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Filesystem::new(Box::new(NullAdapter), FilesystemConfig::new()))
        }
    }

    fn null_disk() -> DiskConfig {
        serde_json::from_value(json!({"driver": "null"})).unwrap()
    }

    #[tokio::test]
    async fn test_disk_created_lazily_and_cached() {
        let manager = FilesystemManager::new();
        let factory = Arc::new(NullDriverFactory {
            created: AtomicUsize::new(0),
        });
        manager.extend(factory.clone()).await.unwrap();
        manager.configure_disk("media", null_disk()).await;

        assert_eq!(factory.created.load(Ordering::SeqCst), 0);

        let first = manager.disk("media").await.unwrap();
        let second = manager.disk("media").await.unwrap();

        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_unknown_disk_and_driver() {
        let manager = FilesystemManager::new();

        let err = manager.disk("nope").await.unwrap_err();
        assert!(matches!(err, StorageError::DiskNotFound(_)));

        manager
            .configure_disk("media", serde_json::from_value(json!({"driver": "swift"})).unwrap())
            .await;
        let err = manager.disk("media").await.unwrap_err();
        assert!(matches!(err, StorageError::DriverNotFound(_)));
    }

    #[tokio::test]
    async fn test_forget_drops_cached_instance() {
        let manager = FilesystemManager::new();
        let factory = Arc::new(NullDriverFactory {
            created: AtomicUsize::new(0),
        });
        manager.extend(factory.clone()).await.unwrap();
        manager.configure_disk("media", null_disk()).await;

        manager.disk("media").await.unwrap();
        manager.forget("media").await.unwrap();
        manager.disk("media").await.unwrap();

        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
        assert!(matches!(
            manager.forget("gone").await.unwrap_err(),
            StorageError::DiskNotFound(_)
        ));
    }
}
