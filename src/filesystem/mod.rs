//! Generic filesystem layer / 通用文件系统层
//!
//! The host application works against a `Filesystem`, which couples a
//! driver-specific `Adapter` with a pass-through `FilesystemConfig`. Drivers
//! only implement the adapter seam; everything above it is driver-agnostic.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

pub mod manager;

pub use manager::{DriverFactory, FilesystemManager};

/// Adapter seam implemented by storage drivers / 存储驱动实现的适配器接口
pub trait Adapter: Send + Sync {
    /// Driver type name / 驱动类型名称
    fn driver_type(&self) -> &'static str;

    /// Map a filesystem path to the backend object key / 将路径映射为对象键
    fn object_key(&self, path: &str) -> String;

    /// Public URL for a path, if the backend exposes one / 路径的公开访问 URL
    fn public_url(&self, path: &str) -> Option<String>;
}

/// Pass-through options forwarded to the filesystem layer
/// 透传给文件系统层的配置
///
/// Key/value access with defaults; drivers seed it from their own
/// configuration and the host reads it back verbatim.
#[derive(Debug, Clone, Default)]
pub struct FilesystemConfig {
    values: HashMap<String, Value>,
}

impl FilesystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read with a fallback value / 带默认值读取
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.values.get(key).and_then(Value::as_u64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether write assertions are disabled / 是否禁用写入断言
    pub fn disable_asserts(&self) -> bool {
        self.get_bool("disable_asserts")
    }
}

/// Filesystem instance handed back to the host / 返回给宿主的文件系统实例
///
/// Owns its adapter and configuration; lifecycle belongs to the host's
/// service container once returned.
pub struct Filesystem {
    adapter: Box<dyn Adapter>,
    config: FilesystemConfig,
}

impl Filesystem {
    pub fn new(adapter: Box<dyn Adapter>, config: FilesystemConfig) -> Self {
        Self { adapter, config }
    }

    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    pub fn config(&self) -> &FilesystemConfig {
        &self.config
    }

    /// Public URL for a path / 路径的公开 URL
    pub fn public_url(&self, path: &str) -> Option<String> {
        self.adapter.public_url(path)
    }
}

impl fmt::Debug for Filesystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filesystem")
            .field("driver_type", &self.adapter.driver_type())
            .field("config", &self.config)
            .finish()
    }
}
