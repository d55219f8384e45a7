//! Disk configuration module / 磁盘配置模块
//!
//! The host defines named disks, each selecting a driver type and carrying
//! that driver's own options. Definitions can be kept inline or loaded from a
//! disks.json file.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::StorageError;

/// One named disk: driver type plus driver options / 单个命名磁盘配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Driver type name, e.g. "swift" / 驱动类型名称
    pub driver: String,
    /// Driver-specific options, handed to the factory verbatim / 驱动特有配置
    #[serde(flatten)]
    pub options: Value,
}

/// Disk definition file / 磁盘定义文件
///
/// ```json
/// {
///   "disks": {
///     "media": { "driver": "swift", "auth": "account", ... }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisksConfig {
    #[serde(default)]
    pub disks: HashMap<String, DiskConfig>,
}

impl DisksConfig {
    /// Load disk definitions from a JSON file / 从 JSON 文件加载磁盘定义
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| StorageError::InvalidConfiguration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_disks_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"disks": {{"media": {{"driver": "swift", "container": "c1"}}}}}}"#
        )
        .unwrap();

        let config = DisksConfig::load(file.path()).unwrap();
        let media = config.disks.get("media").unwrap();
        assert_eq!(media.driver, "swift");
        assert_eq!(media.options["container"], "c1");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DisksConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidConfiguration(_)));
    }
}
