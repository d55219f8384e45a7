// Driver package / 驱动包
pub mod swift;

use std::sync::Arc;

use crate::filesystem::FilesystemManager;

/// Register all drivers to FilesystemManager / 注册所有驱动
pub async fn register_all(manager: &FilesystemManager) -> anyhow::Result<()> {
    // Register Swift object-store driver / 注册Swift对象存储驱动
    manager.extend(Arc::new(swift::SwiftDriverFactory)).await?;
    Ok(())
}
