pub mod config;
pub mod error;
pub mod filesystem;
pub mod session;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use config::{DiskConfig, DisksConfig};
pub use error::StorageError;
pub use filesystem::{Adapter, DriverFactory, Filesystem, FilesystemConfig, FilesystemManager};
pub use session::{CachedToken, Session};

// Register all storage drivers (call unified registration function from drivers module) / 注册所有存储驱动
pub async fn register_storage_drivers(manager: &FilesystemManager) -> anyhow::Result<()> {
    drivers::register_all(manager).await
}
