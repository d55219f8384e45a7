//! OpenStack Swift 对象存储驱动
//!
//! Translates a disk's configuration into OpenStack auth options, resolves the
//! configured container and binds it to the generic filesystem layer. All
//! object I/O is left to the host.

pub mod adapter;
pub mod auth;
pub mod client;
pub mod config;
pub mod factory;

pub use adapter::SwiftAdapter;
pub use auth::{build_auth_options, AuthOptions};
pub use client::{Container, OpenStack};
pub use config::{SwiftAuth, SwiftConfig};
pub use factory::SwiftDriverFactory;
