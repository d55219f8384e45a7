//! Swift adapter / Swift 适配器
//!
//! Binds a resolved container to the generic filesystem layer: maps paths to
//! object keys under the optional prefix and produces public URLs.

use crate::filesystem::Adapter;

use super::client::Container;

/// Swift 适配器
pub struct SwiftAdapter {
    container: Container,
    prefix: Option<String>,
    url: Option<String>,
}

impl SwiftAdapter {
    pub fn new(container: Container, prefix: Option<String>, url: Option<String>) -> Self {
        // 规范化前缀和基础 URL，拼接时无需再处理边界斜杠
        let prefix = prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        let url = url
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        Self {
            container,
            prefix,
            url,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl Adapter for SwiftAdapter {
    fn driver_type(&self) -> &'static str {
        "swift"
    }

    /// Map a path to its object key under the prefix / 路径映射为带前缀的对象键
    fn object_key(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match &self.prefix {
            Some(prefix) if path.is_empty() => prefix.clone(),
            Some(prefix) => format!("{}/{}", prefix, path),
            None => path.to_string(),
        }
    }

    fn public_url(&self, path: &str) -> Option<String> {
        let key = self.object_key(path);
        match &self.url {
            Some(base) => Some(format!("{}/{}", base, key)),
            // 未配置公开基础 URL 时退回容器端点
            None => Some(self.container.object_url(&key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn test_container() -> Container {
        Container::new(
            "media".to_string(),
            Url::parse("https://swift.example.com/v1/AUTH_demo").unwrap(),
            "tok-1".to_string(),
        )
    }

    #[test]
    fn test_object_key_without_prefix() {
        let adapter = SwiftAdapter::new(test_container(), None, None);
        assert_eq!(adapter.object_key("/photos/cat.jpg"), "photos/cat.jpg");
        assert_eq!(adapter.object_key("photos/cat.jpg"), "photos/cat.jpg");
        assert_eq!(adapter.object_key("/"), "");
    }

    #[test]
    fn test_object_key_with_prefix() {
        let adapter = SwiftAdapter::new(test_container(), Some("/uploads/".to_string()), None);
        assert_eq!(adapter.object_key("/photos/cat.jpg"), "uploads/photos/cat.jpg");
        assert_eq!(adapter.object_key(""), "uploads");
    }

    #[test]
    fn test_public_url_prefers_configured_base() {
        let adapter = SwiftAdapter::new(
            test_container(),
            Some("uploads".to_string()),
            Some("https://cdn.example.com/".to_string()),
        );
        assert_eq!(
            adapter.public_url("photos/cat.jpg").unwrap(),
            "https://cdn.example.com/uploads/photos/cat.jpg"
        );
    }

    #[test]
    fn test_public_url_falls_back_to_container_endpoint() {
        let adapter = SwiftAdapter::new(test_container(), None, None);
        assert_eq!(
            adapter.public_url("photos/cat.jpg").unwrap(),
            "https://swift.example.com/v1/AUTH_demo/media/photos/cat.jpg"
        );
    }
}
