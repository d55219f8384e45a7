//! Minimal OpenStack client / 精简 OpenStack 客户端
//!
//! Covers exactly what driver construction needs: one Keystone v3 token issue
//! and one container probe. Object I/O, retries and re-authentication are the
//! host's business, not this driver's.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::error::StorageError;

use super::auth::{AuthOptions, USER_AGENT};

const OBJECT_STORE_SERVICE: &str = "object-store";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// OpenStack client entry point / OpenStack 客户端入口
pub struct OpenStack {
    http: Client,
    options: AuthOptions,
}

impl OpenStack {
    /// Build the client from resolved auth options / 由认证选项构建客户端
    pub fn new(options: AuthOptions) -> Result<Self, StorageError> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));

        if let AuthOptions::Account(account) = &options {
            if let Some(request_options) = &account.request_options {
                let pem = std::fs::read(&request_options.verify)?;
                let certificate = reqwest::Certificate::from_pem(&pem)?;
                builder = builder
                    .add_root_certificate(certificate)
                    .user_agent(request_options.user_agent);
            }
        }

        let http = builder.build()?;
        Ok(Self { http, options })
    }

    /// Object Storage v1 service handle / 对象存储 v1 服务句柄
    pub fn object_store_v1(&self) -> ObjectStoreV1<'_> {
        ObjectStoreV1 { client: self }
    }

    fn debug_log(&self) -> bool {
        matches!(&self.options, AuthOptions::Account(account) if account.debug_log)
    }

    /// Issue a Keystone v3 token, returning it with the service catalog
    /// 签发 Keystone v3 令牌并返回服务目录
    async fn authenticate(&self) -> Result<(String, Vec<Value>), StorageError> {
        let endpoint = format!(
            "{}/auth/tokens",
            self.options.auth_url().trim_end_matches('/')
        );
        if self.debug_log() {
            tracing::debug!("Keystone token request: {}", endpoint);
        }

        let response = self
            .http
            .post(&endpoint)
            .json(&self.identity_request())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Keystone rejected credentials: {}", status);
            return Err(StorageError::AuthenticationFailed(format!(
                "identity service returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(StorageError::AuthenticationFailed(format!(
                "token request failed with {}",
                status
            )));
        }

        let token = response
            .headers()
            .get("X-Subject-Token")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                StorageError::AuthenticationFailed(
                    "identity response missing X-Subject-Token".to_string(),
                )
            })?;

        let payload: Value = response.json().await?;
        let catalog = payload
            .pointer("/token/catalog")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok((token, catalog))
    }

    /// Keystone v3 identity body per auth variant / 各认证方式的请求体
    fn identity_request(&self) -> Value {
        match &self.options {
            AuthOptions::Token(token) => json!({
                "auth": {
                    "identity": {
                        "methods": ["token"],
                        "token": { "id": token.token_id },
                    }
                }
            }),
            AuthOptions::Account(account) => {
                let mut auth = json!({
                    "identity": {
                        "methods": ["password"],
                        "password": {
                            "user": {
                                "name": account.user.name,
                                "password": account.user.password,
                                "domain": { "name": account.user.domain.name },
                            }
                        }
                    }
                });
                if let Some(scope) = &account.scope {
                    auth["scope"] = json!({ "project": { "id": scope.project_id } });
                }
                json!({ "auth": auth })
            }
        }
    }

    /// Pick the region's public object-store endpoint / 选取区域的公开端点
    fn find_endpoint(&self, catalog: &[Value]) -> Result<Url, StorageError> {
        let region = self.options.region();

        for service in catalog {
            if service.get("type").and_then(Value::as_str) != Some(OBJECT_STORE_SERVICE) {
                continue;
            }
            let endpoints = match service.get("endpoints").and_then(Value::as_array) {
                Some(endpoints) => endpoints,
                None => continue,
            };
            for endpoint in endpoints {
                let interface = endpoint
                    .get("interface")
                    .and_then(Value::as_str)
                    .unwrap_or("public");
                let endpoint_region = endpoint.get("region").and_then(Value::as_str);
                if interface != "public" || endpoint_region != Some(region) {
                    continue;
                }
                if let Some(raw) = endpoint.get("url").and_then(Value::as_str) {
                    return Url::parse(raw)
                        .map_err(|e| StorageError::InvalidEndpoint(format!("{}: {}", raw, e)));
                }
            }
        }

        Err(StorageError::EndpointNotFound {
            service: OBJECT_STORE_SERVICE,
            region: region.to_string(),
        })
    }
}

/// Object Storage v1 service / 对象存储 v1 服务
pub struct ObjectStoreV1<'a> {
    client: &'a OpenStack,
}

impl ObjectStoreV1<'_> {
    /// Resolve a named container / 解析命名容器
    ///
    /// Authenticates, resolves the region's public endpoint from the service
    /// catalog and verifies the container exists.
    pub async fn get_container(&self, name: &str) -> Result<Container, StorageError> {
        let (token, catalog) = self.client.authenticate().await?;
        let endpoint = self.client.find_endpoint(&catalog)?;

        let container_url = format!(
            "{}/{}",
            endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(name)
        );
        let response = self
            .client
            .http
            .head(&container_url)
            .header("X-Auth-Token", &token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::ContainerNotFound(name.to_string()));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::AuthenticationFailed(format!(
                "object store returned {} for container {}",
                status, name
            )));
        }
        if !status.is_success() {
            return Err(StorageError::UnexpectedResponse(format!(
                "container probe for {} failed with {}",
                name, status
            )));
        }

        tracing::debug!("Container resolved: {} ({})", name, endpoint);
        Ok(Container::new(name.to_string(), endpoint, token))
    }
}

/// Handle to a remote container / 远程容器句柄
#[derive(Debug, Clone)]
pub struct Container {
    name: String,
    endpoint: Url,
    token: String,
}

impl Container {
    pub(crate) fn new(name: String, endpoint: Url, token: String) -> Self {
        Self {
            name,
            endpoint,
            token,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service endpoint the container lives under / 容器所在的服务端点
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Scoped token for follow-up requests against this container
    /// 针对该容器后续请求的令牌
    pub fn auth_token(&self) -> &str {
        &self.token
    }

    /// Full URL of an object in this container / 容器内对象的完整 URL
    pub fn object_url(&self, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.name),
            encoded_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CachedToken;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;

    use crate::drivers::swift::auth::{
        AccountOptions, AuthOptions, DomainOptions, TokenOptions, UserOptions,
    };

    fn account_options(auth_url: String) -> AuthOptions {
        AuthOptions::Account(AccountOptions {
            auth_url,
            region: "r1".to_string(),
            user: UserOptions {
                name: "bob".to_string(),
                password: "p".to_string(),
                domain: DomainOptions {
                    name: "d".to_string(),
                },
            },
            scope: None,
            debug_log: false,
            request_options: None,
            delete_after: None,
        })
    }

    fn catalog_body(endpoint_url: &str) -> serde_json::Value {
        serde_json::json!({
            "token": {
                "catalog": [{
                    "type": "object-store",
                    "endpoints": [{
                        "interface": "public",
                        "region": "r1",
                        "url": endpoint_url,
                    }]
                }]
            }
        })
    }

    #[tokio::test]
    async fn test_get_container_resolves_endpoint() {
        let server = MockServer::start_async().await;
        let swift_base = server.url("/v1/AUTH_demo");

        let keystone = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v3/auth/tokens")
                    .header("User-Agent", USER_AGENT);
                then.status(201)
                    .header("X-Subject-Token", "tok-123")
                    .json_body(catalog_body(&swift_base));
            })
            .await;
        let probe = server
            .mock_async(|when, then| {
                when.method(HEAD)
                    .path("/v1/AUTH_demo/media")
                    .header("X-Auth-Token", "tok-123");
                then.status(204);
            })
            .await;

        let client = OpenStack::new(account_options(server.url("/v3"))).unwrap();
        let container = client.object_store_v1().get_container("media").await.unwrap();

        keystone.assert_async().await;
        probe.assert_async().await;
        assert_eq!(container.name(), "media");
        assert_eq!(container.auth_token(), "tok-123");
        assert_eq!(
            container.object_url("a/b c.txt"),
            format!("{}/media/a/b%20c.txt", swift_base)
        );
    }

    #[tokio::test]
    async fn test_container_not_found() {
        let server = MockServer::start_async().await;
        let swift_base = server.url("/v1/AUTH_demo");

        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/auth/tokens");
                then.status(201)
                    .header("X-Subject-Token", "tok-123")
                    .json_body(catalog_body(&swift_base));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/v1/AUTH_demo/missing");
                then.status(404);
            })
            .await;

        let client = OpenStack::new(account_options(server.url("/v3"))).unwrap();
        let err = client
            .object_store_v1()
            .get_container("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ContainerNotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/auth/tokens");
                then.status(401);
            })
            .await;

        let client = OpenStack::new(account_options(server.url("/v3"))).unwrap();
        let err = client.object_store_v1().get_container("media").await.unwrap_err();
        assert!(matches!(err, StorageError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_region_without_endpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/auth/tokens");
                then.status(201)
                    .header("X-Subject-Token", "tok-123")
                    .json_body(serde_json::json!({
                        "token": {
                            "catalog": [{
                                "type": "object-store",
                                "endpoints": [{
                                    "interface": "public",
                                    "region": "elsewhere",
                                    "url": "https://swift.elsewhere.example.com/v1/AUTH_demo",
                                }]
                            }]
                        }
                    }));
            })
            .await;

        let client = OpenStack::new(account_options(server.url("/v3"))).unwrap();
        let err = client.object_store_v1().get_container("media").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::EndpointNotFound { region, .. } if region == "r1"
        ));
    }

    #[tokio::test]
    async fn test_token_variant_reuses_cached_token_id() {
        let server = MockServer::start_async().await;
        let swift_base = server.url("/v1/AUTH_demo");

        let keystone = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v3/auth/tokens")
                    .json_body_partial(
                        r#"{"auth": {"identity": {"methods": ["token"], "token": {"id": "cached-1"}}}}"#,
                    );
                then.status(201)
                    .header("X-Subject-Token", "tok-456")
                    .json_body(catalog_body(&swift_base));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/v1/AUTH_demo/media");
                then.status(204);
            })
            .await;

        let options = AuthOptions::Token(TokenOptions {
            cached_token: CachedToken::new("cached-1"),
            auth_url: server.url("/v3"),
            region: "r1".to_string(),
            token_id: "cached-1".to_string(),
        });
        let client = OpenStack::new(options).unwrap();
        let container = client.object_store_v1().get_container("media").await.unwrap();

        keystone.assert_async().await;
        assert_eq!(container.auth_token(), "tok-456");
    }
}
