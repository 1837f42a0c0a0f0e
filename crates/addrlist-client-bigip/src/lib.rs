// # BIG-IP Device Client
//
// This crate provides a BIG-IP iControl REST implementation of the
// DeviceClient trait for the address-list reconciler.
//
// ## Behavior
//
// - One HTTP request per trait call
// - Full error propagation to the reconciler (no retries, no caching)
// - HTTP timeout configured (30 seconds)
// - Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - HTTP basic authentication
// - Optional TLS certificate validation for appliances with self-signed certs
//
// ## Security Requirements
//
// - The password NEVER appears in logs or Debug output
// - The client fails fast if the user is empty
//
// ## API Reference
//
// - Collection: `/mgmt/tm/security/firewall/address-list`
// - Resource: `/mgmt/tm/security/firewall/address-list/~{partition}~{name}`
// - Exists/Load: GET resource (404 when missing)
// - Create: POST collection
// - Modify: PATCH resource
// - Delete: DELETE resource

use addrlist_core::config::ClientConfig;
use addrlist_core::traits::{DeviceClient, DeviceClientFactory};
use addrlist_core::wire::{AddressListResource, WireAttributes};
use addrlist_core::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Path of the address-list collection on the management API
const ADDRESS_LIST_PATH: &str = "/mgmt/tm/security/firewall/address-list";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const CLIENT_NAME: &str = "bigip";

/// BIG-IP iControl REST client
///
/// Stateless apart from the connection pool: every call reflects the device
/// as it is at that moment.
///
/// # Security
///
/// The Debug implementation does NOT expose the password.
pub struct BigIpClient {
    /// `https://server:port` prefix
    base_url: String,

    user: String,

    /// ⚠️ NEVER log this value
    password: String,

    validate_certs: bool,

    client: reqwest::Client,
}

impl std::fmt::Debug for BigIpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigIpClient")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("validate_certs", &self.validate_certs)
            .finish()
    }
}

impl BigIpClient {
    /// Create a new BIG-IP client
    ///
    /// # Parameters
    ///
    /// - `server`: Management address or hostname
    /// - `server_port`: Management port (usually 443)
    /// - `user` / `password`: Credentials for HTTP basic auth
    /// - `validate_certs`: Reject invalid TLS certificates when true
    pub fn new(
        server: &str,
        server_port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        validate_certs: bool,
    ) -> Result<Self> {
        let user = user.into();
        if user.is_empty() {
            return Err(Error::config("BIG-IP user cannot be empty"));
        }
        if server.is_empty() {
            return Err(Error::config("BIG-IP server cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .danger_accept_invalid_certs(!validate_certs)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: format!("https://{}:{}", server, server_port),
            user,
            password: password.into(),
            validate_certs,
            client,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, ADDRESS_LIST_PATH)
    }

    fn resource_url(&self, name: &str, partition: &str) -> String {
        format!("{}/~{}~{}", self.collection_url(), partition, name)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Content-Type", "application/json")
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        builder
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))
    }

    /// Turn a non-success response into an error
    async fn fail(response: reqwest::Response, path: &str, action: &str) -> Error {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        status_error(status, &error_message(&body), path, action)
    }
}

/// Pull the `message` out of an iControl error body, or return the body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Map an HTTP status to the reconciler's error taxonomy
fn status_error(status: StatusCode, message: &str, path: &str, action: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid credentials or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(path),
        409 => Error::device(
            CLIENT_NAME,
            format!("Conflict while trying to {} {}: {}", action, path, message),
        ),
        429 => Error::device(
            CLIENT_NAME,
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::device(
            CLIENT_NAME,
            format!("Device server error: {} - {}", status, message),
        ),
        _ => Error::device(
            CLIENT_NAME,
            format!("Failed to {} {}: {} - {}", action, path, status, message),
        ),
    }
}

/// Body for a create request: identity plus attributes
fn create_body(name: &str, partition: &str, attributes: &WireAttributes) -> Value {
    let mut body = attributes.clone();
    body.insert("name".to_string(), Value::String(name.to_string()));
    body.insert("partition".to_string(), Value::String(partition.to_string()));
    Value::Object(body)
}

#[async_trait]
impl DeviceClient for BigIpClient {
    async fn exists(&self, name: &str, partition: &str) -> Result<bool> {
        let path = format!("/{}/{}", partition, name);
        tracing::debug!("Checking whether {} exists", path);

        let response = self
            .send(self.request(reqwest::Method::GET, &self.resource_url(name, partition)))
            .await?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::fail(response, &path, "check").await),
        }
    }

    async fn load(&self, name: &str, partition: &str) -> Result<AddressListResource> {
        let path = format!("/{}/{}", partition, name);
        tracing::debug!("Loading {}", path);

        let response = self
            .send(self.request(reqwest::Method::GET, &self.resource_url(name, partition)))
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, &path, "load").await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse response: {}", e)))?;
        AddressListResource::from_json(json)
    }

    async fn create(
        &self,
        name: &str,
        partition: &str,
        attributes: &WireAttributes,
    ) -> Result<()> {
        let path = format!("/{}/{}", partition, name);
        tracing::info!("Creating {} with {:?}", path, attributes.keys().collect::<Vec<_>>());

        let response = self
            .send(
                self.request(reqwest::Method::POST, &self.collection_url())
                    .json(&create_body(name, partition, attributes)),
            )
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, &path, "create").await);
        }
        Ok(())
    }

    async fn modify(
        &self,
        resource: &AddressListResource,
        attributes: &WireAttributes,
    ) -> Result<()> {
        let path = resource.full_path();
        tracing::info!("Modifying {} with {:?}", path, attributes.keys().collect::<Vec<_>>());

        let response = self
            .send(
                self.request(
                    reqwest::Method::PATCH,
                    &self.resource_url(&resource.name, &resource.partition),
                )
                .json(attributes),
            )
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, &path, "modify").await);
        }
        Ok(())
    }

    async fn delete(&self, resource: &AddressListResource) -> Result<()> {
        let path = resource.full_path();
        tracing::info!("Deleting {}", path);

        let response = self
            .send(self.request(
                reqwest::Method::DELETE,
                &self.resource_url(&resource.name, &resource.partition),
            ))
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response, &path, "delete").await);
        }
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        CLIENT_NAME
    }
}

pub struct BigIpFactory;

impl DeviceClientFactory for BigIpFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn DeviceClient>> {
        match config {
            ClientConfig::Bigip {
                server,
                server_port,
                user,
                password,
                validate_certs,
            } => {
                if !validate_certs {
                    tracing::warn!("TLS certificate validation is disabled for {}", server);
                }
                Ok(Box::new(BigIpClient::new(
                    server,
                    *server_port,
                    user.clone(),
                    password.clone(),
                    *validate_certs,
                )?))
            }
            _ => Err(Error::config("Invalid config for BIG-IP client")),
        }
    }
}

pub fn register(registry: &addrlist_core::ClientRegistry) {
    registry.register_client(CLIENT_NAME, Box::new(BigIpFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bigip_config(user: &str) -> ClientConfig {
        ClientConfig::Bigip {
            server: "10.0.0.1".to_string(),
            server_port: 8443,
            user: user.to_string(),
            password: "secret_password_12345".to_string(),
            validate_certs: false,
        }
    }

    #[test]
    fn test_factory_creation() {
        let client = BigIpFactory.create(&bigip_config("admin")).unwrap();
        assert_eq!(client.client_name(), "bigip");
    }

    #[test]
    fn test_factory_missing_user() {
        assert!(BigIpFactory.create(&bigip_config("")).is_err());
    }

    #[test]
    fn test_factory_rejects_other_config() {
        let config = ClientConfig::Custom {
            factory: "bigip".to_string(),
            config: serde_json::json!({}),
        };
        assert!(matches!(BigIpFactory.create(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_registration() {
        let registry = addrlist_core::ClientRegistry::new();
        register(&registry);
        assert!(registry.has_client("bigip"));
    }

    #[test]
    fn test_urls() {
        let client = BigIpClient::new("bigip.local", 443, "admin", "pw", true).unwrap();
        assert_eq!(
            client.collection_url(),
            "https://bigip.local:443/mgmt/tm/security/firewall/address-list"
        );
        assert_eq!(
            client.resource_url("blocklist", "Tenant"),
            "https://bigip.local:443/mgmt/tm/security/firewall/address-list/~Tenant~blocklist"
        );
    }

    #[test]
    fn test_create_body_carries_identity() {
        let mut attributes = WireAttributes::new();
        attributes.insert("fqdns".to_string(), serde_json::json!([{"name": "a.com"}]));

        let body = create_body("foo", "Common", &attributes);

        assert_eq!(
            body,
            serde_json::json!({
                "name": "foo",
                "partition": "Common",
                "fqdns": [{"name": "a.com"}]
            })
        );
    }

    #[test]
    fn test_status_mapping() {
        let path = "/Common/foo";
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", path, "load"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "", path, "load"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "", path, "load"),
            Error::NotFound(p) if p == path
        ));

        let conflict = status_error(StatusCode::CONFLICT, "already exists", path, "create");
        assert!(conflict.to_string().contains("already exists"));

        let server = status_error(StatusCode::BAD_GATEWAY, "down", path, "modify");
        assert!(server.to_string().contains("502"));

        let other = status_error(StatusCode::BAD_REQUEST, "bad attr", path, "modify");
        assert!(other.to_string().contains("Failed to modify /Common/foo"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"code":400,"message":"01020036:3: bad address"}"#),
            "01020036:3: bad address"
        );
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[test]
    fn test_password_not_exposed_in_debug() {
        let client =
            BigIpClient::new("bigip.local", 443, "admin", "secret_password_12345", true).unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_password_12345"));
        assert!(debug_str.contains("BigIpClient"));
        assert!(debug_str.contains("<REDACTED>"));
    }
}
