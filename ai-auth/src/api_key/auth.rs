//! API key authentication trait and implementation.

use reqwest::header::HeaderValue;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Authentication method for HTTP requests.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMethod {
    /// Custom header with optional prefix (e.g., "x-goog-api-key: xxx")
    ApiKeyHeader {
        header_name: String,
        prefix: Option<String>,
    },
    /// Standard Bearer token
    BearerToken,
}

/// Trait for authenticating HTTP requests with API keys or bearer tokens.
///
/// Implementations handle provider-specific authentication patterns like:
/// - Gemini: `x-goog-api-key: xxx`
/// - Groq: `Authorization: Bearer xxx`
///
/// The key is only ever placed in a header, never in the URL.
pub trait ProviderAuth: Send + Sync {
    /// Get the authentication method used by this provider.
    fn auth_method(&self) -> AuthMethod;

    /// Apply authentication to a request builder.
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// API key authentication implementation.
///
/// Supports custom header names and prefixes for various provider authentication patterns.
///
/// # Examples
///
/// ```rust,ignore
/// // Gemini: x-goog-api-key: xxx
/// let auth = ApiKeyAuth::new(SecretString::new(key), "x-goog-api-key", None);
///
/// // Some gateways: Authorization: Token xxx
/// let auth = ApiKeyAuth::new(SecretString::new(key), "Authorization", Some("Token"));
/// ```
pub struct ApiKeyAuth {
    api_key: SecretString,
    header_name: String,
    prefix: Option<String>,
}

impl ApiKeyAuth {
    /// Create a new API key authenticator.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The API key (stored securely)
    /// * `header_name` - Header carrying the key
    /// * `prefix` - Optional prefix for the header value (e.g., "Token"); empty means none
    pub fn new(api_key: SecretString, header_name: &str, prefix: Option<&str>) -> Self {
        Self {
            api_key,
            header_name: header_name.to_string(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Get a reference to the API key.
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    fn header_value(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{} {}", prefix, self.api_key.expose_secret()),
            None => self.api_key.expose_secret().to_string(),
        }
    }
}

impl ProviderAuth for ApiKeyAuth {
    fn auth_method(&self) -> AuthMethod {
        AuthMethod::ApiKeyHeader {
            header_name: self.header_name.clone(),
            prefix: self.prefix.clone(),
        }
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match HeaderValue::from_str(&self.header_value()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.header(self.header_name.as_str(), value)
            }
            // Keys with characters illegal in a header surface as a builder error on send
            Err(_) => request.header(self.header_name.as_str(), self.header_value()),
        }
    }
}
