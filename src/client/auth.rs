//! Authentication strategies.

use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

use super::ApiError;

/// How a request is authenticated against the API.
///
/// The transport hands every API request to its authenticator before sending
/// it. Only public (client id) access exists today; a user-token strategy
/// would be another implementation of this trait.
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Short name of the scheme, for logs
    fn scheme(&self) -> &str;

    /// Attach the credential to a request
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Public access with an application access key
///
/// Sends `Authorization: Client-ID <access key>`.
#[derive(Clone)]
pub struct ClientIdAuth {
    access_key: String,
}

impl ClientIdAuth {
    /// Create the strategy, rejecting an empty key
    pub fn new(access_key: impl Into<String>) -> Result<Self, ApiError> {
        let access_key = access_key.into().trim().to_string();
        if access_key.is_empty() {
            return Err(ApiError::Configuration(
                "missing access key: pass --client-id or set UNSPLASH_CLIENT_ID".to_string(),
            ));
        }
        Ok(Self { access_key })
    }

    /// Value of the Authorization header
    pub fn header_value(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for ClientIdAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdAuth")
            .field("access_key", &"<redacted>")
            .finish()
    }
}

impl Authenticator for ClientIdAuth {
    fn scheme(&self) -> &str {
        "client-id"
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.header_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value() {
        let auth = ClientIdAuth::new("abc123").unwrap();
        assert_eq!(auth.header_value(), "Client-ID abc123");
        assert_eq!(auth.scheme(), "client-id");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            ClientIdAuth::new(""),
            Err(ApiError::Configuration(_))
        ));
        assert!(ClientIdAuth::new("   ").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let auth = ClientIdAuth::new("secret-key").unwrap();
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_authorize_sets_header() {
        let auth = ClientIdAuth::new("abc123").unwrap();
        let request = auth
            .authorize(reqwest::Client::new().get("http://localhost/photos"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Client-ID abc123"
        );
    }
}
