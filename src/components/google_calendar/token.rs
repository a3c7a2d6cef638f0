use crate::config::ServiceAccount;
use crate::error::{auth_error, GigResult};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Google's OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read-only calendar scope
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Grant type for exchanging a signed assertion
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion in seconds
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the service account assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer (service account email)
    pub iss: String,
    pub scope: String,
    /// Audience (token endpoint)
    pub aud: String,
    /// Issued at (UTC timestamp)
    pub iat: i64,
    /// Expiration time (UTC timestamp)
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchanges signed service account assertions for bearer tokens
#[derive(Clone)]
pub struct TokenManager {
    client_email: String,
    private_key: String,
    token_url: String,
    client: Client,
}

impl TokenManager {
    pub fn new(account: &ServiceAccount, client: Client) -> Self {
        Self {
            client_email: account.client_email.clone(),
            private_key: account.private_key.clone(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client,
        }
    }

    /// Point the exchange at a different token endpoint
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    /// Claims for an assertion issued at `now`
    pub fn claims(&self, now: DateTime<Utc>) -> AssertionClaims {
        let iat = now.timestamp();
        AssertionClaims {
            iss: self.client_email.clone(),
            scope: CALENDAR_READONLY_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }

    /// Sign an RS256 assertion with the service account key
    pub fn sign_assertion(&self, now: DateTime<Utc>) -> GigResult<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| auth_error(&format!("Invalid service account key: {}", e)))?;

        encode(&Header::new(Algorithm::RS256), &self.claims(now), &key)
            .map_err(|e| auth_error(&format!("Failed to sign assertion: {}", e)))
    }

    /// Request a fresh access token
    pub async fn get_token(&self) -> GigResult<String> {
        let assertion = self.sign_assertion(Utc::now())?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        debug!(
            "Obtained calendar access token (expires in {}s)",
            token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)
        );

        Ok(token.access_token)
    }
}
