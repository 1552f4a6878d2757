//! Gmail OAuth2 credential exchange.
//!
//! Access tokens are minted from a long-lived refresh token via the
//! `refresh_token` grant and cached until shortly before expiry.  The cache
//! sits behind a `tokio::sync::Mutex`, so concurrent first calls perform a
//! single exchange.

use serde::Deserialize;
use tokio::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{MailError, Result};

/// Google OAuth2 token endpoint.
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry.
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// Fallback lifetime when the provider omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// OAuth2 client credentials plus the stored refresh token.
#[derive(Debug, Clone, Default)]
pub struct GmailCredentials {
    /// OAuth2 client ID from the Google Cloud console.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Long-lived refresh token for the mailbox owner.
    pub refresh_token: String,
}

impl GmailCredentials {
    /// Create credentials from their three parts.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Whether all three parts are present.
    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty()
            && !self.client_secret.trim().is_empty()
            && !self.refresh_token.trim().is_empty()
    }
}

/// Wire format of the token endpoint's answer.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// A minted access token and when to stop trusting it.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_after: Instant,
}

/// Exchanges the refresh token for access tokens and caches the result.
pub struct TokenProvider {
    credentials: GmailCredentials,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider for the given credentials.
    pub fn new(credentials: GmailCredentials, http: reqwest::Client) -> Self {
        Self {
            credentials,
            http,
            cached: Mutex::new(None),
        }
    }

    /// The credentials this provider exchanges.
    pub fn credentials(&self) -> &GmailCredentials {
        &self.credentials
    }

    /// Return a valid access token, exchanging the refresh token if the
    /// cached one is missing or close to expiry.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_after
        {
            return Ok(token.access_token.clone());
        }

        let fresh = self.exchange().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Perform the `refresh_token` grant against the token endpoint.
    async fn exchange(&self) -> Result<CachedToken> {
        if !self.credentials.is_configured() {
            return Err(MailError::Auth {
                reason: "Gmail credentials are not configured".into(),
            });
        }

        tracing::debug!("exchanging refresh token for access token");

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| MailError::Transport {
            reason: format!("failed to read token response: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "refresh token exchange rejected");
            return Err(MailError::Auth {
                reason: format!("token exchange returned {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| MailError::Malformed {
                reason: format!("invalid token response: {e}"),
            })?;

        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let refresh_after = Instant::now() + lifetime.saturating_sub(EXPIRY_BUFFER);

        tracing::info!("access token refreshed");

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_parts_are_not_configured() {
        assert!(!GmailCredentials::default().is_configured());
        assert!(!GmailCredentials::new("id", "  ", "tok").is_configured());
        assert!(GmailCredentials::new("id", "secret", "tok").is_configured());
    }

    #[tokio::test]
    async fn missing_credentials_fail_with_auth_error() {
        let provider = TokenProvider::new(GmailCredentials::default(), reqwest::Client::new());
        match provider.access_token().await {
            Err(MailError::Auth { reason }) => assert!(reason.contains("not configured")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }
}
