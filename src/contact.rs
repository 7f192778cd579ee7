//! Contact form delivery.
//!
//! Validated submissions are sent as plain-text email through a
//! Resend-compatible HTTP API, addressed to the mailbox for the chosen
//! department with `reply_to` set to the sender. When a Turnstile secret is
//! configured the form token is checked with `siteverify` first.
//!
//! Secrets are read from the environment at send time, never from the
//! config file. Each upstream call is a single request with a timeout and
//! no retry.

use anyhow::Result;
use forestal_core::contact::{ContactPayload, Destination};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{Config, ContactConfig};

/// Why a submission could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// A required secret is absent from the environment.
    #[error("environment variable {0} is not set")]
    NotConfigured(String),

    /// The bot-verification token was missing or rejected.
    #[error("bot verification failed")]
    VerificationFailed,

    /// The mail or verification API failed or could not be reached.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: String,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: String,
    text: String,
}

#[derive(Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Sends contact submissions. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: ContactConfig,
    site_name: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.contact.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config: config.contact.clone(),
            site_name: config.site.name.clone(),
        })
    }

    /// Mailbox address for a department.
    pub fn mailbox(&self, destination: Destination) -> &str {
        match destination {
            Destination::Sales => &self.config.sales,
            Destination::Support => &self.config.support,
            Destination::Admin => &self.config.admin,
        }
    }

    /// Whether submissions must carry a Turnstile token.
    pub fn verification_enabled(&self) -> bool {
        self.config.turnstile_secret_env.is_some()
    }

    /// Check a Turnstile token. A no-op when verification is disabled.
    pub async fn verify(&self, token: Option<&str>) -> Result<(), DeliveryError> {
        let Some(env) = &self.config.turnstile_secret_env else {
            return Ok(());
        };
        let secret = read_secret(env)?;
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(DeliveryError::VerificationFailed)?;

        let response = self
            .client
            .post(&self.config.turnstile_url)
            .form(&[("secret", secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| DeliveryError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DeliveryError::Upstream(format!(
                "siteverify returned {}",
                response.status()
            )));
        }
        let verdict: SiteVerifyResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Upstream(e.to_string()))?;
        if !verdict.success {
            debug!(codes = ?verdict.error_codes, "turnstile rejected token");
            return Err(DeliveryError::VerificationFailed);
        }
        Ok(())
    }

    /// Check the mail key, then the token, then send.
    ///
    /// A missing mail key fails before any upstream call is made.
    pub async fn deliver(
        &self,
        token: Option<&str>,
        payload: &ContactPayload,
    ) -> Result<(), DeliveryError> {
        let api_key = read_secret(&self.config.api_key_env)?;
        self.verify(token).await?;
        self.post_email(&api_key, payload).await
    }

    /// Deliver one submission without bot verification.
    pub async fn send(&self, payload: &ContactPayload) -> Result<(), DeliveryError> {
        let api_key = read_secret(&self.config.api_key_env)?;
        self.post_email(&api_key, payload).await
    }

    async fn post_email(&self, api_key: &str, payload: &ContactPayload) -> Result<(), DeliveryError> {
        let to = self.mailbox(payload.destination);
        let sent_at = chrono::Utc::now().to_rfc2822();

        let email = OutgoingEmail {
            from: format!("{} <{}>", self.site_name, to),
            to: [to],
            reply_to: &payload.email,
            subject: payload.subject_line(),
            text: payload.text_body(&self.site_name, &sent_at),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&email)
            .send()
            .await
            .map_err(|e| DeliveryError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "mail API rejected message");
            return Err(DeliveryError::Upstream(format!("mail API returned {status}")));
        }
        debug!(destination = payload.destination.as_str(), "contact message sent");
        Ok(())
    }
}

fn read_secret(env: &str) -> Result<String, DeliveryError> {
    std::env::var(env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DeliveryError::NotConfigured(env.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        toml::from_str(
            r#"
[data]
products = "p.json"
fixtures_dir = "f"
pages_dir = "pages"

[contact]
api_key_env = "FORESTAL_TEST_UNSET_MAIL_KEY"
support = "help@example.com"
"#,
        )
        .unwrap()
    }

    #[test]
    fn routes_to_configured_mailboxes() {
        let mailer = Mailer::new(&config()).unwrap();
        assert_eq!(mailer.mailbox(Destination::Sales), "sales@forestal-mt.com");
        assert_eq!(mailer.mailbox(Destination::Support), "help@example.com");
        assert!(!mailer.verification_enabled());
    }

    #[tokio::test]
    async fn verification_disabled_is_noop() {
        let mailer = Mailer::new(&config()).unwrap();
        assert!(mailer.verify(None).await.is_ok());
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let mailer = Mailer::new(&config()).unwrap();
        let payload = ContactPayload::validate(&serde_json::json!({
            "firstName": "Ana", "lastName": "Reyes", "email": "ana@example.com",
            "country": "Honduras", "phone": "+504 1", "destination": "admin", "message": "Hi"
        }))
        .unwrap();
        let err = mailer.send(&payload).await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotConfigured(ref v) if v == "FORESTAL_TEST_UNSET_MAIL_KEY"));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_verification() {
        std::env::set_var("FORESTAL_TEST_TURNSTILE_SET", "secret");
        let mut cfg = config();
        cfg.contact.turnstile_secret_env = Some("FORESTAL_TEST_TURNSTILE_SET".to_string());
        // Nothing listens here; reaching siteverify would be an upstream error.
        cfg.contact.turnstile_url = "http://127.0.0.1:9/siteverify".to_string();
        let mailer = Mailer::new(&cfg).unwrap();
        let payload = ContactPayload::validate(&serde_json::json!({
            "firstName": "Ana", "lastName": "Reyes", "email": "ana@example.com",
            "country": "Honduras", "phone": "+504 1", "destination": "sales", "message": "Hi"
        }))
        .unwrap();
        let err = mailer.deliver(Some("token"), &payload).await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotConfigured(ref v) if v == "FORESTAL_TEST_UNSET_MAIL_KEY"));
    }
}
