use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{reject, ProviderError};

const PROVIDER: &str = "resend";
const SEND_URL: &str = "https://api.resend.com/emails";

/// Transactional email via Resend. Without an API key the client is
/// disabled and sends become no-ops, so local setups need no mail account.
#[derive(Clone, Debug)]
pub struct ResendClient {
    http: Client,
    api_key: Option<String>,
    from: String,
}

impl ResendClient {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            from,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), ProviderError> {
        let Some(api_key) = &self.api_key else {
            debug!(to, subject, "mailer disabled, skipping send");
            return Ok(());
        };

        let response = self
            .http
            .post(SEND_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        Ok(())
    }

    pub async fn send_invitation(
        &self,
        to: &str,
        inviter_name: &str,
        workspace_name: &str,
        role: &str,
        accept_url: &str,
    ) -> Result<(), ProviderError> {
        let subject = format!("{} invited you to {}", inviter_name, workspace_name);
        let html = invitation_html(inviter_name, workspace_name, role, accept_url);
        self.send(to, &subject, &html).await
    }
}

fn invitation_html(inviter: &str, workspace: &str, role: &str, accept_url: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 560px; margin: 0 auto;">
  <h2>You're invited</h2>
  <p><strong>{inviter}</strong> invited you to join <strong>{workspace}</strong> as a {role}.</p>
  <p style="margin: 24px 0;">
    <a href="{accept_url}" style="background: #4f46e5; color: white; padding: 12px 24px; border-radius: 6px; text-decoration: none;">Accept invitation</a>
  </p>
  <p style="color: #666; font-size: 13px;">Or paste this link into your browser:<br>{accept_url}</p>
  <p style="color: #666; font-size: 13px;">If you weren't expecting this, you can ignore this email.</p>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mailer_skips_send() {
        let mailer = ResendClient::new(None, "Tests <no-reply@test>".to_string());
        assert!(!mailer.is_enabled());
        let result = mailer.send("user@example.com", "hi", "<p>hi</p>").await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_invitation_html_mentions_the_essentials() {
        let html = invitation_html(
            "Dana",
            "Acme Social",
            "member",
            "https://app.example/invitations/tok123",
        );
        assert!(html.contains("Dana"));
        assert!(html.contains("Acme Social"));
        assert!(html.contains("as a member"));
        assert!(html.contains("https://app.example/invitations/tok123"));
    }
}
