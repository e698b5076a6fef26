use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{reject, ProviderError};

const PROVIDER: &str = "ayrshare";
const PROFILE_KEY_HEADER: &str = "Profile-Key";

/// Platforms the posting provider can deliver to, by their wire names.
pub const SUPPORTED_PLATFORMS: &[&str] = &[
    "bluesky",
    "facebook",
    "gmb",
    "instagram",
    "linkedin",
    "pinterest",
    "reddit",
    "telegram",
    "threads",
    "tiktok",
    "twitter",
    "youtube",
];

pub fn unsupported_platforms(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|p| !SUPPORTED_PLATFORMS.contains(&p.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct ProviderProfile {
    #[serde(rename = "profileKey")]
    pub profile_key: String,
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkPage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SendOutcome {
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl SendOutcome {
    /// The provider reports per-platform rejections inside 2xx responses:
    /// `status` flips to "error" and `errors` carries the detail. A 2xx with
    /// this set is a failed publish, not a success.
    pub fn failure_detail(&self) -> Option<String> {
        if self.status != "error" && self.errors.is_empty() {
            return None;
        }
        if self.errors.is_empty() {
            return Some(format!("provider reported status \"{}\"", self.status));
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SocialAccount {
    pub platform: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    #[serde(rename = "activeSocialAccounts", default)]
    active_social_accounts: Vec<String>,
    #[serde(rename = "displayNames", default)]
    display_names: Vec<SocialAccount>,
}

/// Client for the hosted posting provider. Every workspace gets its own
/// provider profile; profile-scoped calls carry its key in a header next to
/// the account-wide bearer key.
#[derive(Clone, Debug)]
pub struct AyrshareClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl AyrshareClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Provision a provider profile for a new workspace.
    pub async fn create_profile(&self, title: &str) -> Result<ProviderProfile, ProviderError> {
        let response = self
            .http
            .post(self.url("/profiles/profile"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        response
            .json::<ProviderProfile>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))
    }

    pub async fn delete_profile(&self, profile_key: &str) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(self.url("/profiles/profile"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "profileKey": profile_key }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        Ok(())
    }

    /// Short-lived hosted page where the user links social accounts.
    pub async fn generate_link_url(&self, profile_key: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(self.url("/profiles/generateJWT"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        let page = response
            .json::<LinkPage>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        Ok(page.url)
    }

    /// Publish immediately or schedule when `schedule_at` is given. The
    /// provider owns delivery and retries from here on.
    pub async fn send_post(
        &self,
        profile_key: &str,
        content: &str,
        platforms: &[String],
        media_urls: &[String],
        schedule_at: Option<DateTime<Utc>>,
    ) -> Result<SendOutcome, ProviderError> {
        let payload = send_post_payload(content, platforms, media_urls, schedule_at);

        let response = self
            .http
            .post(self.url("/post"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        response
            .json::<SendOutcome>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))
    }

    /// Pull a scheduled post back before the provider delivers it.
    pub async fn delete_post(
        &self,
        profile_key: &str,
        ayr_post_id: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(self.url("/post"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .json(&json!({ "id": ayr_post_id }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        Ok(())
    }

    /// Provider-side record of a post, used to refresh scheduled → posted.
    pub async fn post_history(
        &self,
        profile_key: &str,
        ayr_post_id: &str,
    ) -> Result<Value, ProviderError> {
        self.get_json(profile_key, &format!("/history/{}", ayr_post_id))
            .await
    }

    /// Accounts currently linked to the workspace profile.
    pub async fn connected_accounts(
        &self,
        profile_key: &str,
    ) -> Result<Vec<SocialAccount>, ProviderError> {
        let response = self
            .http
            .get(self.url("/user"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        let envelope = response
            .json::<UserEnvelope>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        // displayNames is richer but can lag; fall back to the bare active
        // list for platforms it does not mention yet.
        let mut accounts = envelope.display_names;
        for platform in envelope.active_social_accounts {
            if !accounts.iter().any(|a| a.platform == platform) {
                accounts.push(SocialAccount {
                    platform,
                    display_name: None,
                    username: None,
                    id: None,
                });
            }
        }
        Ok(accounts)
    }

    pub async fn post_comments(
        &self,
        profile_key: &str,
        ayr_post_id: &str,
    ) -> Result<Value, ProviderError> {
        self.get_json(profile_key, &format!("/comments/{}", ayr_post_id))
            .await
    }

    pub async fn direct_messages(
        &self,
        profile_key: &str,
        platform: &str,
    ) -> Result<Value, ProviderError> {
        self.get_json(profile_key, &format!("/messages/{}", platform))
            .await
    }

    pub async fn post_analytics(
        &self,
        profile_key: &str,
        ayr_post_id: &str,
    ) -> Result<Value, ProviderError> {
        let response = self
            .http
            .post(self.url("/analytics/post"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .json(&json!({ "id": ayr_post_id }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))
    }

    pub async fn unlink_social(
        &self,
        profile_key: &str,
        platform: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(self.url("/profiles/social"))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .json(&json!({ "platform": platform }))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        Ok(())
    }

    async fn get_json(&self, profile_key: &str, path: &str) -> Result<Value, ProviderError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header(PROFILE_KEY_HEADER, profile_key)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(reject(PROVIDER, response).await);
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))
    }
}

/// The provider wants camelCase keys, and rejects empty arrays for media.
fn send_post_payload(
    content: &str,
    platforms: &[String],
    media_urls: &[String],
    schedule_at: Option<DateTime<Utc>>,
) -> Value {
    let mut payload = json!({
        "post": content,
        "platforms": platforms,
    });
    if !media_urls.is_empty() {
        payload["mediaUrls"] = json!(media_urls);
    }
    if let Some(at) = schedule_at {
        payload["scheduleDate"] = json!(at.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_immediate_post_payload_has_no_schedule_or_media() {
        let payload = send_post_payload("hello", &["twitter".to_string()], &[], None);
        assert_eq!(payload["post"], "hello");
        assert_eq!(payload["platforms"][0], "twitter");
        assert!(payload.get("scheduleDate").is_none());
        assert!(payload.get("mediaUrls").is_none());
    }

    #[test]
    fn test_scheduled_post_payload_uses_utc_rfc3339() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        let payload = send_post_payload(
            "pi day",
            &["twitter".to_string(), "linkedin".to_string()],
            &["https://cdn.example/pie.png".to_string()],
            Some(at),
        );
        assert_eq!(payload["scheduleDate"], "2026-03-14T15:09:26Z");
        assert_eq!(payload["mediaUrls"][0], "https://cdn.example/pie.png");
    }

    #[test]
    fn test_send_outcome_flags_error_body_behind_2xx() {
        let outcome: SendOutcome = serde_json::from_value(json!({
            "status": "error",
            "errors": [
                { "platform": "twitter", "message": "duplicate content" },
            ],
        }))
        .unwrap();

        let detail = outcome.failure_detail().unwrap();
        assert!(detail.contains("duplicate content"));

        let errorless: SendOutcome =
            serde_json::from_value(json!({ "status": "error" })).unwrap();
        assert!(errorless.failure_detail().unwrap().contains("error"));
    }

    #[test]
    fn test_send_outcome_success_has_no_failure() {
        let outcome: SendOutcome = serde_json::from_value(json!({
            "status": "success",
            "id": "ayr-123",
        }))
        .unwrap();
        assert!(outcome.failure_detail().is_none());
    }

    #[test]
    fn test_unsupported_platforms_are_reported() {
        let requested = vec![
            "twitter".to_string(),
            "myspace".to_string(),
            "linkedin".to_string(),
            "orkut".to_string(),
        ];
        assert_eq!(
            unsupported_platforms(&requested),
            vec!["myspace".to_string(), "orkut".to_string()]
        );
        assert!(unsupported_platforms(&["tiktok".to_string()]).is_empty());
    }
}
