use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_server_ip")]
    pub server_ip: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    pub jwt_secret: String,
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,

    /// Key sealing posting-provider profile keys at rest.
    pub encryption_key: String,

    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,

    pub ayrshare_api_key: String,
    #[serde(default = "default_ayrshare_base_url")]
    pub ayrshare_base_url: String,

    pub openai_api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Mailer is disabled when unset; invitations still get created.
    pub resend_api_key: Option<String>,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    /// SPA origin used in invitation/link URLs.
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,

    #[serde(default = "default_invite_expiry_days")]
    pub invite_expiry_days: i64,

    #[serde(default = "default_link_session_ttl_secs")]
    pub link_session_ttl_secs: i64,

    /// When unset, CORS is permissive (dev mode).
    pub cors_allowed_origin: Option<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_server_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    2
}
fn default_jwt_expiry_hours() -> i64 {
    72
}
fn default_ayrshare_base_url() -> String {
    "https://app.ayrshare.com/api".to_string()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_mail_from() -> String {
    "Postpilot <no-reply@postpilot.app>".to_string()
}
fn default_app_base_url() -> String {
    "http://localhost:5173".to_string()
}
fn default_invite_expiry_days() -> i64 {
    7
}
fn default_link_session_ttl_secs() -> i64 {
    300
}

impl Config {
    pub fn load_envs() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
