use sea_orm::DatabaseConnection;

use crate::config::config::Config;
use crate::services::{ayrshare::AyrshareClient, openai::OpenAiClient, resend::ResendClient};

use super::linking::LinkSessionManager;

#[derive(Clone, Debug)]
pub struct AppState {
    pub database: DatabaseConnection,
    pub config: Config,
    pub ayrshare: AyrshareClient,
    pub openai: OpenAiClient,
    pub mailer: ResendClient,
    pub link_sessions: LinkSessionManager,
}
