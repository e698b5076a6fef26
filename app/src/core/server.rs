use anyhow::Result;
use std::sync::Arc;

use axum::Router;

use crate::{
    config::config::Config,
    core::{linking::LinkSessionManager, state::AppState},
    database::connect::{connect_database, run_migrations},
    routes::create_routers,
    services::{ayrshare::AyrshareClient, openai::OpenAiClient, resend::ResendClient},
};

pub async fn create_server(config: Config) -> Result<Router<()>> {
    let db_conn = connect_database(&config).await?;
    run_migrations(&db_conn).await?;

    let ayrshare = AyrshareClient::new(
        config.ayrshare_base_url.clone(),
        config.ayrshare_api_key.clone(),
    );
    let openai = OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    );
    let mailer = ResendClient::new(config.resend_api_key.clone(), config.mail_from.clone());

    let state = AppState {
        database: db_conn,
        config,
        ayrshare,
        openai,
        mailer,
        link_sessions: LinkSessionManager::new(),
    };

    let app = create_routers(Arc::new(state));

    Ok(app)
}
