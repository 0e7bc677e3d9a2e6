//! Process-wide server state.

use std::sync::Arc;

use drivebridge_provider::{Credentials, DriveClient, DriveConfig, ServiceAccountTokens};
use secrecy::ExposeSecret;

use crate::config::Config;

/// Shared reference to the process-wide [`State`].
pub type ServiceState = Arc<State>;

/// State shared with all HTTP request handlers.
///
/// This structure is created once during server startup and is read-only
/// afterwards; requests never mutate it. In request handlers, use
/// `axum::extract::State<ServiceState>` to retrieve a shared reference.
#[derive(Debug)]
pub struct State {
    /// The server configuration.
    pub config: Config,
    /// The Drive client used to reach the provider.
    pub drive: DriveClient,
}

impl State {
    /// Builds the provider client and assembles the shared state.
    pub fn new(config: Config) -> anyhow::Result<ServiceState> {
        let http = reqwest::Client::builder().build()?;

        let credentials = Credentials::new(
            config.drive.service_account_email.clone(),
            config.drive.private_key.expose_secret().as_str(),
        );
        let token_endpoint = config
            .drive
            .token_endpoint
            .clone()
            .unwrap_or_else(|| drivebridge_provider::TOKEN_ENDPOINT.to_owned());
        let tokens = ServiceAccountTokens::new(credentials, token_endpoint, http.clone());

        let drive = DriveClient::new(
            DriveConfig {
                api_endpoint: config.drive.api_endpoint.clone(),
            },
            Box::new(tokens),
            http,
        );

        Ok(Arc::new(Self { config, drive }))
    }
}
