use crate::{
    config::RelayConfig, cookies::CookieSigner, error::Result, provider::ProviderClient,
};

/// Immutable state shared by all handlers.
#[derive(Clone)]
pub struct RelayState {
    pub config: RelayConfig,
    pub cookies: CookieSigner,
    pub provider: ProviderClient,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let cookies = CookieSigner::new(
            config.cookie_secret.as_bytes(),
            config.cookie_prefix.clone(),
            config.secure_cookies,
        );
        let provider = ProviderClient::new(&config)?;
        Ok(Self {
            config,
            cookies,
            provider,
        })
    }
}
