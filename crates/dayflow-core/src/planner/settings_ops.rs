//! Settings operations for the Planner.

use log::info;

use super::Planner;
use crate::{
    credential::validate_api_key,
    db::settings_queries::{API_KEY_SETTING, LANGUAGE_SETTING},
    error::{PlannerError, Result},
    models::Language,
    params::{Confirm, SetApiKey},
    sync::SyncSettings,
};

/// Current settings, with the API key masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsOverview {
    /// First and last four characters of the stored key
    pub masked_api_key: Option<String>,
    pub language: Language,
    pub sync: Option<SyncSettings>,
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

impl Planner {
    /// Stores the API key after a shape check.
    pub async fn set_api_key(&self, params: &SetApiKey) -> Result<()> {
        let key = validate_api_key(&params.key)?.to_string();
        self.with_database(move |db| db.set_setting(API_KEY_SETTING, &key))
            .await?;
        info!("API key updated");
        Ok(())
    }

    /// Removes the stored API key. Returns false when none was stored.
    pub async fn remove_api_key(&self, params: &Confirm) -> Result<bool> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("Removing the API key requires confirmation"));
        }
        self.with_database(|db| db.delete_setting(API_KEY_SETTING))
            .await
    }

    pub async fn language(&self) -> Result<Language> {
        self.with_database(|db| db.language()).await
    }

    /// Sets the default prompt language.
    pub async fn set_language(&self, language: Language) -> Result<()> {
        self.with_database(move |db| db.set_setting(LANGUAGE_SETTING, language.as_str()))
            .await
    }

    pub async fn settings(&self) -> Result<SettingsOverview> {
        self.with_database(|db| {
            Ok(SettingsOverview {
                masked_api_key: db.api_key()?.as_deref().map(mask_key),
                language: db.language()?,
                sync: db.sync_settings()?,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::mask_key;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AIzaSyA1234567890abcdefghijklmnop"), "AIza…mnop");
        assert_eq!(mask_key("short"), "*****");
    }
}
