//! Browser Storage
//!
//! Settings and per-view task orders live in `localStorage`.

use serde_json::Value;
use task_order::{OrderStore, OrderStoreError, ViewIdentity};
use thiserror::Error;

pub const TOKEN_KEY: &str = "todoissimus_token";
pub const VIEW_KEY: &str = "todoissimus_view";
pub const OPEN_IN_APP_KEY: &str = "todoissimus_open_in_app";
/// Written by releases that only knew label views
pub const LEGACY_LABEL_KEY: &str = "todoissimus_label";

fn log(msg: &str) {
    web_sys::console::log_1(&format!("[APP] {}", msg).into());
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn read(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("settings storage unavailable")]
    Unavailable,
    #[error("settings could not be encoded: {0}")]
    Encode(String),
    #[error("settings could not be written: {0}")]
    Write(String),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    /// Empty means requests go through the proxy
    pub token: String,
    pub view: ViewIdentity,
    /// Try the installed Todoist app before the web page
    pub open_in_app: bool,
}

impl Settings {
    /// Rebuild settings from raw stored values.
    ///
    /// A stored view wins; without one, a legacy label becomes a label view.
    pub fn from_stored(
        token: Option<String>,
        view_json: Option<String>,
        legacy_label: Option<String>,
        open_in_app: Option<String>,
    ) -> Self {
        let view = view_json
            .and_then(|raw| serde_json::from_str::<ViewIdentity>(&raw).ok())
            .or_else(|| {
                legacy_label
                    .filter(|l| !l.trim().is_empty())
                    .map(ViewIdentity::label)
            })
            .unwrap_or_default();
        Self {
            token: token.unwrap_or_default().trim().to_string(),
            view,
            open_in_app: open_in_app.as_deref() == Some("true"),
        }
    }

    pub fn load() -> Self {
        Self::from_stored(
            read(TOKEN_KEY),
            read(VIEW_KEY),
            read(LEGACY_LABEL_KEY),
            read(OPEN_IN_APP_KEY),
        )
    }

    /// Key/value pairs written by `save`
    pub fn entries(&self) -> Result<Vec<(&'static str, String)>, SettingsError> {
        let view = serde_json::to_string(&self.view).map_err(|e| SettingsError::Encode(e.to_string()))?;
        Ok(vec![
            (TOKEN_KEY, self.token.clone()),
            (VIEW_KEY, view),
            (OPEN_IN_APP_KEY, self.open_in_app.to_string()),
        ])
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let entries = self.entries()?;
        let storage = local_storage().ok_or(SettingsError::Unavailable)?;
        for (key, value) in entries {
            storage
                .set_item(key, &value)
                .map_err(|e| SettingsError::Write(format!("{:?}", e)))?;
        }
        Ok(())
    }
}

/// Parse a stored order, tolerating numeric ids and corrupt values
pub fn decode_order(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Task orders persisted in `localStorage`, one JSON array per view key
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOrderStore;

impl OrderStore for LocalOrderStore {
    fn get(&self, key: &str) -> Vec<String> {
        read(key).map(|raw| decode_order(&raw)).unwrap_or_default()
    }

    fn set(&self, key: &str, ids: &[String]) -> Result<(), OrderStoreError> {
        let result = local_storage()
            .ok_or(OrderStoreError::Unavailable)
            .and_then(|storage| {
                let raw = serde_json::to_string(ids)
                    .map_err(|e| OrderStoreError::Encode(e.to_string()))?;
                storage
                    .set_item(key, &raw)
                    .map_err(|e| OrderStoreError::Write(format!("{:?}", e)))
            });
        if let Err(e) = &result {
            log(&format!("saving order {} failed: {}", key, e));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_order::ViewMode;

    #[test]
    fn test_decode_order() {
        assert_eq!(decode_order(r#"["3","1"]"#), vec!["3", "1"]);
        assert_eq!(decode_order(r#"[3, "1", null]"#), vec!["3", "1"]);
        assert!(decode_order("not json").is_empty());
        assert!(decode_order(r#"{"a":1}"#).is_empty());
    }

    #[test]
    fn test_legacy_label_migrates() {
        let settings = Settings::from_stored(Some("tok".into()), None, Some("focus".into()), None);
        assert_eq!(settings.token, "tok");
        assert_eq!(settings.view, ViewIdentity::label("focus"));
        assert_eq!(settings.view.storage_key(), "todoissimus_order_focus");
    }

    #[test]
    fn test_stored_view_wins_over_legacy_label() {
        let view = serde_json::to_string(&ViewIdentity::new(ViewMode::Filter, "today")).unwrap();
        let settings = Settings::from_stored(None, Some(view), Some("focus".into()), None);
        assert_eq!(settings.view.mode, ViewMode::Filter);
        assert_eq!(settings.view.selector, "today");
        assert_eq!(settings.token, "");
    }

    #[test]
    fn test_nothing_stored() {
        let settings = Settings::from_stored(None, Some("garbage".into()), Some("  ".into()), Some("yes".into()));
        assert_eq!(settings, Settings::default());
        assert!(!settings.view.is_configured());
    }

    #[test]
    fn test_open_in_app_round_trips_through_entries() {
        let settings = Settings {
            token: String::new(),
            view: ViewIdentity::label("home"),
            open_in_app: true,
        };
        let entries = settings.entries().unwrap();
        let stored = |key: &str| entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());
        assert_eq!(stored(OPEN_IN_APP_KEY).as_deref(), Some("true"));

        let restored = Settings::from_stored(
            stored(TOKEN_KEY),
            stored(VIEW_KEY),
            None,
            stored(OPEN_IN_APP_KEY),
        );
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_settings_errors_name_settings() {
        assert_eq!(SettingsError::Unavailable.to_string(), "settings storage unavailable");
        assert!(SettingsError::Write("quota".into()).to_string().starts_with("settings"));
    }
}
