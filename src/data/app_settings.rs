use crate::data::persistence::{Persistable, Store};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub default_project: String,
    pub default_task: String,
    /// Target hours in a full working day, used by the summary's day count.
    pub day_hours: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_project: "Internal".to_string(),
            default_task: "General".to_string(),
            day_hours: 8.0,
        }
    }
}

/// Wrapper mapping AppSettings onto the `settings` key of config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load(store: &Store) -> Result<Self> {
        Ok(store.load::<SettingsWrapper>()?.settings)
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        store.save(&SettingsWrapper {
            settings: self.clone(),
        })
    }
}
