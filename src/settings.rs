use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::budget::{Budget, Mode};
use crate::error::{KartError, Result};

pub const KEY_BUDGET: &str = "budget";
pub const KEY_BUDGET_MODE: &str = "budgetMode";
pub const KEY_HAS_ONBOARDED: &str = "hasOnboarded";

/// Key-value view over saved user preferences.
pub trait Preferences {
    fn get_double(&self, key: &str) -> f64;
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub budget_mode: Option<String>,
    #[serde(default)]
    pub has_onboarded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            budget: 0.0,
            budget_mode: None,
            has_onboarded: false,
        }
    }
}

impl Preferences for Settings {
    fn get_double(&self, key: &str) -> f64 {
        match key {
            KEY_BUDGET => self.budget,
            _ => 0.0,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match key {
            KEY_BUDGET_MODE => self.budget_mode.clone(),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> bool {
        match key {
            KEY_HAS_ONBOARDED => self.has_onboarded,
            _ => false,
        }
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("KARTSTOPPER_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kartstopper")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("kartstopper")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("could not parse {}: {e}; using defaults", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| KartError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn db_path() -> PathBuf {
    get_data_dir().join("kartstopper.db")
}

/// Change the monthly budget. Once onboarding is done the amount is locked
/// except on the first day of the month.
pub fn set_budget_amount(settings: &mut Settings, amount: f64, day: u32) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(KartError::InvalidAmount(amount.to_string()));
    }
    if settings.has_onboarded {
        let mut budget = Budget::default();
        budget.update_lock(day);
        if budget.is_locked {
            return Err(KartError::BudgetLocked);
        }
    }
    settings.budget = amount;
    settings.has_onboarded = true;
    Ok(())
}

pub fn set_budget_mode(settings: &mut Settings, tag: &str) -> Result<Mode> {
    let mode: Mode = tag.parse().map_err(KartError::UnknownMode)?;
    settings.budget_mode = Some(mode.as_str().to_string());
    Ok(mode)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
