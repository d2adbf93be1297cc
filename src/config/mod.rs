use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    currency::LocaleConfig,
    errors::ConfigError,
    ledger::DEFAULT_PARTNER_NAME,
    report::{ReportOptions, DEFAULT_REPORT_TITLE},
    utils::app_data_dir,
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "locale",
    "currency",
    "statement_path",
    "expenses_path",
    "export_dir",
    "report_title",
    "partner_name",
    "plain_output",
];

/// User preferences for the statement shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    /// Symbol printed before amounts.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Statement loaded on startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "Config::default_report_title")]
    pub report_title: String,
    /// Second beneficiary of a blank statement.
    #[serde(default = "Config::default_partner_name")]
    pub partner_name: String,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            statement_path: None,
            expenses_path: None,
            export_dir: None,
            report_title: Self::default_report_title(),
            partner_name: Self::default_partner_name(),
            plain_output: false,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_currency() -> String {
        "R$".into()
    }

    pub fn default_report_title() -> String {
        DEFAULT_REPORT_TITLE.into()
    }

    pub fn default_partner_name() -> String {
        DEFAULT_PARTNER_NAME.into()
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig {
            currency_symbol: self.currency.clone(),
            ..LocaleConfig::from_tag(&self.locale)
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.report_title.clone(),
            locale: self.locale_config(),
        }
    }

    /// Export directory, defaulting to `~/Documents/Borderos`.
    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Borderos")
    }

    /// Updates one key from its textual form. An empty value clears
    /// optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional_path = || (!value.is_empty()).then(|| PathBuf::from(value));
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_string(),
            "statement_path" => self.statement_path = optional_path(),
            "expenses_path" => self.expenses_path = optional_path(),
            "export_dir" => self.export_dir = optional_path(),
            "report_title" => self.report_title = value.to_string(),
            "partner_name" => self.partner_name = value.to_string(),
            "plain_output" => {
                self.plain_output = matches!(
                    value.to_ascii_lowercase().as_str(),
                    "true" | "yes" | "on" | "1"
                )
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let path = |value: &Option<PathBuf>| {
            value
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".into())
        };
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("statement_path", path(&self.statement_path)),
            ("expenses_path", path(&self.expenses_path)),
            ("export_dir", self.resolve_export_dir().display().to_string()),
            ("report_title", self.report_title.clone()),
            ("partner_name", self.partner_name.clone()),
            ("plain_output", self.plain_output.to_string()),
        ]
    }
}

/// Loads and saves [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<base>/config/config.json`.
    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join(CONFIG_FILE)))
    }

    /// Uses `BORDERO_HOME` or `~/.bordero`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(&app_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
