// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use ticketdesk_app::filter::{FilterPolicy, MissingAttributePolicy};
use ticketdesk_app::{DashboardSettings, EXPORT_TABLE, KNOWN_TABLES, Locale, TableId};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "ticketdesk";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub tables: Tables,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            tables: Tables::default(),
            filters: Filters::default(),
            export: Export::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tables {
    pub known: Option<Vec<String>>,
    pub export_table: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Filters {
    pub missing_status: Option<String>,
    pub missing_priority: Option<String>,
    pub missing_department: Option<String>,
    pub missing_technician: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TICKETDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set TICKETDESK_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(locale) = &self.ui.locale
            && Locale::parse(locale).is_none()
        {
            bail!(
                "ui.locale in {} must be \"es\" or \"en\", got {locale:?}",
                path.display()
            );
        }

        if let Some(known) = &self.tables.known
            && let Some(blank) = known.iter().position(|table| table.trim().is_empty())
        {
            bail!(
                "tables.known[{blank}] in {} is empty; list table ids such as \"open-tickets\"",
                path.display()
            );
        }

        if let Some(table) = &self.tables.export_table
            && table.trim().is_empty()
        {
            bail!("tables.export_table in {} must not be empty", path.display());
        }

        for (key, value) in self.policy_entries() {
            if let Some(value) = value
                && MissingAttributePolicy::parse(value).is_none()
            {
                bail!(
                    "filters.{key} in {} must be \"exclude\" or \"include\", got {value:?}",
                    path.display()
                );
            }
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter (for example \"warn\" or \"ticketdesk_app=debug\")",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    fn policy_entries(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("missing_status", self.filters.missing_status.as_deref()),
            ("missing_priority", self.filters.missing_priority.as_deref()),
            (
                "missing_department",
                self.filters.missing_department.as_deref(),
            ),
            (
                "missing_technician",
                self.filters.missing_technician.as_deref(),
            ),
        ]
    }

    pub fn locale(&self) -> Locale {
        self.ui
            .locale
            .as_deref()
            .and_then(Locale::parse)
            .unwrap_or_default()
    }

    pub fn policy(&self) -> FilterPolicy {
        let parse = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(MissingAttributePolicy::parse)
                .unwrap_or_default()
        };
        FilterPolicy {
            status: parse(&self.filters.missing_status),
            priority: parse(&self.filters.missing_priority),
            department: parse(&self.filters.missing_department),
            technician: parse(&self.filters.missing_technician),
        }
    }

    pub fn settings(&self) -> DashboardSettings {
        let known_tables = match &self.tables.known {
            Some(known) => known.iter().map(|table| TableId::new(table.trim())).collect(),
            None => KNOWN_TABLES.into_iter().map(TableId::from).collect(),
        };
        DashboardSettings {
            known_tables,
            export_table: TableId::new(
                self.tables
                    .export_table
                    .as_deref()
                    .unwrap_or(EXPORT_TABLE)
                    .trim(),
            ),
            policy: self.policy(),
            locale: self.locale(),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(self.export.dir.as_deref().unwrap_or("."))
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# ticketdesk config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Language of validation alerts: \"es\" or \"en\"\nlocale = \"es\"\n\n[tables]\nknown = [{}]\nexport_table = \"{}\"\n\n[filters]\n# Rows lacking an attribute when that filter is set: \"exclude\" or \"include\"\nmissing_status = \"exclude\"\nmissing_priority = \"exclude\"\nmissing_department = \"exclude\"\nmissing_technician = \"exclude\"\n\n[export]\n# Directory CSV downloads are written to\ndir = \".\"\n\n[log]\n# Overridden by TICKETDESK_LOG\nlevel = \"{}\"\n",
            path.display(),
            KNOWN_TABLES
                .iter()
                .map(|table| format!("\"{table}\""))
                .collect::<Vec<_>>()
                .join(", "),
            EXPORT_TABLE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use ticketdesk_app::filter::MissingAttributePolicy;
    use ticketdesk_app::{Locale, TableId};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.locale(), Locale::Es);
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.export_dir(), PathBuf::from("."));

        let settings = config.settings();
        assert_eq!(settings.known_tables.len(), 5);
        assert_eq!(settings.export_table, TableId::new("all-tickets"));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nlocale = \"en\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_maps_onto_settings() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nlocale = \"en\"\n[tables]\nknown = [\"open-tickets\", \" closed-tickets \"]\nexport_table = \"open-tickets\"\n[filters]\nmissing_department = \"include\"\n[export]\ndir = \"/tmp/exports\"\n[log]\nlevel = \"ticketdesk_app=debug\"\n",
        )?;
        let config = Config::load(&path)?;
        let settings = config.settings();
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(
            settings.known_tables,
            vec![TableId::new("open-tickets"), TableId::new("closed-tickets")]
        );
        assert_eq!(settings.export_table, TableId::new("open-tickets"));
        assert_eq!(settings.policy.department, MissingAttributePolicy::Include);
        assert_eq!(settings.policy.status, MissingAttributePolicy::Exclude);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level(), "ticketdesk_app=debug");
        Ok(())
    }

    #[test]
    fn unknown_locale_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nlocale = \"fr\"\n")?;
        let error = Config::load(&path).expect_err("fr locale should fail");
        assert!(error.to_string().contains("ui.locale"));
        Ok(())
    }

    #[test]
    fn unknown_policy_names_the_key() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[filters]\nmissing_priority = \"maybe\"\n")?;
        let error = Config::load(&path).expect_err("bad policy should fail");
        assert!(error.to_string().contains("filters.missing_priority"));
        Ok(())
    }

    #[test]
    fn blank_table_ids_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[tables]\nknown = [\"open-tickets\", \"\"]\n")?;
        let error = Config::load(&path).expect_err("blank table should fail");
        assert!(error.to_string().contains("tables.known[1]"));

        let (_temp, path) = write_config("version = 1\n[tables]\nexport_table = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank export table should fail");
        assert!(error.to_string().contains("tables.export_table"));
        Ok(())
    }

    #[test]
    fn invalid_log_filter_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"ticketdesk=loud\"\n")?;
        let error = Config::load(&path).expect_err("bad filter should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("TICKETDESK_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("TICKETDESK_CONFIG_PATH");
        }
        assert_eq!(resolved?, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_in_app_dir_without_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("TICKETDESK_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("ticketdesk/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("[filters]"));
        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.settings().known_tables.len(), 5);
        Ok(())
    }
}
