use crate::events::{AppType, InstallEvent, InstallType};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub host: HostConfig,
    pub blocking: BlockingConfig,
    pub allowlist: AllowlistConfig,
    // Оптимизационный индекс - не сериализуется, строится после загрузки
    #[serde(skip)]
    blocked_type_set: HashSet<AppType>, // O(1) lookup для removal-набора
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub mode: String,
    pub dry_run_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Типы приложений, которые удаляются при пользовательской установке
    pub blocked_app_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowlistConfig {
    /// URL-префиксы, освобождённые от перенаправления в обычную вкладку
    #[serde(default)]
    pub url_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "wab_rust=info".to_string(),
            },
            host: HostConfig {
                mode: "native".to_string(),
                dry_run_interval_ms: 10_000,
            },
            blocking: BlockingConfig {
                blocked_app_types: vec![
                    "hosted_app".to_string(),
                    "legacy_packaged_app".to_string(),
                ],
            },
            allowlist: AllowlistConfig {
                url_prefixes: Vec::new(),
            },
            blocked_type_set: HashSet::new(),
        };
        config.build_optimization_indexes();
        config
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WAB_"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        config.build_optimization_indexes();

        Ok(config)
    }

    /// Строит оптимизационный индекс для быстрой проверки removal-набора
    pub fn build_optimization_indexes(&mut self) {
        self.blocked_type_set = self
            .blocking
            .blocked_app_types
            .iter()
            .filter_map(|name| AppType::from_config_name(name))
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек хоста
        match self.host.mode.as_str() {
            "native" => {}
            _ => anyhow::bail!("Неизвестный режим хоста: {}", self.host.mode),
        }

        if self.host.dry_run_interval_ms < 100 {
            anyhow::bail!("dry_run_interval_ms должно быть минимум 100");
        }

        // Валидация removal-набора
        for (i, name) in self.blocking.blocked_app_types.iter().enumerate() {
            if AppType::from_config_name(name).is_none() {
                anyhow::bail!(
                    "Неизвестный тип приложения '{}' в blocked_app_types #{} (допустимы: {})",
                    name,
                    i + 1,
                    AppType::KNOWN_NAMES.join(", ")
                );
            }
        }

        // Валидация allowlist
        for (i, prefix) in self.allowlist.url_prefixes.iter().enumerate() {
            if prefix.is_empty() {
                anyhow::bail!("Пустой префикс в allowlist #{}", i + 1);
            }
        }

        Ok(())
    }

    /// ЕДИНСТВЕННЫЙ метод проверки удаления: тип входит в removal-набор,
    /// а установка не принудительная администраторская
    pub fn should_remove(&self, event: &InstallEvent) -> bool {
        // Быстрая проверка по индексу (O(1))
        if !self.blocked_type_set.contains(&event.app_type) {
            return false;
        }

        // Админские установки не трогаем никогда
        event.install_type != InstallType::Admin
    }

    /// Проверить, освобождён ли URL от перенаправления.
    /// Обычное префиксное сравнение, без нормализации URL.
    pub fn is_allowlisted(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }

        self.allowlist
            .url_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}
