use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use cashshop_domain::{RuntimeConfig, DEFAULT_COMPARTMENT_CAPACITY, MAX_INVENTORY_SLOTS};

use crate::config::validate_base_url;
use crate::repositories::DEFAULT_IDEMPOTENCY_KEY_CAPACITY;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: String,
    pub catalog_base_url: Option<String>,
    pub character_base_url: Option<String>,
    pub request_timeout_seconds: u64,
    pub reservation_ttl_seconds: u64,
    pub reservation_sweep_seconds: u64,
    pub item_expiration_days: i64,
    pub default_compartment_capacity: u32,
    pub consumer_buffer: usize,
    pub idempotency_key_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            catalog_base_url: None,
            character_base_url: None,
            request_timeout_seconds: 15,
            reservation_ttl_seconds: 300,
            reservation_sweep_seconds: 60,
            item_expiration_days: 30,
            default_compartment_capacity: DEFAULT_COMPARTMENT_CAPACITY,
            consumer_buffer: 256,
            idempotency_key_capacity: DEFAULT_IDEMPOTENCY_KEY_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Reads `CASHSHOP_CONFIG`, falling back to `./config.toml`.
    pub async fn load() -> Result<Self> {
        let path = env::var("CASHSHOP_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(path).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let file_path = path.as_ref();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid {}: {}", file_path.display(), err))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.log_level = self.log_level.trim().to_lowercase();
        self.log_format = self.log_format.trim().to_lowercase();
        if let Some(url) = &self.catalog_base_url {
            if url.trim().is_empty() {
                self.catalog_base_url = None;
            }
        }
        if let Some(url) = &self.character_base_url {
            if url.trim().is_empty() {
                self.character_base_url = None;
            }
        }
        self.catalog_base_url = self.catalog_base_url.take().map(with_trailing_slash);
        self.character_base_url = self.character_base_url.take().map(with_trailing_slash);
        if self.consumer_buffer == 0 {
            self.consumer_buffer = 1;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.reservation_ttl_seconds == 0 {
            return Err(anyhow!("reservation_ttl_seconds must be greater than 0"));
        }
        if self.reservation_sweep_seconds == 0 {
            return Err(anyhow!("reservation_sweep_seconds must be greater than 0"));
        }
        if self.reservation_sweep_seconds > self.reservation_ttl_seconds {
            return Err(anyhow!(
                "reservation_sweep_seconds must not exceed reservation_ttl_seconds"
            ));
        }
        if self.default_compartment_capacity == 0
            || self.default_compartment_capacity > MAX_INVENTORY_SLOTS
        {
            return Err(anyhow!(
                "default_compartment_capacity must be within 1..={}",
                MAX_INVENTORY_SLOTS
            ));
        }
        if self.item_expiration_days <= 0 {
            return Err(anyhow!("item_expiration_days must be greater than 0"));
        }
        if self.idempotency_key_capacity == 0 {
            return Err(anyhow!("idempotency_key_capacity must be greater than 0"));
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("log_format must be text or json"));
        }
        if let Some(url) = &self.catalog_base_url {
            validate_base_url("catalog_base_url", url)?;
        }
        if let Some(url) = &self.character_base_url {
            validate_base_url("character_base_url", url)?;
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            reservation_ttl_seconds: self.reservation_ttl_seconds,
            reservation_sweep_seconds: self.reservation_sweep_seconds,
            item_expiration_days: self.item_expiration_days,
            default_compartment_capacity: self.default_compartment_capacity,
            request_timeout_seconds: self.request_timeout_seconds,
            consumer_buffer: self.consumer_buffer,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("CASHSHOP_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("CASHSHOP_LOG_FORMAT") {
            self.log_format = value;
        }
        if let Some(value) = lookup("CASHSHOP_CATALOG_BASE_URL") {
            self.catalog_base_url = Some(value);
        }
        if let Some(value) = lookup("CASHSHOP_CHARACTER_BASE_URL") {
            self.character_base_url = Some(value);
        }
        if let Some(value) = lookup("CASHSHOP_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("CASHSHOP_RESERVATION_TTL_SECONDS") {
            self.reservation_ttl_seconds = value.parse().unwrap_or(self.reservation_ttl_seconds);
        }
        if let Some(value) = lookup("CASHSHOP_RESERVATION_SWEEP_SECONDS") {
            self.reservation_sweep_seconds =
                value.parse().unwrap_or(self.reservation_sweep_seconds);
        }
        if let Some(value) = lookup("CASHSHOP_ITEM_EXPIRATION_DAYS") {
            self.item_expiration_days = value.parse().unwrap_or(self.item_expiration_days);
        }
        if let Some(value) = lookup("CASHSHOP_DEFAULT_COMPARTMENT_CAPACITY") {
            self.default_compartment_capacity =
                value.parse().unwrap_or(self.default_compartment_capacity);
        }
        if let Some(value) = lookup("CASHSHOP_CONSUMER_BUFFER") {
            self.consumer_buffer = value.parse().unwrap_or(self.consumer_buffer);
        }
        if let Some(value) = lookup("CASHSHOP_IDEMPOTENCY_KEY_CAPACITY") {
            self.idempotency_key_capacity =
                value.parse().unwrap_or(self.idempotency_key_capacity);
        }
    }
}

fn with_trailing_slash(url: String) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
