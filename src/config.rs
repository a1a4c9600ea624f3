//! Build-time configuration for the theme storage key and rendering policies,
//! with an optional runtime override. The runtime config is read from
//! `window.RESTFUL_SOUNDS_CONFIG` (if present) so static deployments can change
//! the values without rebuilding.

use crate::{components::Strictness, errors::Error, theme::StoragePolicy};
use serde::Deserialize;

/// Storage key used when no build-time or runtime value is supplied.
pub const DEFAULT_STORAGE_KEY: &str = "restful-sounds-theme";

/// Site configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub storage_key: String,
    pub strictness: Strictness,
    pub storage_policy: StoragePolicy,
}

/// The part of [`AppConfig`] the theme manager needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub storage_policy: StoragePolicy,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_policy: StoragePolicy::default(),
        }
    }
}

impl ThemeConfig {
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_storage_policy(mut self, policy: StoragePolicy) -> Self {
        self.storage_policy = policy;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            strictness: Strictness::default(),
            storage_policy: StoragePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let mut config = Self::from_build_env();

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    fn from_build_env() -> Self {
        let mut config = Self::default();
        apply_runtime_overrides(
            &mut config,
            RuntimeConfig {
                storage_key: option_env!("RESTFUL_SOUNDS_THEME_KEY").map(str::to_string),
                strictness: option_env!("RESTFUL_SOUNDS_STRICT_CARDS").map(str::to_string),
                storage_policy: option_env!("RESTFUL_SOUNDS_STORAGE_POLICY").map(str::to_string),
            },
        );
        config
    }

    /// Applies overrides from a JSON object such as
    /// `{"storage_key": "...", "strictness": "strict", "storage_policy": "fail"}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the payload is not a JSON object of strings.
    pub fn with_overrides_json(mut self, json: &str) -> Result<Self, Error> {
        let runtime: RuntimeConfig = serde_json::from_str(json)
            .map_err(|err| Error::Config(format!("invalid config overrides: {err}")))?;
        apply_runtime_overrides(&mut self, runtime);
        Ok(self)
    }

    #[must_use]
    pub fn theme(&self) -> ThemeConfig {
        ThemeConfig {
            storage_key: self.storage_key.clone(),
            storage_policy: self.storage_policy,
        }
    }
}

#[derive(Default, Deserialize)]
struct RuntimeConfig {
    #[serde(default)]
    storage_key: Option<String>,
    #[serde(default)]
    strictness: Option<String>,
    #[serde(default)]
    storage_policy: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime
        .storage_key
        .as_deref()
        .and_then(normalize_runtime_value)
    {
        config.storage_key = value;
    }
    if let Some(value) = runtime
        .strictness
        .as_deref()
        .and_then(normalize_runtime_value)
    {
        match parse_strictness(&value) {
            Some(strictness) => config.strictness = strictness,
            None => tracing::warn!(value = %value, "ignoring unknown card strictness"),
        }
    }
    if let Some(value) = runtime
        .storage_policy
        .as_deref()
        .and_then(normalize_runtime_value)
    {
        match parse_storage_policy(&value) {
            Some(policy) => config.storage_policy = policy,
            None => tracing::warn!(value = %value, "ignoring unknown storage policy"),
        }
    }
}

fn parse_strictness(value: &str) -> Option<Strictness> {
    match value.to_lowercase().as_str() {
        "strict" | "true" | "1" => Some(Strictness::Strict),
        "lenient" | "false" | "0" => Some(Strictness::Lenient),
        _ => None,
    }
}

fn parse_storage_policy(value: &str) -> Option<StoragePolicy> {
    match value.to_lowercase().as_str() {
        "memory" | "fallback" => Some(StoragePolicy::FallbackToMemory),
        "fail" | "strict" => Some(StoragePolicy::Fail),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("RESTFUL_SOUNDS_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        storage_key: read_runtime_value(&object, "storage_key"),
        strictness: read_runtime_value(&object, "strictness"),
        storage_policy: read_runtime_value(&object, "storage_policy"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
