use dioxus::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub theme_storage_key: String,
    pub loading_duration_ms: u32,
    pub submit_delay_ms: u32,
    pub notification_timeout_ms: u32,
    pub motion_threshold_px: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: "portfolio-theme".to_string(),
            loading_duration_ms: 4000,
            submit_delay_ms: 2000,
            notification_timeout_ms: 5000,
            motion_threshold_px: 50.0,
        }
    }
}

impl RuntimeConfig {
    /// Clamps values that would stall or break the page back into range.
    fn sanitized(mut self) -> Self {
        if self.theme_storage_key.trim().is_empty() {
            self.theme_storage_key = Self::default().theme_storage_key;
        }
        self.loading_duration_ms = self.loading_duration_ms.clamp(100, 30_000);
        self.submit_delay_ms = self.submit_delay_ms.min(30_000);
        self.notification_timeout_ms = self.notification_timeout_ms.clamp(1000, 60_000);
        if !self.motion_threshold_px.is_finite() || self.motion_threshold_px <= 0.0 {
            self.motion_threshold_px = Self::default().motion_threshold_px;
        }
        self
    }
}

/// Runtime config with a fallback to defaults; a missing config file never
/// blocks the page.
pub fn use_runtime_config() -> Resource<RuntimeConfig> {
    use_resource(|| async move {
        match fetch_runtime_config().await {
            Ok(config) => config.sanitized(),
            Err(message) => {
                tracing::warn!("config: {message}, using defaults");
                RuntimeConfig::default()
            }
        }
    })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    match fetch_config_from("/config.json").await {
        Ok(config) => Ok(config),
        Err(_) => fetch_config_from("/assets/config.json").await,
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_config_from(path: &str) -> Result<RuntimeConfig, String> {
    let response = gloo_net::http::Request::get(path)
        .send()
        .await
        .map_err(|err| format!("config fetch failed: {err}"))?;
    if !response.ok() {
        return Err(format!("config fetch failed: status {}", response.status()));
    }
    response
        .json::<RuntimeConfig>()
        .await
        .map_err(|err| format!("config decode failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    Ok(config_from_env(|name| std::env::var(name).ok()))
}

#[cfg(not(target_arch = "wasm32"))]
fn config_from_env(var: impl Fn(&str) -> Option<String>) -> RuntimeConfig {
    let defaults = RuntimeConfig::default();
    let number = |name: &str, fallback: u32| {
        var(name)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(fallback)
    };
    RuntimeConfig {
        theme_storage_key: var("THEME_STORAGE_KEY").unwrap_or(defaults.theme_storage_key),
        loading_duration_ms: number("LOADING_DURATION_MS", defaults.loading_duration_ms),
        submit_delay_ms: number("SUBMIT_DELAY_MS", defaults.submit_delay_ms),
        notification_timeout_ms: number("NOTIFICATION_TIMEOUT_MS", defaults.notification_timeout_ms),
        motion_threshold_px: var("MOTION_THRESHOLD_PX")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .unwrap_or(defaults.motion_threshold_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"submit_delay_ms": 500}"#).unwrap();
        assert_eq!(config.submit_delay_ms, 500);
        assert_eq!(config.theme_storage_key, "portfolio-theme");
        assert_eq!(config.loading_duration_ms, 4000);
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let config = RuntimeConfig {
            theme_storage_key: "  ".to_string(),
            loading_duration_ms: 0,
            submit_delay_ms: 999_999,
            notification_timeout_ms: 10,
            motion_threshold_px: f64::NAN,
        }
        .sanitized();
        assert_eq!(config.theme_storage_key, "portfolio-theme");
        assert_eq!(config.loading_duration_ms, 100);
        assert_eq!(config.submit_delay_ms, 30_000);
        assert_eq!(config.notification_timeout_ms, 1000);
        assert_eq!(config.motion_threshold_px, 50.0);
    }

    #[test]
    fn env_overrides_and_ignores_garbage() {
        let config = config_from_env(|name| match name {
            "SUBMIT_DELAY_MS" => Some("250".to_string()),
            "LOADING_DURATION_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.submit_delay_ms, 250);
        assert_eq!(config.loading_duration_ms, 4000);
    }
}
