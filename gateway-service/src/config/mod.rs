use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_UPSTREAM_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Root of the remote users/posts service, without a trailing path.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving uploaded images; created at startup.
    pub upload_dir: PathBuf,
    /// JSON file holding the persisted posts snapshot.
    pub posts_file: PathBuf,
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let max_upload_bytes = get_env(
            "UPLOAD_MAX_BYTES",
            Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
            is_prod,
        )?
        .parse()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("UPLOAD_MAX_BYTES is not a valid size: {}", e))
        })?;

        Ok(GatewayConfig {
            common: common_config,
            upstream: UpstreamConfig {
                base_url: get_env("UPSTREAM_BASE_URL", Some(DEFAULT_UPSTREAM_BASE_URL), is_prod)?,
            },
            storage: StorageConfig {
                upload_dir: get_env("UPLOAD_DIR", Some("public/images"), is_prod)?.into(),
                posts_file: get_env("POSTS_FILE", Some("data.json"), is_prod)?.into(),
                max_upload_bytes,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_uses_default_outside_prod() {
        let value = get_env("GATEWAY_TEST_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_in_prod() {
        let err = get_env("GATEWAY_TEST_UNSET_KEY", Some("fallback"), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn get_env_without_default_is_an_error() {
        assert!(get_env("GATEWAY_TEST_UNSET_KEY", None, false).is_err());
    }
}
