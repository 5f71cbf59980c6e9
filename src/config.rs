//! Environment configuration

use crate::error::ConfigError;
use std::{env, path::PathBuf, str::FromStr};
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CHECKOUT_PATH: &str = "/pedidos";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory with the catalog JSON documents. `None` uses the bundled catalog.
    pub catalog_dir: Option<PathBuf>,
    /// Page the cart is handed off to on checkout.
    pub checkout_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            port: try_load("CARDAPIO_PORT", DEFAULT_PORT)?,
            catalog_dir: var("CARDAPIO_CATALOG_DIR").map(PathBuf::from),
            checkout_path: var("CARDAPIO_CHECKOUT_PATH")
                .unwrap_or_else(|| DEFAULT_CHECKOUT_PATH.to_string()),
        };

        info!(
            port = config.port,
            catalog_dir = ?config.catalog_dir,
            checkout_path = %config.checkout_path,
            "Config loaded"
        );
        Ok(config)
    }
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            info!("{key} not set, using default");
            None
        }
    }
}

fn try_load<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_rejects_garbage() {
        env::set_var("CARDAPIO_TEST_PORT_GARBAGE", "not-a-port");
        let result: Result<u16, _> = try_load("CARDAPIO_TEST_PORT_GARBAGE", 1);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "CARDAPIO_TEST_PORT_GARBAGE", .. })
        ));
    }

    #[test]
    fn test_try_load_falls_back_to_default() {
        env::remove_var("CARDAPIO_TEST_PORT_UNSET");
        let port: u16 = try_load("CARDAPIO_TEST_PORT_UNSET", 4242).unwrap();
        assert_eq!(port, 4242);
    }
}
