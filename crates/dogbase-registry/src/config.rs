//! # Registry Configuration
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `DOGBASE_CHAIN_ID` | `chain_id` | `31337` |
//! | `DOGBASE_ADMIN` | `admin` | none, must be set |
//! | `DOGBASE_CUSTODY` | `custody` | derived from `"dogbase.custody"` |

use crate::domain::services::default_custody_address;
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use tracing::info;

pub const ENV_CHAIN_ID: &str = "DOGBASE_CHAIN_ID";
pub const ENV_ADMIN: &str = "DOGBASE_ADMIN";
pub const ENV_CUSTODY: &str = "DOGBASE_CUSTODY";

/// Registry deployment configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Collection name.
    pub name: String,
    /// Collection symbol.
    pub symbol: String,
    /// Chain every call must target; stamped on event records.
    pub chain_id: u64,
    /// Initial admin.
    pub admin: Address,
    /// Account that holds attached value while an operation runs.
    pub custody: Address,
    /// Buffer size of the live event feed.
    pub event_log_capacity: usize,
    /// Check structural invariants after every commit.
    pub verify_invariants: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "DogBase".to_string(),
            symbol: "DBT".to_string(),
            chain_id: 31_337,
            admin: Address::ZERO,
            custody: default_custody_address(),
            event_log_capacity: 1024,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl RegistryConfig {
    /// Default configuration administered by `admin`.
    #[must_use]
    pub fn with_admin(admin: Address) -> Self {
        Self {
            admin,
            ..Self::default()
        }
    }

    /// Loads overrides from the process environment and validates the result.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RegistryConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CHAIN_ID) {
            config.chain_id = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidChainId(raw.clone()))?;
        }
        if let Some(raw) = lookup(ENV_ADMIN) {
            config.admin = parse_address(ENV_ADMIN, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CUSTODY) {
            config.custody = parse_address(ENV_CUSTODY, &raw)?;
        }

        config.validate()?;
        info!(
            chain_id = config.chain_id,
            admin = %config.admin,
            custody = %config.custody,
            "Loaded registry configuration"
        );
        Ok(config)
    }

    /// Rejects configurations the registry cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_zero() {
            return Err(ConfigError::ZeroAdmin);
        }
        if self.custody.is_zero() {
            return Err(ConfigError::ZeroCustody);
        }
        Ok(())
    }
}

fn parse_address(var: &'static str, raw: &str) -> Result<Address, ConfigError> {
    Address::from_hex(raw.trim()).map_err(|source| ConfigError::InvalidAddress { var, source })
}
