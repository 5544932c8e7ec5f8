//! Link configuration
//!
//! Runtime knobs for the resolver. Hardware framing (baud rate, parity) lives
//! in [`serlink_hal::UartConfig`] and is applied once at startup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default byte budget per resolver pass
pub const DEFAULT_RESOLVE_BUDGET: u16 = 32;

/// Default period between resolver passes
pub const DEFAULT_RESOLVE_INTERVAL_MS: u16 = 1;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Resolver interval must be non-zero
    ZeroInterval,
    /// Postcard (de)serialization failed
    Serialization,
}

/// Resolver and codec configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Iterations allowed per resolver pass (0 makes a pass a no-op)
    pub resolve_budget: u16,
    /// Period between resolver passes in the firmware main loop
    pub resolve_interval_ms: u16,
    /// Inbound silence after which a partial message is abandoned (0 = never)
    pub inbound_timeout_ms: u16,
    /// Whether outbound traffic may start as soon as the link is up
    pub transmit_enabled: bool,
    /// Send `type >> 6` payload bytes for fixed-size classes
    pub derive_size_from_subtype: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            resolve_budget: DEFAULT_RESOLVE_BUDGET,
            resolve_interval_ms: DEFAULT_RESOLVE_INTERVAL_MS,
            inbound_timeout_ms: 0,
            transmit_enabled: true,
            derive_size_from_subtype: true,
        }
    }
}

impl LinkConfig {
    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolve_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Serialize to postcard binary form, returning the bytes used
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialization)
    }

    /// Deserialize from postcard binary form and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Serialization)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LinkConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.transmit_enabled);
        assert!(config.derive_size_from_subtype);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = LinkConfig {
            resolve_interval_ms: 0,
            ..LinkConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let config = LinkConfig {
            resolve_budget: 64,
            resolve_interval_ms: 5,
            inbound_timeout_ms: 20,
            transmit_enabled: false,
            derive_size_from_subtype: false,
        };
        let mut buf = [0u8; 32];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(LinkConfig::from_bytes(&buf[..used]), Ok(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_bytes_validates() {
        let config = LinkConfig {
            resolve_interval_ms: 0,
            ..LinkConfig::default()
        };
        let mut buf = [0u8; 32];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            LinkConfig::from_bytes(&buf[..used]),
            Err(ConfigError::ZeroInterval)
        );
        assert_eq!(
            LinkConfig::from_bytes(&[]),
            Err(ConfigError::Serialization)
        );
    }
}
