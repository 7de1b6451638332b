//! Gateway radio configuration.

use std::fmt;

use serde::Deserialize;

/// Length of a miio device token.
pub const TOKEN_LENGTH: usize = 32;

/// Number of token characters that may appear in logs.
const TOKEN_LOG_PREFIX: usize = 5;

/// Configuration of one gateway radio.
#[derive(Debug, Clone, Deserialize)]
pub struct MiioRadioConfig {
    /// Address of the gateway.
    pub host: String,
    /// Authentication token of the gateway.
    pub token: Token,
    /// Display name; defaults to `miio_radio_<host with dots replaced>`.
    #[serde(default)]
    pub name: Option<String>,
}

impl MiioRadioConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, token: Token) -> Self {
        Self {
            host: host.into(),
            token,
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown for the radio entity.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("miio_radio_{}", self.host.replace('.', "_")))
    }

    /// Check the fields serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHost`] or [`ConfigError::EmptyName`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }
}

/// A 32 character miio token.
///
/// Never printed in full: `Debug` and [`redacted`](Self::redacted) only
/// show the first characters.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Token(String);

impl Token {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTokenLength`] unless `value` is exactly
    /// [`TOKEN_LENGTH`] characters long.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let length = value.chars().count();
        if length == TOKEN_LENGTH {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidTokenLength(length))
        }
    }

    /// Full token, for handing to the device client only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First characters of the token followed by an ellipsis.
    #[must_use]
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(TOKEN_LOG_PREFIX).collect();
        format!("{prefix}...")
    }
}

impl TryFrom<String> for Token {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.redacted()).finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("token must be 32 characters, got {0}")]
    InvalidTokenLength(usize),
    #[error("host must not be empty")]
    EmptyHost,
    #[error("name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn should_accept_32_character_token() {
        let token = Token::new(TOKEN).unwrap();
        assert_eq!(token.expose(), TOKEN);
    }

    #[test]
    fn should_reject_short_and_long_tokens() {
        assert!(matches!(
            Token::new("abc"),
            Err(ConfigError::InvalidTokenLength(3))
        ));
        assert!(matches!(
            Token::new(format!("{TOKEN}0")),
            Err(ConfigError::InvalidTokenLength(33))
        ));
    }

    #[test]
    fn should_redact_token_in_logs_and_debug() {
        let token = Token::new(TOKEN).unwrap();
        assert_eq!(token.redacted(), "01234...");
        assert_eq!(format!("{token:?}"), "Token(\"01234...\")");
    }

    #[test]
    fn should_derive_default_name_from_host() {
        let config = MiioRadioConfig::new("192.168.1.20", Token::new(TOKEN).unwrap());
        assert_eq!(config.display_name(), "miio_radio_192_168_1_20");
    }

    #[test]
    fn should_prefer_configured_name() {
        let config =
            MiioRadioConfig::new("192.168.1.20", Token::new(TOKEN).unwrap()).with_name("Kitchen");
        assert_eq!(config.display_name(), "Kitchen");
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = format!(
            r#"
            host = "192.168.1.20"
            token = "{TOKEN}"
            name = "Gateway FM"
        "#
        );
        let config: MiioRadioConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config.host, "192.168.1.20");
        assert_eq!(config.token.expose(), TOKEN);
        assert_eq!(config.name.as_deref(), Some("Gateway FM"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_bad_token_when_deserializing() {
        let toml = r#"
            host = "192.168.1.20"
            token = "too-short"
        "#;
        let result: Result<MiioRadioConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_require_host_and_token() {
        let result: Result<MiioRadioConfig, _> = toml::from_str(r#"name = "x""#);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_blank_host_and_name() {
        let token = Token::new(TOKEN).unwrap();
        let config = MiioRadioConfig::new(" ", token.clone());
        assert!(matches!(config.validate(), Err(ConfigError::EmptyHost)));

        let config = MiioRadioConfig::new("10.0.0.2", token).with_name("");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyName)));
    }
}
