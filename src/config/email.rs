//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::inventory::is_http_url;

/// Email configuration (SendGrid)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SendGrid API key
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Subject of booking confirmations
    #[serde(default = "default_subject")]
    pub confirmation_subject: String,

    /// API base URL override
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sendgrid_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("SENDGRID_API_KEY"));
        }
        if !self.sendgrid_api_key.starts_with("SG.") {
            return Err(ValidationError::InvalidSendGridKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("EMAIL__BASE_URL"));
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sendgrid_api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            confirmation_subject: default_subject(),
            base_url: default_base_url(),
        }
    }
}

fn default_from_email() -> String {
    "bookings@yourtravelagency.com".to_string()
}

fn default_from_name() -> String {
    "Your Travel Agency".to_string()
}

fn default_subject() -> String {
    "Your Trip Confirmation".to_string()
}

fn default_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.from_email, "bookings@yourtravelagency.com");
        assert_eq!(config.confirmation_subject, "Your Trip Confirmation");
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            from_name: "Trips".to_string(),
            from_email: "trips@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Trips <trips@example.com>");
    }

    #[test]
    fn test_validation_invalid_key_prefix() {
        let config = EmailConfig {
            sendgrid_api_key: "re_xxx".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSendGridKey));
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            sendgrid_api_key: "SG.xxx".to_string(),
            from_email: "not-an-email".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = EmailConfig {
            sendgrid_api_key: "SG.abc".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
