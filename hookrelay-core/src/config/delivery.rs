//! Outbound delivery settings.

use std::time::Duration;

/// Settings the delivery executor and worker are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Product name used as the `user-agent` prefix.
    pub product_name: String,
    /// Build version of the host; only the first seven characters are sent.
    pub version: Option<String>,
    /// Upper bound for one HTTP attempt, connect through body.
    pub timeout: Duration,
    /// Deliveries allowed in flight at once.
    pub concurrency: usize,
}

impl DeliveryConfig {
    /// `<product>-Webhooks/<version prefix>`, or `<product>-Webhooks` when
    /// no version is known.
    pub fn user_agent(&self) -> String {
        let version = self
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match version {
            Some(v) => {
                let short: String = v.chars().take(7).collect();
                format!("{}-Webhooks/{}", self.product_name, short)
            }
            None => format!("{}-Webhooks", self.product_name),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            product_name: "Hookrelay".to_string(),
            version: None,
            timeout: Duration::from_secs(10),
            concurrency: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_truncates_version() {
        let config = DeliveryConfig {
            product_name: "Acme".to_string(),
            version: Some("3f1c2a9d0b7e".to_string()),
            ..Default::default()
        };
        assert_eq!(config.user_agent(), "Acme-Webhooks/3f1c2a9");
    }

    #[test]
    fn test_user_agent_without_version() {
        let mut config = DeliveryConfig::default();
        assert_eq!(config.user_agent(), "Hookrelay-Webhooks");

        config.version = Some("  ".to_string());
        assert_eq!(config.user_agent(), "Hookrelay-Webhooks");

        config.version = Some("0.1".to_string());
        assert_eq!(config.user_agent(), "Hookrelay-Webhooks/0.1");
    }
}
