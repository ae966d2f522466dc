use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub from_address: String,
    pub from_name: Option<String>,
    #[serde(flatten)]
    pub provider: EmailProviderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum EmailProviderConfig {
    Log(LogConfig),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// How many sent messages the provider keeps for inspection.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

fn default_outbox_capacity() -> usize {
    100
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

impl EmailConfig {
    pub fn format_from(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_address),
            None => self.from_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tag_parses() {
        let config: EmailConfig = toml_edit::de::from_str(
            r#"
from_address = "noreply@example.com"
from_name = "Majestic Moments"
provider = "log"
outbox_capacity = 5
"#,
        )
        .unwrap();

        assert_eq!(config.format_from(), "Majestic Moments <noreply@example.com>");
        let EmailProviderConfig::Log(log) = config.provider;
        assert_eq!(log.outbox_capacity, 5);
    }
}
