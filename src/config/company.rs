//! Company identity configuration

use serde::Deserialize;

use crate::domain::subscription::CompanyIdentity;

/// Company details shown in the widget and confirmation e-mails
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_address")]
    pub address: String,

    /// Logo URL
    pub logo: Option<String>,
}

impl CompanyConfig {
    pub fn identity(&self) -> CompanyIdentity {
        CompanyIdentity {
            name: self.name.clone(),
            address: self.address.clone(),
            logo: self.logo.clone().filter(|logo| !logo.is_empty()),
        }
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            address: default_address(),
            logo: None,
        }
    }
}

fn default_name() -> String {
    "Company name".to_string()
}

fn default_address() -> String {
    "Address".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_logo_is_dropped() {
        let config = CompanyConfig {
            logo: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.identity().logo, None);
        assert_eq!(config.identity().name, "Company name");
    }
}
