//! Company identity shown in the widget and in confirmation e-mails.

use serde::Serialize;

/// Template variable names the company identity is bound to.
pub const COMPANY_NAME_VARIABLE: &str = "companyName";
pub const COMPANY_ADDRESS_VARIABLE: &str = "companyAddress";
pub const COMPANY_LOGO_VARIABLE: &str = "companyLogo";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyIdentity {
    pub name: String,
    pub address: String,
    pub logo: Option<String>,
}

impl CompanyIdentity {
    /// Template variables for transactional e-mails.
    pub fn template_variables(&self) -> [(&'static str, String); 3] {
        [
            (COMPANY_NAME_VARIABLE, self.name.clone()),
            (COMPANY_ADDRESS_VARIABLE, self.address.clone()),
            (COMPANY_LOGO_VARIABLE, self.logo.clone().unwrap_or_default()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_logo_becomes_empty_variable() {
        let company = CompanyIdentity {
            name: "Acme".to_string(),
            address: "1 Main St".to_string(),
            logo: None,
        };
        let variables = company.template_variables();
        assert_eq!(variables[0], ("companyName", "Acme".to_string()));
        assert_eq!(variables[2], ("companyLogo", String::new()));
    }
}
