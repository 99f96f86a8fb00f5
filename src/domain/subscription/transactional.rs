//! Transactional e-mail templates and confirmation template selection.

use serde::{Deserialize, Serialize};

/// Template placeholder receiving the confirmation link.
pub const OPT_IN_URL_VARIABLE: &str = "xOptInUrl";

/// A directory-side transactional e-mail template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionalEmail {
    pub id: String,
    /// Template name; a `#XX` suffix marks the template language.
    pub name: String,
    #[serde(default)]
    pub data_variables: Vec<String>,
}

impl TransactionalEmail {
    /// True when the template can carry a confirmation link.
    pub fn is_double_opt_in(&self) -> bool {
        self.data_variables
            .iter()
            .any(|variable| variable == OPT_IN_URL_VARIABLE)
    }

    pub fn is_in_language(&self, language: &str) -> bool {
        self.name
            .contains(&format!("#{}", language.to_uppercase()))
    }
}

/// Picks the confirmation template from the complete catalog.
///
/// Only templates expecting [`OPT_IN_URL_VARIABLE`] qualify. Among those the
/// first one tagged with the requested language wins, otherwise the first
/// qualifying one in catalog order. Returns `None` when nothing qualifies.
pub fn select_double_opt_in<'a>(
    catalog: &'a [TransactionalEmail],
    language: Option<&str>,
) -> Option<&'a TransactionalEmail> {
    let mut qualifying = catalog.iter().filter(|email| email.is_double_opt_in());
    let first = qualifying.clone().next()?;

    match language.filter(|language| !language.is_empty()) {
        Some(language) => Some(
            qualifying
                .find(|email| email.is_in_language(language))
                .unwrap_or(first),
        ),
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, name: &str, variables: &[&str]) -> TransactionalEmail {
        TransactionalEmail {
            id: id.to_string(),
            name: name.to_string(),
            data_variables: variables.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn catalog() -> Vec<TransactionalEmail> {
        vec![
            template("welcome", "Welcome #PL", &["firstName"]),
            template("email-en", "Double Opt-In #EN", &["xOptInUrl", "companyName"]),
            template("email-pl", "Double Opt-In #PL", &["xOptInUrl"]),
        ]
    }

    #[test]
    fn selects_requested_language() {
        let catalog = catalog();
        let selected = select_double_opt_in(&catalog, Some("pl")).unwrap();
        assert_eq!(selected.id, "email-pl");
    }

    #[test]
    fn language_match_ignores_non_qualifying_templates() {
        // "Welcome #PL" matches the language but has no opt-in link.
        let catalog = catalog();
        let selected = select_double_opt_in(&catalog, Some("PL")).unwrap();
        assert_eq!(selected.id, "email-pl");
    }

    #[test]
    fn unmapped_language_falls_back_to_first_qualifying() {
        let catalog = catalog();
        let selected = select_double_opt_in(&catalog, Some("de")).unwrap();
        assert_eq!(selected.id, "email-en");
    }

    #[test]
    fn no_language_selects_first_qualifying() {
        let catalog = catalog();
        let selected = select_double_opt_in(&catalog, None).unwrap();
        assert_eq!(selected.id, "email-en");
    }

    #[test]
    fn nothing_qualifies() {
        let catalog = vec![template("welcome", "Welcome", &["firstName"])];
        assert!(select_double_opt_in(&catalog, Some("en")).is_none());
        assert!(select_double_opt_in(&[], None).is_none());
    }
}
