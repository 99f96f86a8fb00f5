//! Loops REST payloads.
//!
//! These mirror the directory's JSON shapes and never leave the adapter.
//! [`super::LoopsContactDirectory`] converts them into domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::subscription::{MailingList, MailingListMembership, TransactionalEmail};

/// Contact as returned by `GET contacts/find`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopsContact {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub subscribed: bool,
    #[serde(default)]
    pub mailing_lists: MailingListMembership,
    /// Built-in double opt-in status; only set on directory-managed lists.
    #[serde(default)]
    pub opt_in_status: Option<String>,
    /// Every other property, built-in or custom.
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Mailing list as returned by `GET lists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopsMailingList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<LoopsMailingList> for MailingList {
    fn from(list: LoopsMailingList) -> Self {
        MailingList {
            id: list.id,
            name: list.name,
            description: list.description,
            is_public: list.is_public,
        }
    }
}

/// Transactional template as returned by `GET transactional`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopsTransactionalEmail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub data_variables: Vec<String>,
}

impl From<LoopsTransactionalEmail> for TransactionalEmail {
    fn from(email: LoopsTransactionalEmail) -> Self {
        TransactionalEmail {
            id: email.id,
            name: email.name,
            data_variables: email.data_variables,
        }
    }
}

/// Body of `POST contacts/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub email: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
    pub mailing_lists: MailingListMembership,
}

/// Body of `PUT contacts/update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    pub email: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_lists: Option<MailingListMembership>,
}

/// Body of `POST transactional`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionalRequest {
    pub transactional_id: String,
    pub email: String,
    pub data_variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Date,
}

/// Custom contact property definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactProperty {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

/// Body of `POST contacts/properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePropertyRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

/// Response of create/update calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope for non-2xx answers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_keeps_unknown_fields_as_properties() {
        let json = json!({
            "id": "cll6b3i8901a9jx0oyktl2m4u",
            "email": "adam@loops.so",
            "firstName": "Adam",
            "subscribed": true,
            "mailingLists": {"cm06f5v0e45nf0ml5754o9cix": true},
            "optInStatus": null,
            "xOptInStatus": "accepted",
            "language": "pl"
        });

        let contact: LoopsContact = serde_json::from_value(json).unwrap();

        assert!(contact.subscribed);
        assert_eq!(contact.opt_in_status, None);
        assert_eq!(contact.properties["xOptInStatus"], json!("accepted"));
        assert_eq!(contact.properties["firstName"], json!("Adam"));
        assert!(!contact.properties.contains_key("email"));
    }

    #[test]
    fn update_without_lists_omits_the_field() {
        let request = UpdateContactRequest {
            email: "a@example.com".to_string(),
            properties: [("subscribed".to_string(), json!(false))].into_iter().collect(),
            mailing_lists: None,
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value, json!({"email": "a@example.com", "subscribed": false}));
    }

    #[test]
    fn property_type_wire_name() {
        let request = CreatePropertyRequest {
            name: "language".to_string(),
            property_type: PropertyType::String,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "language", "type": "string"})
        );
    }
}
