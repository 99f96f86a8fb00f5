//! Request and response DTOs for the subscription endpoints.
//!
//! Field names follow the widget's JSON contract (camelCase).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::{SubscribeResult, SubscriptionView, UpdateSubscriptionResult};
use crate::domain::subscription::{
    CompanyIdentity, ContactProperties, MailingList, MailingListMembership, MailingListSubscription,
    OptInStatus, PropertyValue,
};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/subscription`.
///
/// Unknown fields are collected into `properties` and forwarded to the
/// directory. They must be scalars; anything else fails deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "captcha_token")]
    pub captcha_token: Option<String>,
    #[serde(default, alias = "mailing_lists")]
    pub mailing_lists: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl SubscribeRequest {
    pub fn contact_properties(&self) -> ContactProperties {
        self.properties
            .iter()
            .fold(ContactProperties::new(), |properties, (key, value)| {
                properties.with(key.clone(), value.clone())
            })
    }
}

/// Body of `PUT /api/subscription`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    pub email: String,
    pub subscribe: bool,
    #[serde(default)]
    pub mailing_lists: Option<MailingListMembership>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyResponse {
    pub name: String,
    pub address: String,
    pub logo: Option<String>,
}

impl From<&CompanyIdentity> for CompanyResponse {
    fn from(company: &CompanyIdentity) -> Self {
        Self {
            name: company.name.clone(),
            address: company.address.clone(),
            logo: company.logo.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub double_opt_in: bool,
    pub email: String,
}

impl From<SubscribeResult> for SubscribeResponse {
    fn from(result: SubscribeResult) -> Self {
        Self {
            success: true,
            double_opt_in: result.double_opt_in,
            email: result.email,
        }
    }
}

/// One entry of the control panel's list picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailingListSubscriptionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub subscribed: bool,
}

impl From<MailingListSubscription> for MailingListSubscriptionResponse {
    fn from(entry: MailingListSubscription) -> Self {
        Self {
            id: entry.list.id,
            name: entry.list.name,
            description: entry.list.description,
            subscribed: entry.subscribed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub success: bool,
    pub email: String,
    pub subscribed: bool,
    pub opt_in_status: Option<OptInStatus>,
    pub mailing_lists: Vec<MailingListSubscriptionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            success: true,
            email: view.email,
            subscribed: view.subscribed,
            opt_in_status: view.opt_in_status,
            mailing_lists: view.mailing_lists.into_iter().map(Into::into).collect(),
            referer: view.referer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSubscriptionResponse {
    pub success: bool,
    pub email: String,
    pub subscribed: bool,
}

impl From<UpdateSubscriptionResult> for UpdateSubscriptionResponse {
    fn from(result: UpdateSubscriptionResult) -> Self {
        Self {
            success: true,
            email: result.email,
            subscribed: result.subscribed,
        }
    }
}

/// CAPTCHA widget configuration. `site_key` keeps its snake_case name and
/// is an empty string when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaResponse {
    pub success: bool,
    pub provider: &'static str,
    pub site_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingListResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

impl From<MailingList> for MailingListResponse {
    fn from(list: MailingList) -> Self {
        Self {
            id: list.id,
            name: list.name,
            description: list.description,
            is_public: list.is_public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoneypotResponse {
    pub success: bool,
}
