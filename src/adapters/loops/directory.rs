//! [`ContactDirectory`] backed by Loops.
//!
//! Loops only reports its built-in opt-in status for lists it manages, so the
//! service keeps its own `xOptInStatus` property and reconciles the two on
//! every read.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::subscription::{
    select_double_opt_in, CompanyIdentity, Contact, ContactProperties, MailingList,
    MailingListMembership, OptInStatus, PropertyValue, SubscriptionError, TransactionalEmail,
    CUSTOM_OPT_IN_STATUS_PROPERTY, LANGUAGE_PROPERTY, OPT_IN_URL_VARIABLE, REFERER_PROPERTY,
};
use crate::ports::ContactDirectory;

use super::api::LoopsApi;
use super::pagination::{drain, DEFAULT_PAGE_SIZE};
use super::types::{
    CreateContactRequest, CreatePropertyRequest, LoopsContact, PropertyType,
    SendTransactionalRequest, UpdateContactRequest,
};

/// Custom properties the service writes.
const REQUIRED_CUSTOM_PROPERTIES: [&str; 2] = [LANGUAGE_PROPERTY, CUSTOM_OPT_IN_STATUS_PROPERTY];

pub struct LoopsContactDirectory {
    api: Arc<dyn LoopsApi>,
    company: CompanyIdentity,
    page_size: u32,
}

impl LoopsContactDirectory {
    pub fn new(api: Arc<dyn LoopsApi>, company: CompanyIdentity) -> Self {
        Self {
            api,
            company,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    async fn public_list_ids(&self) -> Result<Vec<String>, SubscriptionError> {
        Ok(self
            .mailing_lists()
            .await?
            .into_iter()
            .map(|list| list.id)
            .collect())
    }

    async fn transactional_catalog(&self) -> Result<Vec<TransactionalEmail>, SubscriptionError> {
        let api = &self.api;
        let catalog = drain(|request| api.transactional_emails(request), self.page_size).await?;
        Ok(catalog.into_iter().map(TransactionalEmail::from).collect())
    }
}

fn to_json(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::Bool(value) => serde_json::Value::Bool(*value),
        PropertyValue::Number(value) => serde_json::Value::Number(value.clone()),
        PropertyValue::String(value) => serde_json::Value::String(value.clone()),
        PropertyValue::Null => serde_json::Value::Null,
    }
}

fn status_update(subscribed: bool, status: OptInStatus) -> BTreeMap<String, serde_json::Value> {
    BTreeMap::from([
        ("subscribed".to_string(), serde_json::Value::Bool(subscribed)),
        (
            CUSTOM_OPT_IN_STATUS_PROPERTY.to_string(),
            serde_json::Value::String(status.as_str().to_string()),
        ),
    ])
}

impl From<LoopsContact> for Contact {
    fn from(contact: LoopsContact) -> Self {
        let properties: ContactProperties = contact
            .properties
            .into_iter()
            .filter_map(|(key, value)| PropertyValue::from_json(value).map(|value| (key, value)))
            .collect();

        let custom = properties
            .get_str(CUSTOM_OPT_IN_STATUS_PROPERTY)
            .and_then(OptInStatus::parse);
        let built_in = contact.opt_in_status.as_deref().and_then(OptInStatus::parse);

        Contact {
            id: contact.id,
            email: contact.email,
            subscribed: contact.subscribed,
            mailing_lists: contact.mailing_lists,
            opt_in_status: OptInStatus::reconcile(custom, built_in),
            referer: properties.get_str(REFERER_PROPERTY).map(str::to_string),
            properties,
        }
    }
}

#[async_trait]
impl ContactDirectory for LoopsContactDirectory {
    async fn find_contact(&self, email: &str) -> Result<Option<Contact>, SubscriptionError> {
        let contacts = self.api.find_contacts(email).await?;
        Ok(contacts.into_iter().next().map(Contact::from))
    }

    async fn upsert_contact(
        &self,
        email: &str,
        properties: &ContactProperties,
        mailing_list_ids: Option<&[String]>,
    ) -> Result<Contact, SubscriptionError> {
        if let Some(existing) = self.find_contact(email).await? {
            tracing::debug!(contact_id = %existing.id, "Contact already exists");
            return Ok(existing);
        }

        let list_ids = match mailing_list_ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => ids.to_vec(),
            None => self.public_list_ids().await?,
        };
        let mailing_lists: MailingListMembership =
            list_ids.into_iter().map(|id| (id, true)).collect();

        let properties = properties.without_reserved();
        let mut wire_properties: BTreeMap<String, serde_json::Value> = properties
            .iter()
            .map(|(key, value)| (key.clone(), to_json(value)))
            .collect();
        wire_properties.extend(status_update(false, OptInStatus::Pending));

        let id = self
            .api
            .create_contact(&CreateContactRequest {
                email: email.to_string(),
                properties: wire_properties,
                mailing_lists: mailing_lists.clone(),
            })
            .await?;

        tracing::info!(contact_id = %id, lists = mailing_lists.len(), "Created pending contact");

        Ok(Contact {
            id,
            email: email.to_string(),
            subscribed: false,
            mailing_lists,
            opt_in_status: Some(OptInStatus::Pending),
            referer: properties.get_str(REFERER_PROPERTY).map(str::to_string),
            properties,
        })
    }

    async fn subscribe_contact(
        &self,
        email: &str,
        mailing_lists: Option<&MailingListMembership>,
    ) -> Result<(), SubscriptionError> {
        self.api
            .update_contact(&UpdateContactRequest {
                email: email.to_string(),
                properties: status_update(true, OptInStatus::Accepted),
                mailing_lists: mailing_lists.cloned(),
            })
            .await?;
        tracing::info!("Contact accepted subscription");
        Ok(())
    }

    async fn unsubscribe_contact(&self, email: &str) -> Result<(), SubscriptionError> {
        self.api
            .update_contact(&UpdateContactRequest {
                email: email.to_string(),
                properties: status_update(false, OptInStatus::Rejected),
                mailing_lists: None,
            })
            .await?;
        tracing::info!("Contact rejected subscription");
        Ok(())
    }

    async fn mailing_lists(&self) -> Result<Vec<MailingList>, SubscriptionError> {
        let lists = self.api.mailing_lists().await?;
        Ok(lists
            .into_iter()
            .filter(|list| list.is_public)
            .map(MailingList::from)
            .collect())
    }

    async fn double_opt_in_email(
        &self,
        language: Option<&str>,
    ) -> Result<Option<TransactionalEmail>, SubscriptionError> {
        let catalog = self.transactional_catalog().await?;
        Ok(select_double_opt_in(&catalog, language).cloned())
    }

    async fn send_confirmation_mail(
        &self,
        email: &str,
        opt_in_url: &str,
        language: Option<&str>,
    ) -> Result<(), SubscriptionError> {
        let template = self
            .double_opt_in_email(language)
            .await?
            .ok_or_else(|| SubscriptionError::configuration("No confirmation e-mail configured"))?;

        let mut data_variables: BTreeMap<String, String> = self
            .company
            .template_variables()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        data_variables.insert(OPT_IN_URL_VARIABLE.to_string(), opt_in_url.to_string());

        tracing::info!(template = %template.name, "Sending confirmation e-mail");

        self.api
            .send_transactional_email(&SendTransactionalRequest {
                transactional_id: template.id,
                email: email.to_string(),
                data_variables,
            })
            .await?;
        Ok(())
    }

    async fn initialize_custom_properties(&self) -> Result<(), SubscriptionError> {
        let existing = self.api.custom_properties().await?;

        for name in REQUIRED_CUSTOM_PROPERTIES {
            if existing.iter().any(|property| property.key == name) {
                tracing::debug!(property = name, "Custom property already exists");
                continue;
            }
            tracing::info!(property = name, "Creating custom property");
            self.api
                .create_contact_property(&CreatePropertyRequest {
                    name: name.to_string(),
                    property_type: PropertyType::String,
                })
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::loops::types::LoopsTransactionalEmail;
    use crate::adapters::loops::InMemoryLoopsApi;
    use serde_json::json;

    fn company() -> CompanyIdentity {
        CompanyIdentity {
            name: "Acme".to_string(),
            address: "1 Main St".to_string(),
            logo: Some("https://acme.example/logo.png".to_string()),
        }
    }

    fn directory(api: InMemoryLoopsApi) -> (Arc<InMemoryLoopsApi>, LoopsContactDirectory) {
        let api = Arc::new(api);
        let directory = LoopsContactDirectory::new(api.clone(), company());
        (api, directory)
    }

    fn loops_contact(email: &str, custom: Option<&str>, built_in: Option<&str>) -> LoopsContact {
        let mut properties = BTreeMap::new();
        if let Some(status) = custom {
            properties.insert(CUSTOM_OPT_IN_STATUS_PROPERTY.to_string(), json!(status));
        }
        LoopsContact {
            id: format!("id-{}", email),
            email: email.to_string(),
            subscribed: true,
            mailing_lists: BTreeMap::new(),
            opt_in_status: built_in.map(str::to_string),
            properties,
        }
    }

    fn template(id: &str, name: &str, opt_in: bool) -> LoopsTransactionalEmail {
        LoopsTransactionalEmail {
            id: id.to_string(),
            name: name.to_string(),
            last_updated: None,
            data_variables: if opt_in {
                vec![OPT_IN_URL_VARIABLE.to_string()]
            } else {
                vec!["firstName".to_string()]
            },
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Reading contacts
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_contact_is_none() {
        let (_, directory) = directory(InMemoryLoopsApi::new());
        assert!(directory.find_contact("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settled_custom_status_wins() {
        let api = InMemoryLoopsApi::new()
            .with_contact(loops_contact("a@example.com", Some("rejected"), Some("accepted")));
        let (_, directory) = directory(api);

        let contact = directory.find_contact("a@example.com").await.unwrap().unwrap();

        assert_eq!(contact.opt_in_status, Some(OptInStatus::Rejected));
    }

    #[tokio::test]
    async fn settled_built_in_status_overrides_pending_custom() {
        let api = InMemoryLoopsApi::new()
            .with_contact(loops_contact("a@example.com", Some("pending"), Some("accepted")));
        let (_, directory) = directory(api);

        let contact = directory.find_contact("a@example.com").await.unwrap().unwrap();

        assert_eq!(contact.opt_in_status, Some(OptInStatus::Accepted));
    }

    #[tokio::test]
    async fn referer_is_surfaced() {
        let mut contact = loops_contact("a@example.com", Some("pending"), None);
        contact
            .properties
            .insert(REFERER_PROPERTY.to_string(), json!("https://blog.example.com/post"));
        let (_, directory) = directory(InMemoryLoopsApi::new().with_contact(contact));

        let contact = directory.find_contact("a@example.com").await.unwrap().unwrap();

        assert_eq!(contact.referer.as_deref(), Some("https://blog.example.com/post"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Creating contacts
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_defaults_to_public_lists() {
        let api = InMemoryLoopsApi::new()
            .with_mailing_list("public-1", "News", true)
            .with_mailing_list("private-1", "Staff", false)
            .with_mailing_list("public-2", "Offers", true);
        let (api, directory) = directory(api);

        let contact = directory
            .upsert_contact("new@example.com", &ContactProperties::new(), None)
            .await
            .unwrap();

        let expected: Vec<&str> = vec!["public-1", "public-2"];
        assert_eq!(contact.mailing_lists.keys().map(String::as_str).collect::<Vec<_>>(), expected);
        assert_eq!(contact.opt_in_status, Some(OptInStatus::Pending));
        assert!(!contact.subscribed);
        assert_eq!(api.created_contacts()[0].mailing_lists.len(), 2);
    }

    #[tokio::test]
    async fn empty_list_request_means_public_lists() {
        let api = InMemoryLoopsApi::new().with_mailing_list("public-1", "News", true);
        let (_, directory) = directory(api);

        let contact = directory
            .upsert_contact("new@example.com", &ContactProperties::new(), Some(&[][..]))
            .await
            .unwrap();

        assert!(contact.is_member_of("public-1"));
    }

    #[tokio::test]
    async fn create_uses_requested_lists() {
        let api = InMemoryLoopsApi::new().with_mailing_list("public-1", "News", true);
        let (_, directory) = directory(api);
        let requested = vec!["list-x".to_string()];

        let contact = directory
            .upsert_contact("new@example.com", &ContactProperties::new(), Some(requested.as_slice()))
            .await
            .unwrap();

        assert!(contact.is_member_of("list-x"));
        assert!(!contact.is_member_of("public-1"));
    }

    #[tokio::test]
    async fn create_writes_pending_status_over_caller_properties() {
        let (api, directory) = directory(InMemoryLoopsApi::new());
        let properties = ContactProperties::new()
            .with("firstName", "Ada")
            .with(CUSTOM_OPT_IN_STATUS_PROPERTY, "accepted")
            .with("subscribed", true);

        directory
            .upsert_contact("new@example.com", &properties, Some(&["l1".to_string()][..]))
            .await
            .unwrap();

        let created_contacts = api.created_contacts();
        let created = &created_contacts[0];
        assert_eq!(created.properties["firstName"], json!("Ada"));
        assert_eq!(created.properties[CUSTOM_OPT_IN_STATUS_PROPERTY], json!("pending"));
        assert_eq!(created.properties["subscribed"], json!(false));
    }

    #[tokio::test]
    async fn existing_contact_is_returned_unchanged() {
        let api = InMemoryLoopsApi::new()
            .with_contact(loops_contact("a@example.com", Some("accepted"), None));
        let (api, directory) = directory(api);

        let contact = directory
            .upsert_contact("a@example.com", &ContactProperties::new().with("firstName", "X"), None)
            .await
            .unwrap();

        assert_eq!(contact.id, "id-a@example.com");
        assert_eq!(contact.opt_in_status, Some(OptInStatus::Accepted));
        assert!(api.created_contacts().is_empty());
        assert!(api.updated_contacts().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Transitions
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscribe_accepts_and_merges_lists() {
        let api = InMemoryLoopsApi::new()
            .with_contact(loops_contact("a@example.com", Some("pending"), None));
        let (api, directory) = directory(api);
        let lists: MailingListMembership = [("l1".to_string(), true)].into_iter().collect();

        directory.subscribe_contact("a@example.com", Some(&lists)).await.unwrap();

        let contact = directory.find_contact("a@example.com").await.unwrap().unwrap();
        assert_eq!(contact.opt_in_status, Some(OptInStatus::Accepted));
        assert!(contact.subscribed);
        assert!(contact.is_member_of("l1"));
        assert_eq!(api.updated_contacts()[0].mailing_lists, Some(lists));
    }

    #[tokio::test]
    async fn unsubscribe_rejects_without_touching_lists() {
        let mut stored = loops_contact("a@example.com", Some("accepted"), None);
        stored.mailing_lists.insert("l1".to_string(), true);
        let (api, directory) = directory(InMemoryLoopsApi::new().with_contact(stored));

        directory.unsubscribe_contact("a@example.com").await.unwrap();

        let contact = directory.find_contact("a@example.com").await.unwrap().unwrap();
        assert_eq!(contact.opt_in_status, Some(OptInStatus::Rejected));
        assert!(!contact.subscribed);
        assert!(contact.is_member_of("l1"));
        assert_eq!(api.updated_contacts()[0].mailing_lists, None);
    }

    #[tokio::test]
    async fn only_public_lists_are_listed() {
        let api = InMemoryLoopsApi::new()
            .with_mailing_list("public-1", "News", true)
            .with_mailing_list("private-1", "Staff", false);
        let (_, directory) = directory(api);

        let lists = directory.mailing_lists().await.unwrap();

        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, "public-1");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Confirmation e-mail
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn template_on_last_page_is_found() {
        let api = InMemoryLoopsApi::new()
            .with_transactional_page(vec![template("t1", "Welcome", false)])
            .with_transactional_page(vec![template("t2", "Receipt", false)])
            .with_transactional_page(vec![template("t3", "Confirm #PL", true)]);
        let (api, directory) = directory(api);

        let selected = directory.double_opt_in_email(Some("pl")).await.unwrap();

        assert_eq!(selected.map(|t| t.id), Some("t3".to_string()));
        assert_eq!(api.page_requests().len(), 3);
    }

    #[tokio::test]
    async fn language_preference_spans_pages() {
        let api = InMemoryLoopsApi::new()
            .with_transactional_page(vec![template("en", "Confirm #EN", true)])
            .with_transactional_page(vec![template("pl", "Confirm #PL", true)]);
        let (_, directory) = directory(api);

        let polish = directory.double_opt_in_email(Some("pl")).await.unwrap().unwrap();
        let german = directory.double_opt_in_email(Some("de")).await.unwrap().unwrap();

        assert_eq!(polish.id, "pl");
        assert_eq!(german.id, "en");
    }

    #[tokio::test]
    async fn page_size_is_forwarded() {
        let api = InMemoryLoopsApi::new().with_transactional_page(vec![]);
        let api = Arc::new(api);
        let directory = LoopsContactDirectory::new(api.clone(), company()).with_page_size(5);

        directory.double_opt_in_email(None).await.unwrap();

        assert_eq!(api.page_requests()[0].per_page, 5);
    }

    #[tokio::test]
    async fn confirmation_mail_carries_company_and_link() {
        let api = InMemoryLoopsApi::new()
            .with_transactional_page(vec![template("confirm", "Confirm", true)]);
        let (api, directory) = directory(api);

        directory
            .send_confirmation_mail("a@example.com", "https://news.example.com/control-panel?token=t", None)
            .await
            .unwrap();

        let sent_emails = api.sent_emails();
        let sent = &sent_emails[0];
        assert_eq!(sent.transactional_id, "confirm");
        assert_eq!(sent.email, "a@example.com");
        assert_eq!(sent.data_variables["companyName"], "Acme");
        assert_eq!(sent.data_variables["companyAddress"], "1 Main St");
        assert_eq!(sent.data_variables["companyLogo"], "https://acme.example/logo.png");
        assert_eq!(
            sent.data_variables[OPT_IN_URL_VARIABLE],
            "https://news.example.com/control-panel?token=t"
        );
    }

    #[tokio::test]
    async fn missing_template_is_a_configuration_error() {
        let api = InMemoryLoopsApi::new()
            .with_transactional_page(vec![template("welcome", "Welcome", false)]);
        let (api, directory) = directory(api);

        let result = directory
            .send_confirmation_mail("a@example.com", "https://x", Some("en"))
            .await;

        assert!(matches!(result, Err(SubscriptionError::Configuration { .. })));
        assert!(api.sent_emails().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Bootstrap
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_only_missing_custom_properties() {
        let api = InMemoryLoopsApi::new().with_custom_property(LANGUAGE_PROPERTY);
        let (api, directory) = directory(api);

        directory.initialize_custom_properties().await.unwrap();
        directory.initialize_custom_properties().await.unwrap();

        let created = api.created_properties();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, CUSTOM_OPT_IN_STATUS_PROPERTY);
        assert_eq!(created[0].property_type, PropertyType::String);
    }
}
