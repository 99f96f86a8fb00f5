//! In-memory [`LoopsApi`] for tests and local development.
//!
//! Behaves like the hosted directory for the endpoints the service uses:
//! e-mails are matched case-insensitively, creating a duplicate contact
//! fails, and transactional templates are served in pages whose cursor is
//! the next page index. Every mutating call is recorded for assertions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::api::{LoopsApi, LoopsError};
use super::pagination::{Cursor, Page, PageRequest};
use super::types::{
    ContactProperty, CreateContactRequest, CreatePropertyRequest, LoopsContact, LoopsMailingList,
    LoopsTransactionalEmail, SendTransactionalRequest, UpdateContactRequest,
};

#[derive(Default)]
struct State {
    contacts: Vec<LoopsContact>,
    mailing_lists: Vec<LoopsMailingList>,
    transactional_pages: Vec<Vec<LoopsTransactionalEmail>>,
    custom_properties: Vec<ContactProperty>,
    created_contacts: Vec<CreateContactRequest>,
    updated_contacts: Vec<UpdateContactRequest>,
    sent_emails: Vec<SendTransactionalRequest>,
    page_requests: Vec<PageRequest>,
    created_properties: Vec<CreatePropertyRequest>,
    next_id: u64,
}

impl State {
    fn contact_mut(&mut self, email: &str) -> Option<&mut LoopsContact> {
        self.contacts
            .iter_mut()
            .find(|contact| contact.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Default)]
pub struct InMemoryLoopsApi {
    state: Mutex<State>,
}

impl InMemoryLoopsApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_mailing_list(mut self, id: &str, name: &str, is_public: bool) -> Self {
        self.state_mut().mailing_lists.push(LoopsMailingList {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            is_public,
        });
        self
    }

    pub fn with_contact(mut self, contact: LoopsContact) -> Self {
        self.state_mut().contacts.push(contact);
        self
    }

    /// Appends one page of transactional templates.
    pub fn with_transactional_page(mut self, page: Vec<LoopsTransactionalEmail>) -> Self {
        self.state_mut().transactional_pages.push(page);
        self
    }

    pub fn with_custom_property(mut self, key: &str) -> Self {
        self.state_mut().custom_properties.push(ContactProperty {
            key: key.to_string(),
            label: key.to_string(),
            property_type: super::types::PropertyType::String,
        });
        self
    }

    /// Current stored contact, if any.
    pub fn contact(&self, email: &str) -> Option<LoopsContact> {
        self.state().contact_mut(email).cloned()
    }

    pub fn created_contacts(&self) -> Vec<CreateContactRequest> {
        self.state().created_contacts.clone()
    }

    pub fn updated_contacts(&self) -> Vec<UpdateContactRequest> {
        self.state().updated_contacts.clone()
    }

    pub fn sent_emails(&self) -> Vec<SendTransactionalRequest> {
        self.state().sent_emails.clone()
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.state().page_requests.clone()
    }

    pub fn created_properties(&self) -> Vec<CreatePropertyRequest> {
        self.state().created_properties.clone()
    }
}

fn apply_properties(contact: &mut LoopsContact, properties: &BTreeMap<String, serde_json::Value>) {
    for (key, value) in properties {
        match (key.as_str(), value) {
            ("subscribed", serde_json::Value::Bool(subscribed)) => contact.subscribed = *subscribed,
            _ => {
                contact.properties.insert(key.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl LoopsApi for InMemoryLoopsApi {
    async fn find_contacts(&self, email: &str) -> Result<Vec<LoopsContact>, LoopsError> {
        Ok(self.contact(email).into_iter().collect())
    }

    async fn create_contact(&self, request: &CreateContactRequest) -> Result<String, LoopsError> {
        let mut state = self.state();
        state.created_contacts.push(request.clone());

        if state.contact_mut(&request.email).is_some() {
            return Err(LoopsError::Api {
                status: 409,
                message: "Email or userId is already on list.".to_string(),
            });
        }

        state.next_id += 1;
        let id = format!("contact-{}", state.next_id);
        let mut contact = LoopsContact {
            id: id.clone(),
            email: request.email.to_lowercase(),
            subscribed: true,
            mailing_lists: request.mailing_lists.clone(),
            opt_in_status: None,
            properties: BTreeMap::new(),
        };
        apply_properties(&mut contact, &request.properties);
        state.contacts.push(contact);

        Ok(id)
    }

    async fn update_contact(&self, request: &UpdateContactRequest) -> Result<(), LoopsError> {
        let mut state = self.state();
        state.updated_contacts.push(request.clone());

        let contact = state.contact_mut(&request.email).ok_or_else(|| LoopsError::Api {
            status: 404,
            message: "Contact not found.".to_string(),
        })?;
        apply_properties(contact, &request.properties);
        if let Some(lists) = &request.mailing_lists {
            contact
                .mailing_lists
                .extend(lists.iter().map(|(id, member)| (id.clone(), *member)));
        }

        Ok(())
    }

    async fn mailing_lists(&self) -> Result<Vec<LoopsMailingList>, LoopsError> {
        Ok(self.state().mailing_lists.clone())
    }

    async fn transactional_emails(
        &self,
        request: PageRequest,
    ) -> Result<Page<LoopsTransactionalEmail>, LoopsError> {
        let mut state = self.state();
        state.page_requests.push(request.clone());

        let index = match &request.cursor {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| LoopsError::Api {
                    status: 400,
                    message: format!("Invalid cursor {}", cursor),
                })?,
        };
        let data = state
            .transactional_pages
            .get(index)
            .cloned()
            .unwrap_or_default();
        let next_cursor = (index + 1 < state.transactional_pages.len()).then(|| (index + 1).to_string());

        Ok(Page {
            data,
            pagination: Cursor {
                next_cursor,
                next_page: None,
            },
        })
    }

    async fn send_transactional_email(
        &self,
        request: &SendTransactionalRequest,
    ) -> Result<(), LoopsError> {
        self.state().sent_emails.push(request.clone());
        Ok(())
    }

    async fn custom_properties(&self) -> Result<Vec<ContactProperty>, LoopsError> {
        Ok(self.state().custom_properties.clone())
    }

    async fn create_contact_property(
        &self,
        request: &CreatePropertyRequest,
    ) -> Result<(), LoopsError> {
        let mut state = self.state();
        state.created_properties.push(request.clone());
        state.custom_properties.push(ContactProperty {
            key: request.name.clone(),
            label: request.name.clone(),
            property_type: request.property_type,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(email: &str) -> CreateContactRequest {
        CreateContactRequest {
            email: email.to_string(),
            properties: [("subscribed".to_string(), json!(false))].into_iter().collect(),
            mailing_lists: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let api = InMemoryLoopsApi::new();
        api.create_contact(&create("a@example.com")).await.unwrap();

        let second = api.create_contact(&create("A@example.com")).await;

        assert!(matches!(second, Err(LoopsError::Api { status: 409, .. })));
    }

    #[tokio::test]
    async fn find_is_case_insensitive() {
        let api = InMemoryLoopsApi::new();
        api.create_contact(&create("Mixed@Example.com")).await.unwrap();

        let found = api.find_contacts("mixed@example.COM").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "mixed@example.com");
        assert!(!found[0].subscribed);
    }

    #[tokio::test]
    async fn update_merges_lists() {
        let api = InMemoryLoopsApi::new();
        let mut request = create("a@example.com");
        request.mailing_lists.insert("l1".to_string(), true);
        api.create_contact(&request).await.unwrap();

        api.update_contact(&UpdateContactRequest {
            email: "a@example.com".to_string(),
            properties: BTreeMap::new(),
            mailing_lists: Some([("l2".to_string(), true)].into_iter().collect()),
        })
        .await
        .unwrap();

        let contact = api.contact("a@example.com").unwrap();
        assert_eq!(contact.mailing_lists.len(), 2);
    }

    #[tokio::test]
    async fn pages_follow_index_cursor() {
        let template = |id: &str| LoopsTransactionalEmail {
            id: id.to_string(),
            name: id.to_string(),
            last_updated: None,
            data_variables: vec![],
        };
        let api = InMemoryLoopsApi::new()
            .with_transactional_page(vec![template("a")])
            .with_transactional_page(vec![template("b")]);

        let first = api
            .transactional_emails(PageRequest { per_page: 20, cursor: None })
            .await
            .unwrap();
        assert_eq!(first.pagination.next_cursor.as_deref(), Some("1"));

        let second = api
            .transactional_emails(PageRequest { per_page: 20, cursor: Some("1".to_string()) })
            .await
            .unwrap();
        assert_eq!(second.data[0].id, "b");
        assert_eq!(second.pagination.next_cursor, None);
    }
}
