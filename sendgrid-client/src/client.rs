// sendgrid-client/src/client.rs
use crate::config::Config;
use anyhow::{Context, Result};
use sendgrid_api::{
    Contact, ContactList, ListOptions, PageOptions, ReqwestClient, SendGridApi, Teammate,
};
use std::time::Duration;

const TEAMMATE_PAGE_SIZE: u32 = 100;

/// Configured SendGrid client with a default on-behalf-of subuser
pub struct SendGridClient {
    inner: SendGridApi<ReqwestClient>,
    on_behalf_of: Option<String>,
}

impl SendGridClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;

        let mut http = ReqwestClient::new()
            .with_token(api_key.to_string())
            .with_base_url(config.base_url());
        if let Some(secs) = config.timeout_secs {
            http = http.with_timeout(Duration::from_secs(secs));
        }

        tracing::debug!(
            base_url = config.base_url(),
            on_behalf_of = config.on_behalf_of.as_deref(),
            "client configured"
        );

        Ok(Self {
            inner: SendGridApi::new(http),
            on_behalf_of: config.on_behalf_of.clone(),
        })
    }

    pub fn api(&self) -> &SendGridApi<ReqwestClient> {
        &self.inner
    }

    /// Per-call subuser, falling back to the configured default
    pub fn on_behalf_of<'a>(&'a self, subuser: Option<&'a str>) -> Option<&'a str> {
        subuser.or(self.on_behalf_of.as_deref())
    }

    /// Walk teammate pages until one with a matching email turns up
    pub async fn find_teammate_by_email(
        &self,
        email: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<Option<Teammate>> {
        let subuser = self.on_behalf_of(on_behalf_of);
        let mut options = ListOptions {
            limit: TEAMMATE_PAGE_SIZE,
            offset: 0,
        };

        loop {
            let page = self
                .inner
                .teammates()
                .list(options, subuser)
                .await
                .context("Failed to list teammates")?;
            let page_len = page.len();

            if let Some(found) = page
                .into_iter()
                .find(|t| t.email.eq_ignore_ascii_case(email))
            {
                return Ok(Some(found));
            }
            if page_len < options.limit as usize {
                return Ok(None);
            }
            options.offset += options.limit;
        }
    }

    /// Every contact in the Contact DB, fetched page by page
    pub async fn all_contacts(
        &self,
        page_size: u32,
        on_behalf_of: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let subuser = self.on_behalf_of(on_behalf_of);
        let mut options = PageOptions { page_size, page: 1 };
        let mut contacts = Vec::new();

        loop {
            let page = self
                .inner
                .contacts()
                .list(options, subuser)
                .await
                .with_context(|| format!("Failed to list contacts page {}", options.page))?;
            let page_len = page.len();
            contacts.extend(page);

            if page_len < page_size as usize || page_len == 0 {
                return Ok(contacts);
            }
            options.page += 1;
        }
    }

    pub async fn contact_by_email(
        &self,
        email: &str,
        on_behalf_of: Option<&str>,
    ) -> Result<Option<Contact>> {
        let matches = self
            .inner
            .contacts()
            .search_by_field("email", email, self.on_behalf_of(on_behalf_of))
            .await
            .context("Failed to search contacts")?;
        Ok(matches.into_iter().next())
    }

    /// Find a list by name, creating it when missing
    pub async fn ensure_list(&self, name: &str, on_behalf_of: Option<&str>) -> Result<ContactList> {
        let subuser = self.on_behalf_of(on_behalf_of);
        let lists = self.inner.lists().list(subuser).await?;
        if let Some(existing) = lists.into_iter().find(|l| l.name == name) {
            return Ok(existing);
        }

        tracing::info!(list = name, "creating contact list");
        let created = self
            .inner
            .lists()
            .create(name, subuser)
            .await
            .with_context(|| format!("Failed to create list '{}'", name))?;
        Ok(created)
    }
}
