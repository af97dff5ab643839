// sendgrid-api/src/client.rs
use crate::http::HttpClient;
use crate::resources::{ContactLists, Contacts, CustomFields, Teammates};

/// Entry point: owns the transport and hands out resource façades
pub struct SendGridApi<C: HttpClient> {
    http: C,
}

impl<C: HttpClient> SendGridApi<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn contacts(&self) -> Contacts<'_, C> {
        Contacts::new(&self.http)
    }

    pub fn lists(&self) -> ContactLists<'_, C> {
        ContactLists::new(&self.http)
    }

    pub fn custom_fields(&self) -> CustomFields<'_, C> {
        CustomFields::new(&self.http)
    }

    pub fn teammates(&self) -> Teammates<'_, C> {
        Teammates::new(&self.http)
    }
}

#[cfg(feature = "reqwest")]
impl SendGridApi<crate::http::ReqwestClient> {
    /// Client for the public API authenticated with `api_key`
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(crate::http::ReqwestClient::new().with_token(api_key))
    }
}
