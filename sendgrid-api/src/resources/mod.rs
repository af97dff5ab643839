// sendgrid-api/src/resources/mod.rs
pub mod contact_lists;
pub mod contacts;
pub mod custom_fields;
pub mod teammates;

pub use contact_lists::ContactLists;
pub use contacts::Contacts;
pub use custom_fields::CustomFields;
pub use teammates::Teammates;

use crate::error::{Result, SendGridError};
use crate::http::{ApiRequest, HttpClient};
use serde::de::DeserializeOwned;

/// Send a request and decode the JSON body
pub(crate) async fn fetch<C, T>(http: &C, request: ApiRequest) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let bytes = http.send(request).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Send a request and decode one property of the JSON body
pub(crate) async fn fetch_property<C, T>(http: &C, request: ApiRequest, property: &str) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let mut body: serde_json::Value = fetch(http, request).await?;
    let value = body
        .get_mut(property)
        .map(serde_json::Value::take)
        .ok_or_else(|| {
            SendGridError::UnexpectedResponse(format!("missing '{}' in response", property))
        })?;
    Ok(serde_json::from_value(value)?)
}

/// Send a request whose response body is ignored
pub(crate) async fn execute<C>(http: &C, request: ApiRequest) -> Result<()>
where
    C: HttpClient + ?Sized,
{
    http.send(request).await?;
    Ok(())
}
