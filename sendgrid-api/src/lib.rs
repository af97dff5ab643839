// sendgrid-api/src/lib.rs
pub mod client;
pub mod error;
pub mod http;
pub mod parameter;
pub mod resources;
pub mod types;

pub use client::SendGridApi;
pub use error::{Result, SendGridError};
pub use http::{encode_segment, ApiRequest, HttpClient, HttpError, Method, ON_BEHALF_OF_HEADER};
pub use parameter::Parameter;
pub use resources::{ContactLists, Contacts, CustomFields, Teammates};
pub use types::{
    AccessRequest,
    ConditionOperator,
    // Contact DB
    Contact,
    ContactList,
    ContactUpsert,
    CustomFieldDefinition,
    Field,
    FieldType,
    FieldValue,
    ImportError,
    ImportResult,
    // Paging
    ListOptions,
    LogicalOperator,
    PageOptions,
    ReservedField,
    ReservedFieldType,
    SearchCondition,
    // Teammates
    Teammate,
    TeammateInvitation,
    UserType,
};

// Re-export reqwest client when feature is enabled
#[cfg(feature = "reqwest")]
pub use http::{ReqwestClient, DEFAULT_BASE_URL};
