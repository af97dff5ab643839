pub mod client;
pub mod config;

pub use client::SendGridClient;
pub use config::Config;

// Re-export API types for convenience
pub use sendgrid_api::{
    AccessRequest, ConditionOperator, Contact, ContactList, ContactUpsert, CustomFieldDefinition,
    FieldType, FieldValue, HttpError, ImportResult, ListOptions, LogicalOperator, PageOptions,
    Parameter, ReservedField, ReservedFieldType, SearchCondition, SendGridError, Teammate,
    TeammateInvitation,
};
