//! # MDR Core
//!
//! Doctor directory logic for the MDR admin dashboard.
//!
//! This crate contains the reconciliation and validation pipeline behind the doctor list and
//! form:
//! - Lookup of specialization/affiliation titles ([`lookup`])
//! - Projection of raw doctor records into display rows ([`projection`])
//! - Free-text filtering of rows ([`search`])
//! - Form state, validation and payload building ([`form`], [`validation`])
//! - A state container with typed actions and an async CRUD orchestrator ([`store`],
//!   [`orchestrator`], [`confirmation`])
//! - An in-process data layer seeded from JSON ([`repository`])
//! - OTP entry with an expiry countdown ([`otp`], [`countdown`])
//!
//! **No API concerns**: HTTP servers and wire DTOs belong in `api-rest` and `api-shared`.

pub mod config;
pub mod confirmation;
pub mod constants;
pub mod countdown;
pub mod error;
pub mod form;
pub mod gateway;
pub mod lookup;
pub mod model;
pub mod orchestrator;
pub mod otp;
pub mod projection;
pub mod repository;
pub mod search;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CoreConfig;
pub use confirmation::{ConfirmationGate, ConfirmationIntent, ConfirmationResponse};
pub use constants::UNRESOLVED_TITLE;
pub use error::{DirectoryError, DirectoryResult};
pub use form::{FormController, FormMode, FormState, Submission};
pub use gateway::DoctorGateway;
pub use model::{Address, DisplayRow, DoctorPayload, DoctorProfile, DoctorRecord, ReferenceItem, ReferenceRef};
pub use orchestrator::{DirectorySession, Orchestrator, PendingMutation};
pub use repository::{DirectoryRepository, DirectorySeed};
pub use search::SearchView;
pub use store::{Action, DirectoryState, Store};
pub use validation::{FieldErrors, ValidatedDoctor};

// Validated text primitives live in mdr-types; re-export for convenience.
pub use mdr_types::{EmailAddress, NonEmptyText, PhoneNumber, RegionName, TextError, ZipCode};
