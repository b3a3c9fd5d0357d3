//! Directory access.
//!
//! This module fetches registered applications and their credentials
//! from the identity provider. The collector talks to it only through
//! [`DirectorySource`], so the live Graph client and the in-memory
//! [`StaticDirectory`] are interchangeable.

mod graph;
mod model;
mod source;

pub use graph::GraphDirectory;
pub use model::{Application, ApplicationPage, KeyCredential, PasswordCredential, TokenResponse};
pub use source::{DirectoryError, DirectorySource, StaticDirectory};
