//! Client adapter for the Google Drive v3 API.
//!
//! This crate authenticates as a service account and exposes the two Drive
//! operations the server needs: listing the children of a folder and creating
//! a file inside a folder. Credentials stay on the server side; callers of the
//! HTTP layer never see them.
//!
//! It is designed as a library crate to be used by `drivebridge-server`.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod auth;
mod client;
mod error;
mod types;

pub use auth::{Credentials, Scope, ServiceAccountTokens, StaticToken, TOKEN_ENDPOINT, TokenProvider};
pub use client::{API_ENDPOINT, DriveClient, DriveConfig};
pub use error::ProviderError;
pub use types::{CreatedFile, FileEntry};
