//! HTTP proxy in front of the Google Drive API.
//!
//! This builds on top of [`drivebridge_provider`] and exposes two endpoints
//! to browsers: listing the contents of a Drive folder and uploading a file
//! into one. The service-account credential used towards Drive is part of the
//! server configuration and never reaches the caller.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod healthcheck;
pub mod multipart;
pub mod observability;
pub mod state;
pub mod web;
