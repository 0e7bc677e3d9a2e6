//! Module implementing the drivebridge webserver.
//!
//! The main server application is implemented in the [`App`] struct, which
//! sets up routing, middleware, and the HTTP server. To listen to incoming
//! connections, use the [`server()`] function, which opens a TCP listener and
//! serves the application.

mod app;
mod middleware;
mod server;

pub use app::App;
pub use server::server;
