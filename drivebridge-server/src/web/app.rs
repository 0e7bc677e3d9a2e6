use std::net::SocketAddr;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use axum_extra::middleware::option_layer;
use sentry::integrations::tower::{NewSentryLayer, SentryHttpLayer};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use crate::endpoints;
use crate::state::ServiceState;
use crate::web::middleware as m;

/// The drivebridge web server application.
#[derive(Debug)]
pub struct App {
    router: axum::Router,
    graceful_shutdown: bool,
}

impl App {
    /// Creates a new application router for the given service state.
    ///
    /// The application sets up middlewares and routes for the web API. Use
    /// [`serve`](Self::serve) to run the server future.
    pub fn new(state: ServiceState) -> Self {
        let sentry = state.config.sentry.is_enabled().then(|| {
            ServiceBuilder::new()
                .layer(NewSentryLayer::<Request>::new_from_top())
                .layer(SentryHttpLayer::new().enable_transaction())
        });

        // Build the router middleware into a single service which runs
        // _after_ routing. Layers added first are called first: requests go
        // from top to bottom, responses from bottom to top.
        let middleware = ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(m::handle_panic))
            .layer(m::set_server_header())
            .layer(option_layer(sentry))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(m::make_http_span)
                    .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
            );

        let router = endpoints::routes().layer(middleware).with_state(state);

        App {
            router,
            graceful_shutdown: false,
        }
    }

    /// Enables or disables graceful shutdown for the server.
    ///
    /// By default, graceful shutdown is disabled.
    pub fn graceful_shutdown(mut self, enable: bool) -> Self {
        self.graceful_shutdown = enable;
        self
    }

    /// Runs the web server until graceful shutdown is triggered.
    ///
    /// This function creates a future that runs the server. The future must
    /// be spawned or awaited for the server to continue running.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let Self {
            router,
            graceful_shutdown,
        } = self;

        let service =
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(router);

        if graceful_shutdown {
            let guard = elegant_departure::get_shutdown_guard();
            axum::serve(listener, service)
                .with_graceful_shutdown(guard.wait_owned())
                .await?;
        } else {
            axum::serve(listener, service).await?;
        }

        Ok(())
    }
}
