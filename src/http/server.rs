//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the contact, preflight and health handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, CORS, headers)
//! - Own the rate limit ledger for the lifetime of the process
//! - Apply config reloads without dropping ledger state
//! - Bind to a plain TCP listener or serve TLS

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use arc_swap::ArcSwap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ContactConfig, TlsConfig};
use crate::edge::{ContactService, ForwardError, WebhookForwarder};
use crate::http::handlers::{health, method_not_allowed, preflight, submit_contact};
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::security::{headers, rate_limit, RateLimitLedger};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current configuration, swapped on reload.
    pub config: Arc<ArcSwap<ContactConfig>>,
    pub service: Arc<ContactService<WebhookForwarder>>,
}

/// HTTP server for the contact edge.
pub struct HttpServer {
    router: Router,
    config: Arc<ArcSwap<ContactConfig>>,
    ledger: Arc<RateLimitLedger>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ContactConfig) -> Result<Self, ForwardError> {
        let ledger = Arc::new(RateLimitLedger::new());
        let forwarder = WebhookForwarder::new(&config.webhook)?;
        let service = Arc::new(ContactService::new(ledger.clone(), forwarder));

        let router = Self::build_router(&config);
        let config = Arc::new(ArcSwap::from_pointee(config));
        let state = AppState {
            config: config.clone(),
            service,
        };

        Ok(Self {
            router: router.with_state(state),
            config,
            ledger,
        })
    }

    /// Build the Axum router with the routes.
    ///
    /// The endpoint path is read once; changing it needs a restart.
    fn build_router(config: &ContactConfig) -> Router<AppState> {
        let contact = post(submit_contact)
            .options(preflight)
            .fallback(method_not_allowed);

        Router::new()
            .route(&config.listener.endpoint_path, contact)
            .route("/health", get(health))
    }

    /// Wrap the stateful router in the middleware stack.
    #[allow(deprecated)]
    fn layered(router: Router, config: &ContactConfig) -> Router {
        let router = router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        let router = if config.security.enable_headers {
            headers::with_security_headers(router)
        } else {
            router
        };

        router
            .layer(headers::cors_layer())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        Self::layered(self.router.clone(), &self.config.load())
    }

    /// Shared handle to the live configuration.
    pub fn config(&self) -> Arc<ArcSwap<ContactConfig>> {
        self.config.clone()
    }

    pub fn ledger(&self) -> Arc<RateLimitLedger> {
        self.ledger.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ContactConfig>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut stop = shutdown.subscribe();
        self.spawn_background(config_updates, &shutdown);

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: &TlsConfig,
        config_updates: mpsc::UnboundedReceiver<ContactConfig>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let mut stop = shutdown.subscribe();
        let stopper = handle.clone();
        tokio::spawn(async move {
            let _ = stop.recv().await;
            stopper.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        self.spawn_background(config_updates, &shutdown);

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Config reload loop and ledger sweeper. Both stop on shutdown.
    fn spawn_background(
        &self,
        mut config_updates: mpsc::UnboundedReceiver<ContactConfig>,
        shutdown: &Shutdown,
    ) {
        rate_limit::spawn_sweeper(self.ledger.clone(), self.config.clone(), shutdown.subscribe());

        let config = self.config.clone();
        let mut stop = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(new_config) => {
                            tracing::info!(
                                webhook_configured = new_config.webhook.url.is_some(),
                                max_submissions = new_config.rate_limit.max_submissions,
                                "Applying reloaded configuration"
                            );
                            config.store(Arc::new(new_config));
                        }
                        None => break,
                    },
                    _ = stop.recv() => break,
                }
            }
        });
    }
}
