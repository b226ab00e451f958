use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use axum::{Router, http::StatusCode};
use core_config::server::ServerConfig;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto::Builder as ConnBuilder, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

/// Pause between failed `accept` calls.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Lifecycle of a [`Server`], published through [`Server::state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Listening,
    ShuttingDown,
    Stopped,
}

/// HTTP server with per-connection timeouts and coordinated graceful shutdown.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::{Server, ShutdownCoordinator};
/// use core_config::server::ServerConfig;
///
/// let server = Server::bind(&ServerConfig::default()).await?;
/// let coordinator = ShutdownCoordinator::new();
///
/// let signals = coordinator.clone();
/// tokio::spawn(async move { signals.wait_for_signal().await });
///
/// server.run(router, coordinator).await?;
/// ```
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    state_tx: watch::Sender<ServerState>,
}

impl Server {
    /// Binds the listener for `config.address()`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(config: &ServerConfig) -> io::Result<Self> {
        let (state_tx, _) = watch::channel(ServerState::Created);
        let listener = TcpListener::bind(config.address()).await?;
        state_tx.send_replace(ServerState::Listening);

        info!("Server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            config: config.clone(),
            state_tx,
        })
    }

    /// Address actually bound (useful when the configured port is 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Subscribe to lifecycle changes.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state_tx.subscribe()
    }

    /// Serve `router` until `coordinator` fires, then drain.
    ///
    /// On shutdown the accept loop stops, open connections are told to
    /// finish their current request and close, and the whole drain is
    /// bounded by `shutdown_grace`. Connection tasks still running after
    /// that are aborted, which closes their sockets.
    pub async fn run(self, router: Router, coordinator: ShutdownCoordinator) -> io::Result<()> {
        let Server {
            listener,
            config,
            state_tx,
        } = self;

        let service = TowerToHyperService::new(connection_service(router, &config));

        let mut builder = ConnBuilder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(config.idle_timeout);

        let graceful = GracefulShutdown::new();
        let mut connections = JoinSet::new();
        let cancelled = coordinator.cancelled();
        tokio::pin!(cancelled);

        loop {
            tokio::select! {
                biased;

                () = &mut cancelled => {
                    info!(
                        in_flight = connections.len(),
                        "Shutdown signal received, no longer accepting connections"
                    );
                    break;
                }

                Some(_) = connections.join_next(), if !connections.is_empty() => {}

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            warn!("accept error: {e}");
                            pause_after_accept_error(&coordinator, ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };

                    let conn = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), service.clone())
                        .into_owned();
                    let conn = graceful.watch(conn);

                    connections.spawn(async move {
                        if let Err(e) = conn.await {
                            debug!(peer = %peer, "connection closed with error: {e}");
                        }
                    });
                }
            }
        }

        drop(listener);
        state_tx.send_replace(ServerState::ShuttingDown);

        match tokio::time::timeout(config.shutdown_grace, graceful.shutdown()).await {
            Ok(()) => info!("All connections closed"),
            Err(_) => warn!(
                in_flight = connections.len(),
                "Shutdown grace period of {:?} elapsed, aborting remaining connections",
                config.shutdown_grace
            ),
        }
        connections.shutdown().await;

        state_tx.send_replace(ServerState::Stopped);
        info!("Server stopped");
        Ok(())
    }
}

/// Waits out `backoff`, or less if shutdown starts meanwhile.
///
/// Persistent accept errors such as EMFILE fail immediately on every call.
async fn pause_after_accept_error(coordinator: &ShutdownCoordinator, backoff: Duration) {
    tokio::select! {
        () = coordinator.cancelled() => {}
        () = tokio::time::sleep(backoff) => {}
    }
}

/// Read and write timeouts, plus trailing-slash normalisation.
///
/// Path normalisation has to wrap the router from the outside so it runs
/// before routing. Handlers that exceed the write timeout answer 408.
fn connection_service(router: Router, config: &ServerConfig) -> NormalizePath<Router> {
    let router = router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.write_timeout,
        ))
        .layer(RequestBodyTimeoutLayer::new(config.read_timeout));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - OpenAPI JSON at `/api-docs/openapi.json` and the Scalar UI at `/scalar`
/// - the given routes, mounted at the root
/// - request tracing at INFO
/// - JSON 404 fallback
///
/// Health endpoints (`/health`, `/ready`) belong to the app's own routes.
///
/// # Type Parameters
/// * `T` - A type implementing `utoipa::OpenApi` for API documentation
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use utoipa::OpenApi;
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new().nest("/todo", todo_router);
/// let router = create_router::<ApiDoc>(api_routes);
/// ```
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    let openapi = T::openapi();

    Router::new()
        .route(
            "/api-docs/openapi.json",
            axum::routing::get({
                let doc = openapi.clone();
                move || async move { axum::Json(doc) }
            }),
        )
        .merge(Scalar::with_url("/scalar", openapi))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Notify;
    use tokio::task::JoinHandle;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn test_config() -> ServerConfig {
        let mut config = ServerConfig::new("127.0.0.1".to_string(), 0);
        config.shutdown_grace = Duration::from_secs(1);
        config
    }

    fn test_router() -> Router {
        create_router::<TestDoc>(Router::new().route("/ping", get(|| async { "pong" })))
    }

    /// Router whose `/slow` handler signals `entered` and then sleeps 30 s
    fn slow_router(entered: Arc<Notify>) -> Router {
        create_router::<TestDoc>(Router::new().route(
            "/slow",
            get(move || {
                let entered = entered.clone();
                async move {
                    entered.notify_one();
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    "late"
                }
            }),
        ))
    }

    struct Running {
        addr: SocketAddr,
        coordinator: ShutdownCoordinator,
        state: watch::Receiver<ServerState>,
        handle: JoinHandle<io::Result<()>>,
    }

    async fn start(config: ServerConfig, router: Router) -> Running {
        let server = Server::bind(&config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let state = server.state();
        let coordinator = ShutdownCoordinator::new();
        let handle = tokio::spawn(server.run(router, coordinator.clone()));
        Running {
            addr,
            coordinator,
            state,
            handle,
        }
    }

    #[tokio::test]
    async fn test_server_lifecycle() {
        let server = Server::bind(&test_config()).await.unwrap();
        let addr = server.local_addr().unwrap();
        let mut state = server.state();
        assert_eq!(*state.borrow(), ServerState::Listening);

        let coordinator = ShutdownCoordinator::new();
        let handle = tokio::spawn(server.run(test_router(), coordinator.clone()));

        let client = reqwest::Client::new();
        let body = client
            .get(format!("http://{addr}/ping/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        let missing = client
            .get(format!("http://{addr}/nope"))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let openapi = client
            .get(format!("http://{addr}/api-docs/openapi.json"))
            .send()
            .await
            .unwrap();
        assert_eq!(openapi.status(), reqwest::StatusCode::OK);

        coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop within grace period")
            .unwrap()
            .unwrap();

        state
            .wait_for(|s| *s == ServerState::Stopped)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_grace_period_bounds_in_flight_request() {
        let entered = Arc::new(Notify::new());
        let mut running = start(test_config(), slow_router(entered.clone())).await;

        let url = format!("http://{}/slow", running.addr);
        let request = tokio::spawn(async move { reqwest::get(url).await });
        entered.notified().await;

        let started = Instant::now();
        running.coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(5), running.handle)
            .await
            .expect("run should return once the grace period is over")
            .unwrap()
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(900), "returned after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "returned after {elapsed:?}");

        running
            .state
            .wait_for(|s| *s == ServerState::Stopped)
            .await
            .unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), request)
            .await
            .expect("aborted connection should end the request")
            .unwrap();
        assert!(outcome.is_err(), "the slow request must not complete");
    }

    #[tokio::test]
    async fn test_write_timeout_answers_408() {
        let mut config = test_config();
        config.write_timeout = Duration::from_secs(1);
        let running = start(config, slow_router(Arc::new(Notify::new()))).await;

        let started = Instant::now();
        let response = reqwest::get(format!("http://{}/slow", running.addr))
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(response.status(), reqwest::StatusCode::REQUEST_TIMEOUT);
        assert!(elapsed < Duration::from_secs(5), "answered after {elapsed:?}");

        running.coordinator.shutdown();
        running.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_idle_keep_alive_connection_is_closed() {
        let mut config = test_config();
        config.idle_timeout = Duration::from_secs(1);
        let running = start(config, test_router()).await;

        let mut stream = TcpStream::connect(running.addr).await.unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"pong") {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the response arrived");
            received.extend_from_slice(&buf[..n]);
        }

        let idle_since = Instant::now();
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        })
        .await;
        assert!(closed.is_ok(), "idle connection was kept open");
        assert!(idle_since.elapsed() < Duration::from_secs(3));

        running.coordinator.shutdown();
        running.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_accept_backoff_waits() {
        let coordinator = ShutdownCoordinator::new();
        let started = Instant::now();
        pause_after_accept_error(&coordinator, Duration::from_millis(50)).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_accept_backoff_ends_on_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.shutdown();

        tokio::time::timeout(
            Duration::from_secs(1),
            pause_after_accept_error(&coordinator, Duration::from_secs(60)),
        )
        .await
        .expect("shutdown should cut the backoff short");
    }

    #[tokio::test]
    async fn test_bind_fails_on_address_in_use() {
        let first = Server::bind(&test_config()).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let taken = ServerConfig::new("127.0.0.1".to_string(), port);
        assert!(Server::bind(&taken).await.is_err());
    }
}
