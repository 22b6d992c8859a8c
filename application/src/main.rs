use std::{
    future::IntoFuture as _,
    io,
    sync::{Arc, OnceLock},
    time,
};

use application::{api, config::Cors, graphql, Args, Config};
use axum::{
    body::Body,
    extract::MatchedPath,
    routing::{on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use juniper::EmptySubscription;
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// Levels written to stderr instead of stdout.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Configured verbosity, `INFO` until the [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    init_logging();

    if run().await.is_err() {
        std::process::exit(1);
    }
}

/// Sets up stdout and stderr log outputs.
fn init_logging() {
    fn emits(meta: &log::Metadata<'_>, to_stderr: bool) -> bool {
        let max = LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO);
        meta.is_span()
            || STDERR_LEVELS.contains(meta.level()) == to_stderr
                && max >= *meta.level()
    }

    let stdout = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(io::stdout)
        .with_filter(filter_fn(|meta| emits(meta, false)));
    let stderr = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(io::stderr)
        .with_filter(filter_fn(|meta| emits(meta, true)));

    tracing_subscriber::registry().with(stdout).with(stderr).init();
}

/// Boots the rental backend and serves it until failure.
async fn run() -> Result<(), ()> {
    // Also handles `--help` and `--version`.
    let args = Args::parse().unwrap_or_else(|e| e.exit());

    let Config {
        server,
        service: service_conf,
        postgres: postgres_conf,
        log,
    } = Config::new(&args.config).map_err(|e| {
        log::error!("cannot load configuration from `{}`: {e}", args.config);
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("set only once on startup"));

    let mut db = Postgres::new(&postgres_conf.into()).map_err(|e| {
        log::error!("cannot set up PostgreSQL pool: {e}");
    })?;

    let report = migrations::runner()
        .run_async(&mut db)
        .await
        .map_err(|e| log::error!("cannot migrate the database: {e}"))?;
    log::info!(
        applied = report.applied_migrations().len(),
        "database schema is up to date",
    );

    let service = Service::new(service_conf.into(), db);
    let app = router(service, cors(&server.cors)?);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        log::error!("cannot listen on `{addr}`: {e}");
    })?;
    log::info!("serving GraphQL on `http://{addr}/graphql`");

    axum::serve(listener, app)
        .into_future()
        .await
        .map_err(|e| log::error!("HTTP server stopped: {e}"))
}

/// Builds the [`CorsLayer`] allowing the configured origins.
fn cors(conf: &Cors) -> Result<CorsLayer, ()> {
    let layer = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([http::header::CONTENT_TYPE]);

    conf.origins.iter().try_fold(layer, |layer, origin| {
        let value = origin.parse::<http::HeaderValue>().map_err(|e| {
            log::error!("invalid CORS origin `{origin}`: {e}");
        })?;
        Ok(layer.allow_origin(value))
    })
}

/// Builds the HTTP [`Router`] exposing the GraphQL API at `/graphql`.
fn router(service: Service<Postgres>, cors: CorsLayer) -> Router {
    let schema =
        api::Schema::new(api::Query, api::Mutation, EmptySubscription::new());

    Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(log_response),
        )
}

/// Opens a span describing an incoming HTTP request.
fn request_span(req: &http::Request<Body>) -> tracing::Span {
    let client_ip = InsecureClientIp::from(req.headers(), req.extensions())
        .ok()
        .map(|ip| ip.0.to_string());
    let route = req.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
    let user_agent = req
        .headers()
        .get(http::header::USER_AGENT)
        .and_then(|h| h.to_str().ok());

    tracing::info_span!(
        "HTTP request",
        http.client_ip = client_ip,
        http.flavor = ?req.version(),
        http.host = req.uri().host(),
        http.method = req.method().as_str(),
        http.route = route,
        http.scheme = req.uri().scheme().map(http::uri::Scheme::as_str),
        http.target = req
            .uri()
            .path_and_query()
            .map(http::uri::PathAndQuery::as_str),
        http.user_agent = user_agent,
        http.status_code = tracing::field::Empty,
    )
}

/// Records the outcome of an HTTP request into its `span`.
fn log_response(
    res: &http::Response<Body>,
    latency: time::Duration,
    span: &tracing::Span,
) {
    let status = res.status();
    _ = span.record("http.status_code", status.as_u16());

    let duration = format!("{}ms", latency.as_millis());
    if status.is_client_error() || status.is_server_error() {
        tracing::error!(duration = duration.as_str());
    } else {
        tracing::info!(duration = duration.as_str());
    }
}
