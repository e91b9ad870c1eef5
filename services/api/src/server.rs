use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRecruitStore};
use crate::routes::with_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_board::ats::CachedStore;
use recruit_board::board::{BoardService, JsonFileScopeStore};
use recruit_board::config::AppConfig;
use recruit_board::error::AppError;
use recruit_board::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seeded = match &config.board.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading ATS seed data");
            InMemoryRecruitStore::from_seed_path(path)?
        }
        None => InMemoryRecruitStore::demo()?,
    };
    let store = Arc::new(CachedStore::from_config(seeded, &config.board));
    let scopes = Arc::new(JsonFileScopeStore::new(config.board.scope_path.clone()));
    let service = Arc::new(BoardService::new(store, scopes));

    let app = with_board_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        jobs_ttl_secs = config.board.jobs_ttl.as_secs(),
        candidates_ttl_secs = config.board.candidates_ttl.as_secs(),
        "recruiting board service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
