use crate::cli::ServeArgs;
use crate::infra::{seed_demo_submissions, AppState, LoggingDispatcher};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use insureflow::config::AppConfig;
use insureflow::error::AppError;
use insureflow::telemetry;
use insureflow::workflows::submissions::{
    InMemorySubmissionRepository, SubmissionWorkflowService,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySubmissionRepository::default());
    let dispatcher = Arc::new(LoggingDispatcher);
    let workflow_service = Arc::new(SubmissionWorkflowService::new(repository, dispatcher));

    if args.seed_demo {
        seed_demo_submissions(workflow_service.as_ref())?;
        info!("demo submission set loaded");
    }

    let app = with_workflow_routes(workflow_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "submission workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
