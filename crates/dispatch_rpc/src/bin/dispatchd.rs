//! `dispatchd`: runs the five services plus the workflow orchestrator.
//!
//! All services share one process here, but the orchestrator still reaches
//! them through the HTTP clients on the configured endpoints, exactly as a
//! split deployment would. Exits non-zero when a bind fails or the initial
//! pricing config is invalid.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dispatch_core::clock::SystemClock;
use dispatch_core::matching::NearestDriverPolicy;
use dispatch_core::pricing::{ConfigStore, ConfigWatcher, PricingEngine};
use dispatch_core::services::{
    DriverStatusService, MatchingService, TripRequestService, TripService,
};
use dispatch_core::store::TtlStore;
use dispatch_core::telemetry::TelemetryRecorder;
use dispatch_core::workflow::{Collaborators, RetryPolicy, TripWorkflow};

use dispatch_rpc::client::{
    DriverStatusClient, MatchingClient, PricingClient, RpcClient, TripClient, TripRequestClient,
};
use dispatch_rpc::endpoints::{self, base_url};
use dispatch_rpc::server::{
    bind, driver_status_router, matching_router, pricing_router, serve, trip_request_router,
    trip_router, workflow_router,
};

#[derive(Debug, Parser)]
#[command(name = "dispatchd", about = "Trip orchestration control plane")]
struct Args {
    /// Path to the pricing configuration YAML.
    #[arg(long, env = "PRICING_CONFIG", default_value = "config/pricing_config.yaml")]
    pricing_config: PathBuf,

    /// Seconds between pricing config reload checks.
    #[arg(long, env = "RELOAD_INTERVAL_SECS", default_value_t = 30)]
    reload_interval_secs: u64,

    /// Per-RPC deadline for the orchestrator's calls, in milliseconds.
    #[arg(long, env = "RPC_TIMEOUT_MS", default_value_t = 2000)]
    rpc_timeout_ms: u64,

    #[arg(long, env = "TRIP_REQUEST_ADDR", default_value = endpoints::DEFAULT_TRIP_REQUEST_ADDR)]
    trip_request_addr: SocketAddr,

    #[arg(long, env = "MATCHING_ADDR", default_value = endpoints::DEFAULT_MATCHING_ADDR)]
    matching_addr: SocketAddr,

    #[arg(long, env = "TRIP_ADDR", default_value = endpoints::DEFAULT_TRIP_ADDR)]
    trip_addr: SocketAddr,

    #[arg(long, env = "DRIVER_STATUS_ADDR", default_value = endpoints::DEFAULT_DRIVER_STATUS_ADDR)]
    driver_status_addr: SocketAddr,

    #[arg(long, env = "PRICING_ADDR", default_value = endpoints::DEFAULT_PRICING_ADDR)]
    pricing_addr: SocketAddr,

    #[arg(long, env = "WORKFLOW_ADDR", default_value = endpoints::DEFAULT_WORKFLOW_ADDR)]
    workflow_addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    // Pricing config must load before anything binds.
    let clock = Arc::new(SystemClock);
    let config_store = Arc::new(ConfigStore::new());
    let watcher = Arc::new(ConfigWatcher::new(
        &args.pricing_config,
        Duration::from_secs(args.reload_interval_secs),
        config_store.clone(),
    ));
    watcher
        .load_initial()
        .with_context(|| format!("invalid pricing config {}", args.pricing_config.display()))?;
    watcher.spawn();

    // In-process services.
    let drivers = Arc::new(DriverStatusService::new());
    let trip_requests = Arc::new(TripRequestService::new(clock.clone()));
    let matching = Arc::new(MatchingService::new(
        drivers.clone(),
        Box::new(NearestDriverPolicy),
    ));
    let pricing = Arc::new(PricingEngine::new(config_store, clock.clone()));
    let trips = Arc::new(TripService::new(pricing.clone(), clock.clone()));

    // Bind everything up front so a taken port fails startup.
    let (trip_request_listener, trip_request_addr) = bind(args.trip_request_addr)
        .await
        .context("failed to bind trip request service")?;
    let (matching_listener, matching_addr) =
        bind(args.matching_addr).await.context("failed to bind matching service")?;
    let (trip_listener, trip_addr) =
        bind(args.trip_addr).await.context("failed to bind trip service")?;
    let (driver_status_listener, driver_status_addr) = bind(args.driver_status_addr)
        .await
        .context("failed to bind driver status service")?;
    let (pricing_listener, pricing_addr) =
        bind(args.pricing_addr).await.context("failed to bind pricing service")?;
    let (workflow_listener, workflow_addr) =
        bind(args.workflow_addr).await.context("failed to bind workflow endpoint")?;

    spawn_server("trip_request", trip_request_listener, trip_request_router(trip_requests));
    spawn_server("matching", matching_listener, matching_router(matching));
    spawn_server("trip", trip_listener, trip_router(trips));
    spawn_server("driver_status", driver_status_listener, driver_status_router(drivers));
    spawn_server("pricing", pricing_listener, pricing_router(pricing));

    // The orchestrator goes through the wire like any external caller.
    let timeout = Duration::from_millis(args.rpc_timeout_ms);
    let services = Collaborators {
        trip_requests: Arc::new(TripRequestClient::new(RpcClient::new(
            &base_url(trip_request_addr),
            timeout,
        )?)),
        matching: Arc::new(MatchingClient::new(RpcClient::new(
            &base_url(matching_addr),
            timeout,
        )?)),
        pricing: Arc::new(PricingClient::new(RpcClient::new(
            &base_url(pricing_addr),
            timeout,
        )?)),
        driver_status: Arc::new(DriverStatusClient::new(RpcClient::new(
            &base_url(driver_status_addr),
            timeout,
        )?)),
        trips: Arc::new(TripClient::new(RpcClient::new(&base_url(trip_addr), timeout)?)),
    };
    let workflow = Arc::new(TripWorkflow::new(
        services,
        Arc::new(TtlStore::new()),
        Arc::new(TelemetryRecorder::new()),
        clock,
        RetryPolicy {
            call_timeout: timeout,
            ..RetryPolicy::default()
        },
    ));
    spawn_server("workflow", workflow_listener, workflow_router(workflow));

    info!(
        %trip_request_addr,
        %matching_addr,
        %trip_addr,
        %driver_status_addr,
        %pricing_addr,
        %workflow_addr,
        "dispatchd listening"
    );

    tokio::signal::ctrl_c().await.context("failed to wait for shutdown signal")?;
    info!("shutting down");
    Ok(())
}

fn spawn_server(name: &'static str, listener: tokio::net::TcpListener, router: axum::Router) {
    tokio::spawn(async move {
        if let Err(server_error) = serve(listener, router).await {
            error!(name, %server_error, "server exited");
        }
    });
}
