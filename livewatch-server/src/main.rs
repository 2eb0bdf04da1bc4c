use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use livewatch_client::{AlertStore, HttpStatusClient, PollScheduler};
use livewatch_common::traits::platform_traits::LivePlatformClient;
use livewatch_common::traits::repository_traits::ContentStore;
use livewatch_core::platforms::{EnvCredentials, TwitchLiveClient, YouTubeLiveClient};
use livewatch_core::repositories::{JsonFileContentStore, PostgresContentStore};
use livewatch_core::services::StatusService;
use livewatch_core::{Database, DefaultHttpClient, Error};

mod server;

use server::AppState;

#[derive(Parser, Debug, Clone)]
#[command(name = "livewatch")]
#[command(author, version, about = "livewatch - aggregated Twitch/YouTube live status with a desktop alert poller")]
struct Args {
    /// Mode: "server" or "client"
    #[arg(long, default_value = "server")]
    mode: String,

    /// Address the status endpoint binds to
    #[arg(long, default_value = "0.0.0.0:8787")]
    server_addr: String,

    /// JSON roster file, re-read on every request. Ignored when --db-url is set.
    #[arg(long, default_value = "roster.json")]
    roster_file: String,

    /// Postgres connection URL for the content store.
    #[arg(long)]
    db_url: Option<String>,

    /// Per-platform deadline for upstream lookups
    #[arg(long, default_value_t = 10)]
    platform_timeout_secs: u64,

    /// Status endpoint the client polls
    #[arg(long, default_value = "http://127.0.0.1:8787/api/live-status")]
    status_url: String,

    #[arg(long, default_value_t = 60)]
    poll_interval_secs: u64,

    /// Deadline for one status poll; defaults to the poll interval
    #[arg(long)]
    poll_timeout_secs: Option<u64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("livewatch=info"));
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("livewatch starting. mode={}", args.mode);

    match args.mode.as_str() {
        "server" => {
            if let Err(e) = run_server(args).await {
                error!("Server error: {:?}", e);
            }
        }
        "client" => {
            if let Err(e) = run_client(args).await {
                error!("Client error: {:?}", e);
            }
        }
        other => {
            error!("Invalid mode '{}'. Use --mode=server or --mode=client.", other);
        }
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn open_content_store(args: &Args) -> Result<Arc<dyn ContentStore>, Error> {
    match &args.db_url {
        Some(url) => {
            let db = Database::new(url).await?;
            db.migrate().await?;
            info!("Content store: postgres");
            Ok(Arc::new(PostgresContentStore::new(db.pool().clone())))
        }
        None => {
            info!("Content store: roster file '{}'", args.roster_file);
            Ok(Arc::new(JsonFileContentStore::new(&args.roster_file)))
        }
    }
}

async fn run_server(args: Args) -> Result<(), Error> {
    let addr: SocketAddr = args.server_addr.parse()?;
    let store = open_content_store(&args).await?;

    let http = Arc::new(DefaultHttpClient::new());
    let credentials = Arc::new(EnvCredentials);
    let clients: Vec<Arc<dyn LivePlatformClient>> = vec![
        Arc::new(TwitchLiveClient::new(http.clone(), credentials.clone())),
        Arc::new(YouTubeLiveClient::new(http, credentials)),
    ];

    let status = StatusService::new(store, clients)
        .with_platform_timeout(Duration::from_secs(args.platform_timeout_secs));

    let state = AppState { status: Arc::new(status) };
    server::serve(addr, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("ctrl_c listener failed: {}", e);
        }
        info!("Ctrl-C detected; shutting down...");
    })
    .await
}

async fn run_client(args: Args) -> Result<(), Error> {
    let interval = Duration::from_secs(args.poll_interval_secs);
    let poll_timeout = args.poll_timeout_secs.map(Duration::from_secs).unwrap_or(interval);
    let store = AlertStore::new();
    let source = Arc::new(HttpStatusClient::new(&args.status_url, poll_timeout)?);

    // Stand-in display surface: log every change to the alert state.
    let mut updates = store.subscribe();
    let display = tokio::spawn(async move {
        let mut last_primary: Option<String> = None;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            let primary = state.primary();
            let key = primary.as_ref().map(|s| s.channel_id.clone());
            if key == last_primary {
                continue;
            }
            last_primary = key;
            match primary {
                Some(stream) if state.show_alert => info!(
                    "LIVE on {}: {} - {} ({})",
                    stream.platform, stream.channel_name, stream.title, stream.stream_url
                ),
                _ => info!("No live streams."),
            }
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = PollScheduler::new(source, store)
        .with_interval(interval)
        .with_poll_timeout(poll_timeout)
        .spawn(shutdown_rx);

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C detected; stopping poller...");
    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        warn!("Poller task ended abnormally: {}", e);
    }
    display.abort();
    Ok(())
}
