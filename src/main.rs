use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use trellis::app::{router, AppState};
use trellis::config::PortalConfig;
use trellis::fetch::client::{CollectionSource, HttpCollectionSource, StaticCollectionSource};
use trellis::fetch::store::SnapshotStore;
use trellis::notices::board::{Audience, Notice, NoticeBoard};
use trellis::notices::store::{InMemoryDismissalStore, JsonFileDismissalStore, NoticeDismissalStore};
use trellis::notifications::feed::NotificationFeed;
use trellis::search::discovery::recommend_projects;
use trellis::search::filter::{SearchFilters, SearchParams};
use trellis::search::session::SearchSession;

#[derive(Parser)]
#[command(name = "trellis", version, about = "Search and discovery for the portal's collections")]
struct Cli {
    /// Config file (defaults to $TRELLIS_CONFIG or ./trellis.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read collections from a JSON snapshot instead of the REST API
    #[arg(long, global = true)]
    snapshot_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the search API
    Serve {
        /// Address to bind, overriding server.bind_addr
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one search and print the ranked results as JSON
    Search {
        #[arg(default_value = "")]
        query: String,
        /// all, projects, news, events, gallery or members
        #[arg(long = "type", default_value = "all")]
        entity_type: String,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Read queries from stdin, one per line, and print results once typing settles
    Watch {
        /// all, projects, news, events, gallery or members
        #[arg(long = "type", default_value = "all")]
        entity_type: String,
    },
    /// Print recommended projects as JSON
    Discover {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the notices visible to an audience, optionally dismissing some first
    Notices {
        /// JSON array of notices
        file: PathBuf,
        #[arg(long, default_value = "public")]
        audience: String,
        #[arg(long)]
        dismiss: Vec<String>,
        /// Bring back all dismissed notices before listing
        #[arg(long)]
        restore: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let source: Arc<dyn CollectionSource> = match &cli.snapshot_file {
        Some(path) => Arc::new(StaticCollectionSource::from_json_file(path).await?),
        None => Arc::new(HttpCollectionSource::new(&config.api_base_url)?),
    };
    let store = Arc::new(SnapshotStore::new(source));

    match cli.command {
        Command::Serve { bind } => serve(config, store, bind).await,
        Command::Search {
            query,
            entity_type,
            category,
            status,
            limit,
        } => {
            store.refresh().await;
            let filters = SearchFilters::try_from(SearchParams {
                q: query,
                entity_type: Some(entity_type),
                category: Some(category),
                status: Some(status),
            })?;
            let mut results = config.search.engine().search(&store.snapshot(), &filters);
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Command::Watch { entity_type } => watch(config, store, entity_type).await,
        Command::Discover { limit } => {
            store.refresh().await;
            let recommendations = recommend_projects(
                &store.snapshot().projects,
                &config.discovery.rules,
                limit.unwrap_or(config.discovery.limit),
                chrono::Utc::now(),
            )?;
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
            Ok(())
        }
        Command::Notices {
            file,
            audience,
            dismiss,
            restore,
        } => {
            let raw = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let notices: Vec<Notice> = serde_json::from_slice(&raw)
                .with_context(|| format!("Invalid notices in {}", file.display()))?;
            let audience: Audience = audience.parse()?;

            let dismissals: Arc<dyn NoticeDismissalStore> = match &config.notices.dismissal_path {
                Some(path) => Arc::new(JsonFileDismissalStore::new(path)),
                None => Arc::new(InMemoryDismissalStore::default()),
            };
            let board = NoticeBoard::new(dismissals);
            if restore {
                board.restore_all().await?;
            }
            for id in &dismiss {
                board.dismiss(id).await?;
            }

            let visible = board.visible(&notices, audience, chrono::Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&visible)?);
            Ok(())
        }
    }
}

async fn serve(
    config: PortalConfig,
    store: Arc<SnapshotStore>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    tracing::info!("Starting Trellis search API...");

    let report = store.refresh().await;
    if !report.is_complete() {
        tracing::warn!("Initial snapshot incomplete: {:?} unavailable", report.failed);
    }

    let feed = Arc::new(NotificationFeed::spawn(
        config.notifications.reconnect.clone(),
        config.notifications.inbox_capacity,
    ));

    if config.server.refresh_interval_secs > 0 {
        let store = store.clone();
        let feed = feed.clone();
        let period = Duration::from_secs(config.server.refresh_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; the initial refresh already ran.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let report = store.refresh().await;
                feed.announce_refresh(&report);
            }
        });
    }

    let app_state = AppState {
        store,
        engine: Arc::new(config.search.engine()),
        discovery: config.discovery.clone(),
        feed,
    };

    let app = router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = bind.unwrap_or(config.server.bind_addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn watch(
    config: PortalConfig,
    store: Arc<SnapshotStore>,
    entity_type: String,
) -> anyhow::Result<()> {
    store.refresh().await;

    let session = SearchSession::spawn(
        store,
        Arc::new(config.search.engine()),
        config.search.debounce(),
    );
    let mut results = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = false;

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(query) => {
                    let filters = SearchFilters::try_from(SearchParams {
                        q: query,
                        entity_type: Some(entity_type.clone()),
                        category: None,
                        status: None,
                    })?;
                    session.update(filters)?;
                    pending = true;
                }
                None => break,
            },
            changed = results.changed() => {
                changed.context("Search session stopped")?;
                pending = false;
                let hits = results.borrow_and_update().clone();
                println!("{}", serde_json::to_string(&*hits)?);
            }
        }
    }

    // Input ended while a query was still settling.
    if pending {
        results.changed().await.context("Search session stopped")?;
        let hits = results.borrow_and_update().clone();
        println!("{}", serde_json::to_string(&*hits)?);
    }
    Ok(())
}
