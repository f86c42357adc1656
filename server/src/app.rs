//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::postgres::PostgresService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<PostgresService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let database = Arc::new(PostgresService::init(&config.postgres).await?);
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
        })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(
                app.database
                    .start_health_check_task(app.shutdown.subscribe()),
            )
            .await;

        tracing::info!(
            host = %app.config.server.host,
            port = app.config.server.port,
            "Starting server"
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
