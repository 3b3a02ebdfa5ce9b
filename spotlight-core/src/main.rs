//! src/main.rs
//! Spotlight: a terminal host with a Ctrl+K global search overlay.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
#[cfg(not(unix))]
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use spotlight_core::{
    Logger,
    backend::{Catalog, SearchBackend},
    config::Config,
    controller::SpotlightApp,
    logging::LoggerConfig,
    view::theme,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let (config, load_error) = match Config::load().await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _log_guard: WorkerGuard = init_logging(&config)?;
    info!("Starting Spotlight");
    if let Some(e) = load_error {
        info!("Failed to load config, using defaults: {:#}", e);
    }

    setup_panic_handler();

    let backend = build_backend(&config).await?;

    let app = App::new(&config, backend).context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let logger_config = LoggerConfig::from_app_config(config)?;
    Logger::init_tracing(&logger_config).context("Failed to initialize logging")
}

async fn build_backend(config: &Config) -> Result<Arc<dyn SearchBackend>> {
    let mut catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path)
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => {
            info!("No catalog configured, using the sample catalog");
            Catalog::sample()
        }
    };

    if !config.catalog.models.is_empty() {
        catalog = catalog.with_configs(config.catalog.models.clone());
    }
    if let Err(e) = catalog.validate() {
        warn!("Catalog configuration has problems: {}", e);
    }

    Ok(Arc::new(catalog.with_latency(config.catalog.latency)))
}

struct App {
    terminal: AppTerminal,
    spotlight: SpotlightApp,
    shutdown: CancellationToken,
}

impl App {
    fn new(config: &Config, backend: Arc<dyn SearchBackend>) -> Result<Self> {
        theme::init_theme();
        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        let spotlight = SpotlightApp::mount(&config.search, backend);

        Ok(Self {
            terminal,
            spotlight,
            shutdown: CancellationToken::new(),
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();

        let events = EventStream::new();
        self.spotlight
            .run(&mut self.terminal, events, self.shutdown.clone())
            .await
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Failed to install signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                    _ = shutdown.cancelled() => return,
                }
            }

            #[cfg(not(unix))]
            {
                tokio::select! {
                    res = signal::ctrl_c() => {
                        if let Err(e) = res {
                            warn!("Failed to listen for Ctrl+C: {}", e);
                            return;
                        }
                        info!("Received Ctrl+C");
                    }
                    _ = shutdown.cancelled() => return,
                }
            }

            shutdown.cancel();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
