use std::sync::Arc;

use clap::Parser;
use tracing::info;

use webroot::config::{AppState, Config};
use webroot::plugin::markdown::MarkdownPluginInfo;
use webroot::server::{create_reusable_listener, shutdown_signal, start_server_loop};
use webroot::{logger, Dispatcher, Registry};

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let config = Config::load(&cli.into_overrides())?;
    let _log_guard = logger::init(&config.logging)?;

    let roots = config.roots()?;
    let mut registry = Registry::new();
    registry.register_info(&MarkdownPluginInfo, &config.plugin_options(&roots));

    let dispatcher = Dispatcher::new(roots, Arc::new(registry))
        .with_cors(config.cors_policy())
        .quiet(config.logging.quiet);

    // Tokio runtime, thread count from `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(config, dispatcher))
}

async fn async_main(config: Config, dispatcher: Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &config);

    let state = Arc::new(AppState::new(config, dispatcher));
    start_server_loop(listener, state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}
