//! pycpp-debug binary entry point.

use std::sync::Arc;

use tracing::{error, info};

use pycpp_debug::bridge::StdioBridge;
use pycpp_debug::cli::{self, Command};
use pycpp_debug::launch::{DualSessionOrchestrator, LaunchRegistry, SessionEventSink};
use pycpp_debug::resolve::{EnvInterpreter, ResolveContext};
use pycpp_debug::{commands, LaunchCatalog, LaunchError};

#[tokio::main]
async fn main() -> pycpp_debug::Result<()> {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    };

    if args.help {
        cli::print_help();
        return Ok(());
    }
    if args.version {
        cli::print_version();
        return Ok(());
    }

    match args.log_level.as_deref() {
        Some(level) => pycpp_debug::logging::init_with(level),
        None => pycpp_debug::logging::init(),
    }
    info!("pycpp-debug v{}", env!("CARGO_PKG_VERSION"));

    let catalog = match &args.catalog {
        Some(path) => LaunchCatalog::from_file(path).map_err(|err| {
            error!(%err, "failed to load launch catalog");
            LaunchError::ConfigurationMissing(err.to_string())
        })?,
        None => LaunchCatalog::empty(),
    };

    let workspace = args
        .workspace
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut ctx = ResolveContext::new(workspace).with_interpreter_source(Arc::new(EnvInterpreter));

    let (host, events) = StdioBridge::over_stdio();
    SessionEventSink::new().attach(events);

    let registry = Arc::new(LaunchRegistry::new());
    let orchestrator = DualSessionOrchestrator::new(host, registry.clone());

    match args.command {
        Command::Restart => {
            let stopped = commands::restart_interpreted(&registry).await?;
            info!(stopped, "restart helper finished");
            Ok(())
        }
        Command::Launch | Command::Run => {
            let no_debug = args.command == Command::Run;

            // A named composite configuration comes from the catalog;
            // otherwise fall back to the built-in editor-contents request.
            let mut request = match &args.name {
                Some(name) => commands::catalog_request(&catalog, name, no_debug)?,
                None => commands::editor_contents_request(no_debug),
            };
            request.optimized_launch = request.optimized_launch || args.optimized;

            let launch = orchestrator.launch(&request, &catalog, &mut ctx).await?;
            info!(id = %launch.id, "coordinated launch underway");

            // The launch request is answered once both sessions are
            // underway; the resume step finishes in the background.
            launch.resume_task.await.ok();
            Ok(())
        }
    }
}
