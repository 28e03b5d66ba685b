use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};

async fn shutdown_signal(pid: u32) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(service = "kvp", event = "signal_failed", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "kvp", event = "shutdown_signal", pid, "received Ctrl+C, shutting down");
}

fn main() -> std::process::ExitCode {
    // .env first so CONFIG_PATH / RUST_LOG / LOG_FORMAT apply
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(LogFormat::Compact);
            error!(
                service = "kvp",
                event = "config_invalid",
                error = %e,
                "failed to load configuration"
            );
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "kvp", event = "panic", pid, message = %info, "unhandled panic occurred");
    }));

    let threads = cfg.server.effective_worker_threads();
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "kvp",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "kvp",
        event = "start",
        pid,
        version,
        threads,
        cpus = common::env::available_cpus(),
        "running with {} worker threads",
        threads
    );

    rt.block_on(async move {
        match server::run(cfg, shutdown_signal(pid)).await {
            Ok(()) => {
                info!(service = "kvp", event = "stop", pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "kvp",
                    event = "run_failed",
                    error = %e,
                    "server::run returned error"
                );
                std::process::ExitCode::FAILURE
            }
        }
    })
}
