use anyhow::Context;
use docserve::config::Config;
use docserve::files::{self, DocumentRoot};
use docserve::server::{self, ShutdownController};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load(std::env::args().skip(1))?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level())
        .init();

    files::ensure_document_root(&cfg.static_files.root, &cfg.static_files.index_file)?;
    let docroot = DocumentRoot::open(&cfg.static_files)?;
    tracing::info!(root = %docroot.canonical().display(), "Serving files");

    let listener = server::listener::bind(&cfg.server).context("Cannot start listener")?;

    let controller = ShutdownController::new();
    let receiver = controller.subscribe();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => controller.shutdown(),
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    server::listener::serve(listener, &docroot, &cfg.server, receiver).await
}
