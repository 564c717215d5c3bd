use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repo_picker=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = repo_picker::run().await {
        tracing::error!("Error: {err}");
        std::process::exit(1);
    }
}
