#[tokio::main]
async fn main() {
    if let Err(e) = barwave::app::run().await {
        tracing::error!("{e:#}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
