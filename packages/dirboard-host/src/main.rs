#[tokio::main]
async fn main() {
    if let Err(e) = dirboard_host::run().await {
        log::error!("dirboard failed: {}", e);
        eprintln!("dirboard: {}", e);
        std::process::exit(1);
    }
}
