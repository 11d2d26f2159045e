#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = tracnghiem_rust::run().await {
        eprintln!("tracnghiem-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
