#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campaign_intake::cli::main().await
}
