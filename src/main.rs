#[tokio::main]
async fn main() -> anyhow::Result<()> {
    groupcount::logging::init();
    groupcount::app::run().await
}
