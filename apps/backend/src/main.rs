#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tango_cards_backend::run().await
}
