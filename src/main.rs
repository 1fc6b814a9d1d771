#[tokio::main]
async fn main() -> color_eyre::Result<()> {
  color_eyre::install()?;
  training_tracker_lib::run().await
}
