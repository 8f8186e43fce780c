/*
 * Responsibility
 * - Start the tokio runtime
 * - Call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    foro_hub::app::run().await
}
