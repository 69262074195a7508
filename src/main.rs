use anyhow::Context;

use biblio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load biblio settings")?;
    biblio_app::bootstrap::run(&settings).await
}
