use clap::Parser;
use job_scrapers::commands::{self, GalleryArgs};


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = GalleryArgs::parse();
    let config = commands::init()?;

    commands::scrape_gallery(&args, &config).await?;
    Ok(())
}
