mod args;

use std::fs;

use anyhow::Context;
use clap::Parser;

use storefront_catalog::{CatalogConfig, InMemoryProductSource, Storefront};

use crate::args::Cli;

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let cli = Cli::parse();

    let mut config = CatalogConfig::from_env().context("invalid catalog configuration")?;
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    let payload = fs::read_to_string(&cli.payload)
        .with_context(|| format!("failed to read {}", cli.payload.display()))?;
    let source = InMemoryProductSource::from_payload(&payload)
        .with_context(|| format!("failed to parse {}", cli.payload.display()))?;

    let mut storefront = Storefront::new(source, config);
    storefront.load().context("failed to load products")?;

    let output = match cli.related {
        Some(id) => {
            let related = storefront.related(id)?;
            tracing::info!(%id, count = related.len(), "related products");
            render(&related, cli.pretty)?
        }
        None => {
            for command in cli.commands(storefront.bounds())? {
                storefront.dispatch(command)?;
            }
            let page = storefront.view()?;
            tracing::info!(
                total = page.total_count,
                page = page.page,
                total_pages = page.total_pages,
                "catalog page"
            );
            render(&page, cli.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn render<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
