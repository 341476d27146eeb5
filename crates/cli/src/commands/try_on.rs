//! `lookbook try-on`: one composition against local files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lookbook_core::{CurrencyCode, Item, ItemId, Price};
use lookbook_studio::config::GeminiConfig;
use lookbook_studio::gemini::GeminiClient;
use lookbook_studio::media::{ImageFetcher, prepare_photo};
use lookbook_studio::tryon::{EchoEngine, TryOnEngine, TryOnService};
use rust_decimal::Decimal;

use super::{CommandError, read_image, write_file};

/// Arguments of `try-on`.
pub struct TryOnArgs {
    pub photo: PathBuf,
    pub item_image: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub worn: Vec<String>,
    pub out: PathBuf,
    pub demo: bool,
}

/// Render the item onto the photo and write the result.
pub async fn run(args: TryOnArgs) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let engine = if args.demo {
        TryOnEngine::Echo(EchoEngine::new(Duration::ZERO))
    } else {
        let config = GeminiConfig::require_from_env()?;
        TryOnEngine::Gemini(GeminiClient::new(&config)?)
    };
    let proxy = std::env::var("IMAGE_PROXY_URL").ok().filter(|p| !p.is_empty());
    let service = TryOnService::new(engine, ImageFetcher::new(proxy)?);

    let photo = prepare_photo(&read_image(&args.photo).await?)?;

    // Local files travel as data URLs, which the fetcher passes through.
    let image_url = if Path::new(&args.item_image).is_file() {
        read_image(Path::new(&args.item_image)).await?.to_string()
    } else {
        args.item_image
    };

    let item = Item {
        id: ItemId::new(1),
        name: args.name,
        price: Price::new(args.price, CurrencyCode::default()),
        image_url,
        category: args.category,
        try_on: true,
    };
    let worn: Vec<Item> = args
        .worn
        .into_iter()
        .zip(2..)
        .map(|(name, id)| Item {
            id: ItemId::new(id),
            name,
            price: Price::zero(CurrencyCode::default()),
            image_url: String::new(),
            category: String::new(),
            try_on: true,
        })
        .collect();

    tracing::info!(
        item = %item.name,
        worn = worn.len(),
        live = service.engine().is_live(),
        "Rendering try-on"
    );
    let result = service.render(&photo, &item, &worn).await?;
    write_file(&args.out, &result.decode()?).await?;

    tracing::info!(
        out = %args.out.display(),
        mime = result.mime_type(),
        "Try-on written"
    );
    Ok(())
}
