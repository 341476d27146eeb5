//! Lookbook CLI - try-on and animation tools for local files.
//!
//! # Usage
//!
//! ```bash
//! # Put a catalog item on a photo
//! lookbook try-on --photo me.jpg --item-image https://cdn.example/dress.jpg \
//!     --name "Vestido de Gala LV" --category dresses --price 15000 --out look.png
//!
//! # Same, without an API key (echoes the photo back)
//! lookbook try-on --demo --photo me.jpg --item-image dress.jpg \
//!     --name Vestido --category dresses --price 15000 --out look.png
//!
//! # Animate a look into a short clip
//! lookbook animate --image look.png --out look.mp4
//!
//! # Square and downscale a photo the way uploads are prepared
//! lookbook normalize --input me.jpg --out me-square.png
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - required by `try-on` (unless `--demo`) and `animate`
//! - `GEMINI_IMAGE_MODEL`, `GEMINI_VIDEO_MODELS`, `GEMINI_API_BASE` - model overrides
//! - `IMAGE_PROXY_URL` - relay prefix for remote item images

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "lookbook")]
#[command(author, version, about = "Lookbook try-on tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a catalog item onto a photo
    TryOn {
        /// Photo of the person
        #[arg(long)]
        photo: PathBuf,

        /// Item image: a URL or a local file
        #[arg(long)]
        item_image: String,

        /// Item name
        #[arg(long)]
        name: String,

        /// Item category (e.g. dresses, makeup)
        #[arg(long)]
        category: String,

        /// Item price
        #[arg(long, default_value = "0")]
        price: Decimal,

        /// Items already visible on the photo (repeatable)
        #[arg(long)]
        worn: Vec<String>,

        /// Output image file
        #[arg(short, long)]
        out: PathBuf,

        /// Echo the photo instead of calling the model
        #[arg(long)]
        demo: bool,
    },
    /// Generate a short video from a look
    Animate {
        /// Still image to animate
        #[arg(long)]
        image: PathBuf,

        /// Custom motion prompt
        #[arg(long)]
        prompt: Option<String>,

        /// Output video file
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Pad a photo to a square and downscale it
    Normalize {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file (PNG unless the input was already prepared)
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::TryOn {
            photo,
            item_image,
            name,
            category,
            price,
            worn,
            out,
            demo,
        } => {
            commands::try_on::run(commands::try_on::TryOnArgs {
                photo,
                item_image,
                name,
                category,
                price,
                worn,
                out,
                demo,
            })
            .await?;
        }
        Commands::Animate { image, prompt, out } => {
            commands::animate::run(&image, prompt.as_deref(), &out).await?;
        }
        Commands::Normalize { input, out } => {
            commands::normalize::run(&input, &out).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_try_on_args_parse() {
        let cli = Cli::try_parse_from([
            "lookbook", "try-on", "--photo", "me.jpg", "--item-image", "https://cdn/x.jpg",
            "--name", "Vestido", "--category", "dresses", "--price", "15000.50",
            "--worn", "Blazer", "--worn", "Scarpin", "--out", "look.png",
        ])
        .expect("parse");
        let Commands::TryOn { price, worn, demo, .. } = cli.command else {
            panic!("expected try-on");
        };
        assert_eq!(price, Decimal::new(1_500_050, 2));
        assert_eq!(worn, vec!["Blazer", "Scarpin"]);
        assert!(!demo);
    }

    #[test]
    fn test_normalize_requires_output() {
        assert!(Cli::try_parse_from(["lookbook", "normalize", "--input", "a.jpg"]).is_err());
    }
}
