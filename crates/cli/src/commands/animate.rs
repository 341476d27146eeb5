//! `lookbook animate`: image-to-video with the model fallback chain.

use std::path::Path;

use lookbook_studio::config::GeminiConfig;
use lookbook_studio::gemini::{GeminiClient, VideoGenerator};
use lookbook_studio::tryon::build_animation_prompt;

use super::{CommandError, read_image, write_file};

/// Animate `image` and write the video to `out`.
pub async fn run(image: &Path, prompt: Option<&str>, out: &Path) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let config = GeminiConfig::require_from_env()?;
    let generator = VideoGenerator::new(GeminiClient::new(&config)?);

    let still = read_image(image).await?;
    let prompt = prompt.map_or_else(|| build_animation_prompt(&[]), String::from);

    tracing::info!(
        models = generator.models().len(),
        "Generating video, this can take a few minutes"
    );
    let video = generator
        .animate(still.data(), still.mime_type(), &prompt)
        .await?;
    write_file(out, &video.bytes).await?;

    tracing::info!(
        out = %out.display(),
        model = %video.model,
        bytes = video.bytes.len(),
        "Video written"
    );
    Ok(())
}
