//! `lookbook normalize`: the upload preparation step on its own.

use std::path::Path;

use lookbook_studio::media::prepare_photo;

use super::{CommandError, read_image, write_file};

/// Square and downscale `input`, writing the result to `out`.
pub async fn run(input: &Path, out: &Path) -> Result<(), CommandError> {
    let photo = read_image(input).await?;
    let prepared = prepare_photo(&photo)?;
    write_file(out, &prepared.decode()?).await?;

    tracing::info!(
        out = %out.display(),
        mime = prepared.mime_type(),
        unchanged = prepared == photo,
        "Photo prepared"
    );
    Ok(())
}
