//! Instruction text for the composition model.

use std::fmt::Write as _;

use lookbook_core::Item;

/// Category slugs composed as makeup/hair/nails rather than garments.
const BEAUTY_CATEGORIES: &[&str] = &[
    "beauty",
    "makeup",
    "maquiagem",
    "lipstick",
    "batom",
    "eyeshadow",
    "hair",
    "cabelo",
    "nails",
    "unhas",
    "skincare",
];

/// Whether an item is applied to the face/hair/nails instead of worn.
#[must_use]
pub fn is_beauty(item: &Item) -> bool {
    let category = item.category.trim().to_lowercase();
    BEAUTY_CATEGORIES.contains(&category.as_str())
}

/// Build the composition instruction for putting `item` on the person.
///
/// `worn` lists items already present in the person image, oldest first.
#[must_use]
pub fn build_try_on_prompt(item: &Item, worn: &[Item]) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(
        "You are a virtual fitting room. Image 1 is a photo of a person. \
         Image 2 is a product photo",
    );
    let _ = write!(
        prompt,
        " of \"{}\" (category: {}).",
        item.name.trim(),
        item.category.trim()
    );

    if is_beauty(item) {
        prompt.push_str(
            " Apply the product from image 2 to the person in image 1 and return one edited photo.\n",
        );
    } else {
        prompt.push_str(
            " Dress the person in image 1 with the item from image 2 and return one edited photo.\n",
        );
    }

    if !worn.is_empty() {
        prompt.push_str("The person is already wearing: ");
        let names: Vec<&str> = worn.iter().map(|w| w.name.trim()).collect();
        prompt.push_str(&names.join(", "));
        prompt.push_str(". Keep every one of those items exactly as they appear.\n");
    }

    prompt.push_str("Rules:\n");
    prompt.push_str("- Preserve the person's identity, face, body shape, pose and skin tone.\n");
    prompt.push_str(
        "- Match the lighting of image 1: direction, colour temperature, shadows and highlights.\n",
    );
    if is_beauty(item) {
        prompt.push_str(
            "- Reproduce the product's exact shade and finish; blend it naturally with the skin or hair texture.\n",
        );
    } else {
        prompt.push_str(
            "- Layer garments realistically: outerwear over tops, tops tucked or over bottoms as the design implies, accessories on top.\n",
        );
        prompt.push_str(
            "- Reproduce the item's colour, pattern, fabric and logos faithfully, with natural folds and fit for the pose.\n",
        );
    }
    prompt.push_str("- Keep the background and framing of image 1 unchanged.\n");
    prompt.push_str("- Output a photorealistic image only, with no text, borders or collage.");

    prompt
}

/// Build the instruction for animating a finished look.
#[must_use]
pub fn build_animation_prompt(items: &[Item]) -> String {
    let mut prompt = String::from(
        "Animate this photo into a short fashion clip: the person turns slightly and poses \
         naturally, camera steady, lighting and background unchanged",
    );
    if !items.is_empty() {
        let names: Vec<&str> = items.iter().map(|i| i.name.trim()).collect();
        let _ = write!(prompt, ", showing off {}", names.join(", "));
    }
    prompt.push('.');
    prompt
}
