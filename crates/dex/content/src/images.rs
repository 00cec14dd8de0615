//! Candidate image locations for a creature.

use dex_core::Creature;

/// Supported image extensions, most preferred first.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "jfif"];

/// Every candidate URL in priority order: `<base>/<id:03>-<slug>.<ext>`.
pub fn image_candidates(base_url: &str, creature: &Creature) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let stem = creature.image_stem();
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!("{base}/{stem}.{ext}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{CreatureRows, column};
    use serde_json::json;

    #[test]
    fn test_candidates_follow_extension_priority() {
        let mut row = vec![json!(""); 20];
        row[column::ID] = json!(7);
        row[column::NAME] = json!("Mr. Sparkle");
        row[column::PRIMARY_TYPE] = json!("Electric");
        row[column::PRIMARY_ABILITY] = json!("Static");
        let creature = CreatureRows::decode_row(0, &json!(row)).unwrap().unwrap();

        let urls = image_candidates("https://img.example/dex/", &creature);
        assert_eq!(
            urls,
            vec![
                "https://img.example/dex/007-mr-sparkle.png",
                "https://img.example/dex/007-mr-sparkle.jpg",
                "https://img.example/dex/007-mr-sparkle.jpeg",
                "https://img.example/dex/007-mr-sparkle.jfif",
            ]
        );
    }
}
