//! Image resolution seam.
//!
//! Extraction only records image references. Turning them into local files
//! is left to an [`ImageResolver`] supplied by the caller; this module runs
//! the resolver over a batch and rewrites the Markdown afterwards.

use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::content::ImageAsset;

const VALID_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
const DEFAULT_EXTENSION: &str = "png";

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid file name pattern"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid dash pattern"));
static DATA_URL_MIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:([^;,]+)[;,]").expect("valid data URL pattern"));

/// Turns a remote image reference into a local one.
pub trait ImageResolver {
    /// Return the asset with `local_path` (and possibly `mime_type`) filled in.
    fn resolve(&mut self, image: &ImageAsset) -> Result<ImageAsset>;
}

/// Resolve each image in order.
///
/// A failing image is logged and kept unchanged; the batch always returns
/// one asset per input.
pub fn resolve_images<R: ImageResolver + ?Sized>(images: &[ImageAsset], resolver: &mut R) -> Vec<ImageAsset> {
    images
        .iter()
        .map(|image| match resolver.resolve(image) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(url = %image.original_url, %err, "keeping original image reference");
                image.clone()
            }
        })
        .collect()
}

/// Replace each resolved image's original URL with its local path.
pub fn apply_local_paths(markdown: &str, images: &[ImageAsset]) -> String {
    images.iter().fold(markdown.to_string(), |markdown, image| match &image.local_path {
        Some(local) => markdown.replace(&image.original_url, local),
        None => markdown,
    })
}

/// File name for a stored image.
///
/// `base` is reduced to `[a-z0-9_-]`, diagrams get a `-diagram` suffix, and
/// the extension comes from a data URL's MIME type or the URL suffix,
/// falling back to `png` for anything unrecognised.
pub fn asset_file_name(image: &ImageAsset, base: &str) -> String {
    let clean = UNSAFE_NAME_CHARS.replace_all(base, "-");
    let clean = DASH_RUNS.replace_all(&clean, "-").to_lowercase();

    let extension = image_extension(&image.original_url)
        .filter(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let suffix = if image.is_diagram { "-diagram" } else { "" };

    format!("{clean}{suffix}.{extension}")
}

fn image_extension(url: &str) -> Option<String> {
    if let Some(captures) = DATA_URL_MIME.captures(url) {
        return mime_extension(&captures[1]).map(str::to_string);
    }

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (_, ext) = path.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    (ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

fn mime_extension(mime: &str) -> Option<&'static str> {
    match mime.trim().to_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlchemizeError;
    use rstest::rstest;

    struct Folder {
        calls: usize,
    }

    impl ImageResolver for Folder {
        fn resolve(&mut self, image: &ImageAsset) -> Result<ImageAsset> {
            self.calls += 1;
            if image.original_url.contains("broken") {
                return Err(AlchemizeError::ImageResolution {
                    url: image.original_url.clone(),
                    reason: "HTTP 404".to_string(),
                });
            }
            let mut resolved = image.clone();
            resolved.local_path = Some(format!("assets/{}", asset_file_name(image, &format!("note-{}", self.calls))));
            Ok(resolved)
        }
    }

    #[test]
    fn test_resolve_images_keeps_failures() {
        let images = vec![
            ImageAsset::new("https://x.com/a.png", "A"),
            ImageAsset::new("https://x.com/broken.png", "B"),
            ImageAsset::new("https://x.com/c.jpg", "C"),
        ];
        let mut resolver = Folder { calls: 0 };
        let resolved = resolve_images(&images, &mut resolver);

        assert_eq!(resolver.calls, 3);
        assert_eq!(resolved[0].local_path.as_deref(), Some("assets/note-1.png"));
        assert_eq!(resolved[1], images[1]);
        assert_eq!(resolved[2].local_path.as_deref(), Some("assets/note-3.jpg"));
    }

    #[test]
    fn test_apply_local_paths() {
        let mut local = ImageAsset::new("https://x.com/a.png", "A");
        local.local_path = Some("assets/a.png".to_string());
        let remote = ImageAsset::new("https://x.com/b.png", "B");
        let markdown = "![A](https://x.com/a.png)\n\n![B](https://x.com/b.png)";

        assert_eq!(
            apply_local_paths(markdown, &[local, remote]),
            "![A](assets/a.png)\n\n![B](https://x.com/b.png)"
        );
    }

    #[rstest]
    #[case("https://x.com/photo.JPG", false, "My Note-1", "my-note-1.jpg")]
    #[case("https://x.com/arch.svg?v=3", true, "note", "note-diagram.svg")]
    #[case("https://x.com/render.php", false, "note", "note.png")]
    #[case("https://x.com/no-extension", false, "note", "note.png")]
    #[case("data:image/webp;base64,AAAA", false, "note", "note.webp")]
    #[case("data:application/pdf;base64,AAAA", false, "note", "note.png")]
    #[case("https://x.com/a.png", false, "ñandú & co", "-and-co.png")]
    fn test_asset_file_name(#[case] url: &str, #[case] diagram: bool, #[case] base: &str, #[case] expected: &str) {
        let mut image = ImageAsset::new(url, "alt");
        image.is_diagram = diagram;

        assert_eq!(asset_file_name(&image, base), expected);
    }
}
