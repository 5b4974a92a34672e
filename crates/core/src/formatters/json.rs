use crate::Result;
use crate::content::ExtractedContent;

/// Pretty-printed JSON for the whole record.
pub fn render_json(content: &ExtractedContent) -> Result<String> {
    Ok(serde_json::to_string_pretty(content)?)
}

/// Single-line JSON for the whole record.
pub fn render_json_compact(content: &ExtractedContent) -> Result<String> {
    Ok(serde_json::to_string(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ImageAsset, MetadataValue};

    fn sample() -> ExtractedContent {
        let mut content = ExtractedContent::new("Test Title");
        content.author = Some("Test Author".to_string());
        content.tags = vec!["rust".to_string()];
        content.markdown = "# Test Title\n\nBody.".to_string();
        content.images.push(ImageAsset::new("https://example.com/a.png", "A"));
        content.set_metadata("wordCount", 3_usize);
        content
    }

    #[test]
    fn test_render_json_camel_case() {
        let json = render_json(&sample()).unwrap();

        assert!(json.contains("\"title\": \"Test Title\""));
        assert!(json.contains("\"originalUrl\": \"https://example.com/a.png\""));
        assert!(json.contains("\"isDiagram\": false"));
        assert!(json.contains("\"wordCount\": 3"));
        assert!(!json.contains("sourceUrl"));
        assert!(!json.contains("localPath"));
    }

    #[test]
    fn test_render_json_compact() {
        let json = render_json_compact(&sample()).unwrap();

        assert!(!json.contains('\n'));
        assert!(json.contains(r#""author":"Test Author""#));
    }

    #[test]
    fn test_json_reads_back() {
        let original = sample();
        let parsed: ExtractedContent = serde_json::from_str(&render_json(&original).unwrap()).unwrap();

        assert_eq!(parsed.title, original.title);
        assert_eq!(parsed.metadata["wordCount"], MetadataValue::Integer(3));
        assert_eq!(parsed.images, original.images);
    }
}
