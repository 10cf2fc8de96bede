//! Applies the normalizer across the two stored document shapes: the
//! content-segment list and the flat image-reference array.

use serde_json::Value;

use crate::content::ContentType;
use crate::field::FieldValue;
use crate::normalize::UrlNormalizer;

/// Tag of the segments that carry an image reference; all other tags are
/// opaque and pass through unchanged.
const IMAGE_TAG: &str = "image";

/// Rewrites image references inside a content-segment list.
///
/// Returns `Some` with the rewritten field, re-encoded to the input's
/// original representation, only when at least one segment changed. `None`
/// means the caller keeps the original value untouched, including when the
/// field does not decode to a list at all; decode failure is not an error.
pub fn rewrite_content_blocks(
    normalizer: &UrlNormalizer,
    field: &FieldValue,
    content_type: ContentType,
) -> Option<FieldValue> {
    let mut doc = field.decode()?;
    let blocks = doc.as_array_mut()?;

    let mut changed = false;
    for block in blocks.iter_mut() {
        if block.get("type").and_then(Value::as_str) != Some(IMAGE_TAG) {
            continue;
        }
        let Some(uri) = block.get("uri").and_then(Value::as_str) else {
            continue;
        };
        if uri.is_empty() {
            continue;
        }
        let rewritten = normalizer.rewrite_reference(uri, content_type);
        if rewritten != uri {
            block["uri"] = Value::String(rewritten);
            changed = true;
        }
    }

    changed.then(|| field.encode(doc))
}

/// Rewrites every entry of a flat image-reference array.
///
/// Null, empty and non-string entries are preserved positionally. The full
/// rewritten list is built while iterating, but `None` is returned when no
/// entry actually changed so the caller can cheaply skip persisting.
pub fn rewrite_image_array(
    normalizer: &UrlNormalizer,
    field: &FieldValue,
    content_type: ContentType,
) -> Option<FieldValue> {
    let doc = field.decode()?;
    let entries = doc.as_array()?;

    let mut changed = false;
    let mut rewritten = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(reference) if !reference.is_empty() => {
                let new_reference = normalizer.rewrite_reference(reference, content_type);
                if new_reference != reference {
                    changed = true;
                }
                rewritten.push(Value::String(new_reference));
            }
            _ => rewritten.push(entry.clone()),
        }
    }

    changed.then(|| field.encode(Value::Array(rewritten)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LEGACY: &str = "https://host/storage/v1/object/public/images/nyu/images//image_42.jpg";
    const CANONICAL: &str = "https://host/storage/v1/object/public/images/nyu/notice_42.jpg";

    fn normalizer() -> UrlNormalizer {
        UrlNormalizer::new("https://host")
    }

    #[test]
    fn untouched_segment_list_reports_no_change() {
        let field = FieldValue::Json(json!([
            {"type": "text", "content": "hello"},
            {"type": "image", "uri": CANONICAL},
        ]));
        assert_eq!(
            rewrite_content_blocks(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn changed_segment_is_rewritten_in_place() {
        let field = FieldValue::Json(json!([
            {"type": "text", "content": "hello"},
            {"type": "image", "uri": LEGACY, "caption": "a photo"},
            {"type": "image", "uri": CANONICAL},
        ]));
        let got = rewrite_content_blocks(&normalizer(), &field, ContentType::Notices);
        assert_eq!(
            got,
            Some(FieldValue::Json(json!([
                {"type": "text", "content": "hello"},
                {"type": "image", "uri": CANONICAL, "caption": "a photo"},
                {"type": "image", "uri": CANONICAL},
            ])))
        );
    }

    #[test]
    fn text_input_is_reencoded_as_text() {
        let field = FieldValue::Text(
            serde_json::to_string(&json!([{"type": "image", "uri": LEGACY}])).expect("encode"),
        );
        let got = rewrite_content_blocks(&normalizer(), &field, ContentType::Notices);
        match got {
            Some(FieldValue::Text(text)) => {
                let decoded: Value = serde_json::from_str(&text).expect("valid json");
                assert_eq!(decoded, json!([{"type": "image", "uri": CANONICAL}]));
            }
            other => panic!("expected rewritten text field, got {other:?}"),
        }
    }

    #[test]
    fn untouched_text_segment_list_reports_no_change() {
        // None tells the caller to keep the original text byte-for-byte.
        let field = FieldValue::Text(format!(r#"[{{"type":"image","uri":"{CANONICAL}"}}]"#));
        assert_eq!(
            rewrite_content_blocks(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn invalid_text_document_reports_no_change() {
        let field = FieldValue::Text("not json at all".to_string());
        assert_eq!(
            rewrite_content_blocks(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn non_list_document_reports_no_change() {
        let field = FieldValue::Json(json!({"type": "image", "uri": LEGACY}));
        assert_eq!(
            rewrite_content_blocks(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn segments_without_uri_are_skipped() {
        let field = FieldValue::Json(json!([
            {"type": "image"},
            {"type": "image", "uri": ""},
            {"type": "image", "uri": null},
        ]));
        assert_eq!(
            rewrite_content_blocks(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn array_entries_are_rewritten_with_nulls_preserved() {
        let field = FieldValue::Json(json!([
            null,
            "https://host/storage/v1/object/public/images/nyu/image_1.jpg",
            null,
        ]));
        let got = rewrite_image_array(&normalizer(), &field, ContentType::BoardPosts);
        assert_eq!(
            got,
            Some(FieldValue::Json(json!([
                null,
                "https://host/storage/v1/object/public/images/nyu/board_1.jpg",
                null,
            ])))
        );
    }

    #[test]
    fn unchanged_array_reports_no_change() {
        let field = FieldValue::Json(json!([null, CANONICAL, ""]));
        assert_eq!(
            rewrite_image_array(&normalizer(), &field, ContentType::Notices),
            None
        );
    }

    #[test]
    fn text_array_is_reencoded_as_text() {
        let field = FieldValue::Text(serde_json::to_string(&json!([LEGACY])).expect("encode"));
        let got = rewrite_image_array(&normalizer(), &field, ContentType::Notices);
        match got {
            Some(FieldValue::Text(text)) => {
                let decoded: Value = serde_json::from_str(&text).expect("valid json");
                assert_eq!(decoded, json!([CANONICAL]));
            }
            other => panic!("expected rewritten text field, got {other:?}"),
        }
    }

    #[test]
    fn non_array_images_field_reports_no_change() {
        let field = FieldValue::Json(json!("https://host/x.jpg"));
        assert_eq!(
            rewrite_image_array(&normalizer(), &field, ContentType::Notices),
            None
        );
    }
}
