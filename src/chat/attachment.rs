use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Durable attachment descriptor, the persisted JSON wire format:
/// `{ id, name, type, url, size }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
    /// Byte size.
    pub size: i64,
}

/// Parses the structured attachment column. Historical rows carry either a
/// JSON object or a doubly-encoded JSON string, so both shapes are accepted.
pub fn parse_attachment_json(raw: &str) -> Option<Attachment> {
    if let Ok(attachment) = serde_json::from_str::<Attachment>(raw) {
        return Some(attachment);
    }
    if let Ok(inner) = serde_json::from_str::<String>(raw) {
        if let Ok(attachment) = serde_json::from_str::<Attachment>(&inner) {
            return Some(attachment);
        }
    }
    None
}

/// Normalizes the dual encoding with explicit precedence: the structured
/// JSON column wins, the denormalized columns are the fallback, otherwise
/// there is no attachment. `fallback_id` fills the descriptor id when only
/// the columns survive (they do not store one).
pub fn normalize_attachment(
    raw_json: Option<&str>,
    name: Option<&str>,
    mime_type: Option<&str>,
    url: Option<&str>,
    size: Option<i64>,
    fallback_id: &str,
) -> Option<Attachment> {
    if let Some(attachment) = raw_json.and_then(parse_attachment_json) {
        return Some(attachment);
    }

    match (name, url) {
        (Some(name), Some(url)) => Some(Attachment {
            id: fallback_id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.unwrap_or("application/octet-stream").to_string(),
            url: url.to_string(),
            size: size.unwrap_or(0),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> Attachment {
        Attachment {
            id: "att-1".to_string(),
            name: "receipt.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            url: "https://cdn.example/object/public/chat_attachments/u/receipt.pdf".to_string(),
            size: 12345,
        }
    }

    #[test]
    fn test_parse_object_shape() {
        let raw = serde_json::to_string(&descriptor()).unwrap();
        assert_eq!(parse_attachment_json(&raw), Some(descriptor()));
    }

    #[test]
    fn test_parse_double_encoded_shape() {
        let inner = serde_json::to_string(&descriptor()).unwrap();
        let raw = serde_json::to_string(&inner).unwrap();
        assert_eq!(parse_attachment_json(&raw), Some(descriptor()));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_attachment_json("not json"), None);
        assert_eq!(parse_attachment_json("{\"name\":\"x\"}"), None);
    }

    #[test]
    fn test_structured_column_wins() {
        let raw = serde_json::to_string(&descriptor()).unwrap();
        let normalized = normalize_attachment(
            Some(&raw),
            Some("other.png"),
            Some("image/png"),
            Some("https://elsewhere/x"),
            Some(1),
            "msg-1",
        );
        assert_eq!(normalized, Some(descriptor()));
    }

    #[test]
    fn test_column_fallback_when_structured_unparseable() {
        let normalized = normalize_attachment(
            Some("corrupt{"),
            Some("photo.jpg"),
            Some("image/jpeg"),
            Some("https://cdn.example/photo.jpg"),
            Some(2048),
            "msg-2",
        )
        .unwrap();

        assert_eq!(normalized.id, "msg-2");
        assert_eq!(normalized.name, "photo.jpg");
        assert_eq!(normalized.mime_type, "image/jpeg");
        assert_eq!(normalized.size, 2048);
    }

    #[test]
    fn test_absent_everywhere_is_none() {
        assert_eq!(normalize_attachment(None, None, None, None, None, "m"), None);
        // A lone size column is not enough to reconstruct an attachment.
        assert_eq!(
            normalize_attachment(None, None, None, None, Some(10), "m"),
            None
        );
    }
}
