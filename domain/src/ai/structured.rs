//! Parsing of JSON documents out of model replies.

use crate::error::{AiErrorKind, Error};
use log::*;
use serde::de::DeserializeOwned;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Returns the content of the first Markdown code fence in `text`, or `text` itself when
/// there is none. A ```` ```json ```` fence wins over a bare one; an unterminated fence
/// yields everything after it. The result is trimmed.
pub fn strip_fence(text: &str) -> &str {
    let opened = text
        .find(JSON_FENCE)
        .map(|start| &text[start + JSON_FENCE.len()..])
        .or_else(|| text.find(FENCE).map(|start| &text[start + FENCE.len()..]));

    match opened {
        Some(rest) => match rest.find(FENCE) {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        },
        None => text.trim(),
    }
}

/// Parses a model reply as a `T`, tolerating a surrounding code fence.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(strip_fence(text)).map_err(|e| {
        warn!("AI reply is not valid JSON for the expected document: {e}");
        Error {
            source: Some(Box::new(e)),
            ..Error::ai(AiErrorKind::ContentShape)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use serde_json::Value;

    #[test]
    fn unwraps_json_fence() {
        let reply = "Here you go:\n```json\n{\"score\": 80}\n```\nAnything else?";
        assert_eq!(strip_fence(reply), "{\"score\": 80}");
    }

    #[test]
    fn unwraps_bare_fence() {
        assert_eq!(strip_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn unterminated_fence_keeps_the_rest() {
        assert_eq!(strip_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn text_without_fence_is_trimmed() {
        assert_eq!(strip_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn parses_fenced_document() {
        let value: Value = parse_structured("```json\n{\"sentiment\": \"Positive\"}\n```").unwrap();
        assert_eq!(value["sentiment"], "Positive");
    }

    #[test]
    fn invalid_json_is_a_content_shape_error() {
        let err = parse_structured::<Value>("```json\n{not json}\n```").unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Ai(AiErrorKind::ContentShape))
        );
        assert!(err.source.is_some());
    }
}
