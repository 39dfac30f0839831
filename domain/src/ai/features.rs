//! Admin features built on the router: writing help, inbox triage, copilot chat and SEO review.
//!
//! Routing failures propagate. A reply that is not the expected JSON document never
//! does: the caller gets the feature's fallback document instead.

use super::prompts::{Feature, WritingKind};
use super::router::Router;
use super::structured::parse_structured;
use crate::error::{AiErrorKind, DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Triage of one contact-form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxAnalysis {
    pub summary: String,
    pub sentiment: String,
    pub category: String,
    pub suggested_reply: String,
}

impl InboxAnalysis {
    pub fn fallback() -> Self {
        Self {
            summary: "Error analyzing message.".to_string(),
            sentiment: "Neutral".to_string(),
            category: "Other".to_string(),
            suggested_reply: "Thank you for your message.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    #[serde(default)]
    pub score: f64,
    #[serde(default, deserialize_with = "keyword_list")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeoReport {
    pub fn fallback(reason: String) -> Self {
        Self {
            score: 0.0,
            error: Some("Could not analyze SEO".to_string()),
            suggestions: vec![reason],
            ..Default::default()
        }
    }

    // Fills the `title`/`description` aliases from the meta fields, without markup.
    fn with_aliases(mut self) -> Self {
        if self.title.is_none() {
            self.title = self.meta_title.clone();
        }
        if self.description.is_none() {
            self.description = self.meta_description.as_deref().map(strip_html_tags);
        }
        self
    }
}

// Models return keywords either as a list or as one comma-separated string.
fn keyword_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keywords {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Keywords::deserialize(deserializer)? {
        Keywords::List(list) => list,
        Keywords::Csv(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Removes every `<...>` tag from `text`.
pub fn strip_html_tags(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        match rest[open + 1..].find('>') {
            // An empty `<>` is not a tag
            Some(0) => {
                stripped.push_str(&rest[..open + 2]);
                rest = &rest[open + 2..];
            }
            Some(len) => {
                stripped.push_str(&rest[..open]);
                rest = &rest[open + len + 2..];
            }
            None => break,
        }
    }
    stripped.push_str(rest);
    stripped
}

pub async fn writing_assistant(
    router: &Router,
    topic: &str,
    tone: &str,
    kind: WritingKind,
) -> Result<String, Error> {
    let feature = Feature::Writing {
        topic: topic.to_string(),
        tone: tone.to_string(),
        kind,
    };
    Ok(router.run(&feature).await?.text)
}

pub async fn copilot(router: &Router, query: &str, context: &str) -> Result<String, Error> {
    let feature = Feature::Copilot {
        query: query.to_string(),
        context: context.to_string(),
    };
    Ok(router.run(&feature).await?.text)
}

pub async fn analyze_inbox_message(
    router: &Router,
    message: &str,
    sender: &str,
) -> Result<InboxAnalysis, Error> {
    let feature = Feature::InboxAnalysis {
        message: message.to_string(),
        sender: sender.to_string(),
    };
    let generation = router.run(&feature).await?;

    match parse_structured::<InboxAnalysis>(&generation.text) {
        Ok(analysis) => Ok(analysis),
        Err(e) if is_content_shape(&e) => {
            warn!("Inbox analysis reply was unusable, returning fallback analysis");
            Ok(InboxAnalysis::fallback())
        }
        Err(e) => Err(e),
    }
}

pub async fn optimize_seo(router: &Router, content: &str, keyword: &str) -> Result<SeoReport, Error> {
    let feature = Feature::Seo {
        content: content.to_string(),
        keyword: keyword.to_string(),
    };
    let generation = router.run(&feature).await?;

    match parse_structured::<SeoReport>(&generation.text) {
        Ok(report) => Ok(report.with_aliases()),
        Err(e) if is_content_shape(&e) => {
            warn!("SEO reply was unusable, returning fallback report");
            let reason = e
                .source
                .as_ref()
                .map(|source| source.to_string())
                .unwrap_or_else(|| e.user_message());
            Ok(SeoReport::fallback(reason))
        }
        Err(e) => Err(e),
    }
}

fn is_content_shape(err: &Error) -> bool {
    err.error_kind == DomainErrorKind::External(ExternalErrorKind::Ai(AiErrorKind::ContentShape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::executor::Executor;
    use crate::ai::settings::FixedProvider;
    use crate::ai::store::memory::{credential, MemoryStore};
    use crate::ai_provider::AiProvider;
    use crate::encryption::SecretCodec;
    use crate::gateway::Adapters;
    use ai_provider::MockProvider;
    use std::sync::Arc;

    fn router_replying(reply: &'static str) -> Router {
        let store = Arc::new(MemoryStore::with(vec![credential(
            AiProvider::Gemini,
            "key",
            0,
        )]));
        let mut mock = MockProvider::new();
        mock.expect_generate()
            .returning(move |_, _| Ok(reply.to_string()));

        let executor = Executor::new(
            store,
            SecretCodec::new("secret"),
            Adapters::new().with(AiProvider::Gemini, Arc::new(mock)),
        );
        Router::new(executor, Arc::new(FixedProvider(AiProvider::Gemini)), "English")
    }

    fn router_without_keys() -> Router {
        let executor = Executor::new(
            Arc::new(MemoryStore::default()),
            SecretCodec::new("secret"),
            Adapters::new().with(AiProvider::Gemini, Arc::new(MockProvider::new())),
        );
        Router::new(executor, Arc::new(FixedProvider(AiProvider::Gemini)), "English")
    }

    #[tokio::test]
    async fn inbox_analysis_parses_fenced_json() {
        let router = router_replying(
            "```json\n{\"summary\": \"Wants a quote.\", \"sentiment\": \"Positive\", \
             \"category\": \"Inquiry\", \"suggested_reply\": \"Thanks!\"}\n```",
        );

        let analysis = analyze_inbox_message(&router, "How much?", "a@b.c").await.unwrap();
        assert_eq!(analysis.category, "Inquiry");
        assert_eq!(analysis.suggested_reply, "Thanks!");
    }

    #[tokio::test]
    async fn inbox_analysis_falls_back_on_invalid_json() {
        let router = router_replying("```json\n{\"summary\": \n```");

        let analysis = analyze_inbox_message(&router, "How much?", "").await.unwrap();
        assert_eq!(analysis, InboxAnalysis::fallback());
    }

    #[tokio::test]
    async fn inbox_analysis_propagates_routing_failures() {
        let result = analyze_inbox_message(&router_without_keys(), "Hello", "").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::External(ExternalErrorKind::Ai(
                AiErrorKind::NoCredentialsAvailable {
                    provider: AiProvider::Gemini
                }
            ))
        );
    }

    #[tokio::test]
    async fn seo_report_maps_meta_fields_and_keyword_string() {
        let router = router_replying(
            "{\"score\": 72, \"keywords\": \"rust, async , tokio\", \"suggestions\": [\"Add alt text\"], \
             \"meta_title\": \"Async Rust\", \"meta_description\": \"<p>Learn <b>async</b> Rust</p>\"}",
        );

        let report = optimize_seo(&router, "<p>content</p>", "rust").await.unwrap();

        assert_eq!(report.score, 72.0);
        assert_eq!(report.keywords, vec!["rust", "async", "tokio"]);
        assert_eq!(report.title.as_deref(), Some("Async Rust"));
        assert_eq!(report.description.as_deref(), Some("Learn async Rust"));
        assert_eq!(report.error, None);
    }

    #[tokio::test]
    async fn seo_report_keeps_model_supplied_aliases() {
        let router = router_replying(
            "{\"score\": 50, \"keywords\": [\"a\"], \"meta_title\": \"Meta\", \"title\": \"Own\"}",
        );

        let report = optimize_seo(&router, "content", "").await.unwrap();
        assert_eq!(report.title.as_deref(), Some("Own"));
        assert_eq!(report.description, None);
    }

    #[tokio::test]
    async fn seo_report_falls_back_on_prose_reply() {
        let router = router_replying("Your content looks great!");

        let report = optimize_seo(&router, "content", "").await.unwrap();
        assert_eq!(report.score, 0.0);
        assert_eq!(report.error.as_deref(), Some("Could not analyze SEO"));
        assert_eq!(report.suggestions.len(), 1);
    }

    #[tokio::test]
    async fn writing_assistant_returns_text_unchanged() {
        let router = router_replying("<h2>Judul</h2><p>Isi</p>");

        let text = writing_assistant(&router, "Rust", "professional", WritingKind::Blog)
            .await
            .unwrap();
        assert_eq!(text, "<h2>Judul</h2><p>Isi</p>");
    }

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(strip_html_tags("<p>a <b>b</b></p>"), "a b");
        assert_eq!(strip_html_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_html_tags("a <> b"), "a <> b");
    }
}
