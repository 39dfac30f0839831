//! Prompt templates for the admin features.
//!
//! Everything here is pure: a `Feature` plus a `PromptContext` always renders the same
//! `PromptTemplate`, which makes prompt changes reviewable in tests.

use ai_provider::Request;
use chrono::{Datelike, NaiveDate, Utc};

const APPLICATION: &str = "Personal Portfolio Website Manager";
const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// Maximum number of characters of page content sent for SEO analysis.
pub const SEO_CONTENT_LIMIT: usize = 3000;

/// The kinds of text the writing assistant produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritingKind {
    #[default]
    Blog,
    Excerpt,
    ProjectDescription,
    ProjectDetail,
}

impl WritingKind {
    /// Maps a kind name (`blog`, `excerpt`, `project_description`, `project_detail`)
    /// to a kind. Unknown names get a blog article.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "excerpt" => WritingKind::Excerpt,
            "project_description" => WritingKind::ProjectDescription,
            "project_detail" => WritingKind::ProjectDetail,
            _ => WritingKind::Blog,
        }
    }
}

/// An admin feature request, before it is rendered into a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Writing {
        topic: String,
        tone: String,
        kind: WritingKind,
    },
    InboxAnalysis {
        message: String,
        sender: String,
    },
    Copilot {
        query: String,
        context: String,
    },
    Seo {
        content: String,
        keyword: String,
    },
}

impl Feature {
    pub fn writing(topic: impl Into<String>) -> Self {
        Feature::Writing {
            topic: topic.into(),
            tone: "professional".to_string(),
            kind: WritingKind::Blog,
        }
    }
}

/// Facts every system prompt states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub today: NaiveDate,
    pub language: String,
}

impl PromptContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            today: Utc::now().date_naive(),
            language: language.into(),
        }
    }
}

/// A rendered prompt, ready to be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub prompt: String,
    pub system_instruction: String,
    pub expects_json: bool,
}

impl PromptTemplate {
    pub fn into_request(self) -> Request {
        let request = Request::new(self.prompt).with_system_instruction(self.system_instruction);
        if self.expects_json {
            request.expecting_json()
        } else {
            request
        }
    }
}

/// Wraps a feature's own instruction in the application-wide context and formatting rules.
pub fn system_prompt(base_instruction: &str, context: &PromptContext) -> String {
    let base_instruction = if base_instruction.trim().is_empty() {
        DEFAULT_SYSTEM_INSTRUCTION
    } else {
        base_instruction
    };

    format!(
        "System Context:\n\
         - Application: {APPLICATION}\n\
         - Current Date: {} (Year: {})\n\
         - Language: {}\n\
         \n\
         Formatting Rules:\n\
         - For headings, use HTML <h2>, <h3> tags.\n\
         - For bold text, use HTML <b> or <strong> tags. DO NOT use markdown **bold**.\n\
         - For lists, use HTML <ul><li>...</li></ul> or <ol><li>...</li></ol>.\n\
         - For code blocks, use HTML <pre><code>...</code></pre>.\n\
         - For paragraphs, use <p>...</p>.\n\
         - Ensure the output is valid HTML suitable for a rich text editor.\n\
         \n\
         {base_instruction}",
        context.today.format("%Y-%m-%d"),
        context.today.year(),
        context.language,
    )
}

pub fn build_prompt(feature: &Feature, context: &PromptContext) -> PromptTemplate {
    let (prompt, instruction, expects_json) = match feature {
        Feature::Writing { topic, tone, kind } => (
            writing_prompt(topic, tone, *kind),
            "You are a professional content writer.",
            false,
        ),
        Feature::InboxAnalysis { message, sender } => (
            inbox_prompt(message, sender),
            "You are an intelligent inbox assistant. You strictly output valid JSON.",
            true,
        ),
        Feature::Copilot { query, context } => (
            format!("Context: {context}\n\nQuestion: {query}"),
            "You are the Global AI Copilot for the Portfolio Admin Panel. You assist the \
             administrator with tasks, insights, and data management. Be concise and helpful.",
            false,
        ),
        Feature::Seo { content, keyword } => (
            seo_prompt(content, keyword),
            "You are an SEO Expert. Output strict JSON.",
            true,
        ),
    };

    PromptTemplate {
        prompt,
        system_instruction: system_prompt(instruction, context),
        expects_json,
    }
}

fn writing_prompt(topic: &str, tone: &str, kind: WritingKind) -> String {
    match kind {
        WritingKind::Excerpt => format!(
            "Write a {tone} short excerpt (summary) about: {topic}.\n\n\
             Keep it under 300 characters. No headings, just plain text. \
             Do not use HTML tags like <p>."
        ),
        WritingKind::ProjectDescription => format!(
            "Write a {tone} project description for a project named/about: {topic}.\n\n\
             Highlight key features and tech stack if mentioned. \
             Keep it concise (1-2 paragraphs). Output HTML <p> tags."
        ),
        WritingKind::ProjectDetail => format!(
            "Task: Write a detailed project case study/article in {tone} tone.\n\n\
             Project Context:\n{topic}\n\n\
             Requirements:\n\
             1. Create a compelling narrative about the project.\n\
             2. Structure with clear HTML headings (<h2>).\n\
             3. Include sections for: Overview, Key Features, Technical Challenges, and Solutions.\n\
             4. If technologies are mentioned, explain how they were used.\n\
             5. Include at least one code snippet example (mockup if necessary) using \
             <pre><code>...</code></pre> tags to demonstrate a feature.\n\
             6. Use <b>bold</b> for emphasis on key terms.\n\
             7. Use compact spacing between paragraphs."
        ),
        WritingKind::Blog => format!(
            "Task: Write a {tone} blog article about: {topic}.\n\n\
             Requirements:\n\
             1. Create an engaging title (if not provided).\n\
             2. Write a captivating introduction.\n\
             3. Use clear HTML headings (<h2>, <h3>) to structure the content.\n\
             4. Provide actionable insights or deep analysis.\n\
             5. Use <b>bold</b> for key concepts.\n\
             6. Include a conclusion.\n\
             7. Output strictly HTML content (no markdown).\n\
             8. Ensure paragraphs are concise and not too far apart."
        ),
    }
}

fn inbox_prompt(message: &str, sender: &str) -> String {
    format!(
        "Analyze the following message from {sender}:\n\"{message}\"\n\n\
         Return a valid JSON object with these keys:\n\
         - \"summary\": (string) Brief summary max 2 sentences.\n\
         - \"sentiment\": (string) \"Positive\", \"Neutral\", or \"Negative\".\n\
         - \"category\": (string) \"Inquiry\", \"Support\", \"Feedback\", \"Spam\", \
         \"Collaboration\", or \"Other\".\n\
         - \"suggested_reply\": (string) A brief, polite reply draft.\n\n\
         Ensure the output is pure JSON without Markdown formatting."
    )
}

fn seo_prompt(content: &str, keyword: &str) -> String {
    let excerpt: String = content.chars().take(SEO_CONTENT_LIMIT).collect();

    format!(
        "Analyze the following content for SEO optimization targeting the keyword: \
         \"{keyword}\" (if empty, identify the main topic).\n\n\
         Content:\n\"{excerpt}...\"\n\n\
         Provide a JSON response with:\n\
         - \"score\": (number) 0-100\n\
         - \"keywords\": (list of strings) 5-8 highly relevant, search-optimized keywords \
         (LSI keywords) related to the topic.\n\
         - \"suggestions\": (list of strings) Improvements for readability and SEO\n\
         - \"meta_title\": (string) Recommended meta title (max 60 chars)\n\
         - \"meta_description\": (string) Recommended meta description (max 160 chars, \
         plain text only, no HTML tags)\n\n\
         Constraint:\n\
         - Ensure \"meta_description\" is PURE TEXT. Do not include <p>, <div>, or any HTML tags.\n\
         - Ensure \"keywords\" are comma-separated strings if returning a list.\n\
         - Ensure output is valid JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext {
            today: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            language: "Indonesian (Bahasa Indonesia)".to_string(),
        }
    }

    #[test]
    fn system_prompt_states_date_language_and_instruction() {
        let prompt = system_prompt("You are a professional content writer.", &context());

        assert!(prompt.contains("Current Date: 2026-01-05 (Year: 2026)"));
        assert!(prompt.contains("Language: Indonesian (Bahasa Indonesia)"));
        assert!(prompt.contains("DO NOT use markdown **bold**"));
        assert!(prompt.ends_with("You are a professional content writer."));
    }

    #[test]
    fn blank_instruction_uses_default_assistant() {
        assert!(system_prompt(" ", &context()).ends_with("You are a helpful assistant."));
    }

    #[test]
    fn writing_kinds_render_distinct_prompts() {
        let excerpt = build_prompt(
            &Feature::Writing {
                topic: "Rust".to_string(),
                tone: "casual".to_string(),
                kind: WritingKind::Excerpt,
            },
            &context(),
        );
        assert!(excerpt.prompt.starts_with("Write a casual short excerpt"));
        assert!(!excerpt.expects_json);

        let blog = build_prompt(&Feature::writing("Rust"), &context());
        assert!(blog
            .prompt
            .starts_with("Task: Write a professional blog article about: Rust."));
    }

    #[test]
    fn unknown_writing_kind_is_a_blog() {
        assert_eq!(WritingKind::from_name("poem"), WritingKind::Blog);
        assert_eq!(
            WritingKind::from_name("Project_Detail"),
            WritingKind::ProjectDetail
        );
    }

    #[test]
    fn inbox_and_seo_expect_json() {
        let inbox = build_prompt(
            &Feature::InboxAnalysis {
                message: "Hi, can we collaborate?".to_string(),
                sender: "ana@example.com".to_string(),
            },
            &context(),
        );
        assert!(inbox.expects_json);
        assert!(inbox.prompt.contains("from ana@example.com"));
        assert!(inbox.system_instruction.ends_with("You strictly output valid JSON."));

        let seo = build_prompt(
            &Feature::Seo {
                content: "x".repeat(SEO_CONTENT_LIMIT + 500),
                keyword: "rust".to_string(),
            },
            &context(),
        );
        assert!(seo.expects_json);
        assert!(seo.prompt.contains(&format!("\"{}...\"", "x".repeat(SEO_CONTENT_LIMIT))));
        assert!(!seo.prompt.contains(&"x".repeat(SEO_CONTENT_LIMIT + 1)));
    }

    #[test]
    fn template_becomes_request() {
        let request = build_prompt(
            &Feature::Copilot {
                query: "How many posts?".to_string(),
                context: "dashboard".to_string(),
            },
            &context(),
        )
        .into_request();

        assert_eq!(request.prompt, "Context: dashboard\n\nQuestion: How many posts?");
        assert!(request
            .system_instruction
            .unwrap()
            .contains("Global AI Copilot"));
        assert!(!request.expects_json);
    }
}
