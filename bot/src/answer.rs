//! Answer generation against the OpenAI Responses API.
//!
//! The retrieved files are rendered into a bounded context block and
//! sent together with the question under a fixed assistant prompt.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use ragbot_retrieval::RetrievedFile;

use crate::error::{BotError, Result};

/// Model used for answer generation.
pub const ANSWER_MODEL: &str = "gpt-5";

/// Default deadline for a single answer request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Character budget per rendered file.
const MAX_FILE_CHARS: usize = 4_000;

/// Character budget for the whole context block.
const MAX_CONTEXT_CHARS: usize = 20_000;

/// System prompt for the knowledge-base assistant.
const SYSTEM_PROMPT: &str = "\
You are the company knowledge-base assistant.

When files from the knowledge base are provided with a question, treat \
them as the primary source: base the answer on their content and say \
that it comes from the knowledge base. When no files are provided, \
answer from general knowledge, say so, and avoid inventing specifics.

Answering rules:
- structure answers with short headings and lists where it helps;
- give ranges rather than precise figures when unsure;
- never invent products, prices, or policies that were not mentioned;
- for complex questions, give a brief analysis before the conclusion.";

/// Client for the answer-generation service.
pub struct AnswerClient {
    /// API key.
    api_key: String,

    /// API base URL.
    base_url: String,

    /// Model identifier sent with each request.
    model: String,

    /// Per-request deadline.
    request_timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl AnswerClient {
    /// Create a new client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: ANSWER_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate an answer to `question` using `files` as context.
    pub async fn generate(&self, question: &str, files: &[RetrievedFile]) -> Result<String> {
        let context = build_context(files);
        let user_text = if context.is_empty() {
            question.to_string()
        } else {
            format!(
                "User question:\n{question}\n\n\
                 Contents of the knowledge-base files retrieved for it:\n\n{context}"
            )
        };

        let body = serde_json::json!({
            "model": self.model,
            "input": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_text},
            ],
        });

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BotError::AnswerApi(message));
        }

        let reply: ResponsesReply = response.json().await?;
        let answer = reply
            .output_text()
            .ok_or_else(|| BotError::AnswerApi("response contained no text".to_string()))?;

        debug!("generated answer of {} chars", answer.chars().count());
        Ok(answer)
    }
}

/// Render the retrieved files into a bounded context block.
///
/// Mirrors what the model is good at consuming: one labelled section
/// per file, binary files kept as a marker line so the model knows the
/// file existed, and hard character budgets so the prompt cannot grow
/// with the folder.
fn build_context(files: &[RetrievedFile]) -> String {
    let mut sections: Vec<String> = Vec::new();
    let mut consumed = 0;

    for file in files {
        let text = ragbot_extract::extract_text(&file.bytes, &file.media_type);
        let trimmed = text.trim();

        let snippet = if trimmed.is_empty() {
            format!(
                "[file {} ({}) is binary, no text available]\n",
                file.name, file.media_type
            )
        } else {
            let body = match trimmed.char_indices().nth(MAX_FILE_CHARS) {
                Some((idx, _)) => format!("{}\n...[truncated]", &trimmed[..idx]),
                None => trimmed.to_string(),
            };
            format!("===== file: {} ({}) =====\n{body}\n\n", file.name, file.media_type)
        };

        let length = snippet.chars().count();
        if consumed + length > MAX_CONTEXT_CHARS {
            sections.push("\n[remaining files omitted, context budget reached]\n".to_string());
            break;
        }

        consumed += length;
        sections.push(snippet);
    }

    sections.concat()
}

/// Responses API reply format.
#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesReply {
    /// Concatenate the text parts of the reply.
    fn output_text(&self) -> Option<String> {
        let text: String = self
            .output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect();

        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_file(name: &str, content: &str) -> RetrievedFile {
        RetrievedFile {
            id: name.to_string(),
            name: name.to_string(),
            media_type: "text/plain".to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn renders_one_section_per_file() {
        let context = build_context(&[
            text_file("a.txt", "alpha"),
            text_file("b.txt", "bravo"),
        ]);

        assert!(context.contains("===== file: a.txt (text/plain) =====\nalpha"));
        assert!(context.contains("===== file: b.txt (text/plain) =====\nbravo"));
    }

    #[test]
    fn binary_files_become_a_marker_line() {
        let file = RetrievedFile {
            id: "bin".to_string(),
            name: "empty.bin".to_string(),
            media_type: "application/octet-stream".to_string(),
            bytes: vec![0, 1, 2],
        };

        let context = build_context(&[file]);
        assert_eq!(
            context,
            "[file empty.bin (application/octet-stream) is binary, no text available]\n"
        );
    }

    #[test]
    fn long_files_are_truncated() {
        let long = "x".repeat(MAX_FILE_CHARS + 100);
        let context = build_context(&[text_file("long.txt", &long)]);

        assert!(context.contains("...[truncated]"));
        assert!(context.chars().count() < long.chars().count());
    }

    #[test]
    fn total_budget_drops_overflowing_files() {
        let big = "y".repeat(MAX_FILE_CHARS);
        let files: Vec<RetrievedFile> = (0..8)
            .map(|i| text_file(&format!("f{i}.txt"), &big))
            .collect();

        let context = build_context(&files);
        assert!(context.chars().count() <= MAX_CONTEXT_CHARS + 100);
        assert!(context.contains("[remaining files omitted, context budget reached]"));
    }

    #[test]
    fn no_files_means_no_context() {
        assert_eq!(build_context(&[]), "");
    }

    #[tokio::test]
    async fn generates_an_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": [{
                    "type": "message",
                    "content": [{"type": "output_text", "text": "30 days."}]
                }]
            })))
            .mount(&server)
            .await;

        let client = AnswerClient::new("test-key").with_base_url(server.uri());
        let answer = client
            .generate("what is the refund window?", &[text_file("a.txt", "alpha")])
            .await
            .unwrap();

        assert_eq!(answer, "30 days.");
    }

    #[tokio::test]
    async fn api_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = AnswerClient::new("test-key").with_base_url(server.uri());
        let result = client.generate("question", &[]).await;
        assert!(matches!(result, Err(BotError::AnswerApi(_))));
    }
}
