//! Request types for chat completions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// MESSAGES
// =============================================================================

/// Chat message role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message made of text and file parts.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    /// Concatenated text of the message, ignoring file parts.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::File { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// File parts attached to the message.
    pub fn attachments(&self) -> Vec<&FileAttachment> {
        match &self.content {
            MessageContent::Text(_) => Vec::new(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::File { file } => Some(file),
                    ContentPart::Text { .. } => None,
                })
                .collect(),
        }
    }
}

/// Plain text, or a mixed sequence of text and file parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    File { file: FileAttachment },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn file(attachment: FileAttachment) -> Self {
        Self::File { file: attachment }
    }
}

/// A document sent inline as a base64 `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    pub file_data: String,
}

impl FileAttachment {
    /// A PDF attachment. Bare base64 is wrapped into a `data:application/pdf` URL.
    pub fn pdf(filename: impl Into<String>, base64_or_data_url: &str) -> Self {
        let trimmed = base64_or_data_url.trim();
        let file_data = if trimmed.starts_with("data:") {
            trimmed.to_string()
        } else {
            format!("data:application/pdf;base64,{trimmed}")
        };
        Self {
            filename: filename.into(),
            file_data,
        }
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Structured-output contract: the provider must return JSON matching `schema`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchemaSpec {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

impl JsonSchemaSpec {
    pub fn strict(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            strict: true,
            schema,
        }
    }
}

/// Provider-side plugin directive.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Plugin {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfPluginConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PdfPluginConfig {
    pub engine: String,
}

impl Plugin {
    /// Text extraction from attached PDFs before the model reads them.
    pub fn file_parser() -> Self {
        Self {
            id: "file-parser".to_string(),
            pdf: Some(PdfPluginConfig {
                engine: "pdf-text".to_string(),
            }),
        }
    }
}

/// Sampling and output controls for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub response_schema: Option<JsonSchemaSpec>,
    pub plugins: Vec<Plugin>,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            response_schema: None,
            plugins: Vec::new(),
        }
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A complete chat-completions call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: InvokeOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: InvokeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InvokeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    /// Concatenated text of every message, for assertions and logging.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(ChatMessage::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
