//! Core types for messages, pages and order links

use crate::decode::BODY_ENGINE;
use crate::error::{ExtractError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message ID wrapper type, scoped to the mail service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A link to an order detail page, exactly as it appeared in the markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OrderLink(pub String);

impl OrderLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque pagination token.
///
/// The empty cursor means "first page" when sent and "no more pages" when
/// received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchCursor(pub String);

impl SearchCursor {
    /// The cursor that requests the first page
    #[must_use]
    pub const fn first() -> Self {
        Self(String::new())
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub message_ids: Vec<MessageId>,
    pub next_cursor: SearchCursor,
}

impl Page {
    pub fn new<I, S>(ids: I, next_cursor: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message_ids: ids.into_iter().map(MessageId::new).collect(),
            next_cursor: SearchCursor::new(next_cursor),
        }
    }

    /// Build a page from a message list resource
    /// (`{"messages":[{"id":..}], "nextPageToken":..}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let list: WireMessageList =
            serde_json::from_str(json).map_err(|e| ExtractError::Transport(e.to_string()))?;

        Ok(Self {
            message_ids: list
                .messages
                .into_iter()
                .map(|stub| MessageId(stub.id))
                .collect(),
            next_cursor: SearchCursor(list.next_page_token.unwrap_or_default()),
        })
    }
}

/// A node of a message's MIME structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MimePart {
    /// Content type as reported by the mail service, e.g. `multipart/mixed`
    pub content_type: String,

    /// Web-safe base64 payload, present only on leaves
    pub body: Option<String>,

    /// Child parts in order, empty for leaves
    pub children: Vec<MimePart>,
}

impl MimePart {
    /// A leaf part carrying an encoded payload
    pub fn leaf(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body: Some(body.into()),
            children: Vec::new(),
        }
    }

    /// A container part
    pub fn multipart(content_type: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            content_type: content_type.into(),
            body: None,
            children,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn has_type(&self, content_type: &str) -> bool {
        self.content_type == content_type
    }

    /// Build the tree from a full message resource
    /// (`{"id":..,"payload":{"mimeType":..,"body":{"data":..},"parts":[..]}}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let message: WireMessage =
            serde_json::from_str(json).map_err(|e| ExtractError::Transport(e.to_string()))?;
        Ok(message.payload.into())
    }

    /// Build the tree from a raw RFC 5322 message.
    ///
    /// Leaf bodies are transfer-decoded and then re-encoded as web-safe
    /// base64, so they go through the same decode step as service payloads.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| ExtractError::Decode(e.to_string()))?;
        Self::from_parsed(&parsed)
    }

    fn from_parsed(parsed: &mailparse::ParsedMail) -> Result<Self> {
        let content_type = parsed.ctype.mimetype.to_lowercase();

        if parsed.subparts.is_empty() {
            let raw = parsed
                .get_body_raw()
                .map_err(|e| ExtractError::Decode(e.to_string()))?;
            return Ok(Self::leaf(content_type, BODY_ENGINE.encode(raw)));
        }

        let children = parsed
            .subparts
            .iter()
            .map(Self::from_parsed)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::multipart(content_type, children))
    }
}

#[derive(Debug, Deserialize)]
struct WireMessageList {
    #[serde(default)]
    messages: Vec<WireMessageStub>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessageStub {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    payload: WirePart,
}

#[derive(Debug, Deserialize)]
struct WirePart {
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    body: Option<WireBody>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
struct WireBody {
    data: Option<String>,
}

impl From<WirePart> for MimePart {
    fn from(part: WirePart) -> Self {
        let children: Vec<Self> = part.parts.into_iter().map(Self::from).collect();
        // Containers report an empty body object; leaves always keep a
        // payload, an absent `data` being the empty one
        let body = if children.is_empty() {
            Some(part.body.and_then(|b| b.data).unwrap_or_default())
        } else {
            None
        };

        Self {
            content_type: part.mime_type,
            body,
            children,
        }
    }
}
