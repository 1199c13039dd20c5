//! Response content model.
//!
//! A tool call answers with an ordered [`ContentEnvelope`] of [`Content`]
//! units. By convention the first unit is a plain-text summary and the
//! following units carry rich payloads, such as an HTML app embedded inline
//! as a resource.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single unit of tool response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text.
    Text {
        /// The text value.
        text: String,
    },

    /// An inline copy of a resource's current content.
    Resource {
        /// The embedded resource.
        resource: EmbeddedResource,
    },
}

/// Resource content embedded in a tool response.
///
/// This is a copy of the data, not a pointer: the caller receives the
/// payload directly and may still read the same URI separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedResource {
    /// URI the resource is registered under.
    pub uri: String,

    /// MIME type of the payload.
    pub mime_type: String,

    /// The payload itself.
    pub text: String,
}

impl Content {
    /// Create a text unit.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an embedded resource unit.
    pub fn resource(
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::Resource {
            resource: EmbeddedResource {
                uri: uri.into(),
                mime_type: mime_type.into(),
                text: text.into(),
            },
        }
    }

    /// The text value, if this is a text unit.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Resource { .. } => None,
        }
    }

    /// The embedded resource, if this is a resource unit.
    pub fn as_resource(&self) -> Option<&EmbeddedResource> {
        match self {
            Self::Resource { resource } => Some(resource),
            Self::Text { .. } => None,
        }
    }
}

/// Ordered, read-only sequence of content units produced by a tool handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentEnvelope(Vec<Content>);

/// Raised when an envelope cannot be sent to a caller.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("content envelope must contain at least one unit")]
pub struct EmptyEnvelope;

impl ContentEnvelope {
    /// Create an envelope from the given units.
    pub fn new(units: Vec<Content>) -> Self {
        Self(units)
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the envelope has no units.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The units in order.
    pub fn units(&self) -> &[Content] {
        &self.0
    }

    /// Wrap the envelope as a `tools/call` result.
    ///
    /// Fails for an empty envelope, which is not a valid response.
    pub fn into_call_result(self) -> Result<CallToolResult, EmptyEnvelope> {
        if self.is_empty() {
            return Err(EmptyEnvelope);
        }
        Ok(CallToolResult { content: self })
    }
}

impl From<Vec<Content>> for ContentEnvelope {
    fn from(units: Vec<Content>) -> Self {
        Self::new(units)
    }
}

impl FromIterator<Content> for ContentEnvelope {
    fn from_iter<I: IntoIterator<Item = Content>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ContentEnvelope {
    type Item = Content;
    type IntoIter = std::vec::IntoIter<Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Wire result of a successful `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// The response content.
    pub content: ContentEnvelope,
}
