//! Nostr tag and event model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wrapper for a Nostr tag expressed as an array of strings.
///
/// Tags appear as small arrays where the first element denotes the type and the
/// following elements hold data. The ones this crate interprets are:
///
/// - `p` – references another author's public key
/// - `e` – links to another event ID
/// - `hashtag` – lower-cased topic extracted from a composed note
///
/// Each tag is stored verbatim so uncommon or custom tags are preserved. A tag's
/// position in the event's tag list is the index used by `#[n]` mentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Build a tag from any list of string-like fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(fields.into_iter().map(Into::into).collect())
    }

    /// Type discriminator (element 0), if present.
    pub fn key(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Identifier (element 1), if present.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// Reference to another protocol entity, as carried by `e`/`p` tags.
///
/// `key` is kept as the raw discriminator so that references of kinds this
/// crate does not mention (e.g. `a` or `t`) can still travel through a
/// composition; only `e` and `p` become mentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferencedId {
    /// Tag discriminator, `e` or `p` for mentionable references.
    pub key: String,
    /// Event id or public key (hex).
    pub ref_id: String,
    /// Optional relay hint stored as the third tag element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_id: Option<String>,
}

impl ReferencedId {
    pub fn new(key: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ref_id: ref_id.into(),
            relay_id: None,
        }
    }

    pub fn pubkey(ref_id: impl Into<String>) -> Self {
        Self::new("p", ref_id)
    }

    pub fn event(ref_id: impl Into<String>) -> Self {
        Self::new("e", ref_id)
    }

    /// Attach a relay hint.
    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay_id = Some(relay.into());
        self
    }

    /// Recover a reference from a tag with at least a type and an identifier.
    pub fn from_tag(tag: &Tag) -> Option<Self> {
        let key = tag.key()?;
        let ref_id = tag.value()?;
        Some(Self {
            key: key.to_string(),
            ref_id: ref_id.to_string(),
            relay_id: tag.0.get(2).cloned(),
        })
    }

    /// Tag form: `[key, id]`, or `[key, id, relay]` when a relay hint is set.
    pub fn to_tag(&self) -> Tag {
        let mut fields = vec![self.key.clone(), self.ref_id.clone()];
        if let Some(relay) = &self.relay_id {
            fields.push(relay.clone());
        }
        Tag(fields)
    }
}

/// Errors produced when reading a reference written as `key:id[:relay]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefParseError {
    #[error("reference {0:?} is missing the `key:` prefix")]
    MissingKey(String),
    #[error("reference {0:?} has an empty key")]
    EmptyKey(String),
    #[error("reference {0:?} has an empty id")]
    EmptyId(String),
}

impl FromStr for ReferencedId {
    type Err = RefParseError;

    /// Parse `p:<hex>`, `e:<hex>` or `e:<hex>:<relay url>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, rest) = s
            .split_once(':')
            .ok_or_else(|| RefParseError::MissingKey(s.to_string()))?;
        if key.is_empty() {
            return Err(RefParseError::EmptyKey(s.to_string()));
        }
        // Relay URLs contain `:` themselves, so only the first one after the id splits.
        let (ref_id, relay) = match rest.split_once(':') {
            Some((id, relay)) if !relay.is_empty() => (id, Some(relay)),
            Some((id, _)) => (id, None),
            None => (rest, None),
        };
        if ref_id.is_empty() {
            return Err(RefParseError::EmptyId(s.to_string()));
        }
        let mut reference = ReferencedId::new(key, ref_id);
        reference.relay_id = relay.map(str::to_string);
        Ok(reference)
    }
}

impl fmt::Display for ReferencedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.ref_id)?;
        if let Some(relay) = &self.relay_id {
            write!(f, ":{relay}")?;
        }
        Ok(())
    }
}

/// Event as handed to a signer: everything except `id` and `sig`.
///
/// ```json
/// {
///   "pubkey": "f7234bd4...",
///   "created_at": 1700000000,
///   "kind": 1,
///   "tags": [["p", "abc123"], ["hashtag", "nostr"]],
///   "content": "hello #[0] #Nostr"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnsignedEvent {
    /// Author public key (hex).
    pub pubkey: String,
    /// Unix timestamp of creation.
    pub created_at: u64,
    /// Kind number, `1` for text notes.
    pub kind: u32,
    /// Tag table referenced by `#[n]` mentions in `content`.
    pub tags: Vec<Tag>,
    /// Rendered note body.
    pub content: String,
}

/// Any event read back from disk or a relay. Only the fields needed to parse
/// the body are required; `id`, `sig` and the rest are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub content: String,
}
