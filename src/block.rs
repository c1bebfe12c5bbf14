//! Structured content blocks and their canonical text rendering.

use serde::{Deserialize, Serialize};

use crate::event::ReferencedId;

/// Entity kinds that can be mentioned with `#[n]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MentionType {
    Pubkey,
    Event,
}

impl MentionType {
    /// Map a tag discriminator to a mention type. Anything but `e`/`p` is not
    /// mentionable.
    pub fn from_tag_key(key: &str) -> Option<Self> {
        match key {
            "e" => Some(MentionType::Event),
            "p" => Some(MentionType::Pubkey),
            _ => None,
        }
    }

    /// Tag discriminator for this kind.
    pub fn as_tag_key(&self) -> &'static str {
        match self {
            MentionType::Pubkey => "p",
            MentionType::Event => "e",
        }
    }
}

/// Largest index a `#[n]` mention can carry; the wire form has at most two
/// digits.
pub const MAX_MENTION_INDEX: usize = 99;

/// A resolved `#[n]` mention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mention {
    /// Position in the event's tag table.
    pub index: usize,
    pub kind: MentionType,
    /// Copy of the referenced tag at the time of parsing.
    pub reference: ReferencedId,
}

/// One unit of parsed note content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Block {
    Text(String),
    Mention(Mention),
    /// Hashtag in its original casing, without the leading `#`.
    Hashtag(String),
}

impl Block {
    pub fn as_hashtag(&self) -> Option<&str> {
        match self {
            Block::Hashtag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Block::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_mention(&self) -> bool {
        matches!(self, Block::Mention(_))
    }
}

impl From<String> for Block {
    fn from(text: String) -> Self {
        Block::Text(text)
    }
}

/// Unit of a draft before references have been given a tag index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBlock {
    Text(String),
    Hashtag(String),
    Ref(ReferencedId),
}

impl From<String> for PostBlock {
    fn from(text: String) -> Self {
        PostBlock::Text(text)
    }
}

/// Render blocks back into note content: mentions become `#[n]`, hashtags
/// keep the casing they were written with.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().fold(String::new(), |mut out, block| {
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Mention(m) => {
                out.push_str("#[");
                out.push_str(&m.index.to_string());
                out.push(']');
            }
            Block::Hashtag(tag) => {
                out.push('#');
                out.push_str(tag);
            }
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(index: usize) -> Block {
        Block::Mention(Mention {
            index,
            kind: MentionType::Pubkey,
            reference: ReferencedId::pubkey("abc"),
        })
    }

    #[test]
    fn renders_each_block_kind() {
        let blocks = vec![
            Block::Text("gm ".into()),
            mention(12),
            Block::Text(" ".into()),
            Block::Hashtag("Nostr".into()),
        ];
        assert_eq!(render_blocks(&blocks), "gm #[12] #Nostr");
    }

    #[test]
    fn empty_sequence_renders_empty() {
        assert_eq!(render_blocks(&[]), "");
    }

    #[test]
    fn tag_keys_round_trip() {
        for kind in [MentionType::Pubkey, MentionType::Event] {
            assert_eq!(MentionType::from_tag_key(kind.as_tag_key()), Some(kind));
        }
        assert_eq!(MentionType::from_tag_key("t"), None);
        assert_eq!(MentionType::from_tag_key("hashtag"), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(Block::Hashtag("x".into()).as_hashtag(), Some("x"));
        assert_eq!(Block::Text("x".into()).as_hashtag(), None);
        assert_eq!(Block::Text("y".into()).as_text(), Some("y"));
        assert!(mention(0).is_mention());
        assert!(!Block::Text("y".into()).is_mention());
    }

    #[test]
    fn blocks_serialize_with_type_tag() {
        let json = serde_json::to_value(vec![Block::Hashtag("rust".into()), mention(0)]).unwrap();
        assert_eq!(json[0]["type"], "hashtag");
        assert_eq!(json[0]["value"], "rust");
        assert_eq!(json[1]["type"], "mention");
        assert_eq!(json[1]["value"]["kind"], "pubkey");
        assert_eq!(json[1]["value"]["reference"]["ref_id"], "abc");
    }
}
