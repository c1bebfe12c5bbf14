//! Composing new notes: draft parsing, tag resolution and rendering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    block::{render_blocks, Block, Mention, MentionType, PostBlock, MAX_MENTION_INDEX},
    event::{ReferencedId, Tag, UnsignedEvent},
    parse::{parse_hashtag_bounded, push_text},
    resolve::{find_tag_ref, resolve_tag},
    scanner::Scanner,
};

/// Kind number of a short text note.
pub const TEXT_NOTE: u32 = 1;

/// Length of a hex encoded event id or public key.
const HEX_ID_LEN: usize = 64;

/// A note as written by its author, before any tag indices exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Draft text; may contain `@<hex pubkey>`, `&<hex event id>` and hashtags.
    pub content: String,
    /// Entities the note refers to without mentioning them inline, e.g. the
    /// author and event being replied to.
    #[serde(default)]
    pub references: Vec<ReferencedId>,
    /// Tags the event starts with before references and hashtags are added.
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default = "default_kind")]
    pub kind: u32,
}

fn default_kind() -> u32 {
    TEXT_NOTE
}

impl Post {
    pub fn new(content: impl Into<String>, references: Vec<ReferencedId>) -> Self {
        Self {
            content: content.into(),
            references,
            tags: Vec::new(),
            kind: TEXT_NOTE,
        }
    }
}

/// Blocks of a composed note together with its final tag table.
#[derive(Debug, Clone, PartialEq)]
pub struct PostTags {
    pub blocks: Vec<Block>,
    pub tags: Vec<Tag>,
}

impl PostTags {
    /// Canonical note content.
    pub fn content(&self) -> String {
        render_blocks(&self.blocks)
    }
}

/// Split a draft into text, hashtags and inline references.
///
/// `@` followed by 64 hex digits references a pubkey, `&` followed by 64 hex
/// digits an event. Hashtags follow the same rules as in published content,
/// except that one directly after a reference is always accepted: the
/// reference renders as `#[n]`, and `]` is punctuation.
pub fn parse_post_blocks(content: &str) -> Vec<PostBlock> {
    let mut p = Scanner::new(content);
    let mut blocks = Vec::new();
    let mut starting_from = 0;

    while !p.at_end() {
        if !p.consume_until(|c| c == '@' || c == '&' || c == '#') {
            break;
        }

        let pre_mention = p.position();
        let after_ref =
            starting_from == pre_mention && matches!(blocks.last(), Some(PostBlock::Ref(_)));
        if let Some(reference) = parse_post_reference(&mut p) {
            push_text(&mut blocks, &p, starting_from, pre_mention);
            blocks.push(PostBlock::Ref(reference));
            starting_from = p.position();
        } else if let Some(hashtag) = parse_hashtag_bounded(&mut p, !after_ref) {
            push_text(&mut blocks, &p, starting_from, pre_mention);
            blocks.push(PostBlock::Hashtag(hashtag));
            starting_from = p.position();
        } else {
            p.advance();
        }
    }

    push_text(&mut blocks, &p, starting_from, p.len());
    blocks
}

fn parse_post_reference(p: &mut Scanner) -> Option<ReferencedId> {
    let start = p.position();

    let kind = if p.parse_char('@') {
        MentionType::Pubkey
    } else if p.parse_char('&') {
        MentionType::Event
    } else {
        return None;
    };

    match p.parse_hexstr(HEX_ID_LEN) {
        Some(id) => Some(ReferencedId::new(kind.as_tag_key(), id)),
        None => {
            p.reset(start);
            None
        }
    }
}

/// Resolve draft blocks against `tags`.
///
/// References get the index of their `e`/`p` tag, appending one when missing;
/// references of any other kind are dropped from the output. Every hashtag
/// appends a `["hashtag", <lowercase>]` tag while the block keeps the casing
/// the author typed.
///
/// Only indices up to [`MAX_MENTION_INDEX`] parse back from content. A
/// reference resolved past that (a large starting table, or many hashtags
/// ahead of it) still renders as `#[n]` but reads back as plain text.
pub fn make_post_tags(post_blocks: Vec<PostBlock>, mut tags: Vec<Tag>) -> PostTags {
    let mut blocks = Vec::with_capacity(post_blocks.len());

    for post_block in post_blocks {
        match post_block {
            PostBlock::Ref(reference) => {
                let Some(kind) = MentionType::from_tag_key(&reference.key) else {
                    debug!(key = %reference.key, id = %reference.ref_id, "dropping reference of unknown kind");
                    continue;
                };
                let index = resolve_tag(&mut tags, &reference.key, &reference.ref_id);
                if index > MAX_MENTION_INDEX {
                    debug!(index, id = %reference.ref_id, "mention index too large to parse back");
                }
                // Mirror what a parser would read back from the table.
                let reference = ReferencedId::from_tag(&tags[index]).unwrap_or(reference);
                blocks.push(Block::Mention(Mention {
                    index,
                    kind,
                    reference,
                }));
            }
            PostBlock::Hashtag(hashtag) => {
                tags.push(Tag::new(["hashtag".to_string(), hashtag.to_lowercase()]));
                blocks.push(Block::Hashtag(hashtag));
            }
            PostBlock::Text(text) => blocks.push(Block::Text(text)),
        }
    }

    PostTags { blocks, tags }
}

/// Compose a draft into its final blocks and tag table.
///
/// `tags` is the starting table. Each of `explicit_refs` is added to it unless
/// an `[key, id, ..]` tag is already present; these references become tags but
/// never appear in the content.
pub fn compose(draft: &str, explicit_refs: &[ReferencedId], mut tags: Vec<Tag>) -> PostTags {
    for reference in explicit_refs {
        if find_tag_ref(&tags, &reference.key, &reference.ref_id).is_none() {
            tags.push(reference.to_tag());
        }
    }
    make_post_tags(parse_post_blocks(draft), tags)
}

/// Build the unsigned event for `post`, ready to be hashed and signed.
pub fn post_to_event(post: &Post, pubkey: &str, created_at: u64) -> UnsignedEvent {
    let composed = compose(&post.content, &post.references, post.tags.clone());
    UnsignedEvent {
        pubkey: pubkey.to_string(),
        created_at,
        kind: post.kind,
        content: composed.content(),
        tags: composed.tags,
    }
}
