//! Inline mentions and hashtags in Nostr text notes.
//!
//! Note content refers to other entities through its tag table: `#[n]` points
//! at `tags[n]`, which must be an `e` (event) or `p` (pubkey) tag, while
//! `#word` is a hashtag. This crate converts between that wire form and a
//! sequence of [`Block`]s, and composes new notes from drafts that reference
//! entities directly.
//!
//! ```
//! use nostr_blocks::{compose, parse_mentions, render_blocks};
//!
//! let alice = "a".repeat(64);
//! let composed = compose(&format!("gm @{alice} #Nostr"), &[], vec![]);
//! assert_eq!(composed.content(), "gm #[0] #Nostr");
//!
//! let blocks = parse_mentions(&composed.content(), &composed.tags);
//! assert_eq!(blocks, composed.blocks);
//! assert_eq!(render_blocks(&blocks), "gm #[0] #Nostr");
//! ```

pub mod block;
pub mod config;
pub mod event;
pub mod parse;
pub mod post;
pub mod resolve;
pub mod scanner;

pub use block::{render_blocks, Block, Mention, MentionType, PostBlock, MAX_MENTION_INDEX};
pub use event::{Note, RefParseError, ReferencedId, Tag, UnsignedEvent};
pub use parse::parse_mentions;
pub use post::{compose, make_post_tags, parse_post_blocks, post_to_event, Post, PostTags, TEXT_NOTE};
pub use resolve::{find_tag_ref, resolve_tag};
