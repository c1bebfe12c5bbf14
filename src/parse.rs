//! Parser turning note content plus its tag table into [`Block`]s.

use tracing::trace;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::{
    block::{Block, Mention, MentionType},
    event::{ReferencedId, Tag},
    scanner::Scanner,
};

/// Outcome of trying to read `#[n]` at the cursor.
enum MentionAttempt {
    Found(Mention),
    /// Well-formed `#[n]` that does not point at an `e`/`p` tag. The cursor
    /// stays past the closing `]`.
    Rejected,
    /// Not shaped like `#[n]`; cursor restored.
    NoMatch,
}

/// Split `content` into text, mention and hashtag blocks.
///
/// Never fails: anything that is not a valid mention or hashtag ends up in a
/// [`Block::Text`]. Adjacent text is merged and empty text blocks are never
/// emitted, so content without `#` yields exactly one block.
pub fn parse_mentions(content: &str, tags: &[Tag]) -> Vec<Block> {
    let mut p = Scanner::new(content);
    let mut blocks = Vec::new();
    let mut starting_from = 0;

    while !p.at_end() {
        if !p.consume_until(|c| c == '#') {
            break;
        }

        let pre_mention = p.position();
        match parse_mention(&mut p, tags) {
            MentionAttempt::Found(mention) => {
                push_text(&mut blocks, &p, starting_from, pre_mention);
                blocks.push(Block::Mention(mention));
                starting_from = p.position();
                continue;
            }
            // `#[n]` stays part of the surrounding text.
            MentionAttempt::Rejected => continue,
            MentionAttempt::NoMatch => {}
        }

        if let Some(hashtag) = parse_hashtag(&mut p) {
            push_text(&mut blocks, &p, starting_from, pre_mention);
            blocks.push(Block::Hashtag(hashtag));
            starting_from = p.position();
        } else {
            p.advance();
        }
    }

    push_text(&mut blocks, &p, starting_from, p.len());
    blocks
}

/// Append the text between `from` and `to` unless it is empty.
pub(crate) fn push_text<B: From<String>>(blocks: &mut Vec<B>, p: &Scanner, from: usize, to: usize) {
    if from < to {
        blocks.push(B::from(p.substring(from, to)));
    }
}

fn parse_mention(p: &mut Scanner, tags: &[Tag]) -> MentionAttempt {
    let start = p.position();

    let Some(index) = parse_mention_index(p) else {
        p.reset(start);
        return MentionAttempt::NoMatch;
    };

    match resolve_mention(index, tags) {
        Some(mention) => MentionAttempt::Found(mention),
        None => {
            trace!(index, tags = tags.len(), "ignoring mention without e/p tag");
            MentionAttempt::Rejected
        }
    }
}

/// `#[` followed by one or two digits and `]`.
fn parse_mention_index(p: &mut Scanner) -> Option<usize> {
    if !p.parse_str("#[") {
        return None;
    }
    let mut index = p.parse_digit()?;
    if let Some(d2) = p.parse_digit() {
        index = index * 10 + d2;
    }
    if !p.parse_char(']') {
        return None;
    }
    Some(index)
}

fn resolve_mention(index: usize, tags: &[Tag]) -> Option<Mention> {
    let tag = tags.get(index)?;
    let kind = MentionType::from_tag_key(tag.key()?)?;
    let reference = ReferencedId::from_tag(tag)?;
    Some(Mention {
        index,
        kind,
        reference,
    })
}

/// Read `#word` at the cursor. The `#` must start the input or follow
/// whitespace/punctuation, which also rules out `#a#b` chains. On failure the
/// cursor is left on the `#`.
pub(crate) fn parse_hashtag(p: &mut Scanner) -> Option<String> {
    parse_hashtag_bounded(p, true)
}

/// Like [`parse_hashtag`], optionally skipping the check on the preceding
/// character when the caller knows the boundary is valid.
pub(crate) fn parse_hashtag_bounded(p: &mut Scanner, check_prev: bool) -> Option<String> {
    let start = p.position();

    if !p.parse_char('#') {
        return None;
    }

    // prev_char(1) is the `#` itself
    if let Some(prev) = p.prev_char(2) {
        if check_prev && !is_punctuation(prev) {
            p.reset(start);
            return None;
        }
    }

    match p.parse_while(is_hashtag_char) {
        Some(tag) => Some(tag),
        None => {
            p.reset(start);
            None
        }
    }
}

pub fn is_hashtag_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Whitespace or a character in one of the Unicode punctuation categories
/// (`Pc`, `Pd`, `Ps`, `Pe`, `Pi`, `Pf`, `Po`). Symbols such as `$` or `+` do
/// not count.
pub fn is_punctuation(c: char) -> bool {
    c.is_whitespace() || c.general_category_group() == GeneralCategoryGroup::Punctuation
}
