//! Lookup and append-only growth of an event's tag table.

use tracing::debug;

use crate::event::Tag;

/// Index of the first tag of the form `[key, id, ..]`.
pub fn find_tag_ref(tags: &[Tag], key: &str, id: &str) -> Option<usize> {
    tags.iter()
        .position(|tag| tag.key() == Some(key) && tag.value() == Some(id))
}

/// Index of `[key, id, ..]` in `tags`, appending `[key, id]` when absent.
///
/// The table only ever grows, so indices handed out earlier in the same
/// composition stay valid.
pub fn resolve_tag(tags: &mut Vec<Tag>, key: &str, id: &str) -> usize {
    if let Some(index) = find_tag_ref(tags, key, id) {
        return index;
    }
    tags.push(Tag::new([key, id]));
    let index = tags.len() - 1;
    debug!(key, id, index, "appended tag");
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_matching_tag() {
        let tags = vec![
            Tag::new(["e", "abc"]),
            Tag::new(["p", "abc", "wss://relay"]),
            Tag::new(["p", "abc"]),
        ];
        assert_eq!(find_tag_ref(&tags, "p", "abc"), Some(1));
        assert_eq!(find_tag_ref(&tags, "e", "abc"), Some(0));
        assert_eq!(find_tag_ref(&tags, "p", "zzz"), None);
    }

    #[test]
    fn short_tags_never_match() {
        let tags = vec![Tag(vec![]), Tag::new(["p"])];
        assert_eq!(find_tag_ref(&tags, "p", ""), None);
    }

    #[test]
    fn resolve_reuses_existing_entry() {
        let mut tags = vec![Tag::new(["hashtag", "nostr"]), Tag::new(["p", "abc"])];
        assert_eq!(resolve_tag(&mut tags, "p", "abc"), 1);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut tags = vec![Tag::new(["e", "ff"])];
        let first = resolve_tag(&mut tags, "p", "abc");
        let second = resolve_tag(&mut tags, "p", "abc");
        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1], Tag::new(["p", "abc"]));
    }

    #[test]
    fn resolve_appends_in_order() {
        let mut tags = vec![];
        assert_eq!(resolve_tag(&mut tags, "p", "a"), 0);
        assert_eq!(resolve_tag(&mut tags, "e", "b"), 1);
        assert_eq!(resolve_tag(&mut tags, "p", "a"), 0);
        assert_eq!(resolve_tag(&mut tags, "e", "a"), 2);
        assert_eq!(tags.len(), 3);
    }
}
