//! Identity-stable merging of extracted posts.

use std::cmp::Ordering;
use std::collections::HashMap;

use handlescan_core::Post;

/// Length of the text prefix used in composite identity keys.
pub const DEFAULT_PREFIX_LEN: usize = 50;

/// What happened to a post handed to [`Deduplicator::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First occurrence of this identity.
    Inserted,
    /// Already known; nothing changed.
    Duplicate,
    /// Already known; empty fields of the stored post were filled in.
    Enriched,
}

impl MergeOutcome {
    #[must_use]
    pub fn is_new(self) -> bool {
        self == MergeOutcome::Inserted
    }
}

/// Accumulates posts across extraction batches, keyed by identity.
///
/// Identity is the site id, else the permalink, else a composite of the
/// timestamp and the first [`DEFAULT_PREFIX_LEN`] characters of the text.
/// The first occurrence of an identity wins; later occurrences can only fill
/// fields the stored post left empty or zero.
///
/// Membership and sort order do not depend on merge order. Field values of
/// conflicting duplicates do: they come from the first occurrence.
#[derive(Debug)]
pub struct Deduplicator {
    prefix_len: usize,
    index: HashMap<String, usize>,
    entries: Vec<(String, Post)>,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix_len(DEFAULT_PREFIX_LEN)
    }

    #[must_use]
    pub fn with_prefix_len(prefix_len: usize) -> Self {
        Self {
            prefix_len: prefix_len.max(1),
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// The identity key of `post`.
    #[must_use]
    pub fn identity_key(&self, post: &Post) -> String {
        if !post.id.is_empty() {
            return format!("id:{}", post.id);
        }
        if let Some(permalink) = post.permalink.as_deref().filter(|p| !p.is_empty()) {
            return format!("url:{permalink}");
        }
        let ts = post
            .timestamp
            .map_or_else(|| "-".to_owned(), |t| t.timestamp().to_string());
        let prefix: String = post
            .text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(self.prefix_len)
            .collect();
        format!("ts:{ts}|{prefix}")
    }

    /// Merges one post. With `enrich` set, a re-encountered post fills the
    /// empty or zero fields of the stored one.
    pub fn merge(&mut self, post: Post, enrich: bool) -> MergeOutcome {
        let key = self.identity_key(&post);
        if let Some(&slot) = self.index.get(&key) {
            if enrich && enrich_post(&mut self.entries[slot].1, &post) {
                return MergeOutcome::Enriched;
            }
            return MergeOutcome::Duplicate;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, post));
        MergeOutcome::Inserted
    }

    /// Merges a batch and returns the number of newly inserted posts.
    pub fn merge_batch(&mut self, posts: impl IntoIterator<Item = Post>, enrich: bool) -> usize {
        posts
            .into_iter()
            .map(|post| self.merge(post, enrich))
            .filter(|outcome| outcome.is_new())
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A sorted copy of the current collection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Post> {
        let mut entries = self.entries.clone();
        sort_entries(&mut entries);
        entries.into_iter().map(|(_, post)| post).collect()
    }

    /// Consumes the deduplicator, returning posts newest first with undated
    /// posts last in encounter order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Post> {
        let mut entries = self.entries;
        sort_entries(&mut entries);
        entries.into_iter().map(|(_, post)| post).collect()
    }
}

/// Timestamp descending, identity key ascending on ties, undated last.
/// The sort is stable, so undated posts keep their encounter order.
fn sort_entries(entries: &mut [(String, Post)]) {
    entries.sort_by(|(ka, a), (kb, b)| match (a.timestamp, b.timestamp) {
        (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| ka.cmp(kb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Fills empty or zero fields of `known` from `seen`. Returns `true` if any
/// field changed.
fn enrich_post(known: &mut Post, seen: &Post) -> bool {
    let mut changed = false;

    macro_rules! fill_zero {
        ($($field:ident),+) => {
            $(
                if known.$field == 0 && seen.$field > 0 {
                    known.$field = seen.$field;
                    changed = true;
                }
            )+
        };
    }
    fill_zero!(likes, retweets, replies, views);

    macro_rules! fill_flag {
        ($($field:ident),+) => {
            $(
                if !known.$field && seen.$field {
                    known.$field = true;
                    changed = true;
                }
            )+
        };
    }
    fill_flag!(has_image, has_video, is_reply, is_retweet, is_pinned);

    if known.text.is_empty() && !seen.text.is_empty() {
        known.text.clone_from(&seen.text);
        changed = true;
    }
    if known.place_name.is_empty() && !seen.place_name.is_empty() {
        known.place_name.clone_from(&seen.place_name);
        changed = true;
    }
    if known.urls.is_empty() && !seen.urls.is_empty() {
        known.urls.clone_from(&seen.urls);
        changed = true;
    }
    if known.timestamp.is_none() && seen.timestamp.is_some() {
        known.timestamp = seen.timestamp;
        changed = true;
    }
    if known.coordinates.is_none() && seen.coordinates.is_some() {
        known.coordinates = seen.coordinates;
        changed = true;
    }
    if known.permalink.is_none() && seen.permalink.is_some() {
        known.permalink.clone_from(&seen.permalink);
        changed = true;
    }

    changed
}
