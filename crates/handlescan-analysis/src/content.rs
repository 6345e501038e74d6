//! What the account posts: post kinds, tone, hashtags and mentions.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use handlescan_core::Post;
use regex::Regex;

use crate::scorer::{classify, Sentiment};
use crate::statistics::ratio;
use crate::types::{Applicability, ContentAnalysis, SentimentBreakdown, TermCount};

const TOP_TERMS: usize = 5;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("valid mention regex"));

/// Content view over `posts`.
#[must_use]
pub fn analyze_content(posts: &[Post]) -> ContentAnalysis {
    let total = posts.len();
    let original_posts = posts.iter().filter(|p| p.is_original()).count();
    let media_posts = posts.iter().filter(|p| p.has_media()).count();
    let link_posts = posts.iter().filter(|p| p.has_link()).count();

    let mut sentiment = SentimentBreakdown::default();
    for post in posts {
        match classify(&post.text) {
            Sentiment::Positive => sentiment.positive += 1,
            Sentiment::Negative => sentiment.negative += 1,
            Sentiment::Neutral => sentiment.neutral += 1,
        }
    }

    let hashtags: Vec<String> = posts
        .iter()
        .flat_map(|p| terms(&HASHTAG_RE, &p.text))
        .collect();
    let mentions: Vec<String> = posts
        .iter()
        .flat_map(|p| terms(&MENTION_RE, &p.text))
        .collect();

    ContentAnalysis {
        applicability: Applicability::Full,
        original_posts,
        replies: posts.iter().filter(|p| p.is_reply).count(),
        retweets: posts.iter().filter(|p| p.is_retweet).count(),
        media_posts,
        link_posts,
        sentiment,
        overall_sentiment: overall_sentiment(sentiment).to_owned(),
        avg_hashtags_per_post: ratio(hashtags.len(), total),
        top_hashtags: top_terms(hashtags),
        top_mentions: top_terms(mentions),
        duplicate_ratio: ratio(duplicate_count(posts), total),
        link_ratio: ratio(link_posts, total),
        original_ratio: ratio(original_posts, total),
        media_ratio: ratio(media_posts, total),
    }
}

/// The zero-valued view for sources without an activity stream.
#[must_use]
pub fn not_applicable() -> ContentAnalysis {
    ContentAnalysis {
        applicability: Applicability::NotApplicable,
        ..analyze_content(&[])
    }
}

fn overall_sentiment(breakdown: SentimentBreakdown) -> &'static str {
    match breakdown.positive.cmp(&breakdown.negative) {
        std::cmp::Ordering::Greater => "Positive",
        std::cmp::Ordering::Less => "Negative",
        std::cmp::Ordering::Equal => "Neutral",
    }
}

fn terms(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect()
}

/// The most frequent terms, count descending, ties alphabetical.
fn top_terms(all: Vec<String>) -> Vec<TermCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for term in all {
        *counts.entry(term).or_default() += 1;
    }
    let mut ranked: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(TOP_TERMS);
    ranked
}

/// Posts whose normalized, non-empty text already appeared earlier.
fn duplicate_count(posts: &[Post]) -> usize {
    let mut seen = HashSet::new();
    posts
        .iter()
        .map(|p| {
            p.text
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .filter(|text| !text.is_empty())
        .filter(|text| !seen.insert(text.clone()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            text: text.to_owned(),
            ..Post::default()
        }
    }

    #[test]
    fn counts_post_kinds() {
        let posts = vec![
            Post {
                is_reply: true,
                ..post("@bob sure")
            },
            Post {
                is_retweet: true,
                has_image: true,
                ..post("RT @alice look")
            },
            Post {
                urls: vec!["https://example.com".to_owned()],
                ..post("read this")
            },
            post("plain"),
        ];
        let content = analyze_content(&posts);
        assert_eq!(content.original_posts, 2);
        assert_eq!(content.replies, 1);
        assert_eq!(content.retweets, 1);
        assert_eq!(content.media_posts, 1);
        assert_eq!(content.link_posts, 1);
        assert!((content.original_ratio - 0.5).abs() < f64::EPSILON);
        assert!((content.link_ratio - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn tone_uses_presence_only_lexicon() {
        let posts = vec![
            post("great day"),
            post("happy news"),
            post("terrible traffic"),
            post("great and terrible"),
            post("nothing"),
        ];
        let content = analyze_content(&posts);
        assert_eq!(
            content.sentiment,
            SentimentBreakdown {
                positive: 2,
                negative: 1,
                neutral: 2
            }
        );
        assert_eq!(content.overall_sentiment, "Positive");
    }

    #[test]
    fn top_terms_break_ties_alphabetically() {
        let posts = vec![
            post("#Rust #zig @bob"),
            post("#rust #go @alice"),
            post("#zig #c #d #e #f @bob"),
        ];
        let content = analyze_content(&posts);
        let tags: Vec<_> = content
            .top_hashtags
            .iter()
            .map(|t| (t.term.as_str(), t.count))
            .collect();
        assert_eq!(
            tags,
            vec![("rust", 2), ("zig", 2), ("c", 1), ("d", 1), ("e", 1)]
        );
        assert_eq!(content.top_mentions[0].term, "bob");
        assert_eq!(content.top_mentions[0].count, 2);
        assert!((content.avg_hashtags_per_post - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_ratio_counts_repeats_only() {
        let posts = vec![
            post("Buy now"),
            post("buy   now"),
            post("buy now"),
            post("something else"),
        ];
        let content = analyze_content(&posts);
        assert!((content.duplicate_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_text_is_never_a_duplicate() {
        let posts = vec![post(""), post(""), post("")];
        assert!(analyze_content(&posts).duplicate_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_history_is_zero_valued() {
        let content = analyze_content(&[]);
        assert_eq!(content.original_posts, 0);
        assert_eq!(content.overall_sentiment, "Neutral");
        assert!(content.top_hashtags.is_empty());
        assert!(content.avg_hashtags_per_post.abs() < f64::EPSILON);
        assert_eq!(not_applicable().applicability, Applicability::NotApplicable);
    }
}
