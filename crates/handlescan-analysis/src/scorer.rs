//! Presence-only lexicon sentiment for short social posts.

use serde::{Deserialize, Serialize};

/// Words whose presence marks a post as positive. Lowercase single words.
pub(crate) const POSITIVE: &[&str] = &[
    "amazing",
    "awesome",
    "beautiful",
    "best",
    "congrats",
    "congratulations",
    "excellent",
    "excited",
    "fantastic",
    "glad",
    "good",
    "great",
    "happy",
    "incredible",
    "love",
    "loved",
    "nice",
    "proud",
    "thank",
    "thanks",
    "win",
    "wonderful",
];

/// Words whose presence marks a post as negative. Lowercase single words.
pub(crate) const NEGATIVE: &[&str] = &[
    "angry",
    "awful",
    "bad",
    "broken",
    "disappointed",
    "fail",
    "failed",
    "hate",
    "horrible",
    "sad",
    "scam",
    "sorry",
    "terrible",
    "ugly",
    "upset",
    "worst",
    "wrong",
];

/// Sentiment class of one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Classify `text` by which lexicon lists it touches.
///
/// Splits text into lowercase words with surrounding punctuation stripped.
/// Only presence counts: a post matching both lists, or neither, is neutral.
#[must_use]
pub fn classify(text: &str) -> Sentiment {
    let mut positive = false;
    let mut negative = false;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if w.is_empty() {
            continue;
        }
        positive |= POSITIVE.contains(&w.as_str());
        negative |= NEGATIVE.contains(&w.as_str());
        if positive && negative {
            break;
        }
    }
    match (positive, negative) {
        (true, false) => Sentiment::Positive,
        (false, true) => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_neutral() {
        assert_eq!(classify(""), Sentiment::Neutral);
        assert_eq!(classify("   "), Sentiment::Neutral);
    }

    #[test]
    fn unknown_text_is_neutral() {
        assert_eq!(classify("the quick brown fox"), Sentiment::Neutral);
    }

    #[test]
    fn positive_keyword_is_positive() {
        assert_eq!(classify("this launch is great"), Sentiment::Positive);
    }

    #[test]
    fn negative_keyword_is_negative() {
        assert_eq!(classify("worst release ever"), Sentiment::Negative);
    }

    #[test]
    fn both_lists_cancel_out() {
        assert_eq!(classify("great idea, terrible timing"), Sentiment::Neutral);
    }

    #[test]
    fn repetition_does_not_outweigh_presence() {
        assert_eq!(
            classify("love love love love but sad"),
            Sentiment::Neutral,
            "presence-only scoring ignores frequency"
        );
    }

    #[test]
    fn punctuation_stripped_from_words() {
        assert_eq!(classify("Thanks!"), Sentiment::Positive);
        assert_eq!(classify("(awful)"), Sentiment::Negative);
    }
}
