use super::*;

const PAGE_ONE: &str = include_str!("../../tests/fixtures/timeline_page1.html");
const PAGE_TWO: &str = include_str!("../../tests/fixtures/timeline_page2.html");
const NOT_FOUND: &str = include_str!("../../tests/fixtures/timeline_not_found.html");
const PROTECTED: &str = include_str!("../../tests/fixtures/timeline_protected.html");

#[test]
fn page_state_from_markup() {
    assert_eq!(detect_page_state(PAGE_ONE), PageState::Ready);
    assert_eq!(detect_page_state(PAGE_TWO), PageState::Ready);
    assert_eq!(detect_page_state(NOT_FOUND), PageState::NotFound);
    assert_eq!(detect_page_state(PROTECTED), PageState::Protected);
}

#[test]
fn error_panel_without_missing_account_is_blocked() {
    let html = r#"<div class="error-panel"><span>Instance has been rate limited.</span></div>"#;
    assert_eq!(detect_page_state(html), PageState::Blocked);
    let suspended = r#"<div class="error-panel"><span>User "x" has been suspended</span></div>"#;
    assert_eq!(detect_page_state(suspended), PageState::NotFound);
}

#[test]
fn parses_profile_card() {
    let profile = parse_profile(PAGE_ONE, "https://m.example").unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Jack & Co"));
    assert!(profile.verified);
    assert_eq!(profile.bio.as_deref(), Some("building #things"));
    assert_eq!(profile.location.as_deref(), Some("California"));
    assert_eq!(profile.website.as_deref(), Some("https://example.com/jack"));
    assert_eq!(profile.join_date.as_deref(), Some("12:50 PM - 21 Mar 2006"));
    assert_eq!(profile.posts.as_deref(), Some("29,255"));
    assert_eq!(profile.following.as_deref(), Some("4,695"));
    assert_eq!(profile.followers.as_deref(), Some("6,669,126"));
    assert_eq!(
        profile.avatar_url.as_deref(),
        Some("https://m.example/pic/profile_images%2F1_400x400.jpg")
    );
    assert!(!profile.protected);
}

#[test]
fn protected_profile_is_flagged() {
    let profile = parse_profile(PROTECTED, "https://m.example").unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Locked"));
    assert_eq!(profile.followers.as_deref(), Some("120"));
    assert!(profile.protected);
    assert!(parse_timeline(PROTECTED).is_empty());
}

#[test]
fn page_without_profile_card() {
    assert!(parse_profile(PAGE_TWO, "https://m.example").is_none());
    assert!(parse_profile(NOT_FOUND, "https://m.example").is_none());
}

#[test]
fn parses_every_item_on_first_page() {
    let posts = parse_timeline(PAGE_ONE);
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_deref().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            "20",
            "1800000000000000003",
            "1800000000000000002",
            "1800000000000000001"
        ]
    );

    let pinned = &posts[0];
    assert!(pinned.is_pinned);
    assert_eq!(pinned.text, "just setting up my twttr");
    assert_eq!(pinned.date.as_deref(), Some("Mar 21, 2006 · 8:50 PM UTC"));
    assert_eq!(pinned.permalink.as_deref(), Some("https://x.com/jack/status/20"));
    assert_eq!(pinned.replies.as_deref(), Some("16K"));
    assert_eq!(pinned.retweets.as_deref(), Some("120K"));
    assert_eq!(pinned.likes.as_deref(), Some("201K"));
    assert!(!pinned.has_image && !pinned.has_video);
}

#[test]
fn separates_links_from_map_locations() {
    let posts = parse_timeline(PAGE_ONE);
    let post = &posts[1];
    assert!(!post.is_pinned);
    assert_eq!(
        post.text,
        "coffee spot maps.google.com and notes at example.com/notes #sf"
    );
    assert_eq!(
        post.location_link.as_deref(),
        Some("https://maps.google.com/?q=37.7749,-122.4194")
    );
    assert_eq!(post.urls, vec!["https://example.com/notes".to_owned()]);
    assert_eq!(post.replies.as_deref(), Some("12"));
    assert_eq!(post.retweets.as_deref(), Some("3"));
    assert_eq!(post.likes.as_deref(), Some("1.2K"));
    assert_eq!(post.views.as_deref(), Some("45,000"));
}

#[test]
fn flags_replies_retweets_and_media() {
    let posts = parse_timeline(PAGE_ONE);

    let reply = &posts[2];
    assert!(reply.is_reply);
    assert!(!reply.is_retweet);
    assert!(reply.has_image);
    assert!(reply.retweets.is_none());
    assert_eq!(reply.likes.as_deref(), Some("40"));

    let retweet = &posts[3];
    assert!(retweet.is_retweet);
    assert!(!retweet.is_reply);
    assert!(retweet.has_video);
    assert_eq!(retweet.text, "big news & bigger plans");
    assert_eq!(
        retweet.permalink.as_deref(),
        Some("https://x.com/alice/status/1800000000000000001")
    );
    assert_eq!(retweet.retweets.as_deref(), Some("77"));
}

#[test]
fn skips_load_newest_block_on_later_pages() {
    let posts = parse_timeline(PAGE_TWO);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id.as_deref(), Some("1790000000000000002"));
    assert_eq!(posts[0].date.as_deref(), Some("Jun 20, 2024 · 11:30 AM UTC"));
    assert_eq!(posts[1].text, "happy new year");
    assert_eq!(posts[1].likes.as_deref(), Some("50"));
    assert!(posts[1].replies.is_none());
}

#[test]
fn first_page_links_to_the_next() {
    assert_eq!(extract_next_cursor(PAGE_ONE).as_deref(), Some("DAABCgABGQ"));
    assert!(extract_next_cursor(PAGE_TWO).is_none());
}
