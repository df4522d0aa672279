use forumlens_core::{Post, SentimentLabel, SentimentThresholds};
use forumlens_sentiment::{score_posts, top_keywords, LexiconClassifier, SentimentIndex};

fn post(id: &str, topic_id: i64, title: Option<&str>, content: &str) -> Post {
    Post {
        id: id.to_string(),
        topic_id,
        author: "member".to_string(),
        content: content.to_string(),
        created_at: None,
        is_topic: title.is_some(),
        category_id: 1,
        title: title.map(ToString::to_string),
        view_count: None,
    }
}

#[test]
fn lexicon_scores_join_every_post() {
    let posts = vec![
        post("t1", 1, Some("Criterion restoration"), "Stunning transfer, highly recommend"),
        post("r1", 1, None, "Mine arrived scratched and the case was broken"),
        post("r2", 1, None, "Region B only"),
    ];

    let scores = score_posts(&posts, &LexiconClassifier, &SentimentThresholds::default());
    let index = SentimentIndex::build(&posts, scores).unwrap();

    assert_eq!(index.matched(), 3);
    assert_eq!(index.unscored(), 0);
    assert_eq!(index.get("t1").map(|s| s.label), Some(SentimentLabel::Positive));
    assert_eq!(index.get("r1").map(|s| s.label), Some(SentimentLabel::Negative));
    assert_eq!(index.get("r2").map(|s| s.label), Some(SentimentLabel::Neutral));
}

#[test]
fn keywords_rank_post_texts() {
    let posts = vec![
        post("t1", 1, Some("Steelbook restoration"), "steelbook question"),
        post("r1", 1, None, "restoration looks sharp on the steelbook"),
    ];
    let texts: Vec<String> = posts.iter().map(Post::analysis_text).collect();
    let top = top_keywords(texts.iter().map(String::as_str), 2);
    assert_eq!(top[0].keyword, "steelbook");
    assert_eq!(top[0].count, 3);
    assert_eq!(top[1].keyword, "restoration");
    assert_eq!(top[1].count, 2);
}
