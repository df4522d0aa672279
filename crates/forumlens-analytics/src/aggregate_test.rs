use chrono::{DateTime, TimeZone, Utc};

use super::*;

fn ts(d: u32, h: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap())
}

fn post(id: &str, topic_id: i64, category_id: i64, created_at: Option<DateTime<Utc>>) -> Post {
    Post {
        id: id.to_string(),
        topic_id,
        author: "member".to_string(),
        content: String::new(),
        created_at,
        is_topic: id.starts_with('t'),
        category_id,
        title: None,
        view_count: None,
    }
}

fn score(post_id: &str, polarity: f64, label: SentimentLabel) -> SentimentScore {
    SentimentScore {
        post_id: post_id.to_string(),
        polarity,
        label,
        subjectivity: None,
    }
}

fn categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Action".to_string(),
        },
        Category {
            id: 2,
            name: "Drama".to_string(),
        },
    ]
}

fn action_drama() -> (Vec<Post>, SentimentIndex) {
    let posts = vec![post("t1", 1, 1, ts(6, 9)), post("r2", 1, 1, ts(6, 10)), post("t3", 3, 2, ts(7, 9))];
    let scores = vec![
        score("t1", 0.5, SentimentLabel::Positive),
        score("r2", -0.3, SentimentLabel::Negative),
        score("t3", 0.2, SentimentLabel::Positive),
    ];
    let index = SentimentIndex::build(&posts, scores).unwrap();
    (posts, index)
}

// -----------------------------------------------------------------------
// summarize_by_category
// -----------------------------------------------------------------------

#[test]
fn action_drama_scenario() {
    let (posts, index) = action_drama();
    let breakdown = summarize_by_category(&posts, &index, &categories());

    assert_eq!(breakdown.summaries.len(), 2);
    let action = &breakdown.summaries[0];
    assert_eq!(action.category_name, "Action");
    assert_eq!(action.post_count, 2);
    assert!((action.pct_positive - 50.0).abs() < 1e-9);
    assert!((action.pct_negative - 50.0).abs() < 1e-9);
    assert!(action.pct_neutral.abs() < 1e-9);
    assert!((action.avg_polarity - 0.1).abs() < 1e-9);
    assert_eq!(action.topic_count, 1);
    assert_eq!(action.reply_count, 1);
    assert_eq!(action.unique_topics, 1);

    let drama = &breakdown.summaries[1];
    assert_eq!(drama.category_name, "Drama");
    assert_eq!(drama.std_polarity, None);
}

#[test]
fn percentages_sum_to_hundred() {
    let posts: Vec<Post> = (0..7).map(|i| post(&format!("r{i}"), 1, 1, None)).collect();
    let labels = [
        SentimentLabel::Positive,
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::Negative,
    ];
    let scores = labels
        .iter()
        .enumerate()
        .map(|(i, l)| score(&format!("r{i}"), 0.0, *l))
        .collect();
    let index = SentimentIndex::build(&posts, scores).unwrap();
    let breakdown = summarize_by_category(&posts, &index, &categories());
    for s in &breakdown.summaries {
        let sum = s.pct_positive + s.pct_neutral + s.pct_negative;
        assert!((sum - 100.0).abs() < 1e-6, "{} sums to {sum}", s.category_name);
    }
}

#[test]
fn unknown_category_is_dropped_and_counted() {
    let (mut posts, _) = action_drama();
    posts.push(post("t9", 9, 42, ts(8, 9)));
    let scores = vec![
        score("t1", 0.5, SentimentLabel::Positive),
        score("r2", -0.3, SentimentLabel::Negative),
        score("t3", 0.2, SentimentLabel::Positive),
        score("t9", 0.9, SentimentLabel::Positive),
    ];
    let index = SentimentIndex::build(&posts, scores).unwrap();

    let breakdown = summarize_by_category(&posts, &index, &categories());
    assert_eq!(breakdown.unresolved, 1);
    assert_eq!(breakdown.summaries.iter().map(|s| s.post_count).sum::<usize>(), 3);

    let overall = overall_sentiment(&posts, &index).unwrap();
    assert_eq!(overall.total_posts, 4);
    assert_eq!(overall.scored_posts, 4);
}

#[test]
fn category_without_scores_is_omitted() {
    let posts = vec![post("t1", 1, 1, None), post("t2", 2, 2, None)];
    let index = SentimentIndex::build(&posts, vec![score("t1", 0.4, SentimentLabel::Positive)]).unwrap();
    let breakdown = summarize_by_category(&posts, &index, &categories());
    assert_eq!(breakdown.summaries.len(), 1);
    assert_eq!(breakdown.summaries[0].category_name, "Action");
    assert_eq!(breakdown.unscored, 1);
}

#[test]
fn aggregation_is_reproducible() {
    let (posts, index) = action_drama();
    let a = serde_json::to_string(&summarize_by_category(&posts, &index, &categories()).summaries).unwrap();
    let b = serde_json::to_string(&summarize_by_category(&posts, &index, &categories()).summaries).unwrap();
    assert_eq!(a, b);
}

// -----------------------------------------------------------------------
// summarize_by_period
// -----------------------------------------------------------------------

#[test]
fn activity_ratio_is_replies_over_topics() {
    let mut t1 = post("t1", 1, 1, ts(6, 9));
    t1.view_count = Some(100);
    let t2 = post("t2", 2, 1, ts(7, 9));
    let posts = vec![
        t1,
        t2,
        post("r1", 1, 1, ts(8, 9)),
        post("r2", 1, 1, ts(9, 9)),
        post("r3", 2, 1, ts(10, 9)),
        // Monday 2024-05-13: replies only.
        post("r4", 2, 1, ts(13, 9)),
        post("r5", 2, 1, None),
    ];

    let rows = summarize_by_period(&posts, Granularity::Week);
    assert_eq!(rows.len(), 1, "week without topics must be omitted");
    let row = &rows[0];
    assert_eq!(row.period_start, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    assert_eq!(row.topic_count, 2);
    assert_eq!(row.reply_count, 3);
    assert_eq!(row.view_count, Some(100));
    assert!((row.engagement_ratio - 1.5).abs() < 1e-12);
}

#[test]
fn activity_views_absent_when_no_topic_has_them() {
    let posts = vec![post("t1", 1, 1, ts(6, 9))];
    let rows = summarize_by_period(&posts, Granularity::Day);
    assert_eq!(rows[0].view_count, None);
    assert!(rows[0].engagement_ratio.abs() < 1e-12);
}

#[test]
fn activity_rows_sorted_by_period() {
    let posts = vec![post("t2", 2, 1, ts(20, 9)), post("t1", 1, 1, ts(2, 9))];
    let rows = summarize_by_period(&posts, Granularity::Day);
    assert!(rows[0].period_start < rows[1].period_start);
}

// -----------------------------------------------------------------------
// sentiment_by_period / compare_post_types
// -----------------------------------------------------------------------

#[test]
fn sentiment_trend_buckets_scored_posts() {
    let (posts, index) = action_drama();
    let rows = sentiment_by_period(&posts, &index, Granularity::Day);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].post_count, 2);
    assert!((rows[0].pct_positive - 50.0).abs() < 1e-9);
    assert_eq!(rows[1].post_count, 1);
    assert!((rows[1].avg_polarity - 0.2).abs() < 1e-12);
}

#[test]
fn post_types_are_compared() {
    let (posts, index) = action_drama();
    let rows = compare_post_types(&posts, &index);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].post_type, PostType::Topic);
    assert_eq!(rows[0].scored_count, 2);
    assert!((rows[0].avg_polarity - 0.35).abs() < 1e-12);
    assert_eq!(rows[1].post_type, PostType::Reply);
    assert!((rows[1].pct_negative - 100.0).abs() < 1e-9);
}
