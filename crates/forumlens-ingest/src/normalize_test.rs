use chrono::TimeZone;

use super::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

fn topic(id: i64, category: i64, date: &str) -> RawTopic {
    RawTopic {
        id,
        title: Some(format!("Topic {id}")),
        author: Some("cinephile".to_owned()),
        date: Some(date.to_owned()),
        content: Some("Which edition should I buy?".to_owned()),
        category,
        replies: Some(2),
        views: Some(40),
    }
}

fn reply(id: i64, topic_id: Option<i64>, date: &str) -> RawReply {
    RawReply {
        id,
        topic_id,
        author: Some("collector".to_owned()),
        date: Some(date.to_owned()),
        content: Some("The steelbook, easily.".to_owned()),
    }
}

// -----------------------------------------------------------------------
// build_posts
// -----------------------------------------------------------------------

#[test]
fn topics_are_followed_by_their_replies() {
    let topics = vec![topic(1, 7, "1 day ago"), topic(2, 8, "2 days ago")];
    let replies = vec![
        reply(10, Some(2), "1 hour ago"),
        reply(11, Some(1), "3 hours ago"),
        reply(12, Some(2), "2 hours ago"),
    ];
    let built = build_posts(&topics, &replies, now()).unwrap();
    let ids: Vec<&str> = built.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["t1", "r11", "t2", "r10", "r12"]);
    assert_eq!(built.orphan_replies, 0);
}

#[test]
fn replies_inherit_topic_category_and_carry_no_title() {
    let built = build_posts(&[topic(1, 7, "1 day ago")], &[reply(10, Some(1), "1 hour ago")], now()).unwrap();
    let r = &built.posts[1];
    assert!(!r.is_topic);
    assert_eq!(r.category_id, 7);
    assert!(r.title.is_none());
    assert!(r.view_count.is_none());

    let t = &built.posts[0];
    assert!(t.is_topic);
    assert_eq!(t.title.as_deref(), Some("Topic 1"));
    assert_eq!(t.view_count, Some(40));
}

#[test]
fn orphan_replies_are_dropped_and_counted() {
    let built = build_posts(
        &[topic(1, 7, "1 day ago")],
        &[reply(10, Some(99), "1 hour ago"), reply(11, None, "1 hour ago")],
        now(),
    )
    .unwrap();
    assert_eq!(built.posts.len(), 1);
    assert_eq!(built.orphan_replies, 2);
}

#[test]
fn unrecognized_dates_stay_null() {
    let built = build_posts(&[topic(1, 7, "sometime last spring")], &[], now()).unwrap();
    assert!(built.posts[0].created_at.is_none());
    assert_eq!(built.undated, 1);
}

#[test]
fn relative_dates_resolve_against_now() {
    let built = build_posts(&[topic(1, 7, "2 hours ago")], &[], now()).unwrap();
    assert_eq!(
        built.posts[0].created_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap())
    );
}

#[test]
fn duplicate_topic_ids_fail() {
    let err = build_posts(&[topic(1, 7, "1 day ago"), topic(1, 8, "1 day ago")], &[], now())
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation {
            table: TableKind::Topics,
            ..
        }
    ));
}

#[test]
fn duplicate_reply_ids_fail() {
    let err = build_posts(
        &[topic(1, 7, "1 day ago")],
        &[reply(10, Some(1), "1 hour ago"), reply(10, Some(1), "2 hours ago")],
        now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation {
            table: TableKind::Replies,
            ..
        }
    ));
}

#[test]
fn blank_topic_title_becomes_none() {
    let mut t = topic(1, 7, "1 day ago");
    t.title = Some("   ".to_owned());
    let built = build_posts(&[t], &[], now()).unwrap();
    assert!(built.posts[0].title.is_none());
}

// -----------------------------------------------------------------------
// build_categories
// -----------------------------------------------------------------------

#[test]
fn categories_trim_names() {
    let raw = vec![RawCategory {
        id: 1,
        name: "  Classic Films ".to_owned(),
    }];
    let categories = build_categories(&raw).unwrap();
    assert_eq!(categories[0].name, "Classic Films");
}

#[test]
fn duplicate_category_ids_fail() {
    let raw = vec![
        RawCategory {
            id: 1,
            name: "Action".to_owned(),
        },
        RawCategory {
            id: 1,
            name: "Drama".to_owned(),
        },
    ];
    let err = build_categories(&raw).unwrap_err();
    assert!(
        matches!(err, IngestError::Validation { ref reason, .. } if reason.contains("duplicate category id 1"))
    );
}

#[test]
fn blank_category_name_fails() {
    let raw = vec![RawCategory {
        id: 3,
        name: " ".to_owned(),
    }];
    assert!(build_categories(&raw).is_err());
}
