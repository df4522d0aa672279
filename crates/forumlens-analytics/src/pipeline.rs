//! End-to-end analytics run: load, enrich, aggregate, rank, score, emit.
//!
//! Stages run in order and the first failure halts the run. Nothing is
//! written until every computing stage has succeeded, and each file is
//! written atomically, so a failed run leaves the previous outputs intact.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use forumlens_core::{
    AnalyticsConfig, AppConfig, Category, CategoryId, Granularity, Post, SentimentLabel,
    SentimentScore,
};
use forumlens_ingest::{
    build_categories, build_posts, load_categories, load_replies, load_sentiment, load_stats,
    load_topics, AbsentReason, ForumStats, IngestError, TableKind, TableLoad,
};
use forumlens_sentiment::{
    extract_keywords, score_posts, top_keywords, KeywordCount, SentimentClassifier,
    SentimentError, SentimentIndex,
};

use crate::aggregate::{
    compare_post_types, overall_sentiment, sentiment_by_period, summarize_by_category,
    summarize_by_period, ActivityTrend, CategoryBreakdown, OverallSentiment, PostTypeSentiment,
    SentimentTrend,
};
use crate::error::AnalyticsError;
use crate::report::{CategoryKeywords, Manifest, ReportWriter, TrendReport, REPORT_FILE};
use crate::scoring::{
    build_inventory_plan, score_acquisitions, score_categories, AcquisitionRecommendation,
    CategoryRecommendation, InventoryPlan, PlanLimits,
};
use crate::summary::{build_executive_summary, ExecutiveSummary};
use crate::trending::{rank_trending, trending_titles, TrendWindow, TrendingItem};

pub const SCORES_FILE: &str = "posts_sentiment.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Sentiment,
    Aggregate,
    Trend,
    Score,
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Sentiment => "sentiment",
            Stage::Aggregate => "aggregate",
            Stage::Trend => "trend",
            Stage::Score => "score",
            Stage::Emit => "emit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Sentiment(#[from] SentimentError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// A run failure tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

fn at<E: Into<StageError>>(stage: Stage) -> impl FnOnce(E) -> PipelineError {
    move |e| PipelineError {
        stage,
        source: e.into(),
    }
}

/// Posts and lookups for one input snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub as_of: DateTime<Utc>,
    pub posts: Vec<Post>,
    pub categories: Vec<Category>,
    pub forum_stats: Option<ForumStats>,
}

/// Read and normalize the forum exports under `app.data_dir`.
///
/// Topics and categories are required. A replies export that parses but
/// holds no rows is treated as a forum without replies.
///
/// # Errors
///
/// Returns a [`Stage::Load`] error when a required table is unavailable or
/// fails validation.
pub fn load_snapshot(app: &AppConfig) -> Result<Snapshot, PipelineError> {
    let as_of = app.reference_time();
    let topics = load_topics(&app.topics_path())
        .require(TableKind::Topics)
        .map_err(at(Stage::Load))?;
    let replies = match load_replies(&app.replies_path()) {
        TableLoad::Absent(AbsentReason::Empty) => Vec::new(),
        load => load.require(TableKind::Replies).map_err(at(Stage::Load))?,
    };
    let raw_categories = load_categories(&app.categories_path())
        .require(TableKind::Categories)
        .map_err(at(Stage::Load))?;

    let build = build_posts(&topics, &replies, as_of).map_err(at(Stage::Load))?;
    let categories = build_categories(&raw_categories).map_err(at(Stage::Load))?;

    Ok(Snapshot {
        as_of,
        posts: build.posts,
        categories,
        forum_stats: load_stats(&app.stats_path()),
    })
}

/// Scores for the snapshot, and whether they were computed in this run.
#[derive(Debug, Clone)]
pub struct ResolvedScores {
    pub scores: Vec<SentimentScore>,
    pub computed: bool,
}

/// Use the configured score file if it exists, otherwise run `classifier`.
///
/// Loaded scores keep their polarity but are relabeled against the
/// configured thresholds, so both sources classify the same way.
///
/// # Errors
///
/// Returns a [`Stage::Sentiment`] error when the score file exists but is
/// unreadable, malformed or empty.
pub fn resolve_scores<C: SentimentClassifier + ?Sized>(
    app: &AppConfig,
    analytics: &AnalyticsConfig,
    posts: &[Post],
    classifier: &C,
) -> Result<ResolvedScores, PipelineError> {
    if let Some(path) = &app.sentiment_path {
        match load_sentiment(path) {
            TableLoad::Present(scores) => {
                return Ok(ResolvedScores {
                    scores: relabel(scores, analytics),
                    computed: false,
                });
            }
            TableLoad::Absent(AbsentReason::NotFound) => {
                tracing::warn!(path = %path.display(), "sentiment file not found; scoring posts");
            }
            TableLoad::Absent(reason) => {
                return Err(at(Stage::Sentiment)(IngestError::MissingInput {
                    table: TableKind::Sentiment,
                    reason,
                }));
            }
        }
    }
    Ok(ResolvedScores {
        scores: score_posts(posts, classifier, &analytics.sentiment),
        computed: true,
    })
}

fn relabel(mut scores: Vec<SentimentScore>, analytics: &AnalyticsConfig) -> Vec<SentimentScore> {
    let mut changed = 0_usize;
    for score in &mut scores {
        let label = SentimentLabel::from_polarity(score.polarity, &analytics.sentiment);
        if label != score.label {
            score.label = label;
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::warn!(
            relabeled = changed,
            positive = analytics.sentiment.positive,
            negative = analytics.sentiment.negative,
            "loaded sentiment labels disagree with thresholds; relabeled"
        );
    }
    scores
}

/// Every table one run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub as_of: DateTime<Utc>,
    pub granularity: Granularity,
    pub post_count: usize,
    /// Present when the scores were computed in this run rather than loaded.
    pub computed_scores: Option<Vec<SentimentScore>>,
    pub categories: CategoryBreakdown,
    pub activity: Vec<ActivityTrend>,
    pub sentiment_trends: Vec<SentimentTrend>,
    pub post_types: Vec<PostTypeSentiment>,
    pub overall: OverallSentiment,
    pub trending_topics: Vec<TrendingItem>,
    pub trending_titles: Vec<TrendingItem>,
    pub keywords: Vec<KeywordCount>,
    pub category_recommendations: Vec<CategoryRecommendation>,
    pub acquisitions: Vec<AcquisitionRecommendation>,
    pub category_keywords: Vec<CategoryKeywords>,
    pub inventory_plan: InventoryPlan,
    pub summary: ExecutiveSummary,
}

fn keywords_by_category(
    posts: &[Post],
    categories: &[Category],
    ranked: &[CategoryRecommendation],
    top: usize,
    per_category: usize,
) -> Vec<CategoryKeywords> {
    let names: HashMap<CategoryId, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut texts: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for post in posts {
        if let Some(&name) = names.get(&post.category_id) {
            texts.entry(name).or_default().push(post.analysis_text());
        }
    }
    ranked
        .iter()
        .take(top)
        .map(|rec| CategoryKeywords {
            category_name: rec.category_name.clone(),
            keywords: texts
                .get(rec.category_name.as_str())
                .map(|t| extract_keywords(&t.join(" "), per_category))
                .unwrap_or_default(),
        })
        .collect()
}

/// Run every computing stage without writing anything.
///
/// # Errors
///
/// Returns the first failing stage's [`PipelineError`].
pub fn analyze<C: SentimentClassifier + ?Sized>(
    app: &AppConfig,
    analytics: &AnalyticsConfig,
    classifier: &C,
) -> Result<Analysis, PipelineError> {
    let snapshot = load_snapshot(app)?;
    let posts = &snapshot.posts;

    let resolved = resolve_scores(app, analytics, posts, classifier)?;
    let computed_scores = resolved.computed.then(|| resolved.scores.clone());
    let index = SentimentIndex::build(posts, resolved.scores).map_err(at(Stage::Sentiment))?;
    tracing::info!(
        matched = index.matched(),
        unscored = index.unscored(),
        computed = computed_scores.is_some(),
        "sentiment joined"
    );

    tracing::debug!(stage = %Stage::Aggregate, "aggregating");
    let granularity = analytics.granularity;
    let categories = summarize_by_category(posts, &index, &snapshot.categories);
    let activity = summarize_by_period(posts, granularity);
    let sentiment_trends = sentiment_by_period(posts, &index, granularity);
    let post_types = compare_post_types(posts, &index);
    let overall = overall_sentiment(posts, &index)
        .ok_or(AnalyticsError::NothingScored("overall sentiment"))
        .map_err(at(Stage::Aggregate))?;

    tracing::debug!(stage = %Stage::Trend, "ranking trends");
    let window = TrendWindow::from_policy(snapshot.as_of, &analytics.trending);
    let trending_topics =
        rank_trending(posts, &index, &window, &analytics.engagement, &analytics.trending);
    let titles = trending_titles(posts, &index, &analytics.engagement, &analytics.trending);
    let texts: Vec<String> = posts.iter().map(Post::analysis_text).collect();
    let keywords = top_keywords(texts.iter().map(String::as_str), analytics.keywords.top_n);

    tracing::debug!(stage = %Stage::Score, "scoring categories and titles");
    let category_recommendations = score_categories(
        &categories.summaries,
        &analytics.category_scoring,
        &analytics.bands,
    );
    let acquisitions = score_acquisitions(&titles, &analytics.acquisition);
    let category_keywords = keywords_by_category(
        posts,
        &snapshot.categories,
        &category_recommendations,
        analytics.category_scoring.top_categories,
        analytics.keywords.per_category,
    );
    let inventory_plan = build_inventory_plan(
        &category_recommendations,
        &acquisitions,
        PlanLimits::from_config(analytics),
    );
    let summary = build_executive_summary(
        &overall,
        &category_recommendations,
        &titles,
        &acquisitions,
        analytics.category_scoring.top_categories,
        snapshot.forum_stats.clone(),
    );

    Ok(Analysis {
        as_of: snapshot.as_of,
        granularity,
        post_count: posts.len(),
        computed_scores,
        categories,
        activity,
        sentiment_trends,
        post_types,
        overall,
        trending_topics,
        trending_titles: titles,
        keywords,
        category_recommendations,
        acquisitions,
        category_keywords,
        inventory_plan,
        summary,
    })
}

/// Write every table of `analysis` into `writer`, then the manifest.
///
/// # Errors
///
/// Returns [`AnalyticsError`] on the first file that cannot be written.
pub fn emit(analysis: &Analysis, mut writer: ReportWriter) -> Result<Manifest, AnalyticsError> {
    if let Some(scores) = &analysis.computed_scores {
        writer.write_json(SCORES_FILE, scores)?;
    }
    let period = analysis.granularity;
    writer.write_json("category_summary.json", &analysis.categories.summaries)?;
    writer.write_json(&format!("activity_trends_{period}.json"), &analysis.activity)?;
    writer.write_json(&format!("sentiment_trends_{period}.json"), &analysis.sentiment_trends)?;
    writer.write_json("post_type_sentiment.json", &analysis.post_types)?;
    writer.write_json("trending_topics.json", &analysis.trending_topics)?;
    writer.write_json("trending_titles.json", &analysis.trending_titles)?;
    writer.write_json("category_recommendations.json", &analysis.category_recommendations)?;
    writer.write_json("acquisition_recommendations.json", &analysis.acquisitions)?;
    writer.write_json("top_keywords.json", &analysis.keywords)?;
    writer.write_json("inventory_plan.json", &analysis.inventory_plan)?;
    writer.write_json("executive_summary.json", &analysis.summary)?;

    let report = TrendReport {
        as_of: analysis.as_of,
        granularity: analysis.granularity,
        overall: &analysis.overall,
        categories: &analysis.category_recommendations,
        summaries: &analysis.categories.summaries,
        activity: &analysis.activity,
        sentiment_trends: &analysis.sentiment_trends,
        trending_topics: &analysis.trending_topics,
        trending_titles: &analysis.trending_titles,
        acquisitions: &analysis.acquisitions,
        keywords: &analysis.keywords,
        category_keywords: &analysis.category_keywords,
    };
    writer.write_text(REPORT_FILE, &report.to_string())?;

    writer.finish(Utc::now())
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: Uuid,
    pub output_dir: PathBuf,
    pub manifest: Manifest,
    pub analysis: Analysis,
}

/// Run all stages and write the outputs to `app.output_dir`.
///
/// # Errors
///
/// Returns a [`PipelineError`] naming the failing stage.
pub fn run_pipeline<C: SentimentClassifier + ?Sized>(
    app: &AppConfig,
    analytics: &AnalyticsConfig,
    classifier: &C,
) -> Result<PipelineOutput, PipelineError> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, data_dir = %app.data_dir.display(), "analytics run starting");

    let analysis = analyze(app, analytics, classifier)?;

    let writer = ReportWriter::new(&app.output_dir, run_id).map_err(at(Stage::Emit))?;
    let manifest = emit(&analysis, writer).map_err(at(Stage::Emit))?;

    tracing::info!(
        %run_id,
        posts = analysis.post_count,
        files = manifest.files.len(),
        output_dir = %app.output_dir.display(),
        "analytics run complete"
    );
    Ok(PipelineOutput {
        run_id,
        output_dir: app.output_dir.clone(),
        manifest,
        analysis,
    })
}

/// Score every post and write only the score table.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns a [`PipelineError`] for the load or emit stage.
pub fn run_scoring<C: SentimentClassifier + ?Sized>(
    app: &AppConfig,
    analytics: &AnalyticsConfig,
    classifier: &C,
) -> Result<PathBuf, PipelineError> {
    let snapshot = load_snapshot(app)?;
    let scores = score_posts(&snapshot.posts, classifier, &analytics.sentiment);
    let mut writer = ReportWriter::new(&app.output_dir, Uuid::new_v4()).map_err(at(Stage::Emit))?;
    let path = writer.write_json(SCORES_FILE, &scores).map_err(at(Stage::Emit))?;
    tracing::info!(posts = scores.len(), path = %path.display(), "post scores written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_names_the_stage() {
        let err = at(Stage::Aggregate)(AnalyticsError::NothingScored("overall sentiment"));
        assert_eq!(
            err.to_string(),
            "aggregate stage failed: no scored posts to aggregate for overall sentiment"
        );
        assert_eq!(err.stage, Stage::Aggregate);
    }

    #[test]
    fn keywords_follow_category_rank() {
        let posts = vec![Post {
            id: "t1".to_string(),
            topic_id: 1,
            author: "a".to_string(),
            content: "remaster remaster grain".to_string(),
            created_at: None,
            is_topic: true,
            category_id: 2,
            title: None,
            view_count: None,
        }];
        let categories = vec![
            Category {
                id: 1,
                name: "Drama".to_string(),
            },
            Category {
                id: 2,
                name: "Horror".to_string(),
            },
        ];
        let band = crate::scoring::RecommendationBand::Maintain;
        let rec = |name: &str, rank| CategoryRecommendation {
            category_name: name.to_string(),
            engagement_score: 0.5,
            rank,
            sentiment: 0.0,
            post_count: 1,
            replies_per_topic: 0.0,
            recommendation: band,
            inventory_action: band.inventory_action().to_string(),
            rationale: band.rationale().to_string(),
        };
        let ranked = vec![rec("Horror", 1), rec("Drama", 2)];

        let kws = keywords_by_category(&posts, &categories, &ranked, 3, 5);
        assert_eq!(kws[0].category_name, "Horror");
        assert_eq!(kws[0].keywords, ["remaster", "grain"]);
        assert!(kws[1].keywords.is_empty());
    }
}
