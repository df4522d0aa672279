//! Aggregation, trend ranking, scoring and report emission for forumlens.
//!
//! [`pipeline::run_pipeline`] wires the stages together; the modules below
//! are usable on their own for ad-hoc analysis.

pub mod aggregate;
pub mod error;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod stats;
pub mod summary;
pub mod titles;
pub mod trending;

pub use aggregate::{
    compare_post_types, overall_sentiment, sentiment_by_period, summarize_by_category,
    summarize_by_period, ActivityTrend, CategoryBreakdown, CategorySummary, OverallSentiment,
    PostType, PostTypeSentiment, SentimentTrend,
};
pub use error::AnalyticsError;
pub use period::bucket_start;
pub use pipeline::{
    analyze, emit, load_snapshot, resolve_scores, run_pipeline, run_scoring, Analysis,
    PipelineError, PipelineOutput, ResolvedScores, Snapshot, Stage, StageError, SCORES_FILE,
};
pub use report::{CategoryKeywords, Manifest, ManifestEntry, ReportWriter, TrendReport};
pub use scoring::{
    build_inventory_plan, score_acquisitions, score_categories, AcquisitionRecommendation,
    CategoryRecommendation, InventoryPlan, PlanLimits, RecommendationBand,
};
pub use stats::{PolarityStats, SentimentMix};
pub use summary::{build_executive_summary, ExecutiveSummary};
pub use titles::extract_titles;
pub use trending::{engagement_score, rank_trending, trending_titles, TrendWindow, TrendingItem};
