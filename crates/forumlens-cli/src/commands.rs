//! Command handlers.

use anyhow::Context;

use forumlens_analytics::{analyze, run_pipeline, run_scoring};
use forumlens_core::{load_analytics_config, AnalyticsConfig, AppConfig, Granularity};
use forumlens_sentiment::LexiconClassifier;

/// Analytics settings from `FORUMLENS_ANALYTICS_CONFIG`, or the defaults.
pub(crate) fn load_analytics(app: &AppConfig) -> anyhow::Result<AnalyticsConfig> {
    match &app.analytics_config_path {
        Some(path) => load_analytics_config(path)
            .with_context(|| format!("loading analytics config from {}", path.display())),
        None => Ok(AnalyticsConfig::default()),
    }
}

/// Apply command-line overrides and re-validate.
pub(crate) fn apply_overrides(
    analytics: &mut AnalyticsConfig,
    period: Option<Granularity>,
    window_days: Option<u32>,
    top_n: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(period) = period {
        analytics.granularity = period;
    }
    if let Some(days) = window_days {
        analytics.trending.window_days = days;
    }
    if let Some(n) = top_n {
        analytics.trending.top_n = n;
    }
    analytics.validate().context("invalid command-line override")?;
    Ok(())
}

pub(crate) fn run(app: &AppConfig, analytics: &AnalyticsConfig) -> anyhow::Result<()> {
    let output = run_pipeline(app, analytics, &LexiconClassifier)?;
    let summary = &output.analysis.summary.overview;
    println!(
        "analyzed {} posts ({} scored), wrote {} files to {}",
        summary.total_posts_analyzed,
        summary.scored_posts,
        output.manifest.files.len(),
        output.output_dir.display()
    );
    println!("run id: {}", output.run_id);
    Ok(())
}

pub(crate) fn score(app: &AppConfig, analytics: &AnalyticsConfig) -> anyhow::Result<()> {
    let path = run_scoring(app, analytics, &LexiconClassifier)?;
    println!("wrote {}", path.display());
    Ok(())
}

pub(crate) fn trends(app: &AppConfig, analytics: &AnalyticsConfig) -> anyhow::Result<()> {
    let analysis = analyze(app, analytics, &LexiconClassifier)?;

    println!("activity by {}:", analysis.granularity);
    for row in &analysis.activity {
        println!(
            "  {}  topics={:<4} replies={:<5} ratio={:.2}",
            row.period_start, row.topic_count, row.reply_count, row.engagement_ratio
        );
    }

    println!("trending topics (last {} days):", analytics.trending.window_days);
    if analysis.trending_topics.is_empty() {
        println!("  none");
    }
    for (i, item) in analysis.trending_topics.iter().enumerate() {
        println!(
            "  {:>2}. {} (mentions={}, engagement={:.1})",
            i + 1,
            item.name,
            item.mention_count,
            item.engagement_score
        );
    }
    Ok(())
}

pub(crate) fn insights(app: &AppConfig, analytics: &AnalyticsConfig) -> anyhow::Result<()> {
    let analysis = analyze(app, analytics, &LexiconClassifier)?;
    println!("{}", serde_json::to_string_pretty(&analysis.summary)?);
    Ok(())
}
