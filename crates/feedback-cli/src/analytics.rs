//! `analytics` subcommands: fetch aggregates from the server and feed them
//! through the chart layouts.

use feedback_chart::{BarDatum, DonutDatum, DonutGeometry, layout_bars, layout_donut};
use feedback_sync::{ApiClient, SentimentDistribution, TeacherAnalytics};

use crate::display;

pub const POSITIVE_COLOR: &str = "#10b981";
pub const NEUTRAL_COLOR: &str = "#f59e0b";
pub const NEGATIVE_COLOR: &str = "#ef4444";

/// Bar extent for terminal output, in character cells.
const TERMINAL_EXTENT: f64 = 40.0;

pub async fn teacher(client: &ApiClient) -> anyhow::Result<()> {
    let analytics = client.teacher_analytics().await?;
    display::print_teacher_totals(&analytics);
    let layout = layout_bars(&performance_series(&analytics), TERMINAL_EXTENT)?;
    println!("Course performance");
    display::print_bar_chart(&layout);
    Ok(())
}

pub async fn course(client: &ApiClient, course_id: &str) -> anyhow::Result<()> {
    let analytics = client.course_analytics(course_id).await?;
    let layout = layout_donut(
        &sentiment_series(&analytics.sentiment_distribution),
        &DonutGeometry::default(),
    )?;
    display::print_course_analytics(&analytics, &layout);
    Ok(())
}

pub async fn trends(client: &ApiClient, teacher_id: &str) -> anyhow::Result<()> {
    let trends = client.trends(teacher_id).await?;
    display::print_trends(&trends);
    Ok(())
}

/// One bar per course, labelled by course code.
pub fn performance_series(analytics: &TeacherAnalytics) -> Vec<BarDatum> {
    analytics
        .courses_analytics
        .iter()
        .map(|c| {
            let label = if c.course_code.is_empty() {
                &c.course_title
            } else {
                &c.course_code
            };
            BarDatum::new(label.clone(), c.performance_score.max(0.0))
        })
        .collect()
}

pub fn sentiment_series(dist: &SentimentDistribution) -> Vec<DonutDatum> {
    vec![
        DonutDatum::new("Positive", dist.positive as f64, POSITIVE_COLOR),
        DonutDatum::new("Neutral", dist.neutral as f64, NEUTRAL_COLOR),
        DonutDatum::new("Negative", dist.negative as f64, NEGATIVE_COLOR),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_sync::CourseSummary;

    #[test]
    fn sentiment_is_positive_neutral_negative() {
        let series = sentiment_series(&SentimentDistribution {
            positive: 6,
            neutral: 3,
            negative: 1,
        });
        let labels: Vec<&str> = series.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Positive", "Neutral", "Negative"]);
        assert_eq!(series[2].color, NEGATIVE_COLOR);

        let layout = layout_donut(&series, &DonutGeometry::default()).unwrap();
        assert_eq!(layout.total, 10.0);
    }

    #[test]
    fn performance_bars_use_course_codes() {
        let analytics = TeacherAnalytics {
            courses_analytics: vec![
                CourseSummary {
                    course_code: "CS501".into(),
                    course_title: "Machine Learning".into(),
                    performance_score: 80.0,
                    ..CourseSummary::default()
                },
                CourseSummary {
                    course_title: "Seminar".into(),
                    performance_score: 40.0,
                    ..CourseSummary::default()
                },
            ],
            ..TeacherAnalytics::default()
        };
        let series = performance_series(&analytics);
        assert_eq!(series[0].label, "CS501");
        assert_eq!(series[1].label, "Seminar");

        let layout = layout_bars(&series, TERMINAL_EXTENT).unwrap();
        assert_eq!(layout.bars[1].height, 20.0);
    }
}
