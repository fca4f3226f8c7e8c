//! Sync layer: REST transport for forms and submissions, analytics payloads.

pub mod analytics;

#[cfg(feature = "http")]
pub mod http;

pub use analytics::{
    CourseAnalytics, CourseSummary, CourseTrend, Keyword, SentimentDistribution, Suggestion,
    TeacherAnalytics, TrendPoint,
};

#[cfg(feature = "http")]
pub use http::{ApiClient, ApiError};
