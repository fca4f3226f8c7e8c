//! Aggregate analytics payloads computed by the server.
//!
//! These are read-only inputs for the chart primitives; nothing here is
//! computed locally.

use serde::{Deserialize, Serialize};

/// `GET /teacher/analytics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeacherAnalytics {
    pub total_courses: u64,
    pub total_students: u64,
    pub total_feedback: u64,
    pub avg_performance: f64,
    pub courses_analytics: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSummary {
    pub course_id: String,
    pub course_title: String,
    pub course_code: String,
    pub enrolled: u64,
    pub feedback_count: u64,
    pub performance_score: f64,
    pub avg_rating: f64,
}

/// `GET /courses/{id}/analytics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseAnalytics {
    pub course_id: String,
    pub enrolled_count: u64,
    pub response_count: u64,
    pub avg_rating: f64,
    pub performance_score: f64,
    pub sentiment_distribution: SentimentDistribution,
    pub keywords: Vec<Keyword>,
    pub summary: String,
    pub suggestions: Vec<Suggestion>,
    pub total_feedback: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// `high`, `medium` or `low`.
    pub priority: String,
    pub category: String,
    pub suggestion: String,
}

/// One entry of `GET /trends/{teacher_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseTrend {
    pub course: String,
    pub code: String,
    pub data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub avg_rating: f64,
    pub count: u64,
}
