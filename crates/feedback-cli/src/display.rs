//! Terminal rendering for forms, chart layouts and analytics.

use feedback_chart::progress;
use feedback_chart::{BarLayout, DonutLayout, format_number};
use feedback_core::{Form, QuestionKind, SubmitReceipt};
use feedback_sync::{CourseAnalytics, CourseTrend, TeacherAnalytics};

const FULL: char = '█';
const EMPTY: char = '░';
const TREND_WIDTH: usize = 20;
/// Cells for a full-height bar in the terminal, whatever the layout extent.
pub const BAR_WIDTH: usize = 40;
const MAX_KEYWORDS: usize = 10;

// ── Forms ──

/// Print a form as a card: header, then one numbered block per question.
pub fn print_form_card(form: &Form) {
    println!("=== {} ===", form.title());
    if let Some(description) = form.description() {
        println!("{description}");
    }
    println!(
        "  {:<26} {}",
        "anonymous by default",
        if form.is_anonymous_default() { "yes" } else { "no" }
    );
    println!();

    for (i, q) in form.questions().iter().enumerate() {
        let badge = q.question_type().label();
        println!("{}", question_heading(i + 1, q.prompt(), q.is_required(), badge));
        match q.kind() {
            QuestionKind::Rating => println!("     1 to 5 stars"),
            QuestionKind::Scale(opts) => println!(
                "     {} ({}) .. {} ({})",
                opts.min,
                opts.low_caption(),
                opts.max,
                opts.high_caption()
            ),
            QuestionKind::MultipleChoice(choices) => {
                for (n, choice) in choices.iter().enumerate() {
                    println!("     {}. {}", n + 1, choice);
                }
            }
            QuestionKind::YesNo => println!("     yes / no"),
            QuestionKind::Text => {}
        }
    }
    println!();
}

pub fn question_heading(number: usize, prompt: &str, required: bool, badge: &str) -> String {
    let marker = if required { " *" } else { "" };
    format!("{number:>2}. {prompt}{marker}  [{badge}]")
}

pub fn print_receipt(form: &Form, receipt: &SubmitReceipt) {
    println!("Feedback submitted for \"{}\"", form.title());
    if let Some(id) = &receipt.id {
        println!("  {:<26} {}", "response id", id);
    }
    println!(
        "  {:<26} {}",
        "submitted at",
        receipt
            .submitted_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
}

// ── Charts ──

/// One row per bar, scaled so the tallest bar is [`BAR_WIDTH`] cells.
pub fn print_bar_chart(layout: &BarLayout) {
    if layout.bars.is_empty() {
        println!("  (no data)");
        return;
    }
    let label_width = layout
        .bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    for bar in &layout.bars {
        println!(
            "  {:<width$}  {}  {:>8}  opacity {:.2}",
            bar.label,
            bar_cells(bar.fraction),
            format_number(bar.value),
            bar.opacity,
            width = label_width,
        );
    }
}

pub fn print_donut_legend(layout: &DonutLayout) {
    for s in &layout.segments {
        println!(
            "  ● {:<12} {:>8}  {:>6.1}%  {}",
            s.label,
            format_number(s.value),
            s.fraction * 100.0,
            s.color
        );
    }
    println!("  {:<14} {:>8}", "total", format_number(layout.total));
}

/// A [`BAR_WIDTH`]-cell meter for a bar fraction.
pub fn bar_cells(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    meter(filled, BAR_WIDTH - filled.min(BAR_WIDTH))
}

/// `filled` full cells followed by `empty` empty cells.
pub fn meter(filled: usize, empty: usize) -> String {
    let cells = filled.saturating_add(empty);
    let mut s = String::with_capacity(cells.saturating_mul(FULL.len_utf8()));
    s.extend(std::iter::repeat_n(FULL, filled));
    s.extend(std::iter::repeat_n(EMPTY, empty));
    s
}

/// A fixed-width progress bar for `value / max`.
pub fn progress_bar(value: f64, max: f64, width: usize) -> String {
    let filled = (progress::fraction(value, max) * width as f64).round() as usize;
    meter(filled.min(width), width - filled.min(width))
}

// ── Analytics ──

pub fn print_teacher_totals(analytics: &TeacherAnalytics) {
    println!("=== Teaching overview ===");
    println!("  {:<26} {}", "courses", analytics.total_courses);
    println!("  {:<26} {}", "students", analytics.total_students);
    println!("  {:<26} {}", "feedback responses", analytics.total_feedback);
    println!(
        "  {:<26} {}%",
        "average performance",
        format_number(analytics.avg_performance)
    );
    println!();
}

pub fn print_course_analytics(analytics: &CourseAnalytics, sentiment: &DonutLayout) {
    println!("=== Course {} ===", analytics.course_id);
    println!(
        "  {:<26} {} / {}",
        "responses", analytics.response_count, analytics.enrolled_count
    );
    println!("  {:<26} {}", "average rating", format_number(analytics.avg_rating));
    println!(
        "  {:<26} {}%",
        "performance score",
        format_number(analytics.performance_score)
    );
    println!();

    println!("Sentiment");
    print_donut_legend(sentiment);
    println!();

    if !analytics.summary.is_empty() {
        println!("Summary");
        println!("  {}", analytics.summary);
        println!();
    }

    if !analytics.keywords.is_empty() {
        println!("Keywords");
        let shown: Vec<String> = analytics
            .keywords
            .iter()
            .take(MAX_KEYWORDS)
            .map(|k| format!("{} ({})", k.keyword, k.count))
            .collect();
        println!("  {}", shown.join(", "));
        if analytics.keywords.len() > MAX_KEYWORDS {
            println!("  ... and {} more", analytics.keywords.len() - MAX_KEYWORDS);
        }
        println!();
    }

    if !analytics.suggestions.is_empty() {
        println!("Suggestions");
        for s in &analytics.suggestions {
            println!("  [{:<6}] {:<14} {}", s.priority, s.category, s.suggestion);
        }
        println!();
    }
}

pub fn print_trends(trends: &[CourseTrend]) {
    if trends.is_empty() {
        println!("No trend data.");
        return;
    }
    for course in trends {
        println!("{} ({})", course.course, course.code);
        for point in &course.data {
            println!(
                "  {:<14} {}  {}/5  ({} responses)",
                point.period,
                progress_bar(point.avg_rating, 5.0, TREND_WIDTH),
                format_number(point.avg_rating),
                point.count
            );
        }
        println!();
    }
}
