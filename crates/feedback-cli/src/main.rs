//! Feedback CLI
//!
//! ```bash
//! feedback form show f-1
//! feedback form fill f-1 --answers answers.json --identified
//! feedback chart donut --input sentiment.json --svg sentiment.svg
//! feedback analytics course c-1
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use feedback_chart::bar::DEFAULT_EXTENT;
use feedback_sync::ApiClient;
use tracing_subscriber::EnvFilter;

mod analytics;
mod charts;
mod display;
mod fill;

#[derive(Parser)]
#[command(name = "feedback", version, about = "Fill feedback forms and chart course analytics")]
struct Cli {
    /// API base URL
    #[arg(long, env = "FEEDBACK_API_URL", default_value = "http://localhost:5000/api")]
    api_url: String,

    /// Bearer token for authenticated endpoints
    #[arg(long, env = "FEEDBACK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or fill feedback forms
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Lay out a series from a JSON file
    Chart {
        #[command(subcommand)]
        action: ChartCommands,
    },
    /// View server-side analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// Print a form's questions
    Show { form_id: String },
    /// Answer a form and submit it
    Fill {
        form_id: String,
        /// JSON object of question id to response; prompts on stdin when absent
        #[arg(long)]
        answers: Option<PathBuf>,
        /// Submit anonymously regardless of the form default
        #[arg(long, conflicts_with = "identified")]
        anonymous: bool,
        /// Submit with identity regardless of the form default
        #[arg(long)]
        identified: bool,
    },
}

#[derive(Subcommand)]
enum ChartCommands {
    /// Proportional bars from `[{label, value}]`
    Bar {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Height of the tallest bar
        #[arg(long, default_value_t = DEFAULT_EXTENT)]
        extent: f64,
    },
    /// Proportional donut from `[{label, value, color}]`
    Donut {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AnalyticsCommands {
    /// Totals and per-course performance for the signed-in teacher
    Teacher,
    /// Sentiment, keywords and suggestions for one course
    Course { course_id: String },
    /// Average rating per period for a teacher's courses
    Trends { teacher_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(api_url = %cli.api_url, "feedback v{}", env!("CARGO_PKG_VERSION"));

    let client = {
        let client = ApiClient::new(cli.api_url);
        match cli.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    };

    match cli.command {
        Commands::Form { action } => match action {
            FormCommands::Show { form_id } => {
                let form = client.get_form(&form_id).await?;
                display::print_form_card(&form);
            }
            FormCommands::Fill {
                form_id,
                answers,
                anonymous,
                identified,
            } => {
                let anonymity = match (anonymous, identified) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                fill::run(&client, &form_id, answers.as_deref(), anonymity).await?;
            }
        },
        Commands::Chart { action } => match action {
            ChartCommands::Bar { input, svg, extent } => {
                charts::bar(&input, svg.as_deref(), extent)?;
            }
            ChartCommands::Donut { input, svg } => {
                charts::donut(&input, svg.as_deref())?;
            }
        },
        Commands::Analytics { action } => match action {
            AnalyticsCommands::Teacher => analytics::teacher(&client).await?,
            AnalyticsCommands::Course { course_id } => {
                analytics::course(&client, &course_id).await?
            }
            AnalyticsCommands::Trends { teacher_id } => {
                analytics::trends(&client, &teacher_id).await?
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn anonymity_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "feedback", "form", "fill", "f-1", "--anonymous", "--identified",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn chart_extent_defaults() {
        let cli = Cli::try_parse_from(["feedback", "chart", "bar", "--input", "bars.json"]).unwrap();
        match cli.command {
            Commands::Chart {
                action: ChartCommands::Bar { extent, svg, .. },
            } => {
                assert_eq!(extent, DEFAULT_EXTENT);
                assert!(svg.is_none());
            }
            _ => panic!("expected chart bar"),
        }
    }
}
