//! CLI argument parsing for the foodie tour planner.
//!
//! The CLI stays thin: it resolves flags into requests and hands them to the
//! workflows in `tour`.
use crate::julep::task::DEFAULT_LOCATIONS;
use crate::render::DEFAULT_TITLE;
use crate::poll::PollConfig;
use crate::tour::{PlanRequest, DEFAULT_PDF_NAME};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "foodie",
    version,
    about = "Weather-aware foodie tour planner",
    after_help = "Environment:\n  JULEP_API_KEY            API key for the workflow service (required for plan/status)\n  JULEP_ENVIRONMENT        production (default) or dev\n  JULEP_BASE_URL           Override the service base URL\n  JULEP_MODEL              Agent model (default claude-3.5-sonnet)\n  OPENWEATHERMAP_API_KEY   Key for the weather tool\n  BRAVE_API_KEY            Key for the search tool\n\nExamples:\n  foodie plan --location Mumbai --location Paris\n  foodie plan --location Tokyo --pdf tokyo.pdf --upload\n  foodie status --execution <id>\n  foodie render --input itinerary.txt --out itinerary.pdf",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Plan(PlanArgs),
    Status(StatusArgs),
    Render(RenderArgs),
}

/// Plan command inputs.
#[derive(Parser, Debug)]
#[command(about = "Generate a foodie tour itinerary and render it to PDF")]
pub struct PlanArgs {
    /// City to plan for; repeat for several (default: Mumbai, Paris)
    #[arg(long = "location", value_name = "CITY")]
    pub locations: Vec<String>,

    /// Output path for the rendered PDF
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PDF_NAME)]
    pub pdf: PathBuf,

    /// Print the itinerary only; skip PDF rendering
    #[arg(long, conflicts_with = "upload")]
    pub no_pdf: bool,

    /// Upload the rendered PDF to the service's file store as foodie_tour.pdf
    #[arg(long)]
    pub upload: bool,

    /// Title printed in each page header
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Give up waiting for the execution after this many seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Seconds between status checks
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,
}

impl PlanArgs {
    pub fn resolved_locations(&self) -> Vec<String> {
        if self.locations.is_empty() {
            return DEFAULT_LOCATIONS.iter().map(|city| city.to_string()).collect();
        }
        self.locations.clone()
    }

    /// Resolve flags into a plan request. Uploads always use the fixed remote
    /// name, whatever the local `--pdf` path is.
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            locations: self.resolved_locations(),
            pdf_path: (!self.no_pdf).then(|| self.pdf.clone()),
            upload_as: self.upload.then(|| DEFAULT_PDF_NAME.to_string()),
            title: self.title.clone(),
            poll: PollConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                interval: Duration::from_secs(self.interval_secs),
            },
        }
    }
}

/// Status command inputs.
#[derive(Parser, Debug)]
#[command(about = "Show the status and output of an execution")]
pub struct StatusArgs {
    /// Execution id returned by `plan`
    #[arg(long, value_name = "ID")]
    pub execution: String,

    /// Emit the raw execution as JSON
    #[arg(long)]
    pub json: bool,
}

/// Render command inputs.
#[derive(Parser, Debug)]
#[command(about = "Render a saved itinerary text file to PDF")]
pub struct RenderArgs {
    /// Itinerary text, sections separated by a line of 15 dashes
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output path for the PDF
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PDF_NAME)]
    pub out: PathBuf,

    /// Title printed in each page header
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Emit the render summary as JSON
    #[arg(long)]
    pub json: bool,
}
