//! Command workflows: plan a tour end to end, check an execution, render a
//! saved itinerary.
//!
//! Progress goes to the tracing log on stderr; stdout carries the itinerary
//! and command results.
use crate::config::Settings;
use crate::julep::task::{self, ToolKeys, AGENT_ABOUT, AGENT_NAME};
use crate::julep::{Execution, JulepClient};
use crate::poll::{wait_for_execution, PollConfig, PollOutcome, SystemClock};
use crate::render::{render_itinerary, RenderSummary};
use crate::util::write_atomic;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Local path and upload name for the rendered itinerary.
pub const DEFAULT_PDF_NAME: &str = "foodie_tour.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

const BANNER_WIDTH: usize = 60;

/// Everything `plan` needs beyond the environment settings.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub locations: Vec<String>,
    /// Where to write the PDF; `None` skips rendering.
    pub pdf_path: Option<PathBuf>,
    /// Name the PDF is stored under remotely; `None` skips the upload.
    pub upload_as: Option<String>,
    pub title: String,
    pub poll: PollConfig,
}

/// Create the agent and task, run the execution and deliver the itinerary.
pub fn run_plan(settings: &Settings, request: &PlanRequest) -> Result<()> {
    if request.locations.is_empty() {
        return Err(anyhow!("at least one location is required"));
    }
    let client = JulepClient::from_settings(settings);

    let agent = client
        .create_agent(AGENT_NAME, &settings.model, AGENT_ABOUT)
        .context("create foodie tour agent")?;
    tracing::info!(agent_id = %agent.id, model = %settings.model, "agent created");

    let definition = task::foodie_tour_task(ToolKeys {
        weather: &settings.weather_api_key,
        search: &settings.search_api_key,
    })?;
    let created = client
        .create_task(&agent.id, &definition)
        .context("create foodie tour task")?;
    tracing::info!(task_id = %created.id, "task created");

    let input = task::execution_input(&request.locations);
    let execution = client
        .create_execution(&created.id, &input)
        .context("start execution")?;
    tracing::info!(
        execution_id = %execution.id,
        locations = %request.locations.join(", "),
        "execution started"
    );

    let mut clock = SystemClock::start();
    let outcome = wait_for_execution(&client, &execution.id, request.poll, &mut clock)?;
    match outcome {
        PollOutcome::Succeeded(execution) => deliver(&client, &execution, request),
        PollOutcome::Failed(execution) => {
            print_failure(&execution);
            Err(anyhow!("execution {} {}", execution.id, execution.status))
        }
        PollOutcome::TimedOut(execution) => {
            print_failure(&execution);
            Err(anyhow!(
                "execution {} still {} after {}s",
                execution.id,
                execution.status,
                request.poll.timeout.as_secs()
            ))
        }
    }
}

fn deliver(client: &JulepClient, execution: &Execution, request: &PlanRequest) -> Result<()> {
    let Some(itinerary) = execution.itinerary() else {
        let output = pretty_output(execution);
        println!("Full output: {output}");
        return Ok(());
    };
    print_banner("FINAL RESULT:");
    println!("{itinerary}");

    let Some(pdf_path) = request.pdf_path.as_deref() else {
        return Ok(());
    };
    let (pdf, summary) = render_to_file(itinerary, &request.title, pdf_path)?;
    println!(
        "Wrote {} ({} pages, {} sections)",
        pdf_path.display(),
        summary.pages,
        summary.sections
    );

    if let Some(name) = request.upload_as.as_deref() {
        let file = client
            .upload_file(name, &pdf, PDF_MIME_TYPE)
            .with_context(|| format!("upload {}", pdf_path.display()))?;
        tracing::info!(file_id = %file.id, bytes = pdf.len(), "itinerary uploaded");
        println!("Uploaded {name} as file {}", file.id);
    }
    Ok(())
}

/// Fetch one execution and print its status, error and output.
pub fn run_status(settings: &Settings, execution_id: &str, json: bool) -> Result<()> {
    let client = JulepClient::from_settings(settings);
    let execution = client.get_execution(execution_id)?;
    if json {
        let text = serde_json::to_string_pretty(&execution).context("serialize execution")?;
        println!("{text}");
        return Ok(());
    }
    println!("Execution {}: {}", execution.id, execution.status);
    if let Some(error) = execution.error.as_deref() {
        println!("Error details: {error}");
    }
    if let Some(itinerary) = execution.itinerary() {
        print_banner("FINAL RESULT:");
        println!("{itinerary}");
    } else if execution.output.is_some() {
        println!("Output: {}", pretty_output(&execution));
    }
    Ok(())
}

/// Render a saved itinerary text file to PDF.
pub fn run_render(input: &Path, out: &Path, title: &str, json: bool) -> Result<RenderSummary> {
    let text = std::fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let text = String::from_utf8_lossy(&text);
    let (_, summary) = render_to_file(&text, title, out)?;
    if json {
        let text = serde_json::to_string_pretty(&summary).context("serialize render summary")?;
        println!("{text}");
    } else {
        println!(
            "Wrote {} ({} pages, {} sections, {} rows)",
            out.display(),
            summary.pages,
            summary.sections,
            summary.rows
        );
    }
    Ok(summary)
}

fn render_to_file(itinerary: &str, title: &str, path: &Path) -> Result<(Vec<u8>, RenderSummary)> {
    let rendered = render_itinerary(itinerary, title).context("render itinerary PDF")?;
    write_atomic(path, &rendered.pdf)?;
    tracing::info!(
        path = %path.display(),
        pages = rendered.summary.pages,
        bytes = rendered.summary.bytes,
        "itinerary PDF written"
    );
    Ok((rendered.pdf, rendered.summary))
}

fn print_failure(execution: &Execution) {
    println!("Execution {} ended as {}.", execution.id, execution.status);
    if let Some(error) = execution.error.as_deref() {
        println!("Error details: {error}");
    }
    if execution.output.is_some() {
        println!("Partial output: {}", pretty_output(execution));
    }
}

fn pretty_output(execution: &Execution) -> String {
    execution
        .output
        .as_ref()
        .and_then(|output| serde_json::to_string_pretty(output).ok())
        .unwrap_or_else(|| "null".to_string())
}

fn print_banner(title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}");
    println!("{title}");
    println!("{rule}");
}
