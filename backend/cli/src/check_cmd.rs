//! `catchup check`: unmet schedule times of a job descriptor.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{info, warn};

use catchup_config::CatchupConfig;
use catchup_core::{JobDescriptor, RunWindow};
use catchup_scheduler::MissedRunCalculator;

use crate::terminal_output::{paint, BOLD, DIM, GREEN, RED, YELLOW};

/// One evaluation of the job at a given instant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<RunWindow>,
    pub missed: Vec<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn load_descriptor(path: &Path) -> Result<JobDescriptor> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job descriptor: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let job = if is_yaml {
        JobDescriptor::from_yaml(&raw)
    } else {
        JobDescriptor::from_json(&raw)
    };
    job.with_context(|| format!("Failed to decode job descriptor: {}", path.display()))
}

pub fn evaluate(
    calculator: &MissedRunCalculator,
    job: &JobDescriptor,
    instants: &[DateTime<Utc>],
) -> Vec<Evaluation> {
    instants
        .iter()
        .map(|&at| match calculator.for_job(job, at) {
            Ok(report) => Evaluation {
                at,
                window: Some(report.window),
                missed: report.missed.into_vec(),
                error: None,
            },
            Err(e) => {
                warn!(job = %job.name(), %at, error = %e, "Catch-up computation failed");
                Evaluation {
                    at,
                    window: None,
                    missed: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

pub async fn run(
    config: &CatchupConfig,
    job_path: &Path,
    mut instants: Vec<DateTime<Utc>>,
    json: bool,
) -> Result<()> {
    let job = load_descriptor(job_path).await?;
    let calculator = MissedRunCalculator::new(config.time_zone()?, config.safety_cap());
    if instants.is_empty() {
        instants.push(Utc::now());
    }
    info!(
        job = %job.name(),
        schedule = %job.spec.schedule,
        time_reference = %calculator.time_zone(),
        cap = calculator.cap().limit(),
        evaluations = instants.len(),
        "Checking job"
    );

    let evaluations = evaluate(&calculator, &job, &instants);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluations)?);
    } else {
        print_text(&job, calculator.time_zone(), &evaluations);
    }

    let failed = evaluations.iter().filter(|e| e.error.is_some()).count();
    if failed > 0 {
        bail!("{failed} of {} evaluations failed", evaluations.len());
    }
    Ok(())
}

fn print_text(job: &JobDescriptor, tz: Tz, evaluations: &[Evaluation]) {
    let local = |t: &DateTime<Utc>| t.with_timezone(&tz).to_rfc3339();

    println!(
        "{} {} ({})",
        paint(BOLD, "Job"),
        job.name(),
        paint(DIM, &job.spec.schedule)
    );
    match job.status.last_schedule_time {
        Some(t) => println!("Last schedule time: {}", local(&t)),
        None => println!(
            "Last schedule time: never (created {})",
            local(&job.metadata.creation_timestamp)
        ),
    }

    for evaluation in evaluations {
        println!("\nAs of {}", paint(BOLD, &local(&evaluation.at)));
        if let Some(error) = &evaluation.error {
            println!("  {}", paint(RED, error));
            continue;
        }
        if let Some(window) = &evaluation.window {
            println!("  Earliest time: {}", local(&window.earliest_time));
        }
        if evaluation.missed.is_empty() {
            println!("  {}", paint(GREEN, "No unmet schedules"));
        } else {
            println!("  {}", paint(YELLOW, "Unmet schedules:"));
            for t in &evaluation.missed {
                println!("    - {}", local(t));
            }
        }
    }
}
