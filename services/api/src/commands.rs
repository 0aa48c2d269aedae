use crate::infra::{load_config, load_service, read_form, ArtifactArgs};
use chrono::Local;
use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use study_advisor::advisor::{score_csv, BatchReport, PredictionSession, StudentRecord};
use study_advisor::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file holding one object of field values (repeatable)
    #[arg(long = "input", required = true)]
    pub(crate) inputs: Vec<PathBuf>,
    /// Print the stored session entry as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export whose header names every input field
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Write per-row results here instead of stdout
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FieldsArgs {
    /// Print the catalogue as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        inputs,
        json,
        artifacts,
    } = args;

    let config = load_config(artifacts)?;
    let service = load_service(&config)?;
    let mut session = PredictionSession::new();
    let mut rejected = 0;

    for path in &inputs {
        println!("== {}", path.display());
        let attempt = read_form(path).and_then(|raw| {
            service
                .predict_into(&mut session, &raw)
                .map(|_| ())
                .map_err(AppError::from)
        });
        if let Err(err) = attempt {
            rejected += 1;
            println!("Rejected: {err}");
        }

        if json {
            print_json(&session.last())?;
        } else {
            render_session(&session);
        }
    }

    if rejected > 0 {
        println!("\n{rejected} of {} inputs rejected", inputs.len());
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        csv,
        out,
        artifacts,
    } = args;

    let config = load_config(artifacts)?;
    let service = load_service(&config)?;
    let report = score_csv(File::open(&csv)?, service.as_ref())?;

    match out {
        Some(path) => {
            report.write_csv(File::create(&path)?)?;
            println!("Wrote {} rows to {}", report.rows.len(), path.display());
        }
        None => report.write_csv(io::stdout().lock())?,
    }
    print_batch_summary(&report);
    Ok(())
}

pub(crate) fn run_fields(args: FieldsArgs) -> Result<(), AppError> {
    let catalogue = StudentRecord::catalogue();
    if args.json {
        return print_json(&catalogue);
    }

    println!("Input fields");
    for spec in catalogue {
        println!(
            "- {:<28} {} (default {})",
            spec.name.as_str(),
            spec.domain.describe(),
            spec.default
        );
    }
    Ok(())
}

pub(crate) fn render_session(session: &PredictionSession) {
    let Some(entry) = session.last() else {
        println!("No prediction yet");
        return;
    };

    println!(
        "Predicted exam score: {} (previous {}, at {})",
        entry.prediction.display(),
        entry.record.previous_scores,
        entry
            .predicted_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    for message in &entry.feedback {
        println!("  [{}] {}", message.tone, message);
    }
}

fn print_batch_summary(report: &BatchReport) {
    eprintln!(
        "Scored {} rows, {} failed",
        report.scored(),
        report.failed()
    );
    if let Some(mae) = report.mean_absolute_error() {
        eprintln!("Mean absolute error against Exam_Score: {mae:.2}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}
