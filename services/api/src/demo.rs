use crate::commands::render_session;
use crate::infra::{load_config, load_service, ArtifactArgs};
use clap::Args;
use study_advisor::advisor::record::Answer;
use study_advisor::advisor::{FieldName, PredictionSession, RawFields, RawValue, StudentRecord};
use study_advisor::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
    /// Skip the rejected-form step of the walkthrough.
    #[arg(long)]
    pub(crate) skip_invalid: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        artifacts,
        skip_invalid,
    } = args;

    let config = load_config(artifacts)?;
    let service = load_service(&config)?;
    let mut session = PredictionSession::new();

    println!("Study advisor demo");
    println!(
        "Artifacts: {} + {}",
        config.artifacts.preprocessor.display(),
        config.artifacts.model.display()
    );

    for (title, record) in demo_students() {
        println!("\n{title}");
        service.predict_into(&mut session, &record.to_raw())?;
        render_session(&session);
    }

    if skip_invalid {
        return Ok(());
    }

    println!("\nForm with attendance below the allowed range");
    let mut form: RawFields = StudentRecord::default().to_raw();
    form.insert(FieldName::Attendance.to_string(), RawValue::Integer(45));
    match service.predict_into(&mut session, &form) {
        Ok(_) => println!("  Unexpectedly accepted"),
        Err(err) => println!("  Rejected: {err}"),
    }
    println!("Session still holds the previous result:");
    render_session(&session);

    Ok(())
}

fn demo_students() -> Vec<(&'static str, StudentRecord)> {
    let baseline = StudentRecord::default();
    let committed = StudentRecord {
        hours_studied: 36,
        attendance: 97,
        sleep_hours: 8.0,
        tutoring_sessions: 3,
        extracurricular_activities: Answer::No,
        previous_scores: 68,
        ..StudentRecord::default()
    };
    let stretched = StudentRecord {
        hours_studied: 8,
        attendance: 72,
        sleep_hours: 5.5,
        tutoring_sessions: 0,
        previous_scores: 82,
        ..StudentRecord::default()
    };

    vec![
        ("Form defaults", baseline),
        ("Committed student returning from a weak term", committed),
        ("Strong past results, thin current habits", stretched),
    ]
}
