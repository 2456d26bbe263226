use crate::infra::seed_demo_submissions;
use clap::Args;
use std::sync::Arc;

use insureflow::error::AppError;
use insureflow::workflows::submissions::{
    InMemorySubmissionRepository, RecordingDispatcher, SubmissionWorkflowService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the dashboard snapshot as JSON instead of formatted text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let dispatcher = RecordingDispatcher::default();
    let service = SubmissionWorkflowService::new(repository, Arc::new(dispatcher.clone()));

    seed_demo_submissions(&service)?;
    let snapshot = service.dashboard()?;

    if args.json {
        let body = serde_json::to_string_pretty(&snapshot).expect("snapshot serializes");
        println!("{body}");
        return Ok(());
    }

    println!("InsureFlow pipeline demo");

    println!("\nSummary");
    let stats = &snapshot.stats;
    println!("- Total submissions: {}", stats.total_submissions);
    println!("- Missing information: {}", stats.missing_information);
    println!("- Completed extractions: {}", stats.completed_extractions);
    println!("- Duplicates found: {}", stats.duplicate_submissions);
    println!("- Unique submissions: {}", stats.unique_submissions);
    println!("- Compliant: {}", stats.compliant_submissions);
    println!("- Non-compliant: {}", stats.non_compliant_submissions);
    println!("- Proceed to quote: {}", stats.proceed_to_quote);
    println!("- Survey recommended: {}", stats.survey_recommended);
    println!("- Rejected at rank: {}", stats.rejected);
    println!("- Rejected after sign-off: {}", stats.rejected_submissions);

    println!("\nWorkflow distribution");
    for entry in &snapshot.distribution {
        println!("- {}: {}", entry.name, entry.value);
    }

    if snapshot.pending_actions.is_empty() {
        println!("\nPending actions: none");
    } else {
        println!("\nPending actions");
        for action in &snapshot.pending_actions {
            println!(
                "- [{}] {}: {} ({})",
                action.priority.label(),
                action.title,
                action.description,
                action.stage
            );
        }
    }

    println!("\nRecent submissions");
    for submission in &snapshot.recent {
        println!(
            "- {} | {} | {} | {} | {}",
            submission.reference,
            submission.client,
            submission.submission_date,
            submission.stage,
            submission.status
        );
    }

    let sent = dispatcher.sent();
    println!("\nCommunications dispatched: {}", sent.len());
    for (id, body) in &sent {
        let subject = body.lines().next().unwrap_or_default();
        println!("- {id}: {subject}");
    }

    Ok(())
}
