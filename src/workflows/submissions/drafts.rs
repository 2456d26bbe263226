//! Static communication drafts attached once a submission ranks. A real
//! text-generation service would slot in here; the templates mirror the
//! letters underwriting sends today.

use super::domain::{RankStatus, Submission};

pub fn draft_for(submission: &Submission, status: RankStatus) -> Option<String> {
    match status {
        RankStatus::Proceed => Some(quotation_draft(submission)),
        RankStatus::Survey => Some(survey_draft(submission)),
        RankStatus::Reject => Some(rejection_draft(submission)),
        RankStatus::Evaluating => None,
    }
}

fn premium_line(submission: &Submission) -> String {
    match submission.premium {
        Some(premium) => format!("- Premium: ${premium}"),
        None => "- Premium: to be confirmed".to_string(),
    }
}

pub fn quotation_draft(submission: &Submission) -> String {
    format!(
        "Dear {broker},\n\n\
         We are pleased to inform you that we are proceeding with the quotation for {client} \
         (reference: {reference}).\n\n\
         Based on our evaluation, we are offering coverage with the following details:\n\
         {premium}\n\
         - Coverage: {line_of_business}\n\
         - Limits: Standard as requested\n\
         - Deductibles: As per submission\n\n\
         Please find the full quotation attached. If you have any questions or need further \
         information, please don't hesitate to contact us.\n\n\
         Best regards,\nInsureFlow Team",
        broker = submission.broker,
        client = submission.client,
        reference = submission.reference,
        premium = premium_line(submission),
        line_of_business = submission.line_of_business,
    )
}

pub fn survey_draft(submission: &Submission) -> String {
    format!(
        "Dear {broker},\n\n\
         We have reviewed the submission for {client} (reference: {reference}) and would like \
         to proceed with a survey before providing a quotation.\n\n\
         Based on our initial evaluation, we have identified some risk factors that require \
         further assessment through an on-site survey. This will help us better understand the \
         risk and provide appropriate coverage.\n\n\
         We will be in touch shortly to arrange a convenient time for the survey. If you have \
         any questions or need further information, please don't hesitate to contact us.\n\n\
         Best regards,\nInsureFlow Team",
        broker = submission.broker,
        client = submission.client,
        reference = submission.reference,
    )
}

pub fn rejection_draft(submission: &Submission) -> String {
    format!(
        "Dear {broker},\n\n\
         After careful consideration of the submission for {client} (reference: {reference}), \
         we regret to inform you that we are unable to provide a quotation at this time.\n\n\
         Our evaluation has identified several factors that place this risk outside our current \
         underwriting appetite.\n\n\
         We appreciate your consideration of our company and would be happy to review future \
         submissions that align more closely with our underwriting guidelines.\n\n\
         Best regards,\nInsureFlow Team",
        broker = submission.broker,
        client = submission.client,
        reference = submission.reference,
    )
}
