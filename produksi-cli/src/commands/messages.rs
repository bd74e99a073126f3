//! User-facing text for local violations and classified API failures

use produksi::{ApiError, CompletionDraft, ErrorKind, Violation};

/// Explain a violation, naming the employee row where there is one
pub fn violation(violation: &Violation, draft: &CompletionDraft) -> String {
    match violation {
        Violation::EmptyContribution { entry: Some(id) } => {
            let who = draft
                .entry(*id)
                .map(|e| e.employee.as_str())
                .unwrap_or("an employee");
            format!("Output weight for {} must be greater than 0 kg.", who)
        }
        Violation::EmptyContribution { entry: None } => {
            "This run has no employee output rows to record.".to_string()
        }
        Violation::MissingStockCount => {
            "Enter how many finished pieces went into stock.".to_string()
        }
        Violation::MaterialExceeded {
            total_output,
            total_input,
            excess,
        } => format!(
            "Total output {:.3} kg is more than the {:.3} kg of material used (over by {:.3} kg).",
            total_output.as_kg(),
            total_input.as_kg(),
            excess.as_kg()
        ),
    }
}

/// What the user should do about a failed request
pub fn advice(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::Contention => {
            Some("The server is busy with another update. Try again shortly.")
        }
        ErrorKind::Conflict => {
            Some("This run was changed elsewhere. Reload it before submitting again.")
        }
        ErrorKind::Unauthorized => {
            Some("The server rejected the token. Check API_TOKEN or --token.")
        }
        ErrorKind::Network => {
            Some("Could not reach the server. Check API_BASE_URL and your connection.")
        }
        ErrorKind::Decode => Some("The server sent a response that could not be read."),
        ErrorKind::Validation | ErrorKind::Generic => None,
    }
}

/// Lines describing a failed request: the server's message, per-field
/// errors, then advice
pub fn api_failure(err: &ApiError) -> Vec<String> {
    let mut lines = vec![err.message()];
    if let ApiError::Validation { errors, .. } = err {
        for (field, messages) in &errors.errors {
            for message in messages {
                lines.push(format!("  {}: {}", field, message));
            }
        }
    }
    if let Some(advice) = advice(err.kind()) {
        lines.push(advice.to_string());
    }
    lines
}
