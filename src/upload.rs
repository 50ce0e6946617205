//! Batch upload processing.
//!
//! Validates candidates against local policy, submits the survivors as a
//! single multipart batch, and reconciles backend results and local
//! rejections into one human-readable summary.

use crate::backend::{BackendClient, OutcomeStatus, UploadOutcome};
use crate::models::UploadCandidate;
use tracing::{debug, error, info};

/// Reason recorded for candidates that exceed the local size cap.
pub const OVERSIZE_REASON: &str = "file too large";

/// Fixed message for a batch that failed before the backend could
/// evaluate individual files. There is no per-file breakdown in that
/// case; the underlying error goes to the log.
pub const BATCH_FAILURE_MESSAGE: &str = "❌ Error uploading batch. See logs for details.";

const EMPTY_SUMMARY: &str = "⚠️ No files were processed.";

/// Validate and submit a batch of upload candidates.
///
/// Returns the summary message to append as an assistant turn, or `None`
/// for an empty candidate set (a no-op). At most one backend call is
/// made per invocation; zero if every candidate is rejected locally.
pub async fn process_batch(
    client: &BackendClient,
    max_file_bytes: u64,
    candidates: Vec<UploadCandidate>,
) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }

    let (accepted, rejections) = filter_candidates(candidates, max_file_bytes);

    let mut outcomes = Vec::new();
    if accepted.is_empty() {
        debug!("All candidates rejected locally; skipping backend call");
    } else {
        info!("Uploading batch of {} file(s)", accepted.len());
        match client.ingest(accepted).await {
            Ok(backend_outcomes) => outcomes.extend(backend_outcomes),
            Err(e) => {
                error!("Batch upload failed: {}", e);
                return Some(BATCH_FAILURE_MESSAGE.to_string());
            }
        }
    }
    outcomes.extend(rejections);

    Some(summarize(&outcomes))
}

/// Split candidates into those eligible for submission and local
/// rejections for the rest. Rejections never reach the backend.
fn filter_candidates(
    candidates: Vec<UploadCandidate>,
    max_file_bytes: u64,
) -> (Vec<UploadCandidate>, Vec<UploadOutcome>) {
    let mut accepted = Vec::new();
    let mut rejections = Vec::new();

    for candidate in candidates {
        if candidate.size_bytes > max_file_bytes {
            debug!(
                "Rejecting '{}' locally: {} bytes exceeds cap of {}",
                candidate.name, candidate.size_bytes, max_file_bytes
            );
            rejections.push(UploadOutcome::rejected(candidate.name, OVERSIZE_REASON));
        } else {
            accepted.push(candidate);
        }
    }

    (accepted, rejections)
}

/// Build the summary message from the combined outcome set. Outcomes
/// arrive in arbitrary order and correlate by filename only.
fn summarize(outcomes: &[UploadOutcome]) -> String {
    let successes: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Success)
        .map(|o| o.filename.as_str())
        .collect();
    let failures: Vec<&UploadOutcome> = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Error)
        .collect();

    if successes.is_empty() && failures.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let mut lines = Vec::new();
    if !successes.is_empty() {
        lines.push(format!(
            "✅ Successfully processed: **{}**. ",
            successes.join(", ")
        ));
    }
    if !failures.is_empty() {
        let names: Vec<&str> = failures.iter().map(|o| o.filename.as_str()).collect();
        let reasons: Vec<String> = failures
            .iter()
            .map(|o| {
                format!(
                    "({}: {})",
                    o.filename,
                    o.error_message.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();
        lines.push(format!(
            "❌ Failed: {} {}",
            names.join(", "),
            reasons.join(" ")
        ));
    }

    lines.join("\n")
}
