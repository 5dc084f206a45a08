use super::{Storage, StorageError};
use std::collections::HashSet;

/// What [`forget_reports`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgetSummary {
    /// Ids whose report was removed, in stored order.
    pub removed: Vec<String>,
    /// Requested ids that had no stored report, in request order.
    pub unknown: Vec<String>,
}

/// Remove the reports of `ids`, keeping every other report in place.
///
/// The record set is rewritten even when nothing matched.
pub async fn forget_reports(
    storage: &dyn Storage,
    ids: &[String],
) -> Result<ForgetSummary, StorageError> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut reports = storage.get_all().await?;

    let known: HashSet<String> = reports
        .iter()
        .map(|r| r.migration_id().to_string())
        .collect();
    let mut unknown = Vec::new();
    for id in ids {
        if !known.contains(id) && !unknown.contains(id) {
            unknown.push(id.clone());
        }
    }

    let mut removed = Vec::new();
    reports.retain(|r| {
        if wanted.contains(r.migration_id()) {
            removed.push(r.migration_id().to_string());
            false
        } else {
            true
        }
    });
    storage.store(&reports).await?;

    Ok(ForgetSummary { removed, unknown })
}
