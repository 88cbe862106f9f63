//! Bulk actions driven by the Listing screen's bulk bar.

use std::collections::HashSet;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::status::ContentStatus;
use crate::status::SubmissionStatus;
use crate::types::DbId;

/// Maximum number of ids accepted in one bulk request.
pub const MAX_BULK_IDS: usize = 500;

/// Bulk action on publishable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Publish,
    Draft,
    Archive,
    Delete,
}

impl BulkAction {
    /// Status the action moves rows to; `None` for delete.
    pub fn target_status(self) -> Option<ContentStatus> {
        match self {
            BulkAction::Publish => Some(ContentStatus::Published),
            BulkAction::Draft => Some(ContentStatus::Draft),
            BulkAction::Archive => Some(ContentStatus::Archived),
            BulkAction::Delete => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BulkAction::Publish => "publish",
            BulkAction::Draft => "draft",
            BulkAction::Archive => "archive",
            BulkAction::Delete => "delete",
        }
    }
}

impl FromStr for BulkAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(BulkAction::Publish),
            "draft" => Ok(BulkAction::Draft),
            "archive" => Ok(BulkAction::Archive),
            "delete" => Ok(BulkAction::Delete),
            other => Err(CoreError::Validation(format!(
                "Unknown bulk action '{other}'. Must be one of: publish, draft, archive, delete"
            ))),
        }
    }
}

/// Bulk action on form submissions: move to a follow-up status or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkSubmissionAction {
    SetStatus(SubmissionStatus),
    Delete,
}

impl BulkSubmissionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkSubmissionAction::SetStatus(s) => s.as_str(),
            BulkSubmissionAction::Delete => "delete",
        }
    }
}

impl FromStr for BulkSubmissionAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "delete" {
            return Ok(BulkSubmissionAction::Delete);
        }
        s.parse::<SubmissionStatus>()
            .map(BulkSubmissionAction::SetStatus)
            .map_err(|_| {
                CoreError::Validation(format!(
                    "Unknown bulk action '{s}'. Must be one of: new, contacted, in_progress, closed, delete"
                ))
            })
    }
}

/// Validate bulk ids: non-empty, at most [`MAX_BULK_IDS`], all positive.
///
/// Duplicates are removed; first occurrence order is kept.
pub fn validate_ids(ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation("ids must not be empty".into()));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(CoreError::Validation(format!(
            "Too many ids: {} (maximum {MAX_BULK_IDS})",
            ids.len()
        )));
    }
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(CoreError::Validation(format!("Invalid id: {bad}")));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids.iter().copied().filter(|id| seen.insert(*id)).collect())
}

/// An id left untouched by a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkSkip {
    pub id: DbId,
    pub reason: String,
}

/// Outcome of a bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub requested: usize,
    pub updated: u64,
    pub deleted: u64,
    pub skipped: Vec<BulkSkip>,
}

impl BulkResult {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    pub fn skip(&mut self, id: DbId, reason: impl Into<String>) {
        self.skipped.push(BulkSkip {
            id,
            reason: reason.into(),
        });
    }

    /// Mark every id in `requested` that is absent from `found` as not found.
    pub fn skip_missing(&mut self, requested: &[DbId], found: &[DbId]) {
        let found: HashSet<DbId> = found.iter().copied().collect();
        for id in requested.iter().filter(|id| !found.contains(id)) {
            self.skip(*id, "Not found");
        }
    }
}
