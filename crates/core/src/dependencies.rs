//! Deletion dependency checking.
//!
//! Pure logic for deciding whether an entity can be hard-deleted given the
//! inbound references found by the repository scan, and for phrasing the
//! refusal shown to the editor.

use serde::Serialize;

use crate::error::CoreError;

/// References from one kind of entity (e.g. "treatments") to the row being deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentGroup {
    /// Plural label of the referencing entity.
    pub entity: String,
    pub count: i64,
    /// Display labels of a few referencing rows.
    pub examples: Vec<String>,
}

/// Result of checking whether an entity can safely be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionCheck {
    pub is_safe: bool,
    pub message: String,
    pub dependents: Vec<DependentGroup>,
}

impl DeletionCheck {
    /// Convert a blocked check into [`CoreError::HasDependents`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_safe {
            Ok(())
        } else {
            Err(CoreError::HasDependents {
                message: self.message,
                dependents: self.dependents,
            })
        }
    }
}

/// Evaluate the scan result for an entity labelled `entity_label` ("specialty").
///
/// Groups with a zero count are dropped before evaluation.
pub fn check_deletion(entity_label: &str, groups: Vec<DependentGroup>) -> DeletionCheck {
    let dependents: Vec<DependentGroup> = groups.into_iter().filter(|g| g.count > 0).collect();

    if dependents.is_empty() {
        return DeletionCheck {
            is_safe: true,
            message: format!("No references to this {entity_label}. Safe to delete."),
            dependents,
        };
    }

    let parts: Vec<String> = dependents.iter().map(describe_group).collect();
    let message = format!(
        "Cannot delete {entity_label}: it is referenced by {}.",
        join_with_and(&parts)
    );
    DeletionCheck {
        is_safe: false,
        message,
        dependents,
    }
}

fn describe_group(group: &DependentGroup) -> String {
    let noun = if group.count == 1 {
        singular(&group.entity)
    } else {
        group.entity.as_str()
    };
    if group.examples.is_empty() {
        return format!("{} {noun}", group.count);
    }
    let mut listed = group.examples.join(", ");
    if (group.examples.len() as i64) < group.count {
        listed.push_str(", …");
    }
    format!("{} {noun} ({listed})", group.count)
}

/// Dependent labels are simple English plurals ("doctors", "blog posts").
fn singular(plural: &str) -> &str {
    plural.strip_suffix('s').unwrap_or(plural)
}

fn join_with_and(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn group(entity: &str, count: i64, examples: &[&str]) -> DependentGroup {
        DependentGroup {
            entity: entity.to_string(),
            count,
            examples: examples.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn no_dependents_is_safe() {
        let check = check_deletion("specialty", vec![group("treatments", 0, &[])]);
        assert!(check.is_safe);
        assert!(check.dependents.is_empty());
        assert!(check.into_result().is_ok());
    }

    #[test]
    fn message_lists_groups_and_examples() {
        let check = check_deletion(
            "specialty",
            vec![
                group("treatments", 3, &["Hip Replacement", "Knee Replacement"]),
                group("hospitals", 0, &[]),
                group("doctors", 1, &["Dr. Rao"]),
            ],
        );
        assert!(!check.is_safe);
        assert_eq!(
            check.message,
            "Cannot delete specialty: it is referenced by 3 treatments \
             (Hip Replacement, Knee Replacement, …) and 1 doctor (Dr. Rao)."
        );
        assert_eq!(check.dependents.len(), 2);
    }

    #[test]
    fn three_groups_use_commas() {
        let check = check_deletion(
            "hospital",
            vec![
                group("doctors", 2, &["A", "B"]),
                group("testimonials", 1, &["C"]),
                group("videos", 4, &[]),
            ],
        );
        assert!(check
            .message
            .ends_with("2 doctors (A, B), 1 testimonial (C) and 4 videos."));
    }

    #[test]
    fn blocked_check_becomes_has_dependents() {
        let check = check_deletion("doctor", vec![group("testimonials", 2, &["X", "Y"])]);
        assert_matches!(
            check.into_result(),
            Err(CoreError::HasDependents { dependents, .. }) if dependents.len() == 1
        );
    }
}
