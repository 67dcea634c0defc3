//! Per-check evaluation context.
//!
//! Built fresh for each check and never persisted. Every field is optional;
//! unset fields and empty strings impose no requirement.

use serde::{Deserialize, Serialize};

use crate::attributes::{ClearanceLevel, UserId};

/// Contextual requirements attached to a single permission check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_clearance: Option<ClearanceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Owner of the resource, for own-versus-others checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires_clearance(mut self, level: ClearanceLevel) -> Self {
        self.requires_clearance = Some(level);
        self
    }

    pub fn requires_specialization(mut self, tag: impl Into<String>) -> Self {
        self.requires_specialization = Some(tag.into());
        self
    }

    pub fn with_data_classification(mut self, classification: impl Into<String>) -> Self {
        self.data_classification = Some(classification.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<UserId>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Returns whether no requirement is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_empty() {
        assert!(EvaluationContext::new().is_empty());
        assert!(!EvaluationContext::new().with_project("P1").is_empty());
    }

    #[test]
    fn test_context_json_shape() {
        let ctx = EvaluationContext::new()
            .requires_clearance(ClearanceLevel::Advanced)
            .with_owner("1");

        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["requiresClearance"], "advanced");
        assert_eq!(value["ownerId"], "1");
        assert!(value.get("projectId").is_none());
    }
}
