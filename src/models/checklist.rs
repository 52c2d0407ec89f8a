//! Equipment condition checklists filled in at checkout and return

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{
    enums::{ChecklistPhase, EquipmentCondition},
    reference::EquipmentSummary,
    user::UserSummary,
};
use crate::validation::FormValidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub public_id: String,
    pub equipment: EquipmentSummary,
    pub phase: ChecklistPhase,
    pub condition: EquipmentCondition,
    pub remarks: Option<String>,
    pub checked_by: Option<UserSummary>,
    pub checked_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistEntry {
    pub equipment_public_id: String,
    pub condition: EquipmentCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Checklist submitted for one reservation
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSubmission {
    pub phase: ChecklistPhase,
    #[validate(length(min = 1, message = "Add at least one checklist item"))]
    pub items: Vec<ChecklistEntry>,
}

impl FormValidate for ChecklistSubmission {
    fn cross_field(&self, errors: &mut ValidationErrors) {
        let missing_remarks = self.items.iter().any(|item| {
            item.condition.requires_remarks()
                && item.remarks.as_deref().map_or(true, |r| r.trim().is_empty())
        });
        if missing_remarks {
            let mut err = ValidationError::new("remarks_required");
            err.message = Some("Describe the problem for equipment that is not in good condition".into());
            errors.add("items", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(condition: EquipmentCondition, remarks: Option<&str>) -> ChecklistEntry {
        ChecklistEntry {
            equipment_public_id: "eq-1".to_string(),
            condition,
            remarks: remarks.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_checklist_rejected() {
        let submission = ChecklistSubmission {
            phase: ChecklistPhase::Checkout,
            items: Vec::new(),
        };
        assert!(submission.validate_form().is_err());
    }

    #[test]
    fn test_damaged_needs_remarks() {
        let submission = ChecklistSubmission {
            phase: ChecklistPhase::Return,
            items: vec![
                entry(EquipmentCondition::Good, None),
                entry(EquipmentCondition::Damaged, Some("  ")),
            ],
        };
        let errors = submission.validate_form().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));

        let fixed = ChecklistSubmission {
            phase: ChecklistPhase::Return,
            items: vec![entry(EquipmentCondition::Damaged, Some("Cracked lens"))],
        };
        assert!(fixed.validate_form().is_ok());
    }
}
