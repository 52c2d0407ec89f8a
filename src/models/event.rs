//! Event model (venue bookings that go through approval)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{
    approval::Approval,
    enums::{ApprovalAction, ApprovalStatus},
    reference::{DepartmentSummary, VenueSummary},
    upload::UploadFile,
    user::UserSummary,
};
use crate::validation::{check_date_range, check_file, check_required_file, FileRule, FormValidate};

/// Event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub public_id: String,
    pub event_name: String,
    /// Free-form type chosen by the organizer (seminar, sports, ...)
    pub event_type: String,
    pub event_purpose: Option<String>,
    pub description: Option<String>,
    pub status: ApprovalStatus,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub organizer: Option<UserSummary>,
    pub venue: Option<VenueSummary>,
    pub department: Option<DepartmentSummary>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub assigned_personnel: Vec<UserSummary>,
    pub image_url: Option<String>,
    pub approved_letter_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Create/edit event form
///
/// Sent as the `event` JSON part of a multipart request, with the files as
/// sibling parts.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub event_name: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub event_type: String,
    pub event_purpose: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Venue is required"))]
    pub venue_public_id: String,
    pub department_public_id: Option<String>,
    #[serde(rename = "startTime")]
    pub start_date_time: NaiveDateTime,
    #[serde(rename = "endTime")]
    pub end_date_time: NaiveDateTime,
    #[serde(skip)]
    pub approved_letter: Option<UploadFile>,
    #[serde(skip)]
    pub event_image: Option<UploadFile>,
}

impl FormValidate for EventForm {
    fn cross_field(&self, errors: &mut ValidationErrors) {
        check_date_range(errors, self.start_date_time, self.end_date_time);
        check_file(errors, "approved_letter", self.approved_letter.as_ref(), FileRule::DOCUMENT);
        check_file(errors, "event_image", self.event_image.as_ref(), FileRule::IMAGE);
    }
}

impl EventForm {
    /// Validation for a new event: the approval letter is mandatory.
    /// Edits may leave it out to keep the stored one.
    pub fn validate_create(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate_form() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        check_required_file(&mut errors, "approved_letter", self.approved_letter.as_ref());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Copy the edited fields onto a cached event
    pub fn apply_to(&self, event: &mut Event) {
        event.event_name = self.event_name.clone();
        event.event_type = self.event_type.clone();
        event.event_purpose = self.event_purpose.clone();
        event.description = self.description.clone();
        event.start_time = self.start_date_time;
        event.end_time = self.end_date_time;
        if event.venue.as_ref().map(|v| v.public_id.as_str()) != Some(self.venue_public_id.as_str()) {
            event.venue = Some(VenueSummary {
                public_id: self.venue_public_id.clone(),
                name: String::new(),
            });
        }
    }

    /// Placeholder shown until the backend answers a create request
    pub fn placeholder(&self, public_id: String, organizer: Option<UserSummary>) -> Event {
        let mut event = Event {
            public_id,
            event_name: String::new(),
            event_type: String::new(),
            event_purpose: None,
            description: None,
            status: ApprovalStatus::Pending,
            start_time: self.start_date_time,
            end_time: self.end_date_time,
            organizer,
            venue: None,
            department: self.department_public_id.as_ref().map(|id| DepartmentSummary {
                public_id: id.clone(),
                name: String::new(),
            }),
            approvals: Vec::new(),
            assigned_personnel: Vec::new(),
            image_url: None,
            approved_letter_url: None,
            created_at: None,
            updated_at: None,
        };
        self.apply_to(&mut event);
        event
    }
}

/// Event list filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Page number (0-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Batch approve/reject body for `/event-approval/action`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventApprovalAction {
    pub event_public_ids: Vec<String>,
    pub action: ApprovalAction,
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPersonnel {
    pub user_public_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn form() -> EventForm {
        EventForm {
            event_name: "Research Colloquium".to_string(),
            event_type: "Seminar".to_string(),
            event_purpose: None,
            description: None,
            venue_public_id: "venue-1".to_string(),
            department_public_id: Some("dept-1".to_string()),
            start_date_time: at(10, 0),
            end_date_time: at(12, 0),
            approved_letter: Some(UploadFile::new("letter.pdf", "application/pdf", vec![0; 64])),
            event_image: None,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate_form().is_ok());
    }

    #[test]
    fn test_end_before_start_fails_on_end_field() {
        let form = EventForm {
            start_date_time: at(10, 0),
            end_date_time: at(9, 0),
            ..form()
        };
        let errors = form.validate_form().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        let errs = fields.get("end_date_time").expect("end_date_time error");
        assert_eq!(
            errs[0].message.as_deref(),
            Some("End date/time cannot be before start date/time.")
        );
    }

    #[test]
    fn test_blank_name_and_missing_venue() {
        let form = EventForm {
            event_name: "   ".to_string(),
            venue_public_id: String::new(),
            ..form()
        };
        let errors = form.validate_form().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("event_name"));
        assert!(fields.contains_key("venue_public_id"));
    }

    #[test]
    fn test_letter_too_large() {
        let form = EventForm {
            approved_letter: Some(UploadFile::new(
                "letter.pdf",
                "application/pdf",
                vec![0; crate::validation::DOCUMENT_MAX_BYTES + 1],
            )),
            ..form()
        };
        assert!(form
            .validate_form()
            .unwrap_err()
            .field_errors()
            .contains_key("approved_letter"));
    }

    #[test]
    fn test_letter_required_only_on_create() {
        let form = EventForm {
            approved_letter: None,
            ..form()
        };
        assert!(form.validate_form().is_ok());

        let errors = form.validate_create().unwrap_err();
        let errs = errors.field_errors()["approved_letter"];
        assert_eq!(errs[0].code, "required");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(form()).unwrap();
        assert_eq!(json["eventName"], "Research Colloquium");
        assert_eq!(json["startTime"], "2024-06-01T10:00:00");
        assert!(json.get("approvedLetter").is_none());
    }

    #[test]
    fn test_placeholder_is_pending() {
        let event = form().placeholder("temp-1".to_string(), None);
        assert_eq!(event.status, ApprovalStatus::Pending);
        assert_eq!(event.event_name, "Research Colloquium");
        assert_eq!(event.venue.unwrap().public_id, "venue-1");
    }

    #[test]
    fn test_query_serialization_skips_empty() {
        let query = EventQuery {
            status: Some(ApprovalStatus::Pending),
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "PENDING" }));
    }
}
