//! Equipment reservation model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{
    approval::Approval,
    enums::ApprovalStatus,
    reference::{DepartmentSummary, EquipmentSummary},
    user::UserSummary,
};
use crate::validation::{check_date_range, FormValidate};

/// Equipment reservation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentReservation {
    pub public_id: String,
    pub equipment: EquipmentSummary,
    pub quantity: u32,
    pub status: ApprovalStatus,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub requesting_user: Option<UserSummary>,
    pub department: Option<DepartmentSummary>,
    pub purpose: Option<String>,
    /// Event the equipment is reserved for, if any
    pub event_public_id: Option<String>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    pub created_at: Option<NaiveDateTime>,
}

/// Create reservation request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    #[validate(length(min = 1, message = "Equipment is required"))]
    pub equipment_public_id: String,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: u32,
    #[serde(rename = "startTime")]
    pub start_date_time: NaiveDateTime,
    #[serde(rename = "endTime")]
    pub end_date_time: NaiveDateTime,
    #[validate(length(max = 1000, message = "Purpose must be at most 1000 characters"))]
    pub purpose: Option<String>,
    pub event_public_id: Option<String>,
}

impl FormValidate for ReservationForm {
    fn cross_field(&self, errors: &mut ValidationErrors) {
        check_date_range(errors, self.start_date_time, self.end_date_time);
    }
}

/// Reservation list filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Body shared by `/equipment-reservations/approve|reject|cancel`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationBatchAction {
    pub reservation_public_ids: Vec<String>,
    pub remarks: String,
}
