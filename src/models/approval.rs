//! Approval records attached to events and equipment reservations

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enums::ApprovalStatus, user::UserSummary};

/// Per-approver sign-off entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub public_id: String,
    pub signed_by: Option<UserSummary>,
    /// Role under which the approver signed (e.g. "DEPT_HEAD")
    pub user_role: Option<String>,
    pub status: ApprovalStatus,
    pub remarks: Option<String>,
    pub date_signed: Option<NaiveDateTime>,
}

impl Approval {
    /// True when `user_public_id` has already approved or rejected
    pub fn is_settled_by(&self, user_public_id: &str) -> bool {
        !self.status.is_pending()
            && self
                .signed_by
                .as_ref()
                .is_some_and(|u| u.public_id == user_public_id)
    }
}

/// Remarks sent with a single approve/reject/cancel request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemarksRequest {
    #[validate(length(max = 1000, message = "Remarks must be at most 1000 characters"))]
    pub remarks: String,
}

/// Cancellation body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub reason: String,
}
