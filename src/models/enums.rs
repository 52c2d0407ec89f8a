//! Shared domain enums (wire values are SCREAMING_SNAKE_CASE)

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of events, reservations and approval records.
///
/// Transitions happen on the backend; the client only assumes a status never
/// returns to `Pending` once it has left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Canceled,
    Ongoing,
    Completed,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
            ApprovalStatus::Canceled => "CANCELED",
            ApprovalStatus::Ongoing => "ONGOING",
            ApprovalStatus::Completed => "COMPLETED",
            ApprovalStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_pending(&self) -> bool {
        *self == ApprovalStatus::Pending
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
            ApprovalStatus::Canceled => "Canceled",
            ApprovalStatus::Ongoing => "Ongoing",
            ApprovalStatus::Completed => "Completed",
            ApprovalStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User roles. Used for client-side gating only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    VpAdmin,
    DeptHead,
    VenueOwner,
    EquipmentOwner,
    Organizer,
    Staff,
    Student,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles that sign off on events or reservations
    pub const APPROVERS: &'static [Role] = &[
        Role::SuperAdmin,
        Role::VpAdmin,
        Role::DeptHead,
        Role::VenueOwner,
        Role::EquipmentOwner,
    ];

    pub const ADMINISTRATORS: &'static [Role] = &[Role::SuperAdmin, Role::Admin];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::VpAdmin => "VP Admin",
            Role::DeptHead => "Department Head",
            Role::VenueOwner => "Venue Owner",
            Role::EquipmentOwner => "Equipment Owner",
            Role::Organizer => "Organizer",
            Role::Staff => "Staff",
            Role::Student => "Student",
            Role::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ApprovalAction
// ---------------------------------------------------------------------------

/// Action applied to one or many events/reservations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    Approve,
    Reject,
    Cancel,
}

impl ApprovalAction {
    /// Status a row is expected to reach once the action lands
    pub fn resulting_status(&self) -> ApprovalStatus {
        match self {
            ApprovalAction::Approve => ApprovalStatus::Approved,
            ApprovalAction::Reject => ApprovalStatus::Rejected,
            ApprovalAction::Cancel => ApprovalStatus::Canceled,
        }
    }

    /// Endpoint segment used by the batch reservation endpoints
    pub fn path_segment(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Cancel => "cancel",
        }
    }

    pub fn verb(&self) -> &'static str {
        self.path_segment()
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approved",
            ApprovalAction::Reject => "rejected",
            ApprovalAction::Cancel => "canceled",
        }
    }

    /// Rejections and cancellations must say why
    pub fn requires_remarks(&self) -> bool {
        !matches!(self, ApprovalAction::Approve)
    }
}

// ---------------------------------------------------------------------------
// Equipment checklist
// ---------------------------------------------------------------------------

/// When a checklist was filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistPhase {
    Checkout,
    Return,
}

/// Condition of a piece of equipment at checkout or return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCondition {
    Good,
    NeedsRepair,
    Damaged,
    Missing,
}

impl EquipmentCondition {
    /// Conditions that need a written remark
    pub fn requires_remarks(&self) -> bool {
        !matches!(self, EquipmentCondition::Good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let status: ApprovalStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(status, ApprovalStatus::Canceled);
        assert_eq!(serde_json::to_string(&ApprovalStatus::Pending).unwrap(), "\"PENDING\"");
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let status: ApprovalStatus = serde_json::from_str("\"ARCHIVED\"").unwrap();
        assert_eq!(status, ApprovalStatus::Unknown);
        assert!(!status.is_pending());
    }

    #[test]
    fn test_role_wire_format() {
        let roles: Vec<Role> = serde_json::from_str(r#"["DEPT_HEAD","VP_ADMIN","JANITOR"]"#).unwrap();
        assert_eq!(roles, vec![Role::DeptHead, Role::VpAdmin, Role::Unknown]);
    }

    #[test]
    fn test_action_semantics() {
        assert_eq!(ApprovalAction::Reject.resulting_status(), ApprovalStatus::Rejected);
        assert_eq!(ApprovalAction::Cancel.path_segment(), "cancel");
        assert!(!ApprovalAction::Approve.requires_remarks());
        assert!(ApprovalAction::Reject.requires_remarks());
    }
}
