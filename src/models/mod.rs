//! Transport DTOs mirrored from the backend

pub mod activity_log;
pub mod approval;
pub mod checklist;
pub mod dashboard;
pub mod enums;
pub mod event;
pub mod notification;
pub mod reference;
pub mod reservation;
pub mod upload;
pub mod user;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use approval::Approval;
pub use enums::{ApprovalAction, ApprovalStatus, Role};
pub use event::{Event, EventForm, EventQuery};
pub use notification::Notification;
pub use reservation::{EquipmentReservation, ReservationForm, ReservationQuery};
pub use upload::UploadFile;
pub use user::{User, UserSummary};

/// Paginated list returned by the paged endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Current page (0-based)
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }
}
