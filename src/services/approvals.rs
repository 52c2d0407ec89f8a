//! Approval queues shared by the event and equipment approval screens.
//!
//! A row is eligible for the viewer when it is still PENDING and the viewer
//! has not already approved or rejected it. Only eligible rows can be
//! selected, and bulk actions only ever target the current selection.

use indexmap::IndexSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        approval::Approval,
        enums::{ApprovalAction, ApprovalStatus},
        event::Event,
        reservation::EquipmentReservation,
    },
    toast::Toast,
};

/// Anything that goes through per-approver sign-off
pub trait Approvable {
    fn public_id(&self) -> &str;
    fn status(&self) -> ApprovalStatus;
    fn approvals(&self) -> &[Approval];
}

impl Approvable for Event {
    fn public_id(&self) -> &str {
        &self.public_id
    }

    fn status(&self) -> ApprovalStatus {
        self.status
    }

    fn approvals(&self) -> &[Approval] {
        &self.approvals
    }
}

impl Approvable for EquipmentReservation {
    fn public_id(&self) -> &str {
        &self.public_id
    }

    fn status(&self) -> ApprovalStatus {
        self.status
    }

    fn approvals(&self) -> &[Approval] {
        &self.approvals
    }
}

/// PENDING and not yet approved/rejected by `viewer_public_id`
pub fn is_eligible<T: Approvable + ?Sized>(row: &T, viewer_public_id: &str) -> bool {
    row.status().is_pending()
        && !row
            .approvals()
            .iter()
            .any(|a| a.is_settled_by(viewer_public_id))
}

/// Rows awaiting the viewer's decision, plus the viewer's selection
#[derive(Debug, Clone)]
pub struct ApprovalQueue<T> {
    rows: Vec<T>,
    viewer: String,
    selected: IndexSet<String>,
}

impl<T: Approvable> ApprovalQueue<T> {
    pub fn new(rows: Vec<T>, viewer_public_id: impl Into<String>) -> Self {
        Self {
            rows,
            viewer: viewer_public_id.into(),
            selected: IndexSet::new(),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn viewer(&self) -> &str {
        &self.viewer
    }

    fn find(&self, public_id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.public_id() == public_id)
    }

    pub fn is_selectable(&self, public_id: &str) -> bool {
        self.find(public_id)
            .is_some_and(|row| is_eligible(row, &self.viewer))
    }

    pub fn eligible(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter().filter(|r| is_eligible(*r, &self.viewer))
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible().count()
    }

    pub fn is_selected(&self, public_id: &str) -> bool {
        self.selected.contains(public_id)
    }

    /// Select an eligible row. Returns whether it is selected afterwards.
    pub fn select(&mut self, public_id: &str) -> bool {
        if self.is_selectable(public_id) {
            self.selected.insert(public_id.to_string());
            true
        } else {
            false
        }
    }

    /// Flip a row's selection. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, public_id: &str) -> bool {
        if self.selected.shift_remove(public_id) {
            false
        } else {
            self.select(public_id)
        }
    }

    /// Header checkbox: select every eligible row
    pub fn select_all_eligible(&mut self) -> usize {
        let ids: Vec<String> = self
            .eligible()
            .map(|r| r.public_id().to_string())
            .collect();
        self.selected.extend(ids);
        self.selected.len()
    }

    pub fn all_eligible_selected(&self) -> bool {
        let mut eligible = self.eligible().peekable();
        eligible.peek().is_some() && eligible.all(|r| self.selected.contains(r.public_id()))
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected ids, in selection order
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Swap in freshly fetched rows, dropping selections that are gone or no
    /// longer eligible
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        let viewer = self.viewer.clone();
        let rows = &self.rows;
        self.selected.retain(|id| {
            rows.iter()
                .any(|r| r.public_id() == id && is_eligible(r, &viewer))
        });
    }

    /// Remove rows the viewer has acted on
    pub fn mark_done(&mut self, public_ids: &[String]) {
        self.rows
            .retain(|r| !public_ids.iter().any(|id| id == r.public_id()));
        for id in public_ids {
            self.selected.shift_remove(id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub public_id: String,
    pub message: String,
}

/// Aggregated result of a bulk approve/reject/cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub action: ApprovalAction,
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn from_results(action: ApprovalAction, results: Vec<(String, AppResult<()>)>) -> Self {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (public_id, result) in results {
            match result {
                Ok(()) => succeeded.push(public_id),
                Err(e) => failed.push(BulkFailure {
                    public_id,
                    message: e.user_message(),
                }),
            }
        }
        Self {
            action,
            succeeded,
            failed,
        }
    }

    /// Outcome of a single batch request covering every id
    pub fn from_batch(action: ApprovalAction, public_ids: Vec<String>, result: &AppResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                action,
                succeeded: public_ids,
                failed: Vec::new(),
            },
            Err(e) => {
                let message = e.user_message();
                Self {
                    action,
                    succeeded: Vec::new(),
                    failed: public_ids
                        .into_iter()
                        .map(|public_id| BulkFailure {
                            public_id,
                            message: message.clone(),
                        })
                        .collect(),
                }
            }
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True only when every item went through
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Single toast summarising the whole batch
    pub fn toast(&self, singular: &str, plural: &str) -> Toast {
        let noun = |n: usize| if n == 1 { singular } else { plural };
        let total = self.total();

        match self.failed.first() {
            None => Toast::success(format!(
                "{} {} {}",
                total,
                noun(total),
                self.action.past_tense()
            )),
            Some(first) => Toast::error(format!(
                "Failed to {} {} of {} {}: {}",
                self.action.verb(),
                self.failed.len(),
                total,
                noun(total),
                first.message
            )),
        }
    }
}

/// Rejections and cancellations must carry remarks
pub fn check_remarks(action: ApprovalAction, remarks: &str) -> AppResult<()> {
    if action.requires_remarks() && remarks.trim().is_empty() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("remarks_required");
        err.message = Some(format!("Remarks are required to {}", action.verb()).into());
        errors.add("remarks", err);
        return Err(AppError::Validation(errors));
    }
    Ok(())
}

/// Refuse to fire a bulk action with nothing selected
pub fn check_selection(ids: &[String]) -> AppResult<()> {
    if ids.is_empty() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("empty_selection");
        err.message = Some("Select at least one row".into());
        errors.add("selection", err);
        return Err(AppError::Validation(errors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserSummary;

    struct Row {
        id: String,
        status: ApprovalStatus,
        approvals: Vec<Approval>,
    }

    impl Approvable for Row {
        fn public_id(&self) -> &str {
            &self.id
        }
        fn status(&self) -> ApprovalStatus {
            self.status
        }
        fn approvals(&self) -> &[Approval] {
            &self.approvals
        }
    }

    fn approval(user: &str, status: ApprovalStatus) -> Approval {
        Approval {
            public_id: format!("a-{}", user),
            signed_by: Some(UserSummary {
                public_id: user.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                email: None,
            }),
            user_role: None,
            status,
            remarks: None,
            date_signed: None,
        }
    }

    fn row(id: &str, status: ApprovalStatus, approvals: Vec<Approval>) -> Row {
        Row {
            id: id.to_string(),
            status,
            approvals,
        }
    }

    fn queue() -> ApprovalQueue<Row> {
        ApprovalQueue::new(
            vec![
                row("r1", ApprovalStatus::Pending, vec![]),
                row("r2", ApprovalStatus::Pending, vec![approval("me", ApprovalStatus::Approved)]),
                row("r3", ApprovalStatus::Approved, vec![]),
                row("r4", ApprovalStatus::Pending, vec![approval("other", ApprovalStatus::Approved)]),
                row("r5", ApprovalStatus::Pending, vec![approval("me", ApprovalStatus::Pending)]),
            ],
            "me",
        )
    }

    #[test]
    fn test_eligibility() {
        let q = queue();
        let eligible: Vec<&str> = q.eligible().map(|r| r.public_id()).collect();
        assert_eq!(eligible, vec!["r1", "r4", "r5"]);
    }

    #[test]
    fn test_rejected_by_viewer_is_not_eligible() {
        let r = row("x", ApprovalStatus::Pending, vec![approval("me", ApprovalStatus::Rejected)]);
        assert!(!is_eligible(&r, "me"));
        assert!(is_eligible(&r, "someone-else"));
    }

    #[test]
    fn test_only_eligible_rows_are_selectable() {
        let mut q = queue();
        assert!(q.toggle("r1"));
        assert!(!q.toggle("r2"));
        assert!(!q.select("r3"));
        assert!(!q.select("missing"));
        assert_eq!(q.selected_ids(), vec!["r1"]);

        assert!(!q.toggle("r1"));
        assert_eq!(q.selection_len(), 0);
    }

    #[test]
    fn test_select_all_eligible() {
        let mut q = queue();
        assert!(!q.all_eligible_selected());
        assert_eq!(q.select_all_eligible(), 3);
        assert!(q.all_eligible_selected());
        assert_eq!(q.selected_ids(), vec!["r1", "r4", "r5"]);
    }

    #[test]
    fn test_replace_rows_drops_stale_selection() {
        let mut q = queue();
        q.select_all_eligible();
        q.replace_rows(vec![
            row("r1", ApprovalStatus::Rejected, vec![]),
            row("r4", ApprovalStatus::Pending, vec![]),
        ]);
        assert_eq!(q.selected_ids(), vec!["r4"]);
    }

    #[test]
    fn test_mark_done_removes_rows_and_selection() {
        let mut q = queue();
        q.select_all_eligible();
        q.mark_done(&["r1".to_string(), "r5".to_string()]);
        assert_eq!(q.selected_ids(), vec!["r4"]);
        assert_eq!(q.rows().len(), 3);
    }

    #[test]
    fn test_empty_queue_header_state() {
        let q: ApprovalQueue<Row> = ApprovalQueue::new(Vec::new(), "me");
        assert!(!q.all_eligible_selected());
        assert_eq!(q.eligible_count(), 0);
    }

    #[test]
    fn test_outcome_toasts() {
        let ok = BulkOutcome::from_results(
            ApprovalAction::Approve,
            vec![("a".to_string(), Ok(())), ("b".to_string(), Ok(()))],
        );
        assert!(ok.is_success());
        assert_eq!(ok.toast("event", "events"), Toast::success("2 events approved"));

        let partial = BulkOutcome::from_results(
            ApprovalAction::Reject,
            vec![
                ("a".to_string(), Ok(())),
                ("b".to_string(), Err(AppError::api(409, "Already rejected"))),
                ("c".to_string(), Ok(())),
            ],
        );
        assert!(!partial.is_success());
        assert_eq!(partial.succeeded, vec!["a", "c"]);
        assert_eq!(
            partial.toast("event", "events"),
            Toast::error("Failed to reject 1 of 3 events: Already rejected")
        );
    }

    #[test]
    fn test_batch_outcome() {
        let ids = vec!["r1".to_string()];
        let failed = BulkOutcome::from_batch(
            ApprovalAction::Approve,
            ids.clone(),
            &Err(AppError::api(500, "Server error")),
        );
        assert_eq!(failed.failed.len(), 1);
        assert_eq!(
            failed.toast("reservation", "reservations").message,
            "Failed to approve 1 of 1 reservation: Server error"
        );

        let ok = BulkOutcome::from_batch(ApprovalAction::Approve, ids, &Ok(()));
        assert_eq!(ok.toast("reservation", "reservations").message, "1 reservation approved");
    }

    #[test]
    fn test_remarks_and_selection_checks() {
        assert!(check_remarks(ApprovalAction::Approve, "").is_ok());
        assert!(check_remarks(ApprovalAction::Reject, "  ").is_err());
        assert!(check_remarks(ApprovalAction::Reject, "Schedule conflict").is_ok());
        assert!(check_selection(&[]).is_err());
    }
}
