//! Equipment reservations service

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    approvals::{check_remarks, check_selection, ApprovalQueue, BulkOutcome},
    auth::Session,
};
use crate::{
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::{
        approval::Approval,
        enums::ApprovalAction,
        reservation::{EquipmentReservation, ReservationForm, ReservationQuery},
    },
    validation::FormValidate,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<EquipmentReservation>>;
    async fn own(&self) -> AppResult<Vec<EquipmentReservation>>;
    async fn pending_approvals(&self) -> AppResult<Vec<EquipmentReservation>>;
    async fn get(&self, public_id: &str) -> AppResult<EquipmentReservation>;
    async fn approvals(&self, public_id: &str) -> AppResult<Vec<Approval>>;
    async fn create(&self, form: &ReservationForm) -> AppResult<EquipmentReservation>;
    async fn act_batch(&self, public_ids: &[String], action: ApprovalAction, remarks: &str) -> AppResult<()>;
}

pub fn reservations_key() -> QueryKey {
    QueryKey::root("equipment-reservations")
}

fn list_slot() -> QueryKey {
    reservations_key().child("list")
}

fn own_key() -> QueryKey {
    reservations_key().child("own")
}

fn pending_key() -> QueryKey {
    reservations_key().child("pending-approvals")
}

fn detail_key(public_id: &str) -> QueryKey {
    reservations_key().child("detail").child(public_id)
}

#[derive(Clone)]
pub struct ReservationsService {
    gateway: Arc<dyn ReservationGateway>,
    cache: QueryCache,
    session: Session,
}

impl ReservationsService {
    pub fn new(gateway: Arc<dyn ReservationGateway>, cache: QueryCache, session: Session) -> Self {
        Self {
            gateway,
            cache,
            session,
        }
    }

    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Option<Vec<EquipmentReservation>>> {
        let key = list_slot().with_params(query)?;
        self.cache
            .fetch_latest(&list_slot(), key, || self.gateway.list(query))
            .await
    }

    pub async fn own(&self) -> AppResult<Vec<EquipmentReservation>> {
        self.cache.fetch(own_key(), || self.gateway.own()).await
    }

    pub async fn pending_approvals(&self) -> AppResult<Vec<EquipmentReservation>> {
        self.cache
            .fetch(pending_key(), || self.gateway.pending_approvals())
            .await
    }

    pub async fn get(&self, public_id: &str) -> AppResult<EquipmentReservation> {
        self.cache
            .fetch(detail_key(public_id), || self.gateway.get(public_id))
            .await
    }

    pub async fn approvals(&self, public_id: &str) -> AppResult<Vec<Approval>> {
        self.cache
            .fetch(detail_key(public_id).child("approvals"), || {
                self.gateway.approvals(public_id)
            })
            .await
    }

    pub async fn approval_queue(&self) -> AppResult<ApprovalQueue<EquipmentReservation>> {
        let viewer = self.session.require_user()?;
        viewer.require_approver()?;
        let rows = self.pending_approvals().await?;
        Ok(ApprovalQueue::new(rows, viewer.public_id))
    }

    pub async fn refresh_queue(&self, queue: &mut ApprovalQueue<EquipmentReservation>) -> AppResult<()> {
        self.cache.invalidate(&pending_key());
        let rows = self.pending_approvals().await?;
        queue.replace_rows(rows);
        Ok(())
    }

    pub async fn create_reservation(&self, form: &ReservationForm) -> AppResult<EquipmentReservation> {
        form.validate_form()?;
        self.session.require_user()?;

        let reservation = self.gateway.create(form).await?;
        tracing::info!(
            "Reserved {} x {} ({})",
            reservation.quantity,
            reservation.equipment.name,
            reservation.public_id
        );
        self.cache.invalidate(&reservations_key());
        self.cache
            .set(detail_key(&reservation.public_id), &reservation)?;
        Ok(reservation)
    }

    /// One batch request for the whole selection with shared remarks.
    /// The selected rows leave the pending list immediately and come back if
    /// the request fails.
    pub async fn bulk_act(
        &self,
        queue: &mut ApprovalQueue<EquipmentReservation>,
        action: ApprovalAction,
        remarks: &str,
    ) -> AppResult<BulkOutcome> {
        check_remarks(action, remarks)?;
        let ids = queue.selected_ids();
        check_selection(&ids)?;

        tracing::debug!("Batch {} of {} reservations", action.verb(), ids.len());
        let result = self
            .cache
            .mutate(
                &reservations_key(),
                |cache| {
                    cache.update(&pending_key(), |rows: &mut Vec<EquipmentReservation>| {
                        rows.retain(|r| !ids.contains(&r.public_id))
                    })?;
                    Ok(())
                },
                self.gateway.act_batch(&ids, action, remarks),
            )
            .await;

        let outcome = BulkOutcome::from_batch(action, ids, &result);
        if outcome.is_success() {
            queue.mark_done(&outcome.succeeded);
        }
        Ok(outcome)
    }

    /// Direct batch call without a queue, e.g. from a detail page
    pub async fn act_batch(&self, public_ids: &[String], action: ApprovalAction, remarks: &str) -> AppResult<()> {
        check_remarks(action, remarks)?;
        check_selection(public_ids)?;
        self.cache
            .mutate(
                &reservations_key(),
                |cache| {
                    cache.update(&pending_key(), |rows: &mut Vec<EquipmentReservation>| {
                        rows.retain(|r| !public_ids.contains(&r.public_id))
                    })?;
                    Ok(())
                },
                self.gateway.act_batch(public_ids, action, remarks),
            )
            .await
    }
}
