//! Events service: cached queries and optimistic mutations

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use uuid::Uuid;

use super::{
    approvals::{check_remarks, check_selection, ApprovalQueue, BulkOutcome},
    auth::Session,
};
use crate::{
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::{
        approval::Approval,
        enums::{ApprovalAction, ApprovalStatus},
        event::{Event, EventForm, EventQuery},
        user::User,
    },
    validation::FormValidate,
};

/// Backend operations the events service depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventGateway: Send + Sync {
    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>>;
    async fn own(&self) -> AppResult<Vec<Event>>;
    async fn pending_approvals(&self) -> AppResult<Vec<Event>>;
    async fn get(&self, public_id: &str) -> AppResult<Event>;
    async fn create(&self, form: &EventForm) -> AppResult<Event>;
    async fn update(&self, public_id: &str, form: &EventForm) -> AppResult<Event>;
    async fn delete(&self, public_id: &str) -> AppResult<()>;
    async fn approvals(&self, public_id: &str) -> AppResult<Vec<Approval>>;
    async fn approve(&self, public_id: &str, remarks: &str) -> AppResult<()>;
    async fn reject(&self, public_id: &str, remarks: &str) -> AppResult<()>;
    async fn cancel(&self, public_id: &str, reason: &str) -> AppResult<()>;
    async fn assign_personnel(&self, public_id: &str, user_public_ids: Vec<String>) -> AppResult<()>;
    async fn unassign_personnel(&self, public_id: &str, user_public_id: &str) -> AppResult<()>;
    async fn act_batch(&self, public_ids: &[String], action: ApprovalAction, remarks: &str) -> AppResult<()>;
}

pub fn events_key() -> QueryKey {
    QueryKey::root("events")
}

fn list_slot() -> QueryKey {
    events_key().child("list")
}

fn own_key() -> QueryKey {
    events_key().child("own")
}

fn pending_key() -> QueryKey {
    events_key().child("pending-approvals")
}

fn detail_key(public_id: &str) -> QueryKey {
    events_key().child("detail").child(public_id)
}

/// Record the viewer's decision on a cached event
fn splice_decision(event: &mut Event, record: &Approval, action: ApprovalAction) {
    let viewer = record.signed_by.as_ref().map(|u| u.public_id.as_str());
    match event
        .approvals
        .iter_mut()
        .find(|a| a.signed_by.as_ref().map(|u| u.public_id.as_str()) == viewer)
    {
        Some(existing) => *existing = record.clone(),
        None => event.approvals.push(record.clone()),
    }
    if action != ApprovalAction::Approve {
        event.status = action.resulting_status();
    }
}

fn viewer_approval(viewer: &User, action: ApprovalAction, remarks: &str) -> Approval {
    Approval {
        public_id: format!("temp-{}", Uuid::new_v4()),
        signed_by: Some(viewer.summary()),
        user_role: None,
        status: action.resulting_status(),
        remarks: (!remarks.trim().is_empty()).then(|| remarks.to_string()),
        date_signed: Some(chrono::Local::now().naive_local()),
    }
}

#[derive(Clone)]
pub struct EventsService {
    gateway: Arc<dyn EventGateway>,
    cache: QueryCache,
    session: Session,
}

impl EventsService {
    pub fn new(gateway: Arc<dyn EventGateway>, cache: QueryCache, session: Session) -> Self {
        Self {
            gateway,
            cache,
            session,
        }
    }

    /// Filtered list. `None` means a newer list request has since been made
    /// and this result was dropped.
    pub async fn list(&self, query: &EventQuery) -> AppResult<Option<Vec<Event>>> {
        let key = list_slot().with_params(query)?;
        self.cache
            .fetch_latest(&list_slot(), key, || self.gateway.list(query))
            .await
    }

    pub async fn own(&self) -> AppResult<Vec<Event>> {
        self.cache.fetch(own_key(), || self.gateway.own()).await
    }

    pub async fn pending_approvals(&self) -> AppResult<Vec<Event>> {
        self.cache
            .fetch(pending_key(), || self.gateway.pending_approvals())
            .await
    }

    pub async fn get(&self, public_id: &str) -> AppResult<Event> {
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

    /// Pending events with the viewer's eligibility applied
    pub async fn approval_queue(&self) -> AppResult<ApprovalQueue<Event>> {
        let viewer = self.session.require_user()?;
        viewer.require_approver()?;
        let rows = self.pending_approvals().await?;
        Ok(ApprovalQueue::new(rows, viewer.public_id))
    }

    /// Refetch the pending list into an existing queue
    pub async fn refresh_queue(&self, queue: &mut ApprovalQueue<Event>) -> AppResult<()> {
        self.cache.invalidate(&pending_key());
        let rows = self.pending_approvals().await?;
        queue.replace_rows(rows);
        Ok(())
    }

    pub async fn create_event(&self, form: &EventForm) -> AppResult<Event> {
        form.validate_create()?;
        let viewer = self.session.require_user()?;
        let placeholder = form.placeholder(format!("temp-{}", Uuid::new_v4()), Some(viewer.summary()));

        tracing::debug!("Creating event {}", form.event_name);
        let event = self
            .cache
            .mutate(
                &events_key(),
                |cache| {
                    cache.update(&own_key(), |events: &mut Vec<Event>| {
                        events.insert(0, placeholder)
                    })?;
                    Ok(())
                },
                self.gateway.create(form),
            )
            .await?;

        self.cache.set(detail_key(&event.public_id), &event)?;
        Ok(event)
    }

    pub async fn update_event(&self, public_id: &str, form: &EventForm) -> AppResult<Event> {
        form.validate_form()?;
        self.session.require_user()?;

        let event = self
            .cache
            .mutate(
                &events_key(),
                |cache| {
                    cache.update(&detail_key(public_id), |event: &mut Event| form.apply_to(event))?;
                    cache.update_matching(&events_key(), |_, events: &mut Vec<Event>| {
                        for event in events.iter_mut().filter(|e| e.public_id == public_id) {
                            form.apply_to(event);
                        }
                    })?;
                    Ok(())
                },
                self.gateway.update(public_id, form),
            )
            .await?;

        self.cache.set(detail_key(public_id), &event)?;
        Ok(event)
    }

    pub async fn delete_event(&self, public_id: &str) -> AppResult<()> {
        self.session.require_user()?;
        self.cache
            .mutate(
                &events_key(),
                |cache| {
                    cache.remove(&detail_key(public_id));
                    cache.update_matching(&events_key(), |_, events: &mut Vec<Event>| {
                        events.retain(|e| e.public_id != public_id)
                    })?;
                    Ok(())
                },
                self.gateway.delete(public_id),
            )
            .await
    }

    pub async fn approve_event(&self, public_id: &str, remarks: &str) -> AppResult<()> {
        self.decide(public_id, ApprovalAction::Approve, remarks).await
    }

    pub async fn reject_event(&self, public_id: &str, remarks: &str) -> AppResult<()> {
        self.decide(public_id, ApprovalAction::Reject, remarks).await
    }

    async fn decide(&self, public_id: &str, action: ApprovalAction, remarks: &str) -> AppResult<()> {
        check_remarks(action, remarks)?;
        let viewer = self.session.require_user()?;
        viewer.require_approver()?;
        let record = viewer_approval(&viewer, action, remarks);

        let request = async {
            match action {
                ApprovalAction::Reject => self.gateway.reject(public_id, remarks).await,
                _ => self.gateway.approve(public_id, remarks).await,
            }
        };

        self.cache
            .mutate(
                &events_key(),
                |cache| {
                    cache.update(&pending_key(), |events: &mut Vec<Event>| {
                        events.retain(|e| e.public_id != public_id)
                    })?;
                    cache.update(&detail_key(public_id), |event: &mut Event| {
                        splice_decision(event, &record, action)
                    })?;
                    cache.update_matching(&events_key(), |_, events: &mut Vec<Event>| {
                        for event in events.iter_mut().filter(|e| e.public_id == public_id) {
                            splice_decision(event, &record, action);
                        }
                    })?;
                    Ok(())
                },
                request,
            )
            .await?;

        tracing::info!("Event {} {} by {}", public_id, action.past_tense(), viewer.email);
        Ok(())
    }

    pub async fn cancel_event(&self, public_id: &str, reason: &str) -> AppResult<()> {
        check_remarks(ApprovalAction::Cancel, reason)?;
        self.session.require_user()?;

        let mark_canceled = |event: &mut Event| event.status = ApprovalStatus::Canceled;
        self.cache
            .mutate(
                &events_key(),
                |cache| {
                    cache.update(&pending_key(), |events: &mut Vec<Event>| {
                        events.retain(|e| e.public_id != public_id)
                    })?;
                    cache.update(&detail_key(public_id), mark_canceled)?;
                    cache.update_matching(&events_key(), |_, events: &mut Vec<Event>| {
                        events
                            .iter_mut()
                            .filter(|e| e.public_id == public_id)
                            .for_each(mark_canceled)
                    })?;
                    Ok(())
                },
                self.gateway.cancel(public_id, reason),
            )
            .await
    }

    /// Approve or reject every selected row, one request per event, all in
    /// flight at once. Successful rows leave the queue; failed rows stay
    /// selected so the user can retry them.
    pub async fn bulk_act(
        &self,
        queue: &mut ApprovalQueue<Event>,
        action: ApprovalAction,
        remarks: &str,
    ) -> AppResult<BulkOutcome> {
        check_remarks(action, remarks)?;
        let ids = queue.selected_ids();
        check_selection(&ids)?;

        tracing::debug!("Bulk {} of {} events", action.verb(), ids.len());
        let calls = ids.iter().map(|public_id| async move {
            let result = match action {
                ApprovalAction::Approve => self.gateway.approve(public_id, remarks).await,
                ApprovalAction::Reject => self.gateway.reject(public_id, remarks).await,
                ApprovalAction::Cancel => self.gateway.cancel(public_id, remarks).await,
            };
            (public_id.clone(), result)
        });
        let outcome = BulkOutcome::from_results(action, join_all(calls).await);

        for failure in &outcome.failed {
            tracing::warn!("Failed to {} event {}: {}", action.verb(), failure.public_id, failure.message);
        }
        if !outcome.succeeded.is_empty() {
            queue.mark_done(&outcome.succeeded);
            self.cache.invalidate(&events_key());
        }
        Ok(outcome)
    }

    /// Single request covering several events
    pub async fn act_batch(&self, public_ids: &[String], action: ApprovalAction, remarks: &str) -> AppResult<()> {
        check_remarks(action, remarks)?;
        check_selection(public_ids)?;
        self.session.require_user()?;

        self.gateway.act_batch(public_ids, action, remarks).await?;
        self.cache.invalidate(&events_key());
        Ok(())
    }

    pub async fn assign_personnel(&self, public_id: &str, user_public_ids: Vec<String>) -> AppResult<()> {
        self.gateway.assign_personnel(public_id, user_public_ids).await?;
        self.cache.invalidate(&detail_key(public_id));
        Ok(())
    }

    pub async fn unassign_personnel(&self, public_id: &str, user_public_id: &str) -> AppResult<()> {
        self.cache
            .mutate(
                &detail_key(public_id),
                |cache| {
                    cache.update(&detail_key(public_id), |event: &mut Event| {
                        event
                            .assigned_personnel
                            .retain(|u| u.public_id != user_public_id)
                    })?;
                    Ok(())
                },
                self.gateway.unassign_personnel(public_id, user_public_id),
            )
            .await
    }
}
