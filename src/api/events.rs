//! Event endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{segment, ApiClient};
use crate::{
    error::AppResult,
    models::{
        approval::{Approval, CancelRequest, RemarksRequest},
        enums::ApprovalAction,
        event::{AssignPersonnel, Event, EventApprovalAction, EventForm, EventQuery},
    },
    services::events::EventGateway,
};

#[derive(Clone)]
pub struct EventsApi {
    client: ApiClient,
}

impl EventsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn form_files(form: &EventForm) -> [(&'static str, Option<&crate::models::UploadFile>); 2] {
        [
            ("approvedLetter", form.approved_letter.as_ref()),
            ("eventImage", form.event_image.as_ref()),
        ]
    }
}

#[async_trait]
impl EventGateway for EventsApi {
    async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        self.client.get_with_query("/events", query).await
    }

    async fn own(&self) -> AppResult<Vec<Event>> {
        self.client.get("/events/own").await
    }

    async fn pending_approvals(&self) -> AppResult<Vec<Event>> {
        self.client.get("/events/pending-approvals").await
    }

    async fn get(&self, public_id: &str) -> AppResult<Event> {
        self.client
            .get(&format!("/events/{}", segment(public_id)))
            .await
    }

    async fn create(&self, form: &EventForm) -> AppResult<Event> {
        self.client
            .send_multipart(Method::POST, "/events", "event", form, &Self::form_files(form))
            .await
    }

    async fn update(&self, public_id: &str, form: &EventForm) -> AppResult<Event> {
        self.client
            .send_multipart(
                Method::PATCH,
                &format!("/events/{}", segment(public_id)),
                "event",
                form,
                &Self::form_files(form),
            )
            .await
    }

    async fn approve(&self, public_id: &str, remarks: &str) -> AppResult<()> {
        let body = RemarksRequest {
            remarks: remarks.to_string(),
        };
        self.client
            .execute(
                Method::POST,
                &format!("/events/{}/approve", segment(public_id)),
                Some(&body),
            )
            .await
    }

    async fn reject(&self, public_id: &str, remarks: &str) -> AppResult<()> {
        let body = RemarksRequest {
            remarks: remarks.to_string(),
        };
        self.client
            .execute(
                Method::POST,
                &format!("/events/{}/reject", segment(public_id)),
                Some(&body),
            )
            .await
    }

    async fn cancel(&self, public_id: &str, reason: &str) -> AppResult<()> {
        let body = CancelRequest {
            reason: reason.to_string(),
        };
        self.client
            .execute(
                Method::PATCH,
                &format!("/events/{}/cancel", segment(public_id)),
                Some(&body),
            )
            .await
    }

    async fn approvals(&self, public_id: &str) -> AppResult<Vec<Approval>> {
        self.client
            .get(&format!("/events/{}/approvals", segment(public_id)))
            .await
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/events/{}", segment(public_id)))
            .await
    }

    async fn assign_personnel(&self, public_id: &str, user_public_ids: Vec<String>) -> AppResult<()> {
        let body = AssignPersonnel { user_public_ids };
        self.client
            .execute(
                Method::POST,
                &format!("/events/{}/personnel", segment(public_id)),
                Some(&body),
            )
            .await
    }

    async fn unassign_personnel(&self, public_id: &str, user_public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!(
                "/events/{}/personnel/{}",
                segment(public_id),
                segment(user_public_id)
            ))
            .await
    }

    async fn act_batch(&self, public_ids: &[String], action: ApprovalAction, remarks: &str) -> AppResult<()> {
        let body = EventApprovalAction {
            event_public_ids: public_ids.to_vec(),
            action,
            remarks: remarks.to_string(),
        };
        self.client
            .execute(Method::POST, "/event-approval/action", Some(&body))
            .await
    }
}
