//! Equipment reservation endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{segment, ApiClient};
use crate::{
    error::AppResult,
    models::{
        approval::Approval,
        enums::ApprovalAction,
        reservation::{
            EquipmentReservation, ReservationBatchAction, ReservationForm, ReservationQuery,
        },
    },
    services::reservations::ReservationGateway,
};

#[derive(Clone)]
pub struct ReservationsApi {
    client: ApiClient,
}

impl ReservationsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReservationGateway for ReservationsApi {
    async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<EquipmentReservation>> {
        self.client
            .get_with_query("/equipment-reservations", query)
            .await
    }

    async fn own(&self) -> AppResult<Vec<EquipmentReservation>> {
        self.client.get("/equipment-reservations/own").await
    }

    async fn pending_approvals(&self) -> AppResult<Vec<EquipmentReservation>> {
        self.client
            .get("/equipment-reservations/pending-approvals")
            .await
    }

    async fn get(&self, public_id: &str) -> AppResult<EquipmentReservation> {
        self.client
            .get(&format!("/equipment-reservations/{}", segment(public_id)))
            .await
    }

    async fn approvals(&self, public_id: &str) -> AppResult<Vec<Approval>> {
        self.client
            .get(&format!(
                "/equipment-reservations/{}/approvals",
                segment(public_id)
            ))
            .await
    }

    async fn create(&self, form: &ReservationForm) -> AppResult<EquipmentReservation> {
        self.client
            .post_json("/equipment-reservations", form)
            .await
    }

    /// One request for every id; the remarks apply to all of them
    async fn act_batch(
        &self,
        public_ids: &[String],
        action: ApprovalAction,
        remarks: &str,
    ) -> AppResult<()> {
        let body = ReservationBatchAction {
            reservation_public_ids: public_ids.to_vec(),
            remarks: remarks.to_string(),
        };
        self.client
            .execute(
                Method::POST,
                &format!("/equipment-reservations/{}", action.path_segment()),
                Some(&body),
            )
            .await
    }
}
