//! Administration endpoints: users and reference data

use reqwest::Method;

use super::{segment, ApiClient};
use crate::{
    error::AppResult,
    models::{
        reference::{
            Department, DepartmentForm, Equipment, EquipmentCategory, EquipmentCategoryForm,
            EquipmentForm, Venue, VenueForm,
        },
        user::{CreateUser, UpdateUser, User, UserQuery, UserStatusRequest},
    },
};

#[derive(Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // Users

    pub async fn list_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.client.get_with_query("/admin/users", query).await
    }

    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        self.client.post_json("/admin/users", data).await
    }

    pub async fn update_user(&self, public_id: &str, data: &UpdateUser) -> AppResult<User> {
        self.client
            .patch_json(&format!("/admin/users/{}", segment(public_id)), data)
            .await
    }

    pub async fn set_user_active(&self, public_id: &str, active: bool) -> AppResult<User> {
        self.client
            .patch_json(
                &format!("/admin/users/{}/status", segment(public_id)),
                &UserStatusRequest { active },
            )
            .await
    }

    // Departments

    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.client.get("/admin/departments").await
    }

    pub async fn create_department(&self, data: &DepartmentForm) -> AppResult<Department> {
        self.client.post_json("/admin/departments", data).await
    }

    pub async fn update_department(&self, public_id: &str, data: &DepartmentForm) -> AppResult<Department> {
        self.client
            .patch_json(&format!("/admin/departments/{}", segment(public_id)), data)
            .await
    }

    pub async fn delete_department(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/admin/departments/{}", segment(public_id)))
            .await
    }

    // Venues

    pub async fn list_venues(&self) -> AppResult<Vec<Venue>> {
        self.client.get("/admin/venues").await
    }

    pub async fn create_venue(&self, data: &VenueForm) -> AppResult<Venue> {
        self.client
            .send_multipart(
                Method::POST,
                "/admin/venues",
                "venue",
                data,
                &[("image", data.image.as_ref())],
            )
            .await
    }

    pub async fn update_venue(&self, public_id: &str, data: &VenueForm) -> AppResult<Venue> {
        self.client
            .send_multipart(
                Method::PATCH,
                &format!("/admin/venues/{}", segment(public_id)),
                "venue",
                data,
                &[("image", data.image.as_ref())],
            )
            .await
    }

    pub async fn delete_venue(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/admin/venues/{}", segment(public_id)))
            .await
    }

    // Equipment categories

    pub async fn list_equipment_categories(&self) -> AppResult<Vec<EquipmentCategory>> {
        self.client.get("/admin/equipment-categories").await
    }

    pub async fn create_equipment_category(&self, data: &EquipmentCategoryForm) -> AppResult<EquipmentCategory> {
        self.client
            .post_json("/admin/equipment-categories", data)
            .await
    }

    pub async fn update_equipment_category(
        &self,
        public_id: &str,
        data: &EquipmentCategoryForm,
    ) -> AppResult<EquipmentCategory> {
        self.client
            .patch_json(
                &format!("/admin/equipment-categories/{}", segment(public_id)),
                data,
            )
            .await
    }

    pub async fn delete_equipment_category(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/admin/equipment-categories/{}", segment(public_id)))
            .await
    }

    // Equipment

    pub async fn list_equipment(&self) -> AppResult<Vec<Equipment>> {
        self.client.get("/admin/equipment").await
    }

    pub async fn create_equipment(&self, data: &EquipmentForm) -> AppResult<Equipment> {
        self.client
            .send_multipart(
                Method::POST,
                "/admin/equipment",
                "equipment",
                data,
                &[("image", data.image.as_ref())],
            )
            .await
    }

    pub async fn update_equipment(&self, public_id: &str, data: &EquipmentForm) -> AppResult<Equipment> {
        self.client
            .send_multipart(
                Method::PATCH,
                &format!("/admin/equipment/{}", segment(public_id)),
                "equipment",
                data,
                &[("image", data.image.as_ref())],
            )
            .await
    }

    pub async fn delete_equipment(&self, public_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/admin/equipment/{}", segment(public_id)))
            .await
    }
}
