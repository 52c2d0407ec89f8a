//! Administration service: users and reference data, admin only

use validator::Validate;

use super::auth::Session;
use crate::{
    api::admin::AdminApi,
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::{
        reference::{
            Department, DepartmentForm, Equipment, EquipmentCategory, EquipmentCategoryForm,
            EquipmentForm, Venue, VenueForm,
        },
        user::{CreateUser, UpdateUser, User, UserQuery},
    },
    validation::FormValidate,
};

pub fn admin_key() -> QueryKey {
    QueryKey::root("admin")
}

fn users_key() -> QueryKey {
    admin_key().child("users")
}

fn departments_key() -> QueryKey {
    admin_key().child("departments")
}

fn venues_key() -> QueryKey {
    admin_key().child("venues")
}

fn categories_key() -> QueryKey {
    admin_key().child("equipment-categories")
}

fn equipment_key() -> QueryKey {
    admin_key().child("equipment")
}

#[derive(Clone)]
pub struct AdminService {
    api: AdminApi,
    cache: QueryCache,
    session: Session,
}

impl AdminService {
    pub fn new(api: AdminApi, cache: QueryCache, session: Session) -> Self {
        Self { api, cache, session }
    }

    fn require_admin(&self) -> AppResult<()> {
        self.session.require_user()?.require_admin()
    }

    /// Run an admin mutation and mark the affected list stale
    async fn mutate<T>(&self, list: QueryKey, request: impl std::future::Future<Output = AppResult<T>>) -> AppResult<T> {
        self.require_admin()?;
        let value = request.await?;
        self.cache.invalidate(&list);
        Ok(value)
    }

    // Users

    pub async fn list_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.require_admin()?;
        let key = users_key().with_params(query)?;
        self.cache.fetch(key, || self.api.list_users(query)).await
    }

    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        data.validate()?;
        let user = self.mutate(users_key(), self.api.create_user(data)).await?;
        tracing::info!("Created user {}", user.email);
        Ok(user)
    }

    pub async fn update_user(&self, public_id: &str, data: &UpdateUser) -> AppResult<User> {
        data.validate()?;
        self.mutate(users_key(), self.api.update_user(public_id, data))
            .await
    }

    pub async fn set_user_active(&self, public_id: &str, active: bool) -> AppResult<User> {
        let user = self
            .mutate(users_key(), self.api.set_user_active(public_id, active))
            .await?;
        tracing::info!("User {} active={}", user.email, user.active);
        Ok(user)
    }

    // Departments

    pub async fn departments(&self) -> AppResult<Vec<Department>> {
        self.cache
            .fetch(departments_key(), || self.api.list_departments())
            .await
    }

    pub async fn create_department(&self, data: &DepartmentForm) -> AppResult<Department> {
        data.validate()?;
        self.mutate(departments_key(), self.api.create_department(data))
            .await
    }

    pub async fn update_department(&self, public_id: &str, data: &DepartmentForm) -> AppResult<Department> {
        data.validate()?;
        self.mutate(departments_key(), self.api.update_department(public_id, data))
            .await
    }

    pub async fn delete_department(&self, public_id: &str) -> AppResult<()> {
        self.mutate(departments_key(), self.api.delete_department(public_id))
            .await
    }

    // Venues

    pub async fn venues(&self) -> AppResult<Vec<Venue>> {
        self.cache
            .fetch(venues_key(), || self.api.list_venues())
            .await
    }

    pub async fn create_venue(&self, data: &VenueForm) -> AppResult<Venue> {
        data.validate_form()?;
        self.mutate(venues_key(), self.api.create_venue(data)).await
    }

    pub async fn update_venue(&self, public_id: &str, data: &VenueForm) -> AppResult<Venue> {
        data.validate_form()?;
        self.mutate(venues_key(), self.api.update_venue(public_id, data))
            .await
    }

    pub async fn delete_venue(&self, public_id: &str) -> AppResult<()> {
        self.mutate(venues_key(), self.api.delete_venue(public_id))
            .await
    }

    // Equipment categories

    pub async fn equipment_categories(&self) -> AppResult<Vec<EquipmentCategory>> {
        self.cache
            .fetch(categories_key(), || self.api.list_equipment_categories())
            .await
    }

    pub async fn create_equipment_category(&self, data: &EquipmentCategoryForm) -> AppResult<EquipmentCategory> {
        data.validate()?;
        self.mutate(categories_key(), self.api.create_equipment_category(data))
            .await
    }

    pub async fn update_equipment_category(
        &self,
        public_id: &str,
        data: &EquipmentCategoryForm,
    ) -> AppResult<EquipmentCategory> {
        data.validate()?;
        self.mutate(
            categories_key(),
            self.api.update_equipment_category(public_id, data),
        )
        .await
    }

    /// Equipment embeds its category, so both lists go stale
    pub async fn delete_equipment_category(&self, public_id: &str) -> AppResult<()> {
        self.mutate(categories_key(), self.api.delete_equipment_category(public_id))
            .await?;
        self.cache.invalidate(&equipment_key());
        Ok(())
    }

    // Equipment

    pub async fn equipment(&self) -> AppResult<Vec<Equipment>> {
        self.cache
            .fetch(equipment_key(), || self.api.list_equipment())
            .await
    }

    pub async fn create_equipment(&self, data: &EquipmentForm) -> AppResult<Equipment> {
        data.validate_form()?;
        self.mutate(equipment_key(), self.api.create_equipment(data))
            .await
    }

    pub async fn update_equipment(&self, public_id: &str, data: &EquipmentForm) -> AppResult<Equipment> {
        data.validate_form()?;
        self.mutate(equipment_key(), self.api.update_equipment(public_id, data))
            .await
    }

    pub async fn delete_equipment(&self, public_id: &str) -> AppResult<()> {
        self.mutate(equipment_key(), self.api.delete_equipment(public_id))
            .await
    }
}
