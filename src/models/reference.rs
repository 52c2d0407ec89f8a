//! Reference records: departments, venues, equipment and categories

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{upload::UploadFile, user::UserSummary};
use crate::validation::{check_file, FileRule, FormValidate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub public_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub public_id: String,
    pub name: String,
    pub description: Option<String>,
    pub department_head: Option<UserSummary>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForm {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub department_head_public_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    pub public_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub public_id: String,
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub venue_owner: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VenueForm {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub location: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<u32>,
    pub description: Option<String>,
    pub venue_owner_public_id: Option<String>,
    #[serde(skip)]
    pub image: Option<UploadFile>,
}

impl FormValidate for VenueForm {
    fn cross_field(&self, errors: &mut ValidationErrors) {
        check_file(errors, "image", self.image.as_ref(), FileRule::IMAGE);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentCategory {
    pub public_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentCategoryForm {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub public_id: String,
    pub name: String,
}

/// Equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub public_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub serial_no: Option<String>,
    /// Units owned
    #[serde(default)]
    pub quantity: u32,
    /// Units not reserved right now
    pub available_quantity: Option<u32>,
    pub category: Option<EquipmentCategory>,
    pub equipment_owner: Option<UserSummary>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentForm {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub name: String,
    pub brand: Option<String>,
    pub serial_no: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category_public_id: String,
    pub equipment_owner_public_id: Option<String>,
    #[serde(skip)]
    pub image: Option<UploadFile>,
}

impl FormValidate for EquipmentForm {
    fn cross_field(&self, errors: &mut ValidationErrors) {
        check_file(errors, "image", self.image.as_ref(), FileRule::IMAGE);
    }
}
