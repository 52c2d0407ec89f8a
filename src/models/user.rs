//! User model and related request types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enums::Role, reference::DepartmentSummary, upload::UploadFile};
use crate::{
    error::AppError,
    validation::{check_file, FileRule, FormValidate},
};

/// Compact user reference embedded in other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub public_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
}

impl UserSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub public_id: String,
    pub id_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub department: Option<DepartmentSummary>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub email_verified: bool,
    pub profile_image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

fn default_true() -> bool {
    true
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            public_id: self.public_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: Some(self.email.clone()),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn is_admin(&self) -> bool {
        self.has_any_role(Role::ADMINISTRATORS)
    }

    /// Whether approval screens should be offered to this user
    pub fn can_approve(&self) -> bool {
        self.has_any_role(Role::APPROVERS)
    }

    // Gating checks. The backend remains the authority.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    pub fn require_approver(&self) -> Result<(), AppError> {
        if self.can_approve() {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to approve requests".to_string()))
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Self-registration form
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub id_number: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub password: String,
    #[validate(custom(function = "crate::validation::validate_optional_phone"))]
    pub phone_number: Option<String>,
    pub department_public_id: Option<String>,
    #[serde(skip)]
    pub profile_image: Option<UploadFile>,
}

impl FormValidate for RegisterUser {
    fn cross_field(&self, errors: &mut validator::ValidationErrors) {
        check_file(errors, "profile_image", self.profile_image.as_ref(), FileRule::IMAGE);
    }
}

/// Update own profile
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::validate_optional_phone"))]
    pub phone_number: Option<String>,
    #[serde(skip)]
    pub profile_image: Option<UploadFile>,
}

impl FormValidate for UpdateProfile {
    fn cross_field(&self, errors: &mut validator::ValidationErrors) {
        check_file(errors, "profile_image", self.profile_image.as_ref(), FileRule::IMAGE);
    }
}

/// Change password while logged in
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub new_password: String,
}

/// Email verification
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmail {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Verification code is required"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPassword {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset a forgotten password with the emailed code
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Reset code is required"))]
    pub code: String,
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub new_password: String,
}

/// Admin: create a user account
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub id_number: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "crate::validation::validate_not_blank"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "crate::validation::validate_password"))]
    pub password: String,
    #[validate(regex(path = *crate::validation::PHONE_REGEX, message = "Phone number must be exactly 11 digits"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "At least one role is required"))]
    pub roles: Vec<Role>,
    pub department_public_id: Option<String>,
}

/// Admin: update a user account
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::validate_optional_phone"))]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_public_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusRequest {
    pub active: bool,
}

/// User list filters
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
