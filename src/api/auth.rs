//! Authentication endpoints (cookie session)

use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::user::{
        ChangePassword, ForgotPassword, LoginRequest, RegisterUser, ResetPassword, UpdateProfile,
        User, VerifyEmail,
    },
};

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in; the backend answers with the user and sets the session cookie
    pub async fn login(&self, request: &LoginRequest) -> AppResult<User> {
        self.client.post_json("/auth/login", request).await
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.client
            .execute::<()>(Method::POST, "/auth/logout", None)
            .await
    }

    pub async fn me(&self) -> AppResult<User> {
        self.client.get("/auth/me").await
    }

    pub async fn register(&self, form: &RegisterUser) -> AppResult<User> {
        self.client
            .send_multipart(
                Method::POST,
                "/auth/register",
                "user",
                form,
                &[("profileImage", form.profile_image.as_ref())],
            )
            .await
    }

    pub async fn verify_email(&self, request: &VerifyEmail) -> AppResult<()> {
        self.client
            .execute(Method::POST, "/auth/verify-email", Some(request))
            .await
    }

    pub async fn forgot_password(&self, request: &ForgotPassword) -> AppResult<()> {
        self.client
            .execute(Method::POST, "/auth/forgot-password", Some(request))
            .await
    }

    pub async fn reset_password(&self, request: &ResetPassword) -> AppResult<()> {
        self.client
            .execute(Method::POST, "/auth/reset-password", Some(request))
            .await
    }

    pub async fn change_password(&self, request: &ChangePassword) -> AppResult<()> {
        self.client
            .execute(Method::PUT, "/auth/change-password", Some(request))
            .await
    }

    pub async fn update_profile(&self, form: &UpdateProfile) -> AppResult<User> {
        self.client
            .send_multipart(
                Method::PATCH,
                "/auth/profile",
                "user",
                form,
                &[("profileImage", form.profile_image.as_ref())],
            )
            .await
    }
}
