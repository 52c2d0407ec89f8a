//! Authentication service and the in-memory session

use std::sync::{Arc, PoisonError, RwLock};

use validator::Validate;

use crate::{
    api::auth::AuthApi,
    cache::QueryCache,
    error::{AppError, AppResult},
    models::user::{
        ChangePassword, ForgotPassword, LoginRequest, RegisterUser, ResetPassword, UpdateProfile,
        User, VerifyEmail,
    },
    validation::FormValidate,
};

/// Currently logged-in user. The cookie itself lives in the HTTP client.
#[derive(Clone, Default)]
pub struct Session {
    user: Arc<RwLock<Option<User>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn require_user(&self) -> AppResult<User> {
        self.current_user()
            .ok_or_else(|| AppError::Authentication("Not logged in".to_string()))
    }

    pub fn set(&self, user: User) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn clear(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Clone)]
pub struct AuthService {
    api: AuthApi,
    session: Session,
    cache: QueryCache,
}

impl AuthService {
    pub fn new(api: AuthApi, session: Session, cache: QueryCache) -> Self {
        Self { api, session, cache }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn login(&self, request: &LoginRequest) -> AppResult<User> {
        request.validate()?;
        let user = self.api.login(request).await?;
        tracing::info!("Logged in as {}", user.email);
        // Cached queries belong to whoever was logged in before
        self.cache.clear();
        self.session.set(user.clone());
        Ok(user)
    }

    /// Clears local state even when the backend call fails
    pub async fn logout(&self) -> AppResult<()> {
        let result = self.api.logout().await;
        if let Err(e) = &result {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.session.clear();
        self.cache.clear();
        tracing::info!("Session cleared");
        result
    }

    /// Pick up an existing cookie session. A 401 means nobody is logged in.
    pub async fn restore_session(&self) -> AppResult<Option<User>> {
        match self.api.me().await {
            Ok(user) => {
                tracing::info!("Restored session for {}", user.email);
                self.session.set(user.clone());
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::debug!("No active session");
                self.session.clear();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn register(&self, form: &RegisterUser) -> AppResult<User> {
        form.validate_form()?;
        self.api.register(form).await
    }

    pub async fn verify_email(&self, request: &VerifyEmail) -> AppResult<()> {
        request.validate()?;
        self.api.verify_email(request).await
    }

    pub async fn forgot_password(&self, request: &ForgotPassword) -> AppResult<()> {
        request.validate()?;
        self.api.forgot_password(request).await
    }

    pub async fn reset_password(&self, request: &ResetPassword) -> AppResult<()> {
        request.validate()?;
        self.api.reset_password(request).await
    }

    pub async fn change_password(&self, request: &ChangePassword) -> AppResult<()> {
        self.session.require_user()?;
        request.validate()?;
        self.api.change_password(request).await
    }

    pub async fn update_profile(&self, form: &UpdateProfile) -> AppResult<User> {
        self.session.require_user()?;
        form.validate_form()?;
        let user = self.api.update_profile(form).await?;
        self.session.set(user.clone());
        Ok(user)
    }
}
