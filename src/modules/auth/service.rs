use tracing::instrument;
use wayfare_auth::{TokenSubject, issue_token_pair, verify_refresh_token};
use wayfare_config::JwtConfig;
use wayfare_core::{
    AppError, FieldError, hash_password_with_cost, verify_password, verify_password_missing,
};
use wayfare_models::{
    AuthResponse, Email, LoginRequest, PublicUser, RefreshTokenRequest, SignupRequest, TokenPair,
    UserId, UserStatus,
};
use wayfare_observability::{track_login, track_tokens_issued, track_user_created};

use crate::store::{NewUser, UserStore};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn issue_tokens(subject: &TokenSubject, jwt_config: &JwtConfig) -> Result<TokenPair, AppError> {
    let tokens = issue_token_pair(subject, jwt_config)?;
    track_tokens_issued("access");
    track_tokens_issued("refresh");
    Ok(tokens)
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email, role = %dto.role))]
    pub async fn signup(
        store: &dyn UserStore,
        dto: SignupRequest,
        jwt_config: &JwtConfig,
        bcrypt_cost: u32,
    ) -> Result<AuthResponse, AppError> {
        let email = Email::new(&dto.email)
            .map_err(|_| AppError::validation(vec![FieldError::new("email", "Invalid email address")]))?;

        if store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!("Email already registered")));
        }

        let password_hash = hash_password_with_cost(&dto.password, bcrypt_cost)?;

        let user = store
            .create_user(NewUser {
                email,
                password_hash,
                first_name: dto.first_name,
                last_name: dto.last_name,
                phone_number: dto.phone_number,
                role: dto.role,
                status: UserStatus::Active,
            })
            .await
            .map_err(|e| e.into_app_error("User not found"))?;

        let tokens = issue_tokens(&TokenSubject::from(&user), jwt_config)?;
        track_user_created(user.role.as_str());
        tracing::info!(user_id = %user.id, "User signed up");

        Ok(AuthResponse::new(tokens, PublicUser::from(user)))
    }

    /// Unknown emails still pay for one bcrypt round at `bcrypt_cost`, so
    /// response time does not reveal whether an account exists.
    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        store: &dyn UserStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
        bcrypt_cost: u32,
    ) -> Result<AuthResponse, AppError> {
        let user = match Email::new(&dto.email) {
            Ok(email) => store.find_user_by_email(&email).await?,
            Err(_) => None,
        };

        let user = match user {
            Some(user) if verify_password(&dto.password, &user.password_hash) => Some(user),
            Some(_) => None,
            None => {
                verify_password_missing(&dto.password, bcrypt_cost);
                None
            }
        };

        let Some(user) = user else {
            track_login("invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if user.status.is_locked() {
            track_login("locked");
            return Err(AppError::forbidden(format!("Account is {}", user.status)));
        }

        let tokens = issue_tokens(&TokenSubject::from(&user), jwt_config)?;
        track_login("success");

        Ok(AuthResponse::new(tokens, PublicUser::from(user)))
    }

    /// Issues a fresh pair from the identity as it is stored now, so role and
    /// status changes show up in the new claims.
    #[instrument(skip_all)]
    pub async fn refresh(
        store: &dyn UserStore,
        dto: RefreshTokenRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let claims = verify_refresh_token(&dto.refresh_token, jwt_config)
            .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token"))?;

        let user = store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token"))?;

        issue_tokens(&TokenSubject::from(&user), jwt_config)
    }

    #[instrument(skip(store))]
    pub async fn me(store: &dyn UserStore, user_id: UserId) -> Result<PublicUser, AppError> {
        store
            .find_user_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}
