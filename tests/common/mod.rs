#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wayfare::router::init_router;
use wayfare::state::AppState;
use wayfare::store::{MemoryStore, NewUser, UserStore};
use wayfare_auth::{TokenSubject, create_access_token};
use wayfare_config::{CorsConfig, JwtConfig};
use wayfare_core::hash_password_with_cost;
use wayfare_models::{Email, User, UserRole, UserStatus};

pub const TEST_PASSWORD: &str = "longenough1";
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604_800,
    }
}

pub fn generate_unique_email() -> String {
    format!("user-{}@example.com", uuid::Uuid::new_v4().simple())
}

pub fn setup_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        test_jwt_config(),
        CorsConfig::default(),
    )
    .with_bcrypt_cost(TEST_BCRYPT_COST);

    TestApp {
        router: init_router(state.clone()),
        store,
        state,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&body).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub fn signup_body(email: &str, role: &str) -> Value {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        json!({
            "email": email,
            "password": TEST_PASSWORD,
            "firstName": first_name,
            "lastName": last_name,
            "phoneNumber": "1234567890",
            "role": role,
        })
    }

    /// Signs up through the API and returns the response body.
    pub async fn signup(&self, role: &str) -> Value {
        let email = generate_unique_email();
        let (status, body) = self
            .request("POST", "/api/auth/signup", None, Some(Self::signup_body(&email, role)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body
    }

    /// Creates an active admin directly in the store, returning it with an access token.
    pub async fn seed_admin(&self) -> (User, String) {
        let user = self
            .store
            .create_user(NewUser {
                email: Email::new(generate_unique_email()).unwrap(),
                password_hash: hash_password_with_cost(TEST_PASSWORD, TEST_BCRYPT_COST).unwrap(),
                first_name: "Ada".to_string(),
                last_name: "Admin".to_string(),
                phone_number: "5550001111".to_string(),
                role: UserRole::Admin,
                status: UserStatus::Active,
            })
            .await
            .unwrap();

        let token = create_access_token(&TokenSubject::from(&user), &self.state.jwt_config).unwrap();
        (user, token)
    }

    /// Driver profile id for the user in a signup response.
    pub async fn driver_profile_id(&self, signup: &Value) -> String {
        let (status, body) = self
            .request(
                "GET",
                "/api/profile/driver",
                Some(signup["accessToken"].as_str().unwrap()),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn token(body: &Value) -> &str {
    body["accessToken"].as_str().unwrap()
}
