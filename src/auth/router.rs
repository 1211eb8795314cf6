use std::sync::LazyLock;

use axum::{Router, routing::post};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::router::AppState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
    pub phone_number: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    #[serde(default)]
    pub allergies: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/account/login", post(self::post::login))
        .route("/api/account/login/otp/verify", post(self::post::verify))
        .route("/api/account/signup", post(self::post::signup))
        .route("/api/account/logout", post(self::post::logout))
}

mod post {
    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use tracing::error;

    use super::*;
    use crate::auth::otp;
    use crate::auth::user::{AuthSession, Credentials};
    use crate::repositories::{
        UserAllergyRepository, UserOtpRepository, UserRepository,
        user::NewUser, user_allergy::NewUserAllergy, user_otp::NewUserOtp,
    };
    use crate::routes::{failure, mutation_failure, no_data, success};
    use crate::sms;

    /// Issues a fresh code for the user behind `payload.phone_number` and
    /// texts it out. Nothing about the session changes until verification.
    pub async fn login(
        State(state): State<AppState>,
        Json(payload): Json<LoginPayload>,
    ) -> impl IntoResponse {
        let users = UserRepository::new(state.db.clone());
        let user = match users.find_by_phone(&payload.phone_number).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return failure(StatusCode::NOT_FOUND, "no account for that phone number");
            }
            Err(e) => {
                error!("login lookup failed: {e}");
                return failure(StatusCode::INTERNAL_SERVER_ERROR, "persistence failure");
            }
        };
        if user.locked {
            return failure(StatusCode::FORBIDDEN, "this account is locked");
        }

        let code = otp::generate_code();
        let otps = UserOtpRepository::new(state.db.clone());
        let issued = otps
            .create(NewUserOtp {
                user_id: user.id,
                otp: code.clone(),
                expiry: otp::expiry_from(chrono::Utc::now().naive_utc()),
            })
            .await;
        if let Err(e) = issued {
            return mutation_failure(e);
        }

        match state
            .sms
            .send_sms(&user.phone_number, &otp::delivery_message(&code))
            .await
        {
            Ok(()) => no_data(),
            Err(e) => failure(StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }

    pub async fn verify(
        mut auth_session: AuthSession,
        Json(payload): Json<VerifyPayload>,
    ) -> impl IntoResponse {
        let creds = Credentials {
            phone_number: payload.phone_number,
            otp: payload.otp,
        };
        let user = match auth_session.authenticate(creds).await {
            Ok(Some(user)) => user,
            Ok(None) => return failure(StatusCode::UNAUTHORIZED, "invalid or expired code"),
            Err(e) => {
                error!("otp verification failed: {e}");
                return failure(StatusCode::INTERNAL_SERVER_ERROR, "verification failed");
            }
        };

        if auth_session.login(&user).await.is_err() {
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "could not start session");
        }
        success(user)
    }

    pub async fn signup(
        State(state): State<AppState>,
        Json(payload): Json<SignupPayload>,
    ) -> impl IntoResponse {
        if let Err(message) = validate_signup(&payload) {
            return failure(StatusCode::BAD_REQUEST, message);
        }

        let users = UserRepository::new(state.db.clone());
        match users.find_by_phone(&payload.phone_number).await {
            Ok(Some(_)) => {
                return failure(StatusCode::CONFLICT, "that phone number is already registered");
            }
            Ok(None) => {}
            Err(e) => {
                error!("signup lookup failed: {e}");
                return failure(StatusCode::INTERNAL_SERVER_ERROR, "persistence failure");
            }
        }
        match users.find_by_email(&payload.email).await {
            Ok(Some(_)) => {
                return failure(StatusCode::CONFLICT, "that email is already registered");
            }
            Ok(None) => {}
            Err(e) => {
                error!("signup lookup failed: {e}");
                return failure(StatusCode::INTERNAL_SERVER_ERROR, "persistence failure");
            }
        }

        let created = users
            .create(NewUser {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                date_of_birth: payload.date_of_birth,
                phone_number: payload.phone_number,
            })
            .await;
        let view = match created {
            Ok(view) => view,
            Err(e) => return mutation_failure(e),
        };

        let allergies = UserAllergyRepository::new(state.db.clone());
        for allergy in payload.allergies {
            if allergy.trim().is_empty() {
                continue;
            }
            if let Err(e) = allergies
                .create(NewUserAllergy {
                    user_id: view.user.id,
                    allergy,
                })
                .await
            {
                error!("could not record allergy: {e}");
            }
        }

        success(view)
    }

    pub async fn logout(mut auth_session: AuthSession) -> impl IntoResponse {
        match auth_session.logout().await {
            Ok(_) => no_data(),
            Err(_) => failure(StatusCode::INTERNAL_SERVER_ERROR, "could not end session"),
        }
    }

    fn validate_signup(payload: &SignupPayload) -> Result<(), String> {
        if payload.first_name.trim().is_empty() {
            return Err("first name is required".into());
        }
        if payload.last_name.trim().is_empty() {
            return Err("last name is required".into());
        }
        if !EMAIL_RE.is_match(&payload.email) {
            return Err("email address does not look valid".into());
        }
        sms::validate_recipient(&payload.phone_number).map_err(|e| e.to_string())?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn payload() -> SignupPayload {
            SignupPayload {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
                phone_number: "+15555551212".into(),
                allergies: vec![],
            }
        }

        #[test]
        fn accepts_a_complete_signup() {
            assert!(validate_signup(&payload()).is_ok());
        }

        #[test]
        fn rejects_blank_names_and_bad_contacts() {
            let mut p = payload();
            p.first_name = "  ".into();
            assert!(validate_signup(&p).is_err());

            let mut p = payload();
            p.email = "ada-at-example".into();
            assert!(validate_signup(&p).is_err());

            let mut p = payload();
            p.phone_number = "call me".into();
            assert!(validate_signup(&p).is_err());
        }
    }
}
