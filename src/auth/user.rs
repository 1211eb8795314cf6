use async_session::async_trait;
use axum_login::{AuthUser, AuthnBackend, UserId};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::entities::user;
use crate::repositories::{
    MutationError, UserOtpRepository, UserRepository, user::UserChanges, user_otp::UserOtpChanges,
};

impl AuthUser for user::Model {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        // Changing the phone number invalidates existing sessions.
        self.phone_number.as_bytes()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub phone_number: String,
    pub otp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Seaorm(sea_orm::DbErr),

    #[error(transparent)]
    Mutation(MutationError),
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: DatabaseConnection,
}

impl Backend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = user::Model;
    type Credentials = Credentials;
    type Error = BackendError;

    /// A login succeeds when the newest unconsumed code for the phone's user
    /// is unexpired and matches. The code is consumed either way the session
    /// goes afterwards, and the user's `verified`/`last_login` are stamped.
    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let users = UserRepository::new(self.db.clone());
        let otps = UserOtpRepository::new(self.db.clone());

        let user = users
            .find_by_phone(&creds.phone_number)
            .await
            .map_err(Self::Error::Seaorm)?;
        let Some(user) = user else {
            return Ok(None);
        };
        if user.locked {
            debug!("refusing login for locked user {}", user.id);
            return Ok(None);
        }

        let pending = otps
            .latest_active_for_user(user.id)
            .await
            .map_err(Self::Error::Seaorm)?;
        let Some(pending) = pending else {
            return Ok(None);
        };
        if pending.expiry < Utc::now().naive_utc() || pending.otp != creds.otp {
            return Ok(None);
        }

        otps.update(
            pending.id,
            UserOtpChanges {
                consumed: Some(true),
            },
        )
        .await
        .map_err(Self::Error::Mutation)?;

        let updated = users
            .update(
                user.id,
                UserChanges {
                    verified: Some(true),
                    last_login: Some(Utc::now().naive_utc()),
                    ..Default::default()
                },
            )
            .await
            .map_err(Self::Error::Mutation)?;

        Ok(Some(updated.user))
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let users = UserRepository::new(self.db.clone());
        let view = users
            .get_by_id(*user_id)
            .await
            .map_err(Self::Error::Seaorm)?;
        Ok(view.map(|v| v.user))
    }
}

// We use a type alias for convenience.
//
// Note that we've supplied our concrete backend here.
pub type AuthSession = axum_login::AuthSession<Backend>;

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::*;
    use crate::entities::{user, user_otp};

    fn stamp() -> chrono::NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn a_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            phone_number: "+15555551212".into(),
            verified: false,
            locked: false,
            last_login: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn a_code(user_id: Uuid, otp: &str, expiry: chrono::NaiveDateTime) -> user_otp::Model {
        user_otp::Model {
            id: Uuid::new_v4(),
            user_id,
            otp: otp.into(),
            expiry,
            consumed: false,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    #[tokio::test]
    async fn wrong_code_is_rejected_without_consuming_anything() {
        let user = a_user();
        let code = a_code(user.id, "123456", stamp() + TimeDelta::minutes(5));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user.clone()]])
            .append_query_results([vec![code]])
            .into_connection();

        let outcome = Backend::new(db)
            .authenticate(Credentials {
                phone_number: user.phone_number,
                otp: "654321".into(),
            })
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let user = a_user();
        let code = a_code(user.id, "123456", stamp() - TimeDelta::minutes(1));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user.clone()]])
            .append_query_results([vec![code]])
            .into_connection();

        let outcome = Backend::new(db)
            .authenticate(Credentials {
                phone_number: user.phone_number,
                otp: "123456".into(),
            })
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn locked_users_cannot_log_in() {
        let user = user::Model {
            locked: true,
            ..a_user()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user.clone()]])
            .into_connection();

        let outcome = Backend::new(db)
            .authenticate(Credentials {
                phone_number: user.phone_number,
                otp: "123456".into(),
            })
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
}
