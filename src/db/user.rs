use color_eyre::{eyre::OptionExt, Result};
use libsql::params;
use ulid::Ulid;

use super::models::AuthUser;
use super::Db;

// Token issuance (signup/login flows, password handling) lives outside this
// service; these queries only cover what the auth guard and tests need.
impl Db {
    pub async fn create_user(&self, email: &str, display_name: &str) -> Result<i64> {
        let conn = self.db.connect()?;
        let user_id = conn
            .query(
                "INSERT INTO users (email, display_name) VALUES (?, ?) RETURNING id",
                params![email, display_name],
            )
            .await?
            .next()
            .await?
            .ok_or_eyre("could not get user id")?
            .get::<i64>(0)?;

        tracing::info!("new user created: id={user_id}, email={email}");
        Ok(user_id)
    }

    pub async fn create_user_session(&self, user_id: i64) -> Result<String> {
        let session = Ulid::new().to_string();
        let conn = self.db.connect()?;

        conn.execute(
            "INSERT INTO user_sessions (id, user_id) VALUES (?, ?)",
            params![session.clone(), user_id],
        )
        .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let conn = self.db.connect()?;
        let row = conn
            .query(
                r#"
                SELECT u.id, u.email, u.display_name
                FROM user_sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.id = ?
                "#,
                params![session_id],
            )
            .await?
            .next()
            .await?;

        match row {
            Some(row) => Ok(Some(libsql::de::from_row::<AuthUser>(&row)?)),
            None => Ok(None),
        }
    }
}
