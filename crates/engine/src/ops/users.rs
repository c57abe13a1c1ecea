use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, prelude::*};

use crate::{EngineError, NewUserCmd, ResultEngine, User, error::is_unique_violation, users};

use super::Engine;

impl Engine {
    /// Register a user. Emails are unique, compared in lower case.
    pub async fn create_user(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        let cmd = cmd.normalized()?;
        let exists = users::Entity::find()
            .filter(users::Column::Email.eq(cmd.email.as_str()))
            .one(&self.database)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::Conflict("email already registered".to_string()));
        }

        let now = Utc::now();
        let model = users::ActiveModel {
            id: ActiveValue::NotSet,
            first_name: ActiveValue::Set(cmd.first_name),
            last_name: ActiveValue::Set(cmd.last_name),
            email: ActiveValue::Set(cmd.email),
            password: ActiveValue::Set(cmd.password_hash),
            push_token: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        // A concurrent registration can still win the race to the unique index.
        let model = model.insert(&self.database).await.map_err(|err| {
            if is_unique_violation(&err) {
                EngineError::Conflict("email already registered".to_string())
            } else {
                EngineError::Database(err)
            }
        })?;
        tracing::info!(user_id = model.id, "user registered");
        Ok(model.into())
    }

    pub async fn user(&self, user_id: i32) -> ResultEngine<User> {
        let model = self.require_user(&self.database, user_id).await?;
        Ok(model.into())
    }

    /// Look a user up by email, for credential checks.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }

    /// Set or clear the user's notification address.
    pub async fn update_push_token(&self, user_id: i32, token: Option<&str>) -> ResultEngine<User> {
        let model = self.require_user(&self.database, user_id).await?;
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);
        let mut active: users::ActiveModel = model.into();
        active.push_token = ActiveValue::Set(token);
        active.updated_at = ActiveValue::Set(Utc::now());
        let model = active.update(&self.database).await?;
        Ok(model.into())
    }
}
