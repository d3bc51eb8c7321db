use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::accounts::User;
use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::pagination::Page;

use crate::models::{CreateUserRequest, UpdateUserRequest, UserError, UserQuery};

pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_users(&self, query: UserQuery) -> Result<Page<User>, AppError> {
        debug!("Listing users with query: {:?}", query);

        let tables = self.db.read().await;
        let users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .filter(|u| query.active.map_or(true, |active| u.active == active))
            .cloned()
            .collect();

        Ok(Page::paginate(users, query.limit, query.offset))
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, AppError> {
        debug!("Fetching user: {}", user_id);

        let tables = self.db.read().await;
        Ok(tables.get::<User>(user_id)?.clone())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        debug!("Creating user: {}", request.username);

        require_text("username", &request.username)?;
        require_text("phone", &request.phone)?;

        let user = User {
            id: 0,
            username: request.username.trim().to_string(),
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            phone: request.phone,
            active: request.active.unwrap_or(true),
            created_at: Utc::now(),
        };

        let mut tx = self.db.begin().await;
        let user = tx.insert(user)?;
        tx.commit().await?;

        info!("User {} created with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn update_user(&self, user_id: i64, request: UpdateUserRequest) -> Result<User, AppError> {
        debug!("Updating user: {}", user_id);

        let mut tx = self.db.begin().await;
        let mut user = tx.get::<User>(user_id)?.clone();

        if let Some(role) = request.role {
            if role != user.role {
                return Err(UserError::RoleChange.into());
            }
        }
        if let Some(username) = request.username {
            require_text("username", &username)?;
            user.username = username.trim().to_string();
        }
        if let Some(email) = request.email {
            user.email = Some(email);
        }
        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = request.phone {
            require_text("phone", &phone)?;
            user.phone = phone;
        }
        if let Some(active) = request.active {
            user.active = active;
        }

        let user = tx.update(user)?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        debug!("Deleting user: {}", user_id);

        let mut tx = self.db.begin().await;
        tx.delete::<User>(user_id)?;
        tx.commit().await?;

        info!("User {} deleted", user_id);
        Ok(())
    }

    /// The stored user record behind the caller's token.
    pub async fn get_profile(&self, identity: &Identity) -> Result<User, AppError> {
        debug!("Fetching profile for user: {}", identity.user_id);

        let tables = self.db.read().await;
        tables
            .users
            .get(identity.user_id)
            .cloned()
            .ok_or_else(|| UserError::ProfileNotFound.into())
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), UserError> {
    if value.trim().is_empty() {
        return Err(UserError::Blank(field));
    }
    Ok(())
}
