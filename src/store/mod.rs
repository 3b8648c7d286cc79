/// Persistence
///
/// Handlers only see the `UserStore` and `TodoStore` traits. `PgStore` backs
/// them with Postgres; `InMemoryStore` keeps everything in process and is used
/// by the test suite and the `memory` backend.

use async_trait::async_trait;
use serde::Serialize;

use crate::auth::OwnerScope;
use crate::error::AppError;

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Stored user record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub role: String,
    pub phone_number: Option<String>,
}

/// User record before it has an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub role: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: i32,
}

/// Full replacement of a todo's editable fields
#[derive(Debug, Clone)]
pub struct TodoUpdate {
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return its id; a taken username is a
    /// `DatabaseError::UniqueConstraintViolation`.
    async fn insert_user(&self, user: NewUser) -> Result<i64, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Returns false when no such user exists
    async fn update_password_hash(&self, id: i64, hashed_password: &str)
        -> Result<bool, AppError>;

    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, AppError>;
}

/// Todo store. Everything except the two admin operations is owner-scoped.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_todos(&self, scope: OwnerScope) -> Result<Vec<Todo>, AppError>;

    async fn find_todo(&self, scope: OwnerScope, id: i64) -> Result<Option<Todo>, AppError>;

    async fn insert_todo(&self, scope: OwnerScope, todo: NewTodo) -> Result<Todo, AppError>;

    async fn update_todo(
        &self,
        scope: OwnerScope,
        id: i64,
        update: TodoUpdate,
    ) -> Result<Option<Todo>, AppError>;

    /// Returns false when nothing owned by `scope` had this id
    async fn delete_todo(&self, scope: OwnerScope, id: i64) -> Result<bool, AppError>;

    async fn list_all_todos(&self) -> Result<Vec<Todo>, AppError>;

    async fn delete_any_todo(&self, id: i64) -> Result<bool, AppError>;
}
