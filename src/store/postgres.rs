use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::OwnerScope;
use crate::configuration::DatabaseSettings;
use crate::error::AppError;
use crate::store::{NewTodo, NewUser, Todo, TodoStore, TodoUpdate, User, UserStore};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, hashed_password, is_active, role, phone_number";
const TODO_COLUMNS: &str = "id, title, description, priority, complete, owner_id";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.connection_string())
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users
                (email, username, first_name, last_name, hashed_password, is_active, role, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.hashed_password)
        .bind(user.is_active)
        .bind(&user.role)
        .bind(&user.phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
            .bind(hashed_password)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET phone_number = $1 WHERE id = $2")
            .bind(phone_number)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_todos(&self, scope: OwnerScope) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE owner_id = $1 ORDER BY id",
            TODO_COLUMNS
        ))
        .bind(scope.owner_id())
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn find_todo(&self, scope: OwnerScope, id: i64) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE owner_id = $1 AND id = $2",
            TODO_COLUMNS
        ))
        .bind(scope.owner_id())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn insert_todo(&self, scope: OwnerScope, todo: NewTodo) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (title, description, priority, complete, owner_id)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.priority)
        .bind(scope.owner_id())
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update_todo(
        &self,
        scope: OwnerScope,
        id: i64,
        update: TodoUpdate,
    ) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = $1, description = $2, priority = $3, complete = $4
            WHERE owner_id = $5 AND id = $6
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.priority)
        .bind(update.complete)
        .bind(scope.owner_id())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn delete_todo(&self, scope: OwnerScope, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE owner_id = $1 AND id = $2")
            .bind(scope.owner_id())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all_todos(&self) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos ORDER BY id",
            TODO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn delete_any_todo(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
