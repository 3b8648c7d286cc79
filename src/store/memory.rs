use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::auth::OwnerScope;
use crate::error::{AppError, DatabaseError};
use crate::store::{NewTodo, NewUser, Todo, TodoStore, TodoUpdate, User, UserStore};

/// Process-local store with the same uniqueness and owner-scoping rules as
/// the Postgres schema. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    last_user_id: i64,
    last_todo_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<i64, AppError> {
        let mut tables = self.inner.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Username already registered".to_string(),
            )));
        }
        if user.hashed_password.is_empty() {
            return Err(AppError::Database(DatabaseError::UnexpectedError(
                "empty password hash".to_string(),
            )));
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.users.insert(
            id,
            User {
                id,
                email: user.email,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
                hashed_password: user.hashed_password,
                is_active: user.is_active,
                role: user.role,
                phone_number: user.phone_number,
            },
        );
        Ok(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        Ok(match tables.users.get_mut(&id) {
            Some(user) => {
                user.hashed_password = hashed_password.to_string();
                true
            }
            None => false,
        })
    }

    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        Ok(match tables.users.get_mut(&id) {
            Some(user) => {
                user.phone_number = Some(phone_number.to_string());
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn list_todos(&self, scope: OwnerScope) -> Result<Vec<Todo>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.owner_id == scope.owner_id())
            .cloned()
            .collect())
    }

    async fn find_todo(&self, scope: OwnerScope, id: i64) -> Result<Option<Todo>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .todos
            .get(&id)
            .filter(|t| t.owner_id == scope.owner_id())
            .cloned())
    }

    async fn insert_todo(&self, scope: OwnerScope, todo: NewTodo) -> Result<Todo, AppError> {
        let mut tables = self.inner.write().await;

        // Mirrors the foreign key on todos.owner_id
        if !tables.users.contains_key(&scope.owner_id()) {
            return Err(AppError::Database(DatabaseError::UnexpectedError(
                "todo owner does not exist".to_string(),
            )));
        }

        tables.last_todo_id += 1;
        let todo = Todo {
            id: tables.last_todo_id,
            title: todo.title,
            description: todo.description,
            priority: todo.priority,
            complete: false,
            owner_id: scope.owner_id(),
        };
        tables.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_todo(
        &self,
        scope: OwnerScope,
        id: i64,
        update: TodoUpdate,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.inner.write().await;
        let todo = match tables.todos.get_mut(&id) {
            Some(todo) if todo.owner_id == scope.owner_id() => todo,
            _ => return Ok(None),
        };

        todo.title = update.title;
        todo.description = update.description;
        todo.priority = update.priority;
        todo.complete = update.complete;
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, scope: OwnerScope, id: i64) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        let owned = tables
            .todos
            .get(&id)
            .is_some_and(|t| t.owner_id == scope.owner_id());
        if owned {
            tables.todos.remove(&id);
        }
        Ok(owned)
    }

    async fn list_all_todos(&self) -> Result<Vec<Todo>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.todos.values().cloned().collect())
    }

    async fn delete_any_todo(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        Ok(tables.todos.remove(&id).is_some())
    }
}
