/// Todo Routes
///
/// Every query here is owner-scoped: the owner id comes from the verified
/// token and is part of the store query, so other users' todos are reported
/// as not found.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{require_owner, Claims, OwnerScope};
use crate::error::AppError;
use crate::store::{NewTodo, Todo, TodoStore, TodoUpdate};
use crate::validators::{is_valid_description, is_valid_id, is_valid_priority, is_valid_title};

#[derive(Deserialize)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i32,
}

#[derive(Deserialize)]
pub struct TodoUpdateRequest {
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
}

#[derive(Serialize)]
pub struct TodoEnvelope {
    pub message: String,
    pub todo: Todo,
}

/// GET /todos
pub async fn list_todos(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    let todos = store.list_todos(OwnerScope::of(&claims)).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// GET /todos/{todo_id}
pub async fn get_todo(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    let todo_id = is_valid_id(path.into_inner())?;

    let todo = require_owner(
        store.find_todo(OwnerScope::of(&claims), todo_id).await?,
        "Todo",
    )?;
    Ok(HttpResponse::Ok().json(todo))
}

/// POST /todos
pub async fn create_todo(
    claims: web::ReqData<Claims>,
    body: web::Json<TodoRequest>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    let new_todo = NewTodo {
        title: is_valid_title(&body.title)?,
        description: is_valid_description(&body.description)?,
        priority: is_valid_priority(body.priority)?,
    };

    let todo = store.insert_todo(OwnerScope::of(&claims), new_todo).await?;
    tracing::info!(user_id = claims.id, todo_id = todo.id, "Todo created");

    Ok(HttpResponse::Created().json(TodoEnvelope {
        message: "Todo created successfully".to_string(),
        todo,
    }))
}

/// PUT /todos/{todo_id}
pub async fn update_todo(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<TodoUpdateRequest>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    let todo_id = is_valid_id(path.into_inner())?;
    let update = TodoUpdate {
        title: is_valid_title(&body.title)?,
        description: is_valid_description(&body.description)?,
        priority: is_valid_priority(body.priority)?,
        complete: body.complete,
    };

    let todo = require_owner(
        store
            .update_todo(OwnerScope::of(&claims), todo_id, update)
            .await?,
        "Todo",
    )?;

    Ok(HttpResponse::Ok().json(TodoEnvelope {
        message: "Todo updated successfully".to_string(),
        todo,
    }))
}

/// DELETE /todos/{todo_id}
pub async fn delete_todo(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    let todo_id = is_valid_id(path.into_inner())?;

    let deleted = store.delete_todo(OwnerScope::of(&claims), todo_id).await?;
    require_owner(deleted.then_some(()), "Todo")?;

    tracing::info!(user_id = claims.id, todo_id = todo_id, "Todo deleted");
    Ok(HttpResponse::NoContent().finish())
}
