/// Admin Routes
///
/// Role check first, before the request touches any data.

use actix_web::{web, HttpResponse};

use crate::auth::{require_role, Claims, ADMIN_ROLE};
use crate::error::AppError;
use crate::store::TodoStore;
use crate::validators::is_valid_id;

/// GET /admin/todos
pub async fn list_all_todos(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    require_role(&claims, ADMIN_ROLE)?;

    let todos = store.list_all_todos().await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// DELETE /admin/todos/{todo_id}
pub async fn delete_any_todo(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, AppError> {
    require_role(&claims, ADMIN_ROLE)?;
    let todo_id = is_valid_id(path.into_inner())?;

    if !store.delete_any_todo(todo_id).await? {
        return Err(AppError::not_found("Todo"));
    }

    tracing::info!(admin_id = claims.id, todo_id = todo_id, "Todo deleted by admin");
    Ok(HttpResponse::NoContent().finish())
}
