use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::{delete, get, post, put, web, HttpResponse, ResponseError};

use crate::error::ApiError;
use crate::models::todo::{NewTodo, TodoChangeset, TodoId, TodoPatch};
use crate::repository::database::Database;

fn todo_location(todo_id: i32) -> String {
    format!("/todos/{}", todo_id)
}

#[post("/todos")]
pub async fn create_todo(
    db: web::Data<Database>,
    new_todo: web::Json<NewTodo>,
) -> Result<HttpResponse, ApiError> {
    let new_todo = new_todo.into_inner();
    let todo_id = web::block(move || db.create_todo(&new_todo)).await??;
    tracing::info!(todo_id, "todo created");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, todo_location(todo_id)))
        .finish())
}

#[get("/todos/{id}")]
pub async fn get_todo_by_id(
    db: web::Data<Database>,
    todo_id: web::Path<TodoId>,
) -> Result<HttpResponse, ApiError> {
    let todo_id = todo_id.into_inner().get();
    let todo = web::block(move || db.get_todo_by_id(todo_id)).await??;
    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(todo)),
        None => Err(ApiError::NotFound(todo_id)),
    }
}

#[get("/todos")]
pub async fn get_todos(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let todos = web::block(move || db.get_todos()).await??;
    Ok(HttpResponse::Ok().json(todos))
}

#[delete("/todos/{id}")]
pub async fn delete_todo_by_id(
    db: web::Data<Database>,
    todo_id: web::Path<TodoId>,
) -> Result<HttpResponse, ApiError> {
    let todo_id = todo_id.into_inner().get();
    let deleted = web::block(move || db.delete_todo_by_id(todo_id)).await??;
    tracing::info!(todo_id, deleted, "todo delete handled");
    Ok(HttpResponse::NoContent().finish())
}

#[put("/todos/{id}")]
pub async fn update_todo_by_id(
    db: web::Data<Database>,
    todo_id: web::Path<TodoId>,
    patch: web::Json<TodoPatch>,
) -> Result<HttpResponse, ApiError> {
    let todo_id = todo_id.into_inner().get();
    let changes = TodoChangeset::from(patch.into_inner());
    let updated = web::block(move || db.update_todo_by_id(todo_id, &changes)).await??;
    tracing::info!(todo_id, updated, "todo update handled");
    Ok(HttpResponse::NoContent()
        .insert_header((header::LOCATION, todo_location(todo_id)))
        .finish())
}

/// Oversized bodies keep actix's 413; every other body failure is a 400.
fn json_error(err: JsonPayloadError) -> ApiError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::Payload {
                status: err.status_code(),
                message: err.to_string(),
            }
        }
        _ => ApiError::InvalidInput(err.to_string()),
    }
}

/// Registers the todo routes and turns path/JSON extraction failures into
/// `{"message": ...}` responses.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default().error_handler(|err, _req| json_error(err).into()),
    )
    .service(create_todo)
    .service(get_todo_by_id)
    .service(get_todos)
    .service(delete_todo_by_id)
    .service(update_todo_by_id);
}
