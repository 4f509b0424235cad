use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, Either, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::models::todo::{ListFilter, ListQuery, TodoData, TodoPayload};
use crate::store::{StoreError, TodoStore};

/// Error body returned for every failed request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) | StoreError::InvalidState(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            StoreError::Storage(_) => "internal storage error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}

/// Create and update accept the title as JSON or as a urlencoded form. A body
/// that is neither leaves the title missing.
type Payload = Option<Either<web::Json<TodoPayload>, web::Form<TodoPayload>>>;

fn payload_title(payload: Payload) -> Option<String> {
    match payload? {
        Either::Left(json) => json.into_inner().title,
        Either::Right(form) => form.into_inner().title,
    }
}

#[get("/todos/")]
pub async fn list_todos(store: web::Data<TodoStore>, query: web::Query<ListQuery>) -> Result<HttpResponse, StoreError> {
    let filter = query.into_inner().filter;
    let todos = store.list(filter)?;
    match filter {
        ListFilter::Active => Ok(HttpResponse::Ok().json(todos.iter().map(TodoData::from).collect::<Vec<_>>())),
        ListFilter::Deleted | ListFilter::All => Ok(HttpResponse::Ok().json(todos)),
    }
}

#[post("/todos/create/")]
pub async fn create_todo(store: web::Data<TodoStore>, payload: Payload) -> Result<HttpResponse, StoreError> {
    let title = payload_title(payload);
    let todo = store.create(title.as_deref())?;
    Ok(HttpResponse::Created().json(TodoData::from(todo)))
}

#[put("/todos/{id}/update/")]
pub async fn update_todo(store: web::Data<TodoStore>, id: web::Path<i32>, payload: Payload) -> Result<HttpResponse, StoreError> {
    let title = payload_title(payload);
    let todo = store.update(id.into_inner(), title.as_deref())?;
    Ok(HttpResponse::Ok().json(TodoData::from(todo)))
}

#[delete("/todos/{id}/delete/")]
pub async fn delete_todo(store: web::Data<TodoStore>, id: web::Path<i32>) -> Result<HttpResponse, StoreError> {
    store.delete(id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[put("/todos/{id}/undo-delete/")]
pub async fn undo_delete_todo(store: web::Data<TodoStore>, id: web::Path<i32>) -> Result<HttpResponse, StoreError> {
    store.undo_delete(id.into_inner())?;
    Ok(HttpResponse::Ok().finish())
}

#[post("/todos/undo-changes/")]
pub async fn undo_changes(store: web::Data<TodoStore>) -> Result<HttpResponse, StoreError> {
    let todos = store.undo_changes()?;
    Ok(HttpResponse::Ok().json(todos))
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse {
        error: format!("invalid query: {err}"),
    };
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse {
        error: "resource not found".to_string(),
    };
    actix_web::error::InternalError::from_response(err, HttpResponse::NotFound().json(body)).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(list_todos)
        .service(create_todo)
        .service(undo_changes)
        .service(update_todo)
        .service(delete_todo)
        .service(undo_delete_todo);
}
