use actix_web::{get, post, web, HttpResponse, Result as WebResult};
use uuid::Uuid;

use crate::api::models::{
    ConversationDetail, CreateConversationRequest, MessageDetail, PaginationQuery,
};
use crate::db::{service::DbService, DbPool};

// --- Conversations ---

#[post("")]
pub async fn create_conversation(
    pool: web::Data<DbPool>,
    req: web::Json<CreateConversationRequest>,
) -> WebResult<HttpResponse> {
    let conn = pool.lock().unwrap();
    let req = req.into_inner();

    match DbService::insert_conversation(&conn, req.title.as_deref()) {
        Ok(conversation) => Ok(HttpResponse::Created().json(conversation)),
        Err(e) => Ok(HttpResponse::InternalServerError().body(e.to_string())),
    }
}

#[get("")]
pub async fn list_conversations(
    pool: web::Data<DbPool>,
    query: web::Query<PaginationQuery>,
) -> WebResult<HttpResponse> {
    let conn = pool.lock().unwrap();

    match DbService::list_conversations(&conn, query.limit, query.offset) {
        Ok(conversations) => Ok(HttpResponse::Ok().json(conversations)),
        Err(e) => Ok(HttpResponse::InternalServerError().body(e.to_string())),
    }
}

#[get("/{id}")]
pub async fn get_conversation(
    pool: web::Data<DbPool>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    let conversation = match DbService::get_conversation(&conn, id) {
        Ok(Some(c)) => c,
        Ok(None) => return Ok(HttpResponse::NotFound().body("Conversation not found")),
        Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
    };

    let messages = match DbService::get_messages(&conn, id) {
        Ok(msgs) => msgs,
        Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
    };

    let mut details = Vec::with_capacity(messages.len());
    for message in messages {
        let snippets = match DbService::get_snippets(&conn, message.id) {
            Ok(s) => s,
            Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
        };
        details.push(MessageDetail { message, snippets });
    }

    Ok(HttpResponse::Ok().json(ConversationDetail {
        conversation,
        messages: details,
    }))
}

#[get("/{id}/messages")]
pub async fn get_messages(
    pool: web::Data<DbPool>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    match DbService::get_conversation(&conn, id) {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(HttpResponse::NotFound().body("Conversation not found")),
        Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
    }

    match DbService::get_messages(&conn, id) {
        Ok(messages) => Ok(HttpResponse::Ok().json(messages)),
        Err(e) => Ok(HttpResponse::InternalServerError().body(e.to_string())),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .service(create_conversation)
            .service(list_conversations)
            .service(get_conversation)
            .service(get_messages),
    );
}
