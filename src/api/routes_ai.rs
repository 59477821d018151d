use actix_web::{post, web, HttpResponse, Result as WebResult};

use crate::ai::{contains_injection_marker, prompts, Orchestrator, TurnError};
use crate::api::models::{AiGenerateRequest, AiModifyRequest, AiReviewRequest, MessageIdResponse};
use crate::db::{service::DbService, DbPool};
use crate::llm::models::Message as LlmMessage;

fn turn_response(result: Result<uuid::Uuid, TurnError>) -> WebResult<HttpResponse> {
    match result {
        Ok(message_id) => Ok(HttpResponse::Ok().json(MessageIdResponse { message_id })),
        Err(TurnError::ConversationNotFound) => {
            Ok(HttpResponse::NotFound().body("Conversation not found"))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().body(e.to_string())),
    }
}

#[post("/review")]
pub async fn review(
    pool: web::Data<DbPool>,
    orchestrator: web::Data<Orchestrator>,
    req: web::Json<AiReviewRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();

    // Rejected before anything is written
    if contains_injection_marker(&req.code) {
        return Ok(HttpResponse::UnprocessableEntity()
            .body("Security violation: Potential prompt injection detected."));
    }

    let language = req.language.unwrap_or_else(|| "unknown".to_string());

    // The user's turn and the submitted snippet are stored up front; the
    // assistant message is created by run_turn.
    {
        let conn = pool.lock().unwrap();

        match DbService::get_conversation(&conn, req.conversation_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(HttpResponse::NotFound().body("Conversation not found")),
            Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
        }

        let user_msg = match DbService::insert_message(
            &conn,
            req.conversation_id,
            "user",
            &format!("Please review this {} code.", language),
        ) {
            Ok(m) => m,
            Err(e) => return Ok(HttpResponse::InternalServerError().body(e.to_string())),
        };

        if let Err(e) = DbService::insert_snippet(&conn, user_msg.id, &req.code, &language) {
            return Ok(HttpResponse::InternalServerError().body(e.to_string()));
        }
    }

    let prompt = vec![
        LlmMessage::system(prompts::system_prompt()),
        LlmMessage::user(prompts::code_review_prompt(&req.code, &language)),
    ];

    turn_response(orchestrator.run_turn(req.conversation_id, prompt))
}

#[post("/modify")]
pub async fn modify(
    orchestrator: web::Data<Orchestrator>,
    req: web::Json<AiModifyRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();
    let language = req.language.unwrap_or_else(|| "unknown".to_string());

    let prompt = vec![
        LlmMessage::system(prompts::system_prompt()),
        LlmMessage::user(prompts::modify_code_prompt(
            &req.code,
            &req.instructions,
            &language,
        )),
    ];

    turn_response(orchestrator.run_turn(req.conversation_id, prompt))
}

#[post("/generate")]
pub async fn generate(
    orchestrator: web::Data<Orchestrator>,
    req: web::Json<AiGenerateRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();

    let prompt = vec![
        LlmMessage::system(prompts::system_prompt()),
        LlmMessage::user(prompts::generate_code_prompt(&req.prompt)),
    ];

    turn_response(orchestrator.run_turn(req.conversation_id, prompt))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ai")
            .service(review)
            .service(modify)
            .service(generate),
    );
}
