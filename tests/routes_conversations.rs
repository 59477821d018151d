#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use codementor::api::routes;
    use codementor::config::DatabaseConfig;
    use codementor::db::{connection, service::DbService, DbPool};
    use uuid::Uuid;

    fn get_test_db() -> DbPool {
        connection::get_connection(&DatabaseConfig {
            path: ":memory:".to_string(),
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn test_conversation_detail_includes_messages_and_snippets() {
        let pool = get_test_db();
        let (conversation_id, message_id) = {
            let conn = pool.lock().unwrap();
            let conversation = DbService::insert_conversation(&conn, Some("Parser review")).unwrap();
            let message = DbService::insert_message(
                &conn,
                conversation.id,
                "user",
                "Please review this rust code.",
            )
            .unwrap();
            DbService::insert_snippet(&conn, message.id, "fn main() {}", "rust").unwrap();
            (conversation.id, message.id)
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/conversations/{}", conversation_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Parser review");
        assert_eq!(body["messages"][0]["id"], message_id.to_string());
        assert_eq!(body["messages"][0]["snippets"][0]["content"], "fn main() {}");
        assert_eq!(body["messages"][0]["snippets"][0]["language"], "rust");
    }

    #[actix_web::test]
    async fn test_unknown_conversation_detail_returns_404() {
        let pool = get_test_db();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/conversations/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_snippet_query_failure_returns_500() {
        let pool = get_test_db();
        let conversation_id = {
            let conn = pool.lock().unwrap();
            let conversation = DbService::insert_conversation(&conn, None).unwrap();
            DbService::insert_message(&conn, conversation.id, "user", "hello").unwrap();
            conn.execute_batch("DROP TABLE snippets").unwrap();
            conversation.id
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/conversations/{}", conversation_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_list_messages_db_failure_is_500_not_404() {
        let pool = get_test_db();
        {
            let conn = pool.lock().unwrap();
            conn.execute_batch("DROP TABLE conversations").unwrap();
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/conversations/{}/messages", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
