#[cfg(test)]
mod tests {
    use codementor::config::DatabaseConfig;
    use codementor::db::{connection, service::DbService, DbPool};

    // In memory database just for tests
    fn get_test_db() -> DbPool {
        connection::get_connection(&DatabaseConfig {
            path: ":memory:".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_conversation_lifecycle() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();

        // 1. Insert Conversation
        let conversation = DbService::insert_conversation(&conn, Some("Review my parser")).unwrap();
        assert_eq!(conversation.title.as_deref(), Some("Review my parser"));

        // 2. Get Conversation
        let fetched = DbService::get_conversation(&conn, conversation.id).unwrap().unwrap();
        assert_eq!(fetched.id, conversation.id);

        // 3. Untitled conversations are allowed
        let untitled = DbService::insert_conversation(&conn, None).unwrap();
        assert!(untitled.title.is_none());

        // 4. List Conversations
        let list = DbService::list_conversations(&conn, 10, 0).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_message_ordering_matches_insertion() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        let conversation = DbService::insert_conversation(&conn, None).unwrap();

        let m1 = DbService::insert_message(&conn, conversation.id, "user", "Please review this rust code.").unwrap();
        let m2 = DbService::insert_message(&conn, conversation.id, "assistant", "").unwrap();
        let m3 = DbService::insert_message(&conn, conversation.id, "user", "Thanks, now optimize it.").unwrap();

        assert_eq!(m1.conversation_id, conversation.id);
        assert_eq!(m2.content, "");

        let history = DbService::get_messages(&conn, conversation.id).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].id, m1.id);
        assert_eq!(history[1].id, m2.id);
        assert_eq!(history[2].id, m3.id);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
    }

    #[test]
    fn test_update_message_content_is_terminal_write() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        let conversation = DbService::insert_conversation(&conn, None).unwrap();

        let placeholder = DbService::insert_message(&conn, conversation.id, "assistant", "").unwrap();
        assert_eq!(placeholder.content, "");

        DbService::update_message_content(&conn, placeholder.id, "## Review\nLooks good.").unwrap();

        let stored = DbService::get_message(&conn, placeholder.id).unwrap().unwrap();
        assert_eq!(stored.content, "## Review\nLooks good.");
    }

    #[test]
    fn test_update_unknown_message_fails() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();

        let result = DbService::update_message_content(&conn, uuid::Uuid::new_v4(), "orphan");
        assert!(result.is_err());
    }

    #[test]
    fn test_snippet_attached_to_message() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        let conversation = DbService::insert_conversation(&conn, None).unwrap();
        let message = DbService::insert_message(&conn, conversation.id, "user", "Please review this python code.").unwrap();

        let snippet = DbService::insert_snippet(&conn, message.id, "print(1)", "python").unwrap();
        assert_eq!(snippet.message_id, message.id);
        assert_eq!(snippet.language, "python");

        let snippets = DbService::get_snippets(&conn, message.id).unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].content, "print(1)");
    }
}
