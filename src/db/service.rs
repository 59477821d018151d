use crate::db::models::{CodeSnippet, Conversation, Message};
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Result as DbResult, Row};
use uuid::Uuid;

pub struct DbService;

impl DbService {
    // DuckDB timestamps are queried as VARCHAR in every SELECT below so we
    // don't depend on the driver's chrono feature. See the CAST calls.
    fn parse_timestamp(val: duckdb::types::Value) -> DateTime<Utc> {
        let text = match val {
            duckdb::types::Value::Text(s) => s,
            _ => String::new(),
        };
        text.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now())
    }

    fn row_to_conversation(row: &Row) -> DbResult<Conversation> {
        Ok(Conversation {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            title: row.get::<_, Option<String>>(1)?,
            created_at: Self::parse_timestamp(row.get(2)?),
            updated_at: Self::parse_timestamp(row.get(3)?),
        })
    }

    fn row_to_message(row: &Row) -> DbResult<Message> {
        Ok(Message {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            conversation_id: row.get::<_, String>(1)?.parse().unwrap_or_default(),
            role: row.get::<_, String>(2)?,
            content: row.get::<_, String>(3)?,
            created_at: Self::parse_timestamp(row.get(4)?),
        })
    }

    fn row_to_snippet(row: &Row) -> DbResult<CodeSnippet> {
        Ok(CodeSnippet {
            id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
            message_id: row.get::<_, String>(1)?.parse().unwrap_or_default(),
            language: row.get::<_, String>(2)?,
            content: row.get::<_, String>(3)?,
            created_at: Self::parse_timestamp(row.get(4)?),
        })
    }

    // --- Conversation Operations ---

    pub fn insert_conversation(conn: &Connection, title: Option<&str>) -> DbResult<Conversation> {
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO conversations (id, title) VALUES (?, ?)",
            params![id.to_string(), title],
        )?;

        Self::get_conversation(conn, id).map(|c| c.unwrap())
    }

    pub fn get_conversation(conn: &Connection, id: Uuid) -> DbResult<Option<Conversation>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR) \
             FROM conversations WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_conversation)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    pub fn list_conversations(
        conn: &Connection,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<Conversation>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR) \
             FROM conversations ORDER BY updated_at DESC LIMIT ? OFFSET ?",
        )?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], Self::row_to_conversation)?;

        let mut conversations = Vec::new();
        for row in rows {
            conversations.push(row?);
        }
        Ok(conversations)
    }

    // --- Message Operations ---

    pub fn insert_message(
        conn: &Connection,
        conversation_id: Uuid,
        role: &str,
        content: &str,
    ) -> DbResult<Message> {
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO messages (id, conversation_id, role, content) VALUES (?, ?, ?, ?)",
            params![id.to_string(), conversation_id.to_string(), role, content],
        )?;

        // Keep the conversation's recency in sync for listing
        conn.execute(
            "UPDATE conversations SET updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![conversation_id.to_string()],
        )?;

        Self::get_message(conn, id).map(|m| m.unwrap())
    }

    pub fn get_message(conn: &Connection, id: Uuid) -> DbResult<Option<Message>> {
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, role, content, CAST(created_at AS VARCHAR) \
             FROM messages WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_message)?;

        if let Some(row) = rows.next() {
            Ok(Some(row?))
        } else {
            Ok(None)
        }
    }

    /// The single terminal write of an assistant message. Fails with
    /// `QueryReturnedNoRows` for an unknown id rather than creating one.
    pub fn update_message_content(conn: &Connection, id: Uuid, content: &str) -> DbResult<()> {
        let updated = conn.execute(
            "UPDATE messages SET content = ? WHERE id = ?",
            params![content, id.to_string()],
        )?;

        if updated == 0 {
            return Err(duckdb::Error::QueryReturnedNoRows);
        }
        Ok(())
    }

    pub fn get_messages(conn: &Connection, conversation_id: Uuid) -> DbResult<Vec<Message>> {
        let mut stmt = conn.prepare(
            "SELECT id, conversation_id, role, content, CAST(created_at AS VARCHAR) \
             FROM messages \
             WHERE conversation_id = ? \
             ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map(params![conversation_id.to_string()], Self::row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    // --- Snippet Operations ---

    pub fn insert_snippet(
        conn: &Connection,
        message_id: Uuid,
        content: &str,
        language: &str,
    ) -> DbResult<CodeSnippet> {
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO snippets (id, message_id, language, content) VALUES (?, ?, ?, ?)",
            params![id.to_string(), message_id.to_string(), language, content],
        )?;

        let mut stmt = conn.prepare(
            "SELECT id, message_id, language, content, CAST(created_at AS VARCHAR) \
             FROM snippets WHERE id = ?",
        )?;
        let mut rows = stmt.query_map(params![id.to_string()], Self::row_to_snippet)?;

        Ok(rows.next().unwrap()?)
    }

    pub fn get_snippets(conn: &Connection, message_id: Uuid) -> DbResult<Vec<CodeSnippet>> {
        let mut stmt = conn.prepare(
            "SELECT id, message_id, language, content, CAST(created_at AS VARCHAR) \
             FROM snippets WHERE message_id = ? ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![message_id.to_string()], Self::row_to_snippet)?;

        let mut snippets = Vec::new();
        for row in rows {
            snippets.push(row?);
        }
        Ok(snippets)
    }
}
