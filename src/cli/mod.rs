pub mod commands;

use crate::cli::commands::{Commands, ConversationAction};
use crate::config::AppConfig;
use crate::db::{get_connection, service::DbService};

pub fn run_cli(command: Commands, config_path: String) {
    let config = AppConfig::load(&config_path).expect("Failed to load config");

    match command {
        Commands::Serve => {
            panic!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Conversation { action } => {
            let pool = get_connection(&config.database).expect("DB error");
            let conn = pool.lock().unwrap();

            match action {
                ConversationAction::Create { title } => {
                    match DbService::insert_conversation(&conn, title.as_deref()) {
                        Ok(conversation) => println!(
                            "Created Conversation: {} ({})",
                            conversation.title.as_deref().unwrap_or("untitled"),
                            conversation.id
                        ),
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                ConversationAction::List => {
                    match DbService::list_conversations(&conn, 50, 0) {
                        Ok(conversations) => {
                            if conversations.is_empty() {
                                println!("No conversations found.");
                            } else {
                                println!("{:<38} | {:<20} | {}", "ID", "Updated At", "Title");
                                println!("{:-<38}-+-{:-<20}-+-{:-<20}", "", "", "");
                                for c in conversations {
                                    println!(
                                        "{:<38} | {:<20} | {}",
                                        c.id.to_string(),
                                        c.updated_at,
                                        c.title.as_deref().unwrap_or("untitled")
                                    );
                                }
                            }
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                ConversationAction::Show { id } => {
                    if DbService::get_conversation(&conn, id).unwrap_or(None).is_none() {
                        eprintln!("Conversation {} not found.", id);
                        return;
                    }
                    match DbService::get_messages(&conn, id) {
                        Ok(messages) => {
                            for m in messages {
                                println!("[{}]: {}", m.role.to_uppercase(), m.content);
                                println!("---");
                            }
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
            }
        }
    }
}
