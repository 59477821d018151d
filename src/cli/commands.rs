use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "codementor", version, about = "AI code review and generation server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API and WebSocket server
    Serve,

    /// Manage conversations
    Conversation {
        #[command(subcommand)]
        action: ConversationAction,
    },
}

#[derive(Subcommand)]
pub enum ConversationAction {
    /// Create a new conversation
    Create {
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List recent conversations
    List,

    /// Print a conversation's messages
    Show {
        id: Uuid,
    },
}
