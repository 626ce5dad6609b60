//! Shell-AI - natural language to shell command assistant.
//!
//! This library turns a free-text task description into executable shell
//! commands using a chat-completion LLM, then lets the user pick, edit and
//! run one of them. It supports:
//!
//! - **Command suggestion** via the OpenAI chat API (mockable for tests)
//! - **Interactive selection** with regenerate / new-prompt / dismiss actions
//! - **Plain mode**: one confirmed command runs and the session ends
//! - **Context mode**: captured output rolls into the next prompt, `cd`
//!   moves the session's working directory, editors run uncaptured
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management (API key, model, mode flags)
//! - [`http_client`] - HTTP client abstraction
//! - [`llm`] - Chat client and suggestion engine
//! - [`parser`] - Command payload extraction from model output
//! - [`context`] - Rolling buffer of captured command output
//! - [`platform`] - Host description for the system prompt
//! - [`executor`] - Shell execution, editor and `cd` handling
//! - [`menu`] - Interactive menu and text prompts
//! - [`session`] - The suggestion/selection/execution loop
//!
//! # Example
//!
//! ```ignore
//! use shell_ai::config::Config;
//! use shell_ai::llm::MockChatClient;
//! use shell_ai::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mut session = Session::new(
//!         Box::new(MockChatClient),
//!         "list files".to_string(),
//!         &config,
//!     );
//!     session.run().await
//! }
//! ```

pub mod config;
pub mod context;
pub mod executor;
pub mod http_client;
pub mod llm;
pub mod menu;
pub mod parser;
pub mod platform;
pub mod session;
