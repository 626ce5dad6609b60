use clap::{Arg, ArgAction, Command};
use shell_ai::config::Config;
use shell_ai::llm::{ChatClient, MockChatClient, OpenAiClient};
use shell_ai::session::Session;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("shai")
        .about("Translate a task description into a shell command")
        .long_about(
            "shai asks an LLM for shell commands matching your task description, \
             then lets you pick, edit and run one of them",
        )
        .arg(
            Arg::new("ctx")
                .long("ctx")
                .help("Keep command outputs as context for later suggestions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("set-api-key")
                .long("set-api-key")
                .help("Store the OpenAI API key in the config file")
                .value_name("API_KEY")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Show configuration information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("prompt")
                .help("The task to find a shell command for")
                .num_args(0..),
        )
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load()?;
        config.set_api_key(api_key.clone())?;
        println!("API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if matches.get_flag("ctx") {
        config.context_mode = true;
    }

    let prompt = matches
        .get_many::<String>("prompt")
        .unwrap_or_default()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if prompt.trim().is_empty() {
        println!("Describe what you want to do as a single sentence. `shai <sentence>`");
        return Ok(());
    }

    let client: Box<dyn ChatClient> = if config.is_mock_mode() {
        Box::new(MockChatClient)
    } else {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(Config::missing_api_key_error)?;
        Box::new(OpenAiClient::new(&config, api_key))
    };

    // Interrupts at any wait point end the session cleanly.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nExiting...");
            std::process::exit(0);
        }
    });

    info!("Starting session for prompt: {}", prompt);

    let mut session = Session::new(client, prompt, &config);
    session.run().await
}
