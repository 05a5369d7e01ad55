//! CLI command execution.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::auth::{self, AuthNotice, RestIdentityProvider, TokenStore};
use crate::client::RecommendationClient;
use crate::config::Config;
use crate::controller::{ChatContext, ChatController, SubmitOutcome};
use crate::error::SubmitError;
use crate::models::StylePreference;
use crate::render::{render_message, render_session_line};
use crate::server;
use crate::store::ChatSessionStore;

use super::args::{Cli, Commands};

/// Prompts shown when a chat starts.
const SUGGESTED_PROMPTS: &[&str] = &[
    "What should I wear to a job interview?",
    "Suggest a casual weekend outfit",
    "I have a date tonight, what should I wear?",
    "Business casual outfit for summer",
];

const CHAT_HELP: &str = "\
Commands:
  /new              start a new chat
  /list             list chats
  /switch <n>       switch to chat number n
  /delete [n]       delete chat n (default: current)
  /gender <g>       set style preference (men, women, unisex)
  /history          show the current chat
  /logout           log out and leave
  /quit             leave
Anything else is sent to the style assistant.";

/// Execute the parsed CLI.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Chat { gender, guest } => chat(&config, gender, guest).await,
        Commands::Ask {
            gender,
            guest,
            message,
        } => {
            let message = message.join(" ");
            if message.trim().is_empty() {
                bail!("Message is required for ask command");
            }
            ask(&config, gender, guest, &message).await
        }
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_line("Password: ")?,
            };
            let provider = identity_provider(&config)?;
            let tokens = TokenStore::open_default()?;
            report(auth::login(&provider, &tokens, &email, &password).await)
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let password = match password {
                Some(p) => p,
                None => read_line("Password: ")?,
            };
            let confirm_password = match confirm_password {
                Some(p) => p,
                None => read_line("Confirm password: ")?,
            };
            let provider = identity_provider(&config)?;
            let tokens = TokenStore::open_default()?;
            report(auth::signup(&provider, &tokens, &name, &email, &password, &confirm_password).await)
        }
        Commands::ResetPassword { email } => {
            let provider = identity_provider(&config)?;
            report(auth::reset_password(&provider, &email).await)
        }
        Commands::Logout => {
            let tokens = TokenStore::open_default()?;
            report(auth::logout(&tokens, &mut ChatContext::default()))
        }
        Commands::Whoami => whoami(),
        Commands::Serve { port, public, open } => {
            let mut server_config = config.server.clone();
            if let Some(port) = port {
                server_config.port = port;
            }
            let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
            server::start_server(&server_config, host, open).await
        }
    }
}

fn identity_provider(config: &Config) -> Result<RestIdentityProvider> {
    RestIdentityProvider::from_config(&config.auth).context(
        "No identity provider API key configured. Set STYLEMATE_AUTH_API_KEY or auth.api_key in ~/.stylemate/config.toml",
    )
}

fn report(result: Result<AuthNotice, AuthNotice>) -> Result<()> {
    match result {
        Ok(notice) => {
            println!("{notice}");
            Ok(())
        }
        Err(notice) => bail!("{notice}"),
    }
}

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn require_login(tokens: &TokenStore, guest: bool) -> Result<()> {
    if guest || tokens.is_authenticated() {
        return Ok(());
    }
    bail!("You are not logged in. Run `stylemate login` or `stylemate signup`, or pass --guest.")
}

fn whoami() -> Result<()> {
    let tokens = TokenStore::open_default()?;
    if !tokens.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    match tokens.user_name()? {
        Some(name) => println!("Logged in as {name}"),
        None => println!("Logged in"),
    }
    println!("Credentials: {}", tokens.path().display());
    Ok(())
}

fn new_controller(config: &Config, gender: Option<StylePreference>) -> ChatController<RecommendationClient> {
    let context = gender.map_or_else(ChatContext::default, ChatContext::with_preference);
    ChatController::new(
        ChatSessionStore::new(),
        context,
        RecommendationClient::from_config(&config.api),
    )
}

/// Print what a submitted turn produced.
fn print_outcome(
    controller: &ChatController<RecommendationClient>,
    outcome: Result<SubmitOutcome, SubmitError>,
) {
    match outcome {
        Ok(SubmitOutcome::Ignored) => {}
        Ok(SubmitOutcome::Answered) => print_last_reply(controller),
        Ok(SubmitOutcome::Fallback { error }) => {
            eprintln!(
                "Connection Error: could not reach {} ({error})",
                controller.recommender().endpoint()
            );
            print_last_reply(controller);
        }
        Err(e @ SubmitError::PreferenceRequired) => {
            eprintln!("⚠️ Style preference required: {e}");
            eprintln!("Use /gender men, /gender women or /gender unisex.");
        }
    }
}

fn print_last_reply(controller: &ChatController<RecommendationClient>) {
    if let Some(message) = controller.store().current().and_then(|s| s.messages().last()) {
        println!("{}\n", render_message(message));
    }
}

async fn ask(config: &Config, gender: Option<StylePreference>, guest: bool, message: &str) -> Result<()> {
    require_login(&TokenStore::open_default()?, guest)?;

    let mut controller = new_controller(config, gender);
    match controller.submit(message).await {
        Err(e) => bail!("{e} Pass --gender men|women|unisex."),
        Ok(SubmitOutcome::Fallback { error }) => {
            print_last_reply(&controller);
            bail!("Could not reach {}: {error}", controller.recommender().endpoint())
        }
        outcome => {
            print_outcome(&controller, outcome);
            Ok(())
        }
    }
}

async fn chat(config: &Config, gender: Option<StylePreference>, guest: bool) -> Result<()> {
    let tokens = TokenStore::open_default()?;
    require_login(&tokens, guest)?;

    let mut controller = new_controller(config, gender);

    let mut waiting = controller.subscribe_waiting();
    tokio::spawn(async move {
        while waiting.changed().await.is_ok() {
            if *waiting.borrow_and_update() {
                eprintln!("stylemate is typing...");
            }
        }
    });

    if let Some(name) = tokens.user_name().ok().flatten() {
        println!("Welcome, {name}!");
    }
    print_current_chat(&controller);
    println!("Try asking:");
    for prompt in SUGGESTED_PROMPTS {
        println!("  - {prompt}");
    }
    if controller.context().preference.is_none() {
        println!("Pick a style preference first: /gender men | women | unisex");
    }
    println!("Type /help for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let arg = parts.next();
            match name {
                "quit" | "exit" => break,
                "logout" => {
                    match auth::logout(&tokens, controller.context_mut()) {
                        Ok(notice) => println!("{notice}"),
                        Err(notice) => eprintln!("{notice}"),
                    }
                    break;
                }
                other => run_chat_command(&mut controller, other, arg),
            }
            continue;
        }

        let outcome = controller.submit(line).await;
        print_outcome(&controller, outcome);
    }

    Ok(())
}

fn run_chat_command(controller: &mut ChatController<RecommendationClient>, name: &str, arg: Option<&str>) {
    match name {
        "help" => println!("{CHAT_HELP}"),
        "new" => {
            controller.store_mut().create_session();
            print_current_chat(controller);
        }
        "list" => print_sessions(controller),
        "history" => print_current_chat(controller),
        "switch" => match session_id_at(controller, arg) {
            Some(id) => {
                if let Err(e) = controller.store_mut().switch_to(&id) {
                    eprintln!("{e}");
                } else {
                    print_current_chat(controller);
                }
            }
            None => eprintln!("Usage: /switch <n> (see /list)"),
        },
        "delete" => {
            let id = match arg {
                Some(_) => session_id_at(controller, arg),
                None => Some(controller.store().current_id().to_string()),
            };
            match id {
                Some(id) => {
                    controller.store_mut().delete_session(&id);
                    print_sessions(controller);
                }
                None => eprintln!("Usage: /delete [n] (see /list)"),
            }
        }
        "gender" => match arg.and_then(StylePreference::from_str) {
            Some(preference) => {
                controller.context_mut().preference = Some(preference);
                println!("Style preference set to {preference}");
            }
            None => eprintln!("Usage: /gender men|women|unisex"),
        },
        other => eprintln!("Unknown command /{other}. Type /help for commands."),
    }
}

/// Id of the session at 1-based list position `arg`.
fn session_id_at(controller: &ChatController<RecommendationClient>, arg: Option<&str>) -> Option<String> {
    let index: usize = arg?.parse().ok()?;
    controller
        .store()
        .sessions()
        .get(index.checked_sub(1)?)
        .map(|s| s.id.clone())
}

fn print_sessions(controller: &ChatController<RecommendationClient>) {
    let store = controller.store();
    println!("Chat History");
    for (i, session) in store.sessions().iter().enumerate() {
        println!(
            "{}",
            render_session_line(i + 1, session, session.id == store.current_id())
        );
    }
}

fn print_current_chat(controller: &ChatController<RecommendationClient>) {
    let Some(session) = controller.store().current() else {
        return;
    };
    println!("── {} ──", session.title);
    for message in session.messages() {
        println!("{}\n", render_message(message));
    }
}
