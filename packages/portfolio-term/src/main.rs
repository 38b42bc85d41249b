//! Portfolio terminal front end.
//!
//! Renders the localized resume and hosts the chat drawer, either as an
//! interactive session or as one-shot commands.

mod app;
mod render;
mod repl;

use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use portfolio_core::{ChatRole, Locale, QuickTopic};
use render::Section;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Khalid Elbouari's portfolio in the terminal")]
#[command(version)]
struct Cli {
    /// Language to use (en, fr, ar); remembered for later runs
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the resume, or a single section of it
    Resume {
        #[arg(value_enum)]
        section: Option<Section>,
    },
    /// Chat with the assistant (interactive without an action)
    Chat {
        #[command(subcommand)]
        action: Option<ChatAction>,
    },
    /// Language settings
    Locale {
        #[command(subcommand)]
        action: LocaleAction,
    },
    /// Light/dark mode
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send a message and print the reply
    Send {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Ask one of the canned questions (skills, projects, experience, contact)
    Ask { topic: QuickTopic },
    /// Print the conversation
    History {
        #[arg(long)]
        json: bool,
    },
    /// Show visibility, unread count and history size
    Status,
    Open,
    Close,
    Toggle,
}

#[derive(Subcommand)]
enum LocaleAction {
    /// List supported languages
    List,
    /// Print the active language
    Get,
    /// Switch the active language
    Set { code: String },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut app = App::init(cli.config.as_deref(), cli.locale.as_deref())?;

    match cli.command {
        Commands::Resume { section } => {
            println!("{}", render::resume(&app.locale_store(), section));
        }
        Commands::Chat { action: None } => repl::run(&mut app).await?,
        Commands::Chat {
            action: Some(action),
        } => handle_chat(&app, action).await?,
        Commands::Locale { action } => handle_locale(&app, action)?,
        Commands::Theme { action } => handle_theme(&mut app, action),
    }

    Ok(())
}

async fn handle_chat(app: &App, action: ChatAction) -> Result<()> {
    let session = &app.session;

    match action {
        ChatAction::Send { text } => {
            let before = session.messages().len();
            session.send(&text.join(" ")).await;
            print_new_replies(app, before);
        }
        ChatAction::Ask { topic } => {
            let before = session.messages().len();
            session.quick_ask(topic).await;
            print_new_replies(app, before);
        }
        ChatAction::History { json: true } => {
            println!("{}", serde_json::to_string_pretty(&session.messages())?);
        }
        ChatAction::History { json: false } => {
            let store = app.locale_store();
            for message in session.messages() {
                println!("{}", render::message(&store, &message));
            }
        }
        ChatAction::Status => {
            println!("{}", render::status(&app.locale_store(), &session.snapshot()));
        }
        ChatAction::Open => {
            session.open_chat();
            println!("{}", app.locale_store().t("chat.opened", None));
        }
        ChatAction::Close => {
            session.close_chat();
            println!("{}", app.locale_store().t("chat.closed", None));
        }
        ChatAction::Toggle => {
            session.toggle_chat();
            let key = if session.is_open() {
                "chat.opened"
            } else {
                "chat.closed"
            };
            println!("{}", app.locale_store().t(key, None));
        }
    }

    Ok(())
}

/// Print everything after the user's own message.
fn print_new_replies(app: &App, before: usize) {
    let store = app.locale_store();
    for message in app.session.messages().iter().skip(before) {
        if message.role != ChatRole::User {
            println!("{}", render::message(&store, message));
        }
    }
}

fn handle_locale(app: &App, action: LocaleAction) -> Result<()> {
    match action {
        LocaleAction::List => {
            let store = app.locale_store();
            let active = store.locale();
            for (locale, label) in store.available_locales() {
                let marker = if locale == active { "*" } else { " " };
                println!("{} {}  {}", marker, locale.code(), label);
            }
        }
        LocaleAction::Get => println!("{}", app.locale_store().locale()),
        LocaleAction::Set { code } => {
            let locale: Locale = code.parse()?;
            app.set_locale(locale);
            println!("{}", app.locale_store().t("locale.label", None));
        }
    }
    Ok(())
}

fn handle_theme(app: &mut App, action: ThemeAction) {
    let mode = match action {
        ThemeAction::Show => app.theme.mode(),
        ThemeAction::Toggle => app.theme.toggle(),
    };
    println!("{}", app.locale_store().t(mode.label_key(), None));
}
