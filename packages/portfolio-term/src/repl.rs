//! Interactive chat drawer.
//!
//! Each input line is either a message or a slash command. Sends run as
//! spawned tasks so a new message can supersede one still waiting for its
//! reply; a listener task prints session events as they arrive.

use crate::app::App;
use crate::render::{self, Section};
use anyhow::Result;
use portfolio_core::{
    ChatMessage, ChatRole, ContentView, ContentViewState, Locale, NavItem, QuickTopic, Resume,
    SessionEvent, SessionManager, SharedLocale,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Ask(QuickTopic),
    Open,
    Close,
    Toggle,
    Nav(NavItem),
    Next,
    Prev,
    Locale(Locale),
    Theme,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    if let Ok(topic) = name.parse::<QuickTopic>() {
        return Command::Ask(topic);
    }

    let invalid = || Command::Invalid(line.to_string());
    match name.as_str() {
        "open" => Command::Open,
        "close" => Command::Close,
        "toggle" => Command::Toggle,
        "nav" => arg.parse().map(Command::Nav).unwrap_or_else(|_| invalid()),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "locale" => arg.parse().map(Command::Locale).unwrap_or_else(|_| invalid()),
        "theme" => Command::Theme,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => invalid(),
    }
}

pub async fn run(app: &mut App) -> Result<()> {
    app.session.open_chat();
    {
        let store = app.locale_store();
        println!("{}", render::drawer_header(&store));
        for message in app.session.messages() {
            println!("{}", render::message(&store, &message));
        }
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let printer = tokio::spawn(print_events(
        app.session.subscribe(),
        app.session.clone(),
        app.locale.clone(),
        shutdown_rx,
    ));

    let mut content = ContentViewState::new();
    let mut nav_rx = app.navigator.subscribe();
    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        pending.retain(|task| !task.is_finished());

        match parse(&line) {
            Command::Empty => {}
            Command::Send(text) => {
                let session = app.session.clone();
                pending.push(tokio::spawn(async move { session.send(&text).await }));
            }
            Command::Ask(topic) => {
                let session = app.session.clone();
                pending.push(tokio::spawn(async move { session.quick_ask(topic).await }));
            }
            Command::Open => app.session.open_chat(),
            Command::Close => app.session.close_chat(),
            Command::Toggle => app.session.toggle_chat(),
            Command::Nav(item) => {
                app.navigator.navigate(item);
                content.sync(&mut nav_rx);

                let store = app.locale_store();
                let cv = store.cv();
                content.clamp(cv.projects.len(), cv.experience.len());

                let label = store.t(item.translation_key(), None);
                println!(
                    "{}",
                    store.format("nav.section", Some("{section}"), &[("section", &label)])
                );
                let section = Section::for_nav(item, content.active_view);
                println!("{}", render::render_section(&store, section, &content));
            }
            Command::Next => show_step(app, &mut content, true),
            Command::Prev => show_step(app, &mut content, false),
            Command::Locale(locale) => {
                app.set_locale(locale);
                let store = app.locale_store();
                let cv = store.cv();
                content.clamp(cv.projects.len(), cv.experience.len());
                println!("{}", store.t("locale.label", None));
            }
            Command::Theme => {
                let mode = app.theme.toggle();
                println!("{}", app.locale_store().t(mode.label_key(), None));
            }
            Command::Help => println!("{}", app.locale_store().t("chat.help", None)),
            Command::Invalid(input) => {
                tracing::debug!("Unrecognized input: {}", input);
                println!("{}", app.locale_store().t("chat.help", None));
            }
            Command::Quit => break,
        }
    }

    // Let outstanding replies land before the listener stops
    for task in pending {
        if let Err(e) = task.await {
            tracing::warn!("Chat send task failed: {}", e);
        }
    }
    let _ = shutdown_tx.send(());
    printer.await?;

    Ok(())
}

fn show_step(app: &App, content: &mut ContentViewState, forward: bool) {
    let store = app.locale_store();
    let section = step_carousel(content, store.cv(), forward);
    println!("{}", render::render_section(&store, section, content));
}

/// Move the active carousel one entry and return the section showing it.
fn step_carousel(content: &mut ContentViewState, cv: &Resume, forward: bool) -> Section {
    let (len, section) = match content.active_view {
        ContentView::Projects => (cv.projects.len(), Section::Projects),
        ContentView::Experience => (cv.experience.len(), Section::Experience),
    };
    if forward {
        content.next(len);
    } else {
        content.prev(len);
    }
    section
}

async fn print_events(
    mut events: broadcast::Receiver<SessionEvent>,
    session: SessionManager,
    locale: SharedLocale,
    mut shutdown: oneshot::Receiver<()>,
) {
    // Replies that arrived while the drawer was closed
    let mut hidden: Vec<ChatMessage> = Vec::new();

    loop {
        let event = tokio::select! {
            biased;
            event = events.recv() => event,
            _ = &mut shutdown => break,
        };

        let store = locale.read().unwrap_or_else(|e| e.into_inner());
        match event {
            Ok(SessionEvent::MessageAppended(message)) => {
                if message.role == ChatRole::User {
                    continue;
                }
                if session.is_open() {
                    println!("{}", render::message(&store, &message));
                } else {
                    hidden.push(message);
                    if let Some(badge) = render::unread_badge(&store, session.unread()) {
                        println!("{}", badge);
                    }
                }
            }
            Ok(SessionEvent::TypingChanged(true)) => {
                if session.is_open() {
                    println!("{}", store.t("chat.typing", None));
                }
            }
            Ok(SessionEvent::TypingChanged(false)) => {}
            Ok(SessionEvent::VisibilityChanged(true)) => {
                println!("{}", store.t("chat.opened", None));
                for message in hidden.drain(..) {
                    println!("{}", render::message(&store, &message));
                }
            }
            Ok(SessionEvent::VisibilityChanged(false)) => {
                println!("{}", store.t("chat.closed", None));
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Chat listener skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
