//! Plain-text renderers for resume sections and chat lines.
//!
//! Everything here is a pure function of the locale store and the state
//! passed in, returning the text to print.

use clap::ValueEnum;
use portfolio_core::{
    ChatMessage, ChatRole, ContentView, ContentViewState, LocaleStore, NavItem, QuickTopic,
    SessionState, TextDirection,
};

const RULE: &str = "----------------------------------------";
/// Right-to-left mark, lets bidi-aware terminals align RTL lines
const RLM: char = '\u{200F}';

/// Resume sections in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Hero,
    Education,
    Projects,
    Experience,
    Skills,
    Certifications,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Hero,
        Section::Education,
        Section::Projects,
        Section::Experience,
        Section::Skills,
        Section::Certifications,
    ];

    /// Section a menu item lands on. Projects and experience share a target,
    /// so the active content view decides between them.
    pub fn for_nav(item: NavItem, view: ContentView) -> Self {
        match item.target_id() {
            "hero" => Section::Hero,
            "skills" => Section::Skills,
            _ => match view {
                ContentView::Projects => Section::Projects,
                ContentView::Experience => Section::Experience,
            },
        }
    }
}

/// The whole resume, or one section of it, with every carousel on its first
/// entry.
pub fn resume(store: &LocaleStore, section: Option<Section>) -> String {
    let view = ContentViewState::new();
    match section {
        Some(only) => render_section(store, only, &view),
        None => Section::ALL
            .iter()
            .map(|&s| render_section(store, s, &view))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

pub fn render_section(store: &LocaleStore, section: Section, view: &ContentViewState) -> String {
    let lines = match section {
        Section::Hero => hero(store),
        Section::Education => education(store),
        Section::Projects => projects(store, view.active_project),
        Section::Experience => experience(store, view.active_experience),
        Section::Skills => skills(store),
        Section::Certifications => certifications(store),
    };
    finish(store, lines)
}

fn heading(title: String, subtitle: Option<String>) -> Vec<String> {
    let mut lines = vec![title.to_uppercase()];
    if let Some(subtitle) = subtitle {
        lines.push(subtitle);
    }
    lines.push(RULE.to_string());
    lines
}

fn hero(store: &LocaleStore) -> Vec<String> {
    let mut lines = heading(store.t("hero.name", None), Some(store.t("hero.title", None)));
    lines.push(store.t("hero.summary", None));
    lines
}

fn education(store: &LocaleStore) -> Vec<String> {
    let mut lines = heading(
        store.t("portfolio.resume.education", None),
        Some(store.t("portfolio.resume.educationSubtitle", None)),
    );

    for entry in &store.cv().education {
        lines.push(format!("* {}", entry.degree));
        lines.push(format!("  {} | {}", entry.institution, entry.period));
        if let Some(status) = &entry.status {
            lines.push(format!("  {}", status));
        }
        if let Some(grade) = &entry.grade {
            lines.push(format!(
                "  {}: {}",
                store.t("portfolio.resume.grade", None),
                grade
            ));
        }
        for project in &entry.projects {
            lines.push(format!("    - {}", project));
        }
    }
    lines
}

fn carousel_counter(store: &LocaleStore, active: usize, total: usize) -> String {
    let current = (active + 1).to_string();
    let total = total.to_string();
    store.format(
        "portfolio.projects.count",
        Some("{current} / {total}"),
        &[("current", &current), ("total", &total)],
    )
}

fn projects(store: &LocaleStore, active: usize) -> Vec<String> {
    let list = &store.cv().projects;
    let mut lines = heading(
        store.t("portfolio.projects.title", None),
        Some(store.t("portfolio.projects.subtitle", None)),
    );
    if list.is_empty() {
        return lines;
    }

    lines.push(carousel_counter(store, active, list.len()));
    for (i, project) in list.iter().enumerate() {
        if i != active {
            lines.push(format!("  {}", project.title));
            continue;
        }

        lines.push(format!("> {}", project.title));
        let when: Vec<&str> = [project.period.as_deref(), project.duration.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !when.is_empty() {
            lines.push(format!("    {}", when.join(" | ")));
        }
        lines.push(format!("    {}", project.description));
        if !project.technologies.is_empty() {
            lines.push(format!("    [{}]", project.technologies.join(", ")));
        }
        for link in [&project.github_link, &project.project_link].into_iter().flatten() {
            lines.push(format!("    {}", link));
        }
    }
    lines
}

fn experience(store: &LocaleStore, active: usize) -> Vec<String> {
    let list = &store.cv().experience;
    let mut lines = heading(
        store.t("portfolio.experience.title", None),
        Some(store.t("portfolio.experience.subtitle", None)),
    );
    if list.is_empty() {
        return lines;
    }

    lines.push(carousel_counter(store, active, list.len()));
    for (i, role) in list.iter().enumerate() {
        if i != active {
            lines.push(format!("  {}, {}", role.title, role.company));
            continue;
        }

        lines.push(format!("> {}, {}", role.title, role.company));
        let mut when = role.period.clone();
        if let Some(duration) = &role.duration {
            when = format!("{} | {}", when, duration);
        }
        lines.push(format!("    {}", when));
        lines.push(format!("    {}", role.description));
        if !role.technologies.is_empty() {
            lines.push(format!("    [{}]", role.technologies.join(", ")));
        }
    }
    lines
}

fn skills(store: &LocaleStore) -> Vec<String> {
    let mut lines = heading(
        store.t("portfolio.resume.skills", None),
        Some(store.t("portfolio.resume.skillsSubtitle", None)),
    );
    for (category, items) in &store.cv().skills {
        lines.push(format!("{}: {}", category, items.join(", ")));
    }
    lines
}

fn certifications(store: &LocaleStore) -> Vec<String> {
    let mut lines = heading(store.t("portfolio.resume.certifications", None), None);
    for cert in &store.cv().certifications {
        lines.push(format!("* {}", cert.name));
        lines.push(format!(
            "  {}: {} | {}: {}",
            store.t("portfolio.resume.certificationIssued", None),
            cert.issuer,
            store.t("portfolio.resume.certificationYear", None),
            cert.year
        ));
        if let Some(link) = &cert.link {
            lines.push(format!(
                "  {}: {}",
                store.t("portfolio.resume.certificationVerify", None),
                link
            ));
        }
    }
    lines
}

fn finish(store: &LocaleStore, lines: Vec<String>) -> String {
    match store.direction() {
        TextDirection::Ltr => lines.join("\n"),
        TextDirection::Rtl => lines
            .iter()
            .map(|line| format!("{RLM}{line}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ============================================================================
// Chat
// ============================================================================

/// One chat line, prefixed with the speaker.
pub fn message(store: &LocaleStore, message: &ChatMessage) -> String {
    let speaker = match message.role {
        ChatRole::User => store.t("chat.you", Some("You")),
        ChatRole::Bot => store.t("chat.bot", Some("Khalid")),
        ChatRole::System => "*".to_string(),
    };
    finish(store, vec![format!("{}: {}", speaker, message.text)])
}

/// Badge shown while the drawer is closed and replies are waiting.
pub fn unread_badge(store: &LocaleStore, count: u32) -> Option<String> {
    if count == 0 {
        return None;
    }
    let count = count.to_string();
    Some(format!(
        "({})",
        store.format("chat.unread", Some("{count}"), &[("count", &count)])
    ))
}

/// Drawer header with the quick prompt shortcuts.
pub fn drawer_header(store: &LocaleStore) -> String {
    let mut lines = heading(store.t("chat.cta", None), Some(store.t("chat.subtitle", None)));
    let chips: Vec<String> = QuickTopic::ALL
        .iter()
        .map(|topic| format!("/{} {}", topic, store.t(topic.label_key(), None)))
        .collect();
    lines.push(chips.join("   "));
    finish(store, lines)
}

pub fn status(store: &LocaleStore, state: &SessionState) -> String {
    let mut lines = vec![store.t(
        if state.is_open {
            "chat.opened"
        } else {
            "chat.closed"
        },
        None,
    )];
    if let Some(badge) = unread_badge(store, state.unread) {
        lines.push(badge);
    }
    if state.typing {
        lines.push(store.t("chat.typing", None));
    }
    finish(store, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::{Locale, MemoryStore};
    use std::sync::Arc;

    fn store(locale: Locale) -> LocaleStore {
        LocaleStore::load(Arc::new(MemoryStore::new()), Some(locale)).unwrap()
    }

    #[test]
    fn test_full_resume_has_every_section() {
        let text = resume(&store(Locale::En), None);
        assert!(text.contains("KHALID ELBOUARI"));
        assert!(text.contains("EDUCATION"));
        assert!(text.contains("FEATURED PROJECTS"));
        assert!(text.contains("PROFESSIONAL EXPERIENCE"));
        assert!(text.contains("CERTIFICATIONS"));
        assert!(text.contains("Languages: Java, TypeScript, Python, SQL"));
    }

    #[test]
    fn test_carousel_marks_active_entry() {
        let en = store(Locale::En);
        let mut view = ContentViewState::new();
        view.next(en.cv().projects.len());

        let text = render_section(&en, Section::Projects, &view);
        assert!(text.contains("2 of 2"));
        assert!(text.contains("> E-Commerce Platform"));
        assert!(text.contains("  Portfolio Chat Assistant"));
    }

    #[test]
    fn test_resume_follows_locale() {
        let text = resume(&store(Locale::Fr), Some(Section::Projects));
        assert!(text.contains("PROJETS PHARES"));
        assert!(text.contains("1 sur 2"));
        assert!(text.contains("  Plateforme e-commerce"));
    }

    #[test]
    fn test_rtl_lines_are_marked() {
        let text = resume(&store(Locale::Ar), Some(Section::Skills));
        assert!(text.lines().all(|line| line.starts_with(RLM)));

        let text = resume(&store(Locale::En), Some(Section::Skills));
        assert!(!text.contains(RLM));
    }

    #[test]
    fn test_message_speaker_falls_back_to_english() {
        let fr = store(Locale::Fr);
        let bot = ChatMessage::new(ChatRole::Bot, "Salut", None);
        let user = ChatMessage::new(ChatRole::User, "Bonjour", None);

        assert_eq!(message(&fr, &bot), "Khalid: Salut");
        assert_eq!(message(&fr, &user), "Vous: Bonjour");
    }

    #[test]
    fn test_unread_badge() {
        let en = store(Locale::En);
        assert_eq!(unread_badge(&en, 0), None);
        assert_eq!(unread_badge(&en, 3).as_deref(), Some("(3 unread)"));
    }

    #[test]
    fn test_status_lines() {
        let en = store(Locale::En);
        let state = SessionState {
            is_open: false,
            typing: true,
            messages: Vec::new(),
            unread: 2,
        };
        assert_eq!(
            status(&en, &state),
            "Chat closed\n(2 unread)\nKhalid is typing…"
        );
    }

    #[test]
    fn test_nav_lands_on_section() {
        assert_eq!(Section::for_nav(NavItem::About, ContentView::Projects), Section::Hero);
        assert_eq!(Section::for_nav(NavItem::Skills, ContentView::Projects), Section::Skills);
        assert_eq!(
            Section::for_nav(NavItem::Experience, ContentView::Experience),
            Section::Experience
        );
        assert_eq!(
            Section::for_nav(NavItem::Projects, ContentView::Projects),
            Section::Projects
        );
    }

    #[test]
    fn test_drawer_header_lists_shortcuts() {
        let header = drawer_header(&store(Locale::En));
        assert!(header.contains("/skills Skills"));
        assert!(header.contains("/contact Contact"));
    }
}
