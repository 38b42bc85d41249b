//! Header navigation and the projects/experience content view.
//!
//! The header emits [`ContentView`] commands through a [`Navigator`]; the
//! content view holds a receiver and applies them with
//! [`ContentViewState::sync`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// View shown by the projects section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentView {
    #[default]
    Projects,
    Experience,
}

/// Entries of the header menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavItem {
    About,
    Projects,
    Experience,
    Skills,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [
        NavItem::About,
        NavItem::Projects,
        NavItem::Experience,
        NavItem::Skills,
    ];

    pub fn translation_key(&self) -> &'static str {
        match self {
            NavItem::About => "header.menu.about",
            NavItem::Projects => "header.menu.projects",
            NavItem::Experience => "header.menu.experience",
            NavItem::Skills => "header.menu.skills",
        }
    }

    /// Section the item scrolls to. Projects and experience share one.
    pub fn target_id(&self) -> &'static str {
        match self {
            NavItem::About => "hero",
            NavItem::Projects | NavItem::Experience => "projects",
            NavItem::Skills => "skills",
        }
    }

    pub fn view(&self) -> Option<ContentView> {
        match self {
            NavItem::Projects => Some(ContentView::Projects),
            NavItem::Experience => Some(ContentView::Experience),
            _ => None,
        }
    }
}

impl std::str::FromStr for NavItem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "about" | "hero" => Ok(NavItem::About),
            "projects" => Ok(NavItem::Projects),
            "experience" => Ok(NavItem::Experience),
            "skills" => Ok(NavItem::Skills),
            other => Err(Error::UnknownNavItem(other.to_string())),
        }
    }
}

/// Sending half of the navigation channel, owned by the header.
#[derive(Debug)]
pub struct Navigator {
    tx: watch::Sender<ContentView>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ContentView::default());
        Self { tx }
    }

    /// Receiver for the content view.
    pub fn subscribe(&self) -> watch::Receiver<ContentView> {
        self.tx.subscribe()
    }

    /// Activate a menu item. Returns the target section id.
    pub fn navigate(&self, item: NavItem) -> &'static str {
        if let Some(view) = item.view() {
            // Re-sending the same view still notifies, so the index resets
            self.tx.send_replace(view);
            tracing::debug!("Navigation to {:?}", view);
        }
        item.target_id()
    }
}

/// Selection state of the projects/experience section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentViewState {
    pub active_view: ContentView,
    pub active_project: usize,
    pub active_experience: usize,
}

impl ContentViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `view` and restart it from its first entry.
    pub fn apply(&mut self, view: ContentView) {
        self.active_view = view;
        match view {
            ContentView::Projects => self.active_project = 0,
            ContentView::Experience => self.active_experience = 0,
        }
    }

    /// Apply a pending navigation command, if any. Returns whether one was
    /// applied.
    pub fn sync(&mut self, rx: &mut watch::Receiver<ContentView>) -> bool {
        match rx.has_changed() {
            Ok(true) => {
                let view = *rx.borrow_and_update();
                self.apply(view);
                true
            }
            _ => false,
        }
    }

    pub fn active_index(&self) -> usize {
        match self.active_view {
            ContentView::Projects => self.active_project,
            ContentView::Experience => self.active_experience,
        }
    }

    fn set_active_index(&mut self, value: isize, len: usize) {
        if len == 0 {
            return;
        }
        let bounded = value.rem_euclid(len as isize) as usize;
        match self.active_view {
            ContentView::Projects => self.active_project = bounded,
            ContentView::Experience => self.active_experience = bounded,
        }
    }

    /// Step forward through a list of `len` entries, wrapping around.
    pub fn next(&mut self, len: usize) {
        self.set_active_index(self.active_index() as isize + 1, len);
    }

    /// Step backward through a list of `len` entries, wrapping around.
    pub fn prev(&mut self, len: usize) {
        self.set_active_index(self.active_index() as isize - 1, len);
    }

    /// Keep both indices inside their lists after the data set changed.
    pub fn clamp(&mut self, projects: usize, experience: usize) {
        self.active_project = clamp_index(self.active_project, projects);
        self.active_experience = clamp_index(self.active_experience, experience);
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_item_targets() {
        assert_eq!(NavItem::About.target_id(), "hero");
        assert_eq!(NavItem::Experience.target_id(), "projects");
        assert_eq!(NavItem::Skills.view(), None);
        assert_eq!("Experience".parse::<NavItem>().unwrap(), NavItem::Experience);
        assert!(matches!(
            "blog".parse::<NavItem>(),
            Err(Error::UnknownNavItem(_))
        ));
    }

    #[test]
    fn test_navigate_switches_view_and_resets_index() {
        let navigator = Navigator::new();
        let mut rx = navigator.subscribe();
        let mut state = ContentViewState::new();
        state.active_experience = 1;

        assert_eq!(navigator.navigate(NavItem::Experience), "projects");
        assert!(state.sync(&mut rx));
        assert_eq!(state.active_view, ContentView::Experience);
        assert_eq!(state.active_index(), 0);

        // Nothing pending
        assert!(!state.sync(&mut rx));
    }

    #[test]
    fn test_navigate_without_view_sends_nothing() {
        let navigator = Navigator::new();
        let mut rx = navigator.subscribe();
        let mut state = ContentViewState::new();

        assert_eq!(navigator.navigate(NavItem::Skills), "skills");
        assert!(!state.sync(&mut rx));
    }

    #[test]
    fn test_same_view_twice_resets_again() {
        let navigator = Navigator::new();
        let mut rx = navigator.subscribe();
        let mut state = ContentViewState::new();

        navigator.navigate(NavItem::Projects);
        state.sync(&mut rx);
        state.next(2);
        assert_eq!(state.active_project, 1);

        navigator.navigate(NavItem::Projects);
        assert!(state.sync(&mut rx));
        assert_eq!(state.active_project, 0);
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut state = ContentViewState::new();
        state.prev(3);
        assert_eq!(state.active_project, 2);
        state.next(3);
        assert_eq!(state.active_project, 0);

        // Empty list leaves the index alone
        state.next(0);
        assert_eq!(state.active_project, 0);
    }

    #[test]
    fn test_clamp() {
        let mut state = ContentViewState {
            active_view: ContentView::Projects,
            active_project: 4,
            active_experience: 2,
        };
        state.clamp(2, 0);
        assert_eq!(state.active_project, 1);
        assert_eq!(state.active_experience, 0);
    }
}
