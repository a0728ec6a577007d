//! Icon service for managing different icon themes
//!
//! This module provides a centralized way to manage icons throughout the application,
//! supporting different themes like emoji, Unicode, and ASCII fallbacks.

use serde::{Deserialize, Serialize};

/// Icon theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconTheme {
    /// Emoji icons (colorful, modern look)
    Emoji,
    /// Unicode symbols (clean, native look)
    Unicode,
    /// ASCII characters (maximum compatibility)
    #[default]
    Ascii,
}

/// Note row icons
#[derive(Debug, Clone)]
pub struct NoteIcons {
    pub note: &'static str,
    pub favorite: &'static str,
    pub not_favorite: &'static str,
    pub image: &'static str,
}

/// UI element icons
#[derive(Debug, Clone)]
pub struct UiIcons {
    pub notes_title: &'static str,
    pub favorites_title: &'static str,
    pub categories_title: &'static str,
    pub study_plan_title: &'static str,
    pub error: &'static str,
    pub info: &'static str,
    pub warning: &'static str,
}

/// Status and metadata icons
#[derive(Debug, Clone)]
pub struct StatusIcons {
    pub date: &'static str,
    pub loading: &'static str,
    pub user: &'static str,
}

/// Complete icon set for a specific theme
#[derive(Debug, Clone)]
pub struct IconSet {
    pub note: NoteIcons,
    pub ui: UiIcons,
    pub status: StatusIcons,
}

/// Icon service for managing themes and providing icons
#[derive(Debug, Clone)]
pub struct IconService {
    current_theme: IconTheme,
}

impl Default for IconService {
    fn default() -> Self {
        Self::new(IconTheme::default())
    }
}

impl IconService {
    /// Create a new icon service with the specified theme
    #[must_use]
    pub fn new(theme: IconTheme) -> Self {
        Self { current_theme: theme }
    }

    /// Get the current theme
    #[must_use]
    pub fn theme(&self) -> IconTheme {
        self.current_theme
    }

    /// Cycle to the next icon theme in the sequence: Ascii -> Unicode -> Emoji -> Ascii
    pub fn cycle_icon_theme(&mut self) {
        self.current_theme = match self.current_theme {
            IconTheme::Ascii => IconTheme::Unicode,
            IconTheme::Unicode => IconTheme::Emoji,
            IconTheme::Emoji => IconTheme::Ascii,
        };
    }

    /// Get the complete icon set for the current theme
    #[must_use]
    pub fn icons(&self) -> IconSet {
        match self.current_theme {
            IconTheme::Emoji => Self::emoji_icons(),
            IconTheme::Unicode => Self::unicode_icons(),
            IconTheme::Ascii => Self::ascii_icons(),
        }
    }

    fn emoji_icons() -> IconSet {
        IconSet {
            note: NoteIcons {
                note: "📝",
                favorite: "⭐",
                not_favorite: "  ",
                image: "🖼️",
            },
            ui: UiIcons {
                notes_title: "📒",
                favorites_title: "⭐",
                categories_title: "📁",
                study_plan_title: "📅",
                error: "❌",
                info: "💡",
                warning: "⚠️",
            },
            status: StatusIcons {
                date: "📅",
                loading: "🔄",
                user: "👤",
            },
        }
    }

    fn unicode_icons() -> IconSet {
        IconSet {
            note: NoteIcons {
                note: "▪",
                favorite: "★",
                not_favorite: "☆",
                image: "▣",
            },
            ui: UiIcons {
                notes_title: "▶",
                favorites_title: "★",
                categories_title: "◆",
                study_plan_title: "◷",
                error: "✗",
                info: "ⓘ",
                warning: "⚠",
            },
            status: StatusIcons {
                date: "◷",
                loading: "⟳",
                user: "◉",
            },
        }
    }

    fn ascii_icons() -> IconSet {
        IconSet {
            note: NoteIcons {
                note: "-",
                favorite: "*",
                not_favorite: " ",
                image: "[img]",
            },
            ui: UiIcons {
                notes_title: ">",
                favorites_title: "*",
                categories_title: "#",
                study_plan_title: "@",
                error: "X",
                info: "i",
                warning: "!",
            },
            status: StatusIcons {
                date: "@",
                loading: "...",
                user: "~",
            },
        }
    }

    #[must_use]
    pub fn note(&self) -> &'static str {
        self.icons().note.note
    }

    /// Favorite marker for a note row, blank-ish when the note is not a favorite
    #[must_use]
    pub fn favorite_marker(&self, is_favorite: bool) -> &'static str {
        let icons = self.icons().note;
        if is_favorite {
            icons.favorite
        } else {
            icons.not_favorite
        }
    }

    #[must_use]
    pub fn image(&self) -> &'static str {
        self.icons().note.image
    }

    #[must_use]
    pub fn error(&self) -> &'static str {
        self.icons().ui.error
    }

    #[must_use]
    pub fn info(&self) -> &'static str {
        self.icons().ui.info
    }

    #[must_use]
    pub fn warning(&self) -> &'static str {
        self.icons().ui.warning
    }

    #[must_use]
    pub fn date(&self) -> &'static str {
        self.icons().status.date
    }

    #[must_use]
    pub fn loading(&self) -> &'static str {
        self.icons().status.loading
    }

    #[must_use]
    pub fn user(&self) -> &'static str {
        self.icons().status.user
    }
}
