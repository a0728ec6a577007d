/// Screens reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Notes,
    Favorites,
    Categories,
    StudyPlan,
}

impl View {
    pub const ALL: [View; 4] = [View::Notes, View::Favorites, View::Categories, View::StudyPlan];

    /// Parse a `ui.start_view` config value, falling back to the notes view.
    pub fn from_config_name(name: &str) -> Self {
        match name {
            "favorites" => View::Favorites,
            "categories" => View::Categories,
            "study_plan" => View::StudyPlan,
            _ => View::Notes,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Notes => "Notes",
            View::Favorites => "Favorites",
            View::Categories => "Categories",
            View::StudyPlan => "Study Plan",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

/// Change requested for a category's cover image in the edit dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverChange {
    Keep,
    Clear,
    /// Local file to upload as the new cover
    Replace(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateTo(View),
    NextItem,
    PreviousItem,
    Reload,

    // Authentication
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
    },
    Logout,
    AuthFinished,

    // Note operations
    OpenNoteEditor(Option<String>),
    NoteEditorReady,
    SaveNote {
        title: String,
        content: String,
        category_id: Option<String>,
        image_path: Option<String>,
        remove_image: bool,
    },
    NoteSaved(bool),
    DeleteNote(String),
    ToggleFavorite(String),
    CycleCategoryFilter,
    ToggleFavoritesOnly,
    SearchNotes(String),
    ShowCategoryNotes(String),

    // Category operations
    CreateCategory {
        name: String,
        image_path: Option<String>,
    },
    EditCategory {
        id: String,
        name: String,
        current_image_url: Option<String>,
        cover: CoverChange,
    },
    DeleteCategory(String),

    // Study plan operations
    CreateStudyPlan {
        title: String,
        date: String,
    },
    EditStudyPlan {
        id: String,
        title: String,
        date: String,
    },
    DeleteStudyPlan(String),

    /// A background operation touching `View` finished; refresh it from its view state
    OperationCompleted(View),

    // UI operations
    CycleIconTheme,
    ShowDialog(DialogType),
    HideDialog,

    // App control
    Quit,
    None,
}

#[derive(Debug, Clone)]
pub enum DialogType {
    NoteEditor {
        note_id: Option<String>,
        title: String,
        content: String,
        category_id: Option<String>,
        image_url: Option<String>,
    },
    NoteSearch {
        query: String,
    },
    CategoryCreation,
    CategoryEdit {
        category_id: String,
        name: String,
        image_url: Option<String>,
    },
    StudyPlanCreation,
    StudyPlanEdit {
        plan_id: String,
        title: String,
        date: String,
    },
    DeleteConfirmation {
        item_type: String,
        item_id: String,
    },
    Error(String),
    Info(String),
    Help,
    Logs,
}
