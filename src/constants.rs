//! Constants used throughout the application
//!
//! This module centralizes magic strings, UI text, and other constant values
//! to improve maintainability and consistency.

// Remote tables
pub const TABLE_NOTES: &str = "notes";
pub const TABLE_CATEGORIES: &str = "categories";
pub const TABLE_STUDY_PLAN: &str = "study_plan";
pub const TABLE_FAVORITES: &str = "favorites";

// Storage buckets
pub const DEFAULT_NOTE_IMAGE_BUCKET: &str = "note-images";
pub const DEFAULT_CATEGORY_IMAGE_BUCKET: &str = "materials";

// Backend defaults
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";
pub const DEFAULT_API_KEY_ENV: &str = "STUDYNOTES_SUPABASE_KEY";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const NEW_NOTE_ID: &str = "new";

// Success Messages
pub const SUCCESS_NOTE_SAVED: &str = "✅ Note saved";
pub const SUCCESS_REGISTERED: &str = "✅ Registered! Check your email to confirm your account.";

// Error Messages
pub const ERROR_LOGIN_FAILED: &str = "Login failed";
pub const ERROR_REGISTER_FAILED: &str = "Registration failed";
pub const ERROR_LOGOUT_FAILED: &str = "Logout failed";
pub const ERROR_LOAD_FAILED: &str = "Failed to load data";
pub const ERROR_NOTE_NOT_FOUND: &str = "Note not found";
pub const ERROR_NOTE_SAVE_FAILED: &str = "Failed to save note to the database";
pub const ERROR_INVALID_DATE: &str = "Date must use the YYYY-MM-DD format";
pub const ERROR_REQUIRED_FIELDS: &str = "Title and content are required";
pub const ERROR_CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const ERROR_CATEGORY_NAME_REQUIRED: &str = "Category name is required";
pub const ERROR_STUDY_PLAN_FIELDS: &str = "Title and date are required";
pub const ERROR_IMAGE_READ_FAILED: &str = "Could not read image";
pub const ERROR_NO_API_KEY: &str = "❌ Error: Supabase API key environment variable not set";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_LOGS: &str = "🔍 Logs - Press 'Esc', 'G' or 'q' to close";

// Study plan section headers
pub const HEADER_OVERDUE: &str = "⏰ Overdue";
pub const HEADER_TODAY: &str = "📅 Today";
pub const HEADER_UPCOMING: &str = "🗓 Upcoming";
pub const HEADER_UNCATEGORIZED: &str = "Uncategorized";

// UI Layout Constants
/// Minimum sidebar width in columns
pub const SIDEBAR_MIN_WIDTH: u16 = 15;
/// Maximum sidebar width in columns
pub const SIDEBAR_MAX_WIDTH: u16 = 50;
/// Default sidebar width in columns
pub const SIDEBAR_DEFAULT_WIDTH: u16 = 24;

/// Number of log lines kept in memory for the logs dialog
pub const MAX_IN_MEMORY_LOGS: usize = 1000;
