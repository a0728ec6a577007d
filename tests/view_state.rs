use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use studynotes::backend::MemoryBackend;
use studynotes::config::BackendConfig;
use studynotes::constants::{
    ERROR_CATEGORY_NAME_REQUIRED, ERROR_INVALID_DATE, ERROR_REQUIRED_FIELDS, ERROR_STUDY_PLAN_FIELDS,
    HEADER_UNCATEGORIZED, NEW_NOTE_ID, SUCCESS_REGISTERED,
};
use studynotes::repositories::Repositories;
use studynotes::session::SessionStore;
use studynotes::view_state::{CoverImage, StudyPlanSection, ViewStates};

fn view_states(backend: Arc<MemoryBackend>) -> ViewStates {
    let repositories = Repositories::new(backend, &BackendConfig::default(), Arc::new(SessionStore::disabled()));
    ViewStates::new(&repositories)
}

async fn signed_in() -> (Arc<MemoryBackend>, ViewStates) {
    let backend = Arc::new(MemoryBackend::new());
    let states = view_states(backend.clone());
    states.auth.on_email_change("ada@example.com");
    states.auth.on_password_change("secret1");
    states.auth.register().await;
    assert!(states.auth.snapshot().is_success);
    (backend, states)
}

/// Create a note through the entry dialog state
async fn add_note(states: &ViewStates, title: &str, content: &str, category_id: Option<String>) {
    states.notes.load_note_detail(NEW_NOTE_ID).await;
    states.notes.update_title(title);
    states.notes.update_content(content);
    states.notes.update_category(category_id);
    assert!(states.notes.save_note().await);
}

fn temp_image(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("studynotes_view_state_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    path
}

#[tokio::test]
async fn test_login_with_wrong_password_reports_error() {
    let (_, states) = signed_in().await;
    states.auth.logout().await;
    assert!(!states.auth.snapshot().is_success);

    states.auth.on_email_change("ada@example.com");
    states.auth.on_password_change("nope-nope");
    states.auth.login().await;

    let state = states.auth.snapshot();
    assert!(!state.is_success);
    assert!(!state.is_loading);
    assert!(state.error.is_some());

    states.auth.on_password_change("secret1");
    states.auth.login().await;
    let state = states.auth.snapshot();
    assert!(state.is_success);
    assert!(state.password.is_empty());
}

#[tokio::test]
async fn test_register_with_email_confirmation_shows_message() {
    let states = view_states(Arc::new(MemoryBackend::with_email_confirmation()));
    states.auth.on_email_change("ada@example.com");
    states.auth.on_password_change("secret1");
    states.auth.register().await;

    let state = states.auth.snapshot();
    assert!(!state.is_success);
    assert_eq!(state.message.as_deref(), Some(SUCCESS_REGISTERED));
}

#[tokio::test]
async fn test_check_session_fills_email() {
    let (_, states) = signed_in().await;
    states.auth.on_email_change("");
    states.auth.check_session().await;

    let state = states.auth.snapshot();
    assert!(state.is_success);
    assert_eq!(state.email, "ada@example.com");
}

#[tokio::test]
async fn test_save_requires_title_and_content() {
    let (_, states) = signed_in().await;
    states.notes.load_note_detail(NEW_NOTE_ID).await;
    states.notes.update_title("Only a title");
    states.notes.update_content("   ");

    assert!(!states.notes.save_note().await);
    assert_eq!(states.notes.entry().get().error.as_deref(), Some(ERROR_REQUIRED_FIELDS));
}

#[tokio::test]
async fn test_notes_grouped_and_filtered() {
    let (_, states) = signed_in().await;
    states.categories.add_category_with_image("Biology", None).await;
    let biology = states.categories.snapshot().categories[0].id.clone();

    add_note(&states, "Mitosis", "Cell division", biology.clone()).await;
    add_note(&states, "Shopping", "Milk", None).await;
    states.notes.load_notes().await;

    let list = states.notes.list().get();
    let groups: Vec<(String, usize)> = list
        .grouped_by_category()
        .into_iter()
        .map(|(header, notes)| (header, notes.len()))
        .collect();
    assert_eq!(groups, vec![("Biology".to_string(), 1), (HEADER_UNCATEGORIZED.to_string(), 1)]);

    states.notes.cycle_category_filter();
    let visible = states.notes.list().get().visible_notes();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Mitosis");

    // Past the last category the filter is cleared
    states.notes.cycle_category_filter();
    assert_eq!(states.notes.list().get().category_filter, None);

    states.notes.set_search("MILK");
    let visible = states.notes.list().get().visible_notes();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Shopping");
}

#[tokio::test]
async fn test_edit_note_keeps_image_unless_removed() {
    let (backend, states) = signed_in().await;
    let image = temp_image("note.jpg");

    states.notes.load_note_detail(NEW_NOTE_ID).await;
    states.notes.update_title("Diagram");
    states.notes.update_content("See picture");
    states.notes.update_selected_image(Some(image.display().to_string()));
    assert!(states.notes.save_note().await);
    assert_eq!(backend.object_count("note-images").await, 1);

    let id = states.notes.entry().get().current_note.unwrap().id.unwrap();
    states.notes.load_note_detail(&id).await;
    let entry = states.notes.entry().get();
    assert!(entry.is_edit_mode());
    assert!(entry.existing_image_url.is_some());

    states.notes.update_title("Diagram v2");
    assert!(states.notes.save_note().await);
    let saved = states.notes.entry().get().current_note.unwrap();
    assert_eq!(saved.title, "Diagram v2");
    assert!(saved.image_url.is_some());

    states.notes.remove_existing_image();
    assert!(states.notes.save_note().await);
    assert_eq!(states.notes.entry().get().current_note.unwrap().image_url, None);
}

#[tokio::test]
async fn test_missing_image_file_fails_save() {
    let (_, states) = signed_in().await;
    states.notes.load_note_detail(NEW_NOTE_ID).await;
    states.notes.update_title("Diagram");
    states.notes.update_content("See picture");
    states.notes.update_selected_image(Some("/definitely/not/here.jpg".to_string()));

    assert!(!states.notes.save_note().await);
    let entry = states.notes.entry().get();
    assert!(entry.error.is_some());
    assert!(!entry.is_saving);
}

#[tokio::test]
async fn test_load_unknown_note_reports_not_found() {
    let (_, states) = signed_in().await;
    states.notes.load_note_detail("missing").await;
    let entry = states.notes.entry().get();
    assert!(entry.is_ready);
    assert!(entry.error.is_some());
}

#[tokio::test]
async fn test_favorites_follow_toggles() {
    let (_, states) = signed_in().await;
    add_note(&states, "Cells", "Organelles", None).await;
    add_note(&states, "Atoms", "Protons", None).await;
    states.notes.load_notes().await;

    let cells_id = states
        .notes
        .list()
        .get()
        .notes
        .iter()
        .find(|n| n.title == "Cells")
        .and_then(|n| n.id.clone())
        .unwrap();

    states.notes.toggle_favorite(&cells_id).await;
    assert!(states.notes.list().get().favorite_ids.contains(&cells_id));

    states.favorites.load().await;
    let favorites = states.favorites.snapshot();
    assert_eq!(favorites.notes.len(), 1);
    assert_eq!(favorites.notes[0].title, "Cells");

    // Unfavoriting from the favorites screen drops the note from it
    states.favorites.toggle_favorite(&cells_id).await;
    assert!(states.favorites.snapshot().notes.is_empty());

    states.notes.load_notes().await;
    assert!(states.notes.list().get().favorite_ids.is_empty());
}

#[tokio::test]
async fn test_delete_note_removes_it_from_list() {
    let (_, states) = signed_in().await;
    add_note(&states, "Temp", "To delete", None).await;
    states.notes.load_notes().await;
    let id = states.notes.list().get().notes[0].id.clone().unwrap();

    states.notes.delete_note(&id).await;
    assert!(states.notes.list().get().notes.is_empty());
}

#[tokio::test]
async fn test_category_cover_replaced_and_cleared() {
    let (backend, states) = signed_in().await;

    states.categories.add_category_with_image("Physics", Some(vec![1, 2, 3])).await;
    let category = states.categories.snapshot().categories[0].clone();
    let id = category.id.clone().unwrap();
    let first_cover = category.image_url.clone().unwrap();
    assert!(first_cover.contains("materials"));
    assert_eq!(backend.object_count("materials").await, 1);

    // Object names are millisecond timestamps
    tokio::time::sleep(Duration::from_millis(5)).await;

    states
        .categories
        .update_category_with_image(&id, "Physics", Some(first_cover.clone()), CoverImage::Replace(vec![4, 5, 6]))
        .await;
    let replaced = states.categories.snapshot().categories[0].image_url.clone().unwrap();
    assert_ne!(replaced, first_cover);
    assert_eq!(backend.object_count("materials").await, 1);

    states
        .categories
        .update_category_with_image(&id, "Mechanics", Some(replaced), CoverImage::Clear)
        .await;
    let cleared = states.categories.snapshot().categories[0].clone();
    assert_eq!(cleared.name, "Mechanics");
    assert_eq!(cleared.image_url, None);
    assert_eq!(backend.object_count("materials").await, 0);
}

#[tokio::test]
async fn test_delete_category_removes_cover() {
    let (backend, states) = signed_in().await;
    states.categories.add_category_with_image("Chemistry", Some(vec![7])).await;
    let id = states.categories.snapshot().categories[0].id.clone().unwrap();

    states.categories.delete_category(&id).await;
    assert!(states.categories.snapshot().categories.is_empty());
    assert_eq!(backend.object_count("materials").await, 0);
}

#[tokio::test]
async fn test_update_missing_category_keeps_no_new_cover() {
    let (backend, states) = signed_in().await;
    states.categories.add_category_with_image("Chemistry", Some(vec![7])).await;
    let existing = states.categories.snapshot().categories[0].clone();
    assert_eq!(backend.object_count("materials").await, 1);

    tokio::time::sleep(Duration::from_millis(5)).await;

    states
        .categories
        .update_category_with_image("no-such-id", "Physics", existing.image_url.clone(), CoverImage::Replace(vec![8, 9]))
        .await;

    let state = states.categories.snapshot();
    assert!(state.error.is_some());
    assert!(!state.is_loading);
    // The upload for the failed update is gone, the existing cover is kept
    assert_eq!(backend.object_count("materials").await, 1);
    assert_eq!(state.categories, vec![existing]);
}

#[tokio::test]
async fn test_blank_category_name_rejected() {
    let (_, states) = signed_in().await;
    states.categories.add_category_with_image("   ", None).await;
    assert_eq!(
        states.categories.snapshot().error.as_deref(),
        Some(ERROR_CATEGORY_NAME_REQUIRED)
    );

    states.categories.reset_error();
    assert_eq!(states.categories.snapshot().error, None);
}

#[tokio::test]
async fn test_unreadable_cover_file_reported() {
    let (_, states) = signed_in().await;
    assert!(states.categories.read_image("/definitely/not/here.jpg").await.is_none());
    assert!(states.categories.snapshot().error.is_some());
}

#[tokio::test]
async fn test_study_plans_sorted_and_validated() {
    let (_, states) = signed_in().await;
    states.study_plan.add_study_plan("Physics", "2025-05-02").await;
    states.study_plan.add_study_plan("Chemistry", "2025-05-01").await;
    states.study_plan.add_study_plan("Biology", "2025-05-02").await;

    let titles: Vec<String> = states
        .study_plan
        .snapshot()
        .study_plans
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Chemistry", "Biology", "Physics"]);

    // Blank additions are ignored without an error
    states.study_plan.add_study_plan("", "2025-05-03").await;
    let state = states.study_plan.snapshot();
    assert_eq!(state.study_plans.len(), 3);
    assert_eq!(state.error, None);

    states.study_plan.add_study_plan("History", "May 3rd").await;
    assert_eq!(states.study_plan.snapshot().error.as_deref(), Some(ERROR_INVALID_DATE));
    states.study_plan.clear_error();

    let id = state.study_plans[0].id.clone().unwrap();
    states.study_plan.update_study_plan(&id, "", "2025-05-01").await;
    assert_eq!(states.study_plan.snapshot().error.as_deref(), Some(ERROR_STUDY_PLAN_FIELDS));
    states.study_plan.clear_error();

    states.study_plan.update_study_plan(&id, "Organic chemistry", "2025-05-04").await;
    let state = states.study_plan.snapshot();
    assert_eq!(state.study_plans.last().unwrap().title, "Organic chemistry");

    states.study_plan.delete_study_plan(&id).await;
    assert_eq!(states.study_plan.snapshot().study_plans.len(), 2);
}

#[tokio::test]
async fn test_study_plan_sections() {
    let (_, states) = signed_in().await;
    states.study_plan.add_study_plan("Past", "2025-04-30").await;
    states.study_plan.add_study_plan("Now", "2025-05-01").await;
    states.study_plan.add_study_plan("Later", "2025-05-10").await;

    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let sections: Vec<(StudyPlanSection, Vec<String>)> = states
        .study_plan
        .snapshot()
        .sections(today)
        .into_iter()
        .map(|(section, plans)| (section, plans.into_iter().map(|p| p.title).collect()))
        .collect();

    assert_eq!(
        sections,
        vec![
            (StudyPlanSection::Overdue, vec!["Past".to_string()]),
            (StudyPlanSection::Today, vec!["Now".to_string()]),
            (StudyPlanSection::Upcoming, vec!["Later".to_string()]),
        ]
    );
}

#[tokio::test]
async fn test_observable_notifies_subscribers() {
    let (_, states) = signed_in().await;
    let mut rx = states.study_plan.state().subscribe();

    states.study_plan.add_study_plan("Revision", "2025-06-01").await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().study_plans.len(), 1);
}

#[tokio::test]
async fn test_logout_leaves_no_previous_user_data() {
    let (_, states) = signed_in().await;
    states.categories.add_category_with_image("Biology", None).await;
    let biology = states.categories.snapshot().categories[0].id.clone();
    add_note(&states, "Cells", "Mitochondria", biology).await;
    states.notes.load_notes().await;
    let cells_id = states.notes.list().get().notes[0].id.clone().unwrap();
    states.notes.toggle_favorite(&cells_id).await;
    states.favorites.load().await;
    states.study_plan.add_study_plan("Physics", "2025-05-02").await;
    states.notes.set_search("cell");
    states.notes.load_note_detail(&cells_id).await;

    assert!(!states.notes.list().get().notes.is_empty());
    assert!(!states.favorites.snapshot().notes.is_empty());
    assert!(!states.categories.snapshot().categories.is_empty());
    assert!(!states.study_plan.snapshot().study_plans.is_empty());

    states.auth.logout().await;
    assert!(!states.auth.snapshot().is_success);
    states.reset_user_data();

    let list = states.notes.list().get();
    assert!(list.notes.is_empty());
    assert!(list.categories.is_empty());
    assert!(list.favorite_ids.is_empty());
    assert!(list.search.is_empty());
    let entry = states.notes.entry().get();
    assert!(entry.current_note.is_none());
    assert_eq!(entry.title, "");
    assert!(states.favorites.snapshot().notes.is_empty());
    assert!(states.categories.snapshot().categories.is_empty());
    assert!(states.study_plan.snapshot().study_plans.is_empty());
}
