use serde_json::json;
use studynotes::backend::{Order, Query};

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[test]
fn test_select_all_by_default() {
    let pairs = Query::table("categories").to_pairs();
    assert_eq!(pairs, vec![pair("select", "*")]);
}

#[test]
fn test_note_list_query_pairs() {
    let query = Query::table("notes")
        .columns(&["id", "title", "date_created"])
        .eq("user_id", "u1")
        .order("date_created", Order::Descending)
        .limit(20);

    assert_eq!(
        query.to_pairs(),
        vec![
            pair("select", "id,title,date_created"),
            pair("user_id", "eq.u1"),
            pair("order", "date_created.desc"),
            pair("limit", "20"),
        ]
    );
    // PATCH and DELETE send only the filters
    assert_eq!(query.filter_pairs(), vec![pair("user_id", "eq.u1")]);
}

#[test]
fn test_matches_every_filter() {
    let query = Query::table("favorites").eq("user_id", "u1").eq("note_id", "n1");

    assert!(query.matches(&json!({ "user_id": "u1", "note_id": "n1" })));
    assert!(!query.matches(&json!({ "user_id": "u1", "note_id": "n2" })));
    assert!(!query.matches(&json!({ "user_id": "u1" })));
}

#[test]
fn test_matches_null_and_numbers() {
    assert!(Query::table("notes").eq("category_id", "null").matches(&json!({ "category_id": null })));
    assert!(Query::table("t").eq("count", "3").matches(&json!({ "count": 3 })));
}

#[test]
fn test_project_keeps_selected_columns() {
    let query = Query::table("notes").columns(&["id", "title"]);
    let row = json!({ "id": "n1", "title": "Cells", "content": "Mitosis" });
    assert_eq!(query.project(&row), json!({ "id": "n1", "title": "Cells" }));

    // Without a projection the row is returned whole
    assert_eq!(Query::table("notes").project(&row), row);
}
