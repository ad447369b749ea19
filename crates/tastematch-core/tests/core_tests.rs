use std::cmp::Ordering;
use std::fs;
use tempfile::TempDir;

use tastematch_core::config::{Config, Selection, TieBreak};
use tastematch_core::rows::{load_rows, parse_rows};
use tastematch_core::types::{compare_ids, EntityKind};

#[test]
fn load_rows_accepts_numeric_and_string_ids() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("users.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"entity_id\": 1, \"tag_name\": \"vegan\", \"category_id\": 2, \"category_name\": \"diet\"}\n",
            "\n",
            "{\"entity_id\": \"a-7\", \"entity_kind\": \"user\", \"tag_name\": \"spicy\"}\n",
        ),
    )
    .unwrap();

    let rows = load_rows(&path, EntityKind::User).expect("load");
    assert_eq!(rows.len(), 2, "blank line skipped");
    assert_eq!(rows[0].entity_id, "1");
    assert_eq!(rows[0].category_name.as_deref(), Some("diet"));
    assert_eq!(rows[1].entity_id, "a-7");
    assert!(rows.iter().all(|r| r.entity_kind == EntityKind::User));
}

#[test]
fn parse_rows_rejects_rows_of_the_other_kind() {
    let content = "{\"entity_id\": 1, \"entity_kind\": \"restaurant\", \"tag_name\": \"vegan\"}";
    let err = parse_rows(content, EntityKind::User).unwrap_err();
    assert!(err.to_string().contains("expected a user row"), "{err}");
}

#[test]
fn parse_rows_reports_the_bad_line() {
    let content = "{\"entity_id\": 1, \"tag_name\": \"vegan\"}\n{not json}\n";
    let err = parse_rows(content, EntityKind::Restaurant).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");
}

#[test]
fn config_loads_toml_sections() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        r#"
[pipeline]
delimiter = " "
tie_break = "profile_order"

[pipeline.selection]
mode = "cross_product"

[store]
table = "recommendations"
"#,
    )
    .unwrap();

    let config = Config::load_from(tmp.path()).expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.pipeline.delimiter, " ");
    assert_eq!(settings.pipeline.selection, Selection::CrossProduct);
    assert_eq!(settings.pipeline.tie_break, TieBreak::ProfileOrder);
    assert_eq!(settings.store.table, "recommendations");
    assert_eq!(settings.input.user_rows, "data/user_tags.jsonl", "unset sections keep defaults");
    assert_eq!(config.get::<String>("store.table").expect("key"), "recommendations");
}

#[test]
fn config_rejects_zero_k() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[pipeline.selection]\nmode = \"top_k\"\nk = 0\n").unwrap();
    assert!(Config::load_from(tmp.path()).is_err());
}

#[test]
fn entity_ids_order_numerically_before_text() {
    assert_eq!(compare_ids("9", "10"), Ordering::Less);
    assert_eq!(compare_ids("10", "10"), Ordering::Equal);
    assert_eq!(compare_ids("10", "1a"), Ordering::Less);
    assert_eq!(compare_ids("1a", "9"), Ordering::Greater);
    assert_eq!(compare_ids("alpha", "beta"), Ordering::Less);

    let mut ids = vec!["b", "10", "a", "9", "100"];
    ids.sort_by(|a, b| compare_ids(a, b));
    assert_eq!(ids, ["9", "10", "100", "a", "b"]);
}
