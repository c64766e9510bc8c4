mod common;

use chrono::NaiveDate;
use common::ChatDbFixture;
use message_analysis_rust::db::ChatDatabase;
use message_analysis_rust::error::AnalysisError;
use message_analysis_rust::join::merge_data;
use message_analysis_rust::models::YearMonth;
use message_analysis_rust::repository::MessageSource;
use message_analysis_rust::utils::WallClock;
use rusqlite::Connection;

#[test]
fn test_open_and_load_three_tables() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Alice")
        .handle(2, "+15551234567")
        .message(1, 1, "2022-01-01 09:15:00", Some(7))
        .message(2, 2, "2022-02-01 23:59:59", Some(8))
        .message(3, 0, "2023-01-01 00:00:00", None);

    let db = fixture.open();
    assert_eq!(db.load_messages().expect("Failed to load messages").len(), 3);
    assert_eq!(db.load_handles().expect("Failed to load handles").len(), 2);
    assert_eq!(db.load_chat_message_links().expect("Failed to load links").len(), 2);
}

#[test]
fn test_timestamp_fields_derive_from_converted_value() {
    let fixture = ChatDbFixture::new();
    fixture.handle(1, "Alice").message(1, 1, "2022-03-04 17:45:09", Some(1));

    let messages = fixture.open().load_messages().expect("Failed to load messages");
    let time = messages[0].time;
    assert_eq!(time.date, NaiveDate::from_ymd_opt(2022, 3, 4).unwrap());
    assert_eq!((time.year, time.month, time.hour, time.minute), (2022, 3, 17, 45));
    assert_eq!(time.year_month, YearMonth::new(2022, 3));
    assert_ne!(i64::from(time.year), messages[0].raw_date);
}

#[test]
fn test_joined_rows_have_unique_ids_and_nullable_columns() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Alice")
        .message(1, 1, "2022-01-01 10:00:00", Some(7))
        .message(2, 42, "2022-01-02 10:00:00", None)
        .message(3, 0, "2022-01-03 10:00:00", Some(7));

    let db = fixture.open();
    let messages = db.load_messages().unwrap();
    let joined = merge_data(&messages, &db.load_handles().unwrap(), &db.load_chat_message_links().unwrap());

    assert_eq!(joined.len(), messages.len());
    let mut ids: Vec<_> = joined.iter().map(|r| r.message_id).collect();
    ids.dedup();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(joined[1].sender, None);
    assert_eq!(joined[1].chat_id, None);
    assert_eq!(joined[2].sender, None);
    assert_eq!(joined[2].chat_id, Some(7));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let result = ChatDatabase::open(&dir.path().join("nope.db"), WallClock::Utc);
    assert!(matches!(result, Err(AnalysisError::Database(_))));
}

#[test]
fn test_missing_table_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("partial.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE message (ROWID INTEGER PRIMARY KEY, text TEXT, handle_id INTEGER, date INTEGER, is_sent INTEGER);
             CREATE TABLE handle (ROWID INTEGER PRIMARY KEY, id TEXT);",
        )
        .unwrap();
    }

    let result = ChatDatabase::open(&path, WallClock::Utc);
    assert!(matches!(result, Err(AnalysisError::MissingTable(ref t)) if t == "chat_message_join"));
}

#[test]
fn test_not_a_database_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("chat.db");
    std::fs::write(&path, "definitely not sqlite\n".repeat(256)).unwrap();

    assert!(ChatDatabase::open(&path, WallClock::Utc).is_err());
}
