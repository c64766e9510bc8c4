mod common;

use common::ChatDbFixture;
use message_analysis_rust::aggregate::{messages_per_sender, top_senders_by_month};
use message_analysis_rust::filters::single_sender;
use message_analysis_rust::models::{SenderCount, YearMonth};
use message_analysis_rust::report::{write_chats, write_messages_per_year, write_summary};
use message_analysis_rust::service::{AnalysisOptions, AnalysisService};

fn keep_everything() -> AnalysisOptions {
    AnalysisOptions {
        remove_non_contacts: false,
        ..AnalysisOptions::default()
    }
}

fn render<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> String {
    let mut buf = Vec::new();
    f(&mut buf).expect("Failed to render");
    String::from_utf8(buf).expect("Output is not UTF-8")
}

/// Two people in a shared chat plus one-on-one chats with each
fn household() -> ChatDbFixture {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Alice")
        .handle(2, "Bob")
        .handle(3, "+15551234567")
        .handle(4, "carol@example.com")
        .message(1, 1, "2022-01-03 08:00:00", Some(5))
        .message(2, 1, "2022-01-04 08:00:00", Some(5))
        .message(3, 2, "2022-01-05 08:00:00", Some(5))
        .message(4, 1, "2022-01-06 08:00:00", Some(7))
        .message(5, 1, "2022-02-01 08:00:00", Some(7))
        .message(6, 2, "2022-02-02 08:00:00", Some(8))
        .message(7, 3, "2022-02-03 08:00:00", Some(9))
        .message(8, 4, "2023-03-01 08:00:00", Some(10));
    fixture
}

#[test]
fn test_messages_per_year_output() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Jordan")
        .message(1, 1, "2022-01-01 12:00:00", Some(1))
        .message(2, 1, "2022-02-01 12:00:00", Some(1))
        .message(3, 1, "2023-01-01 12:00:00", Some(1));

    let report = AnalysisService::new(fixture.open()).analyze(&AnalysisOptions::default()).unwrap();
    let text = render(|out| write_messages_per_year(out, &report.messages_per_year));
    assert_eq!(text, "Messages in 2022: 2\nMessages in 2023: 1\n");
}

#[test]
fn test_sender_totals_descending() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "John")
        .handle(2, "Jane")
        .message(1, 1, "2022-01-01 12:00:00", Some(1))
        .message(2, 2, "2022-01-02 12:00:00", Some(2))
        .message(3, 1, "2022-01-03 12:00:00", Some(1));

    let report = AnalysisService::new(fixture.open()).analyze(&AnalysisOptions::default()).unwrap();
    assert_eq!(
        report.top_senders,
        vec![
            SenderCount { sender: "John".to_string(), count: 2 },
            SenderCount { sender: "Jane".to_string(), count: 1 },
        ]
    );
}

#[test]
fn test_shared_chat_is_banned_from_dm_lookup() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Alice")
        .handle(2, "Bob")
        .message(1, 1, "2022-01-01 12:00:00", Some(5))
        .message(2, 1, "2022-01-02 12:00:00", Some(5))
        .message(3, 2, "2022-01-03 12:00:00", Some(5))
        .message(4, 1, "2022-01-04 12:00:00", Some(7))
        .message(5, 1, "2022-01-05 12:00:00", Some(7));

    let classification = AnalysisService::new(fixture.open()).classify(&keep_everything()).unwrap();
    assert!(classification.is_group(5));
    assert!(!classification.is_group(7));

    let dms = classification.dm_chat_ids();
    assert_eq!(dms.len(), 1);
    assert_eq!(dms.get("Alice"), Some(&7));

    let text = render(|out| write_chats(out, &classification));
    assert!(text.contains("Alice: 7\n"));
    assert!(text.contains("\nGROUP CHATS\n\n5\n"));
}

#[test]
fn test_leaderboard_ignores_senders_past_the_cutoff() {
    let fixture = ChatDbFixture::new();
    fixture.handle(1, "A").handle(2, "B").handle(3, "C").handle(4, "D");
    let mut id = 0;
    for (handle, count) in [(1, 4), (2, 3), (3, 2), (4, 1)] {
        for _ in 0..count {
            id += 1;
            fixture.message(id, handle, "2022-01-15 12:00:00", Some(handle));
        }
    }

    let options = AnalysisOptions {
        top_per_month: 3,
        ..AnalysisOptions::default()
    };
    let report = AnalysisService::new(fixture.open()).analyze(&options).unwrap();

    let scores: Vec<_> = report.leaderboard.iter().map(|e| (e.sender.as_str(), e.score)).collect();
    assert_eq!(scores, vec![("A", 5), ("B", 4), ("C", 3)]);
    assert!(report.top_senders_by_month.iter().all(|r| r.sender != "D"));
}

#[test]
fn test_non_contacts_removed_by_default() {
    let report = AnalysisService::new(household().open()).analyze(&AnalysisOptions::default()).unwrap();

    let senders: Vec<_> = report.top_senders.iter().map(|s| s.sender.as_str()).collect();
    assert_eq!(senders, vec!["Alice", "Bob"]);
    assert_eq!(report.total_messages, 6);
    assert_eq!(report.messages_per_year.len(), 1);
}

#[test]
fn test_non_contacts_kept_when_disabled() {
    let report = AnalysisService::new(household().open()).analyze(&keep_everything()).unwrap();

    assert_eq!(report.total_messages, 8);
    assert!(report.top_senders.iter().any(|s| s.sender == "+15551234567"));
    assert!(report.top_senders.iter().any(|s| s.sender == "carol@example.com"));
}

#[test]
fn test_exclude_groups_and_chat() {
    let fixture = household();
    let options = AnalysisOptions {
        exclude_groups: true,
        excluded_chat_ids: vec![8],
        ..AnalysisOptions::default()
    };
    let mut service = AnalysisService::new(fixture.open());
    let rows = service.filtered_rows(&options).unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r.message_id).collect();
    assert_eq!(ids, vec![4, 5]);
    assert_eq!(service.metrics().dropped_by("remove_non_contacts"), 2);
    assert_eq!(service.metrics().dropped_by("exclude_chat"), 1);
    assert_eq!(service.metrics().dropped_by("exclude_groups"), 3);
}

#[test]
fn test_single_chat_matches_manual_filter() {
    let fixture = household();
    let mut service = AnalysisService::new(fixture.open());

    let all_rows = service.filtered_rows(&keep_everything()).unwrap();
    let manual: Vec<_> = all_rows.iter().filter(|r| r.chat_id == Some(5)).cloned().collect();

    let options = AnalysisOptions {
        single_chat: Some(5),
        ..keep_everything()
    };
    let scoped = service.filtered_rows(&options).unwrap();

    assert_eq!(scoped, manual);
    assert_eq!(messages_per_sender(&scoped), messages_per_sender(&manual));
}

#[test]
fn test_monthly_volume_for_one_sender() {
    let mut service = AnalysisService::new(household().open());
    let volume = service.monthly_volume(&AnalysisOptions::default(), "Alice").unwrap();

    assert_eq!(volume.sender, "Alice");
    assert_eq!(volume.months, vec![(YearMonth::new(2022, 1), 3), (YearMonth::new(2022, 2), 1)]);

    let rows = service.filtered_rows(&AnalysisOptions::default()).unwrap();
    assert_eq!(single_sender(&rows, "Alice").len(), 4);
    assert!(service.monthly_volume(&AnalysisOptions::default(), "Nobody").unwrap().months.is_empty());
}

#[test]
fn test_message_in_several_chats_counts_once_per_chat() {
    let fixture = ChatDbFixture::new();
    fixture
        .handle(1, "Alice")
        .message(1, 1, "2022-01-01 12:00:00", Some(5))
        .link(6, 1)
        .message(2, 1, "2022-01-02 12:00:00", None);

    let rows = AnalysisService::new(fixture.open()).filtered_rows(&keep_everything()).unwrap();
    let chats: Vec<_> = rows.iter().map(|r| (r.message_id, r.chat_id)).collect();
    assert_eq!(chats, vec![(1, Some(5)), (1, Some(6)), (2, None)]);

    let monthly = top_senders_by_month(&rows, 5);
    assert_eq!(monthly[0].count, 3);
}

#[test]
fn test_summary_output_sections() {
    let report = AnalysisService::new(household().open()).analyze(&AnalysisOptions::default()).unwrap();
    let text = render(|out| write_summary(out, &report));

    assert!(text.starts_with("\nTOP 20 SENDERS\n\n"));
    assert!(text.contains("\nTOP 5 SENDERS PER MONTH\n"));
    assert!(text.contains("2022-01"));
    assert!(text.contains("2022-02"));
}
