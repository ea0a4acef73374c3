// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::{card, ts, MockRemote};
use yare::parameterized;

fn manager() -> (Arc<MockRemote>, ArchiveManager<MockRemote>) {
    let remote = Arc::new(MockRemote::new());
    (Arc::clone(&remote), ArchiveManager::new(remote))
}

#[tokio::test]
async fn archive_missing_card_is_not_found() {
    let (_, mgr) = manager();
    let err = mgr.archive("ghost", "u1").await.unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            collection: Collection::Cards,
            ..
        }
    ));
}

#[tokio::test]
async fn archive_records_metadata() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 3.0));

    let archived = mgr.archive("c1", "u7").await.unwrap();
    assert!(archived.archived);
    assert_eq!(archived.archived_by.as_deref(), Some("u7"));
    assert_eq!(archived.original_list_id.as_deref(), Some("l1"));

    let stored: Card = remote.stored("c1").unwrap();
    assert_eq!(stored, archived);
}

#[tokio::test]
async fn archive_then_restore_returns_card_after_active_cards() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    remote.seed(&card("c2", "b1", "l1", 4.5));
    remote.seed(&card("c3", "b1", "l1", 2.0));

    mgr.archive("c3", "u1").await.unwrap();
    let restored = mgr.restore("c3", None).await.unwrap();

    assert_eq!(restored.list_id, "l1");
    assert!(!restored.archived);
    assert!(restored.archived_at.is_none());
    assert!(restored.archived_by.is_none());
    assert!(restored.original_list_id.is_none());
    assert!(restored.position >= 4.5);
    assert_eq!(restored.position, 5.5);

    let stored: Card = remote.stored("c3").unwrap();
    assert_eq!(stored, restored);
}

#[tokio::test]
async fn restore_defaults_to_original_list_after_move() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    mgr.archive("c1", "u1").await.unwrap();

    // Another client moves the archived card before it is restored.
    remote
        .inner
        .insert(Collection::Cards, "c1", {
            let mut moved: Card = remote.stored("c1").unwrap();
            moved.list_id = "l2".to_string();
            to_document(&moved).unwrap()
        })
        .unwrap();

    let restored = mgr.restore("c1", None).await.unwrap();
    assert_eq!(restored.list_id, "l1");
}

#[tokio::test]
async fn restore_into_target_list() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    remote.seed(&card("c9", "b1", "l2", 7.0));
    mgr.archive("c1", "u1").await.unwrap();

    let restored = mgr.restore("c1", Some("l2")).await.unwrap();
    assert_eq!(restored.list_id, "l2");
    assert_eq!(restored.position, 8.0);
}

#[tokio::test]
async fn restore_into_empty_list_is_position_zero() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 9.0));
    mgr.archive("c1", "u1").await.unwrap();

    let restored = mgr.restore("c1", Some("empty")).await.unwrap();
    assert_eq!(restored.position, 0.0);
}

#[tokio::test]
async fn restore_ignores_archived_and_tombstoned_positions() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 1.0));
    remote.seed(&card("c2", "b1", "l1", 50.0));
    remote.seed(&card("c3", "b1", "l1", 90.0));
    mgr.archive("c2", "u1").await.unwrap();
    mgr.archive("c3", "u1").await.unwrap();
    mgr.permanently_delete("c3").await.unwrap();

    let restored = mgr.restore("c2", None).await.unwrap();
    assert_eq!(restored.position, 2.0);
}

#[tokio::test]
async fn restore_of_active_card_is_invalid_state() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));

    let err = mgr.restore("c1", None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(remote.writes().is_empty());
}

#[tokio::test]
async fn restore_of_tombstone_is_invalid_state() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    mgr.archive("c1", "u1").await.unwrap();
    mgr.permanently_delete("c1").await.unwrap();

    let err = mgr.restore("c1", None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[tokio::test]
async fn permanently_delete_requires_archived() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));

    let err = mgr.permanently_delete("c1").await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(!remote.stored::<Card>("c1").unwrap().permanently_deleted);
}

#[tokio::test]
async fn permanently_delete_sets_tombstone_and_keeps_archived() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    mgr.archive("c1", "u1").await.unwrap();

    let deleted = mgr.permanently_delete("c1").await.unwrap();
    assert!(deleted.permanently_deleted);
    assert!(deleted.deleted_at.is_some());
    assert!(deleted.archived);

    let stored: Card = remote.stored("c1").unwrap();
    assert!(stored.permanently_deleted);
    assert!(stored.archived);
}

#[tokio::test]
async fn double_archive_keeps_first_original_list() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    mgr.archive("c1", "u1").await.unwrap();

    let mut moved: Card = remote.stored("c1").unwrap();
    moved.list_id = "l2".to_string();
    remote.seed(&moved);

    let again = mgr.archive("c1", "u2").await.unwrap();
    assert_eq!(again.original_list_id.as_deref(), Some("l1"));
    assert_eq!(again.archived_by.as_deref(), Some("u2"));
}

#[tokio::test]
async fn archive_of_tombstone_is_invalid_state() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    mgr.archive("c1", "u1").await.unwrap();
    mgr.permanently_delete("c1").await.unwrap();

    assert!(matches!(
        mgr.archive("c1", "u1").await,
        Err(Error::InvalidState { .. })
    ));
}

#[tokio::test]
async fn batch_archive_with_one_failure() {
    let (remote, mgr) = manager();
    let ids: Vec<String> = (1..=4).map(|i| format!("c{i}")).collect();
    for (i, id) in ids.iter().enumerate() {
        remote.seed(&card(id, "b1", "l1", i as f64));
    }
    remote.fail_id("update:c3");

    let results = mgr.archive_multiple(&ids, "u1").await;
    assert_eq!(results.len(), 4);

    let failed: Vec<&str> = results
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(id, _)| id.as_str())
        .collect();
    assert_eq!(failed, vec!["c3"]);
    assert!(matches!(
        results[2].1,
        Err(Error::RemoteUnavailable(_))
    ));

    for id in &ids {
        let stored: Card = remote.stored(id).unwrap();
        assert_eq!(stored.archived, id != "c3", "{id}");
    }
}

#[tokio::test]
async fn batch_restore_reports_per_card() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    remote.seed(&card("c2", "b1", "l1", 1.0));
    mgr.archive("c1", "u1").await.unwrap();

    let ids = vec!["c1".to_string(), "c2".to_string(), "ghost".to_string()];
    let results = mgr.restore_multiple(&ids).await;

    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(Error::InvalidState { .. })));
    assert!(matches!(results[2].1, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn list_archived_is_newest_first_without_tombstones() {
    let (remote, mgr) = manager();
    for (id, day) in [("c1", 3), ("c2", 9), ("c3", 5), ("c4", 7)] {
        let mut c = card(id, "b1", "l1", 0.0);
        c.archived = true;
        c.archived_at = Some(ts(day));
        c.original_list_id = Some("l1".to_string());
        remote.seed(&c);
    }
    let mut gone: Card = remote.stored("c4").unwrap();
    gone.permanently_deleted = true;
    remote.seed(&gone);
    remote.seed(&card("c5", "b1", "l1", 1.0));
    let mut elsewhere = card("c6", "b2", "l9", 0.0);
    elsewhere.archived = true;
    remote.seed(&elsewhere);

    let ids: Vec<String> = mgr
        .list_archived("b1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["c2", "c3", "c1"]);
}

#[tokio::test]
async fn list_active_cards_excludes_archived_and_orders_by_position() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 2.0));
    remote.seed(&card("c2", "b1", "l1", 1.0));
    remote.seed(&card("c3", "b1", "l1", 0.0));
    remote.seed(&card("c4", "b1", "l2", 0.0));
    mgr.archive("c3", "u1").await.unwrap();

    let ids: Vec<String> = mgr
        .list_active_cards("l1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

#[tokio::test]
async fn board_scenario_restores_after_remaining_card() {
    let (remote, mgr) = manager();
    remote.seed(&card("C1", "B1", "L1", 0.0));
    remote.seed(&card("C2", "B1", "L1", 1.0));

    mgr.archive("C2", "u1").await.unwrap();
    let archived: Vec<String> = mgr
        .list_archived("B1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(archived, vec!["C2"]);

    let c2 = mgr.restore("C2", None).await.unwrap();
    assert_eq!(c2.list_id, "L1");
    assert_eq!(c2.position, 1.0);
    assert!(!c2.archived);
    assert!(mgr.list_archived("B1").await.unwrap().is_empty());
}

#[parameterized(
    none = { &[], 0, 0, 0 },
    recent = { &[1], 1, 1, 1 },
    mixed = { &[1, 6, 10, 29, 45], 5, 2, 4 },
    boundary = { &[7, 30], 2, 1, 2 },
)]
fn stats_bucket_by_age(days_ago: &[i64], total: usize, last_7: usize, last_30: usize) {
    let now = ts(28);
    let cards: Vec<Card> = days_ago
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut c = card(&format!("c{i}"), "b1", "l1", 0.0);
            c.archived = true;
            c.archived_at = Some(now - Duration::days(*d));
            c
        })
        .collect();

    let stats = ArchiveStats::from_cards(&cards, now);
    assert_eq!(stats.total, total);
    assert_eq!(stats.last_7_days, last_7);
    assert_eq!(stats.last_30_days, last_30);
    if let Some(max) = days_ago.iter().max() {
        assert_eq!(stats.oldest, Some(now - Duration::days(*max)));
    } else {
        assert!(stats.oldest.is_none());
        assert!(stats.newest.is_none());
    }
}

#[tokio::test]
async fn archive_stats_counts_board_archive() {
    let (remote, mgr) = manager();
    remote.seed(&card("c1", "b1", "l1", 0.0));
    remote.seed(&card("c2", "b1", "l1", 1.0));
    mgr.archive("c1", "u1").await.unwrap();

    let stats = mgr.archive_stats("b1").await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.last_7_days, 1);
    assert_eq!(stats.oldest, stats.newest);
}
