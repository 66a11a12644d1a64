/// Integration tests for the session store
///
/// These tests drive sessions through the manager from many tasks at once
/// and check that every reader and writer sees a consistent table.
use live_table::{Card, Phase, TableConfig, TableError, TableManager, TableSnapshot};
use std::collections::HashSet;
use std::sync::Arc;

const CYCLE: [Phase; 6] = [
    Phase::Waiting,
    Phase::PreFlop,
    Phase::Flop,
    Phase::Turn,
    Phase::River,
    Phase::Shuffle,
];

fn config(max_players: usize) -> TableConfig {
    TableConfig {
        name: "integration".to_string(),
        max_players,
    }
}

/// Every visible card appears exactly once, and the counts match the phase.
fn assert_consistent(snapshot: &TableSnapshot) {
    let dealt: Vec<Card> = snapshot
        .seats
        .iter()
        .flat_map(|s| s.cards.iter().copied())
        .chain(snapshot.community_cards.iter().copied())
        .collect();
    let unique: HashSet<Card> = dealt.iter().copied().collect();
    assert_eq!(unique.len(), dealt.len(), "card in two places at once");

    assert_eq!(
        snapshot.community_cards.len(),
        snapshot.phase.community_cards()
    );
    if snapshot.phase.is_hand_live() {
        assert_eq!(dealt.len() + snapshot.deck_remaining, 52);
    } else {
        assert!(dealt.is_empty());
    }
}

#[tokio::test]
async fn test_worked_example_two_players() {
    let manager = TableManager::new();
    let id = manager.create_session(config(2)).await.unwrap();

    let (a, _) = manager.join(id, Some("A".to_string())).await.unwrap();
    let (b, snapshot) = manager.join(id, Some("B".to_string())).await.unwrap();
    let roster: Vec<_> = snapshot.seats.iter().map(|s| s.player_id).collect();
    assert_eq!(roster, vec![a, b]);

    let snapshot = manager.advance(id).await.unwrap();
    assert_eq!(snapshot.phase, Phase::PreFlop);
    assert_eq!(snapshot.seat(a).unwrap().cards.len(), 2);
    assert_eq!(snapshot.seat(b).unwrap().cards.len(), 2);
    assert!(snapshot.community_cards.is_empty());
    assert_eq!(snapshot.dealer().unwrap().player_id, a);

    let snapshot = manager.advance(id).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Flop);
    assert_eq!(snapshot.community_cards.len(), 3);

    let mut snapshot = snapshot;
    for _ in 0..4 {
        snapshot = manager.advance(id).await.unwrap();
    }
    assert_eq!(snapshot.phase, Phase::Waiting);
    assert_eq!(snapshot.hand_number, 1);
    assert!(snapshot.community_cards.is_empty());
    assert!(snapshot.seats.iter().all(|s| s.cards.is_empty()));

    let snapshot = manager.advance(id).await.unwrap();
    assert_eq!(snapshot.hand_number, 2);
    assert_eq!(snapshot.dealer().unwrap().player_id, b);
    assert_eq!(snapshot.small_blind().unwrap().player_id, a);
    assert_eq!(snapshot.big_blind().unwrap().player_id, b);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_advances_are_totally_ordered() {
    let manager = Arc::new(TableManager::new());
    let id = manager.create_session(config(6)).await.unwrap();
    for _ in 0..3 {
        manager.join(id, None).await.unwrap();
    }

    let writers = 60;
    let mut tasks = Vec::with_capacity(writers);
    for _ in 0..writers {
        let manager = Arc::clone(&manager);
        tasks.push(tokio::spawn(async move { manager.advance(id).await }));
    }

    let mut results = Vec::with_capacity(writers);
    for task in tasks {
        results.push(task.await.unwrap().unwrap());
    }
    results.sort_by_key(|s| s.version);

    // Three joins came first, so advances occupy versions 4..=63 with no gaps.
    let versions: Vec<u64> = results.iter().map(|s| s.version).collect();
    assert_eq!(versions, (4..4 + writers as u64).collect::<Vec<_>>());

    for (i, snapshot) in results.iter().enumerate() {
        assert_eq!(snapshot.phase, CYCLE[(i + 1) % CYCLE.len()]);
        assert_consistent(snapshot);
    }
    assert_eq!(results.last().unwrap().hand_number, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_racing_writers_never_see_torn_state() {
    let manager = Arc::new(TableManager::new());
    let id = manager.create_session(config(10)).await.unwrap();
    for _ in 0..8 {
        manager.join(id, None).await.unwrap();
    }

    let writer = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            for _ in 0..300 {
                manager.advance(id).await.unwrap();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        readers.push(tokio::spawn(async move {
            let mut last_version = 0;
            for _ in 0..500 {
                let snapshot = manager.get_snapshot(id).await.unwrap();
                assert_consistent(&snapshot);
                assert!(snapshot.version >= last_version, "version went backwards");
                last_version = snapshot.version;
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(manager.get_snapshot(id).await.unwrap().version, 308);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let manager = TableManager::new();
    let busy = manager.create_session(config(4)).await.unwrap();
    let quiet = manager.create_session(config(4)).await.unwrap();
    manager.join(quiet, Some("q".to_string())).await.unwrap();

    manager.join(busy, None).await.unwrap();
    for _ in 0..10 {
        manager.advance(busy).await.unwrap();
    }

    let quiet_snapshot = manager.get_snapshot(quiet).await.unwrap();
    assert_eq!(quiet_snapshot.phase, Phase::Waiting);
    assert_eq!(quiet_snapshot.version, 1);
    assert_eq!(manager.get_snapshot(busy).await.unwrap().version, 11);
}

#[tokio::test]
async fn test_table_full_leaves_roster_unchanged() {
    let manager = TableManager::new();
    let id = manager.create_session(config(2)).await.unwrap();
    manager.join(id, None).await.unwrap();
    manager.join(id, None).await.unwrap();
    let before = manager.get_snapshot(id).await.unwrap();

    let err = manager.join(id, Some("third".to_string())).await.unwrap_err();
    assert_eq!(err, TableError::TableFull { max_players: 2 });
    assert_eq!(manager.get_snapshot(id).await.unwrap(), before);
}

#[tokio::test]
async fn test_kick_dealer_mid_hand() {
    let manager = TableManager::new();
    let id = manager.create_session(config(5)).await.unwrap();
    let (a, _) = manager.join(id, None).await.unwrap();
    let (b, _) = manager.join(id, None).await.unwrap();
    let (c, _) = manager.join(id, None).await.unwrap();
    manager.advance(id).await.unwrap();
    manager.advance(id).await.unwrap();

    let snapshot = manager.kick(id, a).await.unwrap();
    assert!(snapshot.seat(a).is_none());
    assert_eq!(snapshot.dealer().unwrap().player_id, b);
    assert_eq!(snapshot.small_blind().unwrap().player_id, c);
    assert_eq!(snapshot.big_blind().unwrap().player_id, b);
    assert_eq!(snapshot.phase, Phase::Flop);
    assert_consistent_partial(&snapshot);

    let err = snapshot.player_view(a).unwrap_err();
    assert_eq!(err, TableError::PlayerNotFound(a));
}

/// After a mid-hand kick the departed cards are gone, so only disjointness holds.
fn assert_consistent_partial(snapshot: &TableSnapshot) {
    let dealt: Vec<Card> = snapshot
        .seats
        .iter()
        .flat_map(|s| s.cards.iter().copied())
        .chain(snapshot.community_cards.iter().copied())
        .collect();
    let unique: HashSet<Card> = dealt.iter().copied().collect();
    assert_eq!(unique.len(), dealt.len());
}

#[tokio::test]
async fn test_kick_last_player_keeps_phase() {
    let manager = TableManager::new();
    let id = manager.create_session(config(2)).await.unwrap();
    let (only, _) = manager.join(id, None).await.unwrap();
    manager.advance(id).await.unwrap();

    let snapshot = manager.kick(id, only).await.unwrap();
    assert_eq!(snapshot.phase, Phase::PreFlop);
    assert!(snapshot.seats.is_empty());
    assert!(snapshot.dealer().is_none());
}

#[tokio::test]
async fn test_closed_session_is_gone() {
    let manager = TableManager::new();
    let id = manager.create_session(config(2)).await.unwrap();
    manager.join(id, None).await.unwrap();
    manager.close_session(id).await.unwrap();

    assert_eq!(
        manager.get_snapshot(id).await.unwrap_err(),
        TableError::SessionNotFound(id)
    );
    assert_eq!(
        manager.join(id, None).await.unwrap_err(),
        TableError::SessionNotFound(id)
    );
    assert!(manager.list_sessions().await.is_empty());
}

#[tokio::test]
async fn test_rejoin_after_kick_gets_new_id() {
    let manager = TableManager::new();
    let id = manager.create_session(config(2)).await.unwrap();
    let (first, _) = manager.join(id, Some("sam".to_string())).await.unwrap();
    manager.kick(id, first).await.unwrap();
    let (second, snapshot) = manager.join(id, Some("sam".to_string())).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(snapshot.player_count(), 1);
}
