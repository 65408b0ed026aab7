use std::sync::Arc;

use super::*;
use crate::room::test_helpers::{MockBackend, MockRoom, NullDelegate, NullOverlay, VecLog, test_config};
use crate::scene::Scene;
use crate::session::RoomSessionProxy;

struct Fixture {
    proxy: Arc<RoomSessionProxy>,
    registry: BoardRegistry,
    room: Arc<MockRoom>,
    log: Arc<VecLog>,
}

/// Proxy joined against a mock room, with a registry attached.
async fn connected() -> Fixture {
    let room = MockRoom::new();
    let backend = MockBackend::joining(room.clone());
    let proxy = RoomSessionProxy::new(backend, test_config(), Arc::new(NullDelegate), Arc::new(NullOverlay));
    proxy.join().await.expect("join should succeed");
    let log = Arc::new(VecLog::default());
    let registry = BoardRegistry::new(&proxy, log.clone());
    Fixture { proxy, registry, room, log }
}

fn pages(count: usize) -> Vec<Scene> {
    (0..count).map(|page| Scene::new(page.to_string())).collect()
}

// =============================================================================
// classify_path
// =============================================================================

#[test]
fn classify_path_known_extensions() {
    assert_eq!(classify_path("a.pdf"), BoardItemType::Pdf);
    assert_eq!(classify_path("deck.pptx"), BoardItemType::Pptx);
    assert_eq!(classify_path("notes.doc"), BoardItemType::Doc);
    assert_eq!(classify_path("photo.jpg"), BoardItemType::Jpg);
}

#[test]
fn classify_path_defaults_to_whiteboard() {
    assert_eq!(classify_path("a"), BoardItemType::Whiteboard);
    assert_eq!(classify_path(""), BoardItemType::Whiteboard);
    assert_eq!(classify_path("a.xyz"), BoardItemType::Whiteboard);
}

#[test]
fn classify_path_is_case_sensitive() {
    assert_eq!(classify_path("a.PDF"), BoardItemType::Whiteboard);
}

#[test]
fn classify_path_uses_last_segment() {
    assert_eq!(classify_path("archive.pdf.png"), BoardItemType::Png);
    assert_eq!(classify_path("archive.png.xyz"), BoardItemType::Whiteboard);
}

#[test]
fn classify_path_ignores_empty_segments() {
    // Only one non-empty dot-segment in each of these.
    assert_eq!(classify_path(".pdf"), BoardItemType::Whiteboard);
    assert_eq!(classify_path("a."), BoardItemType::Whiteboard);
}

// =============================================================================
// add_board
// =============================================================================

#[tokio::test]
async fn add_board_appends_inactive_item() {
    let fx = connected().await;

    assert!(fx.registry.add_board("board1", &pages(2)).await);

    let list = fx.registry.list();
    assert_eq!(list.len(), 1);
    let item = &list[0];
    assert_eq!(item.id, "board1");
    assert_eq!(item.name, "board1");
    assert_eq!(item.status, BoardItemStatus::Inactive);
    assert_eq!(item.total_pages, 2);
    assert_eq!(item.active_page, 0);
    assert_eq!(item.kind, BoardItemType::Whiteboard);
}

#[tokio::test]
async fn add_board_puts_prefixed_scenes_at_directory_end() {
    let fx = connected().await;

    fx.registry.add_board("deck.pptx", &pages(2)).await;

    let commands = fx.room.recorded_commands();
    let put = commands
        .iter()
        .find_map(|command| match command {
            RoomCommand::PutScenes { dir, scenes, index } => Some((dir, scenes, index)),
            _ => None,
        })
        .expect("a put command should be issued");
    assert_eq!(put.0, DEFAULT_DIR);
    assert_eq!(*put.2, usize::MAX);
    let names: Vec<&str> = put.1.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["deck.pptx|0", "deck.pptx|1"]);
}

#[tokio::test]
async fn add_board_derives_kind_from_path() {
    let fx = connected().await;
    fx.registry.add_board("deck.pptx", &pages(1)).await;
    assert_eq!(fx.registry.list()[0].kind, BoardItemType::Pptx);
}

#[tokio::test]
async fn add_board_rejects_only_when_both_inputs_empty() {
    let fx = connected().await;

    assert!(!fx.registry.add_board("", &[]).await);
    assert!(fx.registry.list().is_empty());

    // The literal guard lets either input through on its own.
    assert!(fx.registry.add_board("", &pages(1)).await);
    assert!(fx.registry.add_board("board1", &[]).await);
    assert_eq!(fx.registry.list().len(), 2);
    assert_eq!(fx.registry.list()[1].total_pages, 0);
}

#[tokio::test]
async fn add_board_fails_before_join() {
    let room = MockRoom::new();
    let backend = MockBackend::joining(room);
    let proxy = RoomSessionProxy::new(backend, test_config(), Arc::new(NullDelegate), Arc::new(NullOverlay));
    let registry = BoardRegistry::new(&proxy, Arc::new(VecLog::default()));

    assert!(!registry.add_board("board1", &pages(1)).await);
}

#[tokio::test]
async fn add_board_fails_after_session_teardown() {
    // Bind every field so the proxy is not kept alive by a partially-moved
    // fixture; dropping it is what tears the session down.
    let Fixture { proxy, registry, room, log } = connected().await;
    drop(proxy);
    drop(room);

    assert!(!registry.add_board("board1", &pages(1)).await);
    assert!(log.recorded().iter().any(|line| line.contains("session is gone")));
}

// =============================================================================
// switch_board
// =============================================================================

#[tokio::test]
async fn switch_board_activates_exactly_one_item() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("board2", &pages(1)).await;

    assert!(fx.registry.switch_board("board1", 1).await);

    let list = fx.registry.list();
    let active: Vec<&BoardItem> = list.iter().filter(|i| i.status == BoardItemStatus::Active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, "board1");
    assert_eq!(active[0].active_page, 1);
    let other = list.iter().find(|i| i.id == "board2").expect("board2 should remain");
    assert_eq!(other.status, BoardItemStatus::Inactive);
    assert_eq!(other.active_page, 0);
}

#[tokio::test]
async fn switch_board_sets_main_scene_index_of_target() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("board2", &pages(1)).await;

    // Directory order: board1|0, board1|1, board2|0.
    assert!(fx.registry.switch_board("board2", 0).await);

    let commands = fx.room.recorded_commands();
    assert!(commands.contains(&RoomCommand::SetMainSceneIndex { index: 2 }));
}

#[tokio::test]
async fn switch_board_resets_previous_active_item() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("board2", &pages(1)).await;

    assert!(fx.registry.switch_board("board1", 1).await);
    assert!(fx.registry.switch_board("board2", 0).await);

    let list = fx.registry.list();
    let board1 = list.iter().find(|i| i.id == "board1").expect("board1 should remain");
    assert_eq!(board1.status, BoardItemStatus::Inactive);
    assert_eq!(board1.active_page, 0);
}

#[tokio::test]
async fn switch_board_unknown_item_fails_without_mutation() {
    let fx = connected().await;

    assert!(!fx.registry.switch_board("missing", 0).await);
    assert!(fx.registry.list().is_empty());
    assert!(fx.room.recorded_commands().iter().all(|c| !matches!(c, RoomCommand::SetMainSceneIndex { .. })));
}

#[tokio::test]
async fn switch_board_missing_page_fails_without_mutation() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    let before = fx.registry.list();

    assert!(!fx.registry.switch_board("board1", 5).await);

    assert_eq!(fx.registry.list(), before);
    assert!(fx.room.recorded_commands().iter().all(|c| !matches!(c, RoomCommand::SetMainSceneIndex { .. })));
}

#[tokio::test]
async fn switch_board_fails_when_fetch_fails() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    *fx.room.fail_fetch.lock().unwrap() = true;

    assert!(!fx.registry.switch_board("board1", 0).await);
}

#[tokio::test]
async fn switch_board_fails_after_session_teardown() {
    let Fixture { proxy, registry, room, log } = connected().await;
    registry.add_board("board1", &pages(1)).await;
    drop(proxy);
    drop(room);

    assert!(!registry.switch_board("board1", 0).await);
    assert!(log.recorded().iter().any(|line| line.contains("session is gone")));
}

// =============================================================================
// destroy_board
// =============================================================================

#[tokio::test]
async fn destroy_board_removes_item_and_all_its_scenes() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("board2", &pages(1)).await;

    assert!(fx.registry.destroy_board("board1").await);

    let list = fx.registry.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "board2");

    let commands = fx.room.recorded_commands();
    assert!(commands.contains(&RoomCommand::RemoveScenes { path: "/board1|0".into() }));
    assert!(commands.contains(&RoomCommand::RemoveScenes { path: "/board1|1".into() }));
    assert!(!commands.iter().any(|c| matches!(c, RoomCommand::RemoveScenes { path } if path.starts_with("/board2"))));
}

#[tokio::test]
async fn destroy_board_switches_to_next_item_when_active() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    fx.registry.add_board("board2", &pages(1)).await;
    fx.registry.switch_board("board1", 0).await;

    assert!(fx.registry.destroy_board("board1").await);

    let list = fx.registry.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "board2");
    assert_eq!(list[0].status, BoardItemStatus::Active);
    assert_eq!(list[0].active_page, 0);
}

#[tokio::test]
async fn destroy_board_wraps_to_front_from_last_item() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    fx.registry.add_board("board2", &pages(1)).await;
    fx.registry.switch_board("board2", 0).await;

    assert!(fx.registry.destroy_board("board2").await);

    let list = fx.registry.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "board1");
    assert_eq!(list[0].status, BoardItemStatus::Active);
}

#[tokio::test]
async fn destroy_board_proceeds_when_preswitch_fails() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    // Zero pages, so the remote store never holds "board2|0" and switching
    // to board2 cannot succeed.
    fx.registry.add_board("board2", &pages(0)).await;
    fx.registry.switch_board("board1", 0).await;

    assert!(fx.registry.destroy_board("board1").await);

    assert!(fx.log.recorded().iter().any(|line| line.contains("switch to next board failed")));
    let list = fx.registry.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "board2");
    let commands = fx.room.recorded_commands();
    assert!(commands.contains(&RoomCommand::RemoveScenes { path: "/board1|0".into() }));
}

#[tokio::test]
async fn destroy_board_inactive_target_does_not_preswitch() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    fx.registry.add_board("board2", &pages(1)).await;
    fx.registry.switch_board("board2", 0).await;
    let before = fx.room.recorded_commands().len();

    assert!(fx.registry.destroy_board("board1").await);

    let issued = &fx.room.recorded_commands()[before..];
    assert!(issued.iter().all(|c| !matches!(c, RoomCommand::SetMainSceneIndex { .. })));
}

#[tokio::test]
async fn destroy_board_sole_active_item_is_removed_without_switch() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    fx.registry.switch_board("board1", 0).await;
    let before = fx.room.recorded_commands().len();

    assert!(fx.registry.destroy_board("board1").await);

    assert!(fx.registry.list().is_empty());
    let issued = &fx.room.recorded_commands()[before..];
    assert!(issued.iter().all(|c| !matches!(c, RoomCommand::SetMainSceneIndex { .. })));
}

#[tokio::test]
async fn destroy_board_completes_with_zero_matches() {
    let fx = connected().await;
    fx.registry.add_board("board2", &pages(1)).await;
    let before = fx.room.recorded_commands().len();

    assert!(fx.registry.destroy_board("board1").await);

    assert_eq!(fx.registry.list().len(), 1);
    assert_eq!(fx.room.recorded_commands().len(), before);
}

#[tokio::test]
async fn destroy_board_twice_is_idempotent() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("board2", &pages(1)).await;

    assert!(fx.registry.destroy_board("board1").await);
    let list_after_first = fx.registry.list();
    let commands_after_first = fx.room.recorded_commands().len();

    // Mock applies removals to its directory, so nothing matches anymore.
    assert!(fx.registry.destroy_board("board1").await);
    assert_eq!(fx.registry.list(), list_after_first);
    assert_eq!(fx.room.recorded_commands().len(), commands_after_first);
}

#[tokio::test]
async fn destroy_board_aborts_silently_when_fetch_fails() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(1)).await;
    *fx.room.fail_fetch.lock().unwrap() = true;

    assert!(!fx.registry.destroy_board("board1").await);
    assert_eq!(fx.registry.list().len(), 1);
}

#[tokio::test]
async fn destroy_board_fails_after_session_teardown() {
    let Fixture { proxy, registry, room, log } = connected().await;
    registry.add_board("board1", &pages(1)).await;
    drop(proxy);
    drop(room);

    assert!(!registry.destroy_board("board1").await);
    assert_eq!(registry.list().len(), 1);
    assert!(log.recorded().iter().any(|line| line.contains("session is gone")));
}

// =============================================================================
// LIST ACCESSORS
// =============================================================================

#[tokio::test]
async fn set_list_of_own_list_is_a_no_op() {
    let fx = connected().await;
    fx.registry.add_board("board1", &pages(2)).await;
    fx.registry.add_board("deck.pdf", &pages(3)).await;
    fx.registry.switch_board("board1", 1).await;

    let snapshot = fx.registry.list();
    fx.registry.set_list(fx.registry.list());
    assert_eq!(fx.registry.list(), snapshot);
}

#[tokio::test]
async fn board_item_serde_round_trips() {
    let fx = connected().await;
    fx.registry.add_board("deck.pdf", &pages(3)).await;

    let list = fx.registry.list();
    let json = serde_json::to_string(&list).expect("serialize");
    let back: Vec<BoardItem> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, list);
}
