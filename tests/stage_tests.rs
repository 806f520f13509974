//! Stage choreography integration tests.
//!
//! These drive the engine the way a host does: issue fire-and-forget
//! operations, advance the clock with `tick`, and observe token state and
//! completion callbacks.

use std::cell::Cell;
use std::rc::Rc;

use card_stage::{
    DiscardOptions, DrawOptions, Parent, Rect, Stage, StageConfig, StageGeometry, Strategy,
    TokenId, TransferOptions,
};

const CARD_W: f64 = 80.0;
const CARD_H: f64 = 120.0;

fn stage() -> Stage {
    Stage::new(
        StageConfig::new(CARD_W, CARD_H),
        StageGeometry::unscaled(Rect::new(0.0, 0.0, 800.0, 600.0)),
    )
}

fn deck_anchor() -> Rect {
    Rect::new(20.0, 20.0, 120.0, 170.0)
}

fn hand_anchor() -> Rect {
    Rect::new(250.0, 400.0, 550.0, 520.0)
}

// =============================================================================
// Spawn and zone entry
// =============================================================================

/// A card spawned on the deck jumps there with no travel animation, then
/// animates into its hand slot when added.
#[test]
fn test_spawn_at_deck_then_animate_to_hand() {
    let mut stage = stage();
    let hand = stage.create_zone(hand_anchor(), Strategy::row());

    let token = stage.spawn("Ace", Some(deck_anchor()), false);
    {
        let t = stage.token(token).unwrap();
        // Deck anchor center is (70, 95); card top-left is offset by half
        // its dimensions.
        assert_eq!(t.position().x, 30.0);
        assert_eq!(t.position().y, 35.0);
        assert!(t.last_move_instant());
    }

    stage.add_to_zone(hand, token);
    let t = stage.token(token).unwrap();
    // Hand anchor center is (400, 460): the single centered slot.
    assert_eq!(t.position().x, 360.0);
    assert_eq!(t.position().y, 400.0);
    assert!(!t.last_move_instant());
}

/// Despawn followed by spawn reuses the slot with fresh state.
#[test]
fn test_pool_recycles_through_stage() {
    let mut stage = stage();
    let token = stage.spawn("Ace", None, false);

    stage.despawn(token);
    let again = stage.spawn("King", None, true);

    assert_eq!(again.index(), token.index());
    assert_ne!(again.generation(), token.generation());

    let t = stage.token(again).unwrap();
    assert_eq!(t.card_type().unwrap().as_str(), "King");
    assert!(t.flipped());
    assert!(!t.flow_mode());
    assert!(!t.classes().teleporting());
    assert_eq!(stage.pool().slot_count(), 1);
}

// =============================================================================
// Zone membership
// =============================================================================

/// A token migrates between zones without ever being in both lists.
#[test]
fn test_membership_is_exclusive() {
    let mut stage = stage();
    let a = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 150.0), Strategy::row());
    let b = stage.create_zone(Rect::new(400.0, 0.0, 700.0, 150.0), Strategy::row());

    let token = stage.spawn("Ace", None, false);
    stage.add_to_zone(a, token);
    assert!(stage.zone(a).unwrap().contains(token));
    assert!(!stage.zone(b).unwrap().contains(token));

    assert!(stage.remove_token(a, token));
    stage.add_to_zone(b, token);
    assert!(!stage.zone(a).unwrap().contains(token));
    assert!(stage.zone(b).unwrap().contains(token));
}

#[test]
fn test_clear_zone_returns_members_in_order() {
    let mut stage = stage();
    let zone = stage.create_zone(Rect::new(0.0, 0.0, 400.0, 150.0), Strategy::row());
    let tokens: Vec<TokenId> = (0..3)
        .map(|i| {
            let t = stage.spawn(format!("c{i}"), None, false);
            stage.add_to_zone(zone, t);
            t
        })
        .collect();

    let removed = stage.clear_zone(zone);
    assert_eq!(removed, tokens);
    assert!(stage.zone(zone).unwrap().is_empty());
}

#[test]
fn test_remove_indices_through_stage() {
    let mut stage = stage();
    let zone = stage.create_zone(Rect::new(0.0, 0.0, 400.0, 150.0), Strategy::row());
    let tokens: Vec<TokenId> = (0..4)
        .map(|i| {
            let t = stage.spawn(format!("c{i}"), None, false);
            stage.add_to_zone(zone, t);
            t
        })
        .collect();

    let removed = stage.remove_indices(zone, &[1, 3, 9]);
    assert_eq!(removed, vec![tokens[3], tokens[1]]);
    assert_eq!(stage.zone(zone).unwrap().items(), &[tokens[0], tokens[2]]);
}

// =============================================================================
// Transfers
// =============================================================================

/// Between two coordinate zones the same token identity moves; the
/// completion fires once the move duration elapses.
#[test]
fn test_transfer_between_coordinate_zones_keeps_identity() {
    let mut stage = stage();
    let a = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 150.0), Strategy::row());
    let b = stage.create_zone(Rect::new(400.0, 0.0, 700.0, 150.0), Strategy::row());

    let token = stage.spawn("Ace", None, false);
    stage.add_to_zone(a, token);

    let done: Rc<Cell<Option<TokenId>>> = Rc::new(Cell::new(None));
    let seen = done.clone();
    let result = stage.transfer_card(
        token,
        a,
        b,
        TransferOptions::new()
            .flipped(true)
            .on_complete(move |_, id| seen.set(Some(id))),
    );

    assert_eq!(result, Some(token));
    assert!(!stage.zone(a).unwrap().contains(token));
    assert!(stage.zone(b).unwrap().contains(token));
    assert!(stage.token(token).unwrap().flipped());

    // Completion waits for the default move duration (300 ms).
    stage.tick(299);
    assert_eq!(done.get(), None);
    stage.tick(300);
    assert_eq!(done.get(), Some(token));
}

/// Into a flow zone the original identity dies: teleport out, despawn,
/// respawn in flow form, teleport in, and the callback delivers the
/// replacement.
#[test]
fn test_transfer_into_flow_zone_replaces_identity() {
    let mut stage = stage();
    let table = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 150.0), Strategy::row());
    let tray = stage.create_zone(Rect::new(400.0, 0.0, 700.0, 300.0), Strategy::flow());

    let token = stage.spawn("Ace", None, true);
    stage.add_to_zone(table, token);

    let done: Rc<Cell<Option<TokenId>>> = Rc::new(Cell::new(None));
    let seen = done.clone();
    let result = stage.transfer_card(
        token,
        table,
        tray,
        TransferOptions::new().on_complete(move |_, id| seen.set(Some(id))),
    );

    // Fire-and-forget with a pending identity change.
    assert_eq!(result, None);
    assert!(!stage.zone(table).unwrap().contains(token));
    assert!(stage.token(token).unwrap().classes().teleport_out);

    // Teleport-out completes: the original despawns and the replacement
    // spawns into the flow container.
    stage.tick(400);
    assert!(stage.token(token).is_none());
    assert_eq!(done.get(), None);

    let items = stage.zone(tray).unwrap().items().to_vec();
    assert_eq!(items.len(), 1);
    let replacement = items[0];
    assert_ne!(replacement, token);
    {
        let t = stage.token(replacement).unwrap();
        assert!(t.flow_mode());
        assert_eq!(t.parent(), Parent::Container(tray));
        assert!(t.flipped(), "flip state carries over to the new identity");
        assert_eq!(t.card_type().unwrap().as_str(), "Ace");
        assert!(t.classes().teleport_in);
    }

    // Teleport-in completes: classes clear and the callback delivers the
    // replacement handle.
    stage.tick(800);
    assert!(!stage.token(replacement).unwrap().classes().teleporting());
    assert_eq!(done.get(), Some(replacement));
}

/// Out of a flow zone into a coordinate zone: the replacement is added
/// normally and the callback fires once the out-animation ends.
#[test]
fn test_transfer_out_of_flow_zone() {
    let mut stage = stage();
    let tray = stage.create_zone(Rect::new(400.0, 0.0, 700.0, 300.0), Strategy::flow());
    let table = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 150.0), Strategy::row());

    let token = stage.spawn_into_flow("Ace", tray, false);
    stage.add_to_zone(tray, token);

    let done: Rc<Cell<Option<TokenId>>> = Rc::new(Cell::new(None));
    let seen = done.clone();
    let result = stage.transfer_card(
        token,
        tray,
        table,
        TransferOptions::new().on_complete(move |_, id| seen.set(Some(id))),
    );
    assert_eq!(result, None);

    stage.tick(400);
    let replacement = done.get().expect("replacement delivered at respawn");
    assert_ne!(replacement, token);
    assert!(stage.token(token).is_none());

    let t = stage.token(replacement).unwrap();
    assert!(!t.flow_mode());
    assert_eq!(t.parent(), Parent::Stage);
    assert!(stage.zone(table).unwrap().contains(replacement));
}

// =============================================================================
// Draw and discard
// =============================================================================

#[test]
fn test_draw_card_into_coordinate_zone_completes_immediately() {
    let mut stage = stage();
    let hand = stage.create_zone(hand_anchor(), Strategy::row());

    let done: Rc<Cell<Option<TokenId>>> = Rc::new(Cell::new(None));
    let seen = done.clone();
    let token = stage.draw_card(
        "Ace",
        Some(deck_anchor()),
        hand,
        DrawOptions::new().on_complete(move |_, id| seen.set(Some(id))),
    );

    // Coordinate zones need no teleport; the add completes at once.
    assert_eq!(done.get(), Some(token));
    assert!(stage.zone(hand).unwrap().contains(token));
}

#[test]
fn test_draw_card_into_flow_zone_teleports_in() {
    let mut stage = stage();
    let tray = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 300.0), Strategy::flow());

    let done: Rc<Cell<Option<TokenId>>> = Rc::new(Cell::new(None));
    let seen = done.clone();
    let token = stage.draw_card(
        "Ace",
        None,
        tray,
        DrawOptions::new()
            .face_down()
            .on_complete(move |_, id| seen.set(Some(id))),
    );

    {
        let t = stage.token(token).unwrap();
        assert!(t.flow_mode());
        assert!(t.flipped());
        assert!(t.classes().teleport_in);
        assert!(t.classes().teleport_in_prepare);
    }
    assert_eq!(done.get(), None);

    stage.tick(400);
    assert!(!stage.token(token).unwrap().classes().teleporting());
    assert_eq!(done.get(), Some(token));
}

#[test]
fn test_discard_from_coordinate_zone() {
    let mut stage = stage();
    let hand = stage.create_zone(hand_anchor(), Strategy::row());
    let token = stage.spawn("Ace", None, false);
    stage.add_to_zone(hand, token);

    let done = Rc::new(Cell::new(false));
    let seen = done.clone();
    let discard_pile = Rect::new(600.0, 20.0, 700.0, 170.0);
    stage.discard_card(
        token,
        hand,
        Some(discard_pile),
        DiscardOptions::new()
            .with_despawn_delay(500)
            .on_complete(move |_| seen.set(true)),
    );

    // The card leaves the zone and animates toward the discard anchor.
    assert!(stage.zone(hand).unwrap().is_empty());
    {
        let t = stage.token(token).unwrap();
        assert_eq!(t.position().x, 650.0 - CARD_W / 2.0);
        assert_eq!(t.position().y, 95.0 - CARD_H / 2.0);
    }

    stage.tick(499);
    assert!(stage.token(token).is_some());
    assert!(!done.get());

    stage.tick(500);
    assert!(stage.token(token).is_none());
    assert!(done.get());
    assert_eq!(stage.pool().free_count(), 1);
}

#[test]
fn test_discard_from_flow_zone_teleports_out() {
    let mut stage = stage();
    let tray = stage.create_zone(Rect::new(0.0, 0.0, 300.0, 300.0), Strategy::flow());
    let token = stage.spawn_into_flow("Ace", tray, false);
    stage.add_to_zone(tray, token);

    let done = Rc::new(Cell::new(false));
    let seen = done.clone();
    stage.discard_card(
        token,
        tray,
        None,
        DiscardOptions::new().on_complete(move |_| seen.set(true)),
    );

    assert!(stage.token(token).unwrap().classes().teleport_out);

    stage.tick(400);
    assert!(stage.token(token).is_none());
    assert!(done.get());
}

// =============================================================================
// Resize
// =============================================================================

/// A resize re-lays out every zone instantly under the new geometry.
#[test]
fn test_resize_relayouts_instantly() {
    let mut stage = stage();
    let hand = stage.create_zone(hand_anchor(), Strategy::row());
    let token = stage.spawn("Ace", None, false);
    stage.add_to_zone(hand, token);
    assert!(!stage.token(token).unwrap().last_move_instant());

    // The container is now rendered at half scale; the same on-screen
    // anchor sits twice as far out in layout space.
    stage.handle_resize(StageGeometry::new(Rect::new(0.0, 0.0, 800.0, 600.0), 1600.0));

    let t = stage.token(token).unwrap();
    assert_eq!(t.position().x, 800.0 - CARD_W / 2.0);
    assert_eq!(t.position().y, 920.0 - CARD_H / 2.0);
    assert!(t.last_move_instant());
}

// =============================================================================
// Dirty tracking
// =============================================================================

#[test]
fn test_drain_dirty_reports_changed_slots() {
    let mut stage = stage();
    let hand = stage.create_zone(hand_anchor(), Strategy::row());
    let token = stage.spawn("Ace", None, false);
    stage.add_to_zone(hand, token);

    let dirty = stage.drain_dirty();
    assert_eq!(dirty, vec![token.index()]);

    // Nothing changed since the drain.
    stage.render_all();
    assert!(stage.drain_dirty().is_empty());

    let slot = stage.pool().slot(token.index()).unwrap();
    assert!(slot.visible());
}
