#![no_main]

use arbitrary::Arbitrary;
use cardgrid_core::{Bounds, CardGrid, CardId, Collection, DragPhase, GridEvent, Modifiers, Point};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Click { card: u8, modifiers: u8 },
    Begin { card: u8 },
    Hover { card: u8, x: i16 },
    End { committed: bool },
}

#[derive(Debug, Arbitrary)]
struct Input {
    card_count: u8,
    columns: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    // 1..=64 cards, 1..=16 columns. Card ids one past the end exercise the
    // unknown-id paths.
    let count = u32::from(input.card_count % 64) + 1;
    let columns = usize::from(input.columns % 16) + 1;
    let layout = move |slot: usize, _id: CardId| {
        let (col, row) = (slot % columns, slot / columns);
        Some(Bounds::from_origin_size(
            col as f64 * 88.0,
            row as f64 * 53.0,
            80.0,
            45.0,
        ))
    };
    let card = |raw: u8| CardId::new(u64::from(raw) % (u64::from(count) + 1) + 1);

    let mut grid = CardGrid::new(Collection::with_sequential_ids(count));
    let expected: Vec<CardId> = (1..=u64::from(count)).map(CardId::new).collect();
    let mut last_revision = 0;

    for op in input.ops.iter().take(256) {
        let event = match *op {
            Op::Click { card: c, modifiers } => {
                GridEvent::click_with(card(c), Modifiers::from_bits_truncate(modifiers))
            }
            Op::Begin { card: c } => GridEvent::DragBegin { id: card(c) },
            Op::Hover { card: c, x } => GridEvent::DragHover {
                id: card(c),
                pointer: Point::new(f64::from(x), 0.0),
            },
            Op::End { committed } => GridEvent::DragEnd { committed },
        };
        let transition = grid.apply(&event, &layout);

        // Post-conditions that must always hold:
        let mut order = grid.order();
        order.sort();
        assert_eq!(order, expected, "card identity lost");
        assert!(grid.revision() >= last_revision, "revision went backwards");
        if transition.is_noop() {
            assert_eq!(grid.revision(), last_revision, "no-op bumped revision");
        }
        last_revision = grid.revision();
        assert_eq!(transition.to, grid.phase());
        if grid.phase() == DragPhase::Idle {
            assert!(grid.collection().iter().all(|c| c.bounds().is_none()));
        }
        for id in grid.selection().selected_ids() {
            assert!(grid.collection().contains(*id), "selected id not in collection");
        }
    }
});
