#![no_main]

use cardgrid_core::CardId;
use cardgrid_core::reorder::reorder_ids;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte: collection length (0..64). Second: insertion index. The
    // rest selects dragged ids, possibly repeated or out of range.
    if data.len() < 2 {
        return;
    }
    let len = u64::from(data[0] % 64);
    let insert_index = usize::from(data[1]);
    let ids: Vec<CardId> = (1..=len).map(CardId::new).collect();
    let dragged: Vec<CardId> = data[2..]
        .iter()
        .map(|b| CardId::new(u64::from(*b % 80)))
        .collect();

    let out = reorder_ids(&ids, &dragged, insert_index);

    let mut sorted = out.clone();
    sorted.sort();
    assert_eq!(sorted, ids, "reorder is not a permutation");

    // Untouched cards keep their relative order.
    let before: Vec<CardId> = ids.iter().copied().filter(|id| !dragged.contains(id)).collect();
    let after: Vec<CardId> = out.iter().copied().filter(|id| !dragged.contains(id)).collect();
    assert_eq!(before, after, "remainder order changed");
});
