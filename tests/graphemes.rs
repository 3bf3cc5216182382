mod common;

use std::borrow::Cow;

use bigtext::Rope;
use common::{PIECES, ZWJ, large_text, random_char_boundary, random_text};
use rand::Rng;
use unicode_segmentation::UnicodeSegmentation;

#[track_caller]
fn assert_graphemes(r: &Rope, text: &str) {
    let ours = r.graphemes().collect::<Vec<_>>();
    let theirs = text.graphemes(true).collect::<Vec<_>>();
    assert_eq!(ours, theirs);
    assert_eq!(r.character_len(), theirs.len());
}

#[test]
fn emoji_zwj_sequence() {
    let r = Rope::from(ZWJ);
    assert_eq!(r.character_len(), 4);
    assert_eq!(r.scalar_len(), 7);
    assert_eq!(
        r.graphemes().collect::<Vec<_>>(),
        ["a\u{200d}", "🐕‍🦺", "b", "c"]
    );
}

#[test]
fn graphemes_of_every_piece_pair() {
    for a in PIECES {
        for b in PIECES {
            let text = format!("{a}{b}");
            assert_graphemes(&Rope::from(text.as_str()), &text);
        }
    }
}

#[cfg_attr(miri, ignore)]
#[test]
fn graphemes_of_large_text() {
    let text = large_text();
    assert_graphemes(&Rope::from(text.as_str()), &text);
}

#[test]
fn long_cluster_spanning_chunks() {
    let text = format!("x{}y", "\u{301}".repeat(2000));
    let r = Rope::from(text.as_str());
    r.assert_invariants();

    let characters = r.graphemes().collect::<Vec<_>>();
    assert_eq!(characters.len(), 2);
    assert!(matches!(characters[0], Cow::Owned(_)));
    assert_eq!(characters[1], "y");

    let view = r.characters();
    let y = view.index_at_offset(1);
    assert_eq!(y.utf8_offset(), text.len() - 1);
    assert_eq!(view.index_before(y), r.start_index());
    assert_eq!(view.index_after(r.start_index()), y);
}

#[cfg_attr(miri, ignore)]
#[test]
fn breaks_stay_in_sync_after_random_edits() {
    let mut rng = common::rng();

    let mut text = random_text(&mut rng, 1000);
    let mut r = Rope::from(text.as_str());

    for _ in 0..200 {
        let offset = random_char_boundary(&mut rng, &text);

        if rng.random_bool(0.5) {
            let pieces = rng.random_range(1..5);
            let insert = random_text(&mut rng, pieces);
            text.insert_str(offset, &insert);
            r.insert(offset, &insert);
        } else {
            let mut end = (offset + rng.random_range(0..20)).min(text.len());
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.replace_range(offset..end, "");
            r.delete(offset..end);
        }

        r.assert_invariants();
        assert_graphemes(&r, &text);
    }
}
