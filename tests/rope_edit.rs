mod common;

use bigtext::Rope;
use common::{TEXT, large_text, random_range, random_text};
use rand::Rng;
use unicode_segmentation::UnicodeSegmentation;

#[track_caller]
fn assert_matches(r: &Rope, text: &str) {
    r.assert_invariants();
    assert_eq!(String::from(r), text);
    assert_eq!(r.utf16_len(), text.encode_utf16().count());
    assert_eq!(r.scalar_len(), text.chars().count());
    assert_eq!(r.character_len(), text.graphemes(true).count());
}

#[test]
fn insert_start_middle_end() {
    let mut r = Rope::from(TEXT);

    r.insert(0, "AA");
    r.insert(5, "BB");
    r.insert(r.byte_len(), "CC");

    assert_matches(
        &r,
        "AAHelBBlo there!  How're you doing?  It's a fine day, isn't it?  \
         Aren't you glad we're alive?  こんにちは、みんなさん！CC",
    );
}

#[test]
fn insert_into_empty() {
    let mut r = Rope::new();

    r.insert(0, "He");
    r.insert(2, "l");
    r.insert(3, "l");
    r.insert(4, "o w");
    r.insert(7, "o");
    r.insert(8, "rl");
    r.insert(10, "d!");
    r.insert(3, "zopter");

    assert_matches(&r, "Helzopterlo world!");
}

#[test]
fn delete_everything_piecewise() {
    let text = large_text();
    let mut r = Rope::from(text.as_str());

    while !r.is_empty() {
        let end = r.byte_len().min(97);
        let end = (0..=end).rev().find(|&i| r.is_char_boundary(i)).unwrap();
        let end = if end == 0 {
            r.chars().next().unwrap().len_utf8()
        } else {
            end
        };
        r.delete(..end);
        r.assert_invariants();
    }

    assert_matches(&r, "");
}

#[test]
fn replace_joins_clusters() {
    let mut r = Rope::from("e \u{301}");
    assert_eq!(r.character_len(), 2);

    // Removing the space attaches the accent to the `e`.
    r.delete(1..2);
    assert_matches(&r, "e\u{301}");
    assert_eq!(r.character_len(), 1);

    // So does joining two regional indicators into a flag.
    let mut r = Rope::from("🇮 🇹");
    assert_eq!(r.character_len(), 3);
    r.replace(4..5, "");
    assert_matches(&r, "🇮🇹");
}

#[test]
fn crlf_seams() {
    let mut r = Rope::from("aaa\r");
    r.push_str("\nbbb");
    assert_matches(&r, "aaa\r\nbbb");

    r.insert(4, "x");
    assert_matches(&r, "aaa\rx\nbbb");
}

#[test]
#[should_panic]
fn insert_inside_char() {
    let mut r = Rope::from("🐸");
    r.insert(2, "x");
}

#[test]
#[should_panic]
fn delete_inverted_range() {
    let mut r = Rope::from("abc");
    #[allow(clippy::reversed_empty_ranges)]
    r.delete(2..1);
}

#[test]
fn edits_through_indices() {
    let mut r = Rope::from("héllo wörld");

    let scalars = r.scalars();
    let w = scalars.index_at_offset(6);
    let end = scalars.end_index();

    r.replace_subrange(w..end, "there");
    assert_matches(&r, "héllo there");

    let characters = r.characters();
    let e = characters.index_at_offset(1);
    r.insert_at(e, "e");
    assert_matches(&r, "heéllo there");

    // Indices inside a scalar are rounded down first.
    let inside = r.utf8().index_at_offset(3);
    let after = r.utf8().index_at_offset(4);
    r.remove_subrange(inside..after);
    assert_matches(&r, "hello there");
}

#[test]
fn clones_are_unaffected_by_edits() {
    let text = "0123456789".repeat(1000);
    let r = Rope::from(text.as_str());
    assert_eq!(r.scalar_len(), 10_000);

    let mut clone = r.clone();
    assert!(clone.is_identical(&r));

    clone.insert(5000, "🐕‍🦺");
    assert!(!clone.is_identical(&r));

    assert_matches(&r, &text);

    let mut expected = text.clone();
    expected.insert_str(5000, "🐕‍🦺");
    assert_matches(&clone, &expected);
}

#[test]
fn insert_at_start_shares_other_chunks() {
    let text = "0123456789".repeat(1000);
    let r = Rope::from(text.as_str());

    let mut edited = r.clone();
    edited.insert(0, "🐕‍🦺");

    let mut expected = text.clone();
    expected.insert_str(0, "🐕‍🦺");
    assert_matches(&edited, &expected);
    assert_matches(&r, &text);

    // Shared chunks are the same allocation in both ropes.
    let old = r.chunks().map(str::as_ptr).collect::<Vec<_>>();

    let total = edited.chunks().count();
    let unshared =
        edited.chunks().filter(|c| !old.contains(&c.as_ptr())).count();

    assert!(total > 1);
    assert!(unshared <= 4, "{unshared} out of {total} chunks were copied");
}

#[test]
fn indices_across_edits() {
    let mut r = Rope::from(large_text());
    let index = r.ensure_leaf(r.utf8().index_at_offset(3000));
    assert!(index.has_hint());

    r.delete(..common::TEXT_EMOJI.len());

    // The hint is stale, the offset is not.
    let text = String::from(&r);
    let mut offset = 3000;
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let scalars = r.scalars();
    let expected = text[offset..].chars().next().unwrap();
    assert_eq!(scalars.get(scalars.index_rounding_down(index)), expected);
}

#[cfg_attr(miri, ignore)]
#[test]
fn random_edits() {
    let mut rng = common::rng();

    let mut text = random_text(&mut rng, 800);
    let mut r = Rope::from(text.as_str());

    for _ in 0..300 {
        let range = random_range(&mut rng, &text);
        let pieces = rng.random_range(0..40);
        let insert = random_text(&mut rng, pieces);

        text.replace_range(range.clone(), &insert);
        r.replace(range, &insert);

        assert_matches(&r, &text);
    }
}

#[cfg_attr(miri, ignore)]
#[test]
fn random_edits_on_clones() {
    let mut rng = common::rng();

    let text = random_text(&mut rng, 1500);
    let original = Rope::from(text.as_str());

    let mut r = original.clone();
    let mut edited = text.clone();

    for _ in 0..100 {
        let range = random_range(&mut rng, &edited);
        let pieces = rng.random_range(0..10);
        let insert = random_text(&mut rng, pieces);

        edited.replace_range(range.clone(), &insert);
        r.replace(range, &insert);
    }

    assert_matches(&r, &edited);
    assert_matches(&original, &text);
}
