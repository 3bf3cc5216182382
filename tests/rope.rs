mod common;

use bigtext::Rope;
use common::{TEXT, TEXT_EMOJI, ZWJ, large_text};
use unicode_segmentation::UnicodeSegmentation;

#[test]
fn empty() {
    let r = Rope::new();
    r.assert_invariants();

    assert!(r.is_empty());
    assert_eq!(r.byte_len(), 0);
    assert_eq!(r.utf16_len(), 0);
    assert_eq!(r.scalar_len(), 0);
    assert_eq!(r.character_len(), 0);
    assert_eq!(r.start_index(), r.end_index());
    assert_eq!(r, Rope::default());
    assert_eq!(r, "");
}

#[test]
fn lengths() {
    let r = Rope::from(TEXT);
    assert_eq!(r.byte_len(), 127);
    assert_eq!(r.scalar_len(), 103);
    assert_eq!(r.utf16_len(), 103);
    assert_eq!(r.character_len(), 103);

    let r = Rope::from(TEXT_EMOJI);
    assert_eq!(r.byte_len(), 143);
    assert_eq!(r.scalar_len(), 107);
    assert_eq!(r.utf16_len(), 111);
    assert_eq!(r.character_len(), 107);

    let r = Rope::from(ZWJ);
    assert_eq!(r.byte_len(), 17);
    assert_eq!(r.scalar_len(), 7);
    assert_eq!(r.utf16_len(), 9);
    assert_eq!(r.character_len(), 4);
}

#[cfg_attr(miri, ignore)]
#[test]
fn round_trip_and_metric_ordering() {
    let text = large_text();
    let r = Rope::from(text.as_str());
    r.assert_invariants();

    assert_eq!(String::from(&r), text);
    assert_eq!(r.to_string(), text);
    assert_eq!(r.chunks().collect::<String>(), text);

    assert_eq!(r.byte_len(), text.len());
    assert_eq!(r.utf16_len(), text.encode_utf16().count());
    assert_eq!(r.scalar_len(), text.chars().count());
    assert_eq!(r.character_len(), text.graphemes(true).count());

    assert!(r.character_len() <= r.scalar_len());
    assert!(r.scalar_len() <= r.utf16_len());
    assert!(r.utf16_len() <= r.byte_len());
}

#[test]
fn byte() {
    let r = Rope::from(TEXT_EMOJI);

    for (i, b) in TEXT_EMOJI.bytes().enumerate() {
        assert_eq!(r.byte(i), b);
    }
}

#[test]
#[should_panic]
fn byte_out_of_bounds() {
    let r = Rope::from("foo");
    r.byte(3);
}

#[test]
fn char_and_character_boundaries() {
    let r = Rope::from(ZWJ);

    for offset in 0..=ZWJ.len() + 1 {
        assert_eq!(
            r.is_char_boundary(offset),
            ZWJ.is_char_boundary(offset),
            "{offset}"
        );
    }

    let starts = ZWJ
        .grapheme_indices(true)
        .map(|(i, _)| i)
        .chain([ZWJ.len()])
        .collect::<Vec<_>>();

    for offset in 0..=ZWJ.len() {
        assert_eq!(
            r.is_character_boundary(offset),
            starts.contains(&offset),
            "{offset}"
        );
    }
}

#[cfg_attr(miri, ignore)]
#[test]
fn extract() {
    let text = large_text();
    let r = Rope::from(text.as_str());

    for (start, end) in [(0, 0), (0, 5), (12, 16), (100, 3000), (0, text.len())]
    {
        let (start, end) = (floor(&text, start), floor(&text, end));
        let extracted = r.extract(start..end);
        extracted.assert_invariants();
        assert_eq!(String::from(&extracted), &text[start..end]);
    }

    assert!(r.extract(..).utf8_eq(&r));
}

#[test]
#[should_panic]
fn extract_inside_char() {
    let r = Rope::from("🗻");
    r.extract(1..);
}

#[test]
fn truncate_and_clear() {
    let mut r = Rope::from(TEXT);

    r.truncate(12);
    r.assert_invariants();
    assert_eq!(r, "Hello there!");

    r.clear();
    r.assert_invariants();
    assert!(r.is_empty());
}

#[test]
fn try_replace_with_keeps_rope_on_error() {
    let mut r = Rope::from("a=1, b=2");

    let err = r.try_replace_with(2..3, |_| Err::<String, _>("nope"));
    assert_eq!(err, Err("nope"));
    assert_eq!(r, "a=1, b=2");

    r.try_replace_with(7.., |n| Ok::<_, ()>(format!("{n}{n}"))).unwrap();
    assert_eq!(r, "a=1, b=22");
}

#[test]
fn try_retain_characters() {
    let mut r = Rope::from(ZWJ);

    r.try_retain_characters(|c| Ok::<_, ()>(c.chars().count() > 1)).unwrap();
    r.assert_invariants();
    assert_eq!(r, "a\u{200d}🐕‍🦺");

    let err = r.try_retain_characters(|c| {
        if c == "a\u{200d}" { Err(c.len()) } else { Ok(true) }
    });
    assert_eq!(err, Err(4));
    assert_eq!(r, "a\u{200d}🐕‍🦺");
}

#[test]
fn from_iter() {
    let pieces = ["foo", " ", "bär", "\u{301}"];

    let r = pieces.iter().copied().collect::<Rope>();
    assert_eq!(r, "foo ba\u{308}r\u{301}");
    assert_eq!(String::from(&r), pieces.concat());

    let r = pieces.iter().map(|s| s.to_string()).collect::<Rope>();
    assert_eq!(String::from(r), pieces.concat());
}

#[test]
fn debug_and_display() {
    let r = Rope::from("a\"b\n");
    assert_eq!(format!("{r:?}"), "Rope(\"a\\\"b\\n\")");
    assert_eq!(format!("{r}"), "a\"b\n");
}

#[test]
fn rope_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Rope>();
}

fn floor(s: &str, mut offset: usize) -> usize {
    offset = offset.min(s.len());
    while !s.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
