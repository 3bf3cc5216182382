#![no_main]

use std::ops::Range;

use bigtext::Rope;
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use unicode_segmentation::UnicodeSegmentation;

const NON_ASCII: &str = "Cre\u{300}me bru\u{302}le\u{301}e 🐕‍🦺 🇮🇹\r\n\
                         こんにちは、みんなさん！ नमस्ते 🗻∈🌏\n";

#[derive(Arbitrary, Clone, Debug)]
enum EditOp<'a> {
    Insert { byte_offset: usize, text: &'a str },
    Delete { byte_range: Range<usize> },
    Replace { byte_range: Range<usize>, text: &'a str },
}

#[derive(Arbitrary, Copy, Clone, Debug)]
enum StartingText<'a> {
    Custom(&'a str),
    NonAscii,
}

fn ceil_boundary(s: &str, mut byte_offset: usize) -> usize {
    while !s.is_char_boundary(byte_offset) {
        byte_offset += 1;
    }
    byte_offset
}

fuzz_target!(|data: (StartingText, Vec<EditOp>)| {
    let (starting, ops) = data;

    let mut text = String::from(match starting {
        StartingText::Custom(s) => s,
        StartingText::NonAscii => NON_ASCII,
    });

    let mut rope = Rope::from(text.as_str());

    for op in ops {
        match op {
            EditOp::Insert { byte_offset, text: insert }
                if byte_offset <= text.len() =>
            {
                let byte_offset = ceil_boundary(&text, byte_offset);
                text.insert_str(byte_offset, insert);
                rope.insert(byte_offset, insert);
            },

            EditOp::Delete { byte_range }
                if byte_range.start <= byte_range.end
                    && byte_range.end <= text.len() =>
            {
                let start = ceil_boundary(&text, byte_range.start);
                let end = ceil_boundary(&text, byte_range.end);
                text.replace_range(start..end, "");
                rope.delete(start..end);
            },

            EditOp::Replace { byte_range, text: replace }
                if byte_range.start <= byte_range.end
                    && byte_range.end <= text.len() =>
            {
                let start = ceil_boundary(&text, byte_range.start);
                let end = ceil_boundary(&text, byte_range.end);
                text.replace_range(start..end, replace);
                rope.replace(start..end, replace);
            },

            _ => continue,
        }
    }

    rope.assert_invariants();

    assert!(rope.utf8_eq(&Rope::from(text.as_str())));
    assert!(rope.graphemes().eq(text.graphemes(true)));
});
