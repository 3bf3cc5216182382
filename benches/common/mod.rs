#![allow(dead_code)]

use bigtext::Rope;
use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, Bencher};

const PARAGRAPH: &str = "Lorem ipsum dolor sit amet, consectetur \
                         adipiscing elit. Cre\u{300}me bru\u{302}le\u{301}e \
                         for 🐕‍🦺 and 🇮🇹!\r\n\
                         こんにちは、みんなさん！ नमस्ते 🗻∈🌏\n";

/// Around 500 bytes.
pub fn tiny() -> String {
    PARAGRAPH.repeat(3)
}

/// Around 5 KiB.
pub fn small() -> String {
    PARAGRAPH.repeat(30)
}

/// Around 50 KiB.
pub fn medium() -> String {
    PARAGRAPH.repeat(300)
}

/// Around 500 KiB.
pub fn large() -> String {
    PARAGRAPH.repeat(3000)
}

/// Runs `fun` against every text size.
pub fn bench_sizes(
    group: &mut BenchmarkGroup<'_, WallTime>,
    mut fun: impl FnMut(&mut Bencher<'_>, &str),
) {
    let texts = [
        ("tiny", tiny()),
        ("small", small()),
        ("medium", medium()),
        ("large", large()),
    ];

    for (name, text) in texts {
        group.bench_function(name, |b| fun(b, &text));
    }
}

/// Rounds `byte_offset` down to the closest char boundary of the rope.
pub fn floor_boundary(r: &Rope, byte_offset: usize) -> usize {
    let mut offset = byte_offset.min(r.byte_len());
    while !r.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
