#![no_main]

use bigtext::Rope;
use libfuzzer_sys::fuzz_target;
use unicode_segmentation::UnicodeSegmentation;

fuzz_target!(|data: (&str, Vec<usize>)| {
    let (text, offsets) = data;

    let rope = Rope::from(text);

    let utf8 = rope.utf8();
    let utf16 = rope.utf16();
    let scalars = rope.scalars();
    let characters = rope.characters();

    assert_eq!(utf16.len(), text.encode_utf16().count());
    assert_eq!(scalars.len(), text.chars().count());
    assert_eq!(characters.len(), text.graphemes(true).count());

    for offset in offsets {
        if offset > text.len() {
            continue;
        }

        let index = utf8.index_at_offset(offset);

        let scalar = scalars.index_rounding_down(index);
        assert_eq!(scalars.index_at_offset(scalars.offset_of(scalar)), scalar);

        let character = characters.index_rounding_down(index);
        let up = characters.index_rounding_up(index);
        assert!(character <= index && index <= up);
        let distance = characters.distance(character, up);
        assert_eq!(characters.index_offset_by(character, distance), up);

        let unit = utf16.index_rounding_down(index);
        assert_eq!(utf16.index_at_offset(utf16.offset_of(unit)), unit);
    }
});
