#[cfg(feature = "serde")]
mod tests {
    use bigtext::Rope;
    use serde_test::Token;

    #[test]
    fn ser_de_empty() {
        let rope = Rope::new();

        serde_test::assert_tokens(
            &rope,
            &[Token::Seq { len: Some(0) }, Token::SeqEnd],
        );
    }

    #[test]
    #[cfg_attr(feature = "small_chunks", ignore)]
    fn ser_de_single_chunk() {
        let mut rope = Rope::new();
        rope.insert(0, "lorem ");
        rope.insert(6, "ipsum");

        serde_test::assert_tokens(
            &rope,
            &[
                Token::Seq { len: Some(1) },
                Token::Str("lorem ipsum"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn de_multiple_strings() {
        let rope = Rope::from("lorem\r\nipsum dolor");

        serde_test::assert_de_tokens(
            &rope,
            &[
                Token::Seq { len: Some(3) },
                Token::Str("lorem\r"),
                Token::Str("\nipsum"),
                Token::Str(" dolor"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn de_single_string() {
        let rope = Rope::from("cafe\u{301}");
        serde_test::assert_de_tokens(&rope, &[Token::Str("cafe\u{301}")]);
    }

    #[test]
    fn de_json_string() {
        let rope = serde_json::from_str::<Rope>("\"abc\"").unwrap();
        rope.assert_invariants();
        assert!(rope.utf8_eq(&Rope::from("abc")));

        let rope = serde_json::from_str::<Rope>("\"\"").unwrap();
        assert!(rope.is_empty());

        let rope = serde_json::from_str::<Rope>("[\"ab\", \"c\"]").unwrap();
        assert!(rope.utf8_eq(&Rope::from("abc")));

        assert!(serde_json::from_str::<Rope>("42").is_err());
    }

    #[test]
    fn de_readable_and_compact() {
        use serde_test::Configure;

        let rope = Rope::from("lorem");

        serde_test::assert_de_tokens(
            &rope.clone().readable(),
            &[Token::Str("lorem")],
        );

        serde_test::assert_de_tokens(
            &rope.compact(),
            &[
                Token::Seq { len: Some(1) },
                Token::Str("lorem"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn ser_de_json() {
        let text = "🐕‍🦺 lorem ipsum ".repeat(200);
        let rope = Rope::from(text.as_str());

        let serialized = serde_json::to_string(&rope).unwrap();
        let deserialized = serde_json::from_str::<Rope>(&serialized).unwrap();

        deserialized.assert_invariants();
        assert!(rope.utf8_eq(&deserialized));
        assert_eq!(deserialized.character_len(), rope.character_len());
    }
}
