// Packet variants and the tag registry.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use packet_core::config::PacketConfig;
    use packet_core::headers::encode_simple_header;
    use packet_core::packet_list::{Packet, PacketList};
    use packet_core::packets::{
        create_packet, create_packet_from_raw, registry, resolve, variant_info, BodyError,
        CompressedDataPacket, CompressionAlgorithm, LiteralDataPacket, LiteralFormat, PacketTag,
        RawPacket, SignaturePacket,
    };
    use packet_core::types::PacketError;

    const ALL_TAGS: [PacketTag; 18] = [
        PacketTag::PublicKeyEncryptedSessionKey,
        PacketTag::Signature,
        PacketTag::SymEncryptedSessionKey,
        PacketTag::OnePassSignature,
        PacketTag::SecretKey,
        PacketTag::PublicKey,
        PacketTag::SecretSubkey,
        PacketTag::CompressedData,
        PacketTag::SymmetricallyEncryptedData,
        PacketTag::Marker,
        PacketTag::LiteralData,
        PacketTag::Trust,
        PacketTag::UserId,
        PacketTag::PublicSubkey,
        PacketTag::UserAttribute,
        PacketTag::SymEncryptedIntegrityProtectedData,
        PacketTag::ModificationDetectionCode,
        PacketTag::SymEncryptedAeadProtectedData,
    ];

    fn literal(text: &str) -> LiteralDataPacket {
        LiteralDataPacket::with_data(Bytes::copy_from_slice(text.as_bytes()))
    }

    fn literal_text(packet: &Packet) -> Vec<u8> {
        packet.downcast_ref::<LiteralDataPacket>().unwrap().data().to_vec()
    }

// # 1. Registry

    #[test]
    fn every_tag_builds_its_own_variant() {
        for tag in ALL_TAGS {
            let body = create_packet(tag);
            assert_eq!(body.tag(), tag as u8);
            assert_eq!(body.supports_streaming(), tag.supports_streaming());
        }
    }

    #[test]
    fn streaming_capable_tags() {
        let streaming: Vec<u8> = ALL_TAGS.iter().filter(|t| t.supports_streaming()).map(|t| *t as u8).collect();
        assert_eq!(streaming, vec![8, 9, 11, 18, 20]);
        assert!(registry::supports_streaming(11));
        assert!(!registry::supports_streaming(2));
        assert!(!registry::supports_streaming(60));
    }

    #[test]
    fn unregistered_tags_are_unknown() {
        for raw in [0u8, 15, 16, 21, 63] {
            assert!(matches!(resolve(raw), Err(PacketError::UnknownTag { tag, offset: None }) if tag == raw));
            assert!(create_packet_from_raw(raw).is_err());
        }
        assert_eq!(resolve(11).unwrap(), PacketTag::LiteralData);
    }

    #[test]
    fn variant_info_names() {
        assert_eq!(variant_info(PacketTag::LiteralData).name, "literal");
        assert_eq!(variant_info(PacketTag::CompressedData).name, "compressed");
        assert!(variant_info(PacketTag::Signature).supports_embedded);
        assert!(!variant_info(PacketTag::UserId).supports_embedded);
        assert_eq!(variant_info(PacketTag::PublicKey).name, "raw");
    }

    #[test]
    fn embedded_slot_only_on_signatures() {
        let mut sig = Packet::from(SignaturePacket::with_body(&b"outer"[..]));
        sig.set_embedded(Packet::from(SignaturePacket::with_body(&b"inner"[..]))).unwrap();
        assert_eq!(sig.embedded().map(Packet::tag), Some(2));
        assert!(sig.take_embedded().is_some());
        assert!(sig.embedded().is_none());

        let mut user = Packet::from_tag(PacketTag::UserId);
        assert!(matches!(
            user.set_embedded(Packet::from_tag(PacketTag::Signature)),
            Err(PacketError::EmbeddedNotSupported { tag: 13 })
        ));
    }

    #[test]
    fn embedded_packet_fails_on_write() {
        let mut sig = Packet::from(SignaturePacket::with_body(&b"outer"[..]));
        sig.set_embedded(Packet::from(SignaturePacket::with_body(&b"inner"[..]))).unwrap();
        let list: PacketList = std::iter::once(sig).collect();

        assert!(matches!(
            list.write(),
            Err(PacketError::BodySource { tag: 2, source: BodyError::Unsupported(_) })
        ));

        let mut sig = list.into_iter().next().unwrap();
        assert!(sig.take_embedded().is_some());
        let list: PacketList = std::iter::once(sig).collect();
        let back = PacketList::from_bytes(&list.write().unwrap()).unwrap();
        assert_eq!(&back[0].downcast_ref::<SignaturePacket>().unwrap().body()[..], b"outer");
    }

    #[test]
    fn children_fail_on_write_outside_compressed_data() {
        let mut user = Packet::from(RawPacket::with_body(PacketTag::UserId, &b"dave"[..]));
        user.packets_mut().push(literal("lost"));
        let mut list = PacketList::new();
        list.push(user);

        assert!(matches!(
            list.write(),
            Err(PacketError::BodySource { tag: 13, source: BodyError::Unsupported(_) })
        ));
    }

// # 2. Literal data

    #[test]
    fn literal_fields_round_trip() {
        let mut lit = literal("hello world");
        lit.set_format(LiteralFormat::Utf8);
        lit.set_filename("msg.txt").unwrap();
        lit.set_date(0x5F5E_1000);

        let mut list = PacketList::new();
        list.push(lit);
        let wire = list.write().unwrap();
        // header, format, name length, name, date, data
        assert_eq!(wire.len(), 2 + 1 + 1 + 7 + 4 + 11);
        assert_eq!(wire[2], b'u');

        let back = PacketList::from_bytes(&wire).unwrap();
        let lit = back[0].downcast_ref::<LiteralDataPacket>().unwrap();
        assert_eq!(lit.format(), LiteralFormat::Utf8);
        assert_eq!(lit.filename(), b"msg.txt");
        assert_eq!(lit.date(), 0x5F5E_1000);
        assert_eq!(&lit.data()[..], b"hello world");
    }

    #[test]
    fn literal_filename_limit() {
        let mut lit = LiteralDataPacket::new();
        assert!(lit.set_filename(vec![b'a'; 255]).is_ok());
        assert!(matches!(lit.set_filename(vec![b'a'; 256]), Err(BodyError::Invalid(_))));
        assert_eq!(lit.filename().len(), 255);
    }

    #[test]
    fn literal_unknown_format_octet() {
        let wire = [0xCB, 6, b'z', 0, 0, 0, 0, 0];
        assert!(matches!(
            PacketList::from_bytes(&wire),
            Err(PacketError::MalformedBody { tag: 11, source: BodyError::Invalid(_), .. })
        ));
    }

    #[test]
    fn literal_filename_past_body_end() {
        let wire = [0xCB, 4, b'b', 10, b'a', b'b'];
        assert!(matches!(
            PacketList::from_bytes(&wire),
            Err(PacketError::MalformedBody { source: BodyError::TooShort { need: 16, have: 4 }, .. })
        ));
    }

// # 3. Compressed data

    fn compressed_with(algorithm: CompressionAlgorithm, texts: &[&str]) -> Packet {
        let mut packet = Packet::from(CompressedDataPacket::with_algorithm(algorithm));
        for t in texts {
            packet.packets_mut().push(literal(t));
        }
        packet
    }

    #[test]
    fn compressed_children_round_trip() {
        for algorithm in [CompressionAlgorithm::Uncompressed, CompressionAlgorithm::Zip, CompressionAlgorithm::Zlib] {
            let mut list = PacketList::new();
            list.push(compressed_with(algorithm, &["first", "second"]));
            let wire = list.write().unwrap();
            assert_eq!(wire[0], 0xC8);

            let back = PacketList::from_bytes(&wire).unwrap();
            assert_eq!(back.len(), 1);
            let outer = &back[0];
            assert_eq!(outer.downcast_ref::<CompressedDataPacket>().unwrap().algorithm(), algorithm);
            assert_eq!(outer.packets().len(), 2);
            assert_eq!(literal_text(&outer.packets()[0]), b"first");
            assert_eq!(literal_text(&outer.packets()[1]), b"second");
        }
    }

    #[test]
    fn compression_shrinks_repetitive_payload() {
        let text = "abcd".repeat(4096);
        let mut list = PacketList::new();
        list.push(compressed_with(CompressionAlgorithm::Zlib, &[text.as_str()]));
        assert!(list.write().unwrap().len() < text.len() / 4);
    }

    #[test]
    fn nested_compressed_packets() {
        let mut inner = compressed_with(CompressionAlgorithm::Zip, &["deep"]);
        inner.packets_mut().push(RawPacket::with_body(PacketTag::ModificationDetectionCode, vec![0u8; 20]));
        let mut outer = Packet::from(CompressedDataPacket::with_algorithm(CompressionAlgorithm::Zlib));
        outer.packets_mut().push(inner);

        let mut list = PacketList::new();
        list.push(outer);
        let back = PacketList::from_bytes(&list.write().unwrap()).unwrap();

        let inner = &back[0].packets()[0];
        assert!(inner.is(PacketTag::CompressedData));
        assert_eq!(inner.packets().len(), 2);
        assert_eq!(literal_text(&inner.packets()[0]), b"deep");
        assert!(inner.packets()[1].is(PacketTag::ModificationDetectionCode));
    }

    #[test]
    fn bzip2_is_recognized_but_unsupported() {
        let wire = [0xC8, 3, 3, 0x42, 0x5A];
        assert!(matches!(
            PacketList::from_bytes(&wire),
            Err(PacketError::MalformedBody { tag: 8, source: BodyError::Unsupported(_), .. })
        ));

        let mut list = PacketList::new();
        list.push(compressed_with(CompressionAlgorithm::Bzip2, &["x"]));
        assert!(matches!(
            list.write(),
            Err(PacketError::BodySource { tag: 8, source: BodyError::Unsupported(_) })
        ));
    }

    #[test]
    fn corrupt_deflate_stream() {
        let wire = [0xC8, 5, 2, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            PacketList::from_bytes(&wire),
            Err(PacketError::MalformedBody { source: BodyError::Codec { codec: "zlib", .. }, .. })
        ));
    }

    #[test]
    fn empty_compressed_body_is_rejected() {
        assert!(matches!(
            PacketList::from_bytes(&[0xC8, 0]),
            Err(PacketError::MalformedBody { source: BodyError::TooShort { need: 1, have: 0 }, .. })
        ));
    }

    #[test]
    fn inner_list_follows_reader_policy() {
        // Compressed (uncompressed algorithm) wrapping an unknown tag 15.
        let wire = [0xC8, 5, 0, 0xCF, 2, 0xAA, 0xBB];
        assert!(matches!(
            PacketList::from_bytes(&wire),
            Err(PacketError::MalformedBody { source: BodyError::Nested(_), .. })
        ));

        let mut list = PacketList::new();
        list.read_with(&wire, &PacketConfig::permissive()).unwrap();
        assert_eq!(list[0].packets()[0].tag(), 15);
    }

    /// `levels` uncompressed compressed-data packets around one empty literal.
    fn nested_uncompressed(levels: usize) -> Vec<u8> {
        let mut wire = vec![0xCB, 6, b'b', 0, 0, 0, 0, 0];
        for _ in 0..levels {
            let mut body = Vec::with_capacity(wire.len() + 1);
            body.push(CompressionAlgorithm::Uncompressed as u8);
            body.extend_from_slice(&wire);
            wire = encode_simple_header(PacketTag::CompressedData as u8, body.len()).unwrap();
            wire.extend_from_slice(&body);
        }
        wire
    }

    fn innermost(err: &PacketError) -> &PacketError {
        match err {
            PacketError::MalformedBody { source: BodyError::Nested(inner), .. } => innermost(inner),
            other => other,
        }
    }

    #[test]
    fn deeply_nested_input_is_refused() {
        let wire = nested_uncompressed(5000);
        let err = match PacketList::from_bytes(&wire) {
            Err(e) => e,
            Ok(_) => panic!("5000 nested packets decoded"),
        };
        assert!(matches!(err, PacketError::MalformedBody { tag: 8, offset: 0, source: BodyError::Nested(_) }));
        assert!(matches!(innermost(&err), PacketError::NestingTooDeep { depth: 33, max: 32 }));
    }

    #[test]
    fn nesting_limit_boundary() {
        let config = PacketConfig { max_nesting_depth: 4, ..PacketConfig::default() };

        let mut list = PacketList::new();
        list.read_with(&nested_uncompressed(4), &config).unwrap();
        let mut packet = &list[0];
        for _ in 0..4 {
            packet = &packet.packets()[0];
        }
        assert!(packet.is(PacketTag::LiteralData));

        let err = match PacketList::new().read_with(&nested_uncompressed(5), &config) {
            Err(e) => e,
            Ok(()) => panic!("limit not enforced"),
        };
        assert!(matches!(innermost(&err), PacketError::NestingTooDeep { depth: 5, max: 4 }));
    }

    #[test]
    fn nesting_limit_is_validated() {
        for depth in [0, 257] {
            let config = PacketConfig { max_nesting_depth: depth, ..PacketConfig::default() };
            assert!(matches!(PacketList::new().read_with(&[], &config), Err(PacketError::Config(_))));
        }
    }

    #[test]
    fn decompressed_size_is_capped() {
        let text = "z".repeat(64 * 1024);
        let mut list = PacketList::new();
        list.push(compressed_with(CompressionAlgorithm::Zlib, &[text.as_str()]));
        let wire = list.write().unwrap();

        let config = PacketConfig { max_decompressed_len: 1024, ..PacketConfig::default() };
        assert!(matches!(
            PacketList::new().read_with(&wire, &config),
            Err(PacketError::MalformedBody { tag: 8, source: BodyError::Codec { codec: "zlib", .. }, .. })
        ));

        let back = PacketList::from_bytes(&wire).unwrap();
        assert_eq!(literal_text(&back[0].packets()[0]).len(), text.len());
    }
}
