// Header codec coverage:
//
// * `encode_tag`, `encode_simple_length`, `encode_partial_marker`
// * `encode_old_header` / `encode_header`
// * `decode_header`, `decode_length`, `decode_partial_marker`
// * `read_packet` (fixed, partial, indeterminate, truncated)

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use proptest::prelude::*;
    use packet_core::headers::{
        decode_header, decode_length, decode_partial_marker, encode_header, encode_old_header,
        encode_partial_marker, encode_simple_header, encode_simple_length, encode_tag, read_packet,
        BodyLength, HeaderError, HeaderFormat,
    };

// # 1. Length vectors at every encoding boundary

    #[test]
    fn simple_length_vectors() {
        assert_eq!(encode_simple_length(0).unwrap(), vec![0]);
        assert_eq!(encode_simple_length(191).unwrap(), vec![191]);
        assert_eq!(encode_simple_length(192).unwrap(), vec![192, 0]);
        assert_eq!(encode_simple_length(8383).unwrap(), vec![223, 255]);
        assert_eq!(encode_simple_length(8384).unwrap(), vec![255, 0x00, 0x00, 0x20, 0xC0]);
        assert_eq!(encode_simple_length(100_000).unwrap(), vec![255, 0x00, 0x01, 0x86, 0xA0]);
    }

    #[test]
    fn tag_octet_vectors() {
        assert_eq!(encode_tag(11).unwrap(), 0xCB);
        assert_eq!(encode_tag(63).unwrap(), 0xFF);
        assert_eq!(
            encode_tag(64).unwrap_err(),
            HeaderError::TagOutOfRange { tag: 64, max: 63 }
        );
    }

    #[test]
    fn partial_marker_vectors() {
        assert_eq!(encode_partial_marker(0).unwrap(), 224);
        assert_eq!(encode_partial_marker(9).unwrap(), 233);
        assert_eq!(encode_partial_marker(30).unwrap(), 254);
        assert!(matches!(
            encode_partial_marker(31),
            Err(HeaderError::InvalidPartialExponent { exponent: 31 })
        ));

        assert_eq!(decode_partial_marker(233).unwrap(), 512);
        assert_eq!(decode_partial_marker(254).unwrap(), 1 << 30);
        assert!(matches!(decode_partial_marker(223), Err(HeaderError::InvalidPartialMarker { .. })));
        assert!(matches!(decode_partial_marker(255), Err(HeaderError::InvalidPartialMarker { .. })));
    }

    #[test]
    fn simple_header_is_tag_plus_length() {
        assert_eq!(encode_simple_header(2, 300).unwrap(), vec![0xC2, 192, 108]);
    }

// # 2. Old format

    #[test]
    fn old_header_picks_smallest_length_type() {
        assert_eq!(encode_old_header(11, 5).unwrap(), vec![0xAC, 5]);
        assert_eq!(encode_old_header(11, 300).unwrap(), vec![0xAD, 0x01, 0x2C]);
        assert_eq!(encode_old_header(2, 70_000).unwrap(), vec![0x8A, 0x00, 0x01, 0x11, 0x70]);
        assert!(matches!(
            encode_old_header(17, 1),
            Err(HeaderError::TagOutOfRange { tag: 17, max: 15 })
        ));
    }

    #[test]
    fn old_format_falls_back_for_wide_tags() {
        assert_eq!(encode_header(2, 1, HeaderFormat::Old).unwrap(), vec![0x88, 1]);
        assert_eq!(encode_header(17, 1, HeaderFormat::Old).unwrap(), vec![0xD1, 1]);
        assert_eq!(encode_header(2, 1, HeaderFormat::New).unwrap(), vec![0xC2, 1]);
    }

    #[test]
    fn decode_old_header() {
        let frame = decode_header(&[0xAD, 0x01, 0x2C], 0, 3).unwrap();
        assert_eq!(frame.tag, 11);
        assert_eq!(frame.format, HeaderFormat::Old);
        assert_eq!(frame.length, BodyLength::Fixed(300));
        assert_eq!(frame.offset, 3);
    }

    #[test]
    fn old_indeterminate_runs_to_end() {
        let input = Bytes::from_static(&[0xAF, b'b', 0, 0, 0, 0, 0, b'x', b'y']);
        let parsed = read_packet(&input, 0).unwrap();
        assert_eq!(parsed.tag, 11);
        assert_eq!(parsed.body.len(), 8);
        assert_eq!(parsed.offset, input.len());
    }

// # 3. Header faults

    #[test]
    fn tag_octet_without_high_bit_is_rejected() {
        assert!(matches!(
            decode_header(&[0x3F, 0], 0, 2),
            Err(HeaderError::InvalidTagOctet { offset: 0, octet: 0x3F })
        ));
    }

    #[test]
    fn missing_length_octets() {
        // Two-octet length with only the first octet present.
        assert!(matches!(
            decode_header(&[0xC2, 0xC5], 0, 2),
            Err(HeaderError::IncompleteLength { need: 1, have: 0, .. })
        ));
        // Five-octet length cut short.
        assert!(matches!(
            decode_header(&[0xC2, 0xFF, 0, 0], 0, 4),
            Err(HeaderError::IncompleteLength { need: 4, have: 2, .. })
        ));
    }

    #[test]
    fn window_limits_the_read() {
        // Bytes exist but lie outside the caller's window.
        let bytes = [0xC2, 0xFF, 0, 0, 0, 1];
        assert!(decode_header(&bytes, 0, 3).is_err());
        assert!(decode_header(&bytes, 0, 6).is_ok());
    }

    #[test]
    fn empty_window_is_missing_tag() {
        assert_eq!(decode_header(&[], 0, 0).unwrap_err(), HeaderError::MissingTag { offset: 0 });
    }

// # 4. read_packet

    #[test]
    fn fixed_body_is_zero_copy_slice() {
        let input = Bytes::from_static(&[0xC2, 3, 1, 2, 3, 0xC2, 0]);
        let first = read_packet(&input, 0).unwrap();
        assert_eq!(&first.body[..], &[1, 2, 3]);
        assert_eq!(first.offset, 5);
        assert_eq!(first.partial_chunks, 0);

        let second = read_packet(&input, first.offset).unwrap();
        assert!(second.body.is_empty());
        assert_eq!(second.header_offset, 5);
    }

    #[test]
    fn partial_body_is_reassembled() {
        let mut wire = vec![0xD2, 233];
        wire.extend(std::iter::repeat(0xAA).take(512));
        wire.push(233);
        wire.extend(std::iter::repeat(0xBB).take(512));
        wire.push(10);
        wire.extend(std::iter::repeat(0xCC).take(10));

        let parsed = read_packet(&Bytes::from(wire.clone()), 0).unwrap();
        assert_eq!(parsed.tag, 18);
        assert_eq!(parsed.body.len(), 1034);
        assert_eq!(parsed.partial_chunks, 2);
        assert_eq!(parsed.offset, wire.len());
        assert_eq!(parsed.body[511], 0xAA);
        assert_eq!(parsed.body[512], 0xBB);
        assert_eq!(parsed.body[1033], 0xCC);
    }

    #[test]
    fn truncated_body_reports_need_and_have() {
        let mut wire = vec![0xC2, 100];
        wire.extend([0u8; 50]);
        assert_eq!(
            read_packet(&Bytes::from(wire), 0).unwrap_err(),
            HeaderError::TruncatedBody { offset: 2, need: 100, have: 50 }
        );
    }

    #[test]
    fn truncated_partial_chunk() {
        let mut wire = vec![0xCB, 233];
        wire.extend([0u8; 100]);
        assert!(matches!(
            read_packet(&Bytes::from(wire), 0),
            Err(HeaderError::TruncatedBody { need: 512, have: 100, .. })
        ));
    }

// # 5. Properties

    proptest! {
        #[test]
        fn prop_simple_length_decodes_to_itself(len in 0usize..200_000) {
            let enc = encode_simple_length(len).unwrap();
            let (decoded, next) = decode_length(&enc, 0, enc.len()).unwrap();
            prop_assert_eq!(decoded, BodyLength::Fixed(len as u32));
            prop_assert_eq!(next, enc.len());
        }

        #[test]
        fn prop_shortest_encoding(len in 0usize..200_000) {
            let enc = encode_simple_length(len).unwrap();
            let expected = if len < 192 { 1 } else if len < 8384 { 2 } else { 5 };
            prop_assert_eq!(enc.len(), expected);
        }

        #[test]
        fn prop_decode_never_reads_past_window(bytes in proptest::collection::vec(any::<u8>(), 0..16), cut in 0usize..16) {
            let cut = cut.min(bytes.len());
            if let Ok(frame) = decode_header(&bytes, 0, cut) {
                prop_assert!(frame.offset <= cut);
            }
        }
    }
}
