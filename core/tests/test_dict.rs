// Dictionary lifecycle: training, preparation, binding, release.

#[cfg(test)]
mod tests {
    use zbuf_core::{
        build_dict, compress_dict, decompress, decompress_dict, CompressionDictionary,
        DecompressionDictionary, DictError,
    };

    fn line_samples() -> Vec<Vec<u8>> {
        (0..1000)
            .map(|i| format!("{} this is line {}", i, i).into_bytes())
            .collect()
    }

    fn payload(i: usize) -> Vec<u8> {
        let mut src = Vec::new();
        for j in 0..100 {
            src.extend_from_slice(format!("line {} is this {}\n", j, i + j).as_bytes());
        }
        src
    }

// # ✅ 1. Training

    #[test]
    fn build_dict_respects_capacity() {
        let dict = build_dict(&line_samples(), 16 * 1024).unwrap();
        assert!(!dict.is_empty());
        assert!(dict.len() <= 16 * 1024);
    }

    #[test]
    fn build_dict_rejects_zero_capacity() {
        let err = build_dict(&line_samples(), 0).unwrap_err();
        assert!(matches!(err, DictError::InvalidCapacity));
    }

// # ❌ 2. Preparation failures

    #[test]
    fn empty_dictionary_is_rejected() {
        assert!(matches!(CompressionDictionary::new(&[]), Err(DictError::Empty)));
        assert!(matches!(DecompressionDictionary::new(&[]), Err(DictError::Empty)));
    }

    #[test]
    fn malformed_zstd_dictionary_is_rejected() {
        // Dictionary magic followed by garbage entropy tables.
        let mut bad = 0xEC30A437u32.to_le_bytes().to_vec();
        bad.extend_from_slice(&[0xFFu8; 128]);

        assert!(matches!(
            CompressionDictionary::new(&bad),
            Err(DictError::Rejected { side: "compression", .. })
        ));
        assert!(matches!(
            DecompressionDictionary::new(&bad),
            Err(DictError::Rejected { side: "decompression", .. })
        ));
    }

// # ✅ 3. Binding

    #[test]
    fn dict_roundtrip_and_mismatch_without_dict() {
        let dict = build_dict(&line_samples(), 16 * 1024).unwrap();
        let cd = CompressionDictionary::new(&dict).unwrap();
        let dd = DecompressionDictionary::new(&dict).unwrap();

        for i in 0..30 {
            let src = payload(i);
            let mut cs = Vec::new();
            compress_dict(&mut cs, &src, &cd);

            let mut plain = Vec::new();
            decompress_dict(&mut plain, &cs, &dd).unwrap();
            assert_eq!(plain, src);

            let mut no_dict = Vec::new();
            let err = decompress(&mut no_dict, &cs).unwrap_err();
            assert!(err.is_dictionary_mismatch(), "got {:?}", err);
            assert!(err.to_string().contains("Dictionary mismatch"), "{}", err);
            assert!(no_dict.is_empty());
        }

        cd.release();
        dd.release();
    }

    #[test]
    fn level_is_fixed_at_preparation() {
        let dict = build_dict(&line_samples(), 8 * 1024).unwrap();
        let fast = CompressionDictionary::with_level(&dict, 1).unwrap();
        let clamped = CompressionDictionary::with_level(&dict, 10_000).unwrap();
        assert_eq!(fast.level(), 1);
        assert!(clamped.level() < 10_000);

        let dd = DecompressionDictionary::new(&dict).unwrap();
        let src = payload(3);
        for cd in [&fast, &clamped] {
            let mut cs = Vec::new();
            compress_dict(&mut cs, &src, cd);
            let mut plain = Vec::new();
            decompress_dict(&mut plain, &cs, &dd).unwrap();
            assert_eq!(plain, src);
        }
    }

    #[test]
    fn dict_frames_are_checksummed() {
        let dict = build_dict(&line_samples(), 8 * 1024).unwrap();
        let cd = CompressionDictionary::new(&dict).unwrap();
        let dd = DecompressionDictionary::new(&dict).unwrap();

        let src = payload(9);
        let mut cs = Vec::new();
        compress_dict(&mut cs, &src, &cd);

        for back in 1..=4 {
            let mut bad = cs.clone();
            let at = bad.len() - back;
            bad[at] ^= 0x01;
            let mut plain = Vec::new();
            assert!(decompress_dict(&mut plain, &bad, &dd).is_err(), "flip at -{}", back);
            assert!(plain.is_empty());
        }
    }

    #[test]
    fn foreign_dictionary_does_not_decode() {
        let dict_a = build_dict(&line_samples(), 8 * 1024).unwrap();
        let other: Vec<Vec<u8>> = (0..1000)
            .map(|i| format!("{{\"id\":{},\"kind\":\"other-{}\"}}", i, i % 7).into_bytes())
            .collect();
        let dict_b = build_dict(&other, 8 * 1024).unwrap();

        let cd = CompressionDictionary::new(&dict_a).unwrap();
        let dd = DecompressionDictionary::new(&dict_b).unwrap();

        let src = payload(5);
        let mut cs = Vec::new();
        compress_dict(&mut cs, &src, &cd);

        let mut plain = b"keep".to_vec();
        let err = decompress_dict(&mut plain, &cs, &dd).unwrap_err();
        assert!(err.is_dictionary_mismatch(), "got {:?}", err);
        assert_eq!(plain, b"keep");
    }
}
