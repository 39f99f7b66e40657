// Streaming helpers over Read/Write and their interop with the buffer API.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use zbuf_core::{
        build_dict, compress, compress_dict, decompress, decompress_dict, stream_compress,
        stream_compress_dict, stream_compress_level, stream_decompress, stream_decompress_dict,
        CompressionDictionary, DecompressionDictionary,
    };

    fn data(lines: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for i in 0..lines {
            out.extend_from_slice(format!("record {} value {}\n", i, i * 7 % 13).as_bytes());
        }
        out
    }

// # ✅ 1. Stream round-trip

    #[test]
    fn stream_roundtrip() {
        let src = data(20_000);
        let mut frame = Vec::new();
        stream_compress(&mut frame, Cursor::new(&src)).unwrap();
        assert!(frame.len() < src.len());

        let mut out = Vec::new();
        stream_decompress(&mut out, Cursor::new(&frame)).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn stream_levels_clamp() {
        let src = data(500);
        for level in [i32::MIN, 1, 19, i32::MAX] {
            let mut frame = Vec::new();
            stream_compress_level(&mut frame, &src[..], level).unwrap();
            let mut out = Vec::new();
            stream_decompress(&mut out, &frame[..]).unwrap();
            assert_eq!(out, src, "level {}", level);
        }
    }

// # ✅ 2. Interop with the buffer API

    #[test]
    fn stream_frames_decode_with_buffer_api() {
        let src = data(5_000);
        let mut frame = Vec::new();
        stream_compress(&mut frame, &src[..]).unwrap();

        let mut out = b"==".to_vec();
        decompress(&mut out, &frame).unwrap();
        assert_eq!(&out[2..], &src[..]);
    }

    #[test]
    fn buffer_frames_decode_with_stream_api() {
        let a = data(100);
        let b = data(3_000);
        let mut frames = Vec::new();
        compress(&mut frames, &a);
        compress(&mut frames, &b);

        let mut out = Vec::new();
        stream_decompress(&mut out, &frames[..]).unwrap();
        assert_eq!(out.len(), a.len() + b.len());
        assert_eq!(&out[..a.len()], &a[..]);
        assert_eq!(&out[a.len()..], &b[..]);
    }

// # ✅ 3. Dictionaries on both sides

    #[test]
    fn stream_dict_interop() {
        let samples: Vec<Vec<u8>> = (0..1000)
            .map(|i| format!("record {} value {}", i, i % 13).into_bytes())
            .collect();
        let dict = build_dict(&samples, 8 * 1024).unwrap();
        let cd = CompressionDictionary::with_level(&dict, 5).unwrap();
        let dd = DecompressionDictionary::new(&dict).unwrap();
        let src = data(2_000);

        let mut streamed = Vec::new();
        stream_compress_dict(&mut streamed, &src[..], &cd).unwrap();
        let mut out = Vec::new();
        decompress_dict(&mut out, &streamed, &dd).unwrap();
        assert_eq!(out, src);

        let mut buffered = Vec::new();
        compress_dict(&mut buffered, &src, &cd);
        let mut out = Vec::new();
        stream_decompress_dict(&mut out, &buffered[..], &dd).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn pooled_contexts_do_not_keep_a_dictionary() {
        let dicts: Vec<Vec<u8>> = (0..2)
            .map(|k| {
                let samples: Vec<Vec<u8>> = (0..1000)
                    .map(|i| format!("dict {} record {} value {}", k, i, i % 13).into_bytes())
                    .collect();
                build_dict(&samples, 4 * 1024).unwrap()
            })
            .collect();
        let src = data(1_000);

        // Alternate dictionaries through the same pooled contexts.
        for round in 0..4 {
            let dict = &dicts[round % 2];
            let cd = CompressionDictionary::new(dict).unwrap();
            let dd = DecompressionDictionary::new(dict).unwrap();

            let mut frame = Vec::new();
            stream_compress_dict(&mut frame, &src[..], &cd).unwrap();
            let mut out = Vec::new();
            stream_decompress_dict(&mut out, &frame[..], &dd).unwrap();
            assert_eq!(out, src, "round {}", round);

            // The plain decoder never inherits the dictionary.
            let mut plain = Vec::new();
            assert!(stream_decompress(&mut plain, &frame[..]).is_err());

            cd.release();
            dd.release();
        }
    }

// # ❌ 4. Garbage through the stream decoder

    #[test]
    fn stream_decompress_rejects_garbage() {
        let mut out = Vec::new();
        assert!(stream_decompress(&mut out, &b"not zstd at all"[..]).is_err());
    }

    #[test]
    fn stream_frames_carry_a_checksum() {
        let src = data(3_000);
        let mut frame = Vec::new();
        stream_compress(&mut frame, &src[..]).unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0x01;

        let mut out = Vec::new();
        assert!(stream_decompress(&mut out, &frame[..]).is_err());
        let mut out = Vec::new();
        assert!(decompress(&mut out, &frame).is_err());
        assert!(out.is_empty());
    }
}
