// Pool lifecycle and counter export. One sequential test: the counters are
// process-wide.

#[cfg(test)]
mod tests {
    use zbuf_core::telemetry::{snapshot, Event, PoolKind, TelemetrySnapshot};
    use zbuf_core::{
        build_dict, compress, compress_bound, compress_dict, decompress, decompress_dict,
        release_idle_contexts, CompressionDictionary, DecompressionDictionary,
    };

    #[test]
    fn pools_reuse_and_release_contexts() {
        let _ = env_logger::builder().is_test(true).try_init();

        let src = b"telemetry telemetry telemetry".repeat(200);

// # ✅ 1. Sequential calls reuse one context per pool

        let mut cs = Vec::new();
        for _ in 0..5 {
            cs.clear();
            compress(&mut cs, &src);
            let mut ds = Vec::new();
            decompress(&mut ds, &cs).unwrap();
            assert_eq!(ds, src);
        }

        let snap = snapshot();
        let cctx = snap.pool(PoolKind::Compress).unwrap();
        assert_eq!(cctx.created, 1);
        assert_eq!(cctx.acquired(), 5);
        assert_eq!(cctx.idle, 1);
        let dctx = snap.pool(PoolKind::Decompress).unwrap();
        assert_eq!(dctx.created, 1);
        assert_eq!(dctx.reused, 4);
        assert_eq!(snap.pool(PoolKind::CompressDict).unwrap().acquired(), 0);

// # ✅ 2. Path counters

        let before = snapshot();
        let mut fast = Vec::with_capacity(compress_bound(src.len()));
        compress(&mut fast, &src);
        let mut slow = Vec::new();
        compress(&mut slow, &src);
        let after = snapshot();
        assert_eq!(after.event(Event::CompressFastPath), before.event(Event::CompressFastPath) + 1);
        assert_eq!(after.event(Event::CompressSlowPath), before.event(Event::CompressSlowPath) + 1);

        let mut ds = Vec::new();
        assert!(decompress(&mut ds, b"garbage input").is_err());
        assert_eq!(snapshot().decompress_failures, after.decompress_failures + 1);

// # ✅ 3. Dictionary calls use their own pools

        let samples: Vec<Vec<u8>> = (0..1000)
            .map(|i| format!("{} telemetry sample {}", i, i % 9).into_bytes())
            .collect();
        let dict = build_dict(&samples, 4 * 1024).unwrap();
        let cd = CompressionDictionary::new(&dict).unwrap();
        let dd = DecompressionDictionary::new(&dict).unwrap();
        let mut cs = Vec::new();
        compress_dict(&mut cs, &src, &cd);
        let mut ds = Vec::new();
        decompress_dict(&mut ds, &cs, &dd).unwrap();
        assert_eq!(ds, src);

        let snap = snapshot();
        assert_eq!(snap.pool(PoolKind::CompressDict).unwrap().created, 1);
        assert_eq!(snap.pool(PoolKind::DecompressDict).unwrap().created, 1);

// # ✅ 4. Idle contexts are released on request

        let freed = release_idle_contexts();
        assert!(freed >= 4, "freed {}", freed);
        let snap = snapshot();
        for kind in PoolKind::ALL {
            assert_eq!(snap.pool(kind).unwrap().idle, 0, "{}", kind);
        }
        assert_eq!(snap.pools.iter().map(|p| p.purged).sum::<u64>(), freed as u64);

        // Pools refill lazily.
        let mut again = Vec::new();
        compress(&mut again, &src);
        assert_eq!(snapshot().pool(PoolKind::Compress).unwrap().created, 2);

// # ✅ 5. Snapshot export

        let json = serde_json::to_string(&snapshot()).unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pools.len(), PoolKind::ALL.len());
        assert!(json.contains("\"streaming_fallbacks\""));
    }
}
