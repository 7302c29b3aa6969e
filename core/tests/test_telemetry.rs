#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use pixcrypt_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        let mut c = TelemetryCounters::default();
        c.add_chunk(64, 64);
        c.add_chunk(32, 32);
        c.add_padding(4);
        c.add_iv(16);
        c.add_worker();
        c.add_worker();
        c
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20)); // ensure elapsed > stage times
        timer.add_stage_time(Stage::Read, Duration::from_millis(5));
        timer.add_stage_time(Stage::Transform, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn counters_track_blocks_and_chunks() {
        let c = make_counters();
        assert_eq!(c.blocks, 6);
        assert_eq!(c.chunks, 2);
        assert_eq!(c.bytes_in, 96);
        assert_eq!(c.workers, 2);
    }

    #[test]
    fn empty_chunk_counts_no_chunk() {
        let mut c = TelemetryCounters::default();
        c.add_chunk(0, 0);
        assert_eq!(c.chunks, 0);
        assert_eq!(c.blocks, 0);
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let mut a = make_counters();
        let mut b = make_counters();
        a.merge(&make_counters());
        b += make_counters();
        assert_eq!(a, b);
        assert_eq!(a.blocks, 12);
    }

    #[test]
    fn stage_times_accumulate_and_merge() {
        let mut s = StageTimes::default();
        s.add(Stage::Plan, Duration::from_micros(10));
        s.add(Stage::Plan, Duration::from_micros(5));

        let mut other = StageTimes::default();
        other.add(Stage::Plan, Duration::from_micros(1));
        other.add(Stage::Gather, Duration::from_micros(2));
        s.merge(&other);

        assert_eq!(s.get(Stage::Plan), Duration::from_micros(16));
        assert_eq!(s.get(Stage::Gather), Duration::from_micros(2));
        assert_eq!(s.get(Stage::Unpad), Duration::ZERO);
        assert_eq!(s.total(), Duration::from_micros(18));
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Transform.to_string(), "transform");
        assert_eq!(Stage::Unpad.to_string(), "unpad");
    }

    #[test]
    fn throughput_is_computed() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!(snapshot.throughput_bytes_per_sec > 0.0);
        assert!(snapshot.total_stage_time() <= snapshot.elapsed);
    }

    #[test]
    fn sanity_check_flags_length_mismatch() {
        let timer = make_timer();
        assert!(TelemetrySnapshot::from(&make_counters(), &timer).sanity_check());

        let mut bad = make_counters();
        bad.bytes_out += 1;
        assert!(!TelemetrySnapshot::from(&bad, &timer).sanity_check());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        let json = snapshot.to_json_pretty().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blocks, snapshot.blocks);
        assert_eq!(back.stage_times.get(Stage::Read), Duration::from_millis(5));
    }
}
