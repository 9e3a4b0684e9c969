use circle_tunnel_core::{
    CallbackId, CanvasConfig, Circle, CueCursor, CueSheet, PackingConfig, PackingSet,
    PlaybackClock, AudioClock, Simulation, StackConfig, TempoConfig, TunnelConfig,
};

const EPSILON: f64 = 1e-9;
const TICK_LIMIT: u64 = 20_000;

fn square_band(size: f64, seed: u64) -> PackingSet {
    let canvas = CanvasConfig {
        width: size,
        height: size,
    };
    PackingSet::new(canvas, 0.0, PackingConfig::default(), seed)
}

/// Ticks until the band stops scattering and every disc has frozen.
fn run_until_settled(set: &mut PackingSet) -> u64 {
    let mut frame = 0;
    while !set.is_settled() {
        assert!(frame < TICK_LIMIT, "band did not settle within {TICK_LIMIT} ticks");
        set.advance_one_tick(frame);
        assert_eq!(set.mirrors().len(), 2 * (set.circles().len() - 1));
        frame += 1;
    }
    frame
}

fn assert_no_overlap(circles: &[Circle]) {
    for (i, a) in circles.iter().enumerate() {
        for b in &circles[i + 1..] {
            if a.is_growing() || b.is_growing() {
                continue;
            }
            let distance = a.center.distance(b.center);
            assert!(
                distance >= a.radius + b.radius - EPSILON,
                "{a:?} overlaps {b:?} (distance {distance})"
            );
        }
    }
}

#[test]
fn small_canvas_saturates_without_overlap() {
    let mut set = square_band(100.0, 42);
    assert!((set.circles()[0].radius - 100.0 / 3.0).abs() < EPSILON);

    run_until_settled(&mut set);

    assert!(!set.is_active());
    assert!(set.circles().len() > 1);
    assert_no_overlap(set.circles());
}

#[test]
fn saturation_stops_new_placements() {
    let mut set = square_band(100.0, 7);
    let mut frame = 0;
    while set.is_active() {
        assert!(frame < TICK_LIMIT);
        set.advance_one_tick(frame);
        frame += 1;
    }

    let count = set.circles().len();
    for extra in 0..500 {
        let report = set.advance_one_tick(frame + extra);
        assert_eq!(report.placed, 0);
    }
    assert_eq!(set.circles().len(), count);
    assert!(set.is_settled());
}

#[test]
fn settled_band_is_left_untouched() {
    let mut set = square_band(120.0, 3);
    let frame = run_until_settled(&mut set);

    let circles = set.circles().to_vec();
    let mirrors = set.mirrors().to_vec();
    for extra in 0..50 {
        set.advance_one_tick(frame + extra);
    }

    assert_eq!(set.circles(), circles.as_slice());
    assert_eq!(set.mirrors(), mirrors.as_slice());
    assert!(!set.is_active());
}

#[test]
fn mirrors_follow_their_originals_to_the_end() {
    let mut set = square_band(150.0, 19);
    run_until_settled(&mut set);

    let range = set.depth_range();
    for (index, circle) in set.circles().iter().enumerate().skip(1) {
        let pair = &set.mirrors()[2 * (index - 1)..2 * index];
        assert_eq!(pair[0].depth, circle.depth - range);
        assert_eq!(pair[1].depth, circle.depth - 2.0 * range);
        for mirror in pair {
            assert_eq!(mirror.center, circle.center);
            assert_eq!(mirror.radius, circle.radius);
            assert!(!mirror.is_growing());
        }
    }
}

#[test]
fn cue_driven_session() {
    let config = TunnelConfig {
        canvas: CanvasConfig {
            width: 200.0,
            height: 150.0,
        },
        stack: StackConfig {
            layers: 2,
            spacing: 2400.0,
        },
        tempo: TempoConfig {
            ppq: 480.0,
            bpm: 120.0,
        },
        ..Default::default()
    };
    // Two simultaneous long notes at 1s (one cue), a short note at 3s.
    let sheet = CueSheet::from_json_str(
        r#"{ "tracks": [ { "callback": "travel", "notes": [
            { "ticks": 960, "time": 1.0, "durationTicks": 1920 },
            { "ticks": 960, "time": 1.0, "durationTicks": 480 },
            { "ticks": 2880, "time": 3.0, "durationTicks": 240 }
        ] } ] }"#,
    )
    .unwrap();

    let mut sim = Simulation::new(&config);
    let mut scheduler = Simulation::scheduler();
    assert_eq!(sheet.register_all(&mut scheduler).unwrap(), 2);
    assert_eq!(scheduler.cues().next().unwrap().callback, CallbackId::Travel);

    let mut clock = PlaybackClock::new();
    let mut cursor = CueCursor::new();
    clock.play();

    let dt = 0.25;
    let mut depth_at_two = None;
    for _ in 0..16 {
        clock.advance(dt);
        let now = clock.current_time();
        cursor.fire_due(&scheduler, now, &mut sim).unwrap();
        let summary = sim.frame(now);
        if now == 2.0 {
            depth_at_two = Some(summary.camera_depth);
        }
    }

    // The 2s move started at 1s is halfway at 2s.
    assert_eq!(depth_at_two, Some(1200.0));
    assert_eq!(sim.camera().depth(), 2400.0);
    assert!(!sim.camera().is_animating());
    assert_eq!(sim.stack().current_index(), 1);
    assert!(cursor.is_exhausted(&scheduler));
}
