// Integration test utilities
//
// Builds a small synthetic race: two drivers over 20 laps of a 5 km track
// with one hairpin at 2.5 km, written out as the session JSON the binary
// reads.

#![allow(dead_code)]

use apexline::records::{
    ClassifiedDriver, DriverSession, LapRecord, SessionData, SessionKind, TelemetrySample,
    WeatherSummary,
};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

pub const TRACK_M: f64 = 5000.0;
pub const APEX_M: f64 = 2500.0;

/// Speed profile of the reference car: 300 km/h with a V down to 100 km/h
pub fn base_speed(d: f64) -> f64 {
    let from_apex = (d - APEX_M).abs();
    if from_apex < 200.0 {
        100.0 + from_apex
    } else {
        300.0
    }
}

/// Raw telemetry every 5 m; brake reported as a 0-1 fraction
pub fn lap_telemetry(speed: impl Fn(f64) -> f64) -> Vec<TelemetrySample> {
    let mut samples = Vec::new();
    let mut time = 0.0;
    let mut prev: Option<(f64, f64)> = None;

    for i in 0..=1000 {
        let d = i as f64 * 5.0;
        let v = speed(d);
        if let Some((pd, pv)) = prev {
            time += (d - pd) / ((v + pv) / 2.0 / 3.6);
        }
        prev = Some((d, v));

        samples.push(TelemetrySample {
            distance: Some(d),
            time,
            speed: v,
            throttle: Some(if (2300.0..2600.0).contains(&d) { 0.0 } else { 100.0 }),
            brake: Some(if (2300.0..APEX_M).contains(&d) { 1.0 } else { 0.0 }),
            rpm: Some(6000.0 + v * 30.0),
            gear: Some((v / 40.0).clamp(1.0, 8.0) as u8),
            x: Some(d),
            y: Some(0.0),
        });
    }
    samples
}

fn lap(n: u32, time: f64, compound: &str) -> LapRecord {
    LapRecord {
        lap_number: n,
        lap_time: Some(time),
        compound: Some(compound.to_string()),
        sector_times: [Some(time * 0.3), Some(time * 0.4), Some(time * 0.3)],
        pit_in: false,
        pit_out: false,
        tyre_age: Some(n),
    }
}

/// VER: softs degrading 0.1 s/lap, stops on lap 10, flat on hards.
/// HAM: one stint on mediums, getting 0.03 s/lap faster.
pub fn race_session() -> SessionData {
    let in_corner = |d: f64| (d - APEX_M).abs() <= 125.0;

    let mut ver_laps: Vec<LapRecord> = (1..=10)
        .map(|n| lap(n, 90.0 + 0.1 * f64::from(n), "SOFT"))
        .collect();
    ver_laps[9].pit_in = true;
    ver_laps.extend((11..=20).map(|n| lap(n, 91.0, "HARD")));
    ver_laps[10].pit_out = true;

    let mut ver_telemetry = BTreeMap::new();
    ver_telemetry.insert(
        1,
        lap_telemetry(move |d| base_speed(d) + if in_corner(d) { 0.0 } else { 3.0 }),
    );
    ver_telemetry.insert(11, lap_telemetry(base_speed));

    let ham_laps: Vec<LapRecord> = (1..=20)
        .map(|n| lap(n, 90.6 - 0.03 * f64::from(n), "MEDIUM"))
        .collect();
    let mut ham_telemetry = BTreeMap::new();
    ham_telemetry.insert(
        20,
        lap_telemetry(move |d| base_speed(d) + if in_corner(d) { 5.0 } else { 0.0 }),
    );

    SessionData {
        kind: SessionKind::Race,
        weather: Some(WeatherSummary {
            air_temp: 22.4,
            track_temp: 35.1,
            humidity: 48.0,
            rain: false,
        }),
        results: vec![
            ClassifiedDriver {
                position: Some(1),
                abbreviation: "VER".to_string(),
                first_name: "Max".to_string(),
                last_name: "Verstappen".to_string(),
            },
            ClassifiedDriver {
                position: Some(2),
                abbreviation: "HAM".to_string(),
                first_name: "Lewis".to_string(),
                last_name: "Hamilton".to_string(),
            },
        ],
        drivers: vec![
            DriverSession {
                driver: "VER".to_string(),
                laps: ver_laps,
                telemetry: ver_telemetry,
            },
            DriverSession {
                driver: "HAM".to_string(),
                laps: ham_laps,
                telemetry: ham_telemetry,
            },
        ],
    }
}

/// Write a session as JSON to a temporary file
pub fn write_session(session: &SessionData) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut file, session).unwrap();
    file.flush().unwrap();
    file
}

/// Write arbitrary text (TOML config, broken JSON) to a temporary file
pub fn write_text(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
