#![no_main]

use apexline::degradation::DegradationConfig;
use apexline::records::SessionData;
use apexline::resample::ResampleConfig;
use apexline::session::{self, TelemetryRequest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any session that deserializes must be analyzable without panicking
    let Ok(session) = serde_json::from_slice::<SessionData>(data) else {
        return;
    };
    let drivers: Vec<String> = session.drivers.iter().map(|d| d.driver.clone()).collect();

    let _ = session::summarize_race(&session, &drivers, &DegradationConfig::default());

    let request = TelemetryRequest {
        drivers,
        resolution: Some(200),
        ..Default::default()
    };
    if let Ok(loaded) = session::load_telemetry(&session, &request, &ResampleConfig::default()) {
        if let [first, second, ..] = loaded.entries.as_slice() {
            let _ = loaded.compare(&first.key, &second.key, &Default::default());
        }
    }
});
