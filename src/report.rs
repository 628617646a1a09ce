//! Text and JSON rendering of analysis results for the command line

use crate::compare::ComparisonInsight;
use crate::records::WeatherSummary;
use crate::session::{RaceSummary, TelemetryComparison};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

/// Pretty-printed JSON for any result type
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}

fn format_lap_time(seconds: f64) -> String {
    if !(seconds > 0.0) || !seconds.is_finite() {
        return "-".to_string();
    }
    let millis = (seconds * 1000.0).round() as u64;
    format!(
        "{}:{:02}.{:03}",
        millis / 60_000,
        millis % 60_000 / 1000,
        millis % 1000
    )
}

fn weather_line(weather: &WeatherSummary) -> String {
    format!(
        "Weather: air {:.1}°C, track {:.1}°C, humidity {:.1}%{}",
        weather.air_temp,
        weather.track_temp,
        weather.humidity,
        if weather.rain { ", rain" } else { "" }
    )
}

/// Race summary as a text report
pub fn render_race(summary: &RaceSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", summary.headline.label, summary.headline.name);
    let _ = writeln!(out, "{}", weather_line(&summary.weather));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<6} {:>6} {:<8} {:<12} {:>10}",
        "driver", "stint", "laps", "compound", "best"
    );
    let _ = writeln!(out, "------ ------ -------- ------------ ----------");
    for driver in &summary.stints {
        for (i, stint) in driver.stints.iter().enumerate() {
            let best = summary
                .laps
                .iter()
                .filter(|l| l.driver == driver.driver && stint.contains(l.lap_number))
                .map(|l| l.lap_time_seconds)
                .fold(f64::INFINITY, f64::min);
            let _ = writeln!(
                out,
                "{:<6} {:>6} {:>3}-{:<4} {:<12} {:>10}",
                driver.driver,
                i + 1,
                stint.start,
                stint.end,
                stint.compound,
                format_lap_time(best)
            );
        }
    }

    let _ = writeln!(out);
    if summary.insights.is_empty() {
        let _ = writeln!(out, "No degradation insights.");
    } else {
        let _ = writeln!(out, "Tyre degradation:");
        for insight in &summary.insights {
            let _ = writeln!(out, "  - {}", insight);
        }
    }
    out
}

/// Aligned telemetry overview as a text report
pub fn render_telemetry(comparison: &TelemetryComparison) -> String {
    let mut out = String::new();
    let reference = &comparison.reference;
    let _ = writeln!(
        out,
        "Reference: {} lap {} ({}), track length {:.0} m",
        reference.driver,
        reference.lap_number,
        format_lap_time(reference.lap_time),
        comparison.track_length
    );
    let [s1, s2, s3] = comparison.session_best_sectors;
    let _ = writeln!(out, "Session best sectors: {:.3} / {:.3} / {:.3}", s1, s2, s3);
    let _ = writeln!(out, "{}", weather_line(&comparison.weather));
    let _ = writeln!(out);

    let _ = writeln!(out, "entry          lap   lap time tyre  top speed   final delta");
    let _ = writeln!(out, "------------ ----- ---------- ----- --------- -------------");
    for entry in &comparison.entries {
        let frame = &entry.frame;
        let top_speed = frame
            .telemetry
            .speed
            .iter()
            .copied()
            .fold(0.0, f64::max);
        let final_delta = frame
            .telemetry
            .delta_to_reference
            .last()
            .copied()
            .unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{:<12} {:>5} {:>10} {:>1}/{:<3} {:>9.1} {:>+13.3}",
            entry.key,
            frame.lap_number,
            format_lap_time(frame.lap_time.unwrap_or(0.0)),
            frame.tyre.symbol,
            frame.tyre.age,
            top_speed,
            final_delta
        );
        if !frame.missing_channels.is_empty() {
            let missing: Vec<String> = frame.missing_channels.iter().map(|c| c.to_string()).collect();
            let _ = writeln!(out, "  zero-filled: {}", missing.join(", "));
        }
    }
    out
}

/// Comparison findings as a numbered list
pub fn render_insights(insights: &[ComparisonInsight]) -> String {
    let mut out = String::new();
    for (i, insight) in insights.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, insight);
    }
    out
}
