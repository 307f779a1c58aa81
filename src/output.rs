//! Console rendering of a [`ResultMap`], one line per input.

use std::io::{self, Write};

use crate::batch::ResultMap;
use crate::location::Outcome;

const MISSING_COORD: &str = "N/A";
const MISSING_NAME: &str = "Unknown place";
const MISSING_STATE: &str = "Unknown state";

/// Format a coordinate in shortest round-trip form, keeping one decimal
/// place on integral values (`43.0`, not `43`).
pub fn format_coord(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn render_line(input: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Error { message } => format!("{} -> ERROR: {}", input, message),
        Outcome::Success(place) => {
            let lat = place.lat.map(format_coord);
            let lon = place.lon.map(format_coord);
            format!(
                "{} -> Lat: {}, Lon: {}, Name: {}, State: {}",
                input,
                lat.as_deref().unwrap_or(MISSING_COORD),
                lon.as_deref().unwrap_or(MISSING_COORD),
                place.name.as_deref().unwrap_or(MISSING_NAME),
                place.state.as_deref().unwrap_or(MISSING_STATE),
            )
        }
    }
}

pub fn write_results<W: Write>(out: &mut W, results: &ResultMap) -> io::Result<()> {
    for (input, outcome) in results.iter() {
        writeln!(out, "{}", render_line(input, outcome))?;
    }
    out.flush()
}
