//! CSV rendering of the chart series for spreadsheet consumers.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::forecast::forecast_model::{BurndownPoint, VelocityPoint};

// Flat row with every column present, so csv sees a fixed record width.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BurndownRow {
    date: NaiveDate,
    remaining_story_points: Option<f64>,
    completed_story_points: f64,
    scope_line: f64,
    working_day_prediction: Option<f64>,
    burnup_working_day_prediction: Option<f64>,
    is_actual: bool,
    is_prediction: bool,
}

impl From<&BurndownPoint> for BurndownRow {
    fn from(point: &BurndownPoint) -> Self {
        BurndownRow {
            date: point.date,
            remaining_story_points: point.remaining_story_points,
            completed_story_points: point.completed_story_points,
            scope_line: point.scope_line,
            working_day_prediction: point.working_day_prediction,
            burnup_working_day_prediction: point.burnup_working_day_prediction,
            is_actual: point.is_actual,
            is_prediction: point.is_prediction,
        }
    }
}

const BURNDOWN_HEADER: [&str; 8] = [
    "date",
    "remainingStoryPoints",
    "completedStoryPoints",
    "scopeLine",
    "workingDayPrediction",
    "burnupWorkingDayPrediction",
    "isActual",
    "isPrediction",
];
const VELOCITY_HEADER: [&str; 4] = ["date", "completedSP", "cumulativeSP", "velocity"];

// Header goes out explicitly so an empty series still yields one.
fn header_writer<W: Write>(writer: W, header: &[&str]) -> Result<csv::Writer<W>> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    Ok(csv_writer)
}

pub fn write_burndown_csv<W: Write>(points: &[BurndownPoint], writer: W) -> Result<()> {
    let mut csv_writer = header_writer(writer, &BURNDOWN_HEADER)?;
    for point in points {
        csv_writer.serialize(BurndownRow::from(point))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_velocity_csv<W: Write>(points: &[VelocityPoint], writer: W) -> Result<()> {
    let mut csv_writer = header_writer(writer, &VELOCITY_HEADER)?;
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn into_string(buffer: Vec<u8>) -> Result<String> {
    String::from_utf8(buffer).map_err(|e| Error::Unexpected(e.into()))
}

pub fn burndown_to_csv(points: &[BurndownPoint]) -> Result<String> {
    let mut buffer = Vec::new();
    write_burndown_csv(points, &mut buffer)?;
    into_string(buffer)
}

pub fn velocity_to_csv(points: &[VelocityPoint]) -> Result<String> {
    let mut buffer = Vec::new();
    write_velocity_csv(points, &mut buffer)?;
    into_string(buffer)
}
