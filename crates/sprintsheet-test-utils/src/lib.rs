//! Testing utilities for the sprintsheet workspace
//!
//! Shared fixtures: a scaffolded team stats workbook and a fully populated
//! sprint record.

#![allow(missing_docs)]

use sprintsheet_core::{scaffold, Field, Layout, SprintRecord, TEAM_STATS_SHEET};
use sprintsheet_grid::{CellAddress, Grid, MemoryBook, Sheet};

pub fn at(a1: &str) -> CellAddress {
    a1.parse().unwrap()
}

/// Team stats sheet with keys `IR<first>..` in every key window
pub fn team_stats_grid(first: u64) -> Grid {
    let layout = Layout::team_stats().unwrap();
    let mut grid = Grid::new();
    scaffold(&mut grid, &layout, first).unwrap();
    grid
}

pub fn team_stats_book(first: u64) -> MemoryBook {
    MemoryBook::new().with_sheet(TEAM_STATS_SHEET, team_stats_grid(first))
}

/// Workbook whose team stats sheet holds only the given key cells
pub fn book_with_keys(keys: &[(&str, &str)]) -> MemoryBook {
    let mut grid = Grid::new();
    for (a1, key) in keys {
        place_key(&mut grid, a1, key);
    }
    MemoryBook::new().with_sheet(TEAM_STATS_SHEET, grid)
}

pub fn place_key<S: Sheet>(sheet: &mut S, a1: &str, key: &str) {
    sheet.set_value(at(a1), key.into());
}

/// Record with every metric set to a distinct value
pub fn sample_record(name: &str) -> SprintRecord {
    SprintRecord::named(name)
        .with(Field::CompletedUnplanned, 3.0)
        .with(Field::CompletedPlanned, 5.0)
        .with(Field::Velocity, 8.0)
        .with(Field::CompletedTasks, 12.0)
        .with(Field::IncompleteTasks, 2.0)
        .with(Field::Carryover, 50.0)
        .with(Field::PlannedPct, 80.0)
        .with(Field::PlannedCompletionPct, 90.0)
        .with(Field::UnplannedCompletionPct, 60.0)
        .with(Field::TotalCompletionPct, 85.0)
        .with(Field::TaskCompletionPct, 75.0)
        .with(Field::BugsIn, 4.0)
        .with(Field::BugsOut, 6.0)
        .with(Field::PlannedSp, 40.0)
        .with(Field::UnplannedSp, 6.0)
}

/// `sample_record` as the JSON the dashboard sends
pub fn sample_payload(name: &str) -> String {
    serde_json::to_string(&sample_record(name)).unwrap()
}
