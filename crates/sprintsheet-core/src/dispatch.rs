//! Rule-driven upsert of one sprint record

use sprintsheet_grid::{CellRange, Color, Sheet, Workbook};

use crate::error::{LayoutError, UpsertError};
use crate::key::SprintKey;
use crate::record::SprintRecord;
use crate::rules::{Layout, Scale};

/// Rule that found its key and wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    /// Rule name
    pub rule: &'static str,
    /// Absolute row (vertical) or column (horizontal) of the key
    pub hit: u32,
    /// Region written and highlighted
    pub written: CellRange,
}

/// Result of a successful upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    key: SprintKey,
    applied: Vec<RuleHit>,
    skipped: Vec<&'static str>,
}

impl Outcome {
    /// Key derived from the sprint name
    #[inline]
    #[must_use]
    pub fn key(&self) -> &SprintKey {
        &self.key
    }

    /// Rules that wrote, in run order
    #[inline]
    #[must_use]
    pub fn applied(&self) -> &[RuleHit] {
        &self.applied
    }

    /// Rules whose window did not contain the key
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> &[&'static str] {
        &self.skipped
    }

    /// Client-facing summary
    #[must_use]
    pub fn message(&self) -> String {
        format!("Updated stats for {}", self.key)
    }
}

/// Applies sprint records to a workbook through a [`Layout`]
///
/// One call to [`Dispatcher::apply`]:
/// 1. derives the key, failing before any write if there is none
/// 2. resolves the target sheet
/// 3. runs each keyed rule; a rule whose key is absent is skipped
/// 4. writes the static groups
/// 5. flushes the workbook once
///
/// Writes are not rolled back if the flush fails.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    layout: Layout,
    highlight: Color,
}

impl Dispatcher {
    /// Create dispatcher over a layout
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            highlight: Color::HIGHLIGHT,
        }
    }

    /// Dispatcher for the team stats sheet
    pub fn team_stats() -> Result<Self, LayoutError> {
        Ok(Self::new(Layout::team_stats()?))
    }

    /// Builder-style highlight color
    #[must_use]
    pub fn with_highlight(mut self, color: Color) -> Self {
        self.highlight = color;
        self
    }

    /// Write one record into the workbook
    pub fn apply<W: Workbook + ?Sized>(
        &self,
        book: &mut W,
        record: &SprintRecord,
    ) -> Result<Outcome, UpsertError> {
        let Some(key) = record.name_text().and_then(SprintKey::parse) else {
            let name = record.display_name();
            tracing::warn!("no sprint key in name: {}", name);
            return Err(UpsertError::InvalidSprintKey(name));
        };

        let sheet_name = self.layout.sheet_name();
        let Some(sheet) = book.sheet_mut(sheet_name) else {
            tracing::warn!("sheet not found: {}", sheet_name);
            return Err(UpsertError::TableNotFound(sheet_name.to_string()));
        };

        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        for rule in self.layout.rules() {
            let Some(hit) = rule.locate(&*sheet, &key) else {
                tracing::debug!(rule = rule.name(), key = %key, "key not in window, skipping");
                skipped.push(rule.name());
                continue;
            };
            for (at, spec) in rule.targets(hit) {
                sheet.set_value(at, spec.value_for(record));
            }
            if let Some(written) = rule.written_range(hit) {
                sheet.set_background(written, self.highlight);
                tracing::info!(rule = rule.name(), key = %key, range = %written, "rule applied");
                applied.push(RuleHit {
                    rule: rule.name(),
                    hit,
                    written,
                });
            }
        }

        for group in self.layout.statics() {
            for (at, field) in group.cells() {
                sheet.set_value(*at, Scale::Raw.apply(record.field(*field)));
            }
        }

        book.flush()?;
        tracing::info!(
            "updated stats for {}: {} applied, {} skipped",
            key,
            applied.len(),
            skipped.len()
        );

        Ok(Outcome {
            key,
            applied,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;
    use sprintsheet_grid::{CellAddress, CellValue, Grid, MemoryBook};

    fn at(a1: &str) -> CellAddress {
        a1.parse().unwrap()
    }

    fn book_with_key(a1: &str, key: &str) -> MemoryBook {
        MemoryBook::new().with_sheet("Team Stats", Grid::new().with(at(a1), key))
    }

    #[test]
    fn invalid_name_writes_nothing() {
        let dispatcher = Dispatcher::team_stats().unwrap();
        let mut book = book_with_key("A10", "IR07");
        let before = book.sheet("Team Stats").cloned();

        let err = dispatcher
            .apply(&mut book, &SprintRecord::named("Sprint Review"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not parse sprint key (e.g. IR21) from name: Sprint Review"
        );
        assert_eq!(book.sheet("Team Stats").cloned(), before);
        assert_eq!(book.flush_count(), 0);
    }

    #[test]
    fn missing_sheet_is_reported() {
        let dispatcher = Dispatcher::team_stats().unwrap();
        let mut book = MemoryBook::new().with_sheet("Archive", Grid::new());
        let err = dispatcher
            .apply(&mut book, &SprintRecord::named("IR07"))
            .unwrap_err();
        assert!(matches!(err, UpsertError::TableNotFound(ref name) if name == "Team Stats"));
        assert_eq!(book.flush_count(), 0);
    }

    #[test]
    fn renamed_sheet_is_used() {
        let layout = Layout::team_stats().unwrap().with_sheet_name("Stats 2025");
        let dispatcher = Dispatcher::new(layout);
        let mut book = MemoryBook::new().with_sheet("Stats 2025", Grid::new());
        assert!(dispatcher.apply(&mut book, &SprintRecord::named("IR07")).is_ok());
    }

    #[test]
    fn outcome_lists_hits_and_skips() {
        let dispatcher = Dispatcher::team_stats().unwrap();
        let mut book = book_with_key("A10", "IR07");
        let record = SprintRecord::named("Iteration 7").with(Field::Velocity, 8.0);

        let outcome = dispatcher.apply(&mut book, &record).unwrap();
        assert_eq!(outcome.message(), "Updated stats for IR07");
        assert_eq!(
            outcome.applied(),
            [RuleHit {
                rule: "velocity",
                hit: 10,
                written: "B10:D10".parse().unwrap(),
            }]
        );
        assert_eq!(outcome.skipped(), ["tasks", "completion", "task-vs-sp", "bugs"]);
    }

    #[test]
    fn custom_highlight_is_applied() {
        let dispatcher = Dispatcher::team_stats()
            .unwrap()
            .with_highlight(Color::rgb(0xd9, 0xea, 0xd3));
        let mut book = book_with_key("A10", "IR07");
        dispatcher.apply(&mut book, &SprintRecord::named("IR07")).unwrap();

        let sheet = book.sheet("Team Stats").unwrap();
        assert_eq!(sheet.background(at("C10")).map(|c| c.to_string()).as_deref(), Some("#d9ead3"));
    }

    #[test]
    fn missing_fields_clear_cells() {
        let dispatcher = Dispatcher::team_stats().unwrap();
        let mut book = MemoryBook::new().with_sheet(
            "Team Stats",
            Grid::new()
                .with(at("A10"), "IR07")
                .with(at("D10"), 99.0)
                .with(at("B62"), 40.0),
        );
        dispatcher.apply(&mut book, &SprintRecord::named("IR07")).unwrap();

        let sheet = book.sheet("Team Stats").unwrap();
        assert_eq!(sheet.value(at("D10")), CellValue::Empty);
        assert_eq!(sheet.value(at("B62")), CellValue::Empty);
    }
}
