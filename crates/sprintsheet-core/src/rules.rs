//! Declarative write layout
//!
//! A [`Layout`] names the target sheet, the keyed [`UpdateRule`]s run in
//! order, and the [`StaticGroup`]s written unconditionally afterwards.
//!
//! # Footprints
//!
//! Every rule and group has a footprint: the rectangle it may ever write.
//! [`Layout::new`] rejects a layout whose footprints intersect each other or
//! any key window, so the outcome never depends on rule order and a write
//! can never clobber a sprint key.

use sprintsheet_grid::{CellAddress, CellRange, CellValue, Sheet};

use crate::error::LayoutError;
use crate::key::SprintKey;
use crate::locator::{Axis, Window};
use crate::record::{Field, SprintRecord};

/// Sheet the dashboard exports into
pub const TEAM_STATS_SHEET: &str = "Team Stats";

/// How a payload value is turned into a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    /// Written as received
    #[default]
    Raw,
    /// Received in percent, written as a fraction
    Percent,
}

impl Scale {
    /// Convert a payload value for writing
    ///
    /// An absent value is written as an empty cell. Percent values use their
    /// loose numeric reading, with an explicit `null` reading as 0; a value
    /// with no numeric reading is written as an empty cell.
    #[must_use]
    pub fn apply(self, value: Option<&CellValue>) -> CellValue {
        match (self, value) {
            (_, None) => CellValue::Empty,
            (Self::Raw, Some(value)) => value.clone(),
            (Self::Percent, Some(CellValue::Empty)) => CellValue::Number(0.0),
            (Self::Percent, Some(value)) => value
                .as_number()
                .map_or(CellValue::Empty, |n| CellValue::Number(n / 100.0)),
        }
    }
}

/// One field written next to a located key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    offset: u32,
    field: Field,
    scale: Scale,
}

impl FieldSpec {
    /// Field written as received, `offset` lanes away from the key lane
    #[inline]
    #[must_use]
    pub const fn raw(offset: u32, field: Field) -> Self {
        Self {
            offset,
            field,
            scale: Scale::Raw,
        }
    }

    /// Percent field divided by 100 before writing
    #[inline]
    #[must_use]
    pub const fn percent(offset: u32, field: Field) -> Self {
        Self {
            offset,
            field,
            scale: Scale::Percent,
        }
    }

    /// Distance from the key column (vertical) or key row (horizontal)
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Source field
    #[inline]
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Conversion applied before writing
    #[inline]
    #[must_use]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Cell value to write for a record
    #[must_use]
    pub fn value_for(&self, record: &SprintRecord) -> CellValue {
        self.scale.apply(record.field(self.field))
    }
}

/// Keyed write: locate the sprint in a window, then write beside it
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRule {
    name: &'static str,
    window: Window,
    fields: Vec<FieldSpec>,
}

impl UpdateRule {
    /// Create rule from an A1 window and its scan axis
    ///
    /// Fails when the window is not one row or column along `axis`, when no
    /// fields are given, or when a field lands off the sheet.
    pub fn new(
        name: &'static str,
        window: &str,
        axis: Axis,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, LayoutError> {
        let range: CellRange = window.parse()?;
        let window = Window::new(range, axis).map_err(|_| LayoutError::AxisMismatch {
            rule: name,
            window: range,
            axis,
        })?;
        let rule = Self {
            name,
            window,
            fields,
        };
        if rule.fields.is_empty() {
            return Err(LayoutError::NoFields(name));
        }
        for spec in &rule.fields {
            let last = window.slot(window.len() - 1);
            if last.and_then(|at| rule.target(at, spec)).is_none() {
                return Err(LayoutError::OffsetOutOfBounds {
                    rule: name,
                    offset: spec.offset,
                });
            }
        }
        Ok(rule)
    }

    /// Rule name used in logs and outcomes
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key window
    #[inline]
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Fields written on a hit
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Cell a field is written to, given the key cell that matched
    fn target(&self, key_cell: CellAddress, spec: &FieldSpec) -> Option<CellAddress> {
        let cross = self.window.lane().checked_add(spec.offset)?;
        match self.window.axis() {
            Axis::Vertical => key_cell.with_col(cross),
            Axis::Horizontal => key_cell.with_row(cross),
        }
    }

    fn key_cell(&self, hit: u32) -> Option<CellAddress> {
        self.window.slot(hit.checked_sub(self.window.base())?)
    }

    /// Cells written for a hit at row/column `hit`, in field order
    #[must_use]
    pub fn targets(&self, hit: u32) -> Vec<(CellAddress, FieldSpec)> {
        let Some(key_cell) = self.key_cell(hit) else {
            return Vec::new();
        };
        self.fields
            .iter()
            .filter_map(|spec| self.target(key_cell, spec).map(|at| (at, *spec)))
            .collect()
    }

    /// Rectangle covering every cell written for a hit
    #[must_use]
    pub fn written_range(&self, hit: u32) -> Option<CellRange> {
        self.targets(hit)
            .into_iter()
            .map(|(at, _)| CellRange::single(at))
            .reduce(|a, b| a.union(&b))
    }

    /// Rectangle covering every cell this rule could write
    #[must_use]
    pub fn footprint(&self) -> Option<CellRange> {
        let first = self.written_range(self.window.base())?;
        let last = self.written_range(self.window.base() + self.window.len() - 1)?;
        Some(first.union(&last))
    }

    /// Scan the sheet for the key
    #[must_use]
    pub fn locate<S: Sheet + ?Sized>(&self, sheet: &S, key: &SprintKey) -> Option<u32> {
        crate::locator::locate(sheet, &self.window, key)
    }
}

/// Unconditional writes to fixed cells, never highlighted
#[derive(Debug, Clone, PartialEq)]
pub struct StaticGroup {
    name: &'static str,
    cells: Vec<(CellAddress, Field)>,
}

impl StaticGroup {
    /// Create group from `(A1, field)` pairs
    pub fn new(name: &'static str, cells: &[(&str, Field)]) -> Result<Self, LayoutError> {
        let cells = cells
            .iter()
            .map(|(a1, field)| -> Result<_, LayoutError> { Ok((a1.parse::<CellAddress>()?, *field)) })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, cells })
    }

    /// Group name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Target cells with their source fields
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[(CellAddress, Field)] {
        &self.cells
    }
}

/// Target sheet plus the ordered rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    sheet_name: String,
    rules: Vec<UpdateRule>,
    statics: Vec<StaticGroup>,
}

impl Layout {
    /// Create layout, checking that no two writers share a cell
    pub fn new(
        sheet_name: impl Into<String>,
        rules: Vec<UpdateRule>,
        statics: Vec<StaticGroup>,
    ) -> Result<Self, LayoutError> {
        let layout = Self {
            sheet_name: sheet_name.into(),
            rules,
            statics,
        };
        layout.validate_disjoint()?;
        Ok(layout)
    }

    /// Layout of the team stats sheet
    ///
    /// | rule | window | writes |
    /// |------|--------|--------|
    /// | velocity | `A4:A26` | B, C, D of the hit row |
    /// | tasks | `A34:A56` | B, C, D (carryover in percent) |
    /// | completion | `G3:AC3` | rows 6 to 9 of the hit column, in percent |
    /// | task-vs-sp | `G24:AC24` | rows 25 and 26, in percent |
    /// | bugs | `G39:AC39` | rows 40 and 41 |
    ///
    /// Row 26 repeats `totalCompletionPct`, as the sheet's chart expects.
    pub fn team_stats() -> Result<Self, LayoutError> {
        use Field::{
            BugsIn, BugsOut, Carryover, CompletedPlanned, CompletedTasks, CompletedUnplanned,
            IncompleteTasks, PlannedCompletionPct, PlannedPct, PlannedSp, TaskCompletionPct,
            TotalCompletionPct, UnplannedCompletionPct, UnplannedSp, Velocity,
        };

        let rules = vec![
            UpdateRule::new(
                "velocity",
                "A4:A26",
                Axis::Vertical,
                vec![
                    FieldSpec::raw(1, CompletedUnplanned),
                    FieldSpec::raw(2, CompletedPlanned),
                    FieldSpec::raw(3, Velocity),
                ],
            )?,
            UpdateRule::new(
                "tasks",
                "A34:A56",
                Axis::Vertical,
                vec![
                    FieldSpec::raw(1, CompletedTasks),
                    FieldSpec::raw(2, IncompleteTasks),
                    FieldSpec::percent(3, Carryover),
                ],
            )?,
            UpdateRule::new(
                "completion",
                "G3:AC3",
                Axis::Horizontal,
                vec![
                    FieldSpec::percent(3, PlannedPct),
                    FieldSpec::percent(4, PlannedCompletionPct),
                    FieldSpec::percent(5, UnplannedCompletionPct),
                    FieldSpec::percent(6, TotalCompletionPct),
                ],
            )?,
            UpdateRule::new(
                "task-vs-sp",
                "G24:AC24",
                Axis::Horizontal,
                vec![
                    FieldSpec::percent(1, TaskCompletionPct),
                    FieldSpec::percent(2, TotalCompletionPct),
                ],
            )?,
            UpdateRule::new(
                "bugs",
                "G39:AC39",
                Axis::Horizontal,
                vec![FieldSpec::raw(1, BugsIn), FieldSpec::raw(2, BugsOut)],
            )?,
        ];

        let statics = vec![
            StaticGroup::new(
                "latest-sp",
                &[
                    ("B62", PlannedSp),
                    ("C62", CompletedPlanned),
                    ("E62", UnplannedSp),
                    ("F62", CompletedUnplanned),
                ],
            )?,
            StaticGroup::new("latest-bugs", &[("L62", BugsIn), ("M62", BugsOut)])?,
        ];

        Self::new(TEAM_STATS_SHEET, rules, statics)
    }

    /// Builder-style sheet rename
    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Target sheet
    #[inline]
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Keyed rules in run order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[UpdateRule] {
        &self.rules
    }

    /// Static groups in run order
    #[inline]
    #[must_use]
    pub fn statics(&self) -> &[StaticGroup] {
        &self.statics
    }

    /// Pairwise footprint check across rules, groups and key windows
    fn validate_disjoint(&self) -> Result<(), LayoutError> {
        let mut writers: Vec<(&'static str, CellRange)> = Vec::new();
        for rule in &self.rules {
            if let Some(footprint) = rule.footprint() {
                writers.push((rule.name, footprint));
            }
        }
        for group in &self.statics {
            writers.extend(
                group
                    .cells
                    .iter()
                    .map(|(at, _)| (group.name, CellRange::single(*at))),
            );
        }

        for (i, (first, a)) in writers.iter().enumerate() {
            for (second, b) in &writers[i + 1..] {
                if a.intersects(b) {
                    return Err(LayoutError::Overlap {
                        first: *first,
                        second: *second,
                        overlap: *a,
                    });
                }
            }
            for rule in &self.rules {
                if a.intersects(&rule.window.range()) {
                    return Err(LayoutError::Overlap {
                        first: *first,
                        second: rule.name,
                        overlap: rule.window.range(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Lay out sprint keys in every key window, starting at `first`
///
/// Slot `i` of each window receives `IR` + (`first` + `i`), zero-padded to
/// two digits. Used to initialise an empty team stats sheet. Nothing is
/// written when the numbering would overflow.
pub fn scaffold<S: Sheet + ?Sized>(
    sheet: &mut S,
    layout: &Layout,
    first: u64,
) -> Result<(), LayoutError> {
    let slots = layout.rules.iter().map(|r| r.window().len()).max().unwrap_or(0);
    if slots > 0 && first.checked_add(u64::from(slots - 1)).is_none() {
        return Err(LayoutError::NumberOverflow { first, slots });
    }
    for rule in &layout.rules {
        let window = rule.window();
        for i in 0..window.len() {
            if let Some(at) = window.slot(i) {
                let key = SprintKey::from_number(first + u64::from(i));
                sheet.set_value(at, CellValue::text(key.as_str()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sprintsheet_grid::Grid;

    fn at(a1: &str) -> CellAddress {
        a1.parse().unwrap()
    }

    fn range(a1: &str) -> CellRange {
        a1.parse().unwrap()
    }

    fn column_rule(name: &'static str, window: &str) -> UpdateRule {
        UpdateRule::new(name, window, Axis::Vertical, vec![FieldSpec::raw(1, Field::Velocity)])
            .unwrap()
    }

    #[test]
    fn team_stats_layout_is_valid() {
        let layout = Layout::team_stats().unwrap();
        assert_eq!(layout.sheet_name(), "Team Stats");
        let names: Vec<&str> = layout.rules().iter().map(UpdateRule::name).collect();
        assert_eq!(names, ["velocity", "tasks", "completion", "task-vs-sp", "bugs"]);
        assert_eq!(layout.statics().len(), 2);
    }

    #[test]
    fn windows_and_bases_match_sheet() {
        let layout = Layout::team_stats().unwrap();
        let shape: Vec<(String, Axis, u32)> = layout
            .rules()
            .iter()
            .map(|r| (r.window().range().to_string(), r.window().axis(), r.window().base()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("A4:A26".to_string(), Axis::Vertical, 4),
                ("A34:A56".to_string(), Axis::Vertical, 34),
                ("G3:AC3".to_string(), Axis::Horizontal, 7),
                ("G24:AC24".to_string(), Axis::Horizontal, 7),
                ("G39:AC39".to_string(), Axis::Horizontal, 7),
            ]
        );
    }

    #[test]
    fn vertical_targets_follow_the_hit_row() {
        let layout = Layout::team_stats().unwrap();
        let velocity = &layout.rules()[0];
        let cells: Vec<String> = velocity
            .targets(10)
            .iter()
            .map(|(a, _)| a.to_string())
            .collect();
        assert_eq!(cells, ["B10", "C10", "D10"]);
        assert_eq!(velocity.written_range(10), Some(range("B10:D10")));
        assert_eq!(velocity.footprint(), Some(range("B4:D26")));
    }

    #[test]
    fn horizontal_targets_follow_the_hit_column() {
        let layout = Layout::team_stats().unwrap();
        let completion = &layout.rules()[2];
        let cells: Vec<String> = completion
            .targets(9)
            .iter()
            .map(|(a, _)| a.to_string())
            .collect();
        assert_eq!(cells, ["I6", "I7", "I8", "I9"]);
        assert_eq!(completion.written_range(9), Some(range("I6:I9")));

        let task_vs_sp = &layout.rules()[3];
        let fields: Vec<Field> = task_vs_sp.fields().iter().map(FieldSpec::field).collect();
        assert_eq!(fields, [Field::TaskCompletionPct, Field::TotalCompletionPct]);
        assert_eq!(task_vs_sp.written_range(7), Some(range("G25:G26")));
    }

    #[test]
    fn hits_outside_window_write_nothing() {
        let layout = Layout::team_stats().unwrap();
        assert!(layout.rules()[0].targets(3).is_empty());
        assert!(layout.rules()[0].targets(27).is_empty());
    }

    #[test]
    fn percent_scale_divides_by_hundred() {
        assert_eq!(Scale::Percent.apply(Some(&CellValue::Number(50.0))), CellValue::Number(0.5));
        assert_eq!(Scale::Percent.apply(Some(&CellValue::text("75"))), CellValue::Number(0.75));
        assert_eq!(Scale::Percent.apply(Some(&CellValue::text("n/a"))), CellValue::Empty);
        assert_eq!(Scale::Raw.apply(Some(&CellValue::text("n/a"))), CellValue::text("n/a"));
    }

    #[test]
    fn null_percent_is_zero_but_absent_stays_empty() {
        assert_eq!(Scale::Percent.apply(Some(&CellValue::Empty)), CellValue::Number(0.0));
        assert_eq!(Scale::Percent.apply(None), CellValue::Empty);
        assert_eq!(Scale::Raw.apply(Some(&CellValue::Empty)), CellValue::Empty);
        assert_eq!(Scale::Raw.apply(None), CellValue::Empty);
    }

    #[test]
    fn two_dimensional_window_is_rejected() {
        let fields = vec![FieldSpec::raw(2, Field::Velocity)];
        let err = UpdateRule::new("wide", "A4:B26", Axis::Vertical, fields).unwrap_err();
        assert!(matches!(err, LayoutError::AxisMismatch { rule: "wide", .. }));

        let fields = vec![FieldSpec::raw(1, Field::Velocity)];
        let err = UpdateRule::new("sideways", "A4:A26", Axis::Horizontal, fields).unwrap_err();
        assert!(matches!(err, LayoutError::AxisMismatch { .. }));
    }

    #[test]
    fn empty_rule_is_rejected() {
        let err = UpdateRule::new("none", "A4:A26", Axis::Vertical, Vec::new()).unwrap_err();
        assert!(matches!(err, LayoutError::NoFields("none")));
    }

    #[test]
    fn overlapping_writers_are_rejected() {
        let a = column_rule("a", "A4:A26");
        let b = column_rule("b", "A20:A30");
        let err = Layout::new("S", vec![a, b], Vec::new()).unwrap_err();
        assert!(matches!(err, LayoutError::Overlap { first: "a", second: "b", .. }));
    }

    #[test]
    fn static_cell_inside_rule_footprint_is_rejected() {
        let a = column_rule("a", "A4:A26");
        let s = StaticGroup::new("s", &[("B10", Field::PlannedSp)]).unwrap();
        assert!(Layout::new("S", vec![a], vec![s]).is_err());
    }

    #[test]
    fn writes_onto_key_window_are_rejected() {
        let a = column_rule("a", "A4:A26");
        let s = StaticGroup::new("s", &[("A10", Field::PlannedSp)]).unwrap();
        assert!(Layout::new("S", vec![a], vec![s]).is_err());
    }

    #[test]
    fn scaffold_rejects_numbering_overflow() {
        let layout = Layout::team_stats().unwrap();
        let mut sheet = Grid::new();
        let err = scaffold(&mut sheet, &layout, u64::MAX).unwrap_err();
        assert!(matches!(err, LayoutError::NumberOverflow { first: u64::MAX, slots: 23 }));
        assert!(sheet.is_empty());

        let last = u64::MAX - 22;
        scaffold(&mut sheet, &layout, last).unwrap();
        assert_eq!(sheet.value(at("A26")), CellValue::text(format!("IR{}", u64::MAX)));
    }

    #[test]
    fn scaffold_fills_every_window() {
        let layout = Layout::team_stats().unwrap();
        let mut sheet = Grid::new();
        scaffold(&mut sheet, &layout, 1).unwrap();

        assert_eq!(sheet.value(at("A4")), CellValue::text("IR01"));
        assert_eq!(sheet.value(at("A26")), CellValue::text("IR23"));
        assert_eq!(sheet.value(at("A34")), CellValue::text("IR01"));
        assert_eq!(sheet.value(at("G3")), CellValue::text("IR01"));
        assert_eq!(sheet.value(at("AC39")), CellValue::text("IR23"));
        assert_eq!(sheet.len(), 5 * 23);
    }
}
