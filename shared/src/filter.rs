use crate::catches::CatchRecord;

// ===== STEP TABLES =====

/// One stop on a range control. `More` is the open-ended last stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Value(f64),
    More,
}

/// Fixed, non-uniform stops of a double-ended range control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTable {
    pub label: &'static str,
    pub unit: &'static str,
    pub steps: &'static [Step],
}

pub const LENGTH_STEPS: StepTable = StepTable {
    label: "length (cm)",
    unit: "cm",
    steps: &[
        Step::Value(0.0),
        Step::Value(10.0),
        Step::Value(20.0),
        Step::Value(30.0),
        Step::Value(40.0),
        Step::Value(50.0),
        Step::Value(60.0),
        Step::Value(70.0),
        Step::Value(80.0),
        Step::Value(90.0),
        Step::Value(100.0),
        Step::Value(125.0),
        Step::Value(150.0),
        Step::Value(175.0),
        Step::Value(200.0),
        Step::More,
    ],
};

pub const WEIGHT_STEPS: StepTable = StepTable {
    label: "weight (g)",
    unit: "g",
    steps: &[
        Step::Value(0.0),
        Step::Value(500.0),
        Step::Value(600.0),
        Step::Value(700.0),
        Step::Value(800.0),
        Step::Value(900.0),
        Step::Value(1000.0),
        Step::Value(2000.0),
        Step::Value(3000.0),
        Step::Value(4000.0),
        Step::Value(5000.0),
        Step::Value(7500.0),
        Step::Value(10000.0),
        Step::More,
    ],
};

impl StepTable {
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn full_range(&self) -> RangeSelection {
        RangeSelection {
            from: 0,
            to: self.last_index(),
        }
    }

    fn step(&self, index: usize) -> Step {
        self.steps
            .get(index.min(self.last_index()))
            .copied()
            .unwrap_or(Step::More)
    }

    fn largest_value(&self) -> f64 {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Value(value) => Some(*value),
                Step::More => None,
            })
            .fold(0.0, f64::max)
    }

    /// Lower handle value. `More` on the lower handle means "at least the
    /// largest numeric stop".
    pub fn lower_bound(&self, index: usize) -> f64 {
        match self.step(index) {
            Step::Value(value) => value,
            Step::More => self.largest_value(),
        }
    }

    pub fn upper_bound(&self, index: usize) -> UpperBound {
        match self.step(index) {
            Step::Value(value) => UpperBound::Limit(value),
            Step::More => UpperBound::Unbounded,
        }
    }

    pub fn step_label(&self, index: usize) -> String {
        match self.step(index) {
            Step::Value(value) => format!("{value}"),
            Step::More => "more".to_string(),
        }
    }

    pub fn value_range(&self, selection: RangeSelection) -> ValueRange {
        ValueRange {
            min: self.lower_bound(selection.from),
            max: self.upper_bound(selection.to),
        }
    }

    /// Label shown next to a control, e.g. `"20 – more cm"`.
    pub fn selection_label(&self, selection: RangeSelection) -> String {
        format!(
            "{} – {} {}",
            self.step_label(selection.from),
            self.step_label(selection.to),
            self.unit
        )
    }
}

/// Handle positions of a double-ended control, as indexes into a [`StepTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    pub from: usize,
    pub to: usize,
}

impl RangeSelection {
    /// Moves the lower handle; it never passes the upper one.
    pub fn with_from(self, from: usize, table: &StepTable) -> Self {
        let from = from.min(table.last_index()).min(self.to);
        Self { from, ..self }
    }

    /// Moves the upper handle; it never passes the lower one.
    pub fn with_to(self, to: usize, table: &StepTable) -> Self {
        let to = to.min(table.last_index()).max(self.from);
        Self { to, ..self }
    }
}

// ===== FILTER STATE =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpperBound {
    Limit(f64),
    Unbounded,
}

impl UpperBound {
    pub fn admits(&self, value: f64) -> bool {
        match self {
            UpperBound::Limit(limit) => value <= *limit,
            UpperBound::Unbounded => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: UpperBound,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.admits(value)
    }
}

/// User-adjustable predicates of the map view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub species_substring: String,
    pub length: ValueRange,
    pub weight: ValueRange,
}

impl FilterState {
    /// Empty substring and both ranges spanning their whole step table.
    pub fn widest() -> Self {
        Self {
            species_substring: String::new(),
            length: LENGTH_STEPS.value_range(LENGTH_STEPS.full_range()),
            weight: WEIGHT_STEPS.value_range(WEIGHT_STEPS.full_range()),
        }
    }

    pub fn matches(&self, record: &CatchRecord) -> bool {
        let species_matches = self.species_substring.is_empty()
            || record
                .species
                .to_lowercase()
                .contains(&self.species_substring.to_lowercase());

        species_matches && self.length.contains(record.length) && self.weight.contains(record.weight)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::widest()
    }
}

/// Stable filter: keeps the input's relative order and never fabricates records.
pub fn compute_visible<'a>(records: &'a [CatchRecord], filter: &FilterState) -> Vec<&'a CatchRecord> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catches::CatchId;

    fn record(id: i64, species: &str, length: f64, weight: f64, location: &str, username: &str) -> CatchRecord {
        CatchRecord {
            id: CatchId(id),
            species: species.to_string(),
            length,
            weight,
            location: location.to_string(),
            date: "2021-06-01".to_string(),
            image_url: format!("/images/{id}.jpg"),
            username: username.to_string(),
        }
    }

    fn pike_and_perch() -> Vec<CatchRecord> {
        vec![
            record(1, "Pike", 40.0, 1200.0, "56.0,12.5", "alice"),
            record(2, "Perch", 15.0, 150.0, "57.0,13.0", "bob"),
        ]
    }

    fn ids(records: &[&CatchRecord]) -> Vec<i64> {
        records.iter().map(|record| record.id.0).collect()
    }

    #[test]
    fn test_widest_filter_returns_everything_in_order() {
        let records = vec![
            record(3, "Zander", 250.0, 20000.0, "55.0,11.0", "carl"),
            record(1, "Pike", 40.0, 1200.0, "56.0,12.5", "alice"),
            record(2, "Perch", 0.0, 0.0, "57.0,13.0", "bob"),
        ];
        let visible = compute_visible(&records, &FilterState::widest());
        assert_eq!(ids(&visible), vec![3, 1, 2]);
    }

    #[test]
    fn test_species_substring_is_case_insensitive() {
        let records = pike_and_perch();
        let filter = FilterState {
            species_substring: "pik".to_string(),
            ..FilterState::widest()
        };
        assert_eq!(ids(&compute_visible(&records, &filter)), vec![1]);

        let upper = FilterState {
            species_substring: "PER".to_string(),
            ..FilterState::widest()
        };
        assert_eq!(ids(&compute_visible(&records, &upper)), vec![2]);
    }

    #[test]
    fn test_min_length_with_unbounded_max() {
        let records = pike_and_perch();
        let filter = FilterState {
            length: ValueRange {
                min: 20.0,
                max: UpperBound::Unbounded,
            },
            ..FilterState::widest()
        };
        assert_eq!(ids(&compute_visible(&records, &filter)), vec![1]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let records = pike_and_perch();
        let filter = FilterState {
            weight: ValueRange {
                min: 150.0,
                max: UpperBound::Limit(1200.0),
            },
            ..FilterState::widest()
        };
        assert_eq!(ids(&compute_visible(&records, &filter)), vec![1, 2]);
    }

    #[test]
    fn test_every_visible_record_satisfies_all_predicates() {
        let records = vec![
            record(1, "Pike", 40.0, 1200.0, "56.0,12.5", "alice"),
            record(2, "Perch", 15.0, 150.0, "57.0,13.0", "bob"),
            record(3, "Pikeperch", 60.0, 2500.0, "58.0,14.0", "alice"),
            record(4, "Pike", 95.0, 7000.0, "59.0,15.0", "dana"),
        ];
        let filter = FilterState {
            species_substring: "pike".to_string(),
            length: LENGTH_STEPS.value_range(RangeSelection { from: 3, to: 10 }),
            weight: WEIGHT_STEPS.value_range(RangeSelection { from: 1, to: 11 }),
        };
        let visible = compute_visible(&records, &filter);

        assert_eq!(ids(&visible), vec![1, 3, 4]);
        for record in &visible {
            assert!(records.contains(*record));
            assert!(filter.matches(record));
        }
    }

    #[test]
    fn test_step_table_bounds() {
        assert_eq!(LENGTH_STEPS.lower_bound(0), 0.0);
        assert_eq!(LENGTH_STEPS.lower_bound(11), 125.0);
        assert_eq!(LENGTH_STEPS.lower_bound(LENGTH_STEPS.last_index()), 200.0);
        assert_eq!(LENGTH_STEPS.upper_bound(14), UpperBound::Limit(200.0));
        assert_eq!(
            WEIGHT_STEPS.upper_bound(WEIGHT_STEPS.last_index()),
            UpperBound::Unbounded
        );
        assert_eq!(
            WEIGHT_STEPS.selection_label(WEIGHT_STEPS.full_range()),
            "0 – more g"
        );
        assert_eq!(
            LENGTH_STEPS.selection_label(RangeSelection { from: 2, to: 11 }),
            "20 – 125 cm"
        );
    }

    #[test]
    fn test_range_handles_do_not_cross() {
        let table = LENGTH_STEPS;
        let selection = RangeSelection { from: 2, to: 5 };

        assert_eq!(selection.with_from(8, &table), RangeSelection { from: 5, to: 5 });
        assert_eq!(selection.with_to(1, &table), RangeSelection { from: 2, to: 2 });
        assert_eq!(
            selection.with_to(99, &table),
            RangeSelection {
                from: 2,
                to: table.last_index()
            }
        );
        assert_eq!(selection.with_from(0, &table), RangeSelection { from: 0, to: 5 });
    }

    #[test]
    fn test_empty_store() {
        let visible = compute_visible(&[], &FilterState::widest());
        assert!(visible.is_empty());
    }
}
