use std::fmt;

use super::filter;

/// Calendar year, always integral once loaded.
pub type Year = i64;

// ---------------------------------------------------------------------------
// Record – one row of the PMI table
// ---------------------------------------------------------------------------

/// A single PMI score for a (place, year, word) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Place name; empty when the source cell was missing.
    pub placename: String,
    /// `None` when the source cell was missing.
    pub year: Option<Year>,
    pub word: String,
    /// NaN when the source cell was missing, so it never passes a threshold.
    pub pmi: f64,
}

impl Record {
    pub fn new(placename: impl Into<String>, year: Option<Year>, word: impl Into<String>, pmi: f64) -> Self {
        Self {
            placename: placename.into(),
            year,
            word: word.into(),
            pmi,
        }
    }
}

// ---------------------------------------------------------------------------
// YearOption – one entry of the year selector
// ---------------------------------------------------------------------------

/// A selectable year: integer label plus the numeric value used for filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOption {
    pub label: String,
    pub value: Year,
}

impl YearOption {
    pub fn new(value: Year) -> Self {
        Self {
            label: value.to_string(),
            value,
        }
    }
}

impl fmt::Display for YearOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded PMI table. Never mutated after construction; share it behind an
/// `Arc` between sessions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Sorted distinct place names, computed once at load.
    placenames: Vec<String>,
}

impl Dataset {
    /// Build the dataset and its place index from loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let placenames = filter::distinct_placenames(&records);
        Self {
            records,
            placenames,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorted, deduplicated place names (see [`filter::distinct_placenames`]).
    pub fn placenames(&self) -> &[String] {
        &self.placenames
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_index_built_at_load() {
        let ds = Dataset::from_records(vec![
            Record::new("Seattle", Some(2020), "rain", 5.0),
            Record::new("Boston", Some(2020), "river", -2.5),
            Record::new("Boston", Some(2019), "river", 1.0),
        ]);
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
        assert_eq!(ds.placenames(), ["Boston", "Seattle"]);
    }

    #[test]
    fn test_year_option_label_is_integer() {
        let opt = YearOption::new(2019);
        assert_eq!(opt.label, "2019");
        assert_eq!(opt.to_string(), "2019");
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.placenames().is_empty());
    }
}
