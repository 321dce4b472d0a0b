use std::collections::BTreeSet;

use super::model::{Dataset, Record, Year, YearOption};

// ---------------------------------------------------------------------------
// Place names
// ---------------------------------------------------------------------------

/// Distinct place names, sorted lexicographically. Records with an empty
/// place name are not selectable and are skipped.
pub fn distinct_placenames(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.placename.is_empty())
        .map(|r| r.placename.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Year options
// ---------------------------------------------------------------------------

/// Years available for `placename`, ascending and deduplicated.
///
/// No selection (or an empty one) yields no options. Records with a missing
/// year are never offered.
pub fn year_options(dataset: &Dataset, placename: Option<&str>) -> Vec<YearOption> {
    let Some(placename) = placename.filter(|p| !p.is_empty()) else {
        return Vec::new();
    };
    dataset
        .records()
        .iter()
        .filter(|r| r.placename == placename)
        .filter_map(|r| r.year)
        .collect::<BTreeSet<Year>>()
        .into_iter()
        .map(YearOption::new)
        .collect()
}

/// The year to select after the option list has been re-derived: the first
/// (smallest) option, or nothing.
pub fn default_year(options: &[YearOption]) -> Option<Year> {
    options.first().map(|opt| opt.value)
}

// ---------------------------------------------------------------------------
// Chart filter
// ---------------------------------------------------------------------------

/// A fully specified chart query. Only exists when both a place and a year
/// are selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFilter<'a> {
    pub placename: &'a str,
    pub year: Year,
    pub min_pmi: f64,
}

impl<'a> ChartFilter<'a> {
    /// Build a filter from the current selection, or `None` if the place or
    /// year is unset. An empty place name or year 0 counts as unset.
    pub fn from_selection(placename: Option<&'a str>, year: Option<Year>, min_pmi: f64) -> Option<Self> {
        let placename = placename.filter(|p| !p.is_empty())?;
        Some(Self {
            placename,
            year: year.filter(|&y| y != 0)?,
            min_pmi,
        })
    }

    /// A record passes when place and year match exactly and its score is at
    /// least `min_pmi`. NaN scores never pass.
    pub fn matches(&self, record: &Record) -> bool {
        record.placename == self.placename
            && record.year == Some(self.year)
            && record.pmi >= self.min_pmi
    }
}

/// Records passing `filter`, in dataset order.
pub fn filtered_records<'a>(dataset: &'a Dataset, filter: &ChartFilter<'_>) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            Record::new("Boston", Some(2020), "river", -2.5),
            Record::new("Boston", Some(2020), "park", 3.1),
            Record::new("Boston", Some(2019), "river", 1.0),
            Record::new("Seattle", Some(2020), "rain", 5.0),
        ])
    }

    fn words(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.word.clone()).collect()
    }

    #[test]
    fn test_placenames_deduplicated_and_sorted() {
        let mut records = scenario().records().to_vec();
        records.extend(scenario().records().iter().cloned());
        records.push(Record::new("Albany", None, "snow", 0.5));
        records.push(Record::new("", Some(2020), "orphan", 0.5));

        let names = distinct_placenames(&records);
        assert_eq!(names, ["Albany", "Boston", "Seattle"]);
    }

    #[test]
    fn test_year_options_for_place() {
        let ds = scenario();
        let years: Vec<Year> = year_options(&ds, Some("Boston"))
            .iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(years, [2019, 2020]);

        let seattle = year_options(&ds, Some("Seattle"));
        assert_eq!(seattle, [YearOption::new(2020)]);
    }

    #[test]
    fn test_year_options_without_place() {
        let ds = scenario();
        assert!(year_options(&ds, None).is_empty());
        assert!(year_options(&ds, Some("")).is_empty());
        assert!(year_options(&ds, Some("Atlantis")).is_empty());
    }

    #[test]
    fn test_year_options_skip_missing_years() {
        let ds = Dataset::from_records(vec![
            Record::new("Boston", None, "fog", 0.2),
            Record::new("Boston", Some(2018), "harbor", 1.2),
            Record::new("Boston", Some(2018), "tea", 0.7),
        ]);
        assert_eq!(year_options(&ds, Some("Boston")), [YearOption::new(2018)]);
    }

    #[test]
    fn test_default_year_is_first_option() {
        let opts = vec![YearOption::new(2019), YearOption::new(2020)];
        assert_eq!(default_year(&opts), Some(2019));
        assert_eq!(default_year(&[]), None);
    }

    #[test]
    fn test_filter_requires_place_and_year() {
        assert!(ChartFilter::from_selection(None, Some(2020), -10.0).is_none());
        assert!(ChartFilter::from_selection(Some("Boston"), None, -10.0).is_none());
        assert!(ChartFilter::from_selection(Some(""), Some(2020), -10.0).is_none());
        assert!(ChartFilter::from_selection(Some("Boston"), Some(0), -10.0).is_none());
        assert!(ChartFilter::from_selection(Some("Boston"), Some(2020), -10.0).is_some());
    }

    #[test]
    fn test_filtered_records_threshold() {
        let ds = scenario();
        let low = ChartFilter::from_selection(Some("Boston"), Some(2020), -10.0).unwrap();
        assert_eq!(words(&filtered_records(&ds, &low)), ["river", "park"]);

        let high = ChartFilter { min_pmi: 0.0, ..low };
        assert_eq!(words(&filtered_records(&ds, &high)), ["park"]);

        let none = ChartFilter { min_pmi: 100.0, ..low };
        assert!(filtered_records(&ds, &none).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = scenario();
        let filter = ChartFilter::from_selection(Some("Boston"), Some(2020), -1.0).unwrap();
        assert_eq!(filtered_records(&ds, &filter), filtered_records(&ds, &filter));
    }

    #[test]
    fn test_filter_monotonic_in_threshold() {
        let ds = scenario();
        let thresholds = [-10.0, -2.5, -2.4, 0.0, 3.1, 3.2, 10.0];
        for pair in thresholds.windows(2) {
            let loose = ChartFilter::from_selection(Some("Boston"), Some(2020), pair[0]).unwrap();
            let strict = ChartFilter { min_pmi: pair[1], ..loose };
            let loose_set = filtered_records(&ds, &loose);
            for r in filtered_records(&ds, &strict) {
                assert!(loose_set.contains(&r), "{r:?} missing at threshold {}", pair[0]);
            }
        }
    }

    #[test]
    fn test_nan_score_never_passes() {
        let ds = Dataset::from_records(vec![Record::new("Boston", Some(2020), "blank", f64::NAN)]);
        let filter = ChartFilter::from_selection(Some("Boston"), Some(2020), f64::NEG_INFINITY).unwrap();
        assert!(filtered_records(&ds, &filter).is_empty());
    }
}
