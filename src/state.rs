use std::sync::Arc;

use crate::chart::ChartFigure;
use crate::data::filter::{default_year, year_options};
use crate::data::model::{Dataset, Year, YearOption};

// ---------------------------------------------------------------------------
// Selection – the three user inputs
// ---------------------------------------------------------------------------

/// What the user has picked. Lives only as long as its [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub placename: Option<String>,
    pub year: Option<Year>,
    pub min_pmi: f64,
}

impl Selection {
    pub fn new(min_pmi: f64) -> Self {
        Self {
            placename: None,
            year: None,
            min_pmi,
        }
    }
}

// ---------------------------------------------------------------------------
// Dependency graph
// ---------------------------------------------------------------------------

/// A value in the dependency graph: either a user input or a derived output.
/// `Year` is both: the user picks it, and it is reset when the year options
/// are re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Placename,
    Year,
    MinPmi,
    YearOptions,
    Chart,
}

/// A derivation recomputes `output` whenever one of `inputs` changed.
struct Derivation {
    inputs: &'static [Node],
    output: Node,
    run: fn(&mut Session),
}

/// All derivations, in topological order: an output only feeds derivations
/// listed after it, so a single pass settles the graph.
static DERIVATIONS: [Derivation; 3] = [
    Derivation {
        inputs: &[Node::Placename],
        output: Node::YearOptions,
        run: Session::derive_year_options,
    },
    Derivation {
        inputs: &[Node::YearOptions],
        output: Node::Year,
        run: Session::derive_default_year,
    },
    Derivation {
        inputs: &[Node::Year, Node::Placename, Node::MinPmi],
        output: Node::Chart,
        run: Session::derive_chart,
    },
];

// ---------------------------------------------------------------------------
// Session – one user's view over the shared dataset
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is shared read-only; everything else belongs to this session
/// alone. Setters only propagate when the value actually changed and return
/// the derived nodes they recomputed, in the order they ran.
pub struct Session {
    dataset: Arc<Dataset>,
    selection: Selection,
    year_options: Vec<YearOption>,
    chart: ChartFigure,
}

impl Session {
    /// Start a session with nothing selected and run every derivation once.
    pub fn new(dataset: Arc<Dataset>, default_min_pmi: f64) -> Self {
        let mut session = Self {
            dataset,
            selection: Selection::new(default_min_pmi),
            year_options: Vec::new(),
            chart: ChartFigure::Blank,
        };
        session.propagate(&[Node::Placename, Node::Year, Node::MinPmi]);
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Options of the place selector.
    pub fn placenames(&self) -> &[String] {
        self.dataset.placenames()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn year_options(&self) -> &[YearOption] {
        &self.year_options
    }

    pub fn chart(&self) -> &ChartFigure {
        &self.chart
    }

    /// Select a place (or clear the selection with `None`).
    pub fn set_placename(&mut self, placename: Option<String>) -> Vec<Node> {
        if self.selection.placename == placename {
            return Vec::new();
        }
        self.selection.placename = placename;
        self.propagate(&[Node::Placename])
    }

    /// Pick a year from the current options. Years not on offer are ignored.
    pub fn set_year(&mut self, year: Option<Year>) -> Vec<Node> {
        if self.selection.year == year {
            return Vec::new();
        }
        if let Some(y) = year {
            if !self.year_options.iter().any(|opt| opt.value == y) {
                log::warn!(
                    "Ignoring year {y}: not available for {:?}",
                    self.selection.placename
                );
                return Vec::new();
            }
        }
        self.selection.year = year;
        self.propagate(&[Node::Year])
    }

    /// Change the minimum PMI. Any value is accepted.
    pub fn set_min_pmi(&mut self, min_pmi: f64) -> Vec<Node> {
        if self.selection.min_pmi.total_cmp(&min_pmi).is_eq() {
            return Vec::new();
        }
        self.selection.min_pmi = min_pmi;
        self.propagate(&[Node::MinPmi])
    }

    /// Re-run every derivation reachable from `changed`, each at most once.
    fn propagate(&mut self, changed: &[Node]) -> Vec<Node> {
        let mut dirty = changed.to_vec();
        let mut recomputed = Vec::new();
        for derivation in &DERIVATIONS {
            if derivation.inputs.iter().any(|input| dirty.contains(input)) {
                (derivation.run)(self);
                dirty.push(derivation.output);
                recomputed.push(derivation.output);
            }
        }
        recomputed
    }

    fn derive_year_options(&mut self) {
        self.year_options = year_options(&self.dataset, self.selection.placename.as_deref());
        log::debug!(
            "Year options for {:?}: {} entries",
            self.selection.placename,
            self.year_options.len()
        );
    }

    fn derive_default_year(&mut self) {
        self.selection.year = default_year(&self.year_options);
    }

    fn derive_chart(&mut self) {
        self.chart = ChartFigure::build(
            &self.dataset,
            self.selection.placename.as_deref(),
            self.selection.year,
            self.selection.min_pmi,
        );
        log::debug!(
            "Chart for {:?}/{:?} at PMI >= {}: {} bars",
            self.selection.placename,
            self.selection.year,
            self.selection.min_pmi,
            self.chart.bars().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartBar;
    use crate::data::model::Record;

    fn scenario() -> Arc<Dataset> {
        Arc::new(Dataset::from_records(vec![
            Record::new("Boston", Some(2020), "river", -2.5),
            Record::new("Boston", Some(2020), "park", 3.1),
            Record::new("Boston", Some(2019), "river", 1.0),
            Record::new("Seattle", Some(2020), "rain", 5.0),
        ]))
    }

    fn years(session: &Session) -> Vec<Year> {
        session.year_options().iter().map(|o| o.value).collect()
    }

    fn words(session: &Session) -> Vec<&str> {
        session.chart().bars().iter().map(|b| b.word.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_empty() {
        let session = Session::new(scenario(), -10.0);
        assert_eq!(session.placenames(), ["Boston", "Seattle"]);
        assert!(session.year_options().is_empty());
        assert_eq!(session.selection(), &Selection::new(-10.0));
        assert!(session.chart().is_blank());
    }

    #[test]
    fn test_boston_walkthrough() {
        let mut session = Session::new(scenario(), -10.0);

        session.set_placename(Some("Boston".into()));
        assert_eq!(years(&session), [2019, 2020]);
        assert_eq!(session.selection().year, Some(2019));
        assert_eq!(session.chart().title(), Some("PMI Scores for Boston in 2019"));
        assert_eq!(words(&session), ["river"]);

        session.set_year(Some(2020));
        assert_eq!(
            session.chart().bars(),
            [
                ChartBar { word: "river".into(), pmi: -2.5 },
                ChartBar { word: "park".into(), pmi: 3.1 },
            ]
        );

        session.set_min_pmi(0.0);
        assert_eq!(words(&session), ["park"]);
    }

    #[test]
    fn test_place_change_recomputes_whole_chain() {
        let mut session = Session::new(scenario(), -10.0);
        let ran = session.set_placename(Some("Boston".into()));
        assert_eq!(ran, [Node::YearOptions, Node::Year, Node::Chart]);
    }

    #[test]
    fn test_threshold_change_only_recomputes_chart() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));
        session.set_year(Some(2020));

        let ran = session.set_min_pmi(-1.0);
        assert_eq!(ran, [Node::Chart]);
        assert_eq!(session.selection().year, Some(2020));
        assert_eq!(years(&session), [2019, 2020]);
    }

    #[test]
    fn test_manual_year_is_not_overridden() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));

        let ran = session.set_year(Some(2020));
        assert_eq!(ran, [Node::Chart]);
        session.set_min_pmi(1.5);
        assert_eq!(session.selection().year, Some(2020));
    }

    #[test]
    fn test_unchanged_inputs_do_nothing() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));
        session.set_year(Some(2020));

        assert!(session.set_placename(Some("Boston".into())).is_empty());
        assert!(session.set_year(Some(2020)).is_empty());
        assert!(session.set_min_pmi(-10.0).is_empty());
        assert_eq!(session.selection().year, Some(2020));
    }

    #[test]
    fn test_switching_place_resets_year() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));
        session.set_year(Some(2020));

        session.set_placename(Some("Seattle".into()));
        assert_eq!(years(&session), [2020]);
        assert_eq!(session.selection().year, Some(2020));
        assert_eq!(words(&session), ["rain"]);

        session.set_placename(Some("Boston".into()));
        assert_eq!(session.selection().year, Some(2019));
    }

    #[test]
    fn test_clearing_place_blanks_everything() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));

        session.set_placename(None);
        assert!(session.year_options().is_empty());
        assert_eq!(session.selection().year, None);
        assert!(session.chart().is_blank());
    }

    #[test]
    fn test_unknown_year_ignored() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Seattle".into()));

        assert!(session.set_year(Some(2019)).is_empty());
        assert_eq!(session.selection().year, Some(2020));
    }

    #[test]
    fn test_threshold_above_everything_gives_zero_bars() {
        let mut session = Session::new(scenario(), -10.0);
        session.set_placename(Some("Boston".into()));
        session.set_min_pmi(1_000.0);
        assert!(!session.chart().is_blank());
        assert!(session.chart().bars().is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let dataset = scenario();
        let mut first = Session::new(Arc::clone(&dataset), -10.0);
        let second = Session::new(Arc::clone(&dataset), -10.0);

        first.set_placename(Some("Boston".into()));
        assert_eq!(first.selection().year, Some(2019));
        assert_eq!(second.selection(), &Selection::new(-10.0));
        assert!(second.chart().is_blank());
    }

    #[test]
    fn test_derivations_are_topologically_ordered() {
        for (i, derivation) in DERIVATIONS.iter().enumerate() {
            for later in &DERIVATIONS[i..] {
                assert!(
                    !derivation.inputs.contains(&later.output),
                    "{:?} is read before it is derived",
                    later.output
                );
            }
        }
    }
}
