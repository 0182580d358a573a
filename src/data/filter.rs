use std::collections::BTreeSet;

use serde::Serialize;

use super::error::InvalidSelectionError;
use super::model::{ContentType, Dataset, Title};
use super::options::FilterOptions;

// ---------------------------------------------------------------------------
// Filter selection: what the user picked in the side panel
// ---------------------------------------------------------------------------

/// One interaction's worth of filter choices.
///
/// * `content_types` – empty means nothing is shown.
/// * `year_range`    – inclusive `(low, high)`.
/// * `countries`     – empty means "no country filtering", not "match nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub content_types: BTreeSet<ContentType>,
    pub year_range: (i32, i32),
    pub countries: BTreeSet<String>,
}

impl FilterSelection {
    /// Initial selection: every type, years from `start_year` (clamped into
    /// the bounds) to the latest year, no country restriction.
    pub fn defaults(options: &FilterOptions, start_year: i32) -> Self {
        let (min, max) = options.year_bounds;
        FilterSelection {
            content_types: options.content_types.iter().copied().collect(),
            year_range: (start_year.clamp(min, max), max),
            countries: BTreeSet::new(),
        }
    }

    /// Selection that keeps every title of the snapshot.
    pub fn everything(options: &FilterOptions) -> Self {
        FilterSelection {
            content_types: options.content_types.iter().copied().collect(),
            year_range: options.year_bounds,
            countries: BTreeSet::new(),
        }
    }

    pub fn toggle_content_type(&mut self, content_type: ContentType) {
        if !self.content_types.remove(&content_type) {
            self.content_types.insert(content_type);
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.countries.remove(country) {
            self.countries.insert(country.to_string());
        }
    }

    /// Set the year range, clamped into `bounds` and kept ordered.
    pub fn set_year_range(&mut self, low: i32, high: i32, bounds: (i32, i32)) {
        let low = low.clamp(bounds.0, bounds.1);
        let high = high.clamp(bounds.0, bounds.1);
        self.year_range = (low.min(high), low.max(high));
    }

    /// Reject selections that reference values outside the dataset domain.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), InvalidSelectionError> {
        if let Some(unknown) = self
            .content_types
            .iter()
            .find(|t| !dataset.content_types().contains(*t))
        {
            return Err(InvalidSelectionError::UnknownContentType(
                unknown.label().to_string(),
            ));
        }
        let (low, high) = self.year_range;
        if low > high {
            return Err(InvalidSelectionError::InvertedYearRange { low, high });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// A title that passed the filters, with the country tokens it carries
/// downstream (all of them, or only the selected ones when a country filter
/// is active).
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTitle<'a> {
    pub title: &'a Title,
    pub countries: Vec<&'a str>,
}

/// The subset of a dataset matching one selection. Each source title
/// appears at most once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView<'a> {
    rows: Vec<FilteredTitle<'a>>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[FilteredTitle<'a>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply a selection to a dataset.
///
/// A title passes when its type is selected, its `year_added` lies within
/// the inclusive year range and, if any countries are selected, at least
/// one of its country tokens is among them. Non-matching country tokens
/// are dropped from the row; a title matching several selected countries
/// still yields a single row.
pub fn apply<'a>(
    dataset: &'a Dataset,
    selection: &FilterSelection,
) -> Result<FilteredView<'a>, InvalidSelectionError> {
    selection.validate(dataset)?;
    let (low, high) = selection.year_range;

    let rows = dataset
        .titles()
        .iter()
        .filter(|t| selection.content_types.contains(&t.content_type))
        .filter(|t| (low..=high).contains(&t.year_added))
        .filter_map(|t| {
            let countries: Vec<&str> = t
                .countries
                .iter()
                .map(String::as_str)
                .filter(|c| selection.countries.is_empty() || selection.countries.contains(*c))
                .collect();
            if countries.is_empty() {
                None
            } else {
                Some(FilteredTitle {
                    title: t,
                    countries,
                })
            }
        })
        .collect();

    Ok(FilteredView { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{three_titles, title};
    use crate::data::options::derive_options;

    fn selection(types: &[ContentType], years: (i32, i32), countries: &[&str]) -> FilterSelection {
        FilterSelection {
            content_types: types.iter().copied().collect(),
            year_range: years,
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn movies_without_country_filter() {
        let ds = three_titles();
        let view = apply(&ds, &selection(&[ContentType::Movie], (2018, 2020), &[])).unwrap();

        let rows: Vec<&Title> = view.rows().iter().map(|r| r.title).collect();
        assert_eq!(rows, vec![&ds.titles()[0], &ds.titles()[2]]);
        // Without a country filter every token is carried along.
        assert_eq!(view.rows()[0].countries, vec!["India", "Canada"]);
    }

    #[test]
    fn country_filter_keeps_only_matching_tokens() {
        let ds = three_titles();
        let view = apply(
            &ds,
            &selection(&[ContentType::Movie], (2018, 2020), &["Canada"]),
        )
        .unwrap();

        assert_eq!(view.len(), 2);
        for row in view.rows() {
            assert_eq!(row.countries, vec!["Canada"]);
        }
    }

    #[test]
    fn title_matching_several_countries_is_one_row() {
        let ds = three_titles();
        let view = apply(
            &ds,
            &selection(&[ContentType::Movie], (2018, 2018), &["India", "Canada"]),
        )
        .unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].countries, vec!["India", "Canada"]);
    }

    #[test]
    fn empty_type_selection_matches_nothing() {
        let ds = three_titles();
        let view = apply(&ds, &selection(&[], (2018, 2020), &[])).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn year_range_is_inclusive() {
        let ds = three_titles();
        let all = [ContentType::Movie, ContentType::TvShow];
        assert_eq!(apply(&ds, &selection(&all, (2020, 2020), &[])).unwrap().len(), 2);
        assert_eq!(apply(&ds, &selection(&all, (2019, 2019), &[])).unwrap().len(), 0);
    }

    #[test]
    fn unknown_country_option_selects_titles_without_country() {
        let ds = three_titles();
        let all = [ContentType::Movie, ContentType::TvShow];
        let view = apply(&ds, &selection(&all, (2018, 2020), &["Unknown"])).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].title.content_type, ContentType::TvShow);
    }

    #[test]
    fn rejects_type_outside_domain() {
        let ds = Dataset::from_titles(vec![title(ContentType::Movie, 2019, "Chile", "Dramas", "R")])
            .unwrap();
        let err = apply(&ds, &selection(&[ContentType::TvShow], (2019, 2019), &[])).unwrap_err();
        assert_eq!(
            err,
            InvalidSelectionError::UnknownContentType("TV Show".to_string())
        );
    }

    #[test]
    fn rejects_inverted_years() {
        let ds = three_titles();
        let err = apply(&ds, &selection(&[ContentType::Movie], (2020, 2018), &[])).unwrap_err();
        assert_eq!(
            err,
            InvalidSelectionError::InvertedYearRange {
                low: 2020,
                high: 2018
            }
        );
    }

    #[test]
    fn output_is_a_subset_and_idempotent() {
        let ds = three_titles();
        let sel = selection(
            &[ContentType::Movie, ContentType::TvShow],
            (2018, 2020),
            &["Canada", "Unknown"],
        );
        let first = apply(&ds, &sel).unwrap();
        let second = apply(&ds, &sel).unwrap();
        assert_eq!(first, second);

        for row in first.rows() {
            assert!(ds.titles().iter().any(|t| std::ptr::eq(t, row.title)));
            for c in &row.countries {
                assert!(row.title.countries.iter().any(|own| own == c));
            }
        }
    }

    #[test]
    fn defaults_clamp_start_year() {
        let opts = derive_options(&three_titles(), 30);
        let sel = FilterSelection::defaults(&opts, 2015);
        assert_eq!(sel.year_range, (2018, 2020));
        assert_eq!(sel.content_types.len(), 2);
        assert!(sel.countries.is_empty());

        let sel = FilterSelection::defaults(&opts, 2019);
        assert_eq!(sel.year_range, (2019, 2020));
    }

    #[test]
    fn year_range_setter_clamps_and_orders() {
        let opts = derive_options(&three_titles(), 30);
        let mut sel = FilterSelection::everything(&opts);
        sel.set_year_range(2025, 2000, opts.year_bounds);
        assert_eq!(sel.year_range, (2018, 2020));
    }

    #[test]
    fn toggles_add_and_remove() {
        let opts = derive_options(&three_titles(), 30);
        let mut sel = FilterSelection::everything(&opts);
        sel.toggle_content_type(ContentType::Movie);
        assert!(!sel.content_types.contains(&ContentType::Movie));
        sel.toggle_content_type(ContentType::Movie);
        assert!(sel.content_types.contains(&ContentType::Movie));

        sel.toggle_country("India");
        assert!(sel.countries.contains("India"));
        sel.toggle_country("India");
        assert!(sel.countries.is_empty());
    }
}
