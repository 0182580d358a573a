use super::aggregate::value_counts;
use super::model::{ContentType, Dataset, UNKNOWN};

/// How many countries the country filter offers before "Unknown".
pub const DEFAULT_COUNTRY_OPTIONS: usize = 30;

// ---------------------------------------------------------------------------
// Filter options: the domain every selection is built from
// ---------------------------------------------------------------------------

/// Candidate values for the filter widgets, computed once per snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct content types, ordered by label.
    pub content_types: Vec<ContentType>,
    /// Inclusive `(min, max)` of `year_added` over the full dataset.
    pub year_bounds: (i32, i32),
    /// Most frequent country tokens, then "Unknown" if it was not among them.
    pub countries: Vec<String>,
}

/// Derive the filter domain from the full (unfiltered) dataset.
pub fn derive_options(dataset: &Dataset, n_countries: usize) -> FilterOptions {
    let mut content_types: Vec<ContentType> = dataset.content_types().iter().copied().collect();
    content_types.sort_by_key(|t| t.label());

    FilterOptions {
        content_types,
        year_bounds: dataset.year_bounds(),
        countries: top_countries(dataset, n_countries),
    }
}

/// The `n` most frequent country tokens (ties in first-seen order), with
/// "Unknown" appended when it did not make the cut.
pub fn top_countries(dataset: &Dataset, n: usize) -> Vec<String> {
    let tokens = dataset
        .titles()
        .iter()
        .flat_map(|t| t.countries.iter().map(String::as_str));

    let mut top: Vec<String> = value_counts(tokens)
        .into_iter()
        .take(n)
        .map(|(country, _)| country.to_string())
        .collect();
    if !top.iter().any(|c| c == UNKNOWN) {
        top.push(UNKNOWN.to_string());
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{three_titles, title};

    #[test]
    fn options_from_three_titles() {
        let opts = derive_options(&three_titles(), DEFAULT_COUNTRY_OPTIONS);
        assert_eq!(
            opts.content_types,
            vec![ContentType::Movie, ContentType::TvShow]
        );
        assert_eq!(opts.year_bounds, (2018, 2020));
        // Canada ×2, India ×1, Unknown ×1 (India seen first).
        assert_eq!(opts.countries, vec!["Canada", "India", "Unknown"]);
    }

    #[test]
    fn unknown_is_appended_when_cut() {
        let ds = Dataset::from_titles(vec![
            title(ContentType::Movie, 2019, "France", "Dramas", "R"),
            title(ContentType::Movie, 2019, "France, Spain", "Dramas", "R"),
            title(ContentType::Movie, 2019, "Unknown", "Dramas", "R"),
        ])
        .unwrap();
        assert_eq!(top_countries(&ds, 1), vec!["France", "Unknown"]);
        assert_eq!(top_countries(&ds, 2), vec!["France", "Spain", "Unknown"]);
        assert_eq!(top_countries(&ds, 0), vec!["Unknown"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let ds = Dataset::from_titles(vec![
            title(ContentType::Movie, 2019, "Peru, Chile", "Dramas", "R"),
            title(ContentType::Movie, 2019, "Chile, Peru, Brazil", "Dramas", "R"),
        ])
        .unwrap();
        assert_eq!(top_countries(&ds, 3), vec!["Peru", "Chile", "Brazil", "Unknown"]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let ds = three_titles();
        assert_eq!(derive_options(&ds, 5), derive_options(&ds, 5));
    }
}
