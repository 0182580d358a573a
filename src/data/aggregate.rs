use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::Serialize;

use super::error::EmptyAggregationError;
use super::filter::FilteredView;
use super::model::{ContentType, UNKNOWN};

pub const DEFAULT_TOP_COUNTRIES: usize = 10;
pub const DEFAULT_TOP_GENRES: usize = 12;

// ---------------------------------------------------------------------------
// Counting helper
// ---------------------------------------------------------------------------

/// Count occurrences, most frequent first. Ties keep first-seen order.
pub fn value_counts<K>(values: impl IntoIterator<Item = K>) -> Vec<(K, usize)>
where
    K: Eq + Hash + Copy,
{
    let mut counts = first_seen_counts(values);
    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Count occurrences in first-seen order.
fn first_seen_counts<K>(values: impl IntoIterator<Item = K>) -> Vec<(K, usize)>
where
    K: Eq + Hash + Copy,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for v in values {
        match slots.get(&v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slots.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }
    counts
}

fn top_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    value_counts(tokens.into_iter().filter(|t| *t != UNKNOWN))
        .into_iter()
        .take(n)
        .map(|(t, c)| (t.to_string(), c))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart views
// ---------------------------------------------------------------------------

/// Titles per content type, most frequent first.
pub fn type_counts(view: &FilteredView<'_>) -> Vec<(ContentType, usize)> {
    value_counts(view.rows().iter().map(|r| r.title.content_type))
}

/// Titles per `year_added`, oldest year first.
pub fn yearly_growth(view: &FilteredView<'_>) -> Vec<(i32, usize)> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for row in view.rows() {
        *per_year.entry(row.title.year_added).or_default() += 1;
    }
    per_year.into_iter().collect()
}

/// The `n` most frequent countries, "Unknown" excluded. Counts the country
/// tokens each filtered row carries.
pub fn top_countries(view: &FilteredView<'_>, n: usize) -> Vec<(String, usize)> {
    top_tokens(
        view.rows().iter().flat_map(|r| r.countries.iter().copied()),
        n,
    )
}

/// The `n` most frequent genres, "Unknown" excluded.
pub fn top_genres(view: &FilteredView<'_>, n: usize) -> Vec<(String, usize)> {
    top_tokens(
        view.rows()
            .iter()
            .flat_map(|r| r.title.genres.iter().map(String::as_str)),
        n,
    )
}

/// Titles per rating, in the order ratings are first met.
pub fn rating_distribution(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    first_seen_counts(view.rows().iter().map(|r| r.title.rating.as_str()))
        .into_iter()
        .map(|(r, c)| (r.to_string(), c))
        .collect()
}

/// One cell of the year × type mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTypeCount {
    pub year_added: i32,
    pub content_type: ContentType,
    pub titles: usize,
}

/// Titles per (`year_added`, type) pair. Only combinations present in the
/// view are listed; ordered by year, then type.
pub fn year_type_mix(view: &FilteredView<'_>) -> Vec<YearTypeCount> {
    let mut cells: BTreeMap<(i32, ContentType), usize> = BTreeMap::new();
    for row in view.rows() {
        *cells
            .entry((row.title.year_added, row.title.content_type))
            .or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((year_added, content_type), titles)| YearTypeCount {
            year_added,
            content_type,
            titles,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KpiSummary {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,
    /// `(min, max)` of `year_added`; `None` for an empty view.
    pub year_span: Option<(i32, i32)>,
}

impl KpiSummary {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let mut kpi = KpiSummary {
            total: view.len(),
            ..KpiSummary::default()
        };
        for row in view.rows() {
            match row.title.content_type {
                ContentType::Movie => kpi.movies += 1,
                ContentType::TvShow => kpi.tv_shows += 1,
            }
            let y = row.title.year_added;
            kpi.year_span = Some(match kpi.year_span {
                None => (y, y),
                Some((lo, hi)) => (lo.min(y), hi.max(y)),
            });
        }
        kpi
    }

    /// The covered year span, for consumers that need one.
    pub fn years_covered(&self) -> Result<(i32, i32), EmptyAggregationError> {
        self.year_span.ok_or(EmptyAggregationError)
    }
}

// ---------------------------------------------------------------------------
// All views for one interaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateLimits {
    pub top_countries: usize,
    pub top_genres: usize,
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self {
            top_countries: DEFAULT_TOP_COUNTRIES,
            top_genres: DEFAULT_TOP_GENRES,
        }
    }
}

/// Everything the dashboard draws for one filtered view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardViews {
    pub kpis: KpiSummary,
    pub type_counts: Vec<(ContentType, usize)>,
    pub yearly_growth: Vec<(i32, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub top_genres: Vec<(String, usize)>,
    pub rating_distribution: Vec<(String, usize)>,
    pub year_type_mix: Vec<YearTypeCount>,
}

impl DashboardViews {
    pub fn compute(view: &FilteredView<'_>, limits: &AggregateLimits) -> Self {
        DashboardViews {
            kpis: KpiSummary::compute(view),
            type_counts: type_counts(view),
            yearly_growth: yearly_growth(view),
            top_countries: top_countries(view, limits.top_countries),
            top_genres: top_genres(view, limits.top_genres),
            rating_distribution: rating_distribution(view),
            year_type_mix: year_type_mix(view),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.total == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply, FilterSelection};
    use crate::data::fixtures::{three_titles, title};
    use crate::data::model::Dataset;

    fn select(types: &[ContentType], countries: &[&str]) -> FilterSelection {
        FilterSelection {
            content_types: types.iter().copied().collect(),
            year_range: (2018, 2020),
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn movie_views_over_three_titles() {
        let ds = three_titles();
        let view = apply(&ds, &select(&[ContentType::Movie], &[])).unwrap();

        assert_eq!(type_counts(&view), vec![(ContentType::Movie, 2)]);
        assert_eq!(top_genres(&view, 12), vec![("Drama".to_string(), 2)]);
        assert_eq!(yearly_growth(&view), vec![(2018, 1), (2020, 1)]);
        assert_eq!(
            top_countries(&view, 10),
            vec![("Canada".to_string(), 2), ("India".to_string(), 1)]
        );
        assert_eq!(rating_distribution(&view), vec![("PG".to_string(), 2)]);
    }

    #[test]
    fn country_filter_drops_other_tokens_from_country_view() {
        let ds = three_titles();
        let view = apply(&ds, &select(&[ContentType::Movie], &["Canada"])).unwrap();
        assert_eq!(top_countries(&view, 10), vec![("Canada".to_string(), 2)]);
        assert_eq!(KpiSummary::compute(&view).total, 2);
    }

    #[test]
    fn unknown_never_reaches_top_n() {
        let ds = three_titles();
        let all = [ContentType::Movie, ContentType::TvShow];
        let view = apply(&ds, &select(&all, &[])).unwrap();

        let countries = top_countries(&view, 10);
        assert!(countries.iter().all(|(c, _)| c != UNKNOWN));
        assert_eq!(
            top_genres(&view, 12),
            vec![("Drama".to_string(), 3), ("Comedy".to_string(), 1)]
        );
        assert!(top_countries(&view, 1).len() <= 1);
        assert!(top_genres(&view, 1).len() <= 1);
    }

    #[test]
    fn ratings_keep_first_seen_order() {
        let ds = Dataset::from_titles(vec![
            title(ContentType::Movie, 2019, "Chile", "Dramas", "TV-MA"),
            title(ContentType::Movie, 2019, "Chile", "Dramas", "PG"),
            title(ContentType::Movie, 2019, "Chile", "Dramas", "PG"),
            title(ContentType::Movie, 2019, "Chile", "Dramas", "Unknown"),
        ])
        .unwrap();
        let view = apply(&ds, &select(&[ContentType::Movie], &[])).unwrap();
        assert_eq!(
            rating_distribution(&view),
            vec![
                ("TV-MA".to_string(), 1),
                ("PG".to_string(), 2),
                ("Unknown".to_string(), 1)
            ]
        );
    }

    #[test]
    fn year_type_mix_has_only_present_pairs() {
        let ds = three_titles();
        let all = [ContentType::Movie, ContentType::TvShow];
        let view = apply(&ds, &select(&all, &[])).unwrap();
        assert_eq!(
            year_type_mix(&view),
            vec![
                YearTypeCount {
                    year_added: 2018,
                    content_type: ContentType::Movie,
                    titles: 1
                },
                YearTypeCount {
                    year_added: 2020,
                    content_type: ContentType::Movie,
                    titles: 1
                },
                YearTypeCount {
                    year_added: 2020,
                    content_type: ContentType::TvShow,
                    titles: 1
                },
            ]
        );
    }

    #[test]
    fn kpis_over_full_view() {
        let ds = three_titles();
        let all = [ContentType::Movie, ContentType::TvShow];
        let view = apply(&ds, &select(&all, &[])).unwrap();
        let kpi = KpiSummary::compute(&view);
        assert_eq!(
            kpi,
            KpiSummary {
                total: 3,
                movies: 2,
                tv_shows: 1,
                year_span: Some((2018, 2020)),
            }
        );
        assert_eq!(kpi.years_covered(), Ok((2018, 2020)));
    }

    #[test]
    fn empty_view_gives_empty_aggregates() {
        let ds = three_titles();
        let view = apply(&ds, &select(&[], &[])).unwrap();
        let views = DashboardViews::compute(&view, &AggregateLimits::default());

        assert!(views.is_empty());
        assert_eq!(views.kpis.total, 0);
        assert_eq!(views.kpis.year_span, None);
        assert_eq!(views.kpis.years_covered(), Err(EmptyAggregationError));
        assert!(views.yearly_growth.is_empty());
        assert!(views.type_counts.is_empty());
        assert!(views.top_countries.is_empty());
        assert!(views.year_type_mix.is_empty());
    }

    #[test]
    fn value_counts_breaks_ties_by_first_seen() {
        let counts = value_counts(["b", "a", "a", "c", "b", "d"]);
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn filtering_does_not_move_option_bounds() {
        let ds = three_titles();
        let before = ds.year_bounds();
        let view = apply(&ds, &select(&[ContentType::TvShow], &[])).unwrap();
        let _ = DashboardViews::compute(&view, &AggregateLimits::default());
        assert_eq!(ds.year_bounds(), before);

        let types: BTreeSet<ContentType> = view
            .rows()
            .iter()
            .map(|r| r.title.content_type)
            .collect();
        assert_eq!(types.into_iter().collect::<Vec<_>>(), vec![ContentType::TvShow]);
    }
}
