use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::error::DataLoadError;

/// Placeholder for missing `country`, `listed_in` and `rating` cells.
pub const UNKNOWN: &str = "Unknown";

/// Separator of the multi-valued `country` and `listed_in` fields.
pub const TOKEN_DELIMITER: &str = ", ";

// ---------------------------------------------------------------------------
// ContentType – the `type` column
// ---------------------------------------------------------------------------

/// Kind of catalog entry. Variant order matches the lexicographic order of
/// the labels, so `Ord` sorts the same way the labels do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContentType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    /// Label as it appears in the source data.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }

    /// Recognise a raw `type` cell. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|t| t.label() == raw)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Title – one cleaned catalog row
// ---------------------------------------------------------------------------

/// A single catalog entry after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub content_type: ContentType,
    pub date_added: NaiveDate,
    /// Always `date_added.year()`.
    pub year_added: i32,
    /// Comma-joined country list as found in the source.
    pub country: String,
    /// Comma-joined genre list as found in the source.
    pub listed_in: String,
    pub rating: String,
    /// `country` split on [`TOKEN_DELIMITER`], computed once.
    pub countries: Vec<String>,
    /// `listed_in` split on [`TOKEN_DELIMITER`], computed once.
    pub genres: Vec<String>,
}

impl Title {
    /// Build a title, defaulting missing multi-valued / rating cells to
    /// [`UNKNOWN`] and deriving the year and token lists.
    pub fn new(
        content_type: ContentType,
        date_added: NaiveDate,
        country: Option<String>,
        listed_in: Option<String>,
        rating: Option<String>,
    ) -> Self {
        let country = country.unwrap_or_else(|| UNKNOWN.to_string());
        let listed_in = listed_in.unwrap_or_else(|| UNKNOWN.to_string());
        let countries = split_tokens(&country);
        let genres = split_tokens(&listed_in);
        Title {
            content_type,
            date_added,
            year_added: date_added.year(),
            country,
            listed_in,
            rating: rating.unwrap_or_else(|| UNKNOWN.to_string()),
            countries,
            genres,
        }
    }
}

/// Split a multi-valued cell exactly on [`TOKEN_DELIMITER`].
pub fn split_tokens(field: &str) -> Vec<String> {
    field.split(TOKEN_DELIMITER).map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded snapshot
// ---------------------------------------------------------------------------

/// An immutable, non-empty snapshot of cleaned titles.
#[derive(Debug, Clone)]
pub struct Dataset {
    titles: Vec<Title>,
    content_types: BTreeSet<ContentType>,
    year_min: i32,
    year_max: i32,
}

impl Dataset {
    /// Build the snapshot and its column summaries. An empty title list is
    /// rejected: year bounds would be undefined.
    pub fn from_titles(titles: Vec<Title>) -> Result<Self, DataLoadError> {
        let mut content_types = BTreeSet::new();
        let mut bounds: Option<(i32, i32)> = None;

        for t in &titles {
            content_types.insert(t.content_type);
            bounds = Some(match bounds {
                None => (t.year_added, t.year_added),
                Some((lo, hi)) => (lo.min(t.year_added), hi.max(t.year_added)),
            });
        }

        let (year_min, year_max) = bounds.ok_or(DataLoadError::NoTitles)?;
        Ok(Dataset {
            titles,
            content_types,
            year_min,
            year_max,
        })
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    /// Distinct content types present, in label order.
    pub fn content_types(&self) -> &BTreeSet<ContentType> {
        &self.content_types
    }

    /// Inclusive `(min, max)` of `year_added` over every title.
    pub fn year_bounds(&self) -> (i32, i32) {
        (self.year_min, self.year_max)
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Always false for a dataset built by [`Dataset::from_titles`].
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_fields_default_to_unknown() {
        let t = Title::new(ContentType::Movie, date(2019, 3, 1), None, None, None);
        assert_eq!(t.country, UNKNOWN);
        assert_eq!(t.listed_in, UNKNOWN);
        assert_eq!(t.rating, UNKNOWN);
        assert_eq!(t.countries, vec![UNKNOWN.to_string()]);
        assert_eq!(t.year_added, 2019);
    }

    #[test]
    fn tokens_split_on_comma_space_only() {
        assert_eq!(split_tokens("India, Canada"), vec!["India", "Canada"]);
        // A bare comma is not a delimiter.
        assert_eq!(split_tokens("Cambodia,"), vec!["Cambodia,"]);
        assert_eq!(split_tokens("France, "), vec!["France", ""]);
    }

    #[test]
    fn content_type_parse_and_order() {
        assert_eq!(ContentType::parse(" TV Show "), Some(ContentType::TvShow));
        assert_eq!(ContentType::parse("Podcast"), None);
        assert!(ContentType::Movie < ContentType::TvShow);
        assert!(ContentType::Movie.label() < ContentType::TvShow.label());
    }

    #[test]
    fn dataset_tracks_bounds_and_types() {
        let ds = Dataset::from_titles(vec![
            Title::new(ContentType::TvShow, date(2016, 1, 1), None, None, None),
            Title::new(ContentType::TvShow, date(2021, 5, 9), None, None, None),
            Title::new(ContentType::TvShow, date(2008, 2, 2), None, None, None),
        ])
        .unwrap();
        assert_eq!(ds.year_bounds(), (2008, 2021));
        assert_eq!(
            ds.content_types().iter().copied().collect::<Vec<_>>(),
            vec![ContentType::TvShow]
        );
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            Dataset::from_titles(Vec::new()),
            Err(DataLoadError::NoTitles)
        ));
    }
}
