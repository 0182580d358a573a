/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset (cached per path)
///   └──────────┘
///        │
///        ├──────────────► options    content types, year bounds, top countries
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  six chart views + KPI summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod options;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::model::{ContentType, Dataset, Title};

    pub fn title(
        content_type: ContentType,
        year: i32,
        country: &str,
        listed_in: &str,
        rating: &str,
    ) -> Title {
        Title::new(
            content_type,
            NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            Some(country.to_string()),
            Some(listed_in.to_string()),
            Some(rating.to_string()),
        )
    }

    /// Three titles: two movies (2018, 2020) and one 2020 TV show.
    pub fn three_titles() -> Dataset {
        Dataset::from_titles(vec![
            title(ContentType::Movie, 2018, "India, Canada", "Drama", "PG"),
            title(ContentType::TvShow, 2020, "Unknown", "Comedy, Drama", "TV-MA"),
            title(ContentType::Movie, 2020, "Canada", "Drama", "PG"),
        ])
        .unwrap()
    }
}
