//! Writes a deterministic synthetic catalog as `sample_titles.csv` and
//! `sample_titles.parquet`, in the same layout as the real export.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 2500;
const HEADER: [&str; 7] = [
    "show_id",
    "type",
    "title",
    "date_added",
    "country",
    "listed_in",
    "rating",
];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Weighted so the top-country ranking has a clear shape.
const COUNTRIES: [(&str, u32); 12] = [
    ("United States", 30),
    ("India", 12),
    ("United Kingdom", 8),
    ("Japan", 6),
    ("South Korea", 6),
    ("Canada", 5),
    ("Spain", 4),
    ("France", 4),
    ("Mexico", 3),
    ("Egypt", 2),
    ("Nigeria", 2),
    ("Brazil", 2),
];

const MOVIE_GENRES: [&str; 10] = [
    "Dramas",
    "Comedies",
    "International Movies",
    "Documentaries",
    "Action & Adventure",
    "Independent Movies",
    "Thrillers",
    "Romantic Movies",
    "Horror Movies",
    "Children & Family Movies",
];

const TV_GENRES: [&str; 8] = [
    "International TV Shows",
    "TV Dramas",
    "TV Comedies",
    "Crime TV Shows",
    "Kids' TV",
    "Docuseries",
    "Reality TV",
    "Anime Series",
];

const MOVIE_RATINGS: [&str; 6] = ["TV-MA", "TV-14", "R", "PG-13", "PG", "TV-PG"];
const TV_RATINGS: [&str; 5] = ["TV-MA", "TV-14", "TV-PG", "TV-Y7", "TV-Y"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn pick_weighted(&mut self, items: &[(&'static str, u32)]) -> &'static str {
        let total: u32 = items.iter().map(|(_, w)| w).sum();
        let mut roll = (self.next_u64() % total as u64) as u32;
        for &(item, weight) in items {
            if roll < weight {
                return item;
            }
            roll -= weight;
        }
        items[items.len() - 1].0
    }

    /// 1..=max distinct picks, joined the way the catalog joins lists.
    fn pick_list(&mut self, max: usize, mut pick: impl FnMut(&mut Self) -> &'static str) -> String {
        let n = 1 + self.below(max);
        let mut chosen: Vec<&str> = Vec::with_capacity(n);
        for _ in 0..n {
            let item = pick(self);
            if !chosen.contains(&item) {
                chosen.push(item);
            }
        }
        chosen.join(", ")
    }
}

/// One generated row; `None` cells are written empty / as nulls.
struct SampleRow {
    show_id: String,
    content_type: &'static str,
    title: String,
    date_added: Option<String>,
    country: Option<String>,
    listed_in: String,
    rating: Option<&'static str>,
}

fn generate_row(i: usize, rng: &mut SimpleRng) -> SampleRow {
    let is_movie = rng.chance(70);

    // Catalog growth: later years get more additions.
    let year = 2008 + (rng.below(14 * 14) as f64).sqrt() as i32;
    let date_added = if rng.chance(1) {
        None
    } else {
        let month = rng.pick(&MONTHS);
        let day = 1 + rng.below(28);
        // A few dates carry the stray leading space found in real exports.
        let pad = if rng.chance(5) { " " } else { "" };
        Some(format!("{pad}{month} {day}, {year}"))
    };

    let country = if rng.chance(8) {
        None
    } else {
        Some(rng.pick_list(3, |r| r.pick_weighted(&COUNTRIES)))
    };

    let listed_in = if is_movie {
        rng.pick_list(3, |r| r.pick(&MOVIE_GENRES))
    } else {
        rng.pick_list(3, |r| r.pick(&TV_GENRES))
    };

    let rating = if rng.chance(2) {
        None
    } else if is_movie {
        Some(rng.pick(&MOVIE_RATINGS))
    } else {
        Some(rng.pick(&TV_RATINGS))
    };

    SampleRow {
        show_id: format!("s{}", i + 1),
        content_type: if is_movie { "Movie" } else { "TV Show" },
        title: format!("Sample Title {}", i + 1),
        date_added,
        country,
        listed_in,
        rating,
    }
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.show_id.as_str(),
            row.content_type,
            row.title.as_str(),
            row.date_added.as_deref().unwrap_or(""),
            row.country.as_deref().unwrap_or(""),
            row.listed_in.as_str(),
            row.rating.unwrap_or(""),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.show_id.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.content_type))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.title.as_str()))),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.date_added.as_deref()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.country.as_deref()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.listed_in.as_str()))),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.rating).collect::<Vec<_>>(),
        )),
    ];
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns)
        .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<SampleRow> = (0..ROWS).map(|i| generate_row(i, &mut rng)).collect();

    let csv_path = "sample_titles.csv";
    let parquet_path = "sample_titles.parquet";
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    println!("Wrote {} titles to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
