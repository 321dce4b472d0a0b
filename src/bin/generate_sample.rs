//! Writes a deterministic sample PMI table as CSV and Parquet.

use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CSV_PATH: &str = "pmi_scores_by_year.csv";
const PARQUET_PATH: &str = "pmi_scores_by_year.parquet";

const PLACES: [(&str, std::ops::RangeInclusive<i64>); 5] = [
    ("Boston", 2012..=2020),
    ("Chicago", 2015..=2020),
    ("Denver", 2016..=2019),
    ("Portland", 2010..=2020),
    ("Seattle", 2014..=2020),
];

const WORDS: [&str; 24] = [
    "river", "park", "rain", "harbor", "bridge", "market", "snow", "fog", "coffee", "ferry",
    "mountain", "lake", "museum", "stadium", "festival", "traffic", "library", "garden",
    "university", "tunnel", "airport", "beach", "theater", "station",
];

/// Mirrors the pandas export: float years, empty cells for missing values.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Placename")]
    placename: String,
    #[serde(rename = "Year")]
    year: Option<f64>,
    #[serde(rename = "Word")]
    word: String,
    #[serde(rename = "PMI")]
    pmi: f64,
}

/// splitmix64
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1)
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately normal (Irwin–Hall with 12 terms)
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.unit()).sum();
        mean + std_dev * (sum - 6.0)
    }
}

fn generate_rows(rng: &mut Rng) -> Vec<Row> {
    let mut rows = Vec::new();
    for (place_idx, (place, years)) in PLACES.iter().enumerate() {
        for year in years.clone() {
            for (word_idx, word) in WORDS.iter().enumerate() {
                // Each place/year keeps roughly two thirds of the vocabulary.
                if rng.unit() < 0.33 {
                    continue;
                }
                let affinity = ((place_idx * 7 + word_idx * 3) % 11) as f64 - 5.0;
                let pmi = (rng.normal(affinity * 0.6, 1.2) * 1000.0).round() / 1000.0;
                rows.push(Row {
                    placename: place.to_string(),
                    year: Some(year as f64),
                    word: word.to_string(),
                    pmi,
                });
            }
        }
        // A row with a missing year, as produced by upstream NaN handling.
        rows.push(Row {
            placename: place.to_string(),
            year: None,
            word: "unknown".to_string(),
            pmi: 0.0,
        });
    }
    rows
}

fn write_csv(rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> anyhow::Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Placename", DataType::Utf8, false),
        Field::new("Year", DataType::Float64, true),
        Field::new("Word", DataType::Utf8, false),
        Field::new("PMI", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.placename.as_str()))),
            Arc::new(rows.iter().map(|r| r.year).collect::<Float64Array>()),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.word.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.pmi))),
        ],
    )?;

    let file = std::fs::File::create(PARQUET_PATH)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = Rng(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {} rows to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}
