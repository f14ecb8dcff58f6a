use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// First identifier, matching the IEEE-CIS test split.
const FIRST_ID: i64 = 3_663_549;
const FRAUD_RATE: f64 = 0.035;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Row {
    id: i64,
    amount: f64,
    product: &'static str,
    card: &'static str,
    prediction: f64,
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    const PRODUCTS: [&str; 5] = ["W", "C", "R", "H", "S"];
    const CARDS: [&str; 4] = ["visa", "mastercard", "american express", "discover"];

    (0..n)
        .map(|i| {
            let fraud = rng.next_f64() < FRAUD_RATE;
            // Log-normal-ish amounts; fraud skews larger.
            let base = (rng.next_f64() * 6.0).exp() + 1.0;
            let amount = if fraud { base * 2.5 } else { base };
            Row {
                id: FIRST_ID + i as i64,
                amount: (amount * 100.0).round() / 100.0,
                product: rng.pick(&PRODUCTS),
                card: rng.pick(&CARDS),
                prediction: if fraud { 1.0 } else { 0.0 },
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "TransactionID",
        "TransactionAmt",
        "ProductCD",
        "card4",
        "isFraud_prediction",
    ])?;
    for row in rows {
        writer.write_record([
            row.id.to_string(),
            format!("{:.2}", row.amount),
            row.product.to_string(),
            row.card.to_string(),
            format!("{:.1}", row.prediction),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("TransactionID", DataType::Int64, false),
        Field::new("TransactionAmt", DataType::Float64, false),
        Field::new("ProductCD", DataType::Utf8, false),
        Field::new("card4", DataType::Utf8, false),
        Field::new("isFraud_prediction", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.amount))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.product))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.card))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.prediction))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// `generate_sample [OUT] [ROWS]` – OUT defaults to `predictions.csv`.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "predictions.csv".to_string());
    let n: usize = match args.next() {
        Some(v) => v.parse().with_context(|| format!("invalid row count {v:?}"))?,
        None => 5_000,
    };

    let mut rng = SimpleRng::new(42);
    let rows = generate(n, &mut rng);
    let fraud = rows.iter().filter(|r| r.prediction == 1.0).count();

    let path = Path::new(&output);
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(path, &rows)?;
    } else {
        write_csv(path, &rows)?;
    }

    log::info!("Wrote {n} predictions ({fraud} fraudulent) to {output}");
    println!("Wrote {n} predictions ({fraud} fraudulent) to {output}");
    Ok(())
}
