use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use sentiment140_demo::data::model::{POLARITY_NEGATIVE, POLARITY_NEUTRAL, POLARITY_POSITIVE};
use sentiment140_demo::data::sentiment140::DATASET_NAME;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const SUBJECTS: [&str; 5] = ["my kindle2", "the new phone", "this weather", "work today", "that movie"];
const POSITIVE: [&str; 4] = ["is awesome", "made my day", "is so good", "rocks"];
const NEGATIVE: [&str; 4] = ["is the worst", "ruined my day", "is so bad", "sucks"];
const NEUTRAL: [&str; 3] = ["is on", "happened", "is a thing"];
const USERS: [&str; 4] = ["tpryan", "vcu451", "chadfu", "SIX15"];
const QUERIES: [&str; 3] = ["kindle2", "NO_QUERY", "weather"];

struct Tweet {
    polarity: i64,
    id: i64,
    date: String,
    query: String,
    user: String,
    text: String,
}

fn generate_tweets(rng: &mut SimpleRng, count: usize, first_id: i64) -> Vec<Tweet> {
    let polarities = [POLARITY_NEGATIVE, POLARITY_NEUTRAL, POLARITY_POSITIVE];
    (0..count)
        .map(|i| {
            let polarity = *rng.pick(&polarities);
            let predicate = match polarity {
                POLARITY_POSITIVE => rng.pick(&POSITIVE),
                POLARITY_NEGATIVE => rng.pick(&NEGATIVE),
                _ => rng.pick(&NEUTRAL),
            };
            let subject = rng.pick(&SUBJECTS);
            Tweet {
                polarity,
                id: first_id + i as i64,
                date: format!("Mon May 11 03:{:02}:{:02} UTC 2009", i / 60 % 60, i % 60),
                query: rng.pick(&QUERIES).to_string(),
                user: rng.pick(&USERS).to_string(),
                text: format!("{subject} {predicate}"),
            }
        })
        .collect()
}

/// Upstream layout: no header, `polarity, id, date, query, user, text`.
fn write_csv(path: &Path, tweets: &[Tweet]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for t in tweets {
        writer.write_record([
            t.polarity.to_string(),
            t.id.to_string(),
            t.date.clone(),
            t.query.clone(),
            t.user.clone(),
            t.text.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, tweets: &[Tweet]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("polarity", DataType::Int32, false),
        Field::new("id", DataType::Int64, false),
        Field::new("user", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from_iter_values(tweets.iter().map(|t| t.polarity as i32))),
            Arc::new(Int64Array::from_iter_values(tweets.iter().map(|t| t.id))),
            Arc::new(StringArray::from_iter_values(tweets.iter().map(|t| t.user.as_str()))),
            Arc::new(StringArray::from_iter_values(tweets.iter().map(|t| t.text.as_str()))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let root = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let dir = PathBuf::from(root).join(DATASET_NAME);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let test = generate_tweets(&mut rng, 500, 1);
    let test_path = dir.join("test.csv");
    write_csv(&test_path, &test)?;
    println!("Wrote {} tweets to {}", test.len(), test_path.display());

    let train = generate_tweets(&mut rng, 5000, 1_000_000);
    let train_path = dir.join("train.parquet");
    write_parquet(&train_path, &train)?;
    println!("Wrote {} tweets to {}", train.len(), train_path.display());

    Ok(())
}
