use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Buckets per run of score. A score of 4.37 lands in bucket 43.
pub const BUCKETS_PER_RUN: f64 = 10.0;

pub fn bucket_for(score: f64) -> i64 {
    (score * BUCKETS_PER_RUN).floor() as i64
}

/// Count of evaluated lineups per quantized score.
///
/// Serialized as a JSON object keyed by the bucket number as a string, which keeps it readable
/// inside tagged documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram(BTreeMap<i64, u64>);

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: f64) {
        *self.0.entry(bucket_for(score)).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn count(&self, bucket: i64) -> u64 {
        self.0.get(&bucket).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.0.iter().map(|(&b, &c)| (b, c))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max_count(&self) -> u64 {
        self.0.values().copied().max().unwrap_or(0)
    }
}

impl FromIterator<(i64, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(b, c)| (b.to_string(), c)))
    }
}

impl<'de> Deserialize<'de> for Histogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(k, v)| {
                k.trim()
                    .parse::<i64>()
                    .map(|b| (b, v))
                    .map_err(|_| D::Error::custom(format!("invalid histogram bucket '{}'", k)))
            })
            .collect()
    }
}
