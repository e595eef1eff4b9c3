use std::fmt;
use std::ops::Range;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 7;

/// Feature names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Crop classes, declared in the model's class-index order.
///
/// Reordering these variants changes what every model artifact means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Rice,
    Maize,
    Chickpea,
    Kidneybeans,
    Pigeonpeas,
    Mothbeans,
    Mungbean,
    Blackgram,
    Lentil,
    Pomegranate,
    Banana,
    Mango,
    Grapes,
    Watermelon,
    Muskmelon,
    Apple,
    Orange,
    Papaya,
    Coconut,
    Cotton,
    Jute,
    Coffee,
}

impl Crop {
    pub const COUNT: usize = 22;

    pub const ALL: [Crop; Crop::COUNT] = [
        Crop::Rice,
        Crop::Maize,
        Crop::Chickpea,
        Crop::Kidneybeans,
        Crop::Pigeonpeas,
        Crop::Mothbeans,
        Crop::Mungbean,
        Crop::Blackgram,
        Crop::Lentil,
        Crop::Pomegranate,
        Crop::Banana,
        Crop::Mango,
        Crop::Grapes,
        Crop::Watermelon,
        Crop::Muskmelon,
        Crop::Apple,
        Crop::Orange,
        Crop::Papaya,
        Crop::Coconut,
        Crop::Cotton,
        Crop::Jute,
        Crop::Coffee,
    ];

    pub fn from_index(index: usize) -> Option<Crop> {
        Crop::ALL.get(index).copied()
    }

    /// Looks up a predicted class index, failing when the model and the
    /// label table disagree.
    pub fn for_class(index: usize) -> Result<Crop> {
        Crop::from_index(index).ok_or(Error::IndexOutOfRange {
            index,
            len: Crop::COUNT,
        })
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Maize => "maize",
            Crop::Chickpea => "chickpea",
            Crop::Kidneybeans => "kidneybeans",
            Crop::Pigeonpeas => "pigeonpeas",
            Crop::Mothbeans => "mothbeans",
            Crop::Mungbean => "mungbean",
            Crop::Blackgram => "blackgram",
            Crop::Lentil => "lentil",
            Crop::Pomegranate => "pomegranate",
            Crop::Banana => "banana",
            Crop::Mango => "mango",
            Crop::Grapes => "grapes",
            Crop::Watermelon => "watermelon",
            Crop::Muskmelon => "muskmelon",
            Crop::Apple => "apple",
            Crop::Orange => "orange",
            Crop::Papaya => "papaya",
            Crop::Coconut => "coconut",
            Crop::Cotton => "cotton",
            Crop::Jute => "jute",
            Crop::Coffee => "coffee",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Crop::ALL.iter().map(|crop| crop.as_str()).collect()
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soil and climate measurements for a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl PredictionInput {
    pub fn validate(&self) -> Result<()> {
        let invalid: Vec<&str> = FEATURE_NAMES
            .iter()
            .zip(self.to_features())
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "fields must be finite numbers: {}",
                invalid.join(", ")
            )))
        }
    }

    pub fn to_features(&self) -> FeatureVector {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: Crop,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page() -> u64 {
    1
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Accepts any non-negative integer page, clamping values past `u64::MAX`
/// so that huge pages read as empty instead of failing.
fn saturating_page<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct PageVisitor;

    impl<'de> Visitor<'de> for PageVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer page number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u64, E> {
            let digits = v.trim().strip_prefix('+').unwrap_or(v.trim());
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(E::invalid_value(Unexpected::Str(v), &self));
            }
            Ok(digits.parse::<u64>().unwrap_or(u64::MAX))
        }
    }

    deserializer.deserialize_any(PageVisitor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page", deserialize_with = "saturating_page")]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, size: u32) -> Result<Self> {
        let request = Self { page, size };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::Validation(format!(
                "page must be >= 1, got {}",
                self.page
            )));
        }
        if self.size < 1 || self.size > MAX_PAGE_SIZE {
            return Err(Error::Validation(format!(
                "size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.size
            )));
        }
        Ok(())
    }

    /// Row range covered by this page, clamped to `total`. Pages past the end
    /// yield an empty range.
    pub fn range(&self, total: usize) -> Range<usize> {
        let size = self.size as usize;
        let start = usize::try_from(self.page.saturating_sub(1))
            .ok()
            .and_then(|skip| skip.checked_mul(size))
            .unwrap_or(usize::MAX)
            .min(total);
        let end = start.saturating_add(size).min(total);
        start..end
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.size as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u64,
    pub size: u32,
    pub total_records: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Slices one page out of the full record set.
    pub fn from_records(request: PageRequest, records: Vec<T>) -> Self {
        let total_records = records.len();
        let range = request.range(total_records);
        let data = records
            .into_iter()
            .skip(range.start)
            .take(range.end - range.start)
            .collect();
        Self {
            page: request.page,
            size: request.size,
            total_records,
            total_pages: request.total_pages(total_records),
            data,
        }
    }
}
