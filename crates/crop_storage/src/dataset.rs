use crop_core::{Artifact, ArtifactStore, Page, PageRequest, Result};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// One dataset row keyed by column name, in file column order.
pub type Record = Map<String, Value>;

/// Inferred over the whole column, so whole numbers stay integers unless any
/// cell in the column is fractional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnType::Integer;
        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            if kind == ColumnType::Integer && cell.parse::<i64>().is_ok() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => kind = ColumnType::Float,
                _ => return ColumnType::Text,
            }
        }
        kind
    }

    fn convert(self, cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(cell.to_string())),
            ColumnType::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(cell.to_string())),
            ColumnType::Text => Value::String(cell.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Artifact::Dataset.error(e))?
            .iter()
            .map(str::to_string)
            .collect();

        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Artifact::Dataset.error(e))?;

        let types: Vec<ColumnType> = (0..columns.len())
            .map(|i| ColumnType::infer(rows.iter().filter_map(|row| row.get(i))))
            .collect();

        let records = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(&types)
                    .zip(row.iter())
                    .map(|((name, kind), cell)| (name.clone(), kind.convert(cell)))
                    .collect::<Record>()
            })
            .collect();

        Ok(Self { columns, records })
    }

    pub async fn load(store: &dyn ArtifactStore) -> Result<Self> {
        let bytes = store.read(Artifact::Dataset).await?;
        let dataset = Self::parse(&bytes)?;
        debug!(
            rows = dataset.records.len(),
            columns = dataset.columns.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_page(self, request: PageRequest) -> Page<Record> {
        Page::from_records(request, self.records)
    }
}

/// Reads the dataset and returns one page of it.
pub async fn load_page(store: &dyn ArtifactStore, request: PageRequest) -> Result<Page<Record>> {
    request.validate()?;
    Ok(Dataset::load(store).await?.into_page(request))
}
