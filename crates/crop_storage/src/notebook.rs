use crop_core::{Artifact, ArtifactStore, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_NBFORMAT: u32 = 4;

/// A string that may be stored on disk as a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Lines", into = "String")]
pub struct MultilineString(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum Lines {
    Joined(String),
    Split(Vec<String>),
}

impl From<Lines> for MultilineString {
    fn from(lines: Lines) -> Self {
        match lines {
            Lines::Joined(s) => MultilineString(s),
            Lines::Split(parts) => MultilineString(parts.concat()),
        }
    }
}

impl From<MultilineString> for String {
    fn from(value: MultilineString) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Markdown,
    Code,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub source: MultilineString,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Jupyter notebook in nbformat 4 or newer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut notebook: Notebook =
            serde_json::from_slice(bytes).map_err(|e| Artifact::Notebook.error(e))?;
        if notebook.nbformat < MIN_NBFORMAT {
            return Err(Artifact::Notebook.error(format!(
                "unsupported nbformat {}, expected {} or newer",
                notebook.nbformat, MIN_NBFORMAT
            )));
        }
        for cell in &mut notebook.cells {
            if let Some(Value::Array(outputs)) = cell.extra.get_mut("outputs") {
                outputs.iter_mut().for_each(rejoin_output);
            }
        }
        Ok(notebook)
    }

    pub async fn load(store: &dyn ArtifactStore) -> Result<Self> {
        let bytes = store.read(Artifact::Notebook).await?;
        Self::parse(&bytes)
    }
}

fn is_json_mime(mime: &str) -> bool {
    mime == "application/json" || mime.ends_with("+json")
}

fn join_lines(value: &mut Value) {
    if let Value::Array(items) = value {
        if items.iter().all(Value::is_string) {
            let joined: String = items.iter().filter_map(Value::as_str).collect();
            *value = Value::String(joined);
        }
    }
}

/// Joins split `text` streams and non-JSON mime bundle entries.
fn rejoin_output(output: &mut Value) {
    let Some(output) = output.as_object_mut() else {
        return;
    };
    if let Some(text) = output.get_mut("text") {
        join_lines(text);
    }
    if let Some(Value::Object(data)) = output.get_mut("data") {
        for (mime, value) in data.iter_mut() {
            if !is_json_mime(mime) {
                join_lines(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_core::Error;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "cells": [
                {
                    "cell_type": "markdown",
                    "metadata": {},
                    "source": ["# Crop ", "recommendation\n", "system"]
                },
                {
                    "cell_type": "code",
                    "execution_count": 3,
                    "metadata": {"collapsed": false},
                    "outputs": [
                        {"name": "stdout", "output_type": "stream", "text": ["a\n", "b\n"]},
                        {
                            "output_type": "execute_result",
                            "execution_count": 3,
                            "metadata": {},
                            "data": {
                                "text/plain": ["(2200, ", "8)"],
                                "application/json": ["kept", "as list"]
                            }
                        }
                    ],
                    "source": "df.shape"
                }
            ],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 4
        })
    }

    #[test]
    fn test_parse_rejoins_lines() {
        let bytes = serde_json::to_vec(&sample()).unwrap();
        let notebook = Notebook::parse(&bytes).unwrap();
        assert_eq!(notebook.cells.len(), 2);
        assert_eq!(notebook.cells[0].source.0, "# Crop recommendation\nsystem");
        assert_eq!(notebook.cells[1].cell_type, CellType::Code);

        let out = serde_json::to_value(&notebook).unwrap();
        let outputs = &out["cells"][1]["outputs"];
        assert_eq!(outputs[0]["text"], json!("a\nb\n"));
        assert_eq!(outputs[1]["data"]["text/plain"], json!("(2200, 8)"));
        assert_eq!(outputs[1]["data"]["application/json"], json!(["kept", "as list"]));
        assert_eq!(out["cells"][1]["execution_count"], json!(3));
        assert_eq!(out["cells"][1]["source"], json!("df.shape"));
        assert_eq!(out["metadata"]["kernelspec"]["name"], json!("python3"));
    }

    #[test]
    fn test_old_format_rejected() {
        let mut doc = sample();
        doc["nbformat"] = json!(3);
        let err = Notebook::parse(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert!(matches!(err, Error::Read(_)));
        assert!(err.to_string().contains("nbformat 3"));
    }

    #[test]
    fn test_malformed_notebook() {
        assert!(matches!(Notebook::parse(b"not json"), Err(Error::Read(_))));
        assert!(matches!(Notebook::parse(br#"{"cells": []}"#), Err(Error::Read(_))));
    }
}
