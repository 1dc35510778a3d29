//! Batch input files: a JSON array of strings, or of `[first, second]` pairs

use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TtsError};

pub fn read_texts(path: &Path) -> Result<Vec<String>> {
    parse_texts(&read(path)?)
}

pub fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    parse_pairs(&read(path)?)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        TtsError::InvalidBatchInput(format!("cannot read {}: {e}", path.display()))
    })
}

fn array(contents: &str, expected: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(contents)? {
        Value::Array(items) if !items.is_empty() => Ok(items),
        Value::Array(_) => Err(TtsError::InvalidBatchInput(
            "input contains no items".to_string(),
        )),
        _ => Err(TtsError::InvalidBatchInput(format!(
            "input must be a JSON array of {expected}"
        ))),
    }
}

pub fn parse_texts(contents: &str) -> Result<Vec<String>> {
    array(contents, "strings")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(text) => Ok(text),
            other => Err(TtsError::InvalidBatchInput(format!(
                "item {} is not a string: {other}",
                i + 1
            ))),
        })
        .collect()
}

pub fn parse_pairs(contents: &str) -> Result<Vec<(String, String)>> {
    array(contents, "[text1, text2] pairs")?
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Array(pair) => match pair.as_slice() {
                [Value::String(first), Value::String(second)] => {
                    Ok((first.clone(), second.clone()))
                }
                _ => Err(TtsError::InvalidBatchInput(format!(
                    "item {} must be exactly two strings",
                    i + 1
                ))),
            },
            other => Err(TtsError::InvalidBatchInput(format!(
                "item {} is not a pair: {other}",
                i + 1
            ))),
        })
        .collect()
}
