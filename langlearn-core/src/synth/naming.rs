//! Deterministic output file names derived from the synthesized text

use sha2::{Digest, Sha256};

use crate::types::BatchItem;

const HASH_LEN: usize = 12;

pub fn text_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..HASH_LEN].to_string()
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if slug.is_empty() {
        "voice".to_string()
    } else {
        slug
    }
}

pub fn single_filename(voice: &str, text: &str) -> String {
    format!("{}_{}.mp3", slug(voice), text_hash(text))
}

pub fn pair_filename(first: &str, second: &str) -> String {
    format!("pair_{}.mp3", text_hash(&format!("{first}|{second}")))
}

/// `NNN_<hash>.mp3`, numbered from 1 so files sort in input order
pub fn batch_item_filename(index: usize, item: &BatchItem) -> String {
    match item {
        BatchItem::Single(request) => format!("{:03}_{}.mp3", index + 1, text_hash(&request.text)),
        BatchItem::Pair(pair) => format!(
            "{:03}_pair_{}.mp3",
            index + 1,
            text_hash(&format!("{}|{}", pair.first.text, pair.second.text))
        ),
    }
}

pub fn merged_filename(items: &[BatchItem]) -> String {
    let joined = items
        .iter()
        .map(BatchItem::text)
        .collect::<Vec<_>>()
        .join("\n");
    format!("merged_{}.mp3", text_hash(&joined))
}
