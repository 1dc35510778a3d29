use crate::types::SpeechRate;

/// Wrap plain text in a prosody element so playback speed is set by the
/// provider rather than by resampling.
pub fn wrap_with_rate(text: &str, rate: SpeechRate) -> String {
    format!(
        "<speak><prosody rate=\"{}%\">{}</prosody></speak>",
        rate.percent(),
        escape(text.trim())
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
