use chrono::NaiveDate;

use crate::domain::model::PhraseRecord;

pub const SUBJECT: &str = "Your Daily Inspirational Phrase";

/// Deterministic plain-text body. The location line is emitted only for a
/// present, non-empty location.
pub fn format_body(record: &PhraseRecord, date: NaiveDate) -> String {
    let mut body = format!(
        "Today's inspirational phrase ({}):\n\n",
        date.format("%Y-%m-%d")
    );
    body.push_str(&format!("\"{}\"\n", record.phrase));
    body.push_str(&format!("- {}\n", record.author));

    if let Some(location) = record.location.as_deref() {
        if !location.is_empty() {
            body.push_str(&format!("(Location: {})\n", location));
        }
    }

    body
}
