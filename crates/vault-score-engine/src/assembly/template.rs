use chrono::NaiveDate;

/// Replaced by the merged voice definitions
pub const MUSIC_PLACEHOLDER: &str = "####MUSICGOESHERE####";
/// Replaced by the engraving date
pub const DATE_PLACEHOLDER: &str = "###DATEGOESHERE###";

/// Fill both placeholders of a score template.
///
/// Every occurrence is replaced. The date is written as `YYYY-MM-DD`.
pub fn fill_template(template: &str, music: &str, date: NaiveDate) -> String {
    template
        .replace(MUSIC_PLACEHOLDER, music)
        .replace(DATE_PLACEHOLDER, &date.format("%Y-%m-%d").to_string())
}
