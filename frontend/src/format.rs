use chrono::{DateTime, Datelike, Local, NaiveDate, Utc, Weekday};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateStyle {
    Short,
    /// Zero-padded day with the full month name, as printed on invoices.
    Document,
    Long,
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_thousands(value: i64) -> String {
    let grouped = group_digits(value.unsigned_abs());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Whole-Rupiah amount in `id-ID` style, e.g. `Rp 1.500.000` or `-Rp 2.000`.
pub fn format_currency(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}Rp {}", sign, group_digits(amount.unsigned_abs()))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    let month = date.month0() as usize;
    match style {
        DateStyle::Short => format!("{} {} {}", date.day(), MONTHS_SHORT[month], date.year()),
        DateStyle::Document => format!("{:02} {} {}", date.day(), MONTHS_LONG[month], date.year()),
        DateStyle::Long => format!(
            "{}, {} {} {}",
            weekday_name(date.weekday()),
            date.day(),
            MONTHS_LONG[month],
            date.year()
        ),
    }
}

pub fn month_label(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

/// Accepts `YYYY-MM-DD` or any timestamp that starts with one.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Short date for a raw column value, `-` when empty or unreadable.
pub fn display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|date| format_date(date, DateStyle::Short))
        .unwrap_or_else(|| "-".to_string())
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{} hari lalu", days)
    } else if hours > 0 {
        format!("{} jam lalu", hours)
    } else if minutes > 0 {
        format!("{} menit lalu", minutes)
    } else {
        "Baru saja".to_string()
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Trimmed form input, `None` when blank.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Largest amount a form field accepts, in either direction.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Lenient amount parsing for form fields: `1.500.000`, `1500000`, `1500000.4`.
/// Exponents and values beyond [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(trimmed);
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let in_range = |value: &i64| (-MAX_AMOUNT..=MAX_AMOUNT).contains(value);
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value).filter(in_range);
    }
    let grouped = trimmed.matches('.').count() > 1
        || trimmed.split('.').nth(1).map_or(false, |frac| frac.len() == 3);
    if grouped {
        let without_dots: String = trimmed.chars().filter(|c| *c != '.').collect();
        return without_dots.parse::<i64>().ok().filter(in_range);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= MAX_AMOUNT as f64)
        .map(|value| value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Rp 0")]
    #[case(999, "Rp 999")]
    #[case(1_000, "Rp 1.000")]
    #[case(1_500_000, "Rp 1.500.000")]
    #[case(-2_000, "-Rp 2.000")]
    #[case(123_456_789, "Rp 123.456.789")]
    fn currency_uses_dot_grouping(#[case] amount: i64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[test]
    fn dates_use_indonesian_names() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date, DateStyle::Short), "5 Jan 2025");
        assert_eq!(format_date(date, DateStyle::Long), "Minggu, 5 Januari 2025");
        assert_eq!(format_date(date, DateStyle::Document), "05 Januari 2025");
        let august = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap();
        assert_eq!(format_date(august, DateStyle::Short), "17 Agu 2024");
    }

    #[rstest]
    #[case("2025-03-09", Some((2025, 3, 9)))]
    #[case("2025-03-09T10:00:00+00:00", Some((2025, 3, 9)))]
    #[case("", None)]
    #[case("09/03/2025", None)]
    fn parses_date_prefix(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(parse_date(raw), expected);
    }

    #[test]
    fn display_date_falls_back_to_dash() {
        assert_eq!(display_date(None), "-");
        assert_eq!(display_date(Some("garbage")), "-");
        assert_eq!(display_date(Some("2024-12-31")), "31 Des 2024");
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let ago = |secs: i64| format_time_ago(now - chrono::Duration::seconds(secs), now);
        assert_eq!(ago(10), "Baru saja");
        assert_eq!(ago(5 * 60), "5 menit lalu");
        assert_eq!(ago(3 * 3600), "3 jam lalu");
        assert_eq!(ago(2 * 86_400 + 10), "2 hari lalu");
        assert_eq!(format_time_ago(now + chrono::Duration::seconds(30), now), "Baru saja");
    }

    #[rstest]
    #[case("1500000", Some(1_500_000))]
    #[case(" 1.500.000 ", Some(1_500_000))]
    #[case("1.500", Some(1_500))]
    #[case("2500.6", Some(2_501))]
    #[case("-300", Some(-300))]
    #[case("", None)]
    #[case("abc", None)]
    #[case("1e19", None)]
    #[case("-1E3", None)]
    #[case("inf", None)]
    #[case("1000000000000000", Some(MAX_AMOUNT))]
    #[case("1000000000000001", None)]
    #[case("-99999999999999999999", None)]
    #[case("1.000.000.000.000.000.000", None)]
    fn amount_parsing(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_amount(raw), expected);
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" a "), Some("a".to_string()));
    }
}
