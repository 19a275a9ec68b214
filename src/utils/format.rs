use chrono::{DateTime, Local, Utc};

/// HH:MM (24 小時制，本地時區)
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn pluralize<'a>(count: usize, singular: &'a str, plural: Option<&'a str>) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        plural
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}s", singular))
    }
}

/// 5000.0 -> "5,000"
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
