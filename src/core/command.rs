use crate::core::map::{MAX_ZOOM, MIN_ZOOM};

/// 終端機輸入：一般文字是查詢，`/` 開頭是指令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Query(String),
    Select(usize),
    Places,
    Map,
    Center { lat: f64, lng: f64, zoom: Option<u8> },
    Debug,
    Health,
    Stream(String),
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Query(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match name.as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "?" => Command::Help,
            "debug" | "d" => Command::Debug,
            "places" => Command::Places,
            "map" => Command::Map,
            "health" => Command::Health,
            "select" | "s" => match args.first().and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n > 0 => Command::Select(n),
                _ => Command::Invalid("usage: /select N (N starts at 1)".to_string()),
            },
            "center" => Self::parse_center(&args),
            "stream" if !args.is_empty() => Command::Stream(args.join(" ")),
            "stream" => Command::Invalid("usage: /stream QUERY".to_string()),
            other => Command::Invalid(format!("unknown command: /{}", other)),
        }
    }

    fn parse_center(args: &[&str]) -> Self {
        let usage = || Command::Invalid("usage: /center LAT LNG [ZOOM]".to_string());

        let (Some(lat), Some(lng)) = (
            args.first().and_then(|v| v.parse::<f64>().ok()),
            args.get(1).and_then(|v| v.parse::<f64>().ok()),
        ) else {
            return usage();
        };

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return usage();
        }

        let zoom = match args.get(2) {
            Some(raw) => match raw.parse::<u8>() {
                Ok(z) if (MIN_ZOOM..=MAX_ZOOM).contains(&z) => Some(z),
                _ => return usage(),
            },
            None => None,
        };

        Command::Center { lat, lng, zoom }
    }
}
