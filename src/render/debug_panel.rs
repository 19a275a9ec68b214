use crate::domain::model::DebugData;
use crate::utils::format::group_thousands;
use std::fmt::Write;

pub const PANEL_TITLE: &str = "AI Debug Console";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n-- {} --", title);
}

pub fn render_debug_panel(debug: Option<&DebugData>) -> String {
    let mut out = format!("=== {} ===", PANEL_TITLE);

    let Some(debug) = debug else {
        out.push_str("\nNo Debug Data Yet\n");
        out.push_str(
            "Send a message to the Stonewalker to see the AI reasoning and processing details appear here.\n",
        );
        return out;
    };

    section(&mut out, "Query Analysis");
    let _ = writeln!(out, "Original Query: {}", debug.search_query);
    let keywords = if debug.keywords.is_empty() {
        "(none)".to_string()
    } else {
        debug
            .keywords
            .iter()
            .map(|k| format!("[{}]", k))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let _ = writeln!(out, "Extracted Keywords: {}", keywords);

    section(&mut out, "Performance Metrics");
    let _ = writeln!(out, "Processing Time: {:.0}ms", debug.processing_time);
    let _ = writeln!(out, "Confidence: {:.1}%", debug.confidence * 100.0);

    section(&mut out, "Geospatial Data");
    let geo = &debug.geospatial_data;
    match geo.center_point {
        Some([lat, lng]) => {
            let _ = writeln!(out, "Search Center: {:.4}, {:.4}", lat, lng);
        }
        None => {
            let _ = writeln!(out, "Search Center: -");
        }
    }
    match geo.search_radius {
        Some(radius) => {
            let _ = writeln!(out, "Search Radius: {}m", group_thousands(radius));
        }
        None => {
            let _ = writeln!(out, "Search Radius: -");
        }
    }
    if let Some(bbox) = geo.bounding_box {
        let coords: Vec<String> = bbox.iter().map(|c| format!("{:.4}", c)).collect();
        let _ = writeln!(out, "Bounding Box: {}", coords.join(", "));
    }

    section(&mut out, "AI Reasoning");
    let _ = writeln!(out, "{}", debug.llm_reasoning);

    section(&mut out, "Data Sources");
    for source in &debug.data_source {
        let _ = writeln!(out, "• {}", source);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::fallback_debug;
    use crate::domain::model::GeospatialData;

    #[test]
    fn test_empty_panel() {
        let panel = render_debug_panel(None);
        assert!(panel.contains(PANEL_TITLE));
        assert!(panel.contains("No Debug Data Yet"));
    }

    #[test]
    fn test_full_panel() {
        let debug = DebugData {
            search_query: "ley lines".to_string(),
            processing_time: 1234.56,
            confidence: 0.8766,
            keywords: vec!["ley".to_string(), "lines".to_string()],
            geospatial_data: GeospatialData {
                bounding_box: Some([51.4994, -0.1419, 51.5194, -0.1247]),
                center_point: Some([51.5094, -0.1333]),
                search_radius: Some(5000.0),
            },
            llm_reasoning: "Scanned the grid".to_string(),
            data_source: vec!["Quantum Ley Line Scanner".to_string()],
        };

        let panel = render_debug_panel(Some(&debug));
        assert!(panel.contains("Original Query: ley lines"));
        assert!(panel.contains("Extracted Keywords: [ley] [lines]"));
        assert!(panel.contains("Processing Time: 1235ms"));
        assert!(panel.contains("Confidence: 87.7%"));
        assert!(panel.contains("Search Center: 51.5094, -0.1333"));
        assert!(panel.contains("Search Radius: 5,000m"));
        assert!(panel.contains("Bounding Box: 51.4994, -0.1419, 51.5194, -0.1247"));
        assert!(panel.contains("Scanned the grid"));
        assert!(panel.contains("• Quantum Ley Line Scanner"));
    }

    #[test]
    fn test_fallback_panel_has_no_bounding_box() {
        let panel = render_debug_panel(Some(&fallback_debug("q")));
        assert!(panel.contains("Search Center: -"));
        assert!(!panel.contains("Bounding Box"));
        assert!(panel.contains("• Backend API"));
    }
}
