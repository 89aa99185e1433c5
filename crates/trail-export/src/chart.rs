//! Ranked bar-chart rendering.
//!
//! The chart is templated SVG markup so the same renderer backs both the
//! static export artifact and the dashboard's chart endpoint.

// Layout constants. Height grows with the number of bars.
const WIDTH: u32 = 860;
const MARGIN_LEFT: u32 = 200;
const MARGIN_RIGHT: u32 = 70;
const MARGIN_TOP: u32 = 64;
const MARGIN_BOTTOM: u32 = 24;
const BAR_HEIGHT: u32 = 22;
const BAR_GAP: u32 = 10;

const BAR_FILL: &str = "#1f77b4";
const TEXT_FILL: &str = "#24292f";
const MUTED_FILL: &str = "#57606a";

/// Render a horizontal bar chart of the top `top_n` entries.
///
/// `entries` must already be ranked (count descending, name ascending); the
/// chart preserves that order top to bottom. An empty slice renders a
/// placeholder chart stating that no data was collected.
pub fn render_chart(entries: &[(String, u64)], top_n: usize) -> String {
    let shown = &entries[..entries.len().min(top_n)];
    if shown.is_empty() {
        return render_empty_chart();
    }

    let max_count = shown.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let height = MARGIN_TOP + shown.len() as u32 * (BAR_HEIGHT + BAR_GAP) + MARGIN_BOTTOM;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="sans-serif">"#,
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r##"<rect width="{WIDTH}" height="{height}" fill="#ffffff"/>"##
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<text x="{}" y="34" text-anchor="middle" font-size="18" font-weight="bold" fill="{TEXT_FILL}">Command Usage Frequency</text>"#,
        WIDTH / 2
    ));
    svg.push('\n');

    for (i, (command, count)) in shown.iter().enumerate() {
        let y = MARGIN_TOP + i as u32 * (BAR_HEIGHT + BAR_GAP);
        let bar_width = ((*count as f64 / max_count as f64) * plot_width as f64).round() as u32;
        let text_y = y + BAR_HEIGHT / 2 + 5;

        svg.push_str(&format!(
            r#"<text x="{}" y="{text_y}" text-anchor="end" font-size="13" fill="{TEXT_FILL}">{}</text>"#,
            MARGIN_LEFT - 10,
            xml_escape(command),
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<rect x="{MARGIN_LEFT}" y="{y}" width="{}" height="{BAR_HEIGHT}" fill="{BAR_FILL}"/>"#,
            bar_width.max(1),
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{}" y="{text_y}" font-size="12" fill="{MUTED_FILL}">{count}</text>"#,
            MARGIN_LEFT + bar_width.max(1) + 8,
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_empty_chart() -> String {
    let height = 200;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            "\n",
            r##"<rect width="{w}" height="{h}" fill="#ffffff"/>"##,
            "\n",
            r#"<text x="{cx}" y="34" text-anchor="middle" font-size="18" font-weight="bold" fill="{text}">Command Usage Frequency</text>"#,
            "\n",
            r#"<text x="{cx}" y="110" text-anchor="middle" font-size="14" fill="{muted}">no data collected</text>"#,
            "\n</svg>\n",
        ),
        w = WIDTH,
        h = height,
        cx = WIDTH / 2,
        text = TEXT_FILL,
        muted = MUTED_FILL,
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_chart_contains_labels_and_counts() {
        let svg = render_chart(&entries(&[("ls", 12), ("grep", 5)]), 20);
        assert!(svg.contains(">ls</text>"));
        assert!(svg.contains(">grep</text>"));
        assert!(svg.contains(">12</text>"));
        assert!(svg.contains(">5</text>"));
    }

    #[test]
    fn test_chart_truncates_to_top_n() {
        let svg = render_chart(&entries(&[("a", 3), ("b", 2), ("c", 1)]), 2);
        assert!(svg.contains(">a</text>"));
        assert!(svg.contains(">b</text>"));
        assert!(!svg.contains(">c</text>"));
    }

    #[test]
    fn test_chart_preserves_ranked_order() {
        let svg = render_chart(&entries(&[("first", 9), ("second", 1)]), 20);
        let first_pos = svg.find(">first<").unwrap();
        let second_pos = svg.find(">second<").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn test_chart_empty_shows_placeholder() {
        let svg = render_chart(&[], 20);
        assert!(svg.contains("no data collected"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_chart_escapes_labels() {
        let svg = render_chart(&entries(&[("a&b", 1)]), 20);
        assert!(svg.contains("a&amp;b"));
        assert!(!svg.contains(">a&b<"));
    }

    #[test]
    fn test_chart_deterministic() {
        let data = entries(&[("ls", 4), ("vim", 2)]);
        assert_eq!(render_chart(&data, 20), render_chart(&data, 20));
    }
}
