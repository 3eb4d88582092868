//! HTML report with a grouped boxplot of per-item scores
//!
//! Each metric gets a self-contained report: an inline SVG boxplot (one
//! box per system), the five-number summaries as a table, and the pairwise
//! test results. Styling is embedded CSS; no external assets.

use crate::distribution::SystemDistribution;
use crate::significance::ResultSet;

// SVG geometry for the boxplot
const MARGIN_LEFT: f32 = 64.0;
const MARGIN_TOP: f32 = 48.0;
const MARGIN_BOTTOM: f32 = 72.0;
const SLOT_WIDTH: f32 = 120.0;
const BOX_WIDTH: f32 = 56.0;
const PLOT_HEIGHT: f32 = 320.0;
const Y_TICKS: usize = 5;

/// HTML report renderer for one metric
#[derive(Debug)]
pub struct HtmlReport<'a> {
    metric: &'a str,
    distributions: &'a [SystemDistribution],
    results: &'a ResultSet,
}

impl<'a> HtmlReport<'a> {
    pub fn new(
        metric: &'a str,
        distributions: &'a [SystemDistribution],
        results: &'a ResultSet,
    ) -> Self {
        Self {
            metric,
            distributions,
            results,
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .system {
            color: #0066cc;
            font-weight: bold;
            font-family: monospace;
        }
        .value {
            font-family: monospace;
        }
        .significant {
            color: #cc0000;
            font-weight: bold;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Value range covered by the y axis, padded so boxes never touch the frame
    fn value_range(&self) -> (f32, f32) {
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for d in self.distributions {
            lo = lo.min(d.min);
            hi = hi.max(d.max);
        }
        if self.distributions.is_empty() {
            return (0.0, 1.0);
        }
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
        (lo - pad, hi + pad)
    }

    fn y_pixel(&self, value: f32, lo: f32, hi: f32) -> f32 {
        MARGIN_TOP + PLOT_HEIGHT * (hi - value) / (hi - lo)
    }

    fn svg_width(&self) -> f32 {
        MARGIN_LEFT + SLOT_WIDTH * self.distributions.len().max(1) as f32 + 24.0
    }

    fn svg_height(&self) -> f32 {
        MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM
    }

    /// Render the grouped boxplot as an inline SVG element
    fn render_svg(&self) -> String {
        let (lo, hi) = self.value_range();
        let width = self.svg_width();
        let height = self.svg_height();
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<svg class="chart" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" xmlns="http://www.w3.org/2000/svg">"#,
            width, height, width, height
        ));
        svg.push('\n');

        // Axis frame and ticks
        let axis_bottom = MARGIN_TOP + PLOT_HEIGHT;
        svg.push_str(&format!(
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333" stroke-width="1"/>"##,
            MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, axis_bottom
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333" stroke-width="1"/>"##,
            MARGIN_LEFT,
            axis_bottom,
            width - 12.0,
            axis_bottom
        ));
        svg.push('\n');

        for tick in 0..=Y_TICKS {
            let value = lo + (hi - lo) * tick as f32 / Y_TICKS as f32;
            let y = self.y_pixel(value, lo, hi);
            svg.push_str(&format!(
                r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#ccc" stroke-width="1"/>"##,
                MARGIN_LEFT,
                y,
                width - 12.0,
                y
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r##"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="#555">{:.3}</text>"##,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                value
            ));
            svg.push('\n');
        }

        // One box per system
        for (index, d) in self.distributions.iter().enumerate() {
            let cx = MARGIN_LEFT + SLOT_WIDTH * index as f32 + SLOT_WIDTH / 2.0;
            let y_min = self.y_pixel(d.min, lo, hi);
            let y_q1 = self.y_pixel(d.q1, lo, hi);
            let y_median = self.y_pixel(d.median, lo, hi);
            let y_q3 = self.y_pixel(d.q3, lo, hi);
            let y_max = self.y_pixel(d.max, lo, hi);
            let box_left = cx - BOX_WIDTH / 2.0;
            let box_height = (y_q1 - y_q3).max(1.0);

            // Whisker with caps
            svg.push_str(&format!(
                r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333" stroke-width="1"/>"##,
                cx, y_max, cx, y_min
            ));
            svg.push('\n');
            for y_cap in [y_min, y_max] {
                svg.push_str(&format!(
                    r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333" stroke-width="1"/>"##,
                    cx - BOX_WIDTH / 4.0,
                    y_cap,
                    cx + BOX_WIDTH / 4.0,
                    y_cap
                ));
                svg.push('\n');
            }

            // Interquartile box and median line
            svg.push_str(&format!(
                r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#4a90d9" fill-opacity="0.55" stroke="#2b5f94" stroke-width="1"/>"##,
                box_left, y_q3, BOX_WIDTH, box_height
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#cc4400" stroke-width="2"/>"##,
                box_left,
                y_median,
                box_left + BOX_WIDTH,
                y_median
            ));
            svg.push('\n');

            // Rotated system label under the axis
            let label_y = axis_bottom + 16.0;
            svg.push_str(&format!(
                r##"  <text x="{:.1}" y="{:.1}" transform="rotate(45, {:.1}, {:.1})" font-size="12" fill="#333">{}</text>"##,
                cx,
                label_y,
                cx,
                label_y,
                Self::escape_html(&d.system)
            ));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Render the five-number summaries as an HTML table
    fn render_distribution_table(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Score Distributions</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>System</th><th>Min</th><th>Q1</th><th>Median</th><th>Q3</th><th>Max</th><th>Mean</th></tr>\n");
        for d in self.distributions {
            html.push_str(&format!(
                "        <tr><td class=\"system\">{}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td></tr>\n",
                Self::escape_html(&d.system),
                d.min,
                d.q1,
                d.median,
                d.q3,
                d.max,
                d.mean
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    /// Render the pairwise results as an HTML table
    fn render_results_table(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Pairwise Tests</h2>\n");
        if self.results.is_empty() {
            html.push_str("    <p>No results available for this metric.</p>\n");
            return html;
        }
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>System 1</th><th>System 2</th><th>t-statistic</th><th>p-value</th><th>Significant</th></tr>\n");
        for result in &self.results.results {
            let class = if result.significant {
                "value significant"
            } else {
                "value"
            };
            html.push_str(&format!(
                "        <tr><td class=\"system\">{}</td><td class=\"system\">{}</td><td class=\"value\">{:.4}</td><td class=\"value\">{:.4}</td><td class=\"{}\">{}</td></tr>\n",
                Self::escape_html(&result.system_a),
                Self::escape_html(&result.system_b),
                result.statistic,
                result.pvalue,
                class,
                result.significant
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    /// Generate the complete HTML document
    pub fn to_html(&self) -> String {
        let title = format!("{} Distribution by System", self.metric);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");
        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>{}</title>\n",
            Self::escape_html(&title)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");
        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", Self::escape_html(&title)));
        html.push_str("    ");
        html.push_str(&self.render_svg());
        html.push_str(&self.render_distribution_table());
        html.push_str(&self.render_results_table());
        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Significar - Significance Testing for Evaluation Metrics\n");
        html.push_str("    </div>\n");
        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
