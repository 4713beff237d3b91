use colored::Colorize;

use crate::analysis::{Chart, HistogramBin, ScatterPoint};

const BAR_WIDTH: usize = 40;
const GRID_WIDTH: usize = 60;
const GRID_HEIGHT: usize = 16;

fn bar(value: f64, max: f64) -> String {
    let len = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "\u{2588}".repeat(len)
}

fn label_width(labels: &[String]) -> usize {
    labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(8)
}

/// Format a chart as text for the terminal.
pub fn format_chart(chart: &Chart) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n  {}\n", chart.title().bold()));

    match chart {
        Chart::Bar {
            x_label,
            y_label,
            categories,
            values,
            ..
        } => format_bars(&mut output, x_label, y_label, categories, values),
        Chart::Pie { labels, values, .. } => format_pie(&mut output, labels, values),
        Chart::Histogram { x_label, bins, .. } => format_histogram(&mut output, x_label, bins),
        Chart::Scatter {
            x_label,
            y_label,
            points,
            ..
        } => format_scatter(&mut output, x_label, y_label, points),
    }

    output.push('\n');
    output
}

fn format_bars(output: &mut String, x_label: &str, y_label: &str, categories: &[String], values: &[f64]) {
    if categories.is_empty() {
        output.push_str("  No data available.\n");
        return;
    }

    let width = label_width(categories).max(x_label.chars().count());
    let max = values.iter().copied().fold(0.0f64, f64::max);

    output.push_str(&format!("  {:<width$}  {:>10}\n", x_label, y_label));
    output.push_str(&format!("  {}\n", "-".repeat(width + 12 + BAR_WIDTH)));
    for (category, value) in categories.iter().zip(values) {
        output.push_str(&format!(
            "  {:<width$}  {:>10.2}  {}\n",
            category,
            value,
            bar(*value, max).blue()
        ));
    }
}

fn format_pie(output: &mut String, labels: &[String], values: &[f64]) {
    let total: f64 = values.iter().sum();
    if labels.is_empty() || total <= 0.0 {
        output.push_str("  No data available.\n");
        return;
    }

    let width = label_width(labels);
    for (label, value) in labels.iter().zip(values) {
        let share = value / total;
        output.push_str(&format!(
            "  {:<width$}  {:>5.1}%  {}\n",
            label,
            share * 100.0,
            bar(share, 1.0).magenta()
        ));
    }
}

fn format_histogram(output: &mut String, x_label: &str, bins: &[HistogramBin]) {
    if bins.is_empty() {
        output.push_str("  No data available.\n");
        return;
    }

    let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    output.push_str(&format!("  {:>21}  {:>6}  Frequency\n", x_label, "Count"));
    output.push_str(&format!("  {}\n", "-".repeat(31 + BAR_WIDTH)));
    for b in bins {
        output.push_str(&format!(
            "  {:>10.2}-{:<10.2}  {:>6}  {}\n",
            b.lower,
            b.upper,
            b.count,
            bar(b.count as f64, max).green()
        ));
    }
}

fn format_scatter(output: &mut String, x_label: &str, y_label: &str, points: &[ScatterPoint]) {
    if points.is_empty() {
        output.push_str("  No data available.\n");
        return;
    }

    let (x_min, x_max) = bounds(points.iter().map(|p| p.x));
    let (y_min, y_max) = bounds(points.iter().map(|p| p.y));

    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];
    for p in points {
        let col = scale(p.x, x_min, x_max, GRID_WIDTH);
        let row = GRID_HEIGHT - 1 - scale(p.y, y_min, y_max, GRID_HEIGHT);
        grid[row][col] = '*';
    }

    output.push_str(&format!("  {y_label} ({y_min:.2} to {y_max:.2})\n"));
    for row in grid {
        let line: String = row.into_iter().collect();
        output.push_str(&format!("  |{}\n", line.cyan()));
    }
    output.push_str(&format!("  +{}\n", "-".repeat(GRID_WIDTH)));
    output.push_str(&format!("   {x_label} ({x_min:.2} to {x_max:.2})\n"));
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Map `v` in `[min, max]` onto a cell index in `0..cells`.
fn scale(v: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return cells / 2;
    }
    let pos = ((v - min) / (max - min) * (cells - 1) as f64).round() as usize;
    pos.min(cells - 1)
}
