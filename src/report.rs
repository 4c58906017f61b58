//! Presentation data for evaluated expressions.
//!
//! Nothing here draws anything: the types describe a results table, a
//! frequency-by-value chart and a box plot, with a plain text rendering for
//! terminals. When two expressions are compared, charts and box plots should
//! use [`Comparison::shared_range`] so they line up.

use std::fmt::Write;

use num::{BigUint, ToPrimitive, Zero};

use crate::{Comparison, Outcomes, Statistics, stats::join_modes};

/// Charts with more rows than this are left out of [`render`].
pub const MAX_CHART_ROWS: usize = 100;

/// A labelled row of the results table, one cell per expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: &'static str,
    pub cells: Vec<String>,
}

/// The rows of the results table: min, max, mean, median, modes, standard
/// deviation and the band of one standard deviation around the mean.
///
/// ```
/// use dicestats::{evaluate, report::table_rows};
///
/// let e = evaluate("2d6").unwrap();
/// let rows = table_rows(&[e.statistics()]);
/// assert_eq!(rows[2].label, "Mean");
/// assert_eq!(rows[2].cells, ["7.00"]);
/// ```
pub fn table_rows(stats: &[&Statistics]) -> Vec<Row> {
    fn row(label: &'static str, stats: &[&Statistics], f: impl Fn(&Statistics) -> String) -> Row {
        Row { label, cells: stats.iter().map(|s| f(s)).collect() }
    }
    vec![
        row("Min", stats, |s| s.min().to_string()),
        row("Max", stats, |s| s.max().to_string()),
        row("Mean", stats, |s| format!("{:.2}", s.mean())),
        row("Median", stats, |s| s.median().to_string()),
        row("Mode", stats, |s| join_modes(s.modes())),
        row("Std Dev.", stats, |s| format!("{:.2}", s.standard_deviation())),
        row("Mean - SD", stats, |s| format!("{:.2}", s.band().0)),
        row("Mean + SD", stats, |s| format!("{:.2}", s.band().1)),
    ]
}

/// Occurrences of every value in a range, including the values which never
/// occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bars: Vec<(isize, BigUint)>,
}

impl Histogram {
    /// One bar per value from `lo` to, and including, `hi`.
    pub fn new(outcomes: &Outcomes, (lo, hi): (isize, isize)) -> Self {
        let freq = outcomes.frequencies();
        let bars = (lo..=hi).map(|v| (v, freq.count_of(v).cloned().unwrap_or_default())).collect();
        Histogram { bars }
    }

    pub fn bars(&self) -> &[(isize, BigUint)] {
        &self.bars
    }

    /// One line per value, bars scaled so the longest has `width` characters.
    pub fn render(&self, width: usize) -> String {
        let highest = self.bars.iter().map(|x| &x.1).max().cloned().unwrap_or_default();
        let label_width = self.bars.iter().map(|x| x.0.to_string().len()).max().unwrap_or(0);
        let mut out = String::new();
        for (v, count) in &self.bars {
            let len = if highest.is_zero() {
                0
            } else {
                (count * width / &highest).to_usize().unwrap_or(width)
            };
            let _ = writeln!(out, "{v:>label_width$} | {} {count}", "#".repeat(len));
        }
        out
    }
}

/// Box plot of one expression: whiskers at min and max, a box spanning one
/// standard deviation on each side of the mean, and markers at the median and
/// the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub min: isize,
    pub max: isize,
    pub band: (f64, f64),
    pub median: f64,
    pub mean: f64,
}

/// Vertical positions of the parts of a [`BoxPlot`], measured from the top
/// of an axis where the top is the highest value.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub whisker_top: f64,
    pub whisker_height: f64,
    pub box_top: f64,
    pub box_height: f64,
    pub median_top: f64,
    pub mean_top: f64,
}

impl BoxPlot {
    pub fn new(stats: &Statistics) -> Self {
        BoxPlot {
            min: stats.min(),
            max: stats.max(),
            band: stats.band(),
            median: stats.median(),
            mean: stats.mean(),
        }
    }

    /// Positions on an axis of `height` units showing the values `lo` to
    /// `hi`.
    pub fn layout(&self, (lo, hi): (isize, isize), height: f64) -> BoxLayout {
        let scale = height / (hi - lo).max(1) as f64;
        let top = |v: f64| (hi as f64 - v) * scale;
        BoxLayout {
            whisker_top: top(self.max as f64),
            whisker_height: (self.max - self.min) as f64 * scale,
            box_top: top(self.band.1),
            box_height: (self.band.1 - self.band.0) * scale,
            median_top: top(self.median),
            mean_top: top(self.mean),
        }
    }

    /// A horizontal plot of `width` characters for the values `lo` to `hi`:
    /// `-` whiskers, `#` box, `M` median and `o` mean.
    pub fn render(&self, (lo, hi): (isize, isize), width: usize) -> String {
        let width = width.max(2);
        let span = (hi - lo).max(1) as f64;
        let column = |v: f64| {
            let x = ((v - lo as f64) / span * (width - 1) as f64).round();
            x.clamp(0.0, (width - 1) as f64) as usize
        };
        let between = |a: f64, b: f64| {
            let (a, b) = (column(a), column(b));
            a.min(b)..=a.max(b)
        };
        let mut line = vec![' '; width];
        for c in &mut line[between(self.min as f64, self.max as f64)] {
            *c = '-';
        }
        for c in &mut line[between(self.band.0, self.band.1)] {
            *c = '#';
        }
        line[column(self.median)] = 'M';
        line[column(self.mean)] = 'o';
        line.into_iter().collect()
    }
}

/// Text report of a comparison: the results table, a chart per expression
/// and the box plots, all on the shared range.
pub fn render(comparison: &Comparison) -> String {
    let range = comparison.shared_range();
    let names: Vec<String> = comparison.evaluations().map(|e| e.formula().to_string()).collect();
    let stats: Vec<&Statistics> = comparison.evaluations().map(|e| e.statistics()).collect();
    let mut rows = vec![Row { label: "Roll", cells: names.clone() }];
    rows.extend(table_rows(&stats));

    let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    let mut cell_widths = vec![0; names.len()];
    for row in &rows {
        for (w, cell) in cell_widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let _ = write!(out, "{:<label_width$}", row.label);
        for (cell, w) in row.cells.iter().zip(cell_widths.iter().copied()) {
            let _ = write!(out, " | {cell:<w$}");
        }
        out.push('\n');
    }

    let rows_needed = usize::try_from(range.1 - range.0).map_or(usize::MAX, |x| x.saturating_add(1));
    for (name, e) in names.iter().zip(comparison.evaluations()) {
        let _ = writeln!(out, "\nDistribution of {name}");
        if rows_needed <= MAX_CHART_ROWS {
            out.push_str(&Histogram::new(e.outcomes(), range).render(40));
        } else {
            let _ = writeln!(out, "({rows_needed} values, too many to chart)");
        }
    }

    let name_width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    let _ = writeln!(out, "\nBox Plot [{}, {}]", range.0, range.1);
    for (name, e) in names.iter().zip(comparison.evaluations()) {
        let plot = BoxPlot::new(e.statistics()).render(range, 60);
        let _ = writeln!(out, "{name:<name_width$} |{plot}|");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, compare, evaluate};

    #[test]
    fn rows() {
        let a = evaluate("1d6").unwrap();
        let b = evaluate("5").unwrap();
        let rows = table_rows(&[a.statistics(), b.statistics()]);
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["Min", "Max", "Mean", "Median", "Mode", "Std Dev.", "Mean - SD", "Mean + SD"]);
        assert_eq!(rows[3].cells, ["3.5", "5"]);
        assert_eq!(rows[4].cells, ["1, 2, 3, 4, 5, 6", "5"]);
        assert_eq!(rows[5].cells, ["1.71", "0.00"]);
        assert_eq!(rows[6].cells, ["1.79", "5.00"]);
        assert_eq!(rows[7].cells, ["5.21", "5.00"]);
    }

    #[test]
    fn histogram_padding() {
        let e = evaluate("2d2").unwrap();
        let h = Histogram::new(e.outcomes(), (0, 5));
        let counts: Vec<u32> = h.bars().iter().map(|x| x.1.to_u32().unwrap()).collect();
        assert_eq!(counts, [0, 0, 1, 2, 1, 0]);
        assert_eq!(h.bars()[0].0, 0);
        assert_eq!(h.render(4).lines().nth(3), Some("3 | #### 2"));
    }

    #[test]
    fn box_layout() {
        // 1d2: mean 1.5, deviation 0.5, on an axis from 0 to 4 of height 8
        let e = evaluate("1d2").unwrap();
        let layout = BoxPlot::new(e.statistics()).layout((0, 4), 8.0);
        assert_eq!(layout.whisker_top, 4.0);
        assert_eq!(layout.whisker_height, 2.0);
        assert_eq!(layout.box_top, 4.0);
        assert_eq!(layout.box_height, 2.0);
        assert_eq!(layout.median_top, 5.0);
        assert_eq!(layout.mean_top, 5.0);
    }

    #[test]
    fn box_render() {
        let e = evaluate("1d2").unwrap();
        let plot = BoxPlot::new(e.statistics()).render((0, 4), 9);
        assert_eq!(plot, "  #o#    ");
        let constant = evaluate("3").unwrap();
        assert_eq!(BoxPlot::new(constant.statistics()).render((3, 3), 4), "o   ");
    }

    #[test]
    fn box_render_reversed() {
        let plot = BoxPlot { min: 5, max: 1, band: (4.0, 2.0), median: 3.0, mean: 3.0 };
        assert_eq!(plot.render((0, 5), 6), " -#o#-");
    }

    #[test]
    fn full_report() {
        let c = compare("2d6vd6+3", &Config::default()).unwrap();
        let text = render(&c);
        assert!(text.starts_with("Roll"));
        assert!(text.contains("Distribution of 2d6"));
        assert!(text.contains("Distribution of d6 + 3"));
        assert!(text.contains("Box Plot [2, 12]"));
        assert!(text.contains("12 | ###### 1"));
    }

    #[test]
    fn wide_range_not_charted() {
        let c = compare("d1000", &Config::default()).unwrap();
        assert!(render(&c).contains("(1000 values, too many to chart)"));
    }
}
