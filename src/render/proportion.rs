//! Proportion Bars
//!
//! Pure computation of each entry's share of a count map, plus a text
//! rendering of those shares.

use crate::client::CountMap;

/// Shown instead of bars when a mapping has no entries
pub const NO_DATA: &str = "No data yet";

const FILLED: char = '█';
const EMPTY: char = '░';
const MIN_LABEL_WIDTH: usize = 10;

/// One entry's share of the total
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: u64,
    /// Percentage of the total in `0.0..=100.0`
    pub percent: f64,
}

/// Result of splitting a count map into shares
#[derive(Debug, Clone, PartialEq)]
pub enum Proportions {
    /// The mapping had no entries
    Empty,
    /// One share per entry, in the mapping's order
    Bars(Vec<Share>),
}

/// Compute shares; every share is 0 when the total is 0
pub fn proportions(data: &CountMap) -> Proportions {
    if data.is_empty() {
        return Proportions::Empty;
    }

    let total = data.total();
    let shares = data
        .iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect();

    Proportions::Bars(shares)
}

/// Render a count map as one bar per line
pub fn render_bars(data: &CountMap, width: usize) -> String {
    let shares = match proportions(data) {
        Proportions::Empty => return format!("{}\n", NO_DATA),
        Proportions::Bars(shares) => shares,
    };

    let label_width = shares
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_LABEL_WIDTH);

    let mut out = String::new();
    for share in &shares {
        out.push_str(&format!(
            "{:<label_width$}  {}  {:>6}  {:>5.1}%\n",
            share.label,
            bar(share.percent, width),
            share.count,
            share.percent,
        ));
    }
    out
}

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u64)]) -> CountMap {
        entries.iter().map(|(l, c)| (*l, *c)).collect()
    }

    #[test]
    fn test_quarter_and_three_quarters() {
        let shares = match proportions(&map(&[("a", 1), ("b", 3)])) {
            Proportions::Bars(shares) => shares,
            Proportions::Empty => panic!("expected bars"),
        };

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].label, "a");
        assert_eq!(shares[0].percent, 25.0);
        assert_eq!(shares[1].label, "b");
        assert_eq!(shares[1].percent, 75.0);
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(proportions(&CountMap::new()), Proportions::Empty);
        assert_eq!(render_bars(&CountMap::new(), 20), "No data yet\n");
    }

    #[test]
    fn test_zero_total() {
        let shares = match proportions(&map(&[("a", 0), ("b", 0)])) {
            Proportions::Bars(shares) => shares,
            Proportions::Empty => panic!("expected bars"),
        };
        assert!(shares.iter().all(|s| s.percent == 0.0));

        let rendered = render_bars(&map(&[("a", 0)]), 4);
        assert!(rendered.contains("░░░░"));
        assert!(rendered.contains("0.0%"));
    }

    #[test]
    fn test_order_follows_map() {
        let rendered = render_bars(&map(&[("zeta", 1), ("alpha", 1)]), 10);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("zeta"));
        assert!(lines[1].starts_with("alpha"));
    }

    #[test]
    fn test_bar_lengths() {
        let rendered = render_bars(&map(&[("a", 1), ("b", 3)]), 8);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("██░░░░░░"));
        assert!(lines[0].contains("25.0%"));
        assert!(lines[1].contains("██████░░"));
        assert!(lines[1].contains("75.0%"));
    }

    #[test]
    fn test_huge_counts_render() {
        let data: CountMap =
            serde_json::from_str(r#"{"a": 18446744073709551615, "b": 1}"#).unwrap();
        let rendered = render_bars(&data, 10);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("██████████"));
        assert!(lines[0].contains("100.0%"));
        assert!(lines[1].contains("0.0%"));
    }

    #[test]
    fn test_full_bar() {
        assert_eq!(bar(100.0, 3), "███");
        assert_eq!(bar(0.0, 3), "░░░");
        assert_eq!(bar(50.0, 0), "");
    }
}
