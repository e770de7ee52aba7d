//! Console results table.

use newslab_core::domain::{CorrelationResult, TickerOutcome};

/// Format correlation results rounded to 4 decimals, followed by any tickers
/// that were left out and why.
pub fn format_results_table(results: &[CorrelationResult], outcomes: &[TickerOutcome]) -> String {
    let mut out = String::new();

    if results.is_empty() {
        out.push_str("No ticker had enough data for a correlation.\n");
    } else {
        out.push_str(&format!(
            "{:<8} {:>12} {:>10} {:>9} {:>14}\n",
            "ticker", "correlation", "p_value", "num_days", "avg_sentiment"
        ));
        out.push_str(&"-".repeat(57));
        out.push('\n');
        for r in results {
            out.push_str(&format!(
                "{:<8} {:>12.4} {:>10.4} {:>9} {:>14.4}\n",
                r.ticker, r.correlation, r.p_value, r.num_days, r.avg_sentiment
            ));
        }
    }

    let skipped: Vec<_> = outcomes.iter().filter(|o| !o.is_correlated()).collect();
    if !skipped.is_empty() {
        out.push_str("\nSkipped:\n");
        for o in skipped {
            out.push_str(&format!("  {:<8} {}\n", o.ticker, o.describe()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use newslab_core::domain::OutcomeStatus;

    fn result(ticker: &str, r: f64) -> CorrelationResult {
        CorrelationResult {
            ticker: ticker.into(),
            correlation: r,
            p_value: 0.123456,
            num_days: 120,
            avg_sentiment: 0.0987654,
        }
    }

    #[test]
    fn rows_are_rounded_to_four_places() {
        let table = format_results_table(&[result("AAPL", 0.1234567)], &[]);
        let line = table.lines().nth(2).unwrap();
        assert!(line.starts_with("AAPL"));
        assert!(line.contains("0.1235"));
        assert!(line.contains("0.0988"));
        assert!(line.contains("120"));
        assert!(!table.contains("Skipped"));
    }

    #[test]
    fn skipped_tickers_are_listed_with_reason() {
        let outcomes = vec![
            TickerOutcome {
                ticker: "AAPL".into(),
                rows: 120,
                status: OutcomeStatus::Correlated,
            },
            TickerOutcome {
                ticker: "XYZ".into(),
                rows: 4,
                status: OutcomeStatus::InsufficientData { required: 11 },
            },
        ];
        let table = format_results_table(&[result("AAPL", -0.2)], &outcomes);
        assert!(table.contains("-0.2000"));
        assert!(table.contains("Skipped:"));
        assert!(table.contains("XYZ      insufficient data (4 rows, need 11)"));
        assert!(!table.contains("  AAPL"));
    }

    #[test]
    fn no_results_message() {
        let table = format_results_table(&[], &[]);
        assert!(table.starts_with("No ticker had enough data"));
    }
}
