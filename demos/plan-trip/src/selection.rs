//! Interest selection parsing for the interactive prompt.

use trip_planner::Interest;

/// Parses a comma-separated list of catalogue numbers (1-based) or names.
///
/// Returns the offending token when an entry matches neither.
pub fn parse_selection(input: &str) -> Result<Vec<&'static str>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let by_number = token
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| Interest::ALL.get(idx).copied());
            by_number
                .or_else(|| token.parse::<Interest>().ok())
                .map(Interest::label)
                .ok_or_else(|| token.to_owned())
        })
        .collect()
}

/// Renders the catalogue as a numbered three-column grid.
pub fn catalogue_grid() -> String {
    Interest::ALL
        .chunks(3)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, interest)| format!("{:>2}. {:<14}", row * 3 + col + 1, interest.label()))
                .collect::<String>()
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_and_names() {
        let picked = parse_selection("1, coffee,8").unwrap();
        assert_eq!(picked, vec!["History", "Coffee", "Viewpoints"]);
    }

    #[test]
    fn blank_input_selects_nothing() {
        assert!(parse_selection(" , ").unwrap().is_empty());
    }

    #[test]
    fn reports_unknown_entries() {
        assert_eq!(parse_selection("2, 13").unwrap_err(), "13");
        assert_eq!(parse_selection("0").unwrap_err(), "0");
        assert_eq!(parse_selection("Skydiving").unwrap_err(), "Skydiving");
    }

    #[test]
    fn grid_lists_every_interest() {
        let grid = catalogue_grid();
        assert_eq!(grid.lines().count(), 4);
        assert!(grid.contains(" 1. History"));
        assert!(grid.contains("12. Music"));
    }
}
