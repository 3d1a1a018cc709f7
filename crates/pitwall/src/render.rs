//! Terminal rendering shared by the listing commands

use colored::Colorize;
use pitwall_core::listing::{PageSlot, PaginationInfo};

const RULE_WIDTH: usize = 80;

/// Banner with a title, e.g. `2024 FORMULA ONE RACES (Page 1 of 3)`
pub fn format_header(title: &str) -> String {
    let mut result = String::new();
    result.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));
    result.push_str(&format!("{}\n", title.bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).bright_cyan()));
    result
}

/// Title of a section inside a listing, e.g. `PINNED RACES (2)`
pub fn format_section(title: &str) -> String {
    format!("\n{}\n{}\n", title.bright_yellow().bold(), "-".repeat(RULE_WIDTH).bright_black())
}

/// Page selector line: `‹ 1 … 4 [5] 6 … 10 ›`
pub fn format_page_selector(pagination: &PaginationInfo) -> String {
    let mut parts: Vec<String> = Vec::new();

    if pagination.current_page > 1 {
        parts.push("‹".to_string());
    }

    for slot in &pagination.pages {
        match slot {
            PageSlot::Page(page) if *page == pagination.current_page => {
                parts.push(format!("[{page}]").bright_cyan().bold().to_string());
            }
            PageSlot::Page(page) => parts.push(page.to_string()),
            PageSlot::Ellipsis => parts.push("…".to_string()),
        }
    }

    if pagination.current_page < pagination.total_pages {
        parts.push("›".to_string());
    }

    parts.join(" ")
}

/// Pagination summary and navigation commands
///
/// Nothing is rendered for listings that fit on a single page.
pub fn format_navigation(pagination: &PaginationInfo, command: &str, noun: &str) -> String {
    let mut result = String::new();

    if !pagination.is_needed() {
        return result;
    }

    result.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH).bright_yellow()));
    result.push_str(&format!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH).bright_yellow()));

    if pagination.has_items_on_page() {
        result.push_str(&format!(
            "\n{} {} {} {} {} {} {}\n",
            "Showing".bright_white(),
            pagination.first_item.to_string().bright_cyan().bold(),
            "to".bright_white(),
            pagination.last_item.to_string().bright_cyan().bold(),
            "of".bright_white(),
            pagination.total_items.to_string().bright_cyan().bold(),
            noun.bright_white()
        ));
    } else {
        result.push_str(&format!(
            "\n{} {} {}\n",
            format!("Page {} is past the last page of", pagination.current_page).bright_white(),
            pagination.total_items.to_string().bright_cyan().bold(),
            noun.bright_white()
        ));
    }
    result.push_str(&format!("\n  {}\n", format_page_selector(pagination)));

    result.push_str(&format!("\n{}:\n", "To navigate".bright_white().bold()));
    if let Some(next) = &pagination.next_page_command {
        result.push_str(&format!("  {}: {}\n", "Next page".green(), next.cyan()));
    }
    if let Some(prev) = &pagination.prev_page_command {
        result.push_str(&format!("  {}: {}\n", "Previous page".green(), prev.cyan()));
    }
    if pagination.current_page == pagination.total_pages && pagination.current_page > 1 {
        result.push_str(&format!(
            "  {}: {}\n",
            "First page".green(),
            format!("{command} --page 1").cyan()
        ));
    }

    result.push_str(&format!("\n{}:\n", "To change page size".bright_white().bold()));
    result.push_str(&format!("  {}\n", format!("{command} --limit <number>").cyan()));

    result
}

/// Usage hints printed below every listing
pub fn format_hints(hints: &[(&str, String)]) -> String {
    let mut result = String::new();
    for (label, command) in hints {
        result.push_str(&format!("\n{}:\n", label.bright_white().bold()));
        result.push_str(&format!("  {}\n", command.cyan()));
    }
    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_core::listing::{build_pagination, PageWindow};

    fn create_test_pagination(page: usize, total: usize) -> PaginationInfo {
        build_pagination(PageWindow::new(page, 8).unwrap(), total, "pitwall seasons")
    }

    #[test]
    fn test_format_header() {
        let header = format_header("FORMULA ONE SEASONS (Page 1 of 10)");

        assert!(header.contains("FORMULA ONE SEASONS (Page 1 of 10)"));
        assert!(header.contains("=".repeat(80).as_str()));
    }

    #[test]
    fn test_format_page_selector_middle() {
        let selector = format_page_selector(&create_test_pagination(5, 80));

        assert!(selector.contains("[5]"));
        assert!(selector.contains("…"));
        assert!(selector.starts_with("‹ 1"));
        assert!(selector.ends_with("10 ›"));
    }

    #[test]
    fn test_format_page_selector_first_page() {
        let selector = format_page_selector(&create_test_pagination(1, 24));

        assert!(!selector.contains("‹"));
        assert!(selector.contains("[1]"));
        assert!(selector.ends_with("3 ›"));
    }

    #[test]
    fn test_format_navigation_single_page() {
        let navigation =
            format_navigation(&create_test_pagination(1, 5), "pitwall seasons", "seasons");
        assert!(navigation.is_empty());
    }

    #[test]
    fn test_format_navigation_page_past_the_end() {
        let navigation =
            format_navigation(&create_test_pagination(20, 76), "pitwall seasons", "seasons");

        assert!(!navigation.contains("Showing"));
        assert!(navigation.contains("Page 20 is past the last page of"));
        assert!(navigation.contains("pitwall seasons --page 19"));
    }

    #[test]
    fn test_format_navigation_first_page() {
        let navigation =
            format_navigation(&create_test_pagination(1, 24), "pitwall seasons", "seasons");

        assert!(navigation.contains("NAVIGATION"));
        assert!(navigation.contains("Showing"));
        assert!(navigation.contains("Next page"));
        assert!(navigation.contains("pitwall seasons --page 2"));
        assert!(!navigation.contains("Previous page"));
        assert!(navigation.contains("pitwall seasons --limit <number>"));
    }

    #[test]
    fn test_format_navigation_last_page() {
        let navigation =
            format_navigation(&create_test_pagination(3, 24), "pitwall seasons", "seasons");

        assert!(!navigation.contains("Next page"));
        assert!(navigation.contains("Previous page"));
        assert!(navigation.contains("First page"));
        assert!(navigation.contains("pitwall seasons --page 1"));
    }

    #[test]
    fn test_format_hints() {
        let hints = format_hints(&[("To get JSON output", "pitwall seasons --json".to_string())]);

        assert!(hints.contains("To get JSON output"));
        assert!(hints.contains("pitwall seasons --json"));
    }
}
