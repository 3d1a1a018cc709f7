//! Interactive season browser
//!
//! Reads one command per line from stdin and feeds it through the listing
//! reducer, re-rendering the page after every change.

use super::{format_races_text, load_page, new_model, race_output, ListOptions};
use crate::ergast::ErgastClient;
use crate::prelude::{eprintln, print, println, *};
use colored::Colorize;
use pitwall_core::ergast::{race_id, Race};
use pitwall_core::pins::{FaultSink, PinStore, Pins};
use pitwall_core::state::{ListingAction, ListingModel};
use pitwall_core::view::ViewMode;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Goto(usize),
    ToggleView,
    SetView(ViewMode),
    TogglePin(u32),
    Help,
    Quit,
}

/// Parse one input line; `None` for anything unrecognised
pub fn parse_command(line: &str) -> Option<BrowseCommand> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let argument = parts.next();

    if parts.next().is_some() {
        return None;
    }

    match (command, argument) {
        ("n" | "next", None) => Some(BrowseCommand::Next),
        ("p" | "prev", None) => Some(BrowseCommand::Prev),
        ("g" | "goto", Some(page)) => page.parse().ok().map(BrowseCommand::Goto),
        ("v" | "view", None) => Some(BrowseCommand::ToggleView),
        ("v" | "view", Some(view)) => view.parse().ok().map(BrowseCommand::SetView),
        ("t" | "pin", Some(round)) => round.parse().ok().map(BrowseCommand::TogglePin),
        ("h" | "help" | "?", None) => Some(BrowseCommand::Help),
        ("q" | "quit" | "exit", None) => Some(BrowseCommand::Quit),
        _ => None,
    }
}

/// Page a navigation command leads to, or `None` when it would leave the listing
pub fn target_page(command: BrowseCommand, current: usize, total_pages: usize) -> Option<usize> {
    let target = match command {
        BrowseCommand::Next => current + 1,
        BrowseCommand::Prev => current.checked_sub(1)?,
        BrowseCommand::Goto(page) => page,
        _ => return None,
    };

    (target >= 1 && target <= total_pages.max(1) && target != current).then_some(target)
}

fn format_help() -> String {
    let commands = [
        ("n", "next page"),
        ("p", "previous page"),
        ("g <page>", "go to page"),
        ("v", "switch between card and list layout"),
        ("v <view>", "use the card or list layout"),
        ("t <round>", "pin or unpin a race"),
        ("q", "quit"),
    ];

    let mut result = format!("\n{}\n", "Commands".bright_white().bold());
    for (keys, description) in commands {
        result.push_str(&format!("  {} {}\n", format!("{keys:<10}").cyan(), description));
    }
    result
}

/// Confirmation for a pin toggle of `round`, read back from the model
pub fn pin_status(model: &ListingModel<Race>, round: u32) -> String {
    match model.all_items().iter().find(|race| race.round == round) {
        Some(race) if model.is_pinned(race) => format!("Pinned {}", race.race_name),
        Some(race) => format!("Unpinned {}", race.race_name),
        None => format!("Round {round} is not part of this season"),
    }
}

fn render(model: &ListingModel<Race>, year: u16) {
    match model.error() {
        Some(message) => eprintln!("{}", message.red()),
        None => print!("{}", format_races_text(&race_output(model, year), year)),
    }
}

pub async fn run<S: PinStore, F: FaultSink>(
    client: &ErgastClient,
    options: &ListOptions,
    pins: &Pins<S, F>,
) -> Result<()> {
    let year = options.year;
    let model = new_model(options, pins.load())?;
    let mut model = load_page(client, model, year, options.page).await;

    render(&model, year);
    print!("{}", format_help());

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut line = String::new();

    loop {
        print!("{} ", ">".bright_cyan().bold());
        std::io::stdout().flush()?;

        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        let Some(command) = parse_command(trimmed) else {
            if !trimmed.is_empty() {
                println!("{} {}", "Unknown command:".yellow(), trimmed);
            }
            continue;
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => print!("{}", format_help()),
            BrowseCommand::ToggleView => {
                model = model.reduce(ListingAction::ViewToggled);
                render(&model, year);
            }
            BrowseCommand::SetView(view) => {
                model = model.reduce(ListingAction::ViewChanged(view));
                render(&model, year);
            }
            BrowseCommand::TogglePin(round) => {
                if !model.all_items().iter().any(|race| race.round == round) {
                    println!("{}", pin_status(&model, round).yellow());
                    continue;
                }
                let updated = pins.toggle(&race_id(year, round));
                model = model.reduce(ListingAction::PinsChanged(updated));
                render(&model, year);
                println!("{}", pin_status(&model, round).green());
            }
            BrowseCommand::Next | BrowseCommand::Prev | BrowseCommand::Goto(_) => {
                match target_page(command, model.page(), model.total_pages()) {
                    Some(page) => {
                        model = load_page(client, model, year, page).await;
                        render(&model, year);
                    }
                    None => println!("{}", "No such page".yellow()),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::races::tests::create_test_race;
    use pitwall_core::listing::PageWindow;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("n"), Some(BrowseCommand::Next));
        assert_eq!(parse_command(" p "), Some(BrowseCommand::Prev));
        assert_eq!(parse_command("g 3"), Some(BrowseCommand::Goto(3)));
        assert_eq!(parse_command("v"), Some(BrowseCommand::ToggleView));
        assert_eq!(
            parse_command("v list"),
            Some(BrowseCommand::SetView(ViewMode::List))
        );
        assert_eq!(
            parse_command("view card"),
            Some(BrowseCommand::SetView(ViewMode::Card))
        );
        assert_eq!(parse_command("t 5"), Some(BrowseCommand::TogglePin(5)));
        assert_eq!(parse_command("q"), Some(BrowseCommand::Quit));
        assert_eq!(parse_command("help"), Some(BrowseCommand::Help));
    }

    #[test]
    fn test_parse_command_rejects_bad_input() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("g"), None);
        assert_eq!(parse_command("g two"), None);
        assert_eq!(parse_command("t -1"), None);
        assert_eq!(parse_command("n 2"), None);
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("g 1 2"), None);
        assert_eq!(parse_command("v grid"), None);
    }

    #[test]
    fn test_target_page() {
        assert_eq!(target_page(BrowseCommand::Next, 1, 3), Some(2));
        assert_eq!(target_page(BrowseCommand::Next, 3, 3), None);
        assert_eq!(target_page(BrowseCommand::Prev, 2, 3), Some(1));
        assert_eq!(target_page(BrowseCommand::Prev, 1, 3), None);
        assert_eq!(target_page(BrowseCommand::Goto(3), 1, 3), Some(3));
        assert_eq!(target_page(BrowseCommand::Goto(0), 1, 3), None);
        assert_eq!(target_page(BrowseCommand::Goto(4), 1, 3), None);
        assert_eq!(target_page(BrowseCommand::Goto(1), 1, 3), None);
        assert_eq!(target_page(BrowseCommand::ToggleView, 1, 3), None);
    }

    #[test]
    fn test_target_page_empty_listing() {
        assert_eq!(target_page(BrowseCommand::Next, 1, 0), None);
        assert_eq!(target_page(BrowseCommand::Prev, 1, 0), None);
    }

    fn create_test_model(pins: &[&str]) -> ListingModel<Race> {
        ListingModel::new(
            PageWindow::new(1, 8).unwrap(),
            ViewMode::Card,
            pins.iter().map(|pin| pin.to_string()).collect(),
        )
        .reduce(ListingAction::AllItemsLoaded(vec![
            create_test_race(1),
            create_test_race(2),
        ]))
    }

    #[test]
    fn test_pin_status() {
        let model = create_test_model(&["2024-2"]);

        assert_eq!(pin_status(&model, 2), "Pinned Grand Prix 2");
        assert_eq!(pin_status(&model, 1), "Unpinned Grand Prix 1");
        assert_eq!(pin_status(&model, 9), "Round 9 is not part of this season");
    }

    #[test]
    fn test_pin_status_follows_pins_changed() {
        let model = create_test_model(&[])
            .reduce(ListingAction::PinsChanged(vec!["2024-1".to_string()]));

        assert_eq!(pin_status(&model, 1), "Pinned Grand Prix 1");
    }

    #[test]
    fn test_set_view_dispatch() {
        let model = create_test_model(&[]).reduce(ListingAction::ViewChanged(ViewMode::List));

        assert_eq!(model.view(), ViewMode::List);
        let output = race_output(&model, 2024);
        assert_eq!(output.view, ViewMode::List);
    }

    #[test]
    fn test_format_help() {
        let help = format_help();
        assert!(help.contains("Commands"));
        assert!(help.contains("next page"));
        assert!(help.contains("pin or unpin a race"));
    }
}
