use crate::ergast::{ErgastClient, ErgastConfig};
use crate::prelude::{print, println, *};
use crate::render::{format_header, format_hints, format_navigation};
use colored::Colorize;
use pitwall_core::ergast::Season;
use pitwall_core::listing::{PageWindow, DEFAULT_PAGE_SIZE};
use pitwall_core::state::{ListOutput, ListingAction, ListingModel};
use pitwall_core::view::ViewMode;

const COMMAND: &str = "pitwall seasons";

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Number of seasons per page
    #[arg(short, long, env = "PITWALL_LIMIT", default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: usize,

    /// Layout: card or list
    #[arg(short, long, env = "PITWALL_VIEW", default_value = "card")]
    pub view: ViewMode,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = ErgastConfig::from_env().with_overrides(global.base_url.clone());

    if global.verbose {
        println!("Ergast API Base: {}", config.base_url);
        println!("Fetching seasons (page {})...", options.page);
    }

    let client = ErgastClient::new(&config)?;
    let output = list_seasons_data(&client, &options).await?;

    if options.json {
        println!("{}", format_seasons_json(&output)?);
    } else {
        print!("{}", format_seasons_text(&output));
    }

    Ok(())
}

/// Fetches one page of seasons and returns it as a structured ListOutput
pub async fn list_seasons_data(
    client: &ErgastClient,
    options: &ListOptions,
) -> Result<ListOutput<Season>> {
    let window = PageWindow::new(options.page, options.limit)
        .map_err(|e| Error::InvalidPage(e.to_string()))?;

    let model = ListingModel::new(window, options.view, Vec::new())
        .reduce(ListingAction::PageRequested { page: window.page() });
    let request = model.latest_request();

    let model = match client.fetch_seasons(window.offset(), window.limit()).await {
        Ok(page) => model.reduce(ListingAction::PageLoaded {
            request,
            items: page.items,
            total: page.total,
        }),
        Err(err) => model.reduce(ListingAction::PageFailed {
            request,
            message: err.to_string(),
        }),
    };

    if let Some(message) = model.error() {
        return Err(Error::Fetch(message.to_string()).into());
    }

    Ok(model.output("seasons", COMMAND))
}

fn format_seasons_json(output: &ListOutput<Season>) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_season_cards(seasons: &[Season]) -> String {
    let mut result = String::new();

    for season in seasons {
        result.push_str(&format!(
            "\n{} {}\n",
            format!("[{}]", season.year).yellow().bold(),
            format!("{} Formula One Season", season.year).white().bold()
        ));
        if !season.url.is_empty() {
            result.push_str(&format!(
                "    {}: {}\n",
                "Wikipedia".green(),
                season.url.cyan().underline()
            ));
        }
        result.push_str(&format!(
            "    {}: {}\n",
            "Races".green(),
            format!("pitwall races {}", season.year).cyan()
        ));
    }

    result
}

fn format_season_table(seasons: &[Season]) -> String {
    let mut table = new_table();
    table.add_row(prettytable::row!["Season", "Races", "Wikipedia"]);

    for season in seasons {
        table.add_row(prettytable::row![
            season.year,
            format!("pitwall races {}", season.year),
            season.url
        ]);
    }

    format!("\n{table}")
}

/// Convert seasons output to formatted text with colors
fn format_seasons_text(output: &ListOutput<Season>) -> String {
    let pagination = &output.pagination;
    let mut result = format_header(&format!(
        "FORMULA ONE SEASONS (Page {} of {})",
        pagination.current_page,
        pagination.total_pages.max(1)
    ));

    result.push_str(&format!(
        "{}\n",
        format!(
            "Explore {} Formula One seasons and their races",
            pagination.total_items
        )
        .bright_white()
    ));

    if output.items.is_empty() {
        let message = if pagination.total_items == 0 {
            "No seasons found. There are no Formula One seasons to display at the moment."
        } else {
            "No seasons on this page."
        };
        result.push_str(&format!("\n{}\n", message.yellow()));
    } else {
        match output.view {
            ViewMode::Card => result.push_str(&format_season_cards(&output.items)),
            ViewMode::List => result.push_str(&format_season_table(&output.items)),
        }
    }

    result.push_str(&format_navigation(pagination, COMMAND, "seasons"));

    let example = output
        .items
        .first()
        .map(|season| season.year.to_string())
        .unwrap_or_else(|| "<year>".to_string());
    result.push_str(&format_hints(&[
        ("To list the races of a season", format!("pitwall races {example}")),
        ("To switch layout", format!("{COMMAND} --view {}", output.view.toggled())),
        ("To get JSON output", format!("{COMMAND} --json")),
    ]));

    result
}
