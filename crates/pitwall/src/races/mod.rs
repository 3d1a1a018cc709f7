use crate::ergast::{ErgastClient, ErgastConfig, ALL_RACES_LIMIT};
use crate::prelude::{print, println, *};
use crate::render::{format_header, format_hints, format_navigation, format_section};
use colored::Colorize;
use pitwall_core::ergast::Race;
use pitwall_core::listing::{Listable, ListingState, PageWindow, DEFAULT_PAGE_SIZE};
use pitwall_core::state::{ListOutput, ListingAction, ListingModel};
use pitwall_core::view::ViewMode;

pub mod browse;

const PIN_MARKER: &str = "📌";

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Season year, e.g. 2024
    #[arg(value_name = "YEAR")]
    pub year: u16,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Number of races per page
    #[arg(short, long, env = "PITWALL_LIMIT", default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: usize,

    /// Layout: card or list
    #[arg(short, long, env = "PITWALL_VIEW", default_value = "card")]
    pub view: ViewMode,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Browse the season interactively
    #[arg(long, conflicts_with = "json")]
    pub browse: bool,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = ErgastConfig::from_env().with_overrides(global.base_url.clone());

    if global.verbose {
        println!("Ergast API Base: {}", config.base_url);
        println!(
            "Fetching races for season {} (page {})...",
            options.year, options.page
        );
    }

    let client = ErgastClient::new(&config)?;
    let pins = crate::pins::open_pins(&global);

    if options.browse {
        return browse::run(&client, &options, &pins).await;
    }

    let model = new_model(&options, pins.load())?;
    let model = load_page(&client, model, options.year, options.page).await;

    if let Some(message) = model.error() {
        return Err(Error::Fetch(message.to_string()).into());
    }

    let output = race_output(&model, options.year);

    if options.json {
        println!("{}", format_races_json(&output)?);
    } else {
        print!("{}", format_races_text(&output, options.year));
    }

    Ok(())
}

pub fn list_command(year: u16) -> String {
    format!("pitwall races {year}")
}

pub fn new_model(options: &ListOptions, pins: Vec<String>) -> Result<ListingModel<Race>> {
    let window = PageWindow::new(options.page, options.limit)
        .map_err(|e| Error::InvalidPage(e.to_string()))?;
    Ok(ListingModel::new(window, options.view, pins))
}

/// Requests `page` and applies the responses to the model
///
/// A page the window rejects leaves the model untouched and fetches nothing.
/// The whole season is fetched alongside the page while the model has not
/// seen it yet; the pinned group is drawn from it. A failed season fetch only
/// empties the pinned group, a failed page fetch becomes the model's error.
pub async fn load_page(
    client: &ErgastClient,
    model: ListingModel<Race>,
    season: u16,
    page: usize,
) -> ListingModel<Race> {
    let model = model.reduce(ListingAction::PageRequested { page });
    if !model.is_loading() {
        log::debug!("Page {page} rejected; keeping page {}", model.page());
        return model;
    }
    let request = model.latest_request();
    let window = model.window();
    let needs_all = model.all_items().is_empty();

    let (all_races, page_races) = futures::join!(
        async {
            if needs_all {
                Some(client.fetch_races(season, 0, ALL_RACES_LIMIT).await)
            } else {
                None
            }
        },
        client.fetch_races(season, window.offset(), window.limit())
    );

    let model = match all_races {
        Some(Ok(all)) => model.reduce(ListingAction::AllItemsLoaded(all.items)),
        Some(Err(err)) => {
            log::warn!("{err}");
            model
        }
        None => model,
    };

    match page_races {
        Ok(page) => model.reduce(ListingAction::PageLoaded {
            request,
            items: page.items,
            total: page.total,
        }),
        Err(err) => model.reduce(ListingAction::PageFailed {
            request,
            message: err.to_string(),
        }),
    }
}

pub fn race_output(model: &ListingModel<Race>, year: u16) -> ListOutput<Race> {
    model.output(&year.to_string(), &list_command(year))
}

fn format_races_json(output: &ListOutput<Race>) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_race_cards(races: &[Race], pinned: bool) -> String {
    let mut result = String::new();

    for race in races {
        let marker = if pinned { PIN_MARKER } else { " " };
        result.push_str(&format!(
            "\n{} {} {}\n",
            marker,
            format!("[Round {}]", race.round).yellow().bold(),
            race.race_name.white().bold()
        ));
        result.push_str(&format!(
            "    {}: {}\n",
            "Circuit".green(),
            race.circuit.circuit_name.bright_white()
        ));
        result.push_str(&format!(
            "    {}: {}, {}\n",
            "Location".green(),
            race.circuit.location.locality,
            race.circuit.location.country
        ));
        result.push_str(&format!(
            "    {}: {}\n",
            "Date".green(),
            race.formatted_date().bright_white()
        ));
        result.push_str(&format!(
            "    {}: {}\n",
            "Results".green(),
            format!("pitwall results {} {}", race.season, race.round).cyan()
        ));
    }

    result
}

fn format_race_table(races: &[Race], pinned: bool) -> String {
    let mut table = new_table();
    table.add_row(prettytable::row!["", "Round", "Race", "Circuit", "Country", "Date"]);

    for race in races {
        table.add_row(prettytable::row![
            if pinned { PIN_MARKER } else { "" },
            race.round,
            race.race_name,
            race.circuit.circuit_name,
            race.circuit.location.country,
            race.formatted_date()
        ]);
    }

    format!("\n{table}")
}

fn format_race_group(races: &[Race], view: ViewMode, pinned: bool) -> String {
    match view {
        ViewMode::Card => format_race_cards(races, pinned),
        ViewMode::List => format_race_table(races, pinned),
    }
}

/// Convert races output to formatted text with colors
fn format_races_text(output: &ListOutput<Race>, year: u16) -> String {
    let command = list_command(year);
    let pagination = &output.pagination;

    let mut result = format_header(&format!(
        "{} FORMULA ONE RACES (Page {} of {})",
        year,
        pagination.current_page,
        pagination.total_pages.max(1)
    ));

    let mut summary = format!("{} races", pagination.total_items);
    if !output.pinned.is_empty() {
        summary.push_str(&format!(" • {} pinned", output.pinned.len()));
    }
    result.push_str(&format!("{}\n", summary.bright_white()));

    if output.state == ListingState::Empty {
        result.push_str(&format!(
            "\n{}\n{}\n",
            "No races found".yellow(),
            "There are no races to display for this season.".bright_black()
        ));
    } else {
        if !output.pinned.is_empty() {
            result.push_str(&format_section(&format!(
                "{} PINNED RACES ({})",
                PIN_MARKER,
                output.pinned.len()
            )));
            result.push_str(&format_race_group(&output.pinned, output.view, true));

            if !output.items.is_empty() {
                result.push_str(&format_section("ALL RACES"));
            }
        }

        match output.state {
            ListingState::Populated => {
                result.push_str(&format_race_group(&output.items, output.view, false));
            }
            ListingState::PageFullyPinned => {
                result.push_str(&format!(
                    "\n{}\n",
                    "No more races on this page. All races from this page are pinned above."
                        .yellow()
                ));
            }
            ListingState::PageEmpty => {
                result.push_str(&format!("\n{}\n", "No races on this page.".yellow()));
            }
            ListingState::Empty => {}
        }
    }

    result.push_str(&format_navigation(pagination, &command, "races"));

    let example = output
        .pinned
        .iter()
        .chain(output.items.iter())
        .next()
        .map(|race| race.listing_id())
        .unwrap_or_else(|| format!("{year}-1"));
    let round = example.rsplit('-').next().unwrap_or("1").to_string();
    result.push_str(&format_hints(&[
        ("To see race results", format!("pitwall results {year} {round}")),
        ("To pin or unpin a race", format!("pitwall pins toggle {example}")),
        ("To switch layout", format!("{command} --view {}", output.view.toggled())),
        ("To browse interactively", format!("{command} --browse")),
    ]));

    result
}
