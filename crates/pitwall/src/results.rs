use crate::ergast::{ErgastClient, ErgastConfig};
use crate::prelude::{print, println, *};
use crate::render::{format_header, format_hints};
use colored::{ColoredString, Colorize};
use pitwall_core::results::{build_results_output, DriverRow, PositionTier, ResultsOutput};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReadOptions {
    /// Season year, e.g. 2024
    #[arg(value_name = "YEAR")]
    pub season: u16,

    /// Round number within the season
    #[arg(value_name = "ROUND")]
    pub round: u32,

    /// Highlight drivers whose name contains this text
    #[arg(long, value_name = "TERM")]
    pub highlight: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ReadOptions, global: crate::Global) -> Result<()> {
    let config = ErgastConfig::from_env().with_overrides(global.base_url.clone());

    if global.verbose {
        println!("Ergast API Base: {}", config.base_url);
        println!(
            "Fetching results for round {} of the {} season...",
            options.round, options.season
        );
    }

    let client = ErgastClient::new(&config)?;
    let output = read_results_data(&client, &options).await?;

    if options.json {
        println!("{}", format_results_json(&output)?);
    } else {
        print!("{}", format_results_text(&output));
    }

    Ok(())
}

/// Fetches a race classification and returns it as a structured ResultsOutput
pub async fn read_results_data(
    client: &ErgastClient,
    options: &ReadOptions,
) -> Result<ResultsOutput> {
    let results = client
        .fetch_race_results(options.season, options.round)
        .await?;

    Ok(build_results_output(
        results,
        options.highlight.as_deref().unwrap_or_default(),
    ))
}

fn format_results_json(output: &ResultsOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn color_position(row: &DriverRow) -> ColoredString {
    let text = format!("P{}", row.position_text);
    match row.tier {
        PositionTier::Winner => text.bright_yellow().bold(),
        PositionTier::Second => text.white().bold(),
        PositionTier::Third => text.yellow(),
        PositionTier::Points => text.green(),
        PositionTier::Unplaced => text.bright_black(),
    }
}

fn format_driver_row(row: &DriverRow) -> String {
    let mut result = String::new();

    let name = if row.highlighted {
        format!("» {}", row.name).on_blue().bright_white().bold()
    } else {
        row.name.bright_white().bold()
    };
    let code = row
        .code
        .as_ref()
        .map(|code| format!(" ({code})"))
        .unwrap_or_default();

    result.push_str(&format!(
        "\n{} {}{} {}\n",
        color_position(row),
        name,
        code.bright_black(),
        format!("• {}", row.constructor).cyan()
    ));

    let status = if row.classified {
        row.time.clone().unwrap_or_else(|| row.status.clone()).green()
    } else {
        row.status.red()
    };
    result.push_str(&format!(
        "    {}: {}  {}: {}  {}: {}  {}: {}\n",
        "Points".green(),
        row.points,
        "Grid".green(),
        row.grid,
        "Laps".green(),
        row.laps,
        "Result".green(),
        status
    ));

    if let Some(fastest_lap) = &row.fastest_lap {
        result.push_str(&format!(
            "    {}: {}\n",
            "Fastest lap".green(),
            fastest_lap
        ));
    }

    result
}

/// Convert race results to formatted text with colors
fn format_results_text(output: &ResultsOutput) -> String {
    let race = &output.race;
    let mut result = format_header(&format!(
        "{} {} (Round {})",
        race.season,
        race.race_name.to_uppercase(),
        race.round
    ));

    result.push_str(&format!(
        "{} • {}, {} • {}\n",
        race.circuit.circuit_name.bright_white(),
        race.circuit.location.locality,
        race.circuit.location.country,
        race.formatted_date()
    ));

    if let Some(term) = &output.highlight {
        let summary = match output.highlighted_count {
            0 => format!("No drivers match \"{term}\""),
            1 => format!("1 driver matches \"{term}\""),
            n => format!("{n} drivers match \"{term}\""),
        };
        result.push_str(&format!("{}\n", summary.bright_blue()));
    }

    if output.drivers.is_empty() {
        result.push_str(&format!("\n{}\n", "No results for this race".yellow()));
    }

    for row in &output.drivers {
        result.push_str(&format_driver_row(row));
    }

    let example = output
        .drivers
        .first()
        .map(|row| row.name.clone())
        .unwrap_or_else(|| "<name>".to_string());
    result.push_str(&format_hints(&[
        (
            "To highlight a driver",
            format!(
                "pitwall results {} {} --highlight \"{}\"",
                race.season, race.round, example
            ),
        ),
        ("To go back to the season", format!("pitwall races {}", race.season)),
        (
            "To pin this race",
            format!("pitwall pins toggle {}-{}", race.season, race.round),
        ),
    ]));

    result
}
