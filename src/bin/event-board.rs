//! A terminal rendition of the events widget: list the upcoming events, show one of them, or export it as an iCal file

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use event_board::board::LoadState;
use event_board::client::Client;
use event_board::config::{AttributionPolicy, DescriptionPolicy};
use event_board::format::{EventDetail, EventRow, NO_DESCRIPTION};
use event_board::ical::IcsFile;
use event_board::{EventBoard, Settings};

#[derive(Parser)]
#[command(name = "event-board", about = "Show the upcoming events served by an events webhook")]
struct Cli {
    /// Pre-signed URL of the events webhook
    #[arg(long, env = "EVENT_BOARD_ENDPOINT")]
    endpoint: String,

    /// Time zone used to display dates (e.g. Europe/London)
    #[arg(long, default_value = "UTC")]
    zone: String,

    /// Request timeout, in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Only show "Last modified by" when the editor is not the author
    #[arg(long)]
    only_when_edited: bool,

    /// Strip markup from descriptions
    #[arg(long)]
    plain_text: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the events (this is the default)
    List,
    /// Show the details of an event, given its key in the list
    Show { key: i64 },
    /// Write the iCal file of an event, given its key in the list
    Export {
        key: i64,
        #[arg(long, default_value = ".")]
        folder: PathBuf,
    },
    /// Send a raw JSON body to the endpoint, and print its answer
    Probe {
        #[arg(default_value = "{}")]
        body: String,
    },
}


#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let zone: Tz = cli.zone.parse().map_err(|err| format!("Invalid time zone {}: {}", cli.zone, err))?;
    let attribution = if cli.only_when_edited { AttributionPolicy::OnlyWhenEditorDiffers } else { AttributionPolicy::AlwaysShowModified };
    let description = if cli.plain_text { DescriptionPolicy::PlainText } else { DescriptionPolicy::Trusted };

    let settings = Settings::new(&cli.endpoint)?
        .with_zone(zone)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_attribution(attribution)
        .with_description(description);
    let client = Client::new(settings.clone())?;

    if let Some(Commands::Probe { body }) = &cli.command {
        let body = serde_json::from_str(body)?;
        let answer = client.probe(body).await?;
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    let mut board = EventBoard::new(client);
    board.activate().await;
    if let LoadState::Failed(err) = board.state() {
        log::info!("First fetch failed ({}), retrying once", err);
        board.retry().await;
    }
    if let LoadState::Failed(err) = board.state() {
        return Err(format!("Error: {}", err).into());
    }

    let now = Utc::now();
    match cli.command {
        None | Some(Commands::List) => {
            println!("Upcoming Events");
            if board.events().is_empty() {
                println!("No upcoming events found.");
            }
            for (position, event) in board.events().iter().enumerate() {
                let row = EventRow::new(event, position, &settings, now);
                let past = if row.past { " (past)" } else { "" };
                println!("  [{}] {}{}", row.key, row, past);
            }
        },
        Some(Commands::Show { key }) => {
            let event = board.select_by_key(key).ok_or(format!("No event with key {}", key))?;
            print_detail(&EventDetail::new(event, &settings, now));
            board.dismiss();
        },
        Some(Commands::Export { key, folder }) => {
            let event = board.select_by_key(key).ok_or(format!("No event with key {}", key))?;
            let file = IcsFile::for_event(event, settings.identity(), settings.zone());
            let path = file.save_to_folder(&folder)?;
            println!("Saved {} ({})", path.display(), file.mime_type());
            board.dismiss();
        },
        Some(Commands::Probe { .. }) => unreachable!("handled before fetching"),
    }

    Ok(())
}

fn print_detail(detail: &EventDetail) {
    println!("[{}] {}", detail.date_box, detail.title);
    println!("{}", detail.category);
    println!();
    println!("Banner: {}", detail.banner_url.as_deref().unwrap_or(EventDetail::NO_BANNER));
    println!();
    println!("Description");
    println!("{}", detail.description.as_deref().unwrap_or(NO_DESCRIPTION));
    println!();
    println!("Date & Time");
    println!("{}", detail.date_time);
    println!();
    println!("Location");
    println!("{}", detail.location);
    if let Some(link) = &detail.map_link {
        println!("View Map: {}", link);
    }
    println!();
    println!("{}", detail.attribution.created);
    if let Some(modified) = &detail.attribution.modified {
        println!("{}", modified);
    }
}
