//! Command execution against the configured itinerary store.

use crate::args::Commands;
use chrono::Local;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tripplan_core::model::itinerary::DATE_FORMAT;
use tripplan_core::view::links::extract_links;
use tripplan_core::{
    core_version, ping, timeline, total_amount, ConfigError, ItineraryDraft, ItineraryService,
    ItineraryStore, OwnerKey, RepoError, ServiceError,
};

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Store(RepoError),
    Service(ServiceError),
    Usage(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "failed to open store: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Usage(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Usage(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

pub type Service = ItineraryService<ItineraryStore>;

pub fn execute(command: Commands, service: &Service, owner: &OwnerKey) -> Result<(), CliError> {
    match command {
        Commands::Ping => {
            println!("tripplan_core ping={}", ping());
            println!("tripplan_core version={}", core_version());
        }
        Commands::List => {
            let summaries = service.summaries(owner)?;
            if summaries.is_empty() {
                println!("No itineraries.");
            }
            for summary in summaries {
                println!(
                    "{}  {}  {} .. {}  {} day(s)  {} item(s)  total {}",
                    summary.id,
                    summary.title,
                    summary.start_date.format(DATE_FORMAT),
                    summary.end_date.format(DATE_FORMAT),
                    summary.days,
                    summary.item_count,
                    summary.total_amount
                );
            }
        }
        Commands::Show { id } => {
            let itinerary = service.get(&id, owner)?;
            println!(
                "{} ({} .. {}, {} day(s))",
                itinerary.title,
                itinerary.start_date.format(DATE_FORMAT),
                itinerary.end_date.format(DATE_FORMAT),
                itinerary.trip_length_days()
            );
            for day in timeline(&itinerary.items) {
                let date = if day.date.is_empty() { "(no date)" } else { day.date };
                println!("{date}  subtotal {}", day.subtotal);
                for item in day.items {
                    let time = if item.time.is_empty() { "--:--" } else { item.time.as_str() };
                    println!("  {time}  {}  {}  [{}]", item.content, item.amount, item.id);
                    for link in extract_links(&item.note) {
                        println!("         link: {link}");
                    }
                }
            }
            println!("total {}", total_amount(&itinerary.items));
        }
        Commands::New { title, start, end } => {
            let draft = ItineraryDraft::new(title, start, end);
            let itinerary = service.create(draft, owner)?;
            println!("{}", itinerary.id);
        }
        Commands::AddItem {
            id,
            date,
            time,
            content,
            amount,
            note,
        } => {
            let mut draft = service.get(&id, owner)?.to_draft();
            let item = draft.add_item();
            if let Some(date) = date {
                item.date = date;
            }
            item.time = time;
            item.content = content;
            item.amount = amount;
            item.note = note;
            let item_id = item.id.clone();
            service.update(&id, draft, owner)?;
            println!("{item_id}");
        }
        Commands::MoveItem { id, from, to } => {
            let mut draft = service.get(&id, owner)?.to_draft();
            if !draft.move_item(from, to) {
                return Err(CliError::Usage(format!(
                    "item index out of range: {from} -> {to} ({} item(s))",
                    draft.items.len()
                )));
            }
            service.update(&id, draft, owner)?;
        }
        Commands::RemoveItem { id, item_id } => {
            let mut draft = service.get(&id, owner)?.to_draft();
            if !draft.remove_item(&item_id) {
                return Err(CliError::Usage(format!("no item `{item_id}` in `{id}`")));
            }
            service.update(&id, draft, owner)?;
        }
        Commands::Delete { id } => service.delete(&id, owner)?,
        Commands::Export { id, out } => {
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let path = service.export_to_dir(&id, &dir, Local::now().date_naive(), owner)?;
            println!("{}", path.display());
        }
        Commands::Import { file } => {
            let itinerary = service.import_file(&file, owner)?;
            println!("{}", itinerary.id);
        }
    }
    Ok(())
}
