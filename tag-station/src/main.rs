use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use shared::{Draft, LabelContent, LabelId, QueuedLabel, models::MAX_FEATURES};
use tag_station::printing::format_price;
use tag_station::{Config, LabelPrintService, NetworkGateway, init_logger_with_file, open_station};

/// Queue and print 4"x2" price labels on a ZPL printer
#[derive(Debug, Parser)]
#[command(name = "tag-station", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a label to the queue
    Add {
        name: String,
        price: String,
        /// Feature line (up to 3)
        #[arg(short, long = "feature")]
        features: Vec<String>,
    },
    /// List queued labels
    List,
    /// Remove a queued label
    Remove { id: LabelId },
    /// Change a queued label (it moves to the end of the queue)
    Edit {
        id: LabelId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        /// Replace all feature lines
        #[arg(short, long = "feature")]
        features: Option<Vec<String>>,
    },
    /// Show the ZPL for one label, or for the whole queue
    Zpl { id: Option<LabelId> },
    /// Render a label without queueing it
    Preview {
        #[arg(default_value = "")]
        name: String,
        #[arg(default_value = "")]
        price: String,
        #[arg(short, long = "feature")]
        features: Vec<String>,
    },
    /// Print the queue
    Print {
        /// Resume at this queue index after a partial failure
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Empty the queue
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let station = open_station(&config).context("failed to open station")?;
    run(cli.command, &station).await
}

async fn run(command: Command, station: &LabelPrintService<NetworkGateway>) -> anyhow::Result<()> {
    match command {
        Command::Add {
            name,
            price,
            features,
        } => {
            let label = station.add(&draft(name, price, features)?)?;
            println!("{}", label.id());
        }
        Command::List => {
            for (index, label) in station.labels().iter().enumerate() {
                print_row(index, label);
            }
        }
        Command::Remove { id } => {
            station.remove(id)?;
        }
        Command::Edit {
            id,
            name,
            price,
            features,
        } => {
            let mut draft = Draft::from(&station.get(id)?);
            if let Some(name) = name {
                draft.product_name = name;
            }
            if let Some(price) = price {
                draft.price = price;
            }
            if let Some(features) = features {
                draft.features = feature_slots(features)?;
            }
            let label = station.replace(id, &draft)?;
            println!("{}", label.id());
        }
        Command::Zpl { id: Some(id) } => {
            print!("{}", station.zpl_for(id)?);
        }
        Command::Zpl { id: None } => {
            for label in station.labels() {
                print!("{}", station.executor().encode(&label));
            }
        }
        Command::Preview {
            name,
            price,
            features,
        } => match station.preview(&draft(name, price, features)?) {
            Some(zpl) => print!("{}", zpl),
            None => bail!("nothing to preview: give a name or a price"),
        },
        Command::Print { from } => {
            let outcome = station.print_from(from).await?;
            if !outcome.is_success() {
                bail!(outcome.status_message());
            }
            println!("{}", outcome.status_message());
        }
        Command::Clear => {
            let removed = station.clear()?;
            println!("Removed {} label(s)", removed);
        }
    }
    Ok(())
}

fn draft(name: String, price: String, features: Vec<String>) -> anyhow::Result<Draft> {
    Ok(Draft {
        product_name: name,
        price,
        features: feature_slots(features)?,
    })
}

fn feature_slots(features: Vec<String>) -> anyhow::Result<[String; MAX_FEATURES]> {
    if features.len() > MAX_FEATURES {
        bail!("at most {} features are allowed", MAX_FEATURES);
    }
    let mut slots: [String; MAX_FEATURES] = Default::default();
    for (slot, feature) in slots.iter_mut().zip(features) {
        *slot = feature;
    }
    Ok(slots)
}

fn print_row(index: usize, label: &QueuedLabel) {
    let created = chrono::DateTime::from_timestamp_millis(label.created_at())
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let features = label.features().len();
    println!(
        "{:>3}  {}  {}  {:<40}  {:>10}  {} feature(s)",
        index,
        label.id(),
        created,
        label.product_name(),
        format_price(label.price()),
        features
    );
}
