use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ibmcloud_sdk::ibm::http::format_error;
use ibmcloud_sdk::object_storage::ObjectStorage;
use ibmcloud_sdk::resource::{dispatch, extract_json_value, get_all_resource_keys, resource_def};
use ibmcloud_sdk::{Config, IbmClient};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Version injected at compile time via ICSDK_VERSION env var, or "dev" for
/// local builds.
pub const VERSION: &str = match option_env!("ICSDK_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// Command line front end for the IBM Cloud SDK
#[derive(Parser, Debug)]
#[command(name = "icsdk", version = VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Print raw JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered resource kinds
    Kinds,
    /// List every resource of a kind
    List {
        kind: String,
        /// Enclosing resource, outermost first (repeatable)
        #[arg(short, long = "parent")]
        parents: Vec<String>,
        /// Comma-separated dot paths to show as columns
        #[arg(short, long)]
        columns: Option<String>,
    },
    /// Show one resource by name, id or other identifier
    Get {
        kind: String,
        identifier: String,
        #[arg(short, long = "parent")]
        parents: Vec<String>,
    },
    /// Delete one resource
    Delete {
        kind: String,
        identifier: String,
        #[arg(short, long = "parent")]
        parents: Vec<String>,
    },
    /// Run an action such as start, stop or reboot
    Action {
        kind: String,
        identifier: String,
        action: String,
        #[arg(short, long = "parent")]
        parents: Vec<String>,
    },
    /// List the buckets of an object storage instance
    Buckets { instance: String },
    /// List the objects in a bucket
    Objects {
        instance: String,
        bucket: String,
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", log_path.display(), e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("icsdk {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ibmcloud").join("icsdk.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ibmcloud").join("icsdk.log");
    }
    PathBuf::from("icsdk.log")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(&args).await {
        match err.downcast_ref::<ibmcloud_sdk::Error>() {
            Some(sdk_err) => eprintln!("Error: {}\n  {:#}", format_error(sdk_err), err),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    if let Command::Kinds = &args.command {
        for key in get_all_resource_keys() {
            let def = resource_def(key)?;
            println!("{:<32} {:<8} {}", key, def.connection, def.display_name);
        }
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let client = IbmClient::new(config).await.context("Failed to create client")?;

    match &args.command {
        Command::Kinds => {},
        Command::List { kind, parents, columns } => {
            let collection = dispatch::collection(&client, kind, &as_strs(parents)).await?;
            let items = collection.list().await?;
            if args.json {
                print_json(&Value::Array(items))?;
            } else {
                let def = collection.def();
                let columns: Vec<String> = match columns {
                    Some(c) => c.split(',').map(|s| s.trim().to_string()).collect(),
                    None if def.id_field == def.name_field => vec![def.id_field.clone()],
                    None => vec![def.id_field.clone(), def.name_field.clone()],
                };
                print_table(&items, &columns);
            }
        },
        Command::Get { kind, identifier, parents } => {
            let collection = dispatch::collection(&client, kind, &as_strs(parents)).await?;
            print_json(&collection.get(identifier).await?)?;
        },
        Command::Delete { kind, identifier, parents } => {
            let collection = dispatch::collection(&client, kind, &as_strs(parents)).await?;
            collection.delete(identifier).await?;
            println!("Deleted {} {}", collection.def().display_name, identifier);
        },
        Command::Action { kind, identifier, action, parents } => {
            let result = dispatch::execute_action(&client, kind, &as_strs(parents), identifier, action)
                .await
                .with_context(|| {
                    format!("available actions for {}: {:?}", kind, dispatch::actions_for(kind))
                })?;
            print_json(&result)?;
        },
        Command::Buckets { instance } => {
            let storage = ObjectStorage::new(&client, instance).await?;
            for bucket in storage.buckets().await? {
                println!("{:<40} {}", bucket.name, bucket.creation_date.as_deref().unwrap_or("-"));
            }
        },
        Command::Objects { instance, bucket, prefix } => {
            let storage = ObjectStorage::new(&client, instance).await?;
            for object in storage.list_objects(bucket, prefix.as_deref()).await? {
                println!("{:>12} {}", object.size, object.key);
            }
        },
    }

    Ok(())
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(items: &[Value], columns: &[String]) {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| columns.iter().map(|c| extract_json_value(item, c)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| rows.iter().map(|r| r[i].len()).chain([c.len()]).max().unwrap_or(0))
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&columns.iter().map(|c| c.to_uppercase()).collect::<Vec<_>>()));
    for row in &rows {
        println!("{}", line(row));
    }
    tracing::debug!("Listed {} items", rows.len());
}
