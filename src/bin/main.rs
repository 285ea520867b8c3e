use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use soql_bridge::config::{LayerOrigin, SETTINGS_ENV_VAR, SettingsOverride, load_settings};
use soql_bridge::{BridgeResult, EndOfLine, VirtualUriCodec, synthesize_virtual_content};

/// Inspect the virtual documents used for embedded SOQL completion
#[derive(Parser)]
#[command(name = "soql-bridge")]
#[command(version)]
#[command(about = "Inspect the virtual documents used for embedded SOQL completion")]
struct Cli {
    /// Workspace root to read soql-bridge.toml from
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// JSON settings overriding every config file
    ///
    /// Falls back to $SOQL_BRIDGE_SETTINGS when omitted.
    #[arg(long, global = true, value_name = "JSON")]
    settings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the masked virtual document for a SOQL block in an Apex file
    Synthesize {
        /// The Apex source file
        file: PathBuf,

        /// UTF-16 offset of the block in the file
        #[arg(long)]
        start: usize,

        /// The SOQL query text
        #[arg(long)]
        query: String,

        /// Line ending of the file (detected when omitted)
        #[arg(long, value_enum)]
        eol: Option<EolArg>,
    },
    /// Print the virtual document URI for a host document URI
    Uri {
        host_uri: String,
    },
    /// Print the host document URI encoded in a virtual document URI
    Resolve {
        virtual_uri: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EolArg {
    Lf,
    Crlf,
}

impl From<EolArg> for EndOfLine {
    fn from(arg: EolArg) -> Self {
        match arg {
            EolArg::Lf => EndOfLine::Lf,
            EolArg::Crlf => EndOfLine::Crlf,
        }
    }
}

fn run(cli: Cli) -> BridgeResult<()> {
    let env_settings = std::env::var(SETTINGS_ENV_VAR).ok();
    let override_settings = match (&cli.settings, &env_settings) {
        (Some(json), _) => Some(SettingsOverride {
            origin: LayerOrigin::CommandLine,
            json: json.as_str(),
        }),
        (None, Some(json)) => Some(SettingsOverride {
            origin: LayerOrigin::Environment,
            json: json.as_str(),
        }),
        (None, None) => None,
    };

    let outcome = load_settings(cli.root.as_deref(), override_settings);
    for event in &outcome.events {
        event.log();
        if event.is_warning() {
            eprintln!("Warning: {}", event);
        }
    }
    let codec = VirtualUriCodec::from_settings(&outcome.settings);

    match cli.command {
        Commands::Synthesize {
            file,
            start,
            query,
            eol,
        } => {
            let text = std::fs::read_to_string(&file)?;
            let eol = eol.map(EndOfLine::from).unwrap_or_else(|| EndOfLine::detect(&text));
            let content = synthesize_virtual_content(&text, eol, &query, start)?;
            print!("{}", content);
        }
        Commands::Uri { host_uri } => {
            println!("{}", codec.encode(&host_uri));
        }
        Commands::Resolve { virtual_uri } => {
            println!("{}", codec.decode(&virtual_uri)?);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
