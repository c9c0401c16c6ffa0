use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::Style;

use axprov_client::client::{AxlClient, AxlClientConfig, BasicCredentials, TlsPolicy};
use axprov_client::observer::ConsoleObserver;
use axprov_client::wsdl::ServiceDescription;
use axprov_util::settings::{load_config, FileFormat, LoadedConfig};

mod commands;
mod confirm;
mod workflow;

type Error = String;
type Result<T> = std::result::Result<T, Error>;

/// axprov walks a call manager's AXL interface through a provisioning
/// sequence: create a phone, create an end user, associate the two, then
/// remove both again.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    ///Run the provision-and-teardown walkthrough
    Walkthrough(commands::walkthrough::WalkthroughCli),
    ///Show the resolved axprov configuration
    Config,
}

#[derive(ValueEnum, Clone)]
pub(crate) enum WalkthroughOutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let red = Style::new().red();
    match execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", red.apply_to(error));
            ExitCode::FAILURE
        }
    }
}

async fn execute() -> Result<()> {
    axprov_util::logging::initialize()
        .map_err(|cause| format!("Failed to initialize logging.\n  {cause}"))?;

    let settings_redaction = config::Config::builder()
        .set_override("callmanager.password", "redacted")
        .map_err(|_error| "Failed to redact axprov secrets.")?
        .build()
        .map_err(|_error| "Failed to redact axprov secrets.")?;

    let settings = load_config("axprov", include_str!("../axprov.toml"), FileFormat::Toml, config::Config::default(), settings_redaction)
        .map_err(|cause| format!("Failed to load config.\n  {cause}"))?;

    let args = Args::parse();

    match args.command {
        Commands::Walkthrough(implementation) => {
            let service = create_client(&settings, implementation.debug())?;
            implementation.execute(&service).await?;
        }
        Commands::Config => {
            println!("Show axprov configuration: {settings:?}");
        }
    }
    Ok(())
}

fn create_client(settings: &LoadedConfig, debug: bool) -> Result<AxlClient> {
    let host = settings.config.get_string("callmanager.host")
        .map_err(|_error| "Configuration should contain a valid host name to connect to the call manager")?;
    if host.is_empty() {
        return Err(Error::from("Configuration should contain a valid host name to connect to the call manager"));
    }

    let port = settings.config.get_int("callmanager.port")
        .map_err(|_error| "Configuration should contain a valid port number to connect to the call manager")?;

    let username = settings.config.get_string("callmanager.username")
        .map_err(|_error| "Configuration should contain a user name to authenticate to the call manager")?;

    let password = settings.config.get_string("callmanager.password")
        .map_err(|_error| "Configuration should contain a password to authenticate to the call manager")?;

    let timeout = settings.config.get_int("callmanager.timeout.secs")
        .map_err(|_error| "Configuration should contain a request timeout in seconds")?;

    let verify = settings.config.get_bool("callmanager.tls.verify")
        .map_err(|_error| "Configuration should contain a field for 'callmanager.tls.verify'.")?;

    let tls = if verify {
        let ca = settings.config.get_string("callmanager.tls.ca")
            .map_err(|_error| "Configuration should contain a path to a CA certificate when TLS verification is enabled")?;
        TlsPolicy::TrustBundle(PathBuf::from(ca))
    } else {
        TlsPolicy::Insecure
    };

    let wsdl = settings.config.get_string("axl.wsdl")
        .map_err(|_error| "Configuration should contain a path to the AXL service description")?;

    let binding = settings.config.get_string("axl.binding")
        .map_err(|_error| "Configuration should contain the name of the AXL service binding")?;

    let description = ServiceDescription::load(&wsdl)
        .map_err(|cause| format!("{cause}"))?;
    description.require_binding(&binding)
        .map_err(|cause| format!("{cause}"))?;

    let client = AxlClient::create(
        AxlClientConfig {
            host,
            port: port as u16,
            credentials: BasicCredentials::new(username, password),
            tls,
            timeout: Duration::from_secs(timeout as u64),
        },
        description,
    ).map_err(|cause| format!("Failed to create AXL client.\n  {cause}"))?;

    let client = if debug {
        client.with_observer(Box::new(ConsoleObserver))
    } else {
        client
    };

    Ok(client)
}
