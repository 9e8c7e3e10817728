//! Command-line client for the Engagespot API.
//!
//!   engagespot send --title "Hi" --message "hello" --recipient a@x.com
//!   engagespot connect --user-id a@x.com
//!   engagespot hmac --user-id a@x.com

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engagespot::config::{CONFIG_PATH_ENV, Config};
use engagespot::signing::sign_user_id;
use engagespot::{Engagespot, Error};
use engagespot::telemetry::init_telemetry;

/// CLI client for the Engagespot API
#[derive(Parser, Debug)]
#[command(name = "engagespot", author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'f', long, env = CONFIG_PATH_ENV, default_value = "engagespot.yaml")]
    config: String,

    /// Validate configuration and exit without calling the API.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a notification
    Send {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        message: Option<String>,

        /// Link opened when the notification is clicked
        #[arg(short, long)]
        url: Option<String>,

        /// Icon URL
        #[arg(short, long)]
        icon: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Recipient identifier, can be repeated
        #[arg(short, long = "recipient")]
        recipients: Vec<String>,

        /// Restrict delivery to a channel, can be repeated
        #[arg(long = "channel")]
        channels: Vec<String>,
    },

    /// Register a user session
    Connect {
        #[arg(long)]
        user_id: String,
    },

    /// Print the HMAC signature for a user id
    Hmac {
        #[arg(long)]
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry()?;

    // Signing is offline and only needs the secret
    if let (false, Some(Commands::Hmac { user_id })) = (cli.validate, &cli.command) {
        let config = Config::load_for_signing(&cli.config)
            .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
        println!("{}", sign_user_id(config.signing_secret()?, user_id));
        return Ok(());
    }

    let config = Config::load(&cli.config).with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    // If --validate flag is set, exit successfully after config validation
    if cli.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("No command given. Run with --help to see available commands.");
    };

    let client = Engagespot::with_options(config.credentials()?, config.options());

    match command {
        Commands::Send {
            title,
            message,
            url,
            icon,
            category,
            recipients,
            channels,
        } => {
            let mut notification = client.create_notification(title).add_recipients(recipients);
            if let Some(message) = message {
                notification = notification.set_message(message);
            }
            if let Some(url) = url {
                notification = notification.set_url(url);
            }
            if let Some(icon) = icon {
                notification = notification.set_icon(icon);
            }
            if let Some(category) = category {
                notification = notification.set_category(category);
            }
            if !channels.is_empty() {
                notification = notification.set_channels(channels);
            }

            let response = notification
                .send()
                .await
                .map_err(|e| api_failure("Failed to send notification", e))?;
            println!("{}", response.body);
        }
        Commands::Connect { user_id } => {
            let response = client
                .connect(&user_id)
                .await
                .map_err(|e| api_failure("Failed to connect user", e))?;
            println!("{}", response.body);
        }
        Commands::Hmac { user_id } => {
            println!("{}", client.gen_hmac(&user_id));
        }
    }

    Ok(())
}

/// Attach the failed action, and the HTTP status when the API answered, to a client error.
fn api_failure(action: &str, err: Error) -> anyhow::Error {
    let context = match err.status() {
        Some(status) => format!("{action} (HTTP {status})"),
        None => action.to_string(),
    };
    anyhow::Error::new(err).context(context)
}
