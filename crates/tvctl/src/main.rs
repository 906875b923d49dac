//! tvctl: command-line remote for webOS-style TVs.
//!
//! Pairs with the TV on first use (accept the prompt on screen), stores the
//! pairing token, then runs one command and disconnects.
//!
//! # Usage
//!
//! ```text
//! tvctl [OPTIONS] <HOST> <COMMAND>
//!
//! Options:
//!   --port <PORT>          Remote-control service port [default: 3001]
//!   --plain                Use ws:// instead of wss://
//!   --timeout <SECS>       Connect + pairing timeout [default: 10]
//!   --verify-tls           Validate the TV's certificate
//!   --credentials <PATH>   Pairing-token file
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Default                         |
//! |-------------------------|---------------------------------|
//! | `TVCTL_PORT`            | `3001`                          |
//! | `TVCTL_PLAIN`           | `false`                         |
//! | `TVCTL_CONNECT_TIMEOUT` | `10`                            |
//! | `TVCTL_VERIFY_TLS`      | `false`                         |
//! | `TVCTL_CREDENTIALS`     | `<config dir>/tvctl/credentials.json` |
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); command output goes to
//! stdout.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tvctl::application::script::DEFAULT_PACE;
use tvctl::application::{run_script, RemoteCommands};
use tvctl::domain::SessionConfig;
use tvctl::infrastructure::{FileTokenStore, Session, TokenStore};
use tvctl_core::RemoteKey;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote control for webOS-style TVs.
#[derive(Debug, Parser)]
#[command(name = "tvctl", about = "Remote control for webOS-style TVs", version)]
struct Cli {
    /// IPv4/IPv6 address or hostname of the TV.
    #[arg(value_parser = parse_host)]
    host: String,

    /// TCP port of the TV's remote-control service.
    #[arg(long, default_value_t = 3001, env = "TVCTL_PORT")]
    port: u16,

    /// Connect with plain `ws://` instead of `wss://`.
    #[arg(long, env = "TVCTL_PLAIN")]
    plain: bool,

    /// Seconds allowed for connecting and pairing.
    ///
    /// On first use this includes the time taken to accept the prompt on
    /// the TV.
    #[arg(long, default_value_t = 10, env = "TVCTL_CONNECT_TIMEOUT")]
    timeout: u64,

    /// Validate the TV's TLS certificate.  TVs normally present self-signed
    /// certificates, so this is off by default.
    #[arg(long, env = "TVCTL_VERIFY_TLS")]
    verify_tls: bool,

    /// File holding the pairing token.
    #[arg(long, env = "TVCTL_CREDENTIALS")]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List external inputs.
    Inputs,
    /// Print the input list as returned by the TV.
    InputsRaw,
    /// Switch to an input, e.g. HDMI_1.
    Switch { input: String },
    /// Print system information.
    Info,
    /// Print the current volume.
    Volume,
    /// Set the volume.
    SetVolume { level: u32 },
    /// Mute (`true`) or unmute (`false`).
    Mute {
        #[arg(action = ArgAction::Set)]
        mute: bool,
    },
    /// Run a key script, e.g. `HOME DOWN_3 PAUSE_500 TEXT_hello ENTER`.
    Key {
        #[arg(required = true, allow_hyphen_values = true)]
        steps: Vec<String>,
    },
    /// List known key names.
    Keys,
    /// Type text into the focused field.
    Type {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete characters from the focused field.
    Delete {
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Show a notification.
    Toast {
        #[arg(required = true)]
        message: Vec<String>,
    },
    Play,
    Pause,
    Stop,
    /// Turn the TV off.
    Off,
    /// List installed apps.
    Apps,
    /// Launch an app by id.
    Launch { app_id: String },
    /// Print the pointer socket URL.
    PointerDebug,
    /// Click at the pointer position.
    Click,
    /// Move the pointer by DX, DY.
    Move {
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
        /// Hold the button down while moving.
        #[arg(long)]
        drag: bool,
    },
    /// Scroll by DX, DY.
    Scroll {
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
}

/// Accepts an IP literal (IPv6 optionally bracketed) or an RFC 1123 hostname.
fn parse_host(s: &str) -> Result<String, String> {
    let unbracketed = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    if unbracketed.parse::<IpAddr>().is_ok() {
        return Ok(unbracketed.to_string());
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    };
    if s.len() <= 253 && s.split('.').all(valid_label) {
        Ok(s.to_string())
    } else {
        Err(format!("invalid IP address or hostname: {s}"))
    }
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            port: self.port,
            secure: !self.plain,
            verify_tls: self.verify_tls,
            connect_timeout: Duration::from_secs(self.timeout),
            ..SessionConfig::new(self.host.clone())
        }
    }

    fn token_store(&self) -> anyhow::Result<FileTokenStore> {
        match &self.credentials {
            Some(path) => Ok(FileTokenStore::new(path)),
            None => FileTokenStore::at_default_location()
                .context("cannot locate credential file; pass --credentials"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Command::Keys = cli.command {
        print_keys();
        return Ok(());
    }

    let store: Arc<dyn TokenStore> = Arc::new(cli.token_store()?);
    let session = Session::new(cli.session_config(), store);

    let outcome = async {
        session
            .connect()
            .await
            .with_context(|| format!("could not connect to TV at {}", cli.host))?;
        run_command(&session, &cli.command).await
    }
    .await;

    session.disconnect().await;
    outcome
}

fn print_keys() {
    let names: Vec<&str> = RemoteKey::ALL.iter().map(|key| key.label()).collect();
    println!("Available keys: {}", names.join(", "));
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(session: &Session, command: &Command) -> anyhow::Result<()> {
    let tv = RemoteCommands::new(session);

    match command {
        Command::Inputs => {
            let inputs = tv.input_list().await?;
            println!("Available inputs:");
            for device in &inputs.devices {
                let status = if device.connected { '●' } else { '○' };
                println!("  {status} {}: {}", device.id, device.label);
            }
        }
        Command::InputsRaw => print_json(&tv.raw_input_list().await?)?,
        Command::Switch { input } => {
            info!(input = %input, "switching input");
            print_json(&tv.switch_input(input).await?)?;
        }
        Command::Info => print_json(&tv.system_info().await?)?,
        Command::Volume => print_json(&tv.volume().await?)?,
        Command::SetVolume { level } => {
            tv.set_volume(*level).await?;
        }
        Command::Mute { mute } => {
            tv.set_mute(*mute).await?;
        }
        Command::Key { steps } => run_script(&tv, steps, DEFAULT_PACE).await?,
        Command::Keys => print_keys(),
        Command::Type { text } => {
            tv.insert_text(&text.join(" "), false).await?;
        }
        Command::Delete { count } => {
            tv.delete_characters(*count).await?;
        }
        Command::Toast { message } => {
            tv.toast(&message.join(" ")).await?;
        }
        Command::Play => {
            tv.play().await?;
        }
        Command::Pause => {
            tv.pause().await?;
        }
        Command::Stop => {
            tv.stop().await?;
        }
        Command::Off => {
            info!("turning TV off");
            tv.turn_off().await?;
        }
        Command::Apps => print_json(&tv.apps().await?)?,
        Command::Launch { app_id } => {
            tv.launch_app(app_id, Value::Null).await?;
        }
        Command::PointerDebug => println!("Pointer socket path: {}", tv.pointer_socket().await?),
        Command::Click => tv.click().await?,
        Command::Move { dx, dy, drag } => tv.move_pointer(*dx, *dy, *drag).await?,
        Command::Scroll { dx, dy } => tv.scroll(*dx, *dy).await?,
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["tvctl", "192.168.1.20", "volume"]);

        // Assert
        assert_eq!(cli.port, 3001);
        assert!(!cli.plain);
        assert_eq!(cli.timeout, 10);
        assert!(!cli.verify_tls);
        assert!(matches!(cli.command, Command::Volume));
    }

    #[test]
    fn test_session_config_defaults() {
        let cli = Cli::parse_from(["tvctl", "192.168.1.20", "volume"]);

        let config = cli.session_config();

        assert_eq!(config.url(), "wss://192.168.1.20:3001");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_session_config_overrides() {
        let cli = Cli::parse_from([
            "tvctl",
            "--port",
            "3000",
            "--plain",
            "--timeout",
            "30",
            "tv.local",
            "info",
        ]);

        let config = cli.session_config();

        assert_eq!(config.url(), "ws://tv.local:3000");
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_ipv6_host_is_bracketed_in_url() {
        let cli = Cli::parse_from(["tvctl", "[fe80::1]", "info"]);
        assert_eq!(cli.host, "fe80::1");
        assert_eq!(cli.session_config().url(), "wss://[fe80::1]:3001");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let result = Cli::try_parse_from(["tvctl", "bad host!", "info"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_host() {
        assert!(parse_host("10.0.0.5").is_ok());
        assert!(parse_host("living-room-tv.lan").is_ok());
        assert!(parse_host("::1").is_ok());
        assert!(parse_host("-bad.lan").is_err());
        assert!(parse_host("a..b").is_err());
        assert!(parse_host("").is_err());
    }

    #[test]
    fn test_move_accepts_negative_deltas() {
        let cli = Cli::parse_from(["tvctl", "10.0.0.5", "move", "-10", "5", "--drag"]);
        match cli.command {
            Command::Move { dx, dy, drag } => {
                assert_eq!((dx, dy), (-10, 5));
                assert!(drag);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_mute_takes_boolean_value() {
        let cli = Cli::parse_from(["tvctl", "10.0.0.5", "mute", "false"]);
        assert!(matches!(cli.command, Command::Mute { mute: false }));
    }

    #[test]
    fn test_delete_defaults_to_one() {
        let cli = Cli::parse_from(["tvctl", "10.0.0.5", "delete"]);
        assert!(matches!(cli.command, Command::Delete { count: 1 }));
    }

    #[test]
    fn test_key_requires_at_least_one_step() {
        assert!(Cli::try_parse_from(["tvctl", "10.0.0.5", "key"]).is_err());
        let cli = Cli::parse_from(["tvctl", "10.0.0.5", "key", "HOME", "DOWN_3"]);
        match cli.command {
            Command::Key { steps } => assert_eq!(steps, ["HOME", "DOWN_3"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_credentials_path() {
        let cli = Cli::parse_from([
            "tvctl",
            "--credentials",
            "/tmp/tv.json",
            "10.0.0.5",
            "info",
        ]);
        let store = cli.token_store().unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/tv.json"));
    }
}
