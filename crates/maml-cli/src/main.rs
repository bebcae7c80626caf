//! MAML CLI - Command-line interface for Android blackbox UI testing
//!
//! Usage:
//!     maml [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     MAML_ADB_PATH: Bridge executable (default: adb)
//!     MAML_SERIAL: Device serial for multi-device setups
//!     MAML_POLL_INTERVAL: Seconds between connect attempts (default: 1)
//!     MAML_ACTION_DELAY: Seconds to sleep after each action (default: 0)
//!     MAML_CLEAR_COUNT: Deletes issued by `clear` (default: 100)
//!     RUST_LOG: Log filter (default: info)

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use maml::{Bridge, BridgeCommand, CommandOutput, Direction, WaitPolicy};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// MAML - drive Android devices through adb for blackbox UI tests
#[derive(Parser, Debug)]
#[command(name = "maml", version)]
#[command(about = "MAML - drive Android devices through adb for blackbox UI tests")]
#[command(after_help = r#"Examples:
    # Check adb and the attached device
    maml check

    # Wait up to 60 seconds for any device
    maml connect --wait 60

    # Reinstall an app on a specific emulator
    maml -s emulator-5554 reinstall com.example.app build/app.apk

    # Type into the focused field, clearing it first
    maml type --clear "hello world"

    # Fuzz the focused field with 20 random letters and digits
    maml random --length 20 --types uld
"#)]
struct Cli {
    /// Device serial to target
    #[arg(short = 's', long, env = "MAML_SERIAL", global = true)]
    serial: Option<String>,

    /// Bridge executable
    #[arg(long, env = "MAML_ADB_PATH", default_value = "adb", global = true)]
    adb: String,

    /// Seconds to sleep after the action
    #[arg(long, global = true)]
    delay: Option<f64>,

    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check that the bridge is installed and a device is online
    Check,

    /// List attached devices
    Devices {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the device state reported by the bridge
    State,

    /// Exit 0 when the device is online, 1 otherwise
    Online,

    /// Find a device, waiting for one to come online
    Connect {
        /// Seconds to wait; 0 or less waits forever
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        wait: i64,
    },

    /// Install an APK
    Install { apk: String },

    /// Uninstall a package
    Uninstall { package: String },

    /// Uninstall a package, then install an APK
    Reinstall { package: String, apk: String },

    /// Send an Android KeyEvent by code
    Key { code: u32 },

    /// Move the directional pad
    Dpad {
        #[arg(value_enum)]
        direction: DpadArg,
        /// Number of moves
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },

    /// Press the directional pad center
    Press,

    /// Press the menu button
    Menu,

    /// Press the back button
    Back {
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },

    /// Move the cursor to the start of the field
    Home,

    /// Move the cursor to the end of the field
    End,

    /// Scroll a page down
    PageDown,

    /// Clear the focused field
    Clear {
        /// Number of deletes
        #[arg(short, long)]
        num: Option<u32>,
    },

    /// Type text into the focused field
    Type {
        text: String,
        /// Clear the field first
        #[arg(long)]
        clear: bool,
    },

    /// Type random text into the focused field
    Random {
        #[arg(short, long)]
        length: Option<usize>,
        /// Class codes: u l d p s w a
        #[arg(short, long)]
        types: Option<String>,
        /// Clear the field first
        #[arg(long)]
        clear: bool,
    },

    /// Start an activity by component name
    Activity {
        component: String,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove a file or directory on the device
    Rm {
        target: String,
        #[arg(short, long)]
        recursive: bool,
    },

    /// Run a raw bridge command
    Exec {
        command: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Print the command line before running it
        #[arg(long)]
        echo: bool,
        /// Also log captured stdout and stderr
        #[arg(long)]
        log_output: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum DpadArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DpadArg> for Direction {
    fn from(arg: DpadArg) -> Self {
        match arg {
            DpadArg::Up => Direction::Up,
            DpadArg::Down => Direction::Down,
            DpadArg::Left => Direction::Left,
            DpadArg::Right => Direction::Right,
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_target(false)
        .without_time()
        .init();
}

fn print_output(output: &CommandOutput) {
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprintln!("{}", output.stderr);
    }
}

/// Check bridge installation and device availability
async fn check_system_requirements(bridge: &Bridge, serial: Option<&str>) -> bool {
    println!("\u{1F50D} Checking system requirements...");
    println!("{}", "-".repeat(50));

    print!("1. Checking {} installation... ", bridge.adb_path());
    io::stdout().flush().ok();

    if which::which(bridge.adb_path()).is_err() {
        println!("\u{274C} FAILED");
        println!("   Error: {} is not installed or not in PATH.", bridge.adb_path());
        println!("   Solution: Install the Android platform tools:");
        println!("     - macOS: brew install android-platform-tools");
        println!("     - Linux: sudo apt install android-tools-adb");
        println!(
            "     - Windows: Download from https://developer.android.com/studio/releases/platform-tools"
        );
        return false;
    }

    match bridge.adb("version", Vec::<String>::new(), None).await {
        Ok(output) => {
            let version_line = output.stdout.lines().next().unwrap_or("");
            println!(
                "\u{2705} OK ({})",
                if version_line.is_empty() {
                    "installed"
                } else {
                    version_line
                }
            );
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            println!("   Error: {}", e);
            return false;
        }
    }

    print!("2. Checking device... ");
    io::stdout().flush().ok();

    match bridge.is_online(serial).await {
        Ok(true) => {
            println!("\u{2705} OK");
        }
        Ok(false) => {
            println!("\u{274C} FAILED");
            println!("   Error: No online device.");
            println!("   Solution:");
            println!("     1. Enable USB debugging on your Android device");
            println!("     2. Connect via USB and authorize the connection");
            println!("     3. Or start an emulator and wait: maml connect --wait 120");
            return false;
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            println!("   Error: {}", e);
            return false;
        }
    }

    println!("{}", "-".repeat(50));
    println!("\u{2705} All system checks passed!");
    true
}

async fn run(cli: Cli) -> Result<()> {
    let bridge = Bridge::with_path(&cli.adb);
    let serial = cli.serial.as_deref();
    let delay = cli.delay;

    match cli.command {
        Cmd::Check => {
            if !check_system_requirements(&bridge, serial).await {
                std::process::exit(1);
            }
        }
        Cmd::Devices { json } => {
            let devices = bridge.list_devices().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else if devices.is_empty() {
                println!("No devices connected");
            } else {
                for device in devices {
                    println!("{}\t{}", device.serial, device.state);
                }
            }
        }
        Cmd::State => {
            println!("{}", bridge.device_state(serial).await?);
        }
        Cmd::Online => {
            if !bridge.is_online(serial).await? {
                std::process::exit(1);
            }
        }
        Cmd::Connect { wait } => {
            let found = bridge.connect(serial, WaitPolicy::from_secs(wait)).await?;
            println!("{}", found);
        }
        Cmd::Install { apk } => print_output(&bridge.install(&apk, serial).await?),
        Cmd::Uninstall { package } => print_output(&bridge.uninstall(&package, serial).await?),
        Cmd::Reinstall { package, apk } => {
            print_output(&bridge.reinstall(&package, &apk, serial).await?)
        }
        Cmd::Key { code } => print_output(&bridge.keyevent(code, serial, delay).await?),
        Cmd::Dpad { direction, num } => {
            bridge.dpad(direction.into(), num, serial, delay).await?;
        }
        Cmd::Press => print_output(&bridge.press(serial, delay).await?),
        Cmd::Menu => print_output(&bridge.menu(serial, delay).await?),
        Cmd::Back { num } => bridge.back(num, serial, delay).await?,
        Cmd::Home => print_output(&bridge.move_home(serial, delay).await?),
        Cmd::End => print_output(&bridge.move_end(serial, delay).await?),
        Cmd::PageDown => print_output(&bridge.page_down(serial, delay).await?),
        Cmd::Clear { num } => bridge.clear(num, serial, delay).await?,
        Cmd::Type { text, clear } => bridge.type_text(&text, clear, serial, delay).await?,
        Cmd::Random {
            length,
            types,
            clear,
        } => {
            let text = bridge
                .random_type(length, types.as_deref(), clear, serial, delay)
                .await?;
            println!("{:?}", text);
        }
        Cmd::Activity {
            component,
            action,
            category,
        } => print_output(
            &bridge
                .activity(&component, action.as_deref(), category.as_deref(), serial)
                .await?,
        ),
        Cmd::Rm { target, recursive } => {
            print_output(&bridge.remove(&target, recursive, serial).await?)
        }
        Cmd::Exec {
            command,
            args,
            echo,
            log_output,
        } => {
            if command.trim().is_empty() {
                bail!("Bridge command must not be empty");
            }
            let mut invocation = BridgeCommand::new(command)
                .args(args)
                .serial(serial)
                .echo(echo)
                .print_stdout(log_output)
                .print_stderr(log_output);
            if let Some(delay) = delay {
                invocation = invocation.delay(delay);
            }
            print_output(&bridge.dispatch(&invocation).await?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    tracing::debug!(adb = %cli.adb, "starting");
    run(cli).await
}
