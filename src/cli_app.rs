//! Top-level CLI definition and dispatch.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::Colorize;

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::menu::template::MenuTemplate;
use crate::platform::robot::SimulatedRobot;
use crate::platform::term::TermConsole;
use crate::runtime::AppState;

/// Rover Console — template-driven text-mode controller for a small desk rover.
#[derive(Debug, Parser)]
#[command(
    name = "rover",
    author,
    version,
    about = "Rover Console - menu-driven rover control with threshold alarms",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run the interactive full-screen console.
    Run(RunArgs),
    /// Parse a screen template and report its geometry.
    CheckTemplate(CheckTemplateArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, clap::Args, Default)]
struct RunArgs {
    /// Override the screen template directory.
    #[arg(long, value_name = "PATH")]
    template_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
struct CheckTemplateArgs {
    /// Template file to check.
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// Execute the parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Run(args) => run_console(cli, args),
        Command::CheckTemplate(args) => check_template(args),
        Command::Completions(args) => {
            generate(args.shell, &mut Cli::command(), "rover", &mut io::stdout());
            Ok(())
        }
    }
}

/// Launch the interactive console against the simulated rover.
fn run_console(cli: &Cli, args: &RunArgs) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("rover.toml"));
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(dir) = &args.template_dir {
        config.paths.template_dir.clone_from(dir);
    }

    let mut app = AppState::new(config)?;
    let mut robot = SimulatedRobot::new();
    let mut console = TermConsole::new().map_err(|e| crate::core::errors::RoverError::Runtime {
        details: format!("terminal setup failed: {e}"),
    })?;
    app.run(&mut console, &mut robot)
}

/// Parse a template file and print its geometry and option list.
fn check_template(args: &CheckTemplateArgs) -> Result<()> {
    let template = MenuTemplate::load(&args.path)?;
    let layout = &template.layout;

    let heading = args.path.display().to_string();
    println!("{}", heading.as_str().bold());
    println!(
        "  console:    {}x{}",
        layout.console_width, layout.console_height
    );
    println!(
        "  selector:   col {}, rows {}..={}",
        layout.selector_col, layout.first_line, layout.last_line
    );
    println!(
        "  indicator:  {:?} ({} options)",
        template.selection_indicator,
        template.options.len()
    );
    for option in &template.options {
        println!("    - {option}");
    }

    if layout.output_configured {
        println!(
            "  output:     {} — ({},{}) to ({},{}), {} cols x {} lines",
            "ok".green(),
            layout.output_left,
            layout.output_top,
            layout.output_right,
            layout.output_bottom,
            layout.max_chars_per_line,
            layout.output_lines,
        );
    } else {
        println!(
            "  output:     {} — no valid output region; the engine will fall \
             back to a single line at the origin",
            "rejected".red()
        );
    }
    Ok(())
}
