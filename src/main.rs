use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod demo;

use typecmd::cmd::format::{Role, StyleOptions, color, table};
use typecmd::{BufferedCall, Call, CommandError, CommandManager, ConsoleCall, utils};

/// typecmd - typed command dispatch playground
///
/// Runs invocation strings against a small sample command set
/// (ping, show, typed, defaults, sum, and the built-in help).
///
/// Examples:
///   typecmd run 'show --str "a b c" -i 42'
///   typecmd run --json sum 1 2 3
///   typecmd help typed
///   typecmd list
///   typecmd demo
#[derive(Parser, Debug)]
#[command(
    name = "typecmd",
    version,
    about = "Typed command dispatch playground",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one invocation string
    Run(RunArgs),

    /// Show the help text of a command, or list all commands
    Help {
        /// Command to describe
        command: Option<String>,
    },

    /// Table of the available commands
    List,

    /// Run a scripted tour of every sample command
    Demo,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Invocation, e.g. `show --str "a b" -i 4`; several words are joined with spaces
    #[arg(
        value_name = "INVOCATION",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    words: Vec<String>,

    /// Print the responses as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Run(args) => execute_run(args),
        Commands::Help { command } => {
            let text = match command {
                Some(name) => format!("help --command \"{name}\""),
                None => "help".to_string(),
            };
            run_console(&text)
        }
        Commands::List => execute_list(),
        Commands::Demo => execute_demo(),
    }
}

fn sample_manager<C: Call + 'static>() -> Result<CommandManager<C>> {
    let mut manager = CommandManager::new();
    manager.load_commands(demo::commands()?);
    Ok(manager)
}

/// 1 for a bad invocation, 2 for a command that failed on its own.
fn exit_code(err: &CommandError) -> i32 {
    if err.is_user_error() { 1 } else { 2 }
}

fn run_console(text: &str) -> Result<()> {
    let manager = sample_manager::<ConsoleCall>()?;
    let mut call = ConsoleCall::new(text);
    if let Err(e) = manager.dispatch(&mut call) {
        call.error(&e.to_string());
        std::process::exit(exit_code(&e));
    }
    Ok(())
}

fn execute_run(args: RunArgs) -> Result<()> {
    let text = args.words.join(" ");
    if !args.json {
        return run_console(&text);
    }

    let manager = sample_manager::<BufferedCall>()?;
    let mut call = BufferedCall::new(text.as_str());
    let outcome = manager.dispatch(&mut call);
    let failed = outcome.is_err() || call.has_errors();
    let out = serde_json::json!({
        "status": if failed { "error" } else { "ok" },
        "invocation": text,
        "responses": call.responses(),
        "error": outcome.as_ref().err().map(|e| e.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    match outcome {
        Err(e) => std::process::exit(exit_code(&e)),
        Ok(()) if failed => std::process::exit(2),
        Ok(()) => Ok(()),
    }
}

fn execute_list() -> Result<()> {
    let manager = sample_manager::<ConsoleCall>()?;
    let style = StyleOptions::detect();
    let rows: Vec<Vec<String>> = manager
        .routes()
        .map(|(cmd, live)| {
            let args = cmd
                .arguments()
                .map(|a| {
                    if a.required {
                        format!("--{}", a.name)
                    } else {
                        format!("[--{}]", a.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                live[0].to_string(),
                live[1..].join(", "),
                args,
                cmd.description().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        table(&["NAME", "ALIASES", "ARGUMENTS", "DESCRIPTION"], &rows, &style)
    );
    Ok(())
}

fn execute_demo() -> Result<()> {
    let manager = sample_manager::<ConsoleCall>()?;
    let style = StyleOptions::detect();
    for text in demo::SCRIPT {
        println!("\n{}", color(Role::Heading, format!("> {text}"), &style));
        manager.run_command(&mut ConsoleCall::new(*text));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_separates_invocation_errors() {
        let unknown = CommandError::UnknownCommand { input: "x".into() };
        assert_eq!(exit_code(&unknown), 1);
        let failed = CommandError::Other(anyhow::anyhow!("boom"));
        assert_eq!(exit_code(&failed), 2);
    }

    #[test]
    fn failed_help_lookup_marks_call_as_errored() {
        let manager = sample_manager::<BufferedCall>().unwrap();
        let mut call = BufferedCall::new("help --command invalid");
        manager.run_command(&mut call);
        assert!(call.has_errors());
    }
}
