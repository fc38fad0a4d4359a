/*!
manager.rs - route an invocation to the command named by its first word.

`dispatch` returns errors to the caller; `run_command` reports them through
the call's `error` sink instead.

A built-in `help` command is always available unless a registered command
takes the alias:
  help                    list every command
  help --command NAME     show NAME's help text (also `-c NAME`, `-c=NAME`)
*/

use std::collections::HashMap;

use tracing::{debug, warn};

use super::argument::Arg;
use super::call::Call;
use super::command::{Command, split_head};
use crate::error::{CommandError, Result};

pub const HELP_COMMAND: &str = "help";

pub struct CommandManager<C> {
    commands: Vec<Command<C>>,
    aliases: HashMap<String, usize>,
    help: Option<Command<C>>,
}

impl<C: Call + 'static> Default for CommandManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Call + 'static> CommandManager<C> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            aliases: HashMap::new(),
            help: help_command().ok(),
        }
    }

    /// A manager with no built-in `help` command.
    pub fn without_help() -> Self {
        Self {
            help: None,
            ..Self::new()
        }
    }

    /// Register a command under all its aliases. An alias already taken by
    /// another command is moved to the new one.
    pub fn add_command(&mut self, command: Command<C>) {
        let index = self.commands.len();
        for alias in command.aliases() {
            if let Some(prev) = self.aliases.insert(alias.clone(), index) {
                warn!(
                    alias = %alias,
                    previous = %self.commands[prev].name(),
                    command = %command.name(),
                    "alias reassigned"
                );
            }
        }
        debug!(command = %command.name(), aliases = ?command.aliases(), "command registered");
        self.commands.push(command);
    }

    pub fn load_commands(&mut self, commands: impl IntoIterator<Item = Command<C>>) {
        for command in commands {
            self.add_command(command);
        }
    }

    /// Command answering to `alias`, including the built-in help.
    pub fn command(&self, alias: &str) -> Option<&Command<C>> {
        match self.aliases.get(alias) {
            Some(&i) => Some(&self.commands[i]),
            None => self.help.as_ref().filter(|h| h.name() == alias),
        }
    }

    /// Reachable commands in registration order, each with the aliases that
    /// still route to it. A command whose aliases were all taken over by
    /// later registrations is left out. Built-in help is excluded.
    pub fn routes(&self) -> impl Iterator<Item = (&Command<C>, Vec<&str>)> {
        self.commands.iter().enumerate().filter_map(|(i, cmd)| {
            let live: Vec<&str> = cmd
                .aliases()
                .iter()
                .filter(|a| self.aliases.get(a.as_str()) == Some(&i))
                .map(String::as_str)
                .collect();
            (!live.is_empty()).then_some((cmd, live))
        })
    }

    /// Find the command named by the call text and execute it.
    pub fn dispatch(&self, call: &mut C) -> Result<()> {
        let index = self.aliases.get(split_head(call.call_text()).0).copied();
        if let Some(i) = index {
            let command = &self.commands[i];
            debug!(command = %command.name(), text = %call.call_text(), "dispatching");
            return command.execute(call);
        }
        if let Some(help) = &self.help
            && help.matches(call.call_text())
        {
            return self.run_help(help, call);
        }
        Err(CommandError::UnknownCommand {
            input: call.call_text().to_string(),
        })
    }

    /// Like `dispatch`, but any error goes to `call.error`.
    pub fn run_command(&self, call: &mut C) {
        if let Err(e) = self.dispatch(call) {
            debug!(error = %e, "command failed");
            call.error(&e.to_string());
        }
    }

    /// One line per command: `alias [other aliases]: description`.
    pub fn help_listing(&self) -> String {
        let mut out = String::from("Commands:");
        let builtin = self
            .help
            .iter()
            .filter(|h| !self.aliases.contains_key(h.name()))
            .map(|h| (h, vec![h.name()]));
        for (cmd, live) in self.routes().chain(builtin) {
            out.push_str("\n  ");
            out.push_str(live[0]);
            if live.len() > 1 {
                out.push_str(&format!(" [{}]", live[1..].join(", ")));
            }
            out.push_str(": ");
            out.push_str(cmd.description());
        }
        out
    }

    fn run_help(&self, help: &Command<C>, call: &mut C) -> Result<()> {
        let bindings = help.resolve(call)?;
        match bindings.get_any::<String>("command")? {
            Some(name) => {
                let cmd = self
                    .command(&name)
                    .ok_or(CommandError::UnknownCommand { input: name })?;
                call.info(cmd.help_text());
            }
            None => call.info(&self.help_listing()),
        }
        Ok(())
    }
}

fn help_command<C: Call + 'static>() -> Result<Command<C>> {
    Ok(Command::builder(HELP_COMMAND)
        .description("Lists commands, or shows the arguments of one command.")
        .define(
            Arg::string("command")
                .short("c")
                .optional()
                .description("Command to describe"),
        )?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::call::{BufferedCall, Level};

    fn manager() -> CommandManager<BufferedCall> {
        let mut m = CommandManager::new();
        m.add_command(
            Command::builder("greet")
                .description("Say hello")
                .alias("g")
                .define(Arg::string("who").optional().default("world".to_string()))
                .unwrap()
                .on_run(|call: &mut BufferedCall, args| {
                    let who: String = args.get_or_default("who")?;
                    call.success(&format!("hello {who}"));
                    Ok(())
                })
                .build(),
        );
        m
    }

    fn run(m: &CommandManager<BufferedCall>, text: &str) -> BufferedCall {
        let mut call = BufferedCall::new(text);
        m.run_command(&mut call);
        call
    }

    #[test]
    fn routes_by_alias() {
        let m = manager();
        assert_eq!(run(&m, "g --who=you").texts(Level::Success), ["hello you"]);
        assert_eq!(run(&m, "greet").texts(Level::Success), ["hello world"]);
    }

    #[test]
    fn unknown_command_reported() {
        let m = manager();
        let call = run(&m, "nope");
        assert_eq!(call.texts(Level::Error), ["unknown command: nope"]);
    }

    #[test]
    fn help_lists_commands() {
        let m = manager();
        let call = run(&m, "help");
        let info = call.texts(Level::Info);
        assert_eq!(info.len(), 1);
        assert!(info[0].contains("greet [g]: Say hello"));
        assert!(info[0].contains("help: "));
    }

    #[test]
    fn help_for_one_command() {
        let m = manager();
        for text in ["help --command greet", "help --command=g", "help -c greet", "help -c=greet", "help greet"] {
            let call = run(&m, text);
            assert_eq!(
                call.texts(Level::Info),
                ["greet: Say hello\n Optional Arguments:\n  --who (String): "],
                "{text}"
            );
        }
    }

    #[test]
    fn help_for_unknown_command() {
        let m = manager();
        let call = run(&m, "help --command invalid");
        assert_eq!(call.texts(Level::Error), ["unknown command: invalid"]);
    }

    #[test]
    fn later_alias_wins() {
        let mut m = manager();
        m.add_command(Command::builder("go").alias("g").build());
        assert_eq!(m.command("g").map(|c| c.name()), Some("go"));
        assert_eq!(m.command("greet").map(|c| c.name()), Some("greet"));
    }

    #[test]
    fn listing_skips_shadowed_commands_and_aliases() {
        let mut m = manager();
        m.add_command(Command::builder("go").alias("g").build());
        m.add_command(Command::builder("a").description("first").build());
        m.add_command(Command::builder("a").description("second").build());
        let listing = m.help_listing();
        assert!(listing.contains("\n  greet: Say hello"), "{listing}");
        assert!(listing.contains("\n  go [g]: "), "{listing}");
        assert!(listing.contains("\n  a: second"), "{listing}");
        assert!(!listing.contains("first"), "{listing}");
        assert_eq!(m.routes().count(), 3);
    }

    #[test]
    fn without_help_has_no_help() {
        let m = CommandManager::<BufferedCall>::without_help();
        assert!(m.command(HELP_COMMAND).is_none());
        assert!(matches!(
            m.dispatch(&mut BufferedCall::new("help")),
            Err(CommandError::UnknownCommand { .. })
        ));
    }
}
