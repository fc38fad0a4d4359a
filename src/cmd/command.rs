/*!
command.rs - a named command: aliases, argument schema, run callback.

Build with `Command::builder(name)`; `build()` seals the schema, so a
`Command` never changes afterwards. Each `execute` resolves into its own
`Bindings`, which makes a `Command` safe to share across threads.

Flow of `execute(call)`:
  call text -> strip alias -> tokenize -> resolve (bind callbacks fire)
            -> required check -> on_run(call, &bindings)
*/

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use super::argument::{Arg, ArgumentInfo, normalize_name};
use super::call::Call;
use super::registry::ArgumentRegistry;
use super::resolve::{Bindings, resolve};
use super::tokenize::tokenize;
use super::value::ArgType;
use crate::error::{CommandError, Result};

/// Command body, run after every argument is resolved.
pub type RunFn<C> = Box<dyn Fn(&mut C, &Bindings<'_>) -> Result<()> + Send + Sync>;

/* ---- Builder ---- */

pub struct CommandBuilder<C> {
    name: String,
    description: String,
    aliases: Vec<String>,
    registry: ArgumentRegistry<C>,
    on_run: Option<RunFn<C>>,
}

impl<C: 'static> CommandBuilder<C> {
    fn new(name: &str) -> Self {
        let name = normalize_name(name);
        Self {
            aliases: vec![name.clone()],
            name,
            description: String::new(),
            registry: ArgumentRegistry::new(),
            on_run: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Additional name the command answers to. Repeats are ignored.
    pub fn alias(mut self, alias: impl AsRef<str>) -> Self {
        let alias = normalize_name(alias.as_ref());
        if !alias.is_empty() && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    pub fn aliases<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        aliases.into_iter().fold(self, |b, a| b.alias(a))
    }

    /// Declare an argument. Fails if the normalized name is empty or already
    /// declared.
    pub fn define<T: ArgType>(mut self, arg: Arg<C, T>) -> Result<Self> {
        let spec = arg.into_spec();
        if spec.info.name.is_empty() {
            return Err(CommandError::EmptyArgumentName { command: self.name });
        }
        if let Err(spec) = self.registry.insert(spec) {
            return Err(CommandError::DuplicateArgument {
                argument: spec.info.name,
                command: self.name,
            });
        }
        Ok(self)
    }

    pub fn on_run<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, &Bindings<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.on_run = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Command<C> {
        Command {
            name: self.name,
            description: self.description,
            aliases: self.aliases,
            registry: self.registry,
            on_run: self.on_run.unwrap_or_else(|| Box::new(|_, _| Ok(()))),
            help: OnceLock::new(),
        }
    }
}

impl<C> fmt::Debug for CommandBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/* ---- Command ---- */

pub struct Command<C> {
    name: String,
    description: String,
    aliases: Vec<String>,
    registry: ArgumentRegistry<C>,
    on_run: RunFn<C>,
    help: OnceLock<String>,
}

impl<C: 'static> Command<C> {
    pub fn builder(name: impl AsRef<str>) -> CommandBuilder<C> {
        CommandBuilder::new(name.as_ref())
    }
}

impl<C> Command<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All names this command answers to; the primary name comes first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Argument definitions in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentInfo> {
        self.registry.iter().map(|s| &s.info)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentInfo> {
        self.registry.get(&normalize_name(name)).map(|s| &s.info)
    }

    /// True if the first word of `text` is one of this command's aliases.
    pub fn matches(&self, text: &str) -> bool {
        self.argument_text(text).is_some()
    }

    /// The part of `text` after the alias, or `None` if `text` does not
    /// invoke this command.
    pub fn argument_text<'t>(&self, text: &'t str) -> Option<&'t str> {
        let (head, rest) = split_head(text);
        self.aliases.iter().any(|a| a == head).then_some(rest)
    }

    /// Usage summary, built on first request.
    ///
    /// ```text
    /// name: description
    ///  Required Arguments:
    ///   --count [-c] (Int): how many
    ///  Optional Arguments:
    ///   --label (String): shown above the output
    /// ```
    pub fn help_text(&self) -> &str {
        self.help.get_or_init(|| {
            let mut out = format!("{}: {}", self.name, self.description);
            let groups = [
                (" Required Arguments:", true),
                (" Optional Arguments:", false),
            ];
            for (title, required) in groups {
                let mut group = self
                    .arguments()
                    .filter(|a| a.required == required)
                    .peekable();
                if group.peek().is_none() {
                    continue;
                }
                out.push('\n');
                out.push_str(title);
                for arg in group {
                    out.push_str(&format!("\n  {arg}: {}", arg.description));
                }
            }
            out
        })
    }
}

impl<C: Call> Command<C> {
    /// Tokenize and bind the call's arguments without running the command.
    pub fn resolve(&self, call: &mut C) -> Result<Bindings<'_>> {
        let tokens = {
            let text = call.call_text();
            let args = self
                .argument_text(text)
                .ok_or_else(|| CommandError::UnknownCommand {
                    input: text.to_string(),
                })?;
            tokenize(args)
        };
        resolve(&self.name, &self.registry, &tokens, call)
    }

    /// Resolve the call's arguments, then run the command body.
    pub fn execute(&self, call: &mut C) -> Result<()> {
        let bindings = self.resolve(call)?;
        debug!(command = %self.name, bound = bindings.bound().count(), "running command");
        (self.on_run)(call, &bindings)
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arguments", &self.arguments().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// First whitespace-separated word of `text`, and the remainder.
pub(crate) fn split_head(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    text.split_once(char::is_whitespace).unwrap_or((text, ""))
}
