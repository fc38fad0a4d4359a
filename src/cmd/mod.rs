/*!
Command framework modules.

Layout (leaves first):
  value.rs     ValueKind / Value / ArgType (typed access without reflection)
  argument.rs  Arg builder + ArgumentInfo (prefix matching, parsing)
  registry.rs  per-command argument table, declaration ordered
  tokenize.rs  invocation text -> tokens (double quotes group)
  resolve.rs   tokens -> Bindings (named pass, positional pass, required check)
  call.rs      Call trait (response sink) + BufferedCall / ConsoleCall
  command.rs   Command + CommandBuilder, execute, help text
  manager.rs   alias routing + built-in help
  format.rs    terminal styling for human output

Conventions:
  - Nothing here prints except `ConsoleCall`; errors are returned as
    `CommandError` and reported by whoever dispatches.
  - A built `Command` is immutable; per-invocation state lives in `Bindings`.
*/

pub mod argument;
pub mod call;
pub mod command;
pub mod format;
pub mod manager;
pub mod registry;
pub mod resolve;
pub mod tokenize;
pub mod value;

pub use argument::{Arg, ArgumentInfo};
pub use call::{BufferedCall, Call, ConsoleCall, Level, Response};
pub use command::{Command, CommandBuilder};
pub use manager::{CommandManager, HELP_COMMAND};
pub use resolve::{ArgumentBinding, Bindings};
pub use tokenize::tokenize;
pub use value::{ArgType, Value, ValueKind};
