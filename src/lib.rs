//! Typed command dispatch.
//!
//! Register named commands with typed, optionally required arguments; the
//! framework turns a free-text invocation such as
//! `greet --who "Ada Lovelace" -n 2` into typed values and runs callbacks.
//!
//! ```
//! use typecmd::{Arg, BufferedCall, Call, Command, CommandManager, Level};
//!
//! let greet = Command::builder("greet")
//!     .description("Say hello")
//!     .define(Arg::string("who").short("w"))?
//!     .define(Arg::integer("times").short("n").optional().default(1))?
//!     .on_run(|call: &mut BufferedCall, args| {
//!         let who: String = args.get("who")?;
//!         for _ in 0..args.get_or_default::<i32>("times")? {
//!             call.success(&format!("hello {who}"));
//!         }
//!         Ok(())
//!     })
//!     .build();
//!
//! let mut manager = CommandManager::new();
//! manager.add_command(greet);
//!
//! let mut call = BufferedCall::new(r#"greet --who "Ada Lovelace" -n 2"#);
//! manager.run_command(&mut call);
//! assert_eq!(call.texts(Level::Success), ["hello Ada Lovelace"; 2]);
//! # Ok::<(), typecmd::CommandError>(())
//! ```

pub mod cmd;
pub mod error;
pub mod utils;

pub use cmd::{
    Arg, ArgType, ArgumentBinding, ArgumentInfo, Bindings, BufferedCall, Call, Command,
    CommandBuilder, CommandManager, ConsoleCall, Level, Response, Value, ValueKind, tokenize,
};
pub use error::{CommandError, ParseError, Result};
