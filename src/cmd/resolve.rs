/*!
resolve.rs - bind tokens to a command's arguments.

Resolution runs in two passes over one invocation's tokens:

  1. Named pass, left to right. Each token is matched against the arguments
     not yet resolved (first match wins; an exact `--name` / `--name=` /
     `-s` / `-s=` form beats a loose prefix match, then declaration order).
       - `--name value`  bare prefix: the next token is the value (two tokens)
       - `--name` last   no value; a required argument fails right here
       - `--name=value`  attached value
  2. Positional pass. Tokens the named pass did not consume, and that do not
     look like flags, fill the remaining arguments in declaration order.

Each bound value is handed to the argument's bind callback immediately.
Leftover tokens are ignored. Any value that fails to parse aborts the
invocation. Finally every required argument must be bound.

The result is a `Bindings` local to the invocation; the command itself is
never mutated.
*/

use std::collections::HashMap;

use serde_json::Map;
use tracing::{debug, trace};

use super::argument::{ArgumentInfo, ArgumentSpec, normalize_name};
use super::registry::ArgumentRegistry;
use super::value::{ArgType, Value};
use crate::error::{CommandError, Result};

/* ---- Bindings ---- */

/// Resolved value (or absence) of one argument for one invocation.
#[derive(Clone, Debug)]
pub struct ArgumentBinding<'a> {
    pub definition: &'a ArgumentInfo,
    pub value: Option<Value>,
}

/// All argument values of one invocation, read with typed getters.
#[derive(Clone, Debug)]
pub struct Bindings<'a> {
    command: &'a str,
    entries: Vec<ArgumentBinding<'a>>,
    index: &'a HashMap<String, usize>,
}

impl<'a> Bindings<'a> {
    pub(crate) fn new<C>(command: &'a str, registry: &'a ArgumentRegistry<C>) -> Self {
        let entries = registry
            .iter()
            .map(|spec| ArgumentBinding {
                definition: &spec.info,
                value: None,
            })
            .collect();
        Self {
            command,
            entries,
            index: registry.index(),
        }
    }

    /// Name of the command these bindings belong to.
    pub fn command(&self) -> &str {
        self.command
    }

    /// Required value: fails if the argument is unbound.
    pub fn get<T: ArgType>(&self, name: &str) -> Result<T> {
        let entry = self.typed_entry::<T>(name)?;
        entry
            .value
            .as_ref()
            .and_then(T::from_value)
            .ok_or_else(|| CommandError::MissingArgument {
                argument: entry.definition.name.clone(),
            })
    }

    /// Bound value, or the argument's declared default.
    pub fn get_or_default<T: ArgType>(&self, name: &str) -> Result<T> {
        let entry = self.typed_entry::<T>(name)?;
        let value = entry.value.as_ref().unwrap_or(&entry.definition.default);
        T::from_value(value).ok_or_else(|| self.mismatch::<T>(entry.definition))
    }

    /// Bound value if any.
    pub fn get_any<T: ArgType>(&self, name: &str) -> Result<Option<T>> {
        let entry = self.typed_entry::<T>(name)?;
        Ok(entry.value.as_ref().and_then(T::from_value))
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entry(name).ok().and_then(|e| e.value.as_ref())
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// Every argument in declaration order, bound or not.
    pub fn iter(&self) -> impl Iterator<Item = &ArgumentBinding<'a>> {
        self.entries.iter()
    }

    /// Bound values only, in declaration order.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_ref().map(|v| (e.definition.name.as_str(), v)))
    }

    /// Bound values as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        for (name, value) in self.bound() {
            map.insert(
                name.to_string(),
                serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Object(map)
    }

    fn entry(&self, name: &str) -> Result<&ArgumentBinding<'a>> {
        let name = normalize_name(name);
        self.index
            .get(&name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| CommandError::UnknownArgument {
                argument: name,
                command: self.command.to_string(),
            })
    }

    fn typed_entry<T: ArgType>(&self, name: &str) -> Result<&ArgumentBinding<'a>> {
        let entry = self.entry(name)?;
        if entry.definition.kind != T::KIND {
            return Err(self.mismatch::<T>(entry.definition));
        }
        Ok(entry)
    }

    fn mismatch<T: ArgType>(&self, definition: &ArgumentInfo) -> CommandError {
        CommandError::TypeMismatch {
            argument: definition.name.clone(),
            declared: definition.kind,
            requested: T::KIND,
        }
    }
}

/* ---- Resolver ---- */

/// `--x...` or `-x...` with `x` a letter. `-5` is a value, not a flag.
pub fn is_flag_like(token: &str) -> bool {
    if token.starts_with("--") {
        return true;
    }
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_alphabetic())
}

struct Resolver<'a, 'c, C> {
    command: &'a str,
    specs: &'a [ArgumentSpec<C>],
    resolved: Vec<bool>,
    bindings: Bindings<'a>,
    call: &'c mut C,
}

/// Bind `tokens` to the arguments in `registry`, running bind callbacks
/// against `call` as values are bound.
pub fn resolve<'a, C>(
    command: &'a str,
    registry: &'a ArgumentRegistry<C>,
    tokens: &[String],
    call: &mut C,
) -> Result<Bindings<'a>> {
    trace!(command, ?tokens, "resolving arguments");
    let mut resolver = Resolver {
        command,
        specs: registry.specs(),
        resolved: vec![false; registry.len()],
        bindings: Bindings::new(command, registry),
        call,
    };
    let consumed = resolver.named_pass(tokens)?;
    resolver.positional_pass(tokens, &consumed)?;
    resolver.check_required()?;
    Ok(resolver.bindings)
}

impl<'a, C> Resolver<'a, '_, C> {
    fn named_pass(&mut self, tokens: &[String]) -> Result<Vec<bool>> {
        let mut consumed = vec![false; tokens.len()];
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            let Some(pos) = self.find_named(token) else {
                if let Some(pos) = self.find_repeated(token) {
                    debug!(command = self.command, argument = %self.specs[pos].info.name, "ignoring repeated argument");
                    consumed[i] = true;
                    if self.specs[pos].info.is_bare_prefix(token) && i + 1 < tokens.len() {
                        i += 1;
                        consumed[i] = true;
                    }
                }
                i += 1;
                continue;
            };
            consumed[i] = true;
            let info = &self.specs[pos].info;
            let raw = if info.is_bare_prefix(token) {
                if i + 1 < tokens.len() {
                    i += 1;
                    consumed[i] = true;
                    Some(tokens[i].as_str())
                } else {
                    None
                }
            } else {
                info.attached_value(token)
            };
            self.bind(pos, raw)?;
            i += 1;
        }
        Ok(consumed)
    }

    fn positional_pass(&mut self, tokens: &[String], consumed: &[bool]) -> Result<()> {
        let mut next = 0;
        for (token, _) in tokens
            .iter()
            .zip(consumed)
            .filter(|(t, used)| !**used && !is_flag_like(t))
        {
            while next < self.specs.len() && self.resolved[next] {
                next += 1;
            }
            if next == self.specs.len() {
                break;
            }
            self.bind(next, Some(token.as_str()))?;
        }
        Ok(())
    }

    fn check_required(&self) -> Result<()> {
        match self
            .bindings
            .iter()
            .find(|b| b.definition.required && b.value.is_none())
        {
            Some(b) => Err(self.missing(b.definition)),
            None => Ok(()),
        }
    }

    /// First unresolved argument matching `token`, exact forms first.
    fn find_named(&self, token: &str) -> Option<usize> {
        let unresolved = || {
            self.specs
                .iter()
                .enumerate()
                .filter(|(i, _)| !self.resolved[*i])
        };
        unresolved()
            .find(|(_, s)| s.info.matches_exactly(token))
            .or_else(|| unresolved().find(|(_, s)| s.info.matches(token)))
            .map(|(i, _)| i)
    }

    /// Already resolved argument named exactly by `token`.
    fn find_repeated(&self, token: &str) -> Option<usize> {
        self.specs
            .iter()
            .enumerate()
            .find(|(i, s)| self.resolved[*i] && s.info.matches_exactly(token))
            .map(|(i, _)| i)
    }

    fn bind(&mut self, pos: usize, raw: Option<&str>) -> Result<()> {
        self.resolved[pos] = true;
        let specs = self.specs;
        let spec = &specs[pos];
        let Some(raw) = raw else {
            if spec.info.required {
                return Err(self.missing(&spec.info));
            }
            debug!(command = self.command, argument = %spec.info.name, "flag given without a value");
            return Ok(());
        };
        let value = spec.info.parse(raw)?;
        debug!(command = self.command, argument = %spec.info.name, %value, "argument bound");
        spec.bind(self.call, &value);
        self.bindings.entries[pos].value = Some(value);
        Ok(())
    }

    fn missing(&self, info: &ArgumentInfo) -> CommandError {
        CommandError::MissingRequiredArgument {
            argument: info.name.clone(),
            command: self.command.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::argument::Arg;
    use crate::cmd::tokenize::tokenize;

    type Log = Vec<String>;

    fn registry(args: Vec<ArgumentSpec<Log>>) -> ArgumentRegistry<Log> {
        let mut reg = ArgumentRegistry::new();
        for a in args {
            reg.insert(a).unwrap();
        }
        reg
    }

    fn run<'a>(reg: &'a ArgumentRegistry<Log>, text: &str) -> Result<Bindings<'a>> {
        let mut log = Log::new();
        resolve("cmd", reg, &tokenize(text), &mut log)
    }

    #[test]
    fn flag_like_tokens() {
        assert!(is_flag_like("--x"));
        assert!(is_flag_like("-x=1"));
        assert!(!is_flag_like("-5"));
        assert!(!is_flag_like("-"));
        assert!(!is_flag_like("value"));
    }

    #[test]
    fn value_forms() {
        let reg = registry(vec![
            Arg::integer("int").short("i").optional().into_spec(),
            Arg::long("long").short("l").optional().into_spec(),
            Arg::double("double").optional().into_spec(),
        ]);
        let b = run(&reg, "-i 42 -l=64 --double 57.33").unwrap();
        assert_eq!(b.get::<i32>("int").unwrap(), 42);
        assert_eq!(b.get::<i64>("long").unwrap(), 64);
        assert_eq!(b.get::<f64>("double").unwrap(), 57.33);
    }

    #[test]
    fn first_match_wins() {
        let reg = registry(vec![Arg::integer("n").optional().into_spec()]);
        let b = run(&reg, "--n=1 --n=2").unwrap();
        assert_eq!(b.get::<i32>("n").unwrap(), 1);
    }

    #[test]
    fn repeated_flag_drops_its_value_too() {
        let reg = registry(vec![
            Arg::string("n").optional().into_spec(),
            Arg::string("m").optional().into_spec(),
        ]);
        let b = run(&reg, "--n 1 --n 2").unwrap();
        assert_eq!(b.get::<String>("n").unwrap(), "1");
        assert!(!b.is_bound("m"));

        let reg = registry(vec![
            Arg::string("n").optional().into_spec(),
            Arg::integer("m").optional().into_spec(),
        ]);
        assert!(run(&reg, "--n 1 --n abc").is_ok());
    }

    #[test]
    fn exact_form_beats_loose_prefix() {
        let reg = registry(vec![
            Arg::string("s").optional().into_spec(),
            Arg::string("str").optional().into_spec(),
        ]);
        let b = run(&reg, "--str=x").unwrap();
        assert_eq!(b.get_any::<String>("str").unwrap().as_deref(), Some("x"));
        assert!(!b.is_bound("s"));
    }

    #[test]
    fn dangling_required_flag_fails() {
        let reg = registry(vec![Arg::integer("x").into_spec()]);
        let err = run(&reg, "--x").unwrap_err();
        assert!(matches!(
            err,
            CommandError::MissingRequiredArgument { ref argument, .. } if argument == "x"
        ));
    }

    #[test]
    fn dangling_optional_flag_stays_unbound() {
        let reg = registry(vec![Arg::integer("x").optional().default(3).into_spec()]);
        let b = run(&reg, "--x").unwrap();
        assert!(!b.is_bound("x"));
        assert_eq!(b.get_or_default::<i32>("x").unwrap(), 3);
    }

    #[test]
    fn parse_failure_aborts() {
        let reg = registry(vec![Arg::integer("int").short("i").optional().into_spec()]);
        let err = run(&reg, "-i test").unwrap_err();
        assert!(matches!(err, CommandError::Syntax(_)));
    }

    #[test]
    fn named_first_then_positional() {
        let reg = registry(vec![
            Arg::string("a").into_spec(),
            Arg::integer("b").into_spec(),
        ]);
        let b = run(&reg, "--b=2 v1").unwrap();
        assert_eq!(b.get::<String>("a").unwrap(), "v1");
        assert_eq!(b.get::<i32>("b").unwrap(), 2);
    }

    #[test]
    fn unknown_flags_are_not_positional() {
        let reg = registry(vec![Arg::string("a").optional().into_spec()]);
        let b = run(&reg, "--nope").unwrap();
        assert!(!b.is_bound("a"));
    }

    #[test]
    fn negative_number_is_positional() {
        let reg = registry(vec![Arg::integer("n").into_spec()]);
        let b = run(&reg, "-5").unwrap();
        assert_eq!(b.get::<i32>("n").unwrap(), -5);
    }

    #[test]
    fn bind_callbacks_run_in_bind_order() {
        let reg = registry(vec![
            Arg::string("a")
                .on_bind(|log: &mut Log, v| log.push(format!("a={v}")))
                .into_spec(),
            Arg::integer("b")
                .on_bind(|log: &mut Log, v| log.push(format!("b={v}")))
                .into_spec(),
        ]);
        let mut log = Log::new();
        resolve("cmd", &reg, &tokenize("first --b 7"), &mut log).unwrap();
        assert_eq!(log, ["b=7", "a=first"]);
    }

    #[test]
    fn getters_check_names_and_types() {
        let reg = registry(vec![Arg::integer("count").optional().into_spec()]);
        let b = run(&reg, "--count=5").unwrap();
        assert!(matches!(
            b.get::<String>("count"),
            Err(CommandError::TypeMismatch { .. })
        ));
        assert!(matches!(
            b.get::<i32>("missing"),
            Err(CommandError::UnknownArgument { .. })
        ));
        assert_eq!(b.to_json(), serde_json::json!({"count": 5}));
    }
}
