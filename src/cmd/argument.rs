/*!
argument.rs - a single named, typed argument definition.

Two layers:
  - `Arg<C, T>`      typed builder handed to `CommandBuilder::define`
  - `ArgumentSpec<C>` what the command keeps: the kind-erased definition
                      (`ArgumentInfo`) plus the bind callback

Token syntax understood by a definition named `count` with short name `c`:
  --count          bare prefix (value is the next token)
  --count=5        attached value
  -c / -c=5        same, short form
*/

use std::fmt;
use std::marker::PhantomData;

use super::value::{ArgType, Value, ValueKind};
use crate::error::ParseError;

/// Callback run as soon as an argument's value is bound.
pub type BindFn<C> = Box<dyn Fn(&mut C, &Value) + Send + Sync>;

/// Trim and replace internal spaces with underscores.
pub fn normalize_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/* ---- Kind-erased definition ---- */

#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentInfo {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub kind: ValueKind,
    pub default: Value,
    pub required: bool,
}

impl ArgumentInfo {
    pub fn prefix(&self) -> String {
        format!("--{}", self.name)
    }

    /// `-s`, or `None` without a short name.
    pub fn short_prefix(&self) -> Option<String> {
        if self.short_name.is_empty() {
            None
        } else {
            Some(format!("-{}", self.short_name))
        }
    }

    /// Prefix test: `--foo` matches `--foo`, `--foo=1` and `--foobar`.
    pub fn matches(&self, token: &str) -> bool {
        self.matched_prefix(token).is_some()
    }

    /// Like `matches`, but only for the exact forms `--foo`, `--foo=…`, `-f`, `-f=…`.
    pub fn matches_exactly(&self, token: &str) -> bool {
        match self.matched_prefix(token) {
            Some(p) => {
                let rest = &token[p.len()..];
                rest.is_empty() || rest.starts_with('=')
            }
            None => false,
        }
    }

    /// The token is only the flag; its value is the next token.
    pub fn is_bare_prefix(&self, token: &str) -> bool {
        token == self.prefix() || self.short_prefix().is_some_and(|s| token == s)
    }

    /// Text after the matched prefix, minus one leading `=`.
    ///
    /// Returns `None` when the token does not match this argument.
    pub fn attached_value<'t>(&self, token: &'t str) -> Option<&'t str> {
        let prefix = self.matched_prefix(token)?;
        let rest = &token[prefix.len()..];
        Some(rest.strip_prefix('=').unwrap_or(rest))
    }

    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        self.kind.parse(&self.name, raw)
    }

    // Long prefix wins when both forms apply (`--x` also starts with `-`).
    fn matched_prefix(&self, token: &str) -> Option<String> {
        let long = self.prefix();
        if token.starts_with(&long) {
            return Some(long);
        }
        self.short_prefix().filter(|s| token.starts_with(s.as_str()))
    }
}

impl fmt::Display for ArgumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.name)?;
        if let Some(short) = self.short_prefix() {
            write!(f, " [{short}]")?;
        }
        write!(f, " ({})", self.kind)
    }
}

/// Definition stored by a command: schema plus optional bind callback.
pub struct ArgumentSpec<C> {
    pub info: ArgumentInfo,
    pub(crate) on_bind: Option<BindFn<C>>,
}

impl<C> ArgumentSpec<C> {
    pub(crate) fn bind(&self, call: &mut C, value: &Value) {
        if let Some(f) = &self.on_bind {
            f(call, value);
        }
    }
}

impl<C> fmt::Debug for ArgumentSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("info", &self.info)
            .field("on_bind", &self.on_bind.is_some())
            .finish()
    }
}

/* ---- Typed builder ---- */

/// Typed argument definition.
///
/// ```
/// use typecmd::{Arg, BufferedCall};
/// let arg: Arg<BufferedCall, i32> = Arg::integer("count").short("c").default(10).optional();
/// assert_eq!(arg.name(), "count");
/// ```
pub struct Arg<C, T> {
    name: String,
    short_name: String,
    description: String,
    default: Option<T>,
    required: bool,
    on_bind: Option<Box<dyn Fn(&mut C, T) + Send + Sync>>,
    _kind: PhantomData<fn() -> T>,
}

impl<C: 'static, T: ArgType> Arg<C, T> {
    /// A required argument with no short name, description or default.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            short_name: String::new(),
            description: String::new(),
            default: None,
            required: true,
            on_bind: None,
            _kind: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(mut self, short_name: impl AsRef<str>) -> Self {
        self.short_name = normalize_name(short_name.as_ref());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn on_bind<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        self.on_bind = Some(Box::new(f));
        self
    }

    pub(crate) fn into_spec(self) -> ArgumentSpec<C> {
        let info = ArgumentInfo {
            name: self.name,
            short_name: self.short_name,
            description: self.description,
            kind: T::KIND,
            default: self
                .default
                .map(ArgType::into_value)
                .unwrap_or_else(|| T::KIND.default_value()),
            required: self.required,
        };
        let on_bind = self.on_bind.map(|f| -> BindFn<C> {
            Box::new(move |call: &mut C, value: &Value| {
                if let Some(v) = T::from_value(value) {
                    f(call, v);
                }
            })
        });
        ArgumentSpec { info, on_bind }
    }
}

impl<C: 'static> Arg<C, String> {
    pub fn string(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> Arg<C, i32> {
    pub fn integer(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> Arg<C, i64> {
    pub fn long(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> Arg<C, f32> {
    pub fn float(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> Arg<C, f64> {
    pub fn double(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> Arg<C, bool> {
    pub fn boolean(name: impl AsRef<str>) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, short: &str) -> ArgumentInfo {
        Arg::<(), i32>::integer(name).short(short).into_spec().info
    }

    #[test]
    fn prefix_matching_is_loose() {
        let a = info("foo", "");
        assert!(a.matches("--foo"));
        assert!(a.matches("--foo=bar"));
        assert!(a.matches("--foobar"));
        assert!(!a.matches("-f"));
        assert!(!a.matches("foo"));
    }

    #[test]
    fn exact_forms() {
        let a = info("foo", "f");
        assert!(a.matches_exactly("--foo"));
        assert!(a.matches_exactly("--foo=1"));
        assert!(a.matches_exactly("-f=1"));
        assert!(!a.matches_exactly("--foobar"));
    }

    #[test]
    fn bare_prefix_detection() {
        let a = info("count", "c");
        assert!(a.is_bare_prefix("--count"));
        assert!(a.is_bare_prefix("-c"));
        assert!(!a.is_bare_prefix("--count=2"));
        assert!(!a.is_bare_prefix("-c2"));
    }

    #[test]
    fn empty_short_name_never_matches() {
        let a = info("count", "");
        assert!(!a.is_bare_prefix("-"));
        assert!(!a.matches("-x"));
    }

    #[test]
    fn attached_value_strips_equals() {
        let a = info("count", "c");
        assert_eq!(a.attached_value("--count=5"), Some("5"));
        assert_eq!(a.attached_value("-c=7"), Some("7"));
        assert_eq!(a.attached_value("-c7"), Some("7"));
        assert_eq!(a.attached_value("--other=1"), None);
    }

    #[test]
    fn names_are_normalized() {
        let a = info("  my arg ", " m a ");
        assert_eq!(a.name, "my_arg");
        assert_eq!(a.short_name, "m_a");
    }

    #[test]
    fn default_falls_back_to_kind_default() {
        let a = info("n", "");
        assert_eq!(a.default, Value::Int(-1));
        let b = Arg::<(), f64>::double("d").default(0.5).into_spec().info;
        assert_eq!(b.default, Value::Double(0.5));
    }

    #[test]
    fn display_for_help() {
        assert_eq!(info("count", "c").to_string(), "--count [-c] (Int)");
        assert_eq!(info("count", "").to_string(), "--count (Int)");
    }
}
