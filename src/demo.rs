//! Sample command set used by the `typecmd` binary.

use typecmd::{Arg, Bindings, Call, Command, Result, Value};

/// Invocations run in order by `typecmd demo`.
pub const SCRIPT: &[&str] = &[
    "ping",
    "0",
    "show",
    r#"show --str "Test, with spaces!""#,
    "show --str test -i 42 --bool true -l=64 --float=3.2 --double 57.33",
    "show -i test",
    "typed",
    "typed --str test -b true -i 42 -l=64 --float=3.2 --double 57.33",
    "defaults -rs t -ri 0",
    "sum 1.5 2.5 -4",
    "sum 1 --b=2",
    "help",
    "help --command show",
    "help -c=defaults",
    "help --command invalid",
];

pub fn commands<C: Call + 'static>() -> Result<Vec<Command<C>>> {
    Ok(vec![ping(), show()?, typed()?, defaults()?, sum()?])
}

fn ping<C: Call + 'static>() -> Command<C> {
    Command::builder("ping")
        .description("Takes no arguments and answers.")
        .alias("0")
        .on_run(|call: &mut C, _| {
            call.success("pong");
            Ok(())
        })
        .build()
}

/// Every argument kind, all optional; echoes what was given.
fn show<C: Call + 'static>() -> Result<Command<C>> {
    Ok(Command::builder("show")
        .description("Echoes whichever optional arguments are given.")
        .alias("s")
        .define(Arg::string("str").short("s").optional().description("Some text"))?
        .define(Arg::boolean("bool").short("b").optional().description("A flag value"))?
        .define(Arg::integer("int").short("i").optional().description("A 32-bit integer"))?
        .define(Arg::long("long").short("l").optional().description("A 64-bit integer"))?
        .define(Arg::float("float").short("f").optional().description("A 32-bit float"))?
        .define(Arg::double("double").short("d").optional().description("A 64-bit float"))?
        .on_run(|call: &mut C, args| {
            if args.bound().next().is_none() {
                call.info("no arguments given");
            }
            for (name, value) in args.bound() {
                call.respond(&format!("{name} = {value}"));
            }
            Ok(())
        })
        .build())
}

/// Same kinds, all required; also shows bind callbacks firing.
fn typed<C: Call + 'static>() -> Result<Command<C>> {
    Ok(Command::builder("typed")
        .description("Requires one argument of every kind.")
        .define(
            Arg::string("str")
                .short("s")
                .on_bind(|call: &mut C, v| call.info(&format!("bound str early: {v}"))),
        )?
        .define(Arg::boolean("bool").short("b"))?
        .define(Arg::integer("int").short("i"))?
        .define(Arg::long("long").short("l"))?
        .define(Arg::float("float").short("f"))?
        .define(Arg::double("double").short("d"))?
        .on_run(|call: &mut C, args| {
            let line = format!(
                "str={} bool={} int={} long={} float={} double={}",
                args.get::<String>("str")?,
                args.get::<bool>("bool")?,
                args.get::<i32>("int")?,
                args.get::<i64>("long")?,
                args.get::<f32>("float")?,
                args.get::<f64>("double")?,
            );
            call.success(&line);
            Ok(())
        })
        .build())
}

/// Optional arguments with declared defaults next to required ones.
fn defaults<C: Call + 'static>() -> Result<Command<C>> {
    Ok(Command::builder("defaults")
        .description("Mixes required arguments with defaulted optional ones.")
        .define(
            Arg::string("optstr")
                .short("os")
                .optional()
                .default("default text".to_string()),
        )?
        .define(Arg::integer("optint").short("oi").optional().default(111))?
        .define(Arg::double("optdouble").short("od").optional().default(0.0112))?
        .define(Arg::string("reqstr").short("rs"))?
        .define(Arg::integer("reqint").short("ri"))?
        .on_run(|call: &mut C, args| {
            call.respond(&describe(args)?);
            Ok(())
        })
        .build())
}

fn describe(args: &Bindings<'_>) -> Result<String> {
    Ok(format!(
        "optstr={} optint={} optdouble={} reqstr={} reqint={}",
        args.get_or_default::<String>("optstr")?,
        args.get_or_default::<i32>("optint")?,
        args.get_or_default::<f64>("optdouble")?,
        args.get::<String>("reqstr")?,
        args.get::<i32>("reqint")?,
    ))
}

/// Positional style: `sum 1 2 3`.
fn sum<C: Call + 'static>() -> Result<Command<C>> {
    Ok(Command::builder("sum")
        .description("Adds up to three numbers, by name or by position.")
        .define(Arg::double("a"))?
        .define(Arg::double("b"))?
        .define(Arg::double("c").optional().default(0.0))?
        .on_run(|call: &mut C, args| {
            let total: f64 = ["a", "b", "c"]
                .iter()
                .map(|n| args.get_or_default::<f64>(n))
                .sum::<Result<f64>>()?;
            let shown: Vec<String> = args.bound().map(|(n, v)| format!("{n}={v}")).collect();
            call.success(&format!("{} => {}", shown.join(" "), Value::Double(total)));
            Ok(())
        })
        .build())
}
