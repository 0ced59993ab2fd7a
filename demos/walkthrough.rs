//! Walk through observing, faking, and delegating a function variable.
//!
//! Run with `RUST_LOG=fnspy=trace` to see every intercepted call.

use anyhow::Result;
use fnspy::{Func, Spy, TypedVar, Value, Variadic};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let default_level = "debug";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Production code only knows the variable, never the spy.
fn describe(lookup: &TypedVar<(String, i32, bool), (String, i32)>, key: &str) -> String {
    let (label, score) = lookup.call((key.to_string(), key.len() as i32, true));
    format!("{key}: {label} ({score})")
}

fn main() -> Result<()> {
    init_logging();

    let lookup: TypedVar<(String, i32, bool), (String, i32)> =
        TypedVar::new("lookup", |(key, len, _): (String, i32, bool)| (key.to_uppercase(), len * 10));

    println!("=== Observe ===");
    let spy = Spy::observe(&lookup)?;
    println!("{}", describe(&lookup, "alpha"));
    println!("{}", describe(&lookup, "be"));
    println!("calls: {:?}", spy.calls());
    spy.restore();

    println!("\n=== Fake with zero values ===");
    let spy = Spy::fake(&lookup)?;
    println!("{}", describe(&lookup, "gamma"));
    println!("call 0: {:?}", spy.args_for_call(0)?);
    spy.restore();

    println!("\n=== Fake with literals ===");
    let spy = Spy::fake_with_returns(&lookup, vec![Value::from("canned"), Value::from(-1)])?;
    println!("{}", describe(&lookup, "delta"));
    spy.restore();

    println!("\n=== Delegate ===");
    let spy = Spy::fake_with_delegate(
        &lookup,
        Func::typed(|(key, _, _): (String, i32, bool)| (format!("<{key}>"), 0)),
    )?;
    println!("{}", describe(&lookup, "epsilon"));
    println!("behavior: {}, calls: {}", spy.behavior(), spy.call_count());
    spy.restore();

    println!("\n=== Restored ===");
    println!("{}", describe(&lookup, "zeta"));

    println!("\n=== Variadic ===");
    let join: TypedVar<(String, Variadic<String>), String> =
        TypedVar::new("join", |(sep, Variadic(parts)): (String, Variadic<String>)| parts.join(&sep));
    let spy = Spy::observe(&join)?;
    let joined = join.var().call(vec![Value::from("-"), Value::from("a"), Value::from("b")])?;
    println!("joined: {:?}", joined);
    println!("recorded: {}", serde_json::to_string(&spy.calls())?);

    Ok(())
}
