//! Adds to a number depending on what it is divisible by.
//!
//! Run with `RUST_LOG=slotrules=debug` to see loads and evaluations.

use slotrules::{effect, RulesEngine};

const RULES: &str = "\
# divisible by 2 beats divisible by 3
5 /2 -> 1
0 /3 -> 2

# a big round number gets a bonus instead
round [ /10 (it>=100), /25 (it>=100) ]
9 %round -> 1000
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotrules=info".into()),
        )
        .init();

    let engine = RulesEngine::<i64>::builder()
        .predicate('/', |n: &str| {
            n.parse::<i64>().map(|n| move |x: &i64| x.checked_rem(n) == Some(0))
        })
        .slots([0])
        .effects(|n: &str| n.parse::<i64>().map(|n| [effect(0, move |x: &mut i64| *x += n)]))
        .numbers(["it"], |x: &i64| vec![*x as f64])
        .build()
        .expect("valid engine configuration");

    let count = engine.load_rules_raw(RULES).expect("rules parse");
    println!("loaded {count} rules: {}", engine.ruleset());

    for start in [5, 6, 9, 12, 150, 175] {
        let mut n = start;
        match engine.act_detailed(&mut n) {
            Ok(report) => println!("{start:>4} -> {n:>4}   {report}"),
            Err(err) => println!("{start:>4}: {err}"),
        }
    }
}
