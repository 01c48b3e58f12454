#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use slotrules::{Effect, Predicate, RulesEngine, RulesEngineBuilder};

// --- Host schema ---
// context : an integer and an optional label
// /n      : value divisible by n
// <n>     : add n to the value        (slot 0)
// @name   : set the label to name     (slot 1)
// it, sq  : the value and its square

pub const ADD: i32 = 0;
pub const LABEL: i32 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Num {
    pub value: i64,
    pub label: Option<String>,
}

impl Num {
    pub fn new(value: i64) -> Self {
        Self { value, label: None }
    }
}

pub struct DivisibleBy(pub i64);

impl Predicate<Num> for DivisibleBy {
    fn test(&self, n: &Num) -> bool {
        n.value.checked_rem(self.0) == Some(0)
    }
}

pub enum NumEffect {
    Add(i64),
    Label(String),
}

impl Effect<Num> for NumEffect {
    fn slot(&self) -> i32 {
        match self {
            NumEffect::Add(_) => ADD,
            NumEffect::Label(_) => LABEL,
        }
    }

    fn apply(&self, n: &mut Num) {
        match self {
            NumEffect::Add(k) => n.value += k,
            NumEffect::Label(name) => n.label = Some(name.clone()),
        }
    }
}

pub fn parse_effect(token: &str) -> Result<Vec<NumEffect>, String> {
    if let Some(name) = token.strip_prefix('@') {
        return Ok(vec![NumEffect::Label(name.to_owned())]);
    }
    token
        .parse()
        .map(|k| vec![NumEffect::Add(k)])
        .map_err(|_| format!("invalid effect: \"{token}\""))
}

pub fn numbers(n: &Num) -> Vec<f64> {
    vec![n.value as f64, (n.value * n.value) as f64]
}

pub fn builder() -> RulesEngineBuilder<Num> {
    RulesEngine::builder()
        .predicate('/', |n: &str| n.parse::<i64>().map(DivisibleBy))
        .slots([ADD, LABEL])
        .effects(parse_effect)
        .numbers(["it", "sq"], numbers)
}

/// Engine with `rules` loaded.
pub fn engine(rules: &str) -> RulesEngine<Num> {
    let engine = builder().build().unwrap();
    engine.load_rules_raw(rules).unwrap();
    engine
}

pub fn act(engine: &RulesEngine<Num>, value: i64) -> Num {
    let mut n = Num::new(value);
    engine.act(&mut n).unwrap();
    n
}

/// A predicate that always holds and counts how often it was tested.
#[derive(Clone, Default)]
pub struct Probe(pub Arc<AtomicUsize>);

impl Probe {
    pub fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Predicate<Num> for Probe {
    fn test(&self, _: &Num) -> bool {
        self.0.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Engine where `?anything` is a [`Probe`] sharing one counter.
pub fn probed(rules: &str) -> (RulesEngine<Num>, Probe) {
    let probe = Probe::default();
    let handle = probe.clone();
    let engine = builder()
        .predicate('?', move |_: &str| Ok::<_, String>(handle.clone()))
        .build()
        .unwrap();
    engine.load_rules_raw(rules).unwrap();
    (engine, probe)
}
