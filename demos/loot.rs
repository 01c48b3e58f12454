//! Picks a drop and a sound for a defeated creature from a rules file.
//!
//! The rules file is created in the system temp directory on first run and
//! can be edited between runs.

use std::env;

use slotrules::{Effect, RulesEngine};

const DROP: i32 = 0;
const SOUND: i32 = 1;

const DEFAULT_RULES: &str = "\
# <level> <predicates> -> <effects>
# ~kind    creature kind
# ^flag    creature flag (burning, flying, boss)
# (hp op n), (depth op n)

undead [ ~skeleton, ~zombie ]
deep [ (depth>=30) ]

10 ^boss -> +crown !fanfare
5 %undead ^burning -> +ash
4 %undead -> +bone !rattle
3 %deep !^flying -> +gem
0 -> +coin !thud
";

#[derive(Debug)]
struct Creature {
    kind: &'static str,
    flags: Vec<&'static str>,
    hp: i64,
    depth: i64,
    drop: Option<String>,
    sound: Option<String>,
}

impl Creature {
    fn new(kind: &'static str, flags: &[&'static str], hp: i64, depth: i64) -> Self {
        Self {
            kind,
            flags: flags.to_vec(),
            hp,
            depth,
            drop: None,
            sound: None,
        }
    }
}

enum Outcome {
    Drop(String),
    Sound(String),
}

impl Effect<Creature> for Outcome {
    fn slot(&self) -> i32 {
        match self {
            Outcome::Drop(_) => DROP,
            Outcome::Sound(_) => SOUND,
        }
    }

    fn apply(&self, c: &mut Creature) {
        match self {
            Outcome::Drop(item) => c.drop = Some(item.clone()),
            Outcome::Sound(sound) => c.sound = Some(sound.clone()),
        }
    }
}

fn parse_outcome(token: &str) -> Result<[Outcome; 1], String> {
    if let Some(item) = token.strip_prefix('+') {
        Ok([Outcome::Drop(item.to_owned())])
    } else if let Some(sound) = token.strip_prefix('!') {
        Ok([Outcome::Sound(sound.to_owned())])
    } else {
        Err(format!("effects start with + or !: \"{token}\""))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotrules=info".into()),
        )
        .init();

    let engine = RulesEngine::<Creature>::builder()
        .predicate('~', |kind: &str| {
            let kind = kind.to_owned();
            Ok::<_, String>(move |c: &Creature| c.kind == kind)
        })
        .predicate('^', |flag: &str| {
            let flag = flag.to_owned();
            Ok::<_, String>(move |c: &Creature| c.flags.iter().any(|f| *f == flag))
        })
        .slots([DROP, SOUND])
        .effects(parse_outcome)
        .numbers(["hp", "depth"], |c: &Creature| {
            vec![c.hp as f64, c.depth as f64]
        })
        .default_rules(DEFAULT_RULES)
        .build()
        .expect("valid engine configuration");

    let path = env::temp_dir().join("slotrules-loot.rules");
    if let Err(err) = engine.load_rules_file(&path) {
        eprintln!("could not load {}: {err}", path.display());
        return;
    }

    let creatures = [
        Creature::new("zombie", &["burning"], 0, 12),
        Creature::new("skeleton", &[], 0, 40),
        Creature::new("bat", &["flying"], 0, 45),
        Creature::new("slime", &[], 0, 45),
        Creature::new("lich", &["boss"], 0, 80),
    ];

    for mut creature in creatures {
        if let Err(err) = engine.act(&mut creature) {
            eprintln!("{}: {err}", creature.kind);
            continue;
        }
        println!(
            "{:<9} drops {:<6} and goes {}",
            creature.kind,
            creature.drop.as_deref().unwrap_or("-"),
            creature.sound.as_deref().unwrap_or("-"),
        );
    }
}
