//! Iron Reach: sparring demo
//!
//! Spawns two fighters and drives the combat engine round by round,
//! printing the narration each side receives. Deterministic under a fixed
//! seed.

use clap::{Parser, ValueEnum};

use iron_reach::combat::Combats;
use iron_reach::core::types::{EntityId, LocationId};
use iron_reach::entity::{trait_keys, Aggression, Combatant, Fighter, Roster};
use iron_reach::item::Item;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StanceArg {
    Aggressive,
    Neutral,
    Defensive,
}

impl From<StanceArg> for Aggression {
    fn from(value: StanceArg) -> Self {
        match value {
            StanceArg::Aggressive => Aggression::Aggressive,
            StanceArg::Neutral => Aggression::Neutral,
            StanceArg::Defensive => Aggression::Defensive,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "iron-reach", about = "Sparring demo for the combat core")]
struct Args {
    /// Dice seed; same seed, same fight
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Stop after this many rounds if nobody falls
    #[arg(long, default_value_t = 40)]
    max_rounds: u32,

    /// Stance for the challenger
    #[arg(long, value_enum, default_value = "neutral")]
    stance: StanceArg,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("iron_reach=info")),
        )
        .init();

    let args = Args::parse();
    let arena = LocationId(1);

    let mut roster = Roster::seeded(args.seed);
    let mut alder = Fighter::new("Alder", arena);
    alder.set_stat(trait_keys::STRENGTH, 3);
    alder.set_aggression(args.stance.into());
    let _ = alder.equipment_mut().equip(Item::sword());
    let alder = roster.spawn(alder);

    let mut bryn = Fighter::new("Bryn", arena);
    bryn.set_stat(trait_keys::CUNNING, 3);
    let _ = bryn.equipment_mut().equip(Item::spear());
    let bryn = roster.spawn(bryn);

    let mut combats = Combats::seeded(args.seed);

    println!("=== IRON REACH SPAR ===");
    println!("Alder (sword, {:?}) vs Bryn (spear)", Aggression::from(args.stance));
    println!();

    for round in 1..=args.max_rounds {
        println!("-- round {round} --");
        combats.attack_melee(&mut roster, alder, bryn);
        if fallen(&roster, bryn) {
            settle(&mut combats, &mut roster, bryn, round);
            break;
        }
        combats.attack_melee(&mut roster, bryn, alder);
        if fallen(&roster, alder) {
            settle(&mut combats, &mut roster, alder, round);
            break;
        }
        flush_outboxes(&mut roster, &[alder, bryn]);
        status(&roster, alder);
        status(&roster, bryn);

        // the demo fast-forwards the clock between rounds
        for id in [alder, bryn] {
            if let Some(fighter) = roster.fighter_mut(id) {
                fighter.cooldowns_mut().clear();
            }
        }
    }

    flush_outboxes(&mut roster, &[alder, bryn]);
}

fn fallen(roster: &Roster, id: EntityId) -> bool {
    roster.fighter(id).map_or(false, |f| !f.alive())
}

fn settle(combats: &mut Combats, roster: &mut Roster, loser: EntityId, round: u32) {
    let name = roster
        .fighter(loser)
        .map(|f| f.name().to_string())
        .unwrap_or_default();
    println!("{name} falls in round {round}!");
    combats.leave(roster, loser);
}

fn flush_outboxes(roster: &mut Roster, ids: &[EntityId]) {
    for &id in ids {
        if let Some(fighter) = roster.fighter_mut(id) {
            let name = fighter.name().to_string();
            for line in fighter.outbox().to_vec() {
                println!("  [{name}] {line}");
            }
            fighter.clear_outbox();
        }
    }
}

fn status(roster: &Roster, id: EntityId) {
    if let Some(fighter) = roster.fighter(id) {
        println!(
            "  {}: hp {} sp {}",
            fighter.name(),
            fighter.hp(),
            fighter.stamina()
        );
    }
}
