//! Narration strings for combat events
//!
//! Lines carry `$You()` / `$conj(verb)` / `$pron(your)` substitution markers
//! and `{name}` tokens; the host's text formatter resolves them per viewer.
//! Private failure lines come from `CombatError`'s display text instead.

/// Broadcast: a swing lands.
pub fn hit(target: &str, weapon: &str, damage: i32) -> String {
    format!("$You() $conj(strike) {target} with $pron(your) {weapon} for {damage} damage!")
}

/// Targeted: the attacker watches a swing go wide.
pub fn miss_attacker(target: &str) -> String {
    format!("$You() $conj(swing) wide of {target}.")
}

/// Targeted: the defender slips a swing.
pub fn miss_target(attacker: &str) -> String {
    format!("{attacker} swings at $you() and misses.")
}

/// Broadcast: a shield takes the blow.
pub fn blocked(target: &str, weapon: &str) -> String {
    format!("{target} catches $pron(your) {weapon} on their shield.")
}

/// Broadcast: steel turns steel.
pub fn parried(target: &str, weapon: &str) -> String {
    format!("{target} turns $pron(your) {weapon} aside with their own blade.")
}

/// Broadcast: armor soaks everything.
pub fn absorbed(target: &str, weapon: &str) -> String {
    format!("$Pron(your) {weapon} fails to pierce {target}'s armor.")
}

/// Broadcast: a step in.
pub fn advance(target: &str) -> String {
    format!("$You() $conj(advance) on {target}.")
}

/// Broadcast: a step out.
pub fn retreat(target: &str) -> String {
    format!("$You() $conj(fall) back from {target}.")
}

/// Broadcast to the abandoned room: someone ran.
pub fn flee(name: &str) -> String {
    format!("{name} breaks away and flees the fight!")
}

/// Targeted: the mover is already as close as the line allows.
pub fn no_closer(target: &str) -> String {
    format!("$You() can get no closer to {target}.")
}

/// Targeted: the line's end is at the mover's back.
pub fn no_further(target: &str) -> String {
    format!("$You() can fall back no further from {target}.")
}

/// Targeted: no exit to run through.
pub fn no_escape() -> String {
    "There is nowhere to run!".to_string()
}

/// Targeted: nothing wielded that can shoot.
pub fn nothing_to_shoot() -> String {
    "$You() $conj(have) nothing to shoot with.".to_string()
}

/// Targeted: last one standing.
pub fn victory() -> String {
    "The fight is over. $You() $conj(stand) victorious.".to_string()
}

/// Targeted: the fight dissolved without a victor.
pub fn combat_over() -> String {
    "The fight is over.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_lines_carry_markers() {
        assert!(hit("bram", "sword", 4).contains("$You()"));
        assert!(hit("bram", "sword", 4).contains("$conj("));
        assert!(blocked("bram", "sword").contains("$pron(your)"));
        assert!(victory().contains("$conj(stand)"));
    }

    #[test]
    fn test_names_are_spliced_in() {
        assert!(miss_attacker("bram").contains("bram"));
        assert!(flee("ash").contains("ash"));
    }
}
