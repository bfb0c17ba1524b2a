//! Random sample rounds for filling an empty database

use rand::Rng;

use crate::model::{MatchResult, Outcome, ValidationError};

/// Teams drawn into matches. Must have an even number of entries.
pub const TEAMS: [&str; 20] = [
    "At. Madrid",
    "R. Madrid",
    "FC Barcelona",
    "Sevilla FC",
    "RCD Espanyol",
    "Real Sociedad",
    "Getafe CF",
    "Real Betis",
    "Levante UD",
    "RC Celta",
    "CA Osasuna",
    "Rayo Vallecano",
    "Deportivo Alavés",
    "Elche CF",
    "Athletic Club",
    "Valencia CF",
    "RCD Mallorca",
    "Villarreal CF",
    "Cádiz CF",
    "Granada CF",
];

/// Six-sided die: three home wins, two draws, one away win
const DIE: [Outcome; 6] = [
    Outcome::Home1,
    Outcome::Home1,
    Outcome::Home1,
    Outcome::Draw,
    Outcome::Draw,
    Outcome::Away2,
];

/// Pair every team at random and roll a result for each match
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<MatchResult>, ValidationError> {
    let mut bag: Vec<&str> = TEAMS.to_vec();
    let mut round = Vec::with_capacity(TEAMS.len() / 2);

    while bag.len() >= 2 {
        let home = bag.remove(rng.gen_range(0..bag.len()));
        let away = bag.remove(rng.gen_range(0..bag.len()));
        let outcome = DIE[rng.gen_range(0..DIE.len())];
        round.push(MatchResult::new(home, away, outcome)?);
    }

    Ok(round)
}
