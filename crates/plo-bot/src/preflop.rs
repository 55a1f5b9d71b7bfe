use plo_cards::Hole;
use plo_cards::Rank;
use plo_cards::Suit;
use plo_gameplay::Spot;

/// Preflop hole strength in [0, 1].
///
/// Scores orthogonal factors of Omaha starting hands: pairs weighted
/// toward the top, suitedness (double-suited best), connectivity of the
/// four ranks, high-card nuttiness, and bonus marks for the premium
/// shapes (AAxx double-suited, AAJT, KKQQ, suited rundowns).
pub fn score(hole: &Hole) -> f64 {
    let ranks = sorted_ranks(hole);
    let score = pairs(&ranks) + suits(hole) + connectivity(&ranks) + nuttiness(&ranks)
        + premium(hole, &ranks);
    score.clamp(0.0, 1.0)
}

/// Seat position shifts the playable range.
pub fn position_bonus(spot: Option<Spot>) -> f64 {
    match spot {
        Some(Spot::Button) | Some(Spot::Cutoff) => 0.05,
        Some(Spot::Hijack) => 0.02,
        Some(Spot::SmallBlind) | Some(Spot::BigBlind) => -0.02,
        _ => 0.0,
    }
}

/// Ranks descending, as numeric values 0..13.
fn sorted_ranks(hole: &Hole) -> Vec<u8> {
    let mut ranks = hole
        .cards()
        .iter()
        .map(|c| u8::from(c.rank()))
        .collect::<Vec<_>>();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    ranks
}

fn pairs(ranks: &[u8]) -> f64 {
    let mut score: f64 = 0.0;
    let mut seen = Vec::new();
    for &r in ranks {
        if seen.contains(&r) {
            continue;
        }
        let count = ranks.iter().filter(|&&x| x == r).count();
        if count >= 2 {
            // trips and quads in the hole are dead weight in Omaha;
            // only the plain pair value counts
            score += match Rank::from(r) {
                Rank::Ace => 0.30,
                Rank::King => 0.22,
                Rank::Queen => 0.16,
                Rank::Jack => 0.12,
                Rank::Ten | Rank::Nine => 0.08,
                _ => 0.05,
            };
            if count > 2 {
                score -= 0.06;
            }
            seen.push(r);
        }
    }
    score
}

fn suits(hole: &Hole) -> f64 {
    let mut counts = [0usize; 4];
    for card in hole.cards() {
        counts[u8::from(card.suit()) as usize] += 1;
    }
    let suited = counts.iter().filter(|&&n| n >= 2).count();
    let aces_up = hole
        .cards()
        .iter()
        .filter(|c| c.rank() == Rank::Ace)
        .map(|c| c.suit())
        .collect::<Vec<Suit>>();
    let nut_suit = aces_up
        .iter()
        .any(|&s| counts[u8::from(s) as usize] >= 2);
    let base = match suited {
        2 => 0.12,
        1 => 0.06,
        _ => 0.0,
    };
    base + if nut_suit { 0.02 } else { 0.0 }
}

fn connectivity(ranks: &[u8]) -> f64 {
    let mut distinct = ranks.to_vec();
    distinct.dedup();
    if distinct.len() < 2 {
        return 0.0;
    }
    let span = distinct.first().unwrap() - distinct.last().unwrap();
    match (distinct.len(), span) {
        // rundowns: four distinct ranks packed tightly
        (4, 3) => 0.15,
        (4, 4) => 0.12,
        (4, 5) => 0.08,
        (3, s) if s <= 3 => 0.08,
        (2, s) if s <= 2 => 0.04,
        _ => 0.0,
    }
}

fn nuttiness(ranks: &[u8]) -> f64 {
    // broadway cards make nut straights, nut flushes, top sets
    ranks
        .iter()
        .filter(|&&r| r >= u8::from(Rank::Ten))
        .count() as f64
        * 0.025
}

fn premium(hole: &Hole, ranks: &[u8]) -> f64 {
    let mut counts = [0usize; 4];
    for card in hole.cards() {
        counts[u8::from(card.suit()) as usize] += 1;
    }
    let double_suited = counts.iter().filter(|&&n| n >= 2).count() == 2;
    let has = |rank: Rank, n: usize| ranks.iter().filter(|&&r| r == u8::from(rank)).count() >= n;
    let mut score = 0.0;
    if double_suited && has(Rank::Ace, 2) {
        score += 0.15;
    }
    if double_suited && has(Rank::Ace, 2) && has(Rank::Jack, 1) && has(Rank::Ten, 1) {
        score += 0.08;
    }
    if double_suited && has(Rank::King, 2) && has(Rank::Queen, 2) {
        score += 0.10;
    }
    // suited broadway rundown
    let mut distinct = ranks.to_vec();
    distinct.dedup();
    if double_suited && distinct.len() == 4 && distinct[3] >= u8::from(Rank::Eight) {
        score += 0.05;
    }
    score
}
