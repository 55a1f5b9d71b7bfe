use super::pot::Pot;
use plo_cards::Board;
use plo_cards::Deck;
use plo_cards::Hand;
use plo_cards::Hole;
use plo_cards::Strength;
use plo_core::Chips;
use plo_core::EQUITY_EXACT_FLOP_PLAYERS;
use plo_core::EQUITY_ITERATIONS;
use plo_core::Position;
use plo_core::Probability;
use rand::Rng;
use std::collections::BTreeMap;

/// A seat's stake in an all-in adjudication.
///
/// Seats without a full four-card hole (e.g. mucked or hidden) are
/// excluded from equity shares but their chips stay in the pots.
#[derive(Debug, Clone, Copy)]
pub struct Entrant {
    pub seat: Position,
    pub hole: Option<Hole>,
    pub folded: bool,
    pub spent: Chips,
}

/// Win probabilities under a random run-out, summing to one.
///
/// - River: a single showdown comparison, ties splitting evenly.
/// - Turn: exact enumeration of every river card.
/// - Flop: exact turn-and-river enumeration for small fields, Monte
///   Carlo beyond [`EQUITY_EXACT_FLOP_PLAYERS`] entrants.
/// - Preflop: Monte Carlo at [`EQUITY_ITERATIONS`] samples.
///
/// Entrants with no hole cards are skipped and absent from the result.
pub fn equities(
    board: &Board,
    entrants: &[(Position, Option<Hole>)],
    rng: &mut impl Rng,
) -> Vec<(Position, Probability)> {
    let players = entrants
        .iter()
        .filter_map(|(p, h)| h.map(|h| (*p, h)))
        .collect::<Vec<_>>();
    match players.len() {
        0 => return Vec::new(),
        1 => return vec![(players[0].0, 1.0)],
        _ => {}
    }
    let dead = players
        .iter()
        .fold(Hand::from(board), |dead, (_, h)| {
            Hand::or(dead, Hand::from(*h))
        });
    let live = Deck::without(&dead).cards().to_vec();
    let mut weights = vec![0.0; players.len()];
    let mut trials = 0usize;
    match board.size() {
        5 => {
            accumulate(board, &players, &mut weights);
            trials = 1;
        }
        4 => {
            for &river in live.iter() {
                let mut complete = board.clone();
                complete.add(river);
                accumulate(&complete, &players, &mut weights);
                trials += 1;
            }
        }
        3 if players.len() <= EQUITY_EXACT_FLOP_PLAYERS => {
            for i in 0..live.len() {
                for j in i + 1..live.len() {
                    let mut complete = board.clone();
                    complete.add(live[i]);
                    complete.add(live[j]);
                    accumulate(&complete, &players, &mut weights);
                    trials += 1;
                }
            }
        }
        _ => {
            let need = 5 - board.size();
            for _ in 0..EQUITY_ITERATIONS {
                let mut complete = board.clone();
                for i in rand::seq::index::sample(rng, live.len(), need) {
                    complete.add(live[i]);
                }
                accumulate(&complete, &players, &mut weights);
                trials += 1;
            }
        }
    }
    players
        .iter()
        .zip(weights)
        .map(|((p, _), w)| (*p, w / trials as Probability))
        .collect()
}

fn accumulate(board: &Board, players: &[(Position, Hole)], weights: &mut [Probability]) {
    debug_assert!(board.size() == 5);
    let strengths = players
        .iter()
        .map(|(_, hole)| Strength::omaha(hole, board))
        .collect::<Vec<_>>();
    let best = *strengths.iter().max().expect("non-empty field");
    let tied = strengths
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == best)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let share = 1.0 / tied.len() as Probability;
    for i in tied {
        weights[i] += share;
    }
}

/// Expected profit per live seat if the hand were run out now, relative
/// to chips already invested.
///
/// Each pot with two or more showdown-eligible entrants is shared by
/// equity; a pot with a single eligible entrant goes to them whole.
/// Folded seats never appear in the result. When no entrant had to be
/// dropped for missing cards, the profits sum to exactly zero: rounding
/// residue lands on the seat with the largest share.
pub fn allin_ev_profits(
    board: &Board,
    entrants: &[Entrant],
    pots: &[Pot],
    rng: &mut impl Rng,
) -> Vec<(Position, Chips)> {
    let mut shares = entrants
        .iter()
        .filter(|e| !e.folded && e.hole.is_some())
        .map(|e| (e.seat, 0.0))
        .collect::<BTreeMap<Position, Probability>>();
    for pot in pots.iter() {
        let eligible = pot
            .eligible()
            .iter()
            .filter_map(|p| entrants.iter().find(|e| e.seat == *p))
            .filter(|e| !e.folded && e.hole.is_some())
            .map(|e| (e.seat, e.hole))
            .collect::<Vec<_>>();
        match eligible.len() {
            0 => {}
            1 => {
                *shares.get_mut(&eligible[0].0).expect("keyed above") += pot.amount() as Probability;
            }
            _ => {
                for (seat, equity) in equities(board, &eligible, rng) {
                    *shares.get_mut(&seat).expect("keyed above") +=
                        pot.amount() as Probability * equity;
                }
            }
        }
    }
    let spent = |seat: Position| {
        entrants
            .iter()
            .find(|e| e.seat == seat)
            .map(|e| e.spent)
            .unwrap_or(0)
    };
    let mut profits = shares
        .iter()
        .map(|(&seat, &share)| (seat, (share - spent(seat) as Probability).round() as Chips))
        .collect::<Vec<_>>();
    // per-seat rounding can drift off the exact total; push the residue
    // onto the seat with the largest share
    if !profits.is_empty() {
        let target = shares
            .iter()
            .map(|(&seat, &share)| share - spent(seat) as Probability)
            .sum::<Probability>()
            .round() as Chips;
        let residue = profits.iter().map(|(_, p)| *p).sum::<Chips>() - target;
        let top = shares
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&seat, _)| seat)
            .expect("non-empty shares");
        for (seat, profit) in profits.iter_mut() {
            if *seat == top {
                *profit -= residue;
            }
        }
    }
    profits
}
