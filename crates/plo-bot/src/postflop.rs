use plo_cards::Board;
use plo_cards::Hole;
use plo_cards::Rank;

/// Coarse board texture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    /// The board has a paired rank: full houses are live.
    pub paired: bool,
    /// Three or more of one suit: a flush is possible.
    pub suited: bool,
    /// Three board ranks pack into a five-rank window.
    pub connected: bool,
}

pub fn texture(board: &Board) -> Texture {
    let mut rank_counts = [0usize; 13];
    let mut suit_counts = [0usize; 4];
    for card in board.cards() {
        rank_counts[u8::from(card.rank()) as usize] += 1;
        suit_counts[u8::from(card.suit()) as usize] += 1;
    }
    let paired = rank_counts.iter().any(|&n| n >= 2);
    let suited = suit_counts.iter().any(|&n| n >= 3);
    let connected = (0..=8).any(|lo| {
        (lo..lo + 5)
            .filter(|&r| rank_counts[r] > 0)
            .count()
            >= 3
    });
    Texture {
        paired,
        suited,
        connected,
    }
}

/// Two hole cards of a suit with exactly two more on an incomplete board.
pub fn flush_draw(hole: &Hole, board: &Board) -> bool {
    if board.size() >= 5 {
        return false;
    }
    let mut hole_suits = [0usize; 4];
    let mut board_suits = [0usize; 4];
    for card in hole.cards() {
        hole_suits[u8::from(card.suit()) as usize] += 1;
    }
    for card in board.cards() {
        board_suits[u8::from(card.suit()) as usize] += 1;
    }
    (0..4).any(|s| hole_suits[s] >= 2 && board_suits[s] == 2)
}

/// Rough straight-draw detection: some five-rank window is four-fifths
/// covered using at least two hole ranks and at least two board ranks.
/// Coarse by design; the bot only needs a semi-bluff trigger.
pub fn straight_draw(hole: &Hole, board: &Board) -> bool {
    if board.size() >= 5 {
        return false;
    }
    let mut hole_ranks = [false; 14];
    let mut board_ranks = [false; 14];
    for card in hole.cards() {
        hole_ranks[u8::from(card.rank()) as usize + 1] = true;
    }
    for card in board.cards() {
        board_ranks[u8::from(card.rank()) as usize + 1] = true;
    }
    // the ace also plays low in the wheel window
    hole_ranks[0] = hole_ranks[u8::from(Rank::Ace) as usize + 1];
    board_ranks[0] = board_ranks[u8::from(Rank::Ace) as usize + 1];
    (0..=9).any(|lo| {
        let window = lo..lo + 5;
        let hole_hits = window.clone().filter(|&r| hole_ranks[r]).count();
        let board_hits = window
            .clone()
            .filter(|&r| board_ranks[r] && !hole_ranks[r])
            .count();
        hole_hits >= 2 && hole_hits + board_hits >= 4
    })
}
