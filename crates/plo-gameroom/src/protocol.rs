use super::error::TableError;
use super::event::Event;
use super::message::ActionOption;
use super::message::ServerMessage;
use plo_core::Chips;
use plo_core::Position;
use plo_gameplay::Action;
use plo_gameplay::Game;

/// The seam between client inputs, internal events, and wire messages.
pub struct Protocol;

impl Protocol {
    /// Parses a client action into an engine action. Call and all-in
    /// amounts are computed server-side; bet and raise amounts are the
    /// additional chips the client pushes.
    pub fn decode(
        game: &Game,
        pos: Position,
        action: &str,
        amount: Option<Chips>,
    ) -> Result<Action, TableError> {
        match action {
            "fold" => Ok(Action::Fold),
            "check" => Ok(Action::Check),
            "call" => Ok(Action::Call(
                game.to_call(pos).min(game.seat(pos).stack()),
            )),
            "allin" => Ok(Action::Shove(game.seat(pos).stack())),
            "bet" => amount
                .map(Action::Bet)
                .ok_or_else(|| TableError::InvalidAction("bet needs an amount".into())),
            "raise" => amount
                .map(Action::Raise)
                .ok_or_else(|| TableError::InvalidAction("raise needs an amount".into())),
            other => Err(TableError::InvalidAction(other.to_string())),
        }
    }
    /// Validates a decoded action against the engine's rules.
    pub fn validate(game: &Game, pos: Position, action: Action) -> Result<Action, TableError> {
        match game.is_allowed(pos, &action) {
            true => Ok(action),
            false => Err(TableError::IllegalAction(action.to_string())),
        }
    }
    /// The acting seat's options with amount bounds, for
    /// `game:action_required`.
    pub fn options(game: &Game, pos: Position) -> Vec<ActionOption> {
        let stack = game.seat(pos).stack();
        game.legal_for(pos)
            .into_iter()
            .map(|action| match action {
                Action::Fold => ActionOption {
                    action: "fold".into(),
                    min_amount: None,
                    max_amount: None,
                },
                Action::Check => ActionOption {
                    action: "check".into(),
                    min_amount: None,
                    max_amount: None,
                },
                Action::Call(x) => ActionOption {
                    action: "call".into(),
                    min_amount: Some(x),
                    max_amount: Some(x),
                },
                Action::Bet(min) => ActionOption {
                    action: "bet".into(),
                    min_amount: Some(min),
                    max_amount: Some(game.to_pot_bet().min(stack - 1)),
                },
                Action::Raise(min) => ActionOption {
                    action: "raise".into(),
                    min_amount: Some(min),
                    max_amount: Some(game.to_pot_raise(pos).min(stack - 1)),
                },
                Action::Shove(x) => ActionOption {
                    action: "allin".into(),
                    min_amount: Some(x),
                    max_amount: Some(x),
                },
                Action::Blind(_) => unreachable!("blinds are never offered"),
            })
            .collect()
    }
    /// Converts a shared event into its wire message.
    pub fn encode(event: &Event) -> ServerMessage {
        match event {
            Event::PlayerJoined { seat, view } => ServerMessage::PlayerJoined {
                seat: *seat,
                player: view.clone(),
            },
            Event::PlayerLeft { seat, player } => ServerMessage::PlayerLeft {
                seat: *seat,
                player_id: player.to_string(),
            },
            Event::ActionTaken { player, action } => ServerMessage::ActionTaken {
                player_id: player.to_string(),
                action: action.kind().to_string(),
                amount: action.amount(),
            },
            Event::Showdown { winners, reveals } => ServerMessage::Showdown {
                winners: winners.clone(),
                players: reveals.clone(),
            },
            Event::HandComplete { winners } => ServerMessage::HandComplete {
                winners: winners.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plo_gameplay::Rake;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn game() -> Game {
        let mut game = Game::new(1, 3, Rake::none());
        game.occupy(0, 300);
        game.occupy(1, 300);
        game.begin(&mut SmallRng::seed_from_u64(1)).unwrap();
        game
    }

    #[test]
    fn decode_fills_in_server_side_amounts() {
        let game = game();
        assert_eq!(Protocol::decode(&game, 0, "fold", None), Ok(Action::Fold));
        assert_eq!(Protocol::decode(&game, 0, "call", None), Ok(Action::Call(2)));
        assert_eq!(
            Protocol::decode(&game, 0, "allin", None),
            Ok(Action::Shove(299))
        );
        assert_eq!(
            Protocol::decode(&game, 0, "raise", Some(8)),
            Ok(Action::Raise(8))
        );
        assert!(Protocol::decode(&game, 0, "raise", None).is_err());
        assert!(Protocol::decode(&game, 0, "jam", None).is_err());
    }

    #[test]
    fn validate_rejects_illegal_actions() {
        let game = game();
        assert!(Protocol::validate(&game, 0, Action::Call(2)).is_ok());
        assert!(matches!(
            Protocol::validate(&game, 0, Action::Check),
            Err(TableError::IllegalAction(_))
        ));
        assert!(Protocol::validate(&game, 0, Action::Raise(999)).is_err());
    }

    #[test]
    fn options_carry_amount_bounds() {
        let game = game();
        let options = Protocol::options(&game, 0);
        let raise = options.iter().find(|o| o.action == "raise").unwrap();
        assert_eq!(raise.min_amount, Some(5));
        assert_eq!(raise.max_amount, Some(8));
        let call = options.iter().find(|o| o.action == "call").unwrap();
        assert_eq!(call.min_amount, Some(2));
        assert!(!options.iter().any(|o| o.action == "check"));
    }
}
