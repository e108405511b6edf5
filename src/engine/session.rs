use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::domain::deck::DECK_SIZE;
use crate::domain::topology::{team_of_slot, HAND_SIZE, PLAYER_COUNT};
use crate::domain::{Board, Card, Deck, PlayerSeat, Slot, Team};
use crate::engine::actions::CardAction;
use crate::engine::errors::EngineError;
use crate::engine::events::{EventLog, GameEventKind};
use crate::engine::rules::{legal_plays, resolve_play};
use crate::engine::RandomSource;

/// Статус партии. Переходы только вперёд: Waiting -> Started -> Finished.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Waiting,
    Started,
    Finished,
}

/// Итог принятого хода (розыгрыш карты или пас).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Порядковый номер хода в партии (с 1).
    pub turn: u32,
    pub slot: Slot,
    pub card: Option<Card>,
    pub events: EventLog,
    /// Следующий игрок.
    pub current_player: Slot,
    /// Команда-победитель, если этот ход закончил партию.
    pub winner: Option<Team>,
}

/// Состояние одной партии.
///
/// Единственный писатель – комната, которой принадлежит сессия.
/// Любой отказ происходит до первой мутации.
pub struct GameSession<R: RandomSource> {
    pub board: Board,
    pub deck: Deck,
    /// Сброс, верхняя карта – последняя.
    pub discard: Vec<Card>,
    pub players: Vec<PlayerSeat>,
    pub current_player: Slot,
    pub status: GameStatus,
    pub winner_team: Option<Team>,
    /// Сколько ходов принято.
    pub turns_played: u32,
    /// Причина, по которой сессия заблокирована (нарушен инвариант).
    fault: Option<String>,
    rng: R,
}

impl<R: RandomSource> GameSession<R> {
    /// Новая партия: перемешанная колода, по 5 карт каждому, все пешки в базе.
    /// Статус `Waiting` до явного `start`.
    pub fn new(mut rng: R) -> Self {
        let mut deck = Deck::standard_52();
        rng.shuffle(&mut deck.cards);

        let mut players: Vec<PlayerSeat> = (0..PLAYER_COUNT as Slot).map(PlayerSeat::new).collect();
        for player in players.iter_mut() {
            player.hand = deck.draw_n(HAND_SIZE);
        }

        Self {
            board: Board::new(),
            deck,
            discard: Vec::new(),
            players,
            current_player: 0,
            status: GameStatus::Waiting,
            winner_team: None,
            turns_played: 0,
            fault: None,
            rng,
        }
    }

    /// Waiting -> Started. `teams[slot]` – команда места, по два места на команду.
    pub fn start(&mut self, teams: [Team; PLAYER_COUNT]) -> Result<(), EngineError> {
        self.ensure_healthy()?;
        if self.status != GameStatus::Waiting {
            return Err(EngineError::AlreadyStarted);
        }
        let team0 = teams.iter().filter(|&&t| t == 0).count();
        let team1 = teams.iter().filter(|&&t| t == 1).count();
        if team0 != 2 || team1 != 2 {
            return Err(EngineError::InvalidTeams(teams));
        }

        for (player, team) in self.players.iter_mut().zip(teams) {
            player.team = team;
        }
        self.current_player = 0;
        self.status = GameStatus::Started;
        info!(?teams, "game started");
        Ok(())
    }

    /// Старт с командами по чётности места (0,2 против 1,3).
    pub fn start_default(&mut self) -> Result<(), EngineError> {
        let teams = [0, 1, 2, 3].map(team_of_slot);
        self.start(teams)
    }

    pub fn hand(&self, slot: Slot) -> Option<&[Card]> {
        self.players.get(slot as usize).map(|p| p.hand.as_slice())
    }

    pub fn team_of(&self, slot: Slot) -> Option<Team> {
        self.players.get(slot as usize).map(|p| p.team)
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Сыграть карту. Либо ошибка без мутаций, либо ход принят целиком.
    pub fn play_card(
        &mut self,
        slot: Slot,
        card: Card,
        action: &CardAction,
    ) -> Result<TurnOutcome, EngineError> {
        self.ensure_turn(slot)?;
        if !self.players[slot as usize].has_card(&card) {
            return Err(EngineError::CardNotInHand(card));
        }

        let resolution = resolve_play(&self.board, slot, card, action)?;
        if let Err(reason) = resolution.board.check_invariants() {
            return Err(self.poison(reason));
        }

        self.board = resolution.board;
        let mut events = resolution.events;
        self.consume_card(slot, card, &mut events);
        debug!(slot, %card, action = action.kind(), events = events.len(), "card played");

        Ok(self.finish_turn(slot, Some(card), events))
    }

    /// Пас. С картой – сброс и добор, без карты – только передача хода.
    pub fn pass_turn(&mut self, slot: Slot, card: Option<Card>) -> Result<TurnOutcome, EngineError> {
        self.ensure_turn(slot)?;
        if let Some(card) = card {
            if !self.players[slot as usize].has_card(&card) {
                return Err(EngineError::CardNotInHand(card));
            }
        }

        let mut events = EventLog::new();
        if let Some(card) = card {
            self.consume_card(slot, card, &mut events);
        } else {
            self.advance_turn();
        }
        events.push(GameEventKind::TurnPassed { slot });
        debug!(slot, card = ?card, "turn passed");

        Ok(self.finish_turn(slot, card, events))
    }

    /// Все действия, которые сейчас принял бы движок от `slot`.
    pub fn legal_plays(&self, slot: Slot) -> Vec<(Card, CardAction)> {
        match self.players.get(slot as usize) {
            Some(player) => legal_plays(&self.board, slot, &player.hand),
            None => Vec::new(),
        }
    }

    pub fn can_play_any_card(&self, slot: Slot) -> bool {
        !self.legal_plays(slot).is_empty()
    }

    /// Команда, у которой все 8 пешек дошли до конца.
    pub fn check_victory(&self) -> Option<Team> {
        [0, 1].into_iter().find(|&team| {
            let members: Vec<Slot> = self
                .players
                .iter()
                .filter(|p| p.team == team)
                .map(|p| p.slot)
                .collect();
            members.len() == 2 && members.iter().all(|&slot| self.board.all_finished(slot))
        })
    }

    /// Колода + сброс + все руки. Должно быть 52 всегда.
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.discard.len() + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// Проверка всех инвариантов агрегата.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.board.check_invariants()?;
        if self.players.len() != PLAYER_COUNT {
            return Err(format!("{} players at the table", self.players.len()));
        }
        let cards = self.card_count();
        if cards != DECK_SIZE {
            return Err(format!("{cards} cards in play instead of {DECK_SIZE}"));
        }
        Ok(())
    }

    fn ensure_healthy(&self) -> Result<(), EngineError> {
        match &self.fault {
            Some(reason) => Err(EngineError::Corrupted(reason.clone())),
            None => Ok(()),
        }
    }

    fn ensure_turn(&self, slot: Slot) -> Result<(), EngineError> {
        self.ensure_healthy()?;
        match self.status {
            GameStatus::Waiting => return Err(EngineError::NotStarted),
            GameStatus::Finished => return Err(EngineError::GameFinished),
            GameStatus::Started => {}
        }
        if slot as usize >= self.players.len() {
            return Err(EngineError::InvalidSlot(slot));
        }
        if self.current_player != slot {
            return Err(EngineError::NotYourTurn {
                slot,
                current: self.current_player,
            });
        }
        Ok(())
    }

    /// Заблокировать сессию: дальше никаких мутаций.
    fn poison(&mut self, reason: String) -> EngineError {
        error!(%reason, "invariant violated, session locked");
        self.fault = Some(reason.clone());
        EngineError::Corrupted(reason)
    }

    /// Сброс карты, при необходимости перетасовка сброса, добор, передача хода.
    fn consume_card(&mut self, slot: Slot, card: Card, events: &mut EventLog) {
        let player = &mut self.players[slot as usize];
        player.remove_card(&card);
        self.discard.push(card);
        events.push(GameEventKind::CardDiscarded { slot, card });

        if self.deck.is_empty() && self.discard.len() > 1 {
            self.reshuffle_discard(events);
        }

        if let Some(drawn) = self.deck.draw_one() {
            self.players[slot as usize].hand.push(drawn);
            events.push(GameEventKind::CardDrawn { slot });
        }

        self.advance_turn();
    }

    /// Весь сброс, кроме верхней карты, уходит в новую колоду.
    fn reshuffle_discard(&mut self, events: &mut EventLog) {
        let Some(top) = self.discard.pop() else {
            return;
        };
        self.deck.cards = std::mem::take(&mut self.discard);
        self.rng.shuffle(&mut self.deck.cards);
        self.discard.push(top);

        debug!(deck_size = self.deck.len(), "discard reshuffled into deck");
        events.push(GameEventKind::DeckReshuffled {
            deck_size: self.deck.len(),
        });
    }

    fn advance_turn(&mut self) {
        self.current_player = (self.current_player + 1) % self.players.len() as Slot;
    }

    fn finish_turn(&mut self, slot: Slot, card: Option<Card>, mut events: EventLog) -> TurnOutcome {
        self.turns_played += 1;

        let winner = self.check_victory();
        if let Some(team) = winner {
            self.status = GameStatus::Finished;
            self.winner_team = Some(team);
            events.push(GameEventKind::GameWon { team });
            info!(team, turn = self.turns_played, "game won");
        }

        TurnOutcome {
            turn: self.turns_played,
            slot,
            card,
            events,
            current_player: self.current_player,
            winner,
        }
    }
}
