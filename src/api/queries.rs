use crate::domain::Card;
use crate::engine::{CardAction, GameSession, RandomSource};
use crate::room::Room;

use super::dto::{
    GameStateDto, LegalPlayDto, ParticipantDto, PlayerPublicDto, RosterDto, StateSummaryDto,
};

/// Сформировать публичное состояние партии.
pub fn build_game_state<R: RandomSource>(session: &GameSession<R>) -> GameStateDto {
    let players = session
        .players
        .iter()
        .map(|p| PlayerPublicDto {
            slot: p.slot,
            team: p.team,
            hand_size: p.hand.len(),
        })
        .collect();

    GameStateDto {
        status: session.status,
        current_player: session.current_player,
        winner_team: session.winner_team,
        pawns: session.board.pawns.clone(),
        players,
        deck_size: session.deck.len(),
        discard_size: session.discard.len(),
        discard_top: session.discard.last().copied(),
        turns_played: session.turns_played,
        fault: session.fault().map(str::to_string),
    }
}

pub fn build_summary<R: RandomSource>(session: &GameSession<R>) -> StateSummaryDto {
    StateSummaryDto {
        status: session.status,
        current_player: session.current_player,
        winner_team: session.winner_team,
        pawns: session.board.pawns.clone(),
    }
}

/// Состав комнаты в порядке входа участников.
pub fn build_roster(room: &Room) -> RosterDto {
    let participants = room
        .participants
        .iter()
        .map(|p| ParticipantDto {
            participant_id: p.id,
            name: p.name.clone(),
            slot: p.slot,
            team: p.team,
            is_ready: p.is_ready,
            is_host: room.host == Some(p.id),
            online: p.connection.is_some(),
        })
        .collect();

    let host = room
        .host
        .and_then(|id| room.participants.iter().find(|p| p.id == id))
        .map(|p| p.name.clone());

    RosterDto {
        room_id: room.id.clone(),
        status: room.status(),
        host,
        participants,
    }
}

pub fn build_legal_plays(plays: Vec<(Card, CardAction)>) -> Vec<LegalPlayDto> {
    plays
        .into_iter()
        .map(|(card, action)| LegalPlayDto { card, action })
        .collect()
}
