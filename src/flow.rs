//! Move submitter: the request sequences behind every state-changing
//! action (start, user move, AI move, undo, quit). Each sequence runs
//! its round-trips one after another and re-validates the session token
//! after every await so responses from a quit or restarted session are
//! dropped on the floor. Transport failures surface as a status message
//! and always return the interaction mode to idle.

use gloo_net::Error;
use yew::UseReducerHandle;

use crate::api;
use crate::model::{Coord, Dimensions, GameAction, GameState, InteractionMode, MoveGuard};
use crate::state::session::{Session, SessionToken};
use crate::util::clog;

type Game = UseReducerHandle<GameState>;

fn fault(game: &Game, session: &Session, token: SessionToken, err: &Error) {
    clog(&format!("rules engine request failed: {err}"));
    for action in fault_actions(session, token, err) {
        game.dispatch(action);
    }
}

/// A failure from a quit or restarted session is logged and otherwise
/// dropped; it must not clobber state the newer session already owns.
fn fault_actions(session: &Session, token: SessionToken, err: &Error) -> Vec<GameAction> {
    if !session.is_current(token) {
        return Vec::new();
    }
    vec![
        GameAction::SetStatus(format!("Connection problem: {err}")),
        GameAction::SetMode(InteractionMode::Idle),
    ]
}

async fn refresh_mirror(game: &Game, session: &Session, token: SessionToken) -> Result<(), Error> {
    let snapshot = api::fetch_board().await?;
    if session.is_current(token) {
        game.dispatch(GameAction::BoardFetched(snapshot));
    }
    Ok(())
}

/// Winner query first; the draw query only runs when nobody has won.
async fn refresh_status(game: &Game, session: &Session, token: SessionToken) -> Result<(), Error> {
    let winner = api::check_winner().await?;
    let draw = if winner.is_some() {
        false
    } else {
        api::is_draw().await?
    };
    if session.is_current(token) {
        game.dispatch(GameAction::StatusRefreshed { winner, draw });
    }
    Ok(())
}

/// Page-load sync: derive the in-progress flag from the legal-move list,
/// then mirror whatever game the server already has.
pub async fn sync_on_load(game: Game, session: Session) {
    let token = session.token();
    let outcome: Result<(), Error> = async {
        let in_progress = api::any_valid_moves().await?;
        if session.is_current(token) {
            game.dispatch(GameAction::SyncInProgress(in_progress));
        }
        refresh_mirror(&game, &session, token).await?;
        if in_progress {
            refresh_status(&game, &session, token).await?;
        }
        Ok(())
    }
    .await;
    if let Err(e) = outcome {
        fault(&game, &session, token, &e);
    }
}

/// Starts (or restarts) a game with the given parameters. Opens a fresh
/// session epoch so anything still in flight from before is stale.
pub async fn start_game(game: Game, session: Session, dims: Dimensions) {
    let token = session.bump();
    let outcome: Result<(), Error> = async {
        api::start(&dims).await?;
        if session.is_current(token) {
            game.dispatch(GameAction::Started { dims });
        }
        refresh_mirror(&game, &session, token).await
    }
    .await;
    if let Err(e) = outcome {
        fault(&game, &session, token, &e);
    }
}

/// The user-move sequence: guard -> submit -> switch turn -> refresh
/// mirror -> refresh status. Nothing is applied optimistically; the
/// local state only changes after the engine confirms.
pub async fn submit_user_move(game: Game, session: Session, coord: Coord) {
    match game.can_submit() {
        MoveGuard::Ready => {}
        MoveGuard::AlreadyWon(w) => {
            game.dispatch(GameAction::SetStatus(format!(
                "Player {} has already won!",
                w.label()
            )));
            return;
        }
        // Silently swallowed, matching a click landing mid-AI-turn.
        MoveGuard::AiBusy | MoveGuard::NoGame => return,
    }
    let token = session.token();
    let outcome: Result<(), Error> = async {
        if !api::submit_move(coord).await? {
            if session.is_current(token) {
                game.dispatch(GameAction::SetStatus("Invalid move!".to_string()));
            }
            return Ok(());
        }
        api::switch_player().await?;
        refresh_mirror(&game, &session, token).await?;
        refresh_status(&game, &session, token).await
    }
    .await;
    if let Err(e) = outcome {
        fault(&game, &session, token, &e);
    }
}

/// The AI-move sequence. `AiThinking` is entered before the search
/// request and left when the refresh completes or anything fails.
pub async fn ai_move(game: Game, session: Session, search_depth: u32) {
    match game.can_submit() {
        MoveGuard::Ready => {}
        MoveGuard::AlreadyWon(w) => {
            game.dispatch(GameAction::SetStatus(format!(
                "Player {} has already won!",
                w.label()
            )));
            return;
        }
        MoveGuard::AiBusy | MoveGuard::NoGame => return,
    }
    let token = session.token();
    game.dispatch(GameAction::SetMode(InteractionMode::AiThinking));
    game.dispatch(GameAction::SetStatus("Computer is thinking ...".to_string()));
    let outcome: Result<(), Error> = async {
        api::run_ai_search(search_depth).await?;
        refresh_mirror(&game, &session, token).await?;
        refresh_status(&game, &session, token).await
    }
    .await;
    match outcome {
        Ok(()) => {
            if session.is_current(token) {
                game.dispatch(GameAction::SetMode(InteractionMode::Idle));
            }
        }
        Err(e) => fault(&game, &session, token, &e),
    }
}

pub async fn undo_move(game: Game, session: Session) {
    let token = session.token();
    let outcome: Result<(), Error> = async {
        api::undo().await?;
        refresh_mirror(&game, &session, token).await?;
        refresh_status(&game, &session, token).await
    }
    .await;
    if let Err(e) = outcome {
        fault(&game, &session, token, &e);
    }
}

/// Quit invalidates the session first, so a move or AI response still in
/// flight can no longer touch the cleared state.
pub async fn quit_game(game: Game, session: Session) {
    let token = session.bump();
    match api::quit().await {
        Ok(()) => game.dispatch(GameAction::Quit),
        Err(e) => fault(&game, &session, token, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_from_a_quit_session_is_dropped() {
        let session = Session::default();
        let token = session.token();
        session.bump();
        let err = Error::GlooError("connection refused".to_string());
        assert!(fault_actions(&session, token, &err).is_empty());
    }

    #[test]
    fn current_failure_reports_and_unlocks_the_controls() {
        let session = Session::default();
        let token = session.token();
        let err = Error::GlooError("connection refused".to_string());
        let actions = fault_actions(&session, token, &err);
        assert_eq!(actions.len(), 2);
        assert!(
            matches!(&actions[0], GameAction::SetStatus(s) if s.starts_with("Connection problem"))
        );
        assert!(matches!(
            actions[1],
            GameAction::SetMode(InteractionMode::Idle)
        ));
    }
}
