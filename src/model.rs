//! Core data model: board snapshot mirrored from the rules engine,
//! game session state, and the reducer actions that mutate it.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

/// One cell symbol as it appears on the wire (`.`, `X`, `O`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Symbol {
    Empty,
    X,
    O,
}

impl TryFrom<char> for Symbol {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(Symbol::Empty),
            'X' => Ok(Symbol::X),
            'O' => Ok(Symbol::O),
            other => Err(format!("unknown cell symbol '{}'", other)),
        }
    }
}

impl From<Symbol> for char {
    fn from(s: Symbol) -> char {
        match s {
            Symbol::Empty => '.',
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }
}

impl Symbol {
    pub fn label(&self) -> char {
        char::from(*self)
    }
}

/// Logical grid coordinate. `y` is a row index counted from the top layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Game parameters chosen before start; immutable for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub win_length: u32,
    pub ai_depth: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            depth: 3,
            win_length: 3,
            ai_depth: 2,
        }
    }
}

/// Last-fetched board state. Replaced wholesale on every refresh so the
/// render pipeline never observes a half-updated grid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BoardSnapshot {
    /// Nested `[depth][height][width]`.
    pub board: Vec<Vec<Vec<Symbol>>>,
    pub player: Symbol,
}

impl BoardSnapshot {
    pub fn symbol_at(&self, c: Coord) -> Symbol {
        self.board
            .get(c.z as usize)
            .and_then(|plane| plane.get(c.y as usize))
            .and_then(|row| row.get(c.x as usize))
            .copied()
            .unwrap_or(Symbol::Empty)
    }
}

/// Exclusive input-handling mode. Picking is only honored in `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    RotatingView,
    AiThinking,
}

/// Local pre-flight check for a user move. `Ready` is the only variant
/// that allows a request to leave the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveGuard {
    Ready,
    NoGame,
    AiBusy,
    AlreadyWon(Symbol),
}

/// What a pointer press on the board canvas should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerIntent {
    SubmitMove(Coord),
    BeginRotate,
    Ignore,
}

/// A press either picks (pickable hit) or starts a view rotation (miss),
/// and only while idle; rotating or waiting on the AI swallows it.
pub fn classify_press(mode: InteractionMode, hit: Option<Coord>) -> PointerIntent {
    if mode != InteractionMode::Idle {
        return PointerIntent::Ignore;
    }
    match hit {
        Some(c) => PointerIntent::SubmitMove(c),
        None => PointerIntent::BeginRotate,
    }
}

/// Status text derived from the terminal-state queries. Winner takes
/// priority over draw.
pub fn status_line(winner: Option<Symbol>, draw: bool, player: Symbol) -> String {
    if let Some(w) = winner {
        format!("Player {} wins!", w.label())
    } else if draw {
        "It's a draw!".to_string()
    } else {
        format!("Player {}'s turn.", player.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub dims: Dimensions,
    pub board: Option<BoardSnapshot>,
    pub in_progress: bool,
    pub winner: Option<Symbol>,
    pub is_draw: bool,
    pub status: String,
    pub mode: InteractionMode,
    /// Bumped whenever the scene needs a rebuild.
    pub version: u64,
}

impl GameState {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            board: None,
            in_progress: false,
            winner: None,
            is_draw: false,
            status: String::new(),
            mode: InteractionMode::Idle,
            version: 0,
        }
    }

    /// Guard for the move submitter; must pass before any request is sent.
    pub fn can_submit(&self) -> MoveGuard {
        if self.mode == InteractionMode::AiThinking {
            return MoveGuard::AiBusy;
        }
        if !self.in_progress {
            return MoveGuard::NoGame;
        }
        if let Some(w) = self.winner {
            return MoveGuard::AlreadyWon(w);
        }
        MoveGuard::Ready
    }
}

#[derive(Clone, Debug)]
pub enum GameAction {
    /// A `/start` round-trip completed with these parameters.
    Started { dims: Dimensions },
    /// Result of the initial `/get_valid_moves` probe on page load.
    SyncInProgress(bool),
    BoardFetched(BoardSnapshot),
    StatusRefreshed { winner: Option<Symbol>, draw: bool },
    SetStatus(String),
    SetMode(InteractionMode),
    Quit,
}

impl Reducible for GameState {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        let mut new = (*self).clone();
        match action {
            Started { dims } => {
                new.dims = dims;
                new.in_progress = true;
                new.winner = None;
                new.is_draw = false;
                new.mode = InteractionMode::Idle;
                new.status = "Game started! Player X's turn.".to_string();
                new.version += 1;
            }
            SyncInProgress(p) => {
                new.in_progress = p;
                if !p {
                    new.status.clear();
                }
            }
            BoardFetched(snapshot) => {
                new.board = Some(snapshot);
                new.version += 1;
            }
            StatusRefreshed { winner, draw } => {
                new.winner = winner;
                new.is_draw = draw;
                if new.in_progress {
                    let player = new.board.as_ref().map(|b| b.player).unwrap_or(Symbol::X);
                    new.status = status_line(winner, draw, player);
                } else {
                    new.status.clear();
                }
            }
            SetStatus(msg) => {
                new.status = msg;
            }
            SetMode(mode) => {
                new.mode = mode;
            }
            Quit => {
                new.in_progress = false;
                new.board = None;
                new.winner = None;
                new.is_draw = false;
                new.mode = InteractionMode::Idle;
                new.status = "Game quit. Start a new game!".to_string();
                new.version += 1;
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot(dims: Dimensions, player: Symbol) -> BoardSnapshot {
        let row = vec![Symbol::Empty; dims.width as usize];
        let plane = vec![row; dims.height as usize];
        BoardSnapshot {
            board: vec![plane; dims.depth as usize],
            player,
        }
    }

    #[test]
    fn decodes_get_board_payload() {
        let raw = r#"{"board":[[[".","X","."],[".",".","."],[".",".","O"]],
                       [[".",".","."],[".","X","."],[".",".","."]],
                       [[".",".","."],[".",".","."],["O",".","."]]],
                      "player":"O"}"#;
        let snap: BoardSnapshot = serde_json::from_str(raw).expect("wire decode");
        assert_eq!(snap.player, Symbol::O);
        assert_eq!(snap.symbol_at(Coord { x: 1, y: 0, z: 0 }), Symbol::X);
        assert_eq!(snap.symbol_at(Coord { x: 2, y: 2, z: 0 }), Symbol::O);
        assert_eq!(snap.symbol_at(Coord { x: 0, y: 2, z: 2 }), Symbol::O);
        assert_eq!(snap.symbol_at(Coord { x: 0, y: 0, z: 1 }), Symbol::Empty);
    }

    #[test]
    fn rejects_unknown_symbol() {
        let raw = r#"{"board":[[["?"]]],"player":"X"}"#;
        assert!(serde_json::from_str::<BoardSnapshot>(raw).is_err());
    }

    #[test]
    fn guard_rejects_while_ai_thinking() {
        let mut state = GameState::new(Dimensions::default());
        state.in_progress = true;
        state.mode = InteractionMode::AiThinking;
        assert_eq!(state.can_submit(), MoveGuard::AiBusy);
    }

    #[test]
    fn guard_rejects_after_win_before_anything_else() {
        let mut state = GameState::new(Dimensions::default());
        state.in_progress = true;
        state.winner = Some(Symbol::X);
        assert_eq!(state.can_submit(), MoveGuard::AlreadyWon(Symbol::X));
    }

    #[test]
    fn guard_requires_a_running_game() {
        let state = GameState::new(Dimensions::default());
        assert_eq!(state.can_submit(), MoveGuard::NoGame);
    }

    #[test]
    fn press_is_ignored_while_rotating() {
        let hit = Some(Coord { x: 0, y: 0, z: 0 });
        assert_eq!(
            classify_press(InteractionMode::RotatingView, hit),
            PointerIntent::Ignore
        );
        assert_eq!(
            classify_press(InteractionMode::AiThinking, hit),
            PointerIntent::Ignore
        );
    }

    #[test]
    fn press_picks_or_rotates_when_idle() {
        let c = Coord { x: 1, y: 2, z: 0 };
        assert_eq!(
            classify_press(InteractionMode::Idle, Some(c)),
            PointerIntent::SubmitMove(c)
        );
        assert_eq!(
            classify_press(InteractionMode::Idle, None),
            PointerIntent::BeginRotate
        );
    }

    #[test]
    fn winner_outranks_draw_in_status() {
        assert_eq!(
            status_line(Some(Symbol::O), true, Symbol::X),
            "Player O wins!"
        );
        assert_eq!(status_line(None, true, Symbol::X), "It's a draw!");
        assert_eq!(status_line(None, false, Symbol::O), "Player O's turn.");
    }

    #[test]
    fn reducer_start_fetch_quit_sequence() {
        let dims = Dimensions::default();
        let state = Rc::new(GameState::new(dims));
        let state = state.reduce(GameAction::Started { dims });
        assert!(state.in_progress);
        assert_eq!(state.status, "Game started! Player X's turn.");

        let v0 = state.version;
        let state = state.reduce(GameAction::BoardFetched(empty_snapshot(dims, Symbol::O)));
        assert!(state.version > v0);
        let state = state.reduce(GameAction::StatusRefreshed {
            winner: None,
            draw: false,
        });
        assert_eq!(state.status, "Player O's turn.");

        let state = state.reduce(GameAction::Quit);
        assert!(!state.in_progress);
        assert!(state.board.is_none());
        assert_eq!(state.mode, InteractionMode::Idle);
    }

    #[test]
    fn load_sync_without_legal_moves_stays_pre_game() {
        let dims = Dimensions::default();
        let state = Rc::new(GameState::new(dims));
        let state = state.reduce(GameAction::SetStatus("leftover".into()));
        let state = state.reduce(GameAction::SyncInProgress(false));
        assert!(!state.in_progress);
        assert!(state.status.is_empty());
    }

    #[test]
    fn load_sync_resumes_a_running_game() {
        let dims = Dimensions::default();
        let state = Rc::new(GameState::new(dims));
        let state = state.reduce(GameAction::SyncInProgress(true));
        assert!(state.in_progress);
    }

    #[test]
    fn status_clears_when_no_game_running() {
        let dims = Dimensions::default();
        let state = Rc::new(GameState::new(dims));
        let state = state.reduce(GameAction::SetStatus("stale".into()));
        let state = state.reduce(GameAction::StatusRefreshed {
            winner: None,
            draw: false,
        });
        assert!(state.status.is_empty());
    }
}
