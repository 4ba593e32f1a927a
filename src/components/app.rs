use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{board_view::BoardView, controls_panel::ControlsPanel, status_panel::StatusPanel};
use crate::flow;
use crate::model::{Dimensions, GameState, InteractionMode};
use crate::state::Session;

#[function_component(App)]
pub fn app() -> Html {
    let game = use_reducer(|| GameState::new(Dimensions::default()));
    let session = (*use_memo((), |_| Session::default())).clone();

    // Mirror whatever game the server already has on page load.
    {
        let game = game.clone();
        let session = session.clone();
        use_effect_with((), move |_| {
            spawn_local(flow::sync_on_load(game, session));
            || ()
        });
    }

    let on_start = {
        let game = game.clone();
        let session = session.clone();
        Callback::from(move |dims: Dimensions| {
            spawn_local(flow::start_game(game.clone(), session.clone(), dims));
        })
    };
    let on_undo = {
        let game = game.clone();
        let session = session.clone();
        Callback::from(move |_| {
            spawn_local(flow::undo_move(game.clone(), session.clone()));
        })
    };
    let on_ai_move = {
        let game = game.clone();
        let session = session.clone();
        Callback::from(move |depth: u32| {
            spawn_local(flow::ai_move(game.clone(), session.clone(), depth));
        })
    };
    let on_quit = {
        let game = game.clone();
        let session = session.clone();
        Callback::from(move |_| {
            spawn_local(flow::quit_game(game.clone(), session.clone()));
        })
    };

    let state = (*game).clone();
    html! {
        <div style="max-width:680px; margin:0 auto; padding:16px; font-family:sans-serif;">
            <h2 style="margin:0 0 12px 0;">{"3D Tic-Tac-Toe"}</h2>
            <ControlsPanel
                dims={state.dims}
                in_progress={state.in_progress}
                ai_thinking={state.mode == InteractionMode::AiThinking}
                on_start={on_start}
                on_undo={on_undo}
                on_ai_move={on_ai_move}
                on_quit={on_quit} />
            <StatusPanel status={state.status.clone()} />
            <BoardView game={game.clone()} session={session} />
        </div>
    }
}
