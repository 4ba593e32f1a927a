use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::model::Dimensions;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub dims: Dimensions,
    pub in_progress: bool,
    pub ai_thinking: bool,
    pub on_start: Callback<Dimensions>,
    pub on_undo: Callback<()>,
    pub on_ai_move: Callback<u32>,
    pub on_quit: Callback<()>,
}

fn read_u32(input: &NodeRef, fallback: u32) -> u32 {
    input
        .cast::<HtmlInputElement>()
        .and_then(|el| el.value().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(fallback)
}

/// Everything locks during the computer's turn except the AI search
/// depth, which the next AI move reads fresh from its input.
fn field_locked(ai_thinking: bool, is_ai_depth: bool) -> bool {
    ai_thinking && !is_ai_depth
}

/// Pre-game settings plus the in-game action row. Everything except the
/// AI search-depth input is disabled while the computer is thinking, so
/// the next AI move can still pick up an updated depth.
#[function_component(ControlsPanel)]
pub fn controls_panel(props: &ControlsPanelProps) -> Html {
    let width_ref = use_node_ref();
    let height_ref = use_node_ref();
    let depth_ref = use_node_ref();
    let win_ref = use_node_ref();
    let ai_depth_ref = use_node_ref();

    let read_dims = {
        let width_ref = width_ref.clone();
        let height_ref = height_ref.clone();
        let depth_ref = depth_ref.clone();
        let win_ref = win_ref.clone();
        let ai_depth_ref = ai_depth_ref.clone();
        let fallback = props.dims;
        move || Dimensions {
            width: read_u32(&width_ref, fallback.width),
            height: read_u32(&height_ref, fallback.height),
            depth: read_u32(&depth_ref, fallback.depth),
            win_length: read_u32(&win_ref, fallback.win_length),
            ai_depth: read_u32(&ai_depth_ref, fallback.ai_depth),
        }
    };

    let start_cb = {
        let cb = props.on_start.clone();
        let read_dims = read_dims.clone();
        Callback::from(move |_: MouseEvent| cb.emit(read_dims()))
    };
    let undo_cb = {
        let cb = props.on_undo.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let ai_cb = {
        let cb = props.on_ai_move.clone();
        let ai_depth_ref = ai_depth_ref.clone();
        let fallback = props.dims.ai_depth;
        Callback::from(move |_: MouseEvent| cb.emit(read_u32(&ai_depth_ref, fallback)))
    };
    let quit_cb = {
        let cb = props.on_quit.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    let busy = props.ai_thinking;
    let field = |label: &str, node: &NodeRef, value: u32, locked: bool| {
        html! {<label style="display:flex; flex-direction:column; font-size:12px; gap:2px;">
            { label }
            <input ref={node.clone()} type="number" min="1" value={value.to_string()}
                   disabled={locked} style="width:64px;" />
        </label>}
    };

    html! {<div style="display:flex; gap:12px; align-items:flex-end; flex-wrap:wrap; background:rgba(22,27,34,0.05); border:1px solid #d0d7de; border-radius:8px; padding:10px;">
        { if !props.in_progress {
            html!{<>
                { field("Width", &width_ref, props.dims.width, field_locked(busy, false)) }
                { field("Height", &height_ref, props.dims.height, field_locked(busy, false)) }
                { field("Depth", &depth_ref, props.dims.depth, field_locked(busy, false)) }
                { field("Win length", &win_ref, props.dims.win_length, field_locked(busy, false)) }
            </>}
        } else { html!{} } }
        { field("AI depth", &ai_depth_ref, props.dims.ai_depth, field_locked(busy, true)) }
        { if props.in_progress {
            html!{<>
                <button onclick={start_cb.clone()} disabled={busy}>{"Restart"}</button>
                <button onclick={undo_cb} disabled={busy}>{"Undo"}</button>
                <button onclick={ai_cb} disabled={busy}>{"AI Move"}</button>
                <button onclick={quit_cb} disabled={busy}>{"Quit"}</button>
            </>}
        } else {
            html!{ <button onclick={start_cb}>{"Start Game"}</button> }
        } }
    </div>}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_depth_stays_editable_during_the_computer_turn() {
        assert!(!field_locked(true, true));
        assert!(field_locked(true, false));
    }

    #[test]
    fn nothing_is_locked_while_idle() {
        assert!(!field_locked(false, false));
        assert!(!field_locked(false, true));
    }
}
