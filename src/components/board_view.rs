use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};
use yew::prelude::*;

use crate::flow;
use crate::model::{
    classify_press, Coord, GameAction, GameState, InteractionMode, PointerIntent,
};
use crate::scene::builder;
use crate::scene::camera::{Camera, Orientation};
use crate::scene::pick::pick;
use crate::scene::render;
use crate::scene::CellEntity;
use crate::state::{DragState, Session};

const HANDLE_SIZE: f64 = 84.0;
const FALLBACK_WIDTH: u32 = 640;
const FALLBACK_HEIGHT: u32 = 480;

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub game: UseReducerHandle<GameState>,
    pub session: Session,
}

fn canvas_pos(canvas: &HtmlCanvasElement, e: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    )
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
    if let Some(el) = canvas.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("cursor", cursor);
    }
}

/// The 3D board surface: a continuously drawn canvas, pointer picking
/// for move submission, and free view rotation by dragging either the
/// board or the small handle widget in the corner.
#[function_component(BoardView)]
pub fn board_view(props: &BoardViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let handle_ref = use_node_ref();
    let camera = use_mut_ref(Camera::default);
    // Scene orientation survives board rebuilds; only dragging moves it.
    let orientation = use_mut_ref(Orientation::default);
    let handle_orientation = use_mut_ref(Orientation::default);
    let entities = use_mut_ref(Vec::<CellEntity>::new);
    let board_drag = use_mut_ref(DragState::default);
    let handle_drag = use_mut_ref(DragState::default);
    let hover = use_mut_ref(|| None::<Coord>);
    let game_ref = use_mut_ref(|| props.game.clone());

    // Mirror refresh: replace the whole entity batch whenever the game
    // state changes, and keep the latest reducer handle for listeners.
    {
        let game_ref = game_ref.clone();
        let entities = entities.clone();
        let hover = hover.clone();
        let canvas_ref = canvas_ref.clone();
        let handle = props.game.clone();
        use_effect_with((*props.game).clone(), move |state| {
            *game_ref.borrow_mut() = handle.clone();
            let mut batch = entities.borrow_mut();
            batch.clear();
            if state.in_progress {
                if let Some(board) = &state.board {
                    *batch = builder::build(board, &state.dims);
                }
            }
            if batch.is_empty() {
                *hover.borrow_mut() = None;
            }
            // Size the render target to its container when (re)starting.
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let (w, h) = canvas
                    .parent_element()
                    .map(|p| (p.client_width(), p.client_height()))
                    .filter(|(w, h)| *w > 0 && *h > 0)
                    .unwrap_or((FALLBACK_WIDTH as i32, FALLBACK_HEIGHT as i32));
                if canvas.width() != w as u32 || canvas.height() != h as u32 {
                    canvas.set_width(w as u32);
                    canvas.set_height(h as u32);
                }
            }
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let handle_ref = handle_ref.clone();
        let camera = camera.clone();
        let orientation = orientation.clone();
        let handle_orientation = handle_orientation.clone();
        let entities = entities.clone();
        let board_drag = board_drag.clone();
        let handle_drag = handle_drag.clone();
        let hover = hover.clone();
        let game_ref = game_ref.clone();
        let session = props.session.clone();

        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");
            let handle_canvas: HtmlCanvasElement = handle_ref
                .cast::<HtmlCanvasElement>()
                .expect("handle_ref not attached to a canvas element");

            // Render loop: one draw per animation frame, fed only by state
            // the other handlers already produced. Never awaits anything.
            let raf_id = Rc::new(RefCell::new(None));
            {
                let canvas = canvas.clone();
                let handle_canvas = handle_canvas.clone();
                let camera = camera.clone();
                let orientation = orientation.clone();
                let handle_orientation = handle_orientation.clone();
                let entities = entities.clone();
                let hover = hover.clone();
                let game_ref = game_ref.clone();
                let raf_id_loop = raf_id.clone();
                let window_loop = window.clone();
                let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                    Rc::new(RefCell::new(None));
                let closure_cell_clone = closure_cell.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    if canvas.is_connected() {
                        if let Some(ctx) = canvas
                            .get_context("2d")
                            .ok()
                            .flatten()
                            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                        {
                            let state = (*game_ref.borrow()).clone();
                            render::draw_board(
                                &ctx,
                                canvas.width() as f64,
                                canvas.height() as f64,
                                &camera.borrow(),
                                &orientation.borrow(),
                                &entities.borrow(),
                                *hover.borrow(),
                                &state.dims,
                            );
                        }
                        if let Some(ctx) = handle_canvas
                            .get_context("2d")
                            .ok()
                            .flatten()
                            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                        {
                            render::draw_handle(&ctx, HANDLE_SIZE, &handle_orientation.borrow());
                        }
                    }
                    if let Ok(id) = window_loop.request_animation_frame(
                        closure_cell_clone
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id_loop.borrow_mut() = Some(id);
                    }
                })
                    as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    closure_cell
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Board press: offer the pointer to the picking engine first;
            // a miss starts a view-rotation drag instead.
            let mousedown_cb = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let orientation = orientation.clone();
                let entities = entities.clone();
                let board_drag = board_drag.clone();
                let game_ref = game_ref.clone();
                let session = session.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    e.prevent_default();
                    let game = game_ref.borrow().clone();
                    let state = (*game).clone();
                    let (px, py) = canvas_pos(&canvas, &e);
                    let hit = if state.in_progress {
                        pick(
                            (px, py),
                            (canvas.width() as f64, canvas.height() as f64),
                            &camera.borrow(),
                            &orientation.borrow(),
                            &entities.borrow(),
                        )
                        .map(|cell| cell.coord)
                    } else {
                        None
                    };
                    match classify_press(state.mode, hit) {
                        PointerIntent::SubmitMove(coord) => {
                            spawn_local(flow::submit_user_move(game, session.clone(), coord));
                        }
                        PointerIntent::BeginRotate => {
                            board_drag
                                .borrow_mut()
                                .begin(e.client_x() as f64, e.client_y() as f64);
                            game.dispatch(GameAction::SetMode(InteractionMode::RotatingView));
                        }
                        PointerIntent::Ignore => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
                .unwrap();

            let handle_down_cb = {
                let handle_drag = handle_drag.clone();
                let game_ref = game_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    e.prevent_default();
                    handle_drag
                        .borrow_mut()
                        .begin(e.client_x() as f64, e.client_y() as f64);
                    game_ref
                        .borrow()
                        .dispatch(GameAction::SetMode(InteractionMode::RotatingView));
                }) as Box<dyn FnMut(_)>)
            };
            handle_canvas
                .add_event_listener_with_callback(
                    "mousedown",
                    handle_down_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            // Window-level move/up so a drag survives leaving the surface.
            // While a drag is live the deltas go to rotation and nowhere else.
            let window_move_cb = {
                let orientation = orientation.clone();
                let handle_orientation = handle_orientation.clone();
                let board_drag = board_drag.clone();
                let handle_drag = handle_drag.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let x = e.client_x() as f64;
                    let y = e.client_y() as f64;
                    if let Some((dx, dy)) = board_drag.borrow_mut().track(x, y) {
                        orientation.borrow_mut().apply_delta(dx, dy);
                        e.prevent_default();
                    }
                    if let Some((dx, dy)) = handle_drag.borrow_mut().track(x, y) {
                        // The handle mirrors the scene but keeps its own state.
                        orientation.borrow_mut().apply_delta(dx, dy);
                        handle_orientation.borrow_mut().apply_delta(dx, dy);
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback(
                    "mousemove",
                    window_move_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let window_up_cb = {
                let board_drag = board_drag.clone();
                let handle_drag = handle_drag.clone();
                let game_ref = game_ref.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    let was_dragging = board_drag.borrow().active || handle_drag.borrow().active;
                    board_drag.borrow_mut().end();
                    handle_drag.borrow_mut().end();
                    if was_dragging {
                        let game = game_ref.borrow().clone();
                        if game.mode == InteractionMode::RotatingView {
                            game.dispatch(GameAction::SetMode(InteractionMode::Idle));
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", window_up_cb.as_ref().unchecked_ref())
                .unwrap();

            // Hover feedback only; drags never reach this branch's pick.
            let hover_cb = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let orientation = orientation.clone();
                let entities = entities.clone();
                let board_drag = board_drag.clone();
                let handle_drag = handle_drag.clone();
                let hover = hover.clone();
                let game_ref = game_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if board_drag.borrow().active || handle_drag.borrow().active {
                        return;
                    }
                    let state = (*game_ref.borrow().clone()).clone();
                    if state.mode != InteractionMode::Idle || !state.in_progress {
                        *hover.borrow_mut() = None;
                        set_cursor(&canvas, "default");
                        return;
                    }
                    let (px, py) = canvas_pos(&canvas, &e);
                    let hit = pick(
                        (px, py),
                        (canvas.width() as f64, canvas.height() as f64),
                        &camera.borrow(),
                        &orientation.borrow(),
                        &entities.borrow(),
                    )
                    .map(|cell| cell.coord);
                    set_cursor(&canvas, if hit.is_some() { "pointer" } else { "default" });
                    *hover.borrow_mut() = hit;
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", hover_cb.as_ref().unchecked_ref())
                .unwrap();

            let leave_cb = {
                let canvas = canvas.clone();
                let hover = hover.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    *hover.borrow_mut() = None;
                    set_cursor(&canvas, "default");
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mouseleave", leave_cb.as_ref().unchecked_ref())
                .unwrap();

            let window_cleanup = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    hover_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mouseleave",
                    leave_cb.as_ref().unchecked_ref(),
                );
                let _ = handle_canvas.remove_event_listener_with_callback(
                    "mousedown",
                    handle_down_cb.as_ref().unchecked_ref(),
                );
                let _ = window_cleanup.remove_event_listener_with_callback(
                    "mousemove",
                    window_move_cb.as_ref().unchecked_ref(),
                );
                let _ = window_cleanup.remove_event_listener_with_callback(
                    "mouseup",
                    window_up_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_cleanup.cancel_animation_frame(id);
                }
                let _keep_alive = (
                    &mousedown_cb,
                    &handle_down_cb,
                    &window_move_cb,
                    &window_up_cb,
                    &hover_cb,
                    &leave_cb,
                );
            }
        });
    }

    html! {
        <div style="position:relative; width:640px; height:480px; border:1px solid #d0d7de; border-radius:8px; overflow:hidden;">
            <canvas ref={canvas_ref} width={FALLBACK_WIDTH.to_string()} height={FALLBACK_HEIGHT.to_string()}
                    style="display:block; width:100%; height:100%;"></canvas>
            <canvas ref={handle_ref} width="84" height="84" title="Drag to rotate the view"
                    style="position:absolute; right:10px; bottom:10px; cursor:grab;"></canvas>
        </div>
    }
}
