//! HTTP client for the external rules/AI engine. Every call is a small
//! request/response pair against the same origin that serves the app;
//! transport errors propagate to the caller untouched.

use gloo_net::http::Request;
use gloo_net::Error;

use crate::model::{BoardSnapshot, Coord, Dimensions, Symbol};

pub async fn start(dims: &Dimensions) -> Result<(), Error> {
    let url = format!(
        "/start?height={}&width={}&depth={}&win_length={}",
        dims.height, dims.width, dims.depth, dims.win_length
    );
    Request::post(&url).send().await?;
    Ok(())
}

/// Submits a candidate move; the engine answers `true` iff it was legal.
pub async fn submit_move(c: Coord) -> Result<bool, Error> {
    let url = format!("/move?x={}&y={}&z={}", c.x, c.y, c.z);
    Request::post(&url).send().await?.json::<bool>().await
}

pub async fn switch_player() -> Result<(), Error> {
    Request::post("/switch_player").send().await?;
    Ok(())
}

pub async fn undo() -> Result<(), Error> {
    Request::post("/undo").send().await?;
    Ok(())
}

pub async fn quit() -> Result<(), Error> {
    Request::post("/quit").send().await?;
    Ok(())
}

/// Kicks off the minimax search; the move lands on the server-side board.
pub async fn run_ai_search(search_depth: u32) -> Result<(), Error> {
    let url = format!("/search_depth?search_depth={}", search_depth);
    Request::post(&url).send().await?;
    Ok(())
}

pub async fn fetch_board() -> Result<BoardSnapshot, Error> {
    Request::get("/get_board").send().await?.json().await
}

/// Only the emptiness of the list is meaningful to this client.
pub async fn any_valid_moves() -> Result<bool, Error> {
    let moves: Vec<(u32, u32, u32)> = Request::get("/get_valid_moves")
        .send()
        .await?
        .json()
        .await?;
    Ok(!moves.is_empty())
}

pub async fn check_winner() -> Result<Option<Symbol>, Error> {
    let winner: Option<Symbol> = Request::get("/check_winner").send().await?.json().await?;
    // The engine reports a player symbol or null; never `.`.
    Ok(winner.filter(|w| *w != Symbol::Empty))
}

pub async fn is_draw() -> Result<bool, Error> {
    Request::get("/is_draw").send().await?.json::<bool>().await
}
