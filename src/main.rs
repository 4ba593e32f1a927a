mod api;
mod components;
mod flow;
mod model;
mod scene;
mod state;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
