use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub status: String,
}

#[function_component(StatusPanel)]
pub fn status_panel(props: &StatusPanelProps) -> Html {
    html! {<div style="min-height:22px; font-size:15px; font-weight:600; margin:8px 0;">
        { props.status.clone() }
    </div>}
}
