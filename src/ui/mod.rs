mod create_form;
mod input_box;
mod layout;
mod overlay;
mod sand_view;
mod status_bar;
mod theme;
mod timer_list;

use crate::app::state::{AppState, View};
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    input_box::render(frame, app_layout.search_box, state);
    match state.view {
        View::Sand => sand_view::render(frame, app_layout.main, state),
        View::Create => {
            timer_list::render(frame, app_layout.main, state);
            create_form::render(frame, app_layout.main, state);
        }
        View::Search | View::List | View::Options => {
            timer_list::render(frame, app_layout.main, state)
        }
    }
    status_bar::render(frame, app_layout.status_bar, state);

    overlay::render_toast(frame, state);
    overlay::render_completion(frame, state);
}
