use leptos::mount::mount_to_body;
use leptos::prelude::*;

use ai_chat_frontend::components::chat::ChatArea;
use ai_chat_frontend::components::sidebar::Sidebar;
use ai_chat_frontend::state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    AppState::provide();

    view! {
        <div class="app-container">
            <Sidebar />
            <ChatArea />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
