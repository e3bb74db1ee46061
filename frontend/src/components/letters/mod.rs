//! Letters list view: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic, view
//! rendering, and browser plumbing.
//!
//! Responsibilities
//! - Re-export `LettersComponent` and `Msg`.
//! - Provide the `Component` implementation delegating to
//!   `update::update` and `view::view`.
//! - On first render, bind the window listeners (tab visibility, history
//!   navigation), fetch the assignable users, and kick off the initial
//!   load from the URL-derived filter state.

use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::{LettersComponent, LoadOptions};

impl Component for LettersComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        LettersComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            self.window_listeners = helpers::bind_window_listeners(ctx.link());

            let link = ctx.link().clone();
            spawn_local(async move {
                if let Ok(users) = helpers::fetch_users().await {
                    link.send_message(Msg::UsersLoaded(users));
                }
            });

            ctx.link().send_message(Msg::Load(LoadOptions {
                show_loading: true,
                ..LoadOptions::default()
            }));
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.window_listeners.detach();
    }
}
