//! Bulk-import dialog: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic, view
//! rendering, props, and HTTP helpers.

use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ImportProps;
pub use state::ImportComponent;

impl Component for ImportComponent {
    type Message = Msg;
    type Properties = ImportProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ImportComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
