use yew::{html, Component, Context, Html};

use crate::components::letters::LettersComponent;
use crate::components::portal::PortalComponent;

/// Top-level sections of the application: the internal tracker and the
/// public request-intake portal.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Letters,
    Portal,
}

pub enum Msg {
    SetTab(Tab),
}

pub struct App {
    tab: Tab,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self { tab: Tab::Letters }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetTab(tab) => {
                let changed = self.tab != tab;
                self.tab = tab;
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let tab_class = |tab: Tab| {
            if self.tab == tab {
                "nav-tab active"
            } else {
                "nav-tab"
            }
        };
        html! {
            <div class="app">
                <header class="app-header">
                    <span class="app-title">{ "Letterdesk" }</span>
                    <nav>
                        <button
                            class={tab_class(Tab::Letters)}
                            onclick={ctx.link().callback(|_| Msg::SetTab(Tab::Letters))}>
                            { "Letters" }
                        </button>
                        <button
                            class={tab_class(Tab::Portal)}
                            onclick={ctx.link().callback(|_| Msg::SetTab(Tab::Portal))}>
                            { "Public portal" }
                        </button>
                    </nav>
                </header>
                {
                    match self.tab {
                        Tab::Letters => html! { <LettersComponent /> },
                        Tab::Portal => html! { <PortalComponent /> },
                    }
                }
            </div>
        }
    }
}
