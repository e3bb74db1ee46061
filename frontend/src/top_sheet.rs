use uuid::Uuid;
use web_sys::js_sys;
use yew::{html, Component, Context, Html, NodeRef, Properties};

/// Sliding sheet container used for the bulk-import dialog.
pub struct TopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
}

impl Component for TopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <>
                <div class="top-sheet" id={self.id.clone()} ref={ctx.props().node_ref.clone()}>
                        { ctx.props().children.clone() }
                </div>
            </>
        }
    }
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle_top_sheet(top_sheet_ref, "add");
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle_top_sheet(top_sheet_ref, "remove");
}

fn toggle_top_sheet(top_sheet_ref: NodeRef, method: &str) {
    if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
        let func = js_sys::Function::new_no_args(&format!(
            "document.querySelector('#{}').classList.{}('show')",
            top_sheet.id(),
            method
        ));
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&func, 50);
        }
    }
}
