//! Public request-intake form. Unauthenticated: an applicant enters the
//! letter number they were given plus a contact, and gets back a
//! read-only snapshot of the request's state.

use common::requests::{PortalRequest, PortalSnapshot};
use gloo_net::http::Request;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

pub enum Msg {
    SetRequestId(String),
    SetContact(String),
    Submit,
    Succeeded(PortalSnapshot),
    Failed(String),
}

pub struct PortalComponent {
    request_id: String,
    contact: String,
    snapshot: Option<PortalSnapshot>,
    submitting: bool,
}

async fn track(request: &PortalRequest) -> Result<PortalSnapshot, String> {
    let response = Request::post("/api/portal/request")
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(response
            .text()
            .await
            .unwrap_or_else(|_| "Request failed".to_string()));
    }
    response
        .json::<PortalSnapshot>()
        .await
        .map_err(|e| e.to_string())
}

impl Component for PortalComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            request_id: String::new(),
            contact: String::new(),
            snapshot: None,
            submitting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetRequestId(value) => {
                self.request_id = value;
                false
            }
            Msg::SetContact(value) => {
                self.contact = value;
                false
            }
            Msg::Submit => {
                if self.request_id.trim().is_empty() || self.contact.trim().is_empty() {
                    show_toast("Enter the request number and a contact");
                    return false;
                }
                self.submitting = true;
                let request = PortalRequest {
                    request_id: self.request_id.clone(),
                    contact: self.contact.clone(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    match track(&request).await {
                        Ok(snapshot) => link.send_message(Msg::Succeeded(snapshot)),
                        Err(error) => link.send_message(Msg::Failed(error)),
                    }
                });
                true
            }
            Msg::Succeeded(snapshot) => {
                self.submitting = false;
                self.snapshot = Some(snapshot);
                true
            }
            Msg::Failed(error) => {
                self.submitting = false;
                self.snapshot = None;
                show_toast(&error);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="portal">
                <h2>{ "Track your request" }</h2>
                <p>{ "Enter the request number from your confirmation to see its current state." }</p>
                <div class="portal-form">
                    <input
                        type="text"
                        placeholder="Request number, e.g. 118/24"
                        value={self.request_id.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::SetRequestId(e.target_unchecked_into::<HtmlInputElement>().value())
                        })} />
                    <input
                        type="text"
                        placeholder="Your e-mail or phone"
                        value={self.contact.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::SetContact(e.target_unchecked_into::<HtmlInputElement>().value())
                        })} />
                    <button
                        disabled={self.submitting}
                        onclick={link.callback(|_| Msg::Submit)}>
                        { if self.submitting { "Checking…" } else { "Check status" } }
                    </button>
                </div>
                {
                    if let Some(snapshot) = &self.snapshot {
                        html! {
                            <div class="portal-snapshot">
                                <h3>{ format!("Request {}", snapshot.number) }</h3>
                                <dl>
                                    <dt>{ "Status" }</dt>
                                    <dd>{ snapshot.status.label() }</dd>
                                    <dt>{ "Organization" }</dt>
                                    <dd>{ &snapshot.organization }</dd>
                                    <dt>{ "Received" }</dt>
                                    <dd>{ snapshot.received_date.map(|d| d.to_string()).unwrap_or_else(|| "—".into()) }</dd>
                                    <dt>{ "Deadline" }</dt>
                                    <dd>{ snapshot.deadline.map(|d| d.to_string()).unwrap_or_else(|| "—".into()) }</dd>
                                </dl>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}
