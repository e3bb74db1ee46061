use common::listing::filter::{QuickFilter, SortField, SortOrder, PAGE_SIZE_CHOICES};
use common::model::letter::{Letter, LetterStatus};
use common::model::saved_view::ViewMode;
use common::requests::BulkAction;
use serde_json::json;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::import::ImportComponent;
use crate::top_sheet::TopSheet;

use super::messages::Msg;
use super::state::LettersComponent;

fn input_value(e: &InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn select_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

pub fn view(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="letters-view">
            { view_toolbar(component, ctx) }
            { view_filter_bar(component, ctx) }
            {
                if !component.selected.is_empty() {
                    view_bulk_bar(component, ctx)
                } else {
                    html! {}
                }
            }
            {
                if component.loading {
                    html! { <div class="loading-bar">{ "Loading…" }</div> }
                } else {
                    html! {}
                }
            }
            {
                match component.view_mode {
                    ViewMode::Table => view_table(component, ctx),
                    ViewMode::Cards => view_cards(component, ctx),
                }
            }
            { view_pagination(component, ctx) }
            <TopSheet node_ref={component.import_sheet_ref.clone()}>
                {
                    if component.show_import {
                        html! {
                            <ImportComponent
                                on_created={link.callback(|_| Msg::ImportCreated)}
                                on_close={link.callback(|_| Msg::ImportClosed)} />
                        }
                    } else {
                        html! {}
                    }
                }
            </TopSheet>
        </div>
    }
}

fn view_toolbar(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();
    let other_mode = match component.view_mode {
        ViewMode::Table => ViewMode::Cards,
        ViewMode::Cards => ViewMode::Table,
    };

    html! {
        <div class="toolbar">
            <button onclick={link.callback(|_| Msg::OpenImport)}>{ "Import PDFs" }</button>
            <button onclick={link.callback(move |_| Msg::SetViewMode(other_mode))}>
                { match component.view_mode {
                    ViewMode::Table => "Card view",
                    ViewMode::Cards => "Table view",
                } }
            </button>
            <button onclick={link.callback(|_| Msg::SaveCurrentView)}>{ "Save view" }</button>
            {
                if component.saved_views.is_empty() {
                    html! {}
                } else {
                    html! {
                        <>
                            <select onchange={link.callback(|e: Event| {
                                Msg::ApplyView(select_value(&e))
                            })}>
                                <option value="" selected=true disabled=true>{ "Saved views…" }</option>
                                { for component.saved_views.iter().map(|view| html! {
                                    <option value={view.id.clone()}>{ &view.name }</option>
                                }) }
                            </select>
                            { for component.saved_views.iter().map(|view| {
                                let id = view.id.clone();
                                html! {
                                    <button
                                        class="view-delete"
                                        title={format!("Delete view {}", view.name)}
                                        onclick={link.callback(move |_| Msg::DeleteView(id.clone()))}>
                                        { format!("✕ {}", view.name) }
                                    </button>
                                }
                            }) }
                        </>
                    }
                }
            }
        </div>
    }
}

fn view_filter_bar(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="filter-bar">
            <div class="search-box">
                <input
                    type="text"
                    placeholder="Search number, organization, content…"
                    value={component.filters.search.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::SearchInput(input_value(&e)))} />
                {
                    if !component.suggestions.is_empty() {
                        html! {
                            <ul class="suggestions">
                                { for component.suggestions.iter().map(|s| {
                                    let value = s.clone();
                                    html! {
                                        <li onclick={link.callback(move |_| {
                                            Msg::ApplySuggestion(value.clone())
                                        })}>{ s }</li>
                                    }
                                }) }
                            </ul>
                        }
                    } else if component.filters.search.is_empty()
                        && !component.recent_searches.is_empty()
                    {
                        html! {
                            <div class="recent-searches">
                                { for component.recent_searches.iter().map(|s| {
                                    let value = s.clone();
                                    html! {
                                        <span class="chip" onclick={link.callback(move |_| {
                                            Msg::ApplySuggestion(value.clone())
                                        })}>{ s }</span>
                                    }
                                }) }
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>

            <select onchange={link.callback(|e: Event| {
                let value = select_value(&e);
                Msg::SetStatusFilter(LetterStatus::from_key(&value))
            })}>
                <option value="" selected={component.filters.status.is_none()}>
                    { "All statuses" }
                </option>
                { for LetterStatus::ALL.iter().map(|status| html! {
                    <option
                        value={status.as_key()}
                        selected={component.filters.status == Some(*status)}>
                        { status.label() }
                    </option>
                }) }
            </select>

            { for QuickFilter::ALL.iter().map(|quick| {
                let active = component.filters.quick == Some(*quick);
                let quick = *quick;
                html! {
                    <button
                        class={if active { "quick active" } else { "quick" }}
                        onclick={link.callback(move |_| {
                            Msg::SetQuickFilter(if active { None } else { Some(quick) })
                        })}>
                        { quick.label() }
                    </button>
                }
            }) }

            <select onchange={link.callback(|e: Event| {
                let value = select_value(&e);
                Msg::SetOwnerFilter(if value.is_empty() { None } else { Some(value) })
            })}>
                <option value="" selected={component.filters.owner.is_none()}>
                    { "Any owner" }
                </option>
                { for component.users.iter().map(|user| html! {
                    <option
                        value={user.id.clone()}
                        selected={component.filters.owner.as_deref() == Some(user.id.as_str())}>
                        { &user.name }
                    </option>
                }) }
            </select>

            <input
                type="text"
                class="type-filter"
                placeholder="Type"
                value={component.filters.letter_type.clone().unwrap_or_default()}
                onchange={link.callback(|e: Event| {
                    let value = e.target_unchecked_into::<HtmlInputElement>().value();
                    Msg::SetTypeFilter(if value.is_empty() { None } else { Some(value) })
                })} />
        </div>
    }
}

fn view_bulk_bar(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="bulk-bar">
            <span>{ format!("{} selected", component.selected.len()) }</span>
            <button onclick={link.callback(|_| Msg::RunBulkAction(BulkAction::Delete, None))}>
                { "Delete" }
            </button>
            <select onchange={link.callback(|e: Event| {
                Msg::RunBulkAction(BulkAction::SetStatus, Some(select_value(&e)))
            })}>
                <option value="" selected=true disabled=true>{ "Set status…" }</option>
                { for LetterStatus::ALL.iter().map(|status| html! {
                    <option value={status.as_key()}>{ status.label() }</option>
                }) }
            </select>
            <select onchange={link.callback(|e: Event| {
                Msg::RunBulkAction(BulkAction::SetOwner, Some(select_value(&e)))
            })}>
                <option value="" selected=true disabled=true>{ "Assign to…" }</option>
                <option value="">{ "Unassigned" }</option>
                { for component.users.iter().map(|user| html! {
                    <option value={user.id.clone()}>{ &user.name }</option>
                }) }
            </select>
        </div>
    }
}

/// Today in the browser's local timezone, for overdue highlighting.
fn browser_today() -> Option<chrono::NaiveDate> {
    let now = js_sys::Date::new_0();
    chrono::NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

fn sort_indicator(component: &LettersComponent, field: SortField) -> &'static str {
    if component.filters.sort_by != field {
        ""
    } else if component.filters.sort_order == SortOrder::Asc {
        " ▲"
    } else {
        " ▼"
    }
}

fn view_table(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();
    let today = browser_today();

    html! {
        <table class="letters-table">
            <thead>
                <tr>
                    <th>
                        <input
                            type="checkbox"
                            checked={!component.letters.is_empty()
                                && component.selected.len() == component.letters.len()}
                            onchange={link.callback(|_| Msg::ToggleSelectAll)} />
                    </th>
                    { for SortField::ALL.iter().map(|field| {
                        let field = *field;
                        html! {
                            <th class="sortable" onclick={link.callback(move |_| {
                                Msg::ToggleSort(field)
                            })}>
                                { field.label() }{ sort_indicator(component, field) }
                            </th>
                        }
                    }) }
                    <th>{ "Owner" }</th>
                    <th>{ "Activity" }</th>
                </tr>
            </thead>
            <tbody>
                { for component.letters.iter().map(|letter| {
                    view_row(component, ctx, letter, today)
                }) }
            </tbody>
        </table>
    }
}

fn view_row(
    component: &LettersComponent,
    ctx: &Context<LettersComponent>,
    letter: &Letter,
    today: Option<chrono::NaiveDate>,
) -> Html {
    let link = ctx.link();
    let id = letter.id.clone();
    let overdue = today.map(|t| letter.is_overdue(t)).unwrap_or(false);

    let select_id = letter.id.clone();
    let status_id = letter.id.clone();
    let owner_id = letter.id.clone();

    html! {
        <tr class={if overdue { "letter-row overdue" } else { "letter-row" }} key={id.clone()}>
            <td>
                <input
                    type="checkbox"
                    checked={component.selected.contains(&letter.id)}
                    onchange={link.callback(move |_| Msg::ToggleSelect(select_id.clone()))} />
            </td>
            <td class="number">{ &letter.number }</td>
            <td>{ &letter.organization }</td>
            <td>{ letter.received_date.map(|d| d.to_string()).unwrap_or_default() }</td>
            <td class="deadline">{ letter.deadline.map(|d| d.to_string()).unwrap_or_default() }</td>
            <td>{ letter.priority }</td>
            <td>
                <select onchange={link.callback(move |e: Event| Msg::PatchField {
                    id: status_id.clone(),
                    field: "status",
                    value: json!(select_value(&e)),
                })}>
                    { for LetterStatus::ALL.iter().map(|status| html! {
                        <option
                            value={status.as_key()}
                            selected={letter.status == *status}>
                            { status.label() }
                        </option>
                    }) }
                </select>
            </td>
            <td>
                <select onchange={link.callback(move |e: Event| {
                    let value = select_value(&e);
                    Msg::PatchField {
                        id: owner_id.clone(),
                        field: "owner",
                        value: if value.is_empty() { json!(null) } else { json!(value) },
                    }
                })}>
                    <option value="" selected={letter.owner.is_none()}>{ "—" }</option>
                    { for component.users.iter().map(|user| html! {
                        <option
                            value={user.id.clone()}
                            selected={letter.owner.as_deref() == Some(user.id.as_str())}>
                            { &user.name }
                        </option>
                    }) }
                </select>
            </td>
            <td class="activity">
                { format!("💬 {}  👁 {}", letter.comment_count, letter.watcher_count) }
            </td>
        </tr>
    }
}

fn view_cards(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="letter-cards">
            { for component.letters.iter().map(|letter| {
                let id = letter.id.clone();
                html! {
                    <div class="letter-card" key={letter.id.clone()}>
                        <div class="card-head">
                            <input
                                type="checkbox"
                                checked={component.selected.contains(&letter.id)}
                                onchange={link.callback(move |_| Msg::ToggleSelect(id.clone()))} />
                            <span class="number">{ &letter.number }</span>
                            <span class="status">{ letter.status.label() }</span>
                        </div>
                        <div class="card-org">{ &letter.organization }</div>
                        <div class="card-dates">
                            { letter.received_date.map(|d| format!("Received {}", d)).unwrap_or_default() }
                            { letter.deadline.map(|d| format!(" · Due {}", d)).unwrap_or_default() }
                        </div>
                        <div class="card-content">{ &letter.content }</div>
                    </div>
                }
            }) }
        </div>
    }
}

fn view_pagination(component: &LettersComponent, ctx: &Context<LettersComponent>) -> Html {
    let link = ctx.link();
    let Some(pagination) = &component.pagination else {
        return html! {};
    };
    let page = pagination.page;
    let last = pagination.total_pages.max(1);

    html! {
        <div class="pagination">
            <button
                disabled={page <= 1}
                onclick={link.callback(move |_| Msg::SetPage(page.saturating_sub(1)))}>
                { "‹ Prev" }
            </button>
            <span>{ format!("Page {} of {} ({} letters)", page, last, pagination.total) }</span>
            <button
                disabled={page >= last}
                onclick={link.callback(move |_| Msg::SetPage(page + 1))}>
                { "Next ›" }
            </button>
            <select onchange={link.callback(|e: Event| {
                Msg::SetLimit(select_value(&e).parse().unwrap_or(25))
            })}>
                { for PAGE_SIZE_CHOICES.iter().map(|size| html! {
                    <option
                        value={size.to_string()}
                        selected={component.filters.limit == *size}>
                        { format!("{} / page", size) }
                    </option>
                }) }
            </select>
        </div>
    }
}
