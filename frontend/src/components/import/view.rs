use common::import::row::{any_parsing, ImportRow};
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use super::helpers;
use super::messages::{Msg, RowField};
use super::state::ImportComponent;

fn change_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn checkbox_checked(e: &Event) -> bool {
    e.target_unchecked_into::<HtmlInputElement>().checked()
}

pub fn view(component: &ImportComponent, ctx: &Context<ImportComponent>) -> Html {
    let link = ctx.link();

    let ondrop = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::FilesPicked(helpers::file_list_to_vec(
            e.data_transfer().and_then(|dt| dt.files()),
        ))
    });
    let ondragover = Callback::from(|e: DragEvent| e.prevent_default());
    let onpick = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = helpers::file_list_to_vec(input.files());
        input.set_value("");
        Msg::FilesPicked(files)
    });

    html! {
        <div class="import-dialog" ondrop={ondrop} ondragover={ondragover}>
            <div class="import-header">
                <h2>{ "Bulk import letters" }</h2>
                <button class="close" onclick={link.callback(|_| Msg::Cancel)}>{ "✕" }</button>
            </div>

            <div class="import-drop">
                <p>{ "Drop PDF documents here, or" }</p>
                <button onclick={link.callback(|_| Msg::OpenFileDialog)}>{ "Choose files" }</button>
                <input
                    ref={component.file_input_ref.clone()}
                    type="file"
                    accept=".pdf"
                    multiple=true
                    style="display: none;"
                    onchange={onpick} />
            </div>

            { view_defaults(component, ctx) }
            { view_rows(component, ctx) }

            <div class="import-footer">
                <label>
                    <input
                        type="checkbox"
                        checked={component.skip_duplicates}
                        onchange={link.callback(|e: Event| {
                            Msg::SetSkipDuplicates(checkbox_checked(&e))
                        })} />
                    { "Skip duplicates of existing letters" }
                </label>
                <label>
                    <input
                        type="checkbox"
                        checked={component.overwrite_extracted}
                        onchange={link.callback(|e: Event| {
                            Msg::SetOverwrite(checkbox_checked(&e))
                        })} />
                    { "Let extraction overwrite filled fields" }
                </label>
                <button onclick={link.callback(|_| Msg::AddRow)}>{ "Add row" }</button>
                <button
                    class="primary"
                    disabled={component.submitting || any_parsing(&component.rows)}
                    onclick={link.callback(|_| Msg::Submit)}>
                    { if component.submitting { "Submitting…" } else { "Create letters" } }
                </button>
            </div>
        </div>
    }
}

fn view_defaults(component: &ImportComponent, ctx: &Context<ImportComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="import-defaults">
            <span>{ "Defaults:" }</span>
            <input
                type="date"
                title="Received date"
                value={component.defaults_date.clone()}
                onchange={link.callback(|e: Event| Msg::SetDefaultDate(change_value(&e)))} />
            <input
                type="date"
                title="Deadline (left empty: inferred from the date)"
                value={component.defaults_deadline.clone()}
                onchange={link.callback(|e: Event| Msg::SetDefaultDeadline(change_value(&e)))} />
            <input
                type="text"
                placeholder="Type"
                value={component.defaults_type.clone()}
                onchange={link.callback(|e: Event| Msg::SetDefaultType(change_value(&e)))} />
            <button onclick={link.callback(|_| Msg::ApplyDefaults { only_empty: false })}>
                { "Apply to all" }
            </button>
            <button onclick={link.callback(|_| Msg::ApplyDefaults { only_empty: true })}>
                { "Apply to empty" }
            </button>
        </div>
    }
}

fn view_rows(component: &ImportComponent, ctx: &Context<ImportComponent>) -> Html {
    html! {
        <table class="import-rows">
            <thead>
                <tr>
                    <th>{ "Number" }</th>
                    <th>{ "Organization" }</th>
                    <th>{ "Received" }</th>
                    <th>{ "Deadline" }</th>
                    <th>{ "Type" }</th>
                    <th>{ "Priority" }</th>
                    <th>{ "Content" }</th>
                    <th>{ "File" }</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                { for component.rows.iter().map(|row| view_row(component, ctx, row)) }
            </tbody>
        </table>
    }
}

fn edit_callback(
    ctx: &Context<ImportComponent>,
    row_id: &str,
    field: RowField,
) -> Callback<Event> {
    let row_id = row_id.to_string();
    ctx.link().callback(move |e: Event| Msg::EditField {
        row_id: row_id.clone(),
        field,
        value: change_value(&e),
    })
}

fn view_row(component: &ImportComponent, ctx: &Context<ImportComponent>, row: &ImportRow) -> Html {
    let link = ctx.link();
    let duplicate = component.is_duplicate(row);
    let row_class = if row.error.is_some() || duplicate {
        "import-row invalid"
    } else if row.parsing {
        "import-row parsing"
    } else {
        "import-row"
    };
    let remove_id = row.id.clone();

    html! {
        <tr class={row_class} key={row.id.clone()}>
            <td>
                <input
                    type="text"
                    class={if duplicate { "dup" } else { "" }}
                    value={row.number.clone()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Number)} />
            </td>
            <td>
                <input
                    type="text"
                    value={row.organization.clone()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Organization)} />
            </td>
            <td>
                <input
                    type="date"
                    value={row.received_date.map(|d| d.to_string()).unwrap_or_default()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::ReceivedDate)} />
            </td>
            <td>
                <input
                    type="date"
                    value={row.deadline.map(|d| d.to_string()).unwrap_or_default()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Deadline)} />
            </td>
            <td>
                <input
                    type="text"
                    value={row.letter_type.clone()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Type)} />
            </td>
            <td>
                <input
                    type="number"
                    class="priority"
                    value={row.priority.to_string()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Priority)} />
            </td>
            <td>
                <input
                    type="text"
                    value={row.content.clone()}
                    disabled={row.parsing}
                    onchange={edit_callback(ctx, &row.id, RowField::Content)} />
            </td>
            <td class="file-cell">
                { row.file_name.clone().unwrap_or_default() }
                {
                    if row.parsing {
                        html! { <span class="badge parsing">{ "parsing…" }</span> }
                    } else if row.parsed_by_ai {
                        html! { <span class="badge parsed" title="Auto-filled from the document">{ "auto" }</span> }
                    } else {
                        html! {}
                    }
                }
                {
                    if let Some(error) = &row.error {
                        html! { <span class="badge error" title={error.clone()}>{ "!" }</span> }
                    } else {
                        html! {}
                    }
                }
            </td>
            <td>
                <button
                    class="remove"
                    disabled={row.parsing}
                    onclick={link.callback(move |_| Msg::RemoveRow(remove_id.clone()))}>
                    { "✕" }
                </button>
            </td>
        </tr>
    }
}
