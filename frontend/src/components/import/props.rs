use yew::prelude::*;

/// Properties for the bulk-import dialog.
#[derive(Properties, PartialEq, Clone)]
pub struct ImportProps {
    /// Fired after a successful batch creation so the list behind the
    /// dialog can force-reload; the dialog may stay open if skipped rows
    /// remain to be corrected.
    pub on_created: Callback<()>,
    /// Fired when the dialog is done (cancelled, or every row consumed
    /// and attachments settled).
    pub on_close: Callback<()>,
}
