//! Shared widgets: shell, toasts, modals, form fields and tables.

pub mod form;
pub mod icons;
mod layout;
mod loading;
mod modal;
mod pagination;
mod stat_card;
mod toast;

use yew::prelude::*;

use crate::model::Tone;

pub use layout::Layout;
pub use loading::{empty_row, loading_row, LoadingOverlay};
pub use modal::{confirm, ConfirmModal, Modal};
pub use pagination::Pagination;
pub use stat_card::{Accent, StatCard};
pub use toast::{ToastAction, ToastKind, ToastMessage, ToastQueue, ToastStack};

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex flex-col gap-3 md:flex-row md:items-center md:justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                <div class="flex flex-wrap items-center gap-2">{ actions }</div>
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

pub fn badge(tone: Tone, label: &str) -> Html {
    html! {
        <span class={classes!("inline-flex", "px-2", "py-0.5", "rounded-full", "text-xs", "font-semibold", tone.badge_class())}>
            { label.to_string() }
        </span>
    }
}

/// Wraps a table in the card used on every list page.
pub fn table_card(head: Html, body: Html, footer: Html) -> Html {
    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="bg-slate-50 text-left text-xs uppercase tracking-wider text-slate-500">
                        { head }
                    </thead>
                    <tbody class="divide-y divide-border">
                        { body }
                    </tbody>
                </table>
            </div>
            { footer }
        </div>
    }
}

/// Two-column label/value line used in detail modals.
pub fn detail_row(label: &str, value: impl Into<String>) -> Html {
    let value = value.into();
    html! {
        <div class="grid grid-cols-3 gap-2 py-2 border-b border-border last:border-0">
            <dt class="text-xs font-semibold text-slate-500">{ label.to_string() }</dt>
            <dd class="col-span-2 text-sm text-slate-800 whitespace-pre-line">{ if value.is_empty() { "-".to_string() } else { value } }</dd>
        </div>
    }
}
