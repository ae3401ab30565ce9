use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    pub message: Option<String>,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    let Some(message) = &props.message else {
        return html! {};
    };
    html! {
        <div class="fixed inset-0 z-[70] flex items-center justify-center bg-white/70">
            <div class="flex flex-col items-center gap-3">
                <div class="w-10 h-10 border-4 border-[#B2CBDE] border-t-[#173E63] rounded-full animate-spin"></div>
                <p class="text-sm font-semibold text-[#173E63]">{ message }</p>
            </div>
        </div>
    }
}

/// Placeholder row shown while a table loads.
pub fn loading_row(columns: usize) -> Html {
    html! {
        <tr>
            <td colspan={columns.to_string()} class="px-4 py-8 text-center text-sm text-slate-500">{"Memuat data..."}</td>
        </tr>
    }
}

pub fn empty_row(columns: usize, message: &str) -> Html {
    html! {
        <tr>
            <td colspan={columns.to_string()} class="px-4 py-8 text-center text-sm text-slate-500">{ message }</td>
        </tr>
    }
}
