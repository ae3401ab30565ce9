use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::icons::icon_search;

const INPUT_CLASS: &str =
    "w-full px-3 py-2 rounded-xl border border-border bg-white text-sm focus:outline-none focus:ring-2 focus:ring-[#B2CBDE]";

pub const PRIMARY_BUTTON: &str =
    "inline-flex items-center gap-2 px-4 py-2 rounded-xl bg-[#173E63] text-white text-sm font-semibold hover:bg-[#1D617A] disabled:opacity-50";
pub const SECONDARY_BUTTON: &str =
    "inline-flex items-center gap-2 px-4 py-2 rounded-xl border border-border text-sm font-semibold hover:bg-slate-50";
pub const ICON_BUTTON: &str = "p-2 rounded-lg hover:bg-slate-100 text-slate-600";

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: AttrValue,
    pub value: AttrValue,
    pub on_input: Callback<String>,
    #[prop_or(AttrValue::Static("text"))]
    pub kind: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub required: bool,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input = e.target_unchecked_into::<HtmlInputElement>();
            on_input.emit(input.value());
        })
    };
    html! {
        <label class="block space-y-1">
            <span class="text-xs font-semibold text-slate-600">
                { props.label.clone() }
                if props.required { <span class="text-red-500">{" *"}</span> }
            </span>
            <input
                class={INPUT_CLASS}
                type={props.kind.clone()}
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                required={props.required}
                disabled={props.disabled}
                {oninput}
            />
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextAreaFieldProps {
    pub label: AttrValue,
    pub value: AttrValue,
    pub on_input: Callback<String>,
    #[prop_or(3)]
    pub rows: u32,
}

#[function_component(TextAreaField)]
pub fn text_area_field(props: &TextAreaFieldProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let area = e.target_unchecked_into::<HtmlTextAreaElement>();
            on_input.emit(area.value());
        })
    };
    html! {
        <label class="block space-y-1">
            <span class="text-xs font-semibold text-slate-600">{ props.label.clone() }</span>
            <textarea class={INPUT_CLASS} rows={props.rows.to_string()} value={props.value.clone()} {oninput}></textarea>
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectFieldProps {
    pub label: AttrValue,
    pub value: AttrValue,
    /// `(value, label)` pairs.
    pub options: Vec<(String, String)>,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
}

#[function_component(SelectField)]
pub fn select_field(props: &SelectFieldProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select = e.target_unchecked_into::<HtmlSelectElement>();
            on_change.emit(select.value());
        })
    };
    html! {
        <label class="block space-y-1">
            <span class="text-xs font-semibold text-slate-600">{ props.label.clone() }</span>
            <select class={INPUT_CLASS} {onchange}>
                if let Some(placeholder) = &props.placeholder {
                    <option value="" selected={props.value.is_empty()}>{ placeholder.clone() }</option>
                }
                { for props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={props.value.as_str() == value}>{ label }</option>
                }) }
            </select>
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct SearchBoxProps {
    pub value: AttrValue,
    pub on_input: Callback<String>,
    #[prop_or(AttrValue::Static("Cari..."))]
    pub placeholder: AttrValue,
}

#[function_component(SearchBox)]
pub fn search_box(props: &SearchBoxProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            on_input.emit(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    html! {
        <div class="relative w-full md:w-72">
            <span class="absolute left-3 top-1/2 -translate-y-1/2 text-slate-400">{ icon_search() }</span>
            <input
                class={classes!(INPUT_CLASS, "pl-10")}
                type="search"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                {oninput}
            />
        </div>
    }
}

/// Inline filter dropdown without a label, used next to search boxes.
pub fn filter_select(value: &str, options: Vec<(String, String)>, on_change: Callback<String>) -> Html {
    let onchange = Callback::from(move |e: Event| {
        on_change.emit(e.target_unchecked_into::<HtmlSelectElement>().value());
    });
    html! {
        <select class={classes!(INPUT_CLASS, "md:w-48")} {onchange}>
            { for options.into_iter().map(|(option, label)| html! {
                <option value={option.clone()} selected={option == value}>{ label }</option>
            }) }
        </select>
    }
}

/// Red inline message under a form.
pub fn form_error(message: &Option<String>) -> Html {
    match message {
        Some(message) => html! {
            <p class="text-sm text-red-600 bg-red-50 border border-red-200 rounded-lg px-3 py-2">{ message }</p>
        },
        None => html! {},
    }
}
