use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::icons::icon_close;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub footer: Html,
    #[prop_or_default]
    pub wide: bool,
    #[prop_or_default]
    pub children: Children,
}

/// Overlay dialog; Escape and the backdrop close it.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    use_effect_with_deps(
        move |on_close: &Callback<()>| {
            let on_close = on_close.clone();
            let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                if event.key() == "Escape" {
                    on_close.emit(());
                }
            });
            let document = web_sys::window().and_then(|window| window.document());
            if let Some(document) = &document {
                if document
                    .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
                    .is_err()
                {
                    log::warn!("could not listen for Escape");
                }
            }
            move || {
                if let Some(document) = document {
                    let _ = document
                        .remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
                }
                drop(listener);
            }
        },
        props.on_close.clone(),
    );

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let keep_open = Callback::from(|event: MouseEvent| event.stop_propagation());
    let width = if props.wide { "max-w-4xl" } else { "max-w-lg" };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40 p-4" onclick={close.clone()}>
            <div class={classes!("w-full", width, "max-h-[90vh]", "flex", "flex-col", "bg-white", "rounded-2xl", "shadow-xl")} onclick={keep_open}>
                <div class="flex items-center justify-between px-6 py-4 border-b border-border">
                    <h3 class="text-lg font-bold text-[#173E63]">{ props.title.clone() }</h3>
                    <button class="p-1 rounded-full hover:bg-slate-100" aria-label="Tutup" onclick={close}>
                        { icon_close() }
                    </button>
                </div>
                <div class="flex-1 overflow-y-auto px-6 py-4">
                    { for props.children.iter() }
                </div>
                if props.footer != Html::default() {
                    <div class="flex justify-end gap-2 px-6 py-4 border-t border-border">
                        { props.footer.clone() }
                    </div>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub title: AttrValue,
    pub message: AttrValue,
    pub confirm_label: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Two-button confirmation dialog used before deletes.
#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_| on_confirm.emit(()))
    };
    let cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_| on_cancel.emit(()))
    };
    let footer = html! {
        <>
            <button class="px-4 py-2 rounded-xl border border-border text-sm font-semibold" onclick={cancel}>{"Batal"}</button>
            <button class="px-4 py-2 rounded-xl bg-red-600 text-white text-sm font-semibold hover:bg-red-700" onclick={confirm}>
                { props.confirm_label.clone() }
            </button>
        </>
    };
    html! {
        <Modal title={props.title.clone()} on_close={props.on_cancel.clone()} footer={footer}>
            <p class="text-sm text-slate-600">{ props.message.clone() }</p>
        </Modal>
    }
}

/// Native `confirm()` prompt; a missing window counts as "no".
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
