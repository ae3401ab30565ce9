use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use super::icons::{icon_alert, icon_check_circle, icon_close, icon_info};

/// How long a toast stays up unless closed by hand.
pub const TOAST_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn classes(self) -> &'static str {
        match self {
            ToastKind::Success => "border-emerald-500 bg-emerald-50 text-emerald-800",
            ToastKind::Error => "border-red-500 bg-red-50 text-red-800",
            ToastKind::Warning => "border-amber-500 bg-amber-50 text-amber-800",
            ToastKind::Info => "border-sky-500 bg-sky-50 text-sky-800",
        }
    }

    fn icon(self) -> Html {
        match self {
            ToastKind::Success => icon_check_circle(),
            ToastKind::Error | ToastKind::Warning => icon_alert(),
            ToastKind::Info => icon_info(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub enum ToastAction {
    Push(ToastMessage),
    Dismiss(u32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u32,
    pub items: Vec<(u32, ToastMessage)>,
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut queue = (*self).clone();
        match action {
            ToastAction::Push(toast) => {
                queue.items.push((queue.next_id, toast));
                queue.next_id = queue.next_id.wrapping_add(1);
            }
            ToastAction::Dismiss(id) => queue.items.retain(|(item_id, _)| *item_id != id),
        }
        Rc::new(queue)
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    id: u32,
    toast: ToastMessage,
    on_dismiss: Callback<u32>,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with_deps(
            move |id: &u32| {
                let id = *id;
                let timeout = Timeout::new(TOAST_MS, move || on_dismiss.emit(id));
                move || drop(timeout)
            },
            props.id,
        );
    }

    let close = {
        let on_dismiss = props.on_dismiss.clone();
        let id = props.id;
        Callback::from(move |_| on_dismiss.emit(id))
    };

    html! {
        <div class={classes!("flex", "items-start", "gap-3", "w-80", "border-l-4", "rounded-lg", "shadow-lg", "px-4", "py-3", props.toast.kind.classes())}>
            <span class="shrink-0 mt-0.5">{ props.toast.kind.icon() }</span>
            <div class="flex-1 min-w-0">
                <p class="text-sm font-bold">{ &props.toast.title }</p>
                if !props.toast.message.is_empty() {
                    <p class="text-xs mt-1 whitespace-pre-line">{ &props.toast.message }</p>
                }
            </div>
            <button class="shrink-0 opacity-60 hover:opacity-100" aria-label="Tutup" onclick={close}>
                { icon_close() }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub queue: ToastQueue,
    pub on_dismiss: Callback<u32>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="fixed top-4 right-4 z-[60] flex flex-col gap-2">
            { for props.queue.items.iter().map(|(id, toast)| html! {
                <ToastItem key={*id} id={*id} toast={toast.clone()} on_dismiss={props.on_dismiss.clone()} />
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_pushes_and_dismisses_by_id() {
        let queue = Rc::new(ToastQueue::default());
        let queue = queue.reduce(ToastAction::Push(ToastMessage::new(ToastKind::Info, "a", "")));
        let queue = queue.reduce(ToastAction::Push(ToastMessage::new(ToastKind::Error, "b", "x")));
        assert_eq!(queue.items.len(), 2);
        assert_eq!(queue.items[1].0, 1);

        let queue = queue.reduce(ToastAction::Dismiss(0));
        assert_eq!(queue.items.len(), 1);
        assert_eq!(queue.items[0].1.title, "b");

        let queue = queue.reduce(ToastAction::Dismiss(42));
        assert_eq!(queue.items.len(), 1);
    }
}
