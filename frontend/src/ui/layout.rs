use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::icons::{icon_bell, icon_close, icon_log_out, icon_menu};
use crate::app::{use_app, Page};
use crate::backend::notifications;
use crate::format::{format_time_ago, parse_timestamp};
use crate::model::Notification;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let sidebar_open = use_state(|| false);

    let toggle_sidebar = {
        let sidebar_open = sidebar_open.clone();
        Callback::from(move |_| sidebar_open.set(!*sidebar_open))
    };
    // Picking a page on mobile also closes the drawer.
    let on_select = {
        let sidebar_open = sidebar_open.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |page: Page| {
            sidebar_open.set(false);
            on_select.emit(page);
        })
    };

    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={on_select.clone()} />
            </div>
            if *sidebar_open {
                <div class="fixed inset-0 z-40 flex md:hidden">
                    <Sidebar active_page={props.active_page} on_select={on_select} />
                    <div class="flex-1 bg-black/40" onclick={toggle_sidebar.clone()}></div>
                </div>
            }

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header on_menu={toggle_sidebar} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    on_menu: Callback<MouseEvent>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let ctx = use_app();
    let show_notifications = use_state(|| false);
    let show_user_menu = use_state(|| false);
    let latest = use_state(Vec::<Notification>::new);
    let unread = use_state(|| 0usize);
    let reload = use_state(|| 0u32);

    {
        let live = ctx.live.notifications;
        let ctx = ctx.clone();
        let latest = latest.clone();
        let unread = unread.clone();
        use_effect_with_deps(
            move |_| {
                if let Ok(user_id) = ctx.user_id() {
                    spawn_local(async move {
                        match notifications::latest(&ctx.backend, &user_id).await {
                            Ok(rows) => latest.set(rows),
                            Err(err) => log::warn!("could not load notifications: {}", err),
                        }
                        match notifications::unread(&ctx.backend, &user_id).await {
                            Ok(rows) => unread.set(notifications::unread_count(&rows)),
                            Err(err) => log::warn!("could not count unread notifications: {}", err),
                        }
                    });
                }
                || ()
            },
            (live, *reload),
        );
    }

    let toggle_notifications = {
        let show_notifications = show_notifications.clone();
        let show_user_menu = show_user_menu.clone();
        Callback::from(move |_| {
            show_user_menu.set(false);
            show_notifications.set(!*show_notifications);
        })
    };
    let toggle_user_menu = {
        let show_notifications = show_notifications.clone();
        let show_user_menu = show_user_menu.clone();
        Callback::from(move |_| {
            show_notifications.set(false);
            show_user_menu.set(!*show_user_menu);
        })
    };
    let mark_read = {
        let ctx = ctx.clone();
        let reload = reload.clone();
        Callback::from(move |id: String| {
            let ctx = ctx.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match notifications::mark_read(&ctx.backend, &id).await {
                    Ok(()) => reload.set(*reload + 1),
                    Err(err) => ctx.report("Gagal menandai notifikasi", &err),
                }
            });
        })
    };
    let mark_all_read = {
        let ctx = ctx.clone();
        let reload = reload.clone();
        Callback::from(move |_| {
            let Ok(user_id) = ctx.user_id() else {
                return;
            };
            let ctx = ctx.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match notifications::mark_all_read(&ctx.backend, &user_id).await {
                    Ok(()) => reload.set(*reload + 1),
                    Err(err) => ctx.report("Gagal menandai notifikasi", &err),
                }
            });
        })
    };
    let on_logout = {
        let ctx = ctx.clone();
        Callback::from(move |_| ctx.sign_out())
    };

    let (display_name, initial, email) = ctx
        .backend
        .user()
        .map(|user| (user.display_name(), user.initial(), user.email.clone().unwrap_or_default()))
        .unwrap_or_else(|| ("User".to_string(), "U".to_string(), String::new()));
    let now = Utc::now();

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <button class="md:hidden p-2 rounded-full hover:bg-secondary" aria-label="Menu" onclick={props.on_menu.clone()}>
                { icon_menu() }
            </button>
            <div class="flex-1"></div>
            <div class="relative flex items-center gap-4">
                <button class="p-2 hover:bg-secondary rounded-full transition-colors relative" aria-label="Notifikasi" onclick={toggle_notifications.clone()}>
                    { icon_bell() }
                    if *unread > 0 {
                        <span class="absolute -top-0.5 -right-0.5 min-w-[18px] h-[18px] px-1 bg-red-500 text-white text-[10px] font-bold rounded-full flex items-center justify-center">
                            { if *unread > 99 { "99+".to_string() } else { unread.to_string() } }
                        </span>
                    }
                </button>
                if *show_notifications {
                    <div class="absolute right-12 top-12 w-80 bg-white border border-border rounded-xl shadow-lg overflow-hidden z-50">
                        <div class="px-4 py-3 border-b border-border flex items-center justify-between">
                            <h4 class="text-sm font-bold text-[#173E63]">{"Notifikasi"}</h4>
                            <div class="flex items-center gap-2">
                                if *unread > 0 {
                                    <button class="text-xs font-semibold text-[#1D617A] hover:underline" onclick={mark_all_read}>{"Tandai semua dibaca"}</button>
                                }
                                <button class="text-slate-400 hover:text-slate-600" aria-label="Tutup" onclick={toggle_notifications}>{ icon_close() }</button>
                            </div>
                        </div>
                        <div class="divide-y divide-border max-h-96 overflow-y-auto">
                            if latest.is_empty() {
                                <p class="px-4 py-6 text-center text-xs text-slate-500">{"Belum ada notifikasi"}</p>
                            }
                            { for latest.iter().map(|row| {
                                let time = row
                                    .created_at
                                    .as_deref()
                                    .and_then(parse_timestamp)
                                    .map(|then| format_time_ago(then, now))
                                    .unwrap_or_default();
                                let onclick = {
                                    let mark_read = mark_read.clone();
                                    let id = row.id.clone();
                                    let is_read = row.is_read;
                                    Callback::from(move |_| if !is_read { mark_read.emit(id.clone()) })
                                };
                                let class = if row.is_read { "px-4 py-3 hover:bg-slate-50 cursor-pointer" } else { "px-4 py-3 bg-sky-50 hover:bg-sky-100 cursor-pointer" };
                                html! {
                                    <div key={row.id.clone()} {class} {onclick}>
                                        <div class="flex items-center justify-between gap-2">
                                            <p class="text-sm font-bold text-[#173E63] truncate">{ &row.title }</p>
                                            <span class="shrink-0 text-[10px] text-slate-400 font-bold uppercase tracking-tighter">{ time }</span>
                                        </div>
                                        <p class="text-xs text-slate-500 mt-1 whitespace-pre-line">{ &row.message }</p>
                                    </div>
                                }
                            }) }
                        </div>
                    </div>
                }

                <button class="flex items-center gap-2" onclick={toggle_user_menu}>
                    <span class="w-9 h-9 rounded-full bg-[#173E63] text-white font-bold flex items-center justify-center">{ initial }</span>
                    <span class="hidden sm:block text-sm font-semibold text-[#173E63]">{ display_name.clone() }</span>
                </button>
                if *show_user_menu {
                    <div class="absolute right-0 top-12 w-56 bg-white border border-border rounded-xl shadow-lg overflow-hidden z-50">
                        <div class="px-4 py-3 border-b border-border">
                            <p class="text-sm font-bold text-[#173E63]">{ display_name }</p>
                            <p class="text-xs text-slate-500 truncate">{ email }</p>
                        </div>
                        <button class="flex items-center gap-2 w-full px-4 py-3 text-sm text-red-600 hover:bg-red-50" onclick={on_logout}>
                            { icon_log_out() }
                            <span>{"Keluar"}</span>
                        </button>
                    </div>
                }
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let ctx = use_app();
    let on_logout = Callback::from(move |_| ctx.sign_out());

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#173E63] rounded-full flex items-center justify-center text-white text-lg font-black">
                    {"FS"}
                </div>
                <span class="text-[#173E63] text-xl font-black tracking-tight">{"Finance System"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for Page::ALL.iter().map(|page| {
                        let class_name = if *page == props.active_page {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = *page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ page.icon() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ page.label() }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Keluar"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
