mod app;
mod backend;
mod config;
mod export;
mod format;
mod listing;
mod model;
mod pages;
mod stats;
mod storage;
mod terbilang;
mod ui;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("finance system front-end starting");
    yew::Renderer::<app::App>::new().render();
}
