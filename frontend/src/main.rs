use leptos::prelude::*;
use taskdeck_frontend::App;
use taskdeck_frontend::config::AppConfig;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_build_env();
    if let Err(e) = console_log::init_with_level(config.log_level) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }

    mount_to_body(App);
}
