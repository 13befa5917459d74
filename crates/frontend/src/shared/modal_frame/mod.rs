use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::shared::icons::icon;

/// Modal frame: overlay, header with title and close button, body.
///
/// Footer buttons belong to the content, so forms keep their submit button
/// inside their own `<form>`.
#[component]
pub fn ModalFrame(
    #[prop(into)]
    title: Signal<String>,
    /// Called when the modal should close (overlay click, close button).
    on_close: Callback<()>,
    /// Close when clicking on the overlay (default: true).
    #[prop(optional)]
    close_on_overlay: Option<bool>,
    children: Children,
) -> impl IntoView {
    let close_on_overlay = close_on_overlay.unwrap_or(true);
    let overlay_mouse_down = RwSignal::new(false);

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    // Close only if both press and release happened on the overlay itself:
    // selecting text inside the modal and releasing outside must not close it.
    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    let handle_overlay_click = move |ev: ev::MouseEvent| {
        let should_close =
            close_on_overlay && overlay_mouse_down.get() && is_direct_overlay_event(&ev);
        overlay_mouse_down.set(false);
        if should_close {
            // the overlay must not be removed during its own click dispatch
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    view! {
        <div
            class="modal-overlay"
            style="z-index: 1000;"
            on:mousedown=handle_overlay_mouse_down
            on:click=handle_overlay_click
        >
            <div class="modal" style="position: relative;" on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{move || title.get()}</h2>
                    <button type="button" class="button button--ghost" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}
