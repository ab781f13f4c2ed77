//! Notices Component
//!
//! Transient messages; each one disappears on its own or when clicked.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn Notices() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <div class="notices" role="status" aria-live="polite">
            <For
                each=move || ctx.notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class="notice" on:click=move |_| ctx.dismiss(id)>
                            {notice.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
