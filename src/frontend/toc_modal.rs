use crate::ui::modal::{is_dismiss_key, restored_overflow};
use crate::ui::toc::{toc_view, TocEntry, TocView, EMPTY_TOC_MESSAGE};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;

struct ScrollLock {
    body: HtmlElement,
    previous_overflow: String,
}

impl ScrollLock {
    fn engage() -> Option<Self> {
        let body = window()?.document()?.body()?;
        let style = body.style();
        let previous_overflow = style.get_property_value("overflow").unwrap_or_default();
        let _ = style.set_property("overflow", "hidden");

        Some(Self {
            body,
            previous_overflow,
        })
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let style = self.body.style();
        match restored_overflow(&self.previous_overflow) {
            Some(previous) => {
                let _ = style.set_property("overflow", previous);
            }
            None => {
                let _ = style.remove_property("overflow");
            }
        }
    }
}

fn scroll_to_heading(anchor_id: &str) {
    let Some(target) = window()
        .and_then(|win| win.document())
        .and_then(|document| document.get_element_by_id(anchor_id))
    else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

#[derive(Properties, PartialEq)]
pub struct TocModalProps {
    pub open: bool,
    pub items: Vec<TocEntry>,
    #[prop_or_default]
    pub active_id: Option<AttrValue>,
    pub on_close: Callback<()>,
}

#[function_component(TocModal)]
pub fn toc_modal(props: &TocModalProps) -> Html {
    {
        let on_close = props.on_close.clone();
        use_effect_with(props.open, move |open| {
            let guards = open.then(|| {
                let lock = ScrollLock::engage();
                let escape = window()
                    .and_then(|win| win.document())
                    .map(|document| {
                        EventListener::new(&document, "keydown", move |event| {
                            let dismiss = event
                                .dyn_ref::<KeyboardEvent>()
                                .is_some_and(|key| is_dismiss_key(&key.key()));
                            if dismiss {
                                on_close.emit(());
                            }
                        })
                    });
                (lock, escape)
            });
            move || drop(guards)
        });
    }

    if !props.open {
        return html! {};
    }

    let on_overlay_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_panel_click = Callback::from(|event: MouseEvent| event.stop_propagation());

    let body = match toc_view(&props.items, props.active_id.as_deref()) {
        TocView::Empty => html! { <p class="toc-empty">{EMPTY_TOC_MESSAGE}</p> },
        TocView::Entries(rows) => html! {
            <ul class="toc-list">
                {for rows.into_iter().map(|row| {
                    let entry = row.entry;
                    let onclick = {
                        let anchor_id = entry.anchor_id.clone();
                        let on_close = props.on_close.clone();
                        Callback::from(move |_: MouseEvent| {
                            scroll_to_heading(&anchor_id);
                            on_close.emit(());
                        })
                    };
                    html! {
                        <li key={entry.id.clone()}>
                            <button
                                type="button"
                                class={classes!("toc-entry", format!("toc-level-{}", entry.level), row.is_active.then_some("is-active"))}
                                style={format!("padding-left: {}px;", row.indent_px)}
                                aria-current={row.is_active.then_some("location")}
                                {onclick}
                            >
                                {entry.text.clone()}
                            </button>
                        </li>
                    }
                })}
            </ul>
        },
    };

    html! {
        <div class="toc-overlay" onclick={on_overlay_click}>
            <div
                class="toc-panel"
                role="dialog"
                aria-modal="true"
                aria-labelledby="toc-heading"
                onclick={on_panel_click}
            >
                <header class="toc-header">
                    <h2 id="toc-heading">{"Contents"}</h2>
                    <button
                        type="button"
                        class="toc-close"
                        aria-label="Close table of contents"
                        onclick={{
                            let on_close = props.on_close.clone();
                            Callback::from(move |_: MouseEvent| on_close.emit(()))
                        }}
                    >
                        {"×"}
                    </button>
                </header>
                {body}
            </div>
        </div>
    }
}
