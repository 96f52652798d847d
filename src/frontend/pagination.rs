use super::viewport::viewport_size;
use crate::ui::pagination::{page_items, PageItem};
use crate::ui::popup::{popup_anchor, Anchor, OpenPopup, PopupPhase, Rect, POPUP_FADE_MS};
use gloo_events::EventListener;
use gloo_render::request_animation_frame;
use gloo_timers::callback::Timeout;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{window, Element};
use yew::prelude::*;

const ELLIPSIS_CLASS: &str = "page-ellipsis";

pub enum PopupAction {
    Frame,
    Close,
}

impl Reducible for PopupPhase {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(match action {
            PopupAction::Frame => self.on_animation_frame(),
            PopupAction::Close => self.on_close_requested(),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct PagePopupProps {
    pub pages: Vec<u32>,
    pub anchor: Anchor,
    pub current: u32,
    pub closing: bool,
    pub on_select: Callback<u32>,
    pub on_closed: Callback<()>,
}

#[function_component(PagePopup)]
pub fn page_popup(props: &PagePopupProps) -> Html {
    let phase = use_reducer(|| PopupPhase::Entering);

    {
        let phase = phase.clone();
        use_effect_with((), move |_| {
            // Mount invisible, then flip so the transition has a start state.
            let frame = request_animation_frame(move |_| phase.dispatch(PopupAction::Frame));
            move || drop(frame)
        });
    }

    {
        let phase = phase.clone();
        let on_closed = props.on_closed.clone();
        use_effect_with(props.closing, move |closing| {
            let fade = closing.then(|| {
                phase.dispatch(PopupAction::Close);
                Timeout::new(POPUP_FADE_MS, move || on_closed.emit(()))
            });
            move || drop(fade)
        });
    }

    let onclick = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div
            class={classes!("page-popup", phase.class())}
            style={props.anchor.style()}
            role="dialog"
            aria-label="Jump to page"
            aria-hidden={(!phase.is_shown()).to_string()}
            {onclick}
        >
            <ul class="page-popup-list">
                {for props.pages.iter().map(|&page| {
                    let on_select = props.on_select.clone();
                    let is_current = page == props.current;
                    html! {
                        <li>
                            <button
                                type="button"
                                class={classes!("page-popup-item", is_current.then_some("is-current"))}
                                onclick={Callback::from(move |_: MouseEvent| on_select.emit(page))}
                            >
                                {page}
                            </button>
                        </li>
                    }
                })}
            </ul>
        </div>
    }
}

// Yew delegates events to the app root, so the clicked control is found from
// the event target rather than the current target.
fn measure_ellipsis(event: &MouseEvent) -> Option<Rect> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let control = target.closest(&format!(".{ELLIPSIS_CLASS}")).ok().flatten()?;
    let rect = control.get_bounding_client_rect();

    Some(Rect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    })
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current: u32,
    pub total_pages: u32,
    pub on_change: Callback<u32>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let popup = use_state(|| None::<OpenPopup>);

    let request_close = {
        let popup = popup.clone();
        Callback::from(move |_: ()| {
            if let Some(open) = (*popup).as_ref() {
                popup.set(Some(open.request_close()));
            }
        })
    };

    {
        let request_close = request_close.clone();
        use_effect_with((*popup).clone(), move |open| {
            // Any click that reaches the document landed outside the popup.
            let listener = open
                .as_ref()
                .filter(|open| !open.closing)
                .and_then(|_| window()?.document())
                .map(|document| EventListener::new(&document, "click", move |_| request_close.emit(())));
            move || drop(listener)
        });
    }

    if props.total_pages <= 1 {
        return html! {};
    }

    let go_to = |page: u32| {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(page))
    };

    let items = page_items(props.current, props.total_pages);
    let buttons = items.into_iter().map(|item| match item {
        PageItem::Page(page) => {
            let is_current = page == props.current;
            html! {
                <li key={format!("page-{page}")}>
                    <button
                        type="button"
                        class={classes!("page-number", is_current.then_some("is-current"))}
                        aria-current={is_current.then_some("page")}
                        onclick={go_to(page)}
                    >
                        {page}
                    </button>
                </li>
            }
        }
        PageItem::Ellipsis { hidden } => {
            let key = format!("ellipsis-{}", hidden.first().copied().unwrap_or_default());
            let popup = popup.clone();
            let onclick = Callback::from(move |event: MouseEvent| {
                event.stop_propagation();
                let anchor = popup_anchor(measure_ellipsis(&event), viewport_size());
                popup.set(Some(OpenPopup::open((*popup).as_ref(), hidden.clone(), anchor)));
            });
            html! {
                <li key={key}>
                    <button type="button" class={ELLIPSIS_CLASS} aria-label="Show hidden pages" {onclick}>
                        {"…"}
                    </button>
                </li>
            }
        }
    });

    let on_select = {
        let on_change = props.on_change.clone();
        let request_close = request_close.clone();
        Callback::from(move |page: u32| {
            on_change.emit(page);
            request_close.emit(());
        })
    };

    let on_closed = {
        let popup = popup.clone();
        Callback::from(move |_: ()| popup.set(None))
    };

    let previous = props.current.saturating_sub(1).max(1);
    let next = (props.current + 1).min(props.total_pages);

    html! {
        <nav class="pagination" aria-label="Pagination">
            <button
                type="button"
                class="page-step"
                disabled={props.current <= 1}
                onclick={go_to(previous)}
            >
                {"‹"}
            </button>
            <ul class="page-list">{for buttons}</ul>
            <button
                type="button"
                class="page-step"
                disabled={props.current >= props.total_pages}
                onclick={go_to(next)}
            >
                {"›"}
            </button>
            {(*popup).as_ref().map(|open| html! {
                <PagePopup
                    key={open.generation.to_string()}
                    pages={open.pages.clone()}
                    anchor={open.anchor}
                    current={props.current}
                    closing={open.closing}
                    on_select={on_select.clone()}
                    on_closed={on_closed.clone()}
                />
            })}
        </nav>
    }
}
