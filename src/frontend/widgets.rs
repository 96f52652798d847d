use super::viewport::{now_ms, scroll_y, viewport_size};
use crate::ui::clock::{ClockFace, TimeOfDay, CLOCK_TICK_MS};
use crate::ui::scroll::{
    back_to_top_visible, blur_for_scroll, blur_style, PollVerdict, ScrollToTop,
    SCROLL_POLL_INTERVAL_MS,
};
use crate::ui::typewriter::{Typewriter as TypewriterMachine, TypewriterConfig};
use gloo_events::EventListener;
use gloo_timers::callback::{Interval, Timeout};
use web_sys::{window, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

fn current_time() -> TimeOfDay {
    let now = js_sys::Date::new_0();
    TimeOfDay {
        hour: now.get_hours(),
        minute: now.get_minutes(),
        second: now.get_seconds(),
    }
}

#[function_component(Clock)]
pub fn clock() -> Html {
    let time = use_state(current_time);

    {
        let time = time.clone();
        use_effect_with((), move |_| {
            // Re-read the wall clock every tick instead of accumulating.
            let ticker = Interval::new(CLOCK_TICK_MS, move || time.set(current_time()));
            move || drop(ticker)
        });
    }

    let face = ClockFace::from_time(*time);

    html! {
        <div class="clock" style={face.css_vars()} role="img" aria-label={face.digits()}>
            <div class="clock-dial" aria-hidden="true">
                <span class="clock-needle clock-needle-hour"></span>
                <span class="clock-needle clock-needle-minute"></span>
                <span class="clock-needle clock-needle-second"></span>
                <span class="clock-pin"></span>
            </div>
            <p class="clock-digits" aria-hidden="true">
                <span class="clock-hour">{face.hour12}</span>
                {":"}
                <span class="clock-minute">{face.minute_text.clone()}</span>
                {":"}
                <span class="clock-second">{face.second_text.clone()}</span>
                <span class="clock-meridiem">{face.meridiem.marker()}</span>
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TypewriterProps {
    pub texts: Vec<String>,
    #[prop_or(150)]
    pub type_speed: u32,
    #[prop_or(80)]
    pub erase_speed: u32,
    #[prop_or(2_000)]
    pub delay_between: u32,
}

#[function_component(Typewriter)]
pub fn typewriter(props: &TypewriterProps) -> Html {
    let machine = use_state(TypewriterMachine::default);
    let config = TypewriterConfig {
        type_speed_ms: props.type_speed,
        erase_speed_ms: props.erase_speed,
        delay_between_ms: props.delay_between,
    };

    {
        let machine = machine.clone();
        use_effect_with(props.texts.clone(), move |_| {
            machine.set(TypewriterMachine::default());
            || ()
        });
    }

    {
        let handle = machine.clone();
        // One pending step at a time: every state change replaces the timer.
        use_effect_with(
            (*machine, props.texts.clone(), config),
            move |(state, texts, config)| {
                let timer = state.next_delay(texts, config).map(|delay| {
                    let mut next = *state;
                    let texts = texts.clone();
                    Timeout::new(delay, move || {
                        next.advance(&texts);
                        handle.set(next);
                    })
                });
                move || drop(timer)
            },
        );
    }

    html! {
        <span class="typewriter">
            <span class="typewriter-text">{machine.displayed(&props.texts)}</span>
            <span class="typewriter-caret" aria-hidden="true">{"|"}</span>
        </span>
    }
}

fn current_blur() -> f64 {
    let (_, viewport_height) = viewport_size();
    blur_for_scroll(scroll_y(), viewport_height)
}

#[derive(Properties, PartialEq)]
pub struct BlurBackgroundProps {
    pub image: AttrValue,
}

#[function_component(BlurBackground)]
pub fn blur_background(props: &BlurBackgroundProps) -> Html {
    let blur = use_state(current_blur);

    {
        let blur = blur.clone();
        use_effect_with((), move |_| {
            let listeners = window().map(|win| {
                let on_scroll = {
                    let blur = blur.clone();
                    EventListener::new(&win, "scroll", move |_| blur.set(current_blur()))
                };
                let on_resize = EventListener::new(&win, "resize", move |_| blur.set(current_blur()));
                [on_scroll, on_resize]
            });
            move || drop(listeners)
        });
    }

    html! {
        <div class="background" aria-hidden="true">
            <div class="background-image" style={format!("background-image: url('{}');", props.image)}></div>
            <div class="background-blur" style={blur_style(*blur)}></div>
        </div>
    }
}

fn smooth_scroll_to_top() {
    if let Some(win) = window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&options);
    }
}

#[function_component(BackToTop)]
pub fn back_to_top() -> Html {
    let offset = use_state(scroll_y);
    let run = use_state(|| None::<ScrollToTop>);

    {
        let offset = offset.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|win| EventListener::new(&win, "scroll", move |_| offset.set(scroll_y())));
            move || drop(listener)
        });
    }

    {
        let handle = run.clone();
        use_effect_with(*run, move |active| {
            let poll = active.map(|active| {
                Interval::new(SCROLL_POLL_INTERVAL_MS, move || {
                    if active.poll(scroll_y(), now_ms()) != PollVerdict::Pending {
                        handle.set(None);
                    }
                })
            });
            move || drop(poll)
        });
    }

    let onclick = {
        let run = run.clone();
        Callback::from(move |_: MouseEvent| {
            if run.is_some() {
                return;
            }
            run.set(Some(ScrollToTop::start(now_ms())));
            smooth_scroll_to_top();
        })
    };

    let visible = back_to_top_visible(*offset, run.is_some());

    html! {
        <button
            class={classes!("back-to-top", visible.then_some("is-visible"))}
            type="button"
            aria-label="Back to top"
            aria-hidden={(!visible).to_string()}
            tabindex={if visible { "0" } else { "-1" }}
            {onclick}
        >
            <span aria-hidden="true">{"↑"}</span>
        </button>
    }
}
