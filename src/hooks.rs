use std::rc::Rc;

use bulka_play::api::FetchApi;
use bulka_play::form::{FormEvent, OrderForm};
use bulka_play::guests::{clamp_guests, query_guests, range_text, recommend};
use bulka_play::submission::{submit_order, SubmitContext};
use bulka_play::validation;
use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::cache::{cached_range, store_range};
use crate::config::{DEBOUNCE_MS, DEFAULT_GUESTS};
use crate::dom;

/// Submit handler of the order dialog.
///
/// Validates first; on errors no request is made and the form records them
/// (see [`use_scroll_to_first_error`]). Otherwise the form is marked busy,
/// the order posted, and the outcome dispatched back, which always clears
/// the busy flag.
#[hook]
pub fn use_order_submit(
    form: UseReducerHandle<OrderForm>,
    api: Rc<FetchApi>,
    ctx: Rc<SubmitContext>,
) -> Callback<SubmitEvent> {
    Callback::from(move |e: SubmitEvent| {
        e.prevent_default();
        if form.submitting {
            debug!("Submit ignored, a request is already in flight");
            return;
        }

        let errors = validation::validate(&form.draft, &form.fields);
        if !errors.is_empty() {
            form.dispatch(FormEvent::ValidationFailed(errors));
            return;
        }

        form.dispatch(FormEvent::SubmitStarted);
        let draft = form.draft.clone();
        let fields = form.fields.clone();
        let api = api.clone();
        let ctx = ctx.clone();
        let dispatcher = form.dispatcher();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = submit_order(&*api, &draft, &fields, &ctx).await;
            dispatcher.dispatch(FormEvent::SubmitFinished(outcome));
        });
    })
}

/// Scroll the first error message into view after a rejected submit.
///
/// Runs as an effect so the messages are already laid out when it fires.
/// `request` is the form's `error_scroll` counter, `target` its
/// `first_error_element()`.
#[hook]
pub fn use_scroll_to_first_error(request: u32, target: Option<&'static str>) {
    use_effect_with(request, move |request| {
        if *request > 0 {
            if let Some(id) = target {
                dom::scroll_into_view(id);
            }
        }
        || ()
    });
}

/// Call `on_escape` on Escape while `active` is true.
#[hook]
pub fn use_escape(active: bool, on_escape: Callback<()>) {
    use_effect_with(active, move |active| {
        let listener = if *active {
            dom::on_escape(move || on_escape.emit(()))
        } else {
            None
        };
        move || drop(listener)
    });
}

/// Lock page scrolling while a modal is shown.
#[hook]
pub fn use_scroll_lock(locked: bool) {
    use_effect_with(locked, |locked| {
        let locked = *locked;
        if locked {
            dom::set_body_scroll_locked(true);
        }
        move || {
            if locked {
                dom::set_body_scroll_locked(false);
            }
        }
    });
}

/// State and callbacks of the guest-count widget.
#[derive(Clone)]
pub struct GuestRecommendation {
    /// Guest count shown next to the slider.
    pub guests: u32,
    pub range_text: Option<String>,
    pub on_slider: Callback<InputEvent>,
    pub on_number: Callback<InputEvent>,
}

/// Debounced recommendation lookup. Answers are cached per guest count, and a
/// reply that arrives after a newer input is discarded.
#[hook]
pub fn use_guest_recommendation(api: Rc<FetchApi>) -> GuestRecommendation {
    let guests = use_state(|| DEFAULT_GUESTS);
    let range = use_state(|| None::<String>);
    let timer = use_mut_ref(|| None::<Timeout>);
    let request_token = use_mut_ref(|| 0u32);

    let lookup = {
        let range = range.clone();
        let timer = timer.clone();
        let request_token = request_token.clone();
        let api = api.clone();
        Rc::new(move |query: Option<u32>| {
            // Dropping the previous timeout cancels it.
            timer.borrow_mut().take();
            *request_token.borrow_mut() += 1;

            let Some(count) = query else {
                range.set(None);
                return;
            };
            if let Some(cached) = cached_range(count) {
                range.set(range_text(&cached));
                return;
            }

            let token = *request_token.borrow();
            let range = range.clone();
            let request_token = request_token.clone();
            let api = api.clone();
            let handle = Timeout::new(DEBOUNCE_MS, move || {
                wasm_bindgen_futures::spawn_local(async move {
                    let result = recommend(&*api, Some(count)).await;
                    if *request_token.borrow() != token {
                        debug!("Dropping stale recommendation for {} guests", count);
                        return;
                    }
                    match result {
                        Ok(Some(found)) => {
                            store_range(count, found);
                            range.set(range_text(&found));
                        }
                        Ok(None) => range.set(None),
                        // already logged by the api layer; keep the last text
                        Err(_) => {}
                    }
                });
            });
            *timer.borrow_mut() = Some(handle);
        })
    };

    let on_slider = {
        let guests = guests.clone();
        let lookup = lookup.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let count = clamp_guests(&input.value());
            guests.set(count);
            lookup(Some(count));
        })
    };

    let on_number = {
        let guests = guests.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let raw = input.value();
            let query = query_guests(&raw);
            if let Some(count) = query {
                guests.set(count);
            }
            lookup(query);
        })
    };

    GuestRecommendation {
        guests: *guests,
        range_text: (*range).clone(),
        on_slider,
        on_number,
    }
}
