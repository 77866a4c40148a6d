//! Entry point of the storefront widgets.
//! Mounts one Yew app per server-rendered root found on the page and wires
//! the remaining static markup (menu, accordion).

use std::rc::Rc;

use bulka_play::api::FetchApi;
use bulka_play::carousel::{Carousel, CarouselAction};
use bulka_play::catalog::Catalog;
use bulka_play::draft::CardState;
use bulka_play::form::{FormEvent, OrderForm, TextField};
use bulka_play::guests::slider_fill_percent;
use bulka_play::submission::SubmitContext;
use bulka_play::validation::FormField;
use bulka_play::{ItemId, OrderType};
use log::info;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

mod cache;
mod components;
mod config;
mod dom;
mod hooks;

use components::{
    CarouselModal, FieldErrorMessage, GuestRange, ItemCheckbox, OrderSummary, SuccessModal,
};
use config::*;
use hooks::{
    use_escape, use_guest_recommendation, use_order_submit, use_scroll_lock,
    use_scroll_to_first_error,
};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

fn text_callback<E>(form: &UseReducerHandle<OrderForm>, field: TextField) -> Callback<E>
where
    E: AsRef<web_sys::Event> + 'static,
{
    let dispatcher = form.dispatcher();
    Callback::from(move |e: E| {
        let value = if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
            area.value()
        } else {
            return;
        };
        dispatcher.dispatch(FormEvent::TextEdited(field, value));
    })
}

fn select_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

fn error_of(form: &OrderForm, field: FormField) -> Option<AttrValue> {
    form.error_for(field).map(|m| AttrValue::from(m.to_string()))
}

// ──────────────────────────────────────────────────────────────────────────────
// Order dialog

#[derive(Properties, PartialEq)]
struct OrderAppProps {
    catalog: Rc<Catalog>,
    api: Rc<FetchApi>,
    ctx: Rc<SubmitContext>,
}

/// The order dialog: type selector, buy and rent sections, contact fields,
/// running total and submission.
#[function_component(OrderApp)]
fn order_app(props: &OrderAppProps) -> Html {
    let form = {
        let catalog = props.catalog.clone();
        use_reducer(move || OrderForm::new(catalog))
    };
    let onsubmit = use_order_submit(form.clone(), props.api.clone(), props.ctx.clone());
    use_scroll_to_first_error(form.error_scroll, form.first_error_element());
    let backdrop = use_node_ref();

    let close = {
        let dispatcher = form.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(FormEvent::DialogCloseRequested))
    };
    use_escape(form.dialog_open, close.clone());
    use_scroll_lock(form.dialog_open);

    // Buttons rendered by the server open the dialog.
    {
        let dispatcher = form.dispatcher();
        use_effect_with((), move |_| {
            let listeners = dom::on_click_all(ORDER_OPENER_SELECTOR, move |el| {
                dispatcher.dispatch(FormEvent::DialogOpened(dom::open_preset(el)));
            });
            info!("Order dialog attached to {} opener(s)", listeners.len());
            move || drop(listeners)
        });
    }

    let dismiss_success = {
        let dispatcher = form.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(FormEvent::SuccessDismissed))
    };
    let success = form
        .success
        .clone()
        .map(|message| html! { <SuccessModal message={message} onclose={dismiss_success} /> });

    if !form.dialog_open {
        return html! { <>{ for success }</> };
    }

    let onbackdrop = {
        let backdrop = backdrop.clone();
        let close = close.clone();
        Callback::from(move |e: MouseEvent| {
            let clicked = e.target_dyn_into::<Element>();
            if clicked.is_some() && clicked == backdrop.cast::<Element>() {
                close.emit(());
            }
        })
    };
    let onclose = {
        let close = close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let on_type = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            dispatcher.dispatch(FormEvent::OrderTypeChanged(OrderType::parse(&select_value(&e))));
        })
    };
    let on_rent_option = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let option = select_value(&e).trim().parse::<ItemId>().ok();
            dispatcher.dispatch(FormEvent::RentOptionChanged(option));
        })
    };
    let on_double_count = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let count = select_value(&e).trim().parse::<u8>().unwrap_or(1);
            dispatcher.dispatch(FormEvent::DoubleGameCountChanged(count));
        })
    };
    let on_engraving = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            dispatcher.dispatch(FormEvent::EngravingToggled(input.checked()));
        })
    };
    let toggle = |make: fn(ItemId, bool) -> FormEvent| {
        let dispatcher = form.dispatcher();
        Callback::from(move |(id, checked): (ItemId, bool)| dispatcher.dispatch(make(id, checked)))
    };
    let on_buy_game = toggle(FormEvent::BuyGameToggled);
    let on_good = toggle(FormEvent::AdditionalGoodToggled);
    let on_rent_game = toggle(FormEvent::RentGameToggled);

    let catalog = &props.catalog;
    let draft = &form.draft;
    let fields = &form.fields;
    let quote = form.quote();
    let submit_label = if form.submitting {
        SUBMIT_BUSY_LABEL
    } else {
        SUBMIT_LABEL
    };

    let buy_section = html! {
        <div class="buy-section">
            if draft.order_type == OrderType::Buy {
                <div class="form-group">
                    <label for="double_game_count">{ "Игр на одной доске:" }</label>
                    <select id="double_game_count" name="double_game_count" onchange={on_double_count}>
                        <option value="1" selected={draft.double_game_count == 1}>{ "1" }</option>
                        <option value="2" selected={draft.double_game_count == 2}>{ "2" }</option>
                    </select>
                </div>
            }
            <div class="form-group buy-games">
                <label>{ "Игры:" }</label>
                { for catalog.games.iter().map(|game| html! {
                    <ItemCheckbox
                        item={game.clone()}
                        name="buy_games"
                        state={CardState {
                            visible: true,
                            enabled: true,
                            checked: draft.buy_games.contains(&game.id),
                        }}
                        ontoggle={on_buy_game.clone()}
                    />
                }) }
                <FieldErrorMessage id={FormField::BuySelection.error_element_id()}
                    message={error_of(&form, FormField::BuySelection)} />
            </div>
            if !catalog.additional_goods.is_empty() {
                <div class="form-group additional-goods">
                    <label>{ "Дополнительные товары:" }</label>
                    { for catalog.additional_goods.iter().map(|good| html! {
                        <ItemCheckbox
                            item={good.clone()}
                            name="additional_goods"
                            state={CardState {
                                visible: true,
                                enabled: true,
                                checked: draft.additional_goods.contains(&good.id),
                            }}
                            ontoggle={on_good.clone()}
                        />
                    }) }
                </div>
            }
            <div class="form-group checkbox-group">
                <label>
                    <input type="checkbox" name="engraving" checked={fields.engraving} onchange={on_engraving} />
                    { " Гравировка" }
                </label>
            </div>
            <div class="form-group">
                <label for="delivery_address">{ "Адрес доставки:" }</label>
                <input id="delivery_address" name="delivery_address" type="text"
                    value={fields.delivery_address.clone()}
                    oninput={text_callback::<InputEvent>(&form, TextField::DeliveryAddress)} />
                <FieldErrorMessage id={FormField::DeliveryAddress.error_element_id()}
                    message={error_of(&form, FormField::DeliveryAddress)} />
            </div>
        </div>
    };

    let rent_section = html! {
        <div class="rent-section">
            <div class="form-group">
                <label for="rent_type">{ "Вариант аренды:" }</label>
                <select id="rent_type" name="rent_type" onchange={on_rent_option}>
                    <option value="" selected={draft.rent_option_id.is_none()}>{ "— выберите —" }</option>
                    { for catalog.rental_options.iter().map(|option| html! {
                        <option value={option.id.to_string()}
                            selected={draft.rent_option_id == Some(option.id)}>
                            { &option.name }
                        </option>
                    }) }
                </select>
                <FieldErrorMessage id={FormField::RentOption.error_element_id()}
                    message={error_of(&form, FormField::RentOption)} />
            </div>
            if draft.rent_option_id.is_some() {
                <div class="form-group rent-games">
                    <label>{ format!("Игры (выбрано {} из {}):", draft.rent_games.len(), draft.max_selectable_games) }</label>
                    { for catalog.games.iter().map(|game| html! {
                        <ItemCheckbox
                            item={game.clone()}
                            name="rent_games"
                            state={draft.rent_card(game.id)}
                            ontoggle={on_rent_game.clone()}
                        />
                    }) }
                </div>
            }
            <FieldErrorMessage id={FormField::RentGames.error_element_id()}
                message={error_of(&form, FormField::RentGames)} />
            <div class="form-group">
                <label for="rent_date">{ "Дата аренды:" }</label>
                <input id="rent_date" name="rent_date" type="date" min={dom::today_iso()}
                    value={fields.rent_date.clone()}
                    onchange={text_callback::<Event>(&form, TextField::RentDate)} />
                <FieldErrorMessage id={FormField::RentDate.error_element_id()}
                    message={error_of(&form, FormField::RentDate)} />
            </div>
            <div class="form-group">
                <label for="rent_address">{ "Адрес проведения:" }</label>
                <input id="rent_address" name="rent_address" type="text"
                    value={fields.rent_address.clone()}
                    oninput={text_callback::<InputEvent>(&form, TextField::RentAddress)} />
                <FieldErrorMessage id={FormField::RentAddress.error_element_id()}
                    message={error_of(&form, FormField::RentAddress)} />
            </div>
        </div>
    };

    html! {
        <>
        <div ref={backdrop} id="orderModal" class="modal" style="display: block" onclick={onbackdrop}>
            <div class="modal-content">
                <span class="close" onclick={onclose}>{ "×" }</span>
                <form id="orderForm" action={props.ctx.endpoint.clone()} method="post" {onsubmit}>
                    <div class="form-group">
                        <label for="name">{ "Имя:" }</label>
                        <input id="name" name="name" type="text" value={fields.name.clone()}
                            oninput={text_callback::<InputEvent>(&form, TextField::Name)} />
                        <FieldErrorMessage id={FormField::Name.error_element_id()}
                            message={error_of(&form, FormField::Name)} />
                    </div>
                    <div class="form-group">
                        <label for="phone">{ "Телефон:" }</label>
                        <input id="phone" name="phone" type="tel" value={fields.phone.clone()}
                            oninput={text_callback::<InputEvent>(&form, TextField::Phone)} />
                        <FieldErrorMessage id={FormField::Phone.error_element_id()}
                            message={error_of(&form, FormField::Phone)} />
                    </div>
                    <div class="form-group">
                        <label for="order_type">{ "Тип заказа:" }</label>
                        <select id="order_type" name="order_type" onchange={on_type}>
                            <option value="" selected={draft.order_type == OrderType::Unset}>{ "— выберите —" }</option>
                            <option value="buy" selected={draft.order_type == OrderType::Buy}>{ "Покупка" }</option>
                            <option value="double_buy" selected={draft.order_type == OrderType::DoubleBuy}>{ "Две игры на одной доске" }</option>
                            <option value="rent" selected={draft.order_type == OrderType::Rent}>{ "Аренда" }</option>
                        </select>
                        <FieldErrorMessage id={FormField::OrderType.error_element_id()}
                            message={error_of(&form, FormField::OrderType)} />
                    </div>

                    if draft.shows_buy_section() {
                        { buy_section }
                    }
                    if draft.shows_rent_section() {
                        { rent_section }
                    }

                    <div class="form-group">
                        <label for="comment">{ "Комментарий:" }</label>
                        <textarea id="comment" name="comment" value={fields.comment.clone()}
                            oninput={text_callback::<InputEvent>(&form, TextField::Comment)} />
                    </div>

                    <OrderSummary {quote} />

                    <div id="form-error" class="error-message form-error"
                        style={if form.form_error.is_some() { "display: block" } else { "display: none" }}>
                        { form.form_error.clone().unwrap_or_default() }
                    </div>

                    <button type="submit" class="button submit-button" disabled={form.submitting}>
                        { submit_label }
                    </button>
                </form>
            </div>
        </div>
        { for success }
        </>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Galleries

#[derive(Clone, Copy, PartialEq)]
enum GalleryKind {
    News,
    Product,
}

#[derive(Properties, PartialEq)]
struct GalleryAppProps {
    kind: GalleryKind,
}

/// Image viewer opened from news cards or the product page.
#[function_component(GalleryApp)]
fn gallery_app(props: &GalleryAppProps) -> Html {
    let carousel = use_reducer(Carousel::default);
    let kind = props.kind;

    {
        let dispatcher = carousel.dispatcher();
        use_effect_with(kind, move |kind| {
            let listeners = match kind {
                GalleryKind::News => dom::on_click_all(NEWS_BUTTON_SELECTOR, move |button| {
                    let news_id = button.get_attribute("data-news-id").unwrap_or_default();
                    dispatcher.dispatch(CarouselAction::Open(dom::news_images(&news_id)));
                }),
                GalleryKind::Product => dom::on_click_all(PRODUCT_OPENER_SELECTOR, move |_| {
                    dispatcher.dispatch(CarouselAction::Open(dom::product_images()));
                }),
            };
            move || drop(listeners)
        });
    }

    let action = |action: CarouselAction| {
        let dispatcher = carousel.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(action.clone()))
    };
    let onclose = action(CarouselAction::Close);
    use_escape(carousel.is_open(), onclose.clone());
    use_scroll_lock(carousel.is_open());

    let prefix = match kind {
        GalleryKind::News => "news",
        GalleryKind::Product => "product",
    };

    html! {
        <CarouselModal
            carousel={(*carousel).clone()}
            prefix={prefix}
            onprev={action(CarouselAction::Prev)}
            onnext={action(CarouselAction::Next)}
            {onclose}
        />
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Guest-count widget

#[derive(Properties, PartialEq)]
struct GuestAppProps {
    api: Rc<FetchApi>,
}

/// Slider plus number input recommending how many games to bring.
#[function_component(GuestApp)]
fn guest_app(props: &GuestAppProps) -> Html {
    let rec = use_guest_recommendation(props.api.clone());
    let fill = slider_fill_percent(rec.guests, GUEST_SLIDER_MIN, GUEST_SLIDER_MAX);

    html! {
        <div class="guest-widget">
            <div class="slider-with-value">
                <input id="guestSlider" type="range"
                    min={GUEST_SLIDER_MIN.to_string()}
                    max={GUEST_SLIDER_MAX.to_string()}
                    value={rec.guests.to_string()}
                    style={format!("--value: {}%", fill)}
                    oninput={rec.on_slider.clone()}
                />
                <div id="guestValueDisplay">
                    { rec.guests.to_string() }{ " " }<span id="guestUnit">{ "чел" }</span>
                </div>
            </div>
            <input id="guestInput" type="number"
                min={GUEST_SLIDER_MIN.to_string()}
                max={GUEST_SLIDER_MAX.to_string()}
                value={rec.guests.to_string()}
                oninput={rec.on_number.clone()}
            />
            <GuestRange text={rec.range_text.clone().map(AttrValue::from)} />
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────

fn mount_order_app(root: Element, api: Rc<FetchApi>) {
    let catalog = dom::read_catalog();
    let ctx = SubmitContext {
        endpoint: dom::order_endpoint(&root),
        csrf_token: dom::csrf_token(&root),
    };
    info!(
        "Mounting order dialog ({} games, {} rental options)",
        catalog.games.len(),
        catalog.rental_options.len()
    );
    yew::Renderer::<OrderApp>::with_root_and_props(
        root,
        OrderAppProps {
            catalog: Rc::new(catalog),
            api,
            ctx: Rc::new(ctx),
        },
    )
    .render();
}

/// Entry point: mounts every widget whose root exists on this page.
fn main() {
    console_error_panic_hook::set_once();

    // Orders carry their endpoint in the submit context.
    let api = Rc::new(FetchApi::new(GUESTS_ENDPOINT));

    if let Some(root) = dom::element_by_id(ORDER_ROOT_ID) {
        mount_order_app(root, api.clone());
    }
    if let Some(root) = dom::element_by_id(GUEST_ROOT_ID) {
        yew::Renderer::<GuestApp>::with_root_and_props(root, GuestAppProps { api }).render();
    }
    if let Some(root) = dom::element_by_id(NEWS_GALLERY_ROOT_ID) {
        yew::Renderer::<GalleryApp>::with_root_and_props(
            root,
            GalleryAppProps {
                kind: GalleryKind::News,
            },
        )
        .render();
    }
    if let Some(root) = dom::element_by_id(PRODUCT_GALLERY_ROOT_ID) {
        yew::Renderer::<GalleryApp>::with_root_and_props(
            root,
            GalleryAppProps {
                kind: GalleryKind::Product,
            },
        )
        .render();
    }

    dom::install_burger_menu();
    dom::install_info_accordion();
}
