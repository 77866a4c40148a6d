//! Pure Yew view components for the storefront widgets.
//!
//! This module contains stateless components that render based on props;
//! state lives in the reducers wired up in `main.rs`.

use bulka_play::carousel::Carousel;
use bulka_play::catalog::CatalogItem;
use bulka_play::draft::CardState;
use bulka_play::pricing::{format_price, Quote};
use bulka_play::ItemId;
use web_sys::{Element, HtmlInputElement};
use yew::prelude::*;

/// Error line under a field. Always rendered so it can be scrolled to.
#[derive(Properties, PartialEq)]
pub struct FieldErrorProps {
    pub id: AttrValue,
    pub message: Option<AttrValue>,
}

#[function_component(FieldErrorMessage)]
pub fn field_error_message(props: &FieldErrorProps) -> Html {
    let style = if props.message.is_some() {
        "display: block"
    } else {
        "display: none"
    };
    html! {
        <div id={props.id.clone()} class="error-message" {style}>
            { props.message.clone().unwrap_or_default() }
        </div>
    }
}

/// Running total of the order. Hidden until there is something to pay for.
#[derive(Properties, PartialEq)]
pub struct OrderSummaryProps {
    pub quote: Quote,
}

#[function_component(OrderSummary)]
pub fn order_summary(props: &OrderSummaryProps) -> Html {
    if !props.quote.show_summary {
        return html! {};
    }
    html! {
        <div class="order-summary">
            <span class="order-summary-label">{ "Итого: " }</span>
            <span id="total-price" class="order-summary-total">{ props.quote.display() }</span>
            <span class="order-summary-currency">{ " ₽" }</span>
        </div>
    }
}

/// A catalog item with a checkbox, used for games and additional goods.
#[derive(Properties, PartialEq)]
pub struct ItemCheckboxProps {
    pub item: CatalogItem,
    /// Form field name (`buy_games`, `additional_goods`, `rent_games`).
    pub name: AttrValue,
    pub state: CardState,
    pub ontoggle: Callback<(ItemId, bool)>,
}

#[function_component(ItemCheckbox)]
pub fn item_checkbox(props: &ItemCheckboxProps) -> Html {
    if !props.state.visible {
        return html! {};
    }
    let onchange = {
        let id = props.item.id;
        let ontoggle = props.ontoggle.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            ontoggle.emit((id, input.checked()));
        })
    };
    html! {
        <label class="game-card" data-game-id={props.item.id.to_string()}>
            <input type="checkbox"
                name={props.name.clone()}
                value={props.item.id.to_string()}
                checked={props.state.checked}
                disabled={!props.state.enabled}
                {onchange}
            />
            <span class="game-card-name">{ &props.item.name }</span>
            <span class="game-card-price">{ format!("{} ₽", format_price(props.item.price)) }</span>
        </label>
    }
}

/// Confirmation shown after the order was accepted.
#[derive(Properties, PartialEq)]
pub struct SuccessModalProps {
    pub message: AttrValue,
    pub onclose: Callback<()>,
}

#[function_component(SuccessModal)]
pub fn success_modal(props: &SuccessModalProps) -> Html {
    let onclick = {
        let onclose = props.onclose.clone();
        Callback::from(move |_: MouseEvent| onclose.emit(()))
    };
    html! {
        <div class="modal success-modal" style="display: block">
            <div class="modal-content">
                <p class="success-message">{ props.message.clone() }</p>
                <button type="button" class="button" {onclick}>{ "Закрыть" }</button>
            </div>
        </div>
    }
}

/// Class of one carousel part, e.g. `product-carousel-item`.
fn part_class(prefix: &str, part: &str) -> String {
    format!("{}-{}", prefix, part)
}

/// Full-screen image viewer.
#[derive(Properties, PartialEq)]
pub struct CarouselModalProps {
    pub carousel: Carousel,
    /// Class prefix, `news` or `product`.
    pub prefix: AttrValue,
    pub onprev: Callback<()>,
    pub onnext: Callback<()>,
    pub onclose: Callback<()>,
}

#[function_component(CarouselModal)]
pub fn carousel_modal(props: &CarouselModalProps) -> Html {
    let backdrop = use_node_ref();
    if !props.carousel.is_open() {
        return html! {};
    }

    let onbackdrop = {
        let backdrop = backdrop.clone();
        let onclose = props.onclose.clone();
        Callback::from(move |e: MouseEvent| {
            let clicked = e.target_dyn_into::<Element>();
            if clicked.is_some() && clicked == backdrop.cast::<Element>() {
                onclose.emit(());
            }
        })
    };
    let emit = |cb: &Callback<()>| {
        let cb = cb.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let prefix = &props.prefix;

    html! {
        <div ref={backdrop} class={classes!("modal", part_class(prefix, "modal"))} style="display: block" onclick={onbackdrop}>
            <div class="modal-content">
                <span class={part_class(prefix, "close")} onclick={emit(&props.onclose)}>{ "×" }</span>
                <div class={part_class(prefix, "carousel")}>
                    <div class={part_class(prefix, "carousel-inner")}
                        style={format!("display: flex; transform: {}", props.carousel.transform())}>
                        { props.carousel.slides().iter().enumerate().map(|(i, src)| html! {
                            <div class={part_class(prefix, "carousel-item")}>
                                <img src={src.clone()} alt={format!("Слайд {}", i + 1)} />
                            </div>
                        }).collect::<Html>() }
                    </div>
                    if props.carousel.slides().len() > 1 {
                        <>
                            <button type="button" class="carousel-prev" onclick={emit(&props.onprev)}>{ "‹" }</button>
                            <button type="button" class="carousel-next" onclick={emit(&props.onnext)}>{ "›" }</button>
                        </>
                    }
                </div>
            </div>
        </div>
    }
}

/// Recommended games line of the guest widget.
#[derive(Properties, PartialEq)]
pub struct GuestRangeProps {
    pub text: Option<AttrValue>,
}

#[function_component(GuestRange)]
pub fn guest_range(props: &GuestRangeProps) -> Html {
    html! {
        <div class="guest-recommendation">
            if let Some(text) = &props.text {
                <span id="guestRange">{ text.clone() }</span>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_parts_follow_gallery_prefix() {
        assert_eq!(part_class("product", "carousel-item"), "product-carousel-item");
        assert_eq!(part_class("news", "carousel-inner"), "news-carousel-inner");
    }
}
