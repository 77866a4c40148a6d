//! Glue to the server-rendered page: reading the catalog and data
//! attributes, attaching listeners to markup Yew does not own, scrolling.
//!
//! Every helper tolerates missing elements and simply does nothing.

use bulka_play::catalog::{parse_flag, Catalog, CatalogItem, RentalOption};
use bulka_play::form::OpenPreset;
use bulka_play::menu::{Accordion, BurgerMenu};
use bulka_play::pricing::parse_price;
use bulka_play::{ItemId, OrderType};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement, KeyboardEvent,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::config::*;

/// An event listener that is removed when dropped.
pub struct DomListener {
    target: EventTarget,
    event: &'static str,
    callback: Option<Closure<dyn FnMut(Event)>>,
}

impl DomListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Option<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                callback: Some(callback),
            }),
            Err(e) => {
                warn!("Failed to attach '{}' listener: {:?}", event, e);
                None
            }
        }
    }

    /// Keep the listener for the lifetime of the page.
    pub fn forget(mut self) {
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        if let Some(callback) = &self.callback {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, callback.as_ref().unchecked_ref());
        }
    }
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let document: JsValue = gloo_utils::document().into();
    query_all_in(&document, selector)
}

fn query_all_in(scope: &JsValue, selector: &str) -> Vec<Element> {
    let list = if let Some(el) = scope.dyn_ref::<Element>() {
        el.query_selector_all(selector)
    } else if let Some(doc) = scope.dyn_ref::<web_sys::Document>() {
        doc.query_selector_all(selector)
    } else {
        return Vec::new();
    };

    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            warn!("Invalid selector '{}': {:?}", selector, e);
            Vec::new()
        }
    }
}

pub fn element_by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

fn data_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
}

fn data_id(el: &Element, name: &str) -> Option<ItemId> {
    data_attr(el, name).and_then(|v| v.trim().parse().ok())
}

fn item_from(el: &Element, id_attr: &str) -> Option<CatalogItem> {
    Some(CatalogItem {
        id: data_id(el, id_attr)?,
        name: data_attr(el, "name").unwrap_or_default(),
        price: data_attr(el, "price").map(|p| parse_price(&p)).unwrap_or(0.0),
    })
}

fn rental_option_from(el: &Element) -> Option<RentalOption> {
    Some(RentalOption {
        id: data_id(el, "rent-id")?,
        name: data_attr(el, "name").unwrap_or_default(),
        price: data_attr(el, "price").map(|p| parse_price(&p)).unwrap_or(0.0),
        game_count: data_attr(el, "game-count")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        is_specific: data_attr(el, "is-specific")
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
        specific_game: data_id(el, "specific-game"),
    })
}

/// Read the catalog from the page: the CSV block if present, otherwise the
/// `data-catalog` elements.
pub fn read_catalog() -> Catalog {
    if let Some(block) = element_by_id(CATALOG_CSV_ID) {
        let csv = block.text_content().unwrap_or_default();
        match Catalog::from_csv_str(&csv) {
            Ok(catalog) => return catalog,
            Err(e) => warn!("{}; falling back to data attributes", e),
        }
    }

    let mut catalog = Catalog {
        games: query_all("[data-catalog=\"game\"]")
            .iter()
            .filter_map(|el| item_from(el, "game-id"))
            .collect(),
        additional_goods: query_all("[data-catalog=\"good\"]")
            .iter()
            .filter_map(|el| item_from(el, "good-id"))
            .collect(),
        rental_options: query_all("[data-catalog=\"rent\"]")
            .iter()
            .filter_map(rental_option_from)
            .collect(),
    };
    catalog.dedup();
    debug!(
        "Catalog from data attributes: {} games, {} goods, {} rental options",
        catalog.games.len(),
        catalog.additional_goods.len(),
        catalog.rental_options.len()
    );
    catalog
}

/// Anti-forgery token: `data-csrf` on the root, else Django's hidden input.
pub fn csrf_token(root: &Element) -> String {
    data_attr(root, "csrf")
        .filter(|t| !t.is_empty())
        .or_else(|| {
            query_all(CSRF_INPUT_SELECTOR)
                .into_iter()
                .find_map(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
        })
        .unwrap_or_default()
}

pub fn order_endpoint(root: &Element) -> String {
    data_attr(root, "action")
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| ORDER_ENDPOINT.to_string())
}

/// Preset encoded on an order-dialog opener button.
pub fn open_preset(el: &Element) -> OpenPreset {
    OpenPreset {
        order_type: data_attr(el, "order-type")
            .map(|t| OrderType::parse(&t))
            .filter(|t| *t != OrderType::Unset),
        rent_option: data_id(el, "rent-option"),
        game: data_id(el, "game-id"),
    }
}

pub fn scroll_into_view(id: &str) {
    if let Some(el) = element_by_id(id) {
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(ScrollBehavior::Smooth);
        opts.set_block(ScrollLogicalPosition::Center);
        el.scroll_into_view_with_scroll_into_view_options(&opts);
    }
}

/// Stop the page behind a modal from scrolling.
pub fn set_body_scroll_locked(locked: bool) {
    if let Some(body) = gloo_utils::document().body() {
        let value = if locked { "hidden" } else { "auto" };
        if let Err(e) = body.style().set_property("overflow", value) {
            debug!("Could not set body overflow: {:?}", e);
        }
    }
}

/// Today as `YYYY-MM-DD`, the earliest selectable rent date.
pub fn today_iso() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

fn image_src(el: &Element) -> Option<String> {
    el.dyn_ref::<HtmlImageElement>()
        .map(|img| img.src())
        .filter(|src| !src.is_empty())
}

/// Main and additional images of the news card with the given id.
pub fn news_images(news_id: &str) -> Vec<String> {
    let selector = format!(".news-card[data-news-id=\"{}\"]", news_id);
    let Some(card) = query_all(&selector).into_iter().next() else {
        return Vec::new();
    };
    let scope: JsValue = card.into();
    query_all_in(&scope, ".news_card_image, .additional_news_image")
        .iter()
        .filter_map(image_src)
        .collect()
}

/// Images of the product detail page, main image first.
pub fn product_images() -> Vec<String> {
    query_all(PRODUCT_IMAGE_SELECTOR)
        .iter()
        .filter_map(image_src)
        .collect()
}

/// Listen for Escape on the whole window.
pub fn on_escape<F>(mut handler: F) -> Option<DomListener>
where
    F: FnMut() + 'static,
{
    let window: EventTarget = gloo_utils::window().into();
    DomListener::new(&window, "keydown", move |e: Event| {
        if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
            if key.key() == "Escape" {
                handler();
            }
        }
    })
}

/// Attach `handler` to clicks on every element matching `selector`.
pub fn on_click_all<F>(selector: &str, handler: F) -> Vec<DomListener>
where
    F: Fn(&Element) + 'static,
{
    let handler = Rc::new(handler);
    query_all(selector)
        .into_iter()
        .filter_map(|el| {
            let handler = handler.clone();
            let target: EventTarget = el.clone().into();
            DomListener::new(&target, "click", move |e: Event| {
                e.prevent_default();
                handler(&el);
            })
        })
        .collect()
}

fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(e) = el.class_list().toggle_with_force(class, on) {
        debug!("Could not toggle class {}: {:?}", class, e);
    }
}

/// Burger button toggles the navigation; Escape closes it.
pub fn install_burger_menu() {
    let Some(burger) = query_all(BURGER_SELECTOR).into_iter().next() else {
        return;
    };
    let menu_el = query_all(NAV_MENU_SELECTOR).into_iter().next();
    let state = Rc::new(RefCell::new(BurgerMenu::default()));

    let render = {
        let burger = burger.clone();
        move |menu: &BurgerMenu| {
            set_class(&burger, "active", menu.open);
            if let Some(nav) = &menu_el {
                set_class(nav, "open", menu.open);
            }
        }
    };
    let render = Rc::new(render);

    let target: EventTarget = burger.into();
    {
        let state = state.clone();
        let render = render.clone();
        if let Some(listener) = DomListener::new(&target, "click", move |_| {
            state.borrow_mut().toggle();
            render(&state.borrow());
        }) {
            listener.forget();
        }
    }
    if let Some(listener) = on_escape(move || {
        state.borrow_mut().close();
        render(&state.borrow());
    }) {
        listener.forget();
    }
}

/// `[data-info-target]` buttons expand one `.info-block` at a time and flip
/// their arrow icon.
pub fn install_info_accordion() {
    let state = Rc::new(RefCell::new(Accordion::default()));
    for listener in on_click_all(INFO_BUTTON_SELECTOR, move |button| {
        let Some(target) = data_attr(button, "info-target") else {
            return;
        };
        state.borrow_mut().toggle(&target);
        let acc = state.borrow();
        for block in query_all(INFO_BLOCK_SELECTOR) {
            let open = acc.is_open(&block.id());
            if let Some(block) = block.dyn_ref::<HtmlElement>() {
                let display = if open { "block" } else { "none" };
                if let Err(e) = block.style().set_property("display", display) {
                    debug!("Could not show info block {}: {:?}", block.id(), e);
                }
            }
        }
        if let Some(arrow) = button.query_selector(".arrow_accorderon").ok().flatten() {
            set_class(&arrow, "active", acc.is_open(&target));
        }
    }) {
        listener.forget();
    }
}
