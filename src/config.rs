//! Page-level configuration constants.

// Endpoints
pub const ORDER_ENDPOINT: &str = "/process_order/";
pub const GUESTS_ENDPOINT: &str = "/calculate_games/";

// UI Behavior
pub const DEBOUNCE_MS: u32 = 300;

// Mount points rendered by the server templates
pub const ORDER_ROOT_ID: &str = "order-app";
pub const GUEST_ROOT_ID: &str = "guest-app";
pub const NEWS_GALLERY_ROOT_ID: &str = "news-gallery-app";
pub const PRODUCT_GALLERY_ROOT_ID: &str = "product-gallery-app";
pub const CATALOG_CSV_ID: &str = "order-catalog";

// Selectors of server-rendered elements the widgets attach to
pub const ORDER_OPENER_SELECTOR: &str = "[data-open-order]";
pub const NEWS_BUTTON_SELECTOR: &str = ".news-card-button";
pub const PRODUCT_IMAGE_SELECTOR: &str = ".product_detail_image, .additional_images";
pub const PRODUCT_OPENER_SELECTOR: &str = "[data-open-gallery]";
pub const BURGER_SELECTOR: &str = ".burger";
pub const NAV_MENU_SELECTOR: &str = ".nav-menu";
pub const INFO_BUTTON_SELECTOR: &str = "[data-info-target]";
pub const INFO_BLOCK_SELECTOR: &str = ".info-block";
pub const CSRF_INPUT_SELECTOR: &str = "input[name=csrfmiddlewaretoken]";

// Guest slider limits
pub const GUEST_SLIDER_MIN: u32 = 1;
pub const GUEST_SLIDER_MAX: u32 = 30;
pub const DEFAULT_GUESTS: u32 = 2;

// Labels
pub const SUBMIT_LABEL: &str = "Оформить заказ";
pub const SUBMIT_BUSY_LABEL: &str = "Отправка...";
