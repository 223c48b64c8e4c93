//! State and rendering of the simulated store.
//!
//! The page is re-rendered on every query as a flat list of [`Element`]s,
//! each keyed by the selector the screen objects use for it. Clicking an
//! element runs the [`Action`] attached at render time, so presence and
//! behavior come from one place.

use crate::catalog::{alerts, Product, PRODUCTS};
use crate::dialog::Dialog;
use crate::driver::ElementState;
use crate::locator::{Locator, Selector};
use crate::screen::{
    cart, home, CartLocators, ContactLocators, HomeLocators, NavLocators, OrderLocators,
    ProductLocators,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::time::Instant;

/// Document currently loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// `about:blank`
    Blank,
    /// index.html
    Home,
    /// prod.html for one product
    Product(&'static Product),
    /// cart.html
    Cart,
}

/// Bootstrap modal currently shown over the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// "New message"
    Contact,
    /// "Place order"
    Order,
}

/// Form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Contact email
    ContactEmail,
    /// Contact name
    ContactName,
    /// Contact message
    ContactMessage,
    /// Order name
    OrderName,
    /// Order country
    OrderCountry,
    /// Order city
    OrderCity,
    /// Order credit card
    OrderCard,
    /// Order month
    OrderMonth,
    /// Order year
    OrderYear,
}

/// What a click on an element does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing observable
    Inert,
    /// Load index.html
    GoHome,
    /// Load cart.html
    OpenCart,
    /// Load a product page
    OpenProduct(&'static Product),
    /// Show the contact modal
    OpenContact,
    /// Add to cart, then alert
    AddToCart(&'static Product),
    /// Remove one cart line
    DeleteLine(u32),
    /// Show the order modal
    PlaceOrder,
    /// Submit the order form
    Purchase,
    /// Hide the order modal
    CloseOrder,
    /// OK on the purchase confirmation
    ConfirmPurchase,
    /// Submit the contact form
    SendMessage,
    /// Hide the contact modal
    CloseContact,
}

/// Stacking layer; a click on a lower layer is intercepted by a higher one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    /// Page body
    Page,
    /// Bootstrap modal
    Modal,
    /// Purchase confirmation
    Confirmation,
}

/// One rendered element
#[derive(Debug, Clone)]
pub struct Element {
    /// Selector the element answers to
    pub selector: Selector,
    /// Text, or current value for inputs
    pub text: String,
    /// Rendered and shown
    pub visible: bool,
    /// Stacking layer
    pub layer: Layer,
    /// Click behavior
    pub action: Action,
    /// Input bound to this element
    pub field: Option<Field>,
}

/// Render and alert latencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay before a new page or modal is shown
    pub render_delay: Duration,
    /// Delay before a triggered dialog opens
    pub alert_delay: Duration,
    /// Extra delay before cart rows and total load after the cart page shows
    pub cart_load_delay: Duration,
}

#[derive(Debug, Clone)]
struct CartLine {
    id: u32,
    product: &'static Product,
}

#[derive(Debug, Clone)]
struct Receipt {
    id: u32,
    amount: u32,
    card: String,
    name: String,
    date: String,
}

#[derive(Debug, Clone)]
enum Effect {
    AddLine(&'static Product),
    RemoveLine(u32),
    OpenDialog(String),
}

/// Mutable state of the simulated store
#[derive(Debug)]
pub struct Site {
    origin: String,
    timing: Timing,
    page: Page,
    modal: Option<Modal>,
    receipt: Option<Receipt>,
    cart: Vec<CartLine>,
    next_line: u32,
    next_order: u32,
    fields: HashMap<Field, String>,
    dialog: Option<Dialog>,
    scheduled: Vec<(Instant, Effect)>,
    page_ready_at: Instant,
    overlay_ready_at: Instant,
    cart_ready_at: Instant,
    suppress_alerts: bool,
    added_alert_text: String,
    missing: Vec<Selector>,
}

impl Site {
    /// A blank tab
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        let now = Instant::now();
        Self {
            origin: "https://www.demoblaze.com".to_string(),
            timing,
            page: Page::Blank,
            modal: None,
            receipt: None,
            cart: Vec::new(),
            next_line: 1,
            next_order: 1,
            fields: HashMap::new(),
            dialog: None,
            scheduled: Vec::new(),
            page_ready_at: now,
            overlay_ready_at: now,
            cart_ready_at: now,
            suppress_alerts: false,
            added_alert_text: format!("{}.", alerts::PRODUCT_ADDED),
            missing: Vec::new(),
        }
    }

    /// Never open native dialogs
    pub fn suppress_alerts(&mut self) {
        self.suppress_alerts = true;
    }

    /// Text of the dialog shown after "Add to cart"
    pub fn set_added_alert_text(&mut self, text: impl Into<String>) {
        self.added_alert_text = text.into();
    }

    /// Never render elements answering to `selector`
    pub fn remove_element(&mut self, selector: Selector) {
        self.missing.push(selector);
    }

    /// Current page
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// Current modal
    #[must_use]
    pub const fn modal(&self) -> Option<Modal> {
        self.modal
    }

    /// Product names in the cart, in row order
    #[must_use]
    pub fn cart_names(&self) -> Vec<&'static str> {
        self.cart.iter().map(|l| l.product.name).collect()
    }

    /// Apply every scheduled effect that is due
    pub fn tick(&mut self, now: Instant) {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|(at, _)| *at <= now);
        self.scheduled = later;
        for (_, effect) in due {
            match effect {
                Effect::AddLine(product) => {
                    let id = self.next_line;
                    self.next_line += 1;
                    self.cart.push(CartLine { id, product });
                }
                Effect::RemoveLine(id) => self.cart.retain(|l| l.id != id),
                Effect::OpenDialog(text) => {
                    if self.dialog.is_none() {
                        self.dialog = Some(Dialog::alert(text));
                    }
                }
            }
        }
    }

    /// Load a URL of the store
    pub fn navigate(&mut self, url: &str, now: Instant) {
        if let Some((origin, _)) = url.rsplit_once('/') {
            if origin.starts_with("http") && origin.matches('/').count() >= 2 {
                self.origin = origin.to_string();
            }
        }
        let page = if url == "about:blank" {
            Page::Blank
        } else if url.contains("cart.html") {
            Page::Cart
        } else if let Some(idx) = url.split("idp_=").nth(1) {
            idx.parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| PRODUCTS.get(i))
                .map_or(Page::Home, Page::Product)
        } else {
            Page::Home
        };
        self.goto(page, now);
    }

    /// URL of the current page
    #[must_use]
    pub fn url(&self) -> String {
        match self.page {
            Page::Blank => "about:blank".to_string(),
            Page::Home => format!("{}/index.html", self.origin),
            Page::Cart => format!("{}/cart.html", self.origin),
            Page::Product(p) => {
                let idx = PRODUCTS.iter().position(|q| q.name == p.name).unwrap_or(0) + 1;
                format!("{}/prod.html?idp_={idx}", self.origin)
            }
        }
    }

    /// Open native dialog
    #[must_use]
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Close the open dialog
    pub fn accept_dialog(&mut self) -> Result<Dialog, String> {
        self.dialog
            .take()
            .ok_or_else(|| "no dialog is open".to_string())
    }

    /// First element answering to `selector`
    #[must_use]
    pub fn find(&self, selector: &Selector, now: Instant) -> Option<ElementState> {
        self.render(now)
            .into_iter()
            .find(|e| &e.selector == selector)
            .map(|e| ElementState {
                visible: e.visible,
                text: e.text,
            })
    }

    /// Click the first element answering to `selector`
    pub fn click(&mut self, selector: &Selector, now: Instant) -> Result<(), String> {
        let element = self.interactable(selector, now)?;
        self.apply(element.action, now);
        Ok(())
    }

    /// Set the value of the input answering to `selector`
    pub fn set_value(&mut self, selector: &Selector, value: &str, now: Instant) -> Result<(), String> {
        let element = self.interactable(selector, now)?;
        let field = element
            .field
            .ok_or_else(|| format!("element {selector} is not an input"))?;
        self.fields.insert(field, value.to_string());
        Ok(())
    }

    fn interactable(&self, selector: &Selector, now: Instant) -> Result<Element, String> {
        let rendered = self.render(now);
        let top = rendered
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.layer)
            .max()
            .unwrap_or(Layer::Page);
        let element = rendered
            .into_iter()
            .find(|e| &e.selector == selector)
            .ok_or_else(|| format!("no such element: {selector}"))?;
        if !element.visible {
            return Err(format!("element not interactable: {selector}"));
        }
        if element.layer < top {
            return Err(format!("element click intercepted: {selector}"));
        }
        Ok(element)
    }

    fn goto(&mut self, page: Page, now: Instant) {
        self.page = page;
        self.modal = None;
        self.receipt = None;
        self.page_ready_at = now + self.timing.render_delay;
        self.cart_ready_at = self.page_ready_at + self.timing.cart_load_delay;
    }

    fn show_modal(&mut self, modal: Modal, now: Instant) {
        self.modal = Some(modal);
        self.overlay_ready_at = now + self.timing.render_delay;
    }

    fn schedule_dialog(&mut self, text: impl Into<String>, now: Instant) {
        if !self.suppress_alerts {
            self.scheduled
                .push((now + self.timing.alert_delay, Effect::OpenDialog(text.into())));
        }
    }

    fn field(&self, field: Field) -> &str {
        self.fields.get(&field).map_or("", String::as_str)
    }

    fn cart_total(&self) -> u32 {
        self.cart.iter().map(|l| l.product.amount()).sum()
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Inert => {}
            Action::GoHome | Action::ConfirmPurchase => self.goto(Page::Home, now),
            Action::OpenCart => self.goto(Page::Cart, now),
            Action::OpenProduct(p) => self.goto(Page::Product(p), now),
            Action::OpenContact => self.show_modal(Modal::Contact, now),
            Action::PlaceOrder => self.show_modal(Modal::Order, now),
            Action::AddToCart(p) => {
                let at = now + self.timing.alert_delay;
                self.scheduled.push((at, Effect::AddLine(p)));
                let text = self.added_alert_text.clone();
                self.schedule_dialog(text, now);
            }
            Action::DeleteLine(id) => {
                let at = now + self.timing.render_delay;
                self.scheduled.push((at, Effect::RemoveLine(id)));
            }
            Action::Purchase => self.purchase(now),
            Action::CloseOrder => {
                self.modal = None;
                self.receipt = None;
            }
            Action::SendMessage => self.send_message(now),
            Action::CloseContact => self.modal = None,
        }
    }

    fn purchase(&mut self, now: Instant) {
        if self.field(Field::OrderName).is_empty() || self.field(Field::OrderCard).is_empty() {
            self.schedule_dialog(alerts::FILL_OUT_ORDER, now);
            return;
        }
        let receipt = Receipt {
            id: self.next_order,
            amount: self.cart_total(),
            card: self.field(Field::OrderCard).to_string(),
            name: self.field(Field::OrderName).to_string(),
            date: chrono::Local::now().format("%-d/%-m/%Y").to_string(),
        };
        self.next_order += 1;
        self.receipt = Some(receipt);
        self.cart.clear();
        self.overlay_ready_at = now + self.timing.render_delay;
    }

    fn send_message(&mut self, now: Instant) {
        let text = if self.field(Field::ContactEmail).is_empty() {
            alerts::FILL_OUT_EMAIL
        } else if self.field(Field::ContactName).is_empty() {
            alerts::FILL_OUT_NAME
        } else if self.field(Field::ContactMessage).is_empty() {
            alerts::FILL_OUT_MESSAGE
        } else {
            self.modal = None;
            for f in [Field::ContactEmail, Field::ContactName, Field::ContactMessage] {
                self.fields.remove(&f);
            }
            alerts::MESSAGE_SENT
        };
        self.schedule_dialog(text, now);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Every element of the current document
    #[must_use]
    pub fn render(&self, now: Instant) -> Vec<Element> {
        let mut out = Renderer {
            out: Vec::new(),
            page_visible: now >= self.page_ready_at,
            overlay_visible: now >= self.overlay_ready_at,
        };
        let cart_loaded = now >= self.cart_ready_at;
        if self.page != Page::Blank {
            self.render_nav(&mut out);
        }
        match self.page {
            Page::Blank => {}
            Page::Home => self.render_home(&mut out),
            Page::Product(p) => self.render_product(&mut out, p),
            Page::Cart => self.render_cart(&mut out, cart_loaded),
        }
        match self.modal {
            Some(Modal::Contact) => self.render_contact(&mut out),
            Some(Modal::Order) => self.render_order(&mut out),
            None => {}
        }
        if let Some(receipt) = &self.receipt {
            self.render_receipt(&mut out, receipt);
        }
        out.out
            .into_iter()
            .filter(|e| !self.missing.contains(&e.selector))
            .collect()
    }

    fn render_nav(&self, r: &mut Renderer) {
        let nav = NavLocators::new();
        r.page(&nav.brand, "PRODUCT STORE", Action::GoHome);
        r.page(&nav.home, "Home (current)", Action::GoHome);
        r.page(&nav.contact, "Contact", Action::OpenContact);
        r.page(&nav.about, "About us", Action::Inert);
        r.page(&nav.cart, "Cart", Action::OpenCart);
        r.page(&nav.log_in, "Log in", Action::Inert);
        r.page(&nav.sign_up, "Sign up", Action::Inert);
    }

    fn render_home(&self, r: &mut Renderer) {
        let l = HomeLocators::new();
        r.page(&l.categories, "CATEGORIES", Action::Inert);
        r.page(&l.phones, "Phones", Action::Inert);
        r.page(&l.laptops, "Laptops", Action::Inert);
        r.page(&l.monitors, "Monitors", Action::Inert);
        r.page(&l.carousel_prev, "Previous", Action::Inert);
        r.page(&l.carousel_next, "Next", Action::Inert);
        for product in &PRODUCTS {
            r.page(&home::PRODUCT_LINK.bind(product.name), product.name, Action::OpenProduct(product));
            r.page(&home::PRODUCT_PRICE.bind(product.list_price), product.list_price, Action::Inert);
            r.page(
                &home::PRODUCT_DESCRIPTION.bind(product.description_fragment),
                &description(product),
                Action::Inert,
            );
        }
        r.page(&l.page_prev, "Previous", Action::Inert);
        r.page(&l.page_next, "Next", Action::Inert);
        r.page(&l.copyright, "Copyright © Product Store 2017", Action::Inert);
        r.page(&l.about_us_heading, "About Us", Action::Inert);
        r.page(&l.get_in_touch_heading, "Get in Touch", Action::Inert);
    }

    fn render_product(&self, r: &mut Renderer, product: &'static Product) {
        let l = ProductLocators::new();
        r.page(&l.name, product.name, Action::Inert);
        r.page(&l.price, product.price_with_tax, Action::Inert);
        r.page(&l.image, "", Action::Inert);
        r.page(&l.description, &description(product), Action::Inert);
        r.page(&l.add_to_cart, "Add to cart", Action::AddToCart(product));
    }

    fn render_cart(&self, r: &mut Renderer, loaded: bool) {
        let l = CartLocators::new();
        r.page(&l.products_heading, "Products", Action::Inert);
        r.page(&l.pic_header, "Pic", Action::Inert);
        r.page(&l.title_header, "Title", Action::Inert);
        r.page(&l.price_header, "Price", Action::Inert);
        r.page(&l.delete_header, "x", Action::Inert);
        let lines: &[CartLine] = if loaded { &self.cart } else { &[] };
        for (idx, line) in lines.iter().enumerate() {
            let p = line.product;
            r.page(&cart::PRODUCT_CELL.bind(p.name), p.name, Action::Inert);
            r.page(&cart::PRICE_CELL.bind(p.cart_price()), p.cart_price(), Action::Inert);
            r.page(&cart::DELETE_BY_PRODUCT.bind(p.name), "Delete", Action::DeleteLine(line.id));
            r.page(&cart::DELETE_AT.bind(idx + 1), "Delete", Action::DeleteLine(line.id));
        }
        r.page(&l.total_heading, "Total", Action::Inert);
        let total = if lines.is_empty() {
            String::new()
        } else {
            self.cart_total().to_string()
        };
        r.page(&l.total_amount, &total, Action::Inert);
        r.page(&l.place_order, "Place Order", Action::PlaceOrder);
    }

    fn render_contact(&self, r: &mut Renderer) {
        let l = ContactLocators::new();
        r.overlay(Layer::Modal, &l.title, "New message", Action::Inert, None);
        r.input(&l.email, self.field(Field::ContactEmail), Field::ContactEmail);
        r.input(&l.name, self.field(Field::ContactName), Field::ContactName);
        r.input(&l.message, self.field(Field::ContactMessage), Field::ContactMessage);
        r.overlay(Layer::Modal, &l.close, "Close", Action::CloseContact, None);
        r.overlay(Layer::Modal, &l.send, "Send message", Action::SendMessage, None);
    }

    fn render_order(&self, r: &mut Renderer) {
        let l = OrderLocators::new();
        r.overlay(Layer::Modal, &l.title, "Place order", Action::Inert, None);
        let total = format!("Total: {}", self.cart_total());
        r.overlay(Layer::Modal, &l.total, &total, Action::Inert, None);
        r.input(&l.name, self.field(Field::OrderName), Field::OrderName);
        r.input(&l.country, self.field(Field::OrderCountry), Field::OrderCountry);
        r.input(&l.city, self.field(Field::OrderCity), Field::OrderCity);
        r.input(&l.card, self.field(Field::OrderCard), Field::OrderCard);
        r.input(&l.month, self.field(Field::OrderMonth), Field::OrderMonth);
        r.input(&l.year, self.field(Field::OrderYear), Field::OrderYear);
        r.overlay(Layer::Modal, &l.close, "Close", Action::CloseOrder, None);
        r.overlay(Layer::Modal, &l.purchase, "Purchase", Action::Purchase, None);
    }

    fn render_receipt(&self, r: &mut Renderer, receipt: &Receipt) {
        let l = OrderLocators::new();
        let details = format!(
            "Id: {}\nAmount: {} USD\nCard Number: {}\nName: {}\nDate: {}",
            receipt.id, receipt.amount, receipt.card, receipt.name, receipt.date
        );
        r.overlay(
            Layer::Confirmation,
            &l.confirmation_heading,
            alerts::PURCHASE_THANK_YOU,
            Action::Inert,
            None,
        );
        r.overlay(Layer::Confirmation, &l.confirmation_details, &details, Action::Inert, None);
        r.overlay(Layer::Confirmation, &l.confirm, "OK", Action::ConfirmPurchase, None);
    }

    /// Serialized document, one line per element
    #[must_use]
    pub fn source(&self, now: Instant) -> String {
        let mut html = format!("<html data-url=\"{}\">\n<body>\n", self.url());
        for e in self.render(now) {
            let _ = writeln!(
                html,
                "  <div data-selector=\"{}\" data-visible=\"{}\">{}</div>",
                e.selector, e.visible, e.text
            );
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn description(product: &Product) -> String {
    format!("{} a flagship with a bright display and all-day battery.", product.description_fragment)
}

struct Renderer {
    out: Vec<Element>,
    page_visible: bool,
    overlay_visible: bool,
}

impl Renderer {
    fn page(&mut self, locator: &Locator, text: &str, action: Action) {
        self.out.push(Element {
            selector: locator.selector().clone(),
            text: text.to_string(),
            visible: self.page_visible,
            layer: Layer::Page,
            action,
            field: None,
        });
    }

    fn overlay(&mut self, layer: Layer, locator: &Locator, text: &str, action: Action, field: Option<Field>) {
        self.out.push(Element {
            selector: locator.selector().clone(),
            text: text.to_string(),
            visible: self.overlay_visible,
            layer,
            action,
            field,
        });
    }

    fn input(&mut self, locator: &Locator, value: &str, field: Field) {
        self.overlay(Layer::Modal, locator, value, Action::Inert, Some(field));
    }
}
