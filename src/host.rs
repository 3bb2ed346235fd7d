//! Browser host: the only module that touches the DOM.
//!
//! ARCHITECTURE
//! ============
//! [`Viewer`] builds the overlay nodes, forwards DOM events to
//! [`OverlayCore`], and applies the returned [`Action`]s. Image discovery
//! goes through [`DomImages`], the DOM implementation of [`ImageHost`].
//! Everything lives on the UI thread behind `Rc<RefCell<..>>`; borrows are
//! never held across an `apply` call, so timer and event callbacks can
//! re-enter freely.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent,
    MutationObserver, MutationObserverInit, MutationRecord, PointerEvent, WheelEvent,
};

use crate::attach::{self, BoundImageRegistry, ImageHost, ImageKey};
use crate::config::{RescanMode, ViewerConfig};
use crate::consts::{
    BODY_OPEN_CLASS, BOUND_ATTRIBUTE, CONTAINER_CLASS, FADE_IN_CLASS, FADE_OUT_CLASS, IMAGE_CLASS, OVERLAY_CLASS,
};
use crate::error::ViewerError;
use crate::input::Key;
use crate::overlay::{ActiveImage, Action, Cue, HideToken, OverlayCore};
use crate::transform::{Point, Rect};

type SharedRef = Rc<RefCell<Shared>>;

/// The overlay's own nodes.
struct Dom {
    body: HtmlElement,
    overlay: HtmlElement,
    container: HtmlElement,
    image: HtmlImageElement,
}

struct Shared {
    core: OverlayCore,
    dom: Dom,
    /// At most one hide is pending: `close` is a no-op while closing and
    /// `open` cancels.
    pending_hide: Option<(HideToken, Timeout)>,
}

// =============================================================
// Listener
// =============================================================

/// An event listener that unregisters itself on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, callback: impl FnMut(Event) + 'static) -> Result<Self, ViewerError> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|err| ViewerError::dom(&err))?;
        Ok(Self { target: target.clone(), kind, callback })
    }

    /// Like [`Listener::attach`] but non-passive, so the handler may call
    /// `preventDefault` on scroll-type events.
    fn attach_active(
        target: &EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, ViewerError> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| ViewerError::dom(&err))?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("removing {} listener failed: {err:?}", self.kind);
        }
    }
}

// =============================================================
// Action application
// =============================================================

fn apply(shared: &SharedRef, actions: Vec<Action>) {
    for action in actions {
        if let Err(err) = apply_one(shared, &action) {
            log::warn!("{action:?} failed: {err:?}");
        }
    }
}

fn apply_one(shared: &SharedRef, action: &Action) -> Result<(), JsValue> {
    match action {
        Action::ScheduleHide { token, delay_ms } => {
            let weak = Rc::downgrade(shared);
            let token = *token;
            let timeout = Timeout::new(*delay_ms, move || {
                if let Some(shared) = weak.upgrade() {
                    let actions = shared.borrow_mut().core.hide_elapsed(token);
                    apply(&shared, actions);
                }
            });
            // Replacing a fired timeout drops it outside its own callback.
            shared.borrow_mut().pending_hide = Some((token, timeout));
            Ok(())
        }
        Action::CancelHide(token) => {
            let mut state = shared.borrow_mut();
            if state.pending_hide.as_ref().is_some_and(|(pending, _)| pending == token) {
                state.pending_hide = None;
            }
            Ok(())
        }
        _ => apply_dom(&shared.borrow().dom, action),
    }
}

fn apply_dom(dom: &Dom, action: &Action) -> Result<(), JsValue> {
    match action {
        Action::ShowImage(image) => {
            dom.image.set_src(&image.src);
            dom.image.set_alt(&image.alt);
            Ok(())
        }
        Action::SetDisplayed(displayed) => dom
            .overlay
            .style()
            .set_property("display", if *displayed { "flex" } else { "none" }),
        Action::SetAriaHidden(hidden) => dom.overlay.set_attribute("aria-hidden", if *hidden { "true" } else { "false" }),
        Action::SetScrollLock(true) => dom.body.class_list().add_1(BODY_OPEN_CLASS),
        Action::SetScrollLock(false) => dom.body.class_list().remove_1(BODY_OPEN_CLASS),
        Action::SetCue(cue) => {
            let (on, off) = match cue {
                Cue::FadeIn => (FADE_IN_CLASS, FADE_OUT_CLASS),
                Cue::FadeOut => (FADE_OUT_CLASS, FADE_IN_CLASS),
            };
            let classes = dom.overlay.class_list();
            classes.remove_1(off)?;
            classes.add_1(on)
        }
        Action::FitImage { max_height_vh } => {
            let style = dom.image.style();
            style.set_property("max-height", &format!("{max_height_vh}vh"))?;
            style.set_property("max-width", "100%")?;
            style.set_property("width", "auto")?;
            style.set_property("height", "auto")?;
            style.set_property("transform-origin", "50% 50%")
        }
        Action::ApplyTransform(css) => dom.container.style().set_property("transform", css),
        Action::SetCursor(cursor) => dom.container.style().set_property("cursor", cursor.css()),
        Action::ScheduleHide { .. } | Action::CancelHide(_) => Ok(()),
    }
}

fn open_image(shared: &SharedRef, image: &HtmlImageElement) {
    let active = ActiveImage::new(image.src(), image.alt());
    let actions = shared.borrow_mut().core.open(active);
    apply(shared, actions);
    shared.borrow_mut().core.presented();
}

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

// =============================================================
// DOM construction
// =============================================================

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, ViewerError> {
    document
        .create_element(tag)
        .map_err(|err| ViewerError::dom(&err))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| ViewerError::Dom(format!("<{tag}> is not an HtmlElement")))
}

fn build_dom(document: &Document) -> Result<Dom, ViewerError> {
    let body = document.body().ok_or(ViewerError::NoBody)?;
    let dom_err = |err: JsValue| ViewerError::dom(&err);

    let overlay = create_html(document, "div")?;
    overlay.set_class_name(OVERLAY_CLASS);
    overlay.style().set_property("display", "none").map_err(dom_err)?;
    overlay.set_attribute("role", "dialog").map_err(dom_err)?;
    overlay.set_attribute("aria-hidden", "true").map_err(dom_err)?;

    let container = create_html(document, "div")?;
    container.set_class_name(CONTAINER_CLASS);
    let style = container.style();
    style.set_property("touch-action", "none").map_err(dom_err)?;
    style.set_property("user-select", "none").map_err(dom_err)?;

    let image = create_html(document, "img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| ViewerError::Dom("<img> is not an HtmlImageElement".to_owned()))?;
    image.set_class_name(IMAGE_CLASS);
    image.set_alt("");

    container.append_child(&image).map_err(dom_err)?;
    overlay.append_child(&container).map_err(dom_err)?;
    body.append_child(&overlay).map_err(dom_err)?;

    Ok(Dom { body, overlay, container, image })
}

// =============================================================
// Image discovery
// =============================================================

/// [`ImageHost`] over the live document.
struct DomImages {
    document: Document,
    container_selector: String,
    image_selector: String,
    next_key: u64,
    shared: Weak<RefCell<Shared>>,
    /// Click triggers, one per bound image.
    bindings: Vec<(HtmlImageElement, Listener)>,
}

impl DomImages {
    /// Undo every binding: listeners, keys and cursors.
    fn unbind_all(&mut self) {
        for (image, listener) in self.bindings.drain(..) {
            drop(listener);
            if let Err(err) = image.remove_attribute(BOUND_ATTRIBUTE) {
                log::warn!("clearing image key failed: {err:?}");
            }
            if let Err(err) = image.style().remove_property("cursor") {
                log::warn!("clearing image cursor failed: {err:?}");
            }
        }
    }
}

impl ImageHost for DomImages {
    type Image = HtmlImageElement;

    fn eligible_images(&self) -> Vec<HtmlImageElement> {
        let containers = match self.document.query_selector_all(&self.container_selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("container selector {:?} rejected: {err:?}", self.container_selector);
                return Vec::new();
            }
        };
        let mut images = Vec::new();
        for i in 0..containers.length() {
            let Some(container) = containers.get(i).and_then(|n| n.dyn_ref::<Element>().cloned()) else {
                continue;
            };
            match container.query_selector_all(&self.image_selector) {
                Ok(found) => {
                    images.extend(
                        (0..found.length())
                            .filter_map(|j| found.get(j))
                            .filter_map(|n| n.dyn_ref::<HtmlImageElement>().cloned()),
                    );
                }
                Err(err) => {
                    log::warn!("image selector {:?} rejected: {err:?}", self.image_selector);
                    return Vec::new();
                }
            }
        }
        images
    }

    fn key_of(&mut self, image: &HtmlImageElement) -> ImageKey {
        if let Some(Ok(key)) = image.get_attribute(BOUND_ATTRIBUTE).map(|v| v.parse::<u64>()) {
            return ImageKey(key);
        }
        self.next_key += 1;
        let key = self.next_key;
        if let Err(err) = image.set_attribute(BOUND_ATTRIBUTE, &key.to_string()) {
            log::warn!("stamping image key failed: {err:?}");
        }
        ImageKey(key)
    }

    fn bind(&mut self, image: &HtmlImageElement) {
        if let Err(err) = image.style().set_property("cursor", "zoom-in") {
            log::warn!("setting zoom-in cursor failed: {err:?}");
        }
        let shared = self.shared.clone();
        let source = image.clone();
        match Listener::attach(image, "click", move |_event: Event| {
            if let Some(shared) = shared.upgrade() {
                open_image(&shared, &source);
            }
        }) {
            Ok(listener) => self.bindings.push((image.clone(), listener)),
            Err(err) => log::warn!("binding image click failed: {err}"),
        }
    }
}

fn scan(images: &Rc<RefCell<DomImages>>, registry: &Rc<RefCell<BoundImageRegistry>>) -> usize {
    attach::scan(&mut registry.borrow_mut(), &mut *images.borrow_mut())
}

/// The active rescan strategy. Dropping it stops rescanning.
enum Rescan {
    Mutation {
        observer: MutationObserver,
        _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    },
    Poll(Interval),
}

impl Rescan {
    fn start(
        mode: RescanMode,
        body: &HtmlElement,
        images: &Rc<RefCell<DomImages>>,
        registry: &Rc<RefCell<BoundImageRegistry>>,
    ) -> Result<Self, ViewerError> {
        let images = Rc::clone(images);
        let registry = Rc::clone(registry);
        match mode {
            RescanMode::Mutation => {
                let callback = Closure::wrap(Box::new(move |records: js_sys::Array, _observer: MutationObserver| {
                    let added = records
                        .iter()
                        .filter_map(|r| r.dyn_ref::<MutationRecord>().map(|m| m.added_nodes().length()));
                    if attach::should_rescan(added) {
                        scan(&images, &registry);
                    }
                })
                    as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
                let observer =
                    MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(|err| ViewerError::dom(&err))?;
                let init = MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                observer.observe_with_options(body, &init).map_err(|err| ViewerError::dom(&err))?;
                Ok(Self::Mutation { observer, _callback: callback })
            }
            RescanMode::Poll { interval_ms } => Ok(Self::Poll(Interval::new(interval_ms, move || {
                scan(&images, &registry);
            }))),
        }
    }

    fn stop(self) {
        match self {
            Self::Mutation { observer, .. } => observer.disconnect(),
            Self::Poll(interval) => drop(interval),
        }
    }
}

// =============================================================
// Viewer
// =============================================================

/// An installed viewer. Owns the overlay, its listeners and the rescan
/// strategy; [`Viewer::destroy`] tears all of it down.
#[wasm_bindgen]
pub struct Viewer {
    shared: SharedRef,
    images: Rc<RefCell<DomImages>>,
    registry: Rc<RefCell<BoundImageRegistry>>,
    listeners: Vec<Listener>,
    rescan: Option<Rescan>,
}

impl Viewer {
    /// Build the overlay, bind listeners and start discovering images.
    ///
    /// # Errors
    ///
    /// Fails when there is no window/document/body or a DOM call is rejected.
    pub fn install(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
        let document = window.document().ok_or(ViewerError::NoDocument)?;
        let dom = build_dom(&document)?;
        let body = dom.body.clone();
        let overlay = dom.overlay.clone();
        let container = dom.container.clone();

        let shared: SharedRef =
            Rc::new(RefCell::new(Shared { core: OverlayCore::new(config), dom, pending_hide: None }));
        let images = Rc::new(RefCell::new(DomImages {
            document: document.clone(),
            container_selector: config.container_selector.clone(),
            image_selector: config.image_selector.clone(),
            next_key: 0,
            shared: Rc::downgrade(&shared),
            bindings: Vec::new(),
        }));
        let registry = Rc::new(RefCell::new(BoundImageRegistry::new()));

        let mut listeners = Vec::new();

        // Wheel zoom; page scroll is suppressed while the overlay is up.
        {
            let shared = Rc::clone(&shared);
            let container = container.clone();
            listeners.push(Listener::attach_active(&overlay, "wheel", move |event: Event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                if !shared.borrow().core.is_open() {
                    return;
                }
                wheel.prevent_default();
                let r = container.get_bounding_client_rect();
                let visual = Rect::new(r.left(), r.top(), r.width(), r.height());
                let actions = shared.borrow_mut().core.on_wheel(client_point(wheel), wheel.delta_y(), visual);
                apply(&shared, actions);
            })?);
        }

        // Drag starts on the image, continues and ends anywhere.
        {
            let shared = Rc::clone(&shared);
            listeners.push(Listener::attach(&container, "pointerdown", move |event: Event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let actions = shared.borrow_mut().core.on_pointer_down(client_point(pointer));
                if shared.borrow().core.transform().is_dragging() {
                    pointer.prevent_default();
                }
                apply(&shared, actions);
            })?);
        }
        {
            let shared = Rc::clone(&shared);
            listeners.push(Listener::attach(&window, "pointermove", move |event: Event| {
                let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let actions = shared.borrow_mut().core.on_pointer_move(client_point(pointer));
                apply(&shared, actions);
            })?);
        }
        {
            let shared = Rc::clone(&shared);
            listeners.push(Listener::attach(&window, "pointerup", move |_event: Event| {
                let actions = shared.borrow_mut().core.on_pointer_up();
                apply(&shared, actions);
            })?);
        }

        // Background click closes; clicks on the image stop here.
        {
            let shared = Rc::clone(&shared);
            let overlay_target: EventTarget = overlay.clone().into();
            listeners.push(Listener::attach(&overlay, "click", move |event: Event| {
                if event.target().as_ref() != Some(&overlay_target) {
                    return;
                }
                let actions = shared.borrow_mut().core.on_background_click();
                apply(&shared, actions);
            })?);
        }
        listeners.push(Listener::attach(&container, "click", |event: Event| event.stop_propagation())?);

        {
            let shared = Rc::clone(&shared);
            listeners.push(Listener::attach(&window, "keydown", move |event: Event| {
                let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let actions = shared.borrow_mut().core.on_key_down(&Key(keyboard.key()));
                apply(&shared, actions);
            })?);
        }

        // Initial scan once the document is parsed.
        if document.ready_state() == "loading" {
            let images = Rc::clone(&images);
            let registry = Rc::clone(&registry);
            listeners.push(Listener::attach(&document, "DOMContentLoaded", move |_event: Event| {
                scan(&images, &registry);
            })?);
        } else {
            scan(&images, &registry);
        }

        let rescan = Rescan::start(config.rescan, &body, &images, &registry)?;
        log::info!(
            "image viewer installed ({} bound, rescan {:?})",
            registry.borrow().len(),
            config.rescan
        );

        Ok(Self { shared, images, registry, listeners, rescan: Some(rescan) })
    }
}

#[wasm_bindgen]
impl Viewer {
    /// Scan for new images now. Returns how many were bound.
    pub fn rescan(&self) -> usize {
        scan(&self.images, &self.registry)
    }

    /// Close the overlay as if Escape had been pressed.
    pub fn close(&self) {
        let actions = self.shared.borrow_mut().core.close();
        apply(&self.shared, actions);
    }

    #[wasm_bindgen(js_name = isOpen)]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.borrow().core.is_open()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.shared.borrow().core.transform().scale
    }

    /// Remove the overlay, every listener and the rescan strategy.
    pub fn destroy(mut self) {
        if let Some(rescan) = self.rescan.take() {
            rescan.stop();
        }
        self.listeners.clear();
        self.images.borrow_mut().unbind_all();

        let mut shared = self.shared.borrow_mut();
        shared.pending_hide = None;
        shared.dom.overlay.remove();
        if let Err(err) = shared.dom.body.class_list().remove_1(BODY_OPEN_CLASS) {
            log::warn!("clearing body class failed: {err:?}");
        }
        log::info!("image viewer destroyed");
    }
}
