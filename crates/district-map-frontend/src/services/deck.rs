//! # deck.gl Bindings
//!
//! Thin wrapper over the page-global `deck` bundle. The session decides what
//! the layers look like; this module turns each [`LayerProps`] slot into a
//! `GeoJsonLayer` and routes engine callbacks back through [`MapEvents`].

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use district_map_domain::layer::{NAME_PROPERTY, NODE_TYPE_PROPERTY};
use district_map_domain::style::{building_color, node_fill_color};
use district_map_domain::{
    Basemap, FillRule, LayerId, LayerProps, MapError, MapSession, Result, Rgba, ViewState,
    Viewport,
};
use geojson::Feature;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::interop::{from_js, get, global, js_error, set, to_js};

#[wasm_bindgen]
extern "C" {
    /// `deck.DeckGL` instance
    #[wasm_bindgen(extends = js_sys::Object)]
    #[derive(Clone)]
    pub type Deck;

    #[wasm_bindgen(method, catch, js_name = setProps)]
    fn set_props(this: &Deck, props: &JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getMapboxMap)]
    fn basemap(this: &Deck) -> std::result::Result<BaseMap, JsValue>;

    /// Basemap renderer owned by the deck
    #[wasm_bindgen(extends = js_sys::Object)]
    pub type BaseMap;

    #[wasm_bindgen(method, catch, js_name = setStyle)]
    fn set_style(this: &BaseMap, style: &JsValue) -> std::result::Result<(), JsValue>;
}

type Callback = Closure<dyn FnMut(JsValue) -> JsValue>;

/// Feature picked under the cursor
#[derive(Debug, Clone)]
pub struct Pick {
    pub layer: LayerId,
    pub feature: Feature,
}

/// Receiver of the engine's interaction callbacks
pub trait MapEvents: Clone + 'static {
    fn view_state_changed(&self, view: ViewState);
    fn drag_started(&self, right_button: bool);
    fn hovered(&self, pick: Option<Pick>, x: f64, y: f64);
    fn clicked(&self, pick: Pick);
}

/// Whether the deck.gl bundle has been loaded by the page
pub fn is_available() -> bool {
    global("deck").is_some()
}

fn construct(class: &str, props: &JsValue) -> Result<JsValue> {
    let namespace = global("deck").ok_or_else(|| MapError::Js("deck.gl is not loaded".to_string()))?;
    let constructor: js_sys::Function = get(&namespace, class)
        .ok_or_else(|| MapError::Js(format!("deck.{class} is missing")))?
        .dyn_into()
        .map_err(js_error)?;
    js_sys::Reflect::construct(&constructor, &js_sys::Array::of1(props)).map_err(js_error)
}

fn color_value(color: Rgba) -> JsValue {
    color
        .to_array()
        .iter()
        .map(|channel| JsValue::from(*channel))
        .collect::<js_sys::Array>()
        .into()
}

fn feature_property(feature: &JsValue, key: &str) -> Option<JsValue> {
    get(feature, "properties").and_then(|properties| get(&properties, key))
}

fn controller(drag_rotate: bool) -> Result<JsValue> {
    let controller = js_sys::Object::new();
    set(&controller, "dragRotate", &JsValue::from_bool(drag_rotate))?;
    Ok(controller.into())
}

/// `setProps` update that moves the controlled camera
pub fn view_update(view: &JsValue) -> Result<JsValue> {
    let update = js_sys::Object::new();
    set(&update, "viewState", view)?;
    Ok(update.into())
}

fn pick(info: &JsValue) -> Option<Pick> {
    let object = get(info, "object")?;
    let layer_id = get(info, "layer")
        .and_then(|layer| get(&layer, "id"))
        .and_then(|id| id.as_string())?;

    let layer = match layer_id.parse::<LayerId>() {
        Ok(layer) => layer,
        Err(err) => {
            log::warn!("{err}");
            return None;
        }
    };

    match from_js::<Feature>(&object) {
        Ok(feature) => Some(Pick { layer, feature }),
        Err(err) => {
            log::warn!("Picked {layer} feature could not be decoded: {err}");
            None
        }
    }
}

fn cursor(info: &JsValue) -> (f64, f64) {
    let coordinate = |key| get(info, key).and_then(|v| v.as_f64()).unwrap_or_default();
    (coordinate("x"), coordinate("y"))
}

fn fill_callback(rule: FillRule, selected: Rc<RefCell<Option<String>>>) -> Callback {
    Closure::wrap(Box::new(move |feature: JsValue| {
        let color = match rule {
            FillRule::Constant { color } => Some(color),
            FillRule::BuildingName { base } => {
                let name = feature_property(&feature, NAME_PROPERTY).and_then(|v| v.as_string());
                Some(building_color(
                    base,
                    name.as_deref(),
                    selected.borrow().as_deref(),
                ))
            }
            FillRule::NodeType => {
                let node_type =
                    feature_property(&feature, NODE_TYPE_PROPERTY).and_then(|v| v.as_string());
                node_fill_color(node_type.as_deref())
            }
        };
        color.map_or(JsValue::UNDEFINED, color_value)
    }) as Box<dyn FnMut(JsValue) -> JsValue>)
}

fn elevation_callback(property: &'static str) -> Callback {
    Closure::wrap(Box::new(move |feature: JsValue| {
        feature_property(&feature, property).unwrap_or(JsValue::UNDEFINED)
    }) as Box<dyn FnMut(JsValue) -> JsValue>)
}

/// Live deck.gl map bound to one container element
pub struct DeckMap {
    deck: Deck,
    container_id: String,
    selected: Rc<RefCell<Option<String>>>,
    data: RefCell<HashMap<LayerId, JsValue>>,
    fills: RefCell<HashMap<FillRule, Callback>>,
    elevations: RefCell<HashMap<&'static str, Callback>>,
    on_hover: Callback,
    on_click: Callback,
    _on_view_state_change: Callback,
    _on_drag_start: Closure<dyn FnMut(JsValue, JsValue)>,
}

impl DeckMap {
    /// Create the deck inside `container_id` and draw the session's layers.
    pub fn new<E: MapEvents>(container_id: &str, session: &MapSession, events: E) -> Result<Self> {
        let on_hover = {
            let events = events.clone();
            Closure::wrap(Box::new(move |info: JsValue| {
                let (x, y) = cursor(&info);
                events.hovered(pick(&info), x, y);
                JsValue::UNDEFINED
            }) as Box<dyn FnMut(JsValue) -> JsValue>)
        };

        let on_click = {
            let events = events.clone();
            Closure::wrap(Box::new(move |info: JsValue| match pick(&info) {
                Some(pick) => {
                    events.clicked(pick);
                    JsValue::from_bool(true)
                }
                None => JsValue::from_bool(false),
            }) as Box<dyn FnMut(JsValue) -> JsValue>)
        };

        // Controlled camera: every reported view is pushed back to the deck.
        let handle: Rc<OnceCell<Deck>> = Rc::new(OnceCell::new());
        let on_view_state_change = {
            let events = events.clone();
            let handle = Rc::clone(&handle);
            Closure::wrap(Box::new(move |params: JsValue| {
                let Some(view) = get(&params, "viewState") else {
                    return JsValue::UNDEFINED;
                };
                if let Some(deck) = handle.get() {
                    let pushed = view_update(&view)
                        .and_then(|update| deck.set_props(&update).map_err(js_error));
                    if let Err(err) = pushed {
                        log::warn!("Camera follow failed: {err}");
                    }
                }
                match from_js::<ViewState>(&view) {
                    Ok(mut view) => {
                        view.transition_duration = None;
                        events.view_state_changed(view);
                    }
                    Err(err) => log::debug!("Ignoring view state: {err}"),
                }
                JsValue::UNDEFINED
            }) as Box<dyn FnMut(JsValue) -> JsValue>)
        };

        let on_drag_start = Closure::wrap(Box::new(move |_info: JsValue, event: JsValue| {
            let right_button = get(&event, "rightButton")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            events.drag_started(right_button);
        }) as Box<dyn FnMut(JsValue, JsValue)>);

        let props = js_sys::Object::new();
        set(&props, "container", &JsValue::from_str(container_id))?;
        set(&props, "mapStyle", &to_js(&session.basemap().style())?)?;
        set(&props, "viewState", &to_js(&session.view_state())?)?;
        set(&props, "controller", &controller(session.drag_rotate())?)?;
        set(&props, "layers", &js_sys::Array::new())?;
        set(&props, "onViewStateChange", on_view_state_change.as_ref())?;
        set(&props, "onDragStart", on_drag_start.as_ref())?;

        let deck: Deck = construct("DeckGL", &props)?.unchecked_into();
        let _ = handle.set(deck.clone());
        log::info!("Map created in #{container_id}");

        let map = Self {
            deck,
            container_id: container_id.to_string(),
            selected: Rc::new(RefCell::new(None)),
            data: RefCell::new(HashMap::new()),
            fills: RefCell::new(HashMap::new()),
            elevations: RefCell::new(HashMap::new()),
            on_hover,
            on_click,
            _on_view_state_change: on_view_state_change,
            _on_drag_start: on_drag_start,
        };
        map.render_layers(session)?;
        Ok(map)
    }

    /// Push the session's layer slots and controller settings to the deck.
    pub fn render_layers(&self, session: &MapSession) -> Result<()> {
        *self.selected.borrow_mut() = session.selected_building().map(str::to_string);

        let layers = js_sys::Array::new();
        for props in session.layers().ordered() {
            layers.push(&self.layer(session, props)?);
        }

        let update = js_sys::Object::new();
        set(&update, "layers", &layers)?;
        set(&update, "controller", &controller(session.drag_rotate())?)?;
        self.deck.set_props(&update).map_err(js_error)
    }

    /// Move the camera, animating when the view carries a transition.
    pub fn set_view(&self, view: ViewState) -> Result<()> {
        let update = view_update(&to_js(&view)?)?;
        self.deck.set_props(&update).map_err(js_error)
    }

    pub fn set_basemap(&self, basemap: Basemap) -> Result<()> {
        let map = self.deck.basemap().map_err(js_error)?;
        map.set_style(&to_js(&basemap.style())?).map_err(js_error)
    }

    /// Pixel size of the container
    pub fn viewport(&self) -> Result<Viewport> {
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(&self.container_id))
            .ok_or_else(|| MapError::Js(format!("#{} not found", self.container_id)))?;
        Ok(Viewport {
            width: f64::from(element.client_width()),
            height: f64::from(element.client_height()),
        })
    }

    /// Drop the converted payload of a layer whose data was replaced.
    pub fn forget_data(&self, id: LayerId) {
        self.data.borrow_mut().remove(&id);
    }

    fn layer(&self, session: &MapSession, props: &LayerProps) -> Result<JsValue> {
        let layer = to_js(props)?;
        if props.placeholder {
            return construct("GeoJsonLayer", &layer);
        }

        if let Some(data) = self.data(session, props.id)? {
            set(&layer, "data", &data)?;
        }
        if let Some(rule) = props.fill {
            let mut fills = self.fills.borrow_mut();
            let accessor = fills
                .entry(rule)
                .or_insert_with(|| fill_callback(rule, Rc::clone(&self.selected)));
            set(&layer, "getFillColor", accessor.as_ref())?;
        }
        if let Some(property) = props.elevation_property {
            let mut elevations = self.elevations.borrow_mut();
            let accessor = elevations
                .entry(property)
                .or_insert_with(|| elevation_callback(property));
            set(&layer, "getElevation", accessor.as_ref())?;
        }
        if let Some(trigger) = &props.update_trigger {
            let triggers = js_sys::Object::new();
            set(&triggers, "getFillColor", &JsValue::from_str(trigger))?;
            set(&layer, "updateTriggers", &triggers)?;
        }
        if props.pickable {
            set(&layer, "onHover", self.on_hover.as_ref())?;
            set(&layer, "onClick", self.on_click.as_ref())?;
        }

        construct("GeoJsonLayer", &layer)
    }

    fn data(&self, session: &MapSession, id: LayerId) -> Result<Option<JsValue>> {
        if let Some(data) = self.data.borrow().get(&id) {
            return Ok(Some(data.clone()));
        }
        let Some(collection) = session.layer_data(id) else {
            return Ok(None);
        };
        let data = to_js(collection)?;
        self.data.borrow_mut().insert(id, data.clone());
        Ok(Some(data))
    }
}
