//! # Map Session
//!
//! Transient state of one map panel: loaded GeoJSON, the z-ordered layer
//! configurations, extrusion, selection, camera and basemap. Every UI event
//! lands here and the engine is then re-synchronised from the result.

use geojson::FeatureCollection;

use crate::basemap::Basemap;
use crate::error::Result;
use crate::layer::{GeoJsonStore, LayerContext, LayerId, LayerOptions, LayerProps, LayerSet};
use crate::view::{
    BoundingBox, CameraTarget, EXTRUDED_PITCH_DEG, FIT_PADDING_PX, TRANSITION_MS, ViewState,
    Viewport, camera_for_bounds,
};

/// Controller state behind the map panel
#[derive(Debug, Clone)]
pub struct MapSession {
    store: GeoJsonStore,
    layers: LayerSet,
    extruded: bool,
    selected_building: Option<String>,
    view: ViewState,
    zone_bounds: BoundingBox,
    home: Option<CameraTarget>,
    basemap: Basemap,
}

impl MapSession {
    /// Start a session from the page payload. The zone is mandatory; the
    /// district is shown only when the scenario has one.
    pub fn new(zone: FeatureCollection, district: Option<FeatureCollection>) -> Result<Self> {
        let zone_bounds = BoundingBox::of_collection(LayerId::Zone, &zone)?;
        let (latitude, longitude) = zone_bounds.center();

        let mut session = Self {
            store: GeoJsonStore::new(),
            layers: LayerSet::new(),
            extruded: false,
            selected_building: None,
            view: ViewState::centered(latitude, longitude, 0.0),
            zone_bounds,
            home: None,
            basemap: Basemap::default(),
        };

        session.store.insert(LayerId::Zone, zone);
        session.rebuild(LayerId::Zone, LayerOptions::default());

        if let Some(district) = district {
            session.store.insert(LayerId::District, district);
            session.rebuild(LayerId::District, LayerOptions::default());
        }

        Ok(session)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn store(&self) -> &GeoJsonStore {
        &self.store
    }

    pub fn layer_data(&self, id: LayerId) -> Option<&FeatureCollection> {
        self.store.get(id)
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn is_extruded(&self) -> bool {
        self.extruded
    }

    /// Free rotation is only allowed in 3D.
    pub fn drag_rotate(&self) -> bool {
        self.extruded
    }

    pub fn selected_building(&self) -> Option<&str> {
        self.selected_building.as_deref()
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    /// A layer's checkbox is shown once its data is present.
    pub fn checkbox_visible(&self, id: LayerId) -> bool {
        self.store.contains(id)
    }

    pub fn is_layer_visible(&self, id: LayerId) -> bool {
        self.layers.get(id).visible
    }

    // -------------------------------------------------------------------------
    // Layers
    // -------------------------------------------------------------------------

    fn rebuild(&mut self, id: LayerId, options: LayerOptions) {
        if !self.store.contains(id) {
            let mut placeholder = LayerProps::placeholder(id);
            placeholder.visible = options.visible.unwrap_or(placeholder.visible);
            self.layers.upsert(placeholder);
            return;
        }

        let ctx = LayerContext {
            extruded: self.extruded,
            selected_building: self.selected_building.as_deref(),
        };
        let props = LayerProps::build(id, &ctx, &options);
        self.layers.upsert(props);
    }

    /// Rebuild a layer keeping whatever visibility the user chose.
    fn refresh(&mut self, id: LayerId) {
        let visible = self.layers.get(id).visible;
        self.rebuild(id, LayerOptions::visible(visible));
    }

    fn refresh_buildings(&mut self) {
        self.refresh(LayerId::Zone);
        self.refresh(LayerId::District);
    }

    /// Show or hide exactly one layer.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) {
        log::debug!("layer {id} visible={visible}");
        self.rebuild(id, LayerOptions::visible(visible));
    }

    /// Store a fetched payload and show its layer.
    pub fn insert_remote(&mut self, id: LayerId, collection: FeatureCollection) {
        log::debug!(
            "layer {id} loaded with {} features",
            collection.features.len()
        );
        self.store.insert(id, collection);
        self.rebuild(id, LayerOptions::visible(true));
    }

    /// A fetch failure only gets logged; the layer stays an empty slot.
    pub fn remote_failed(&self, id: LayerId, reason: &str) {
        log::warn!("Get {id} failed: {reason}");
    }

    /// Highlight the named building in both building layers.
    pub fn select_building(&mut self, name: impl Into<String>) {
        let name = name.into();
        log::debug!("selected building {name}");
        self.selected_building = Some(name);
        self.refresh_buildings();
    }

    // -------------------------------------------------------------------------
    // Camera
    // -------------------------------------------------------------------------

    /// Record the view the engine reports after user interaction.
    pub fn on_view_state_change(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Frame the zone in the container and remember it as the home camera.
    pub fn fit_to_viewport(&mut self, viewport: Viewport) -> ViewState {
        let home = camera_for_bounds(&self.zone_bounds, viewport, FIT_PADDING_PX);
        self.home = Some(home);
        self.view = self.view.looking_at(home).with_transition(TRANSITION_MS);
        self.view
    }

    /// Fly back to the home camera, keeping pitch and bearing.
    pub fn recenter(&mut self) -> ViewState {
        if let Some(home) = self.home {
            self.view = self.view.looking_at(home).with_transition(TRANSITION_MS);
        }
        self.view
    }

    /// Switch between flat footprints and extruded buildings.
    pub fn toggle_3d(&mut self) -> ViewState {
        self.extruded = !self.extruded;
        if self.extruded {
            self.view.pitch = EXTRUDED_PITCH_DEG;
        } else {
            self.view.pitch = 0.0;
            self.view.bearing = 0.0;
        }
        self.view.transition_duration = Some(TRANSITION_MS);
        self.refresh_buildings();
        self.view
    }

    /// A right-button drag on the flat map switches to 3D.
    pub fn on_drag_start(&mut self, right_button: bool) -> Option<ViewState> {
        (right_button && !self.extruded).then(|| self.toggle_3d())
    }

    pub fn toggle_basemap(&mut self) -> Basemap {
        self.basemap = self.basemap.toggled();
        self.basemap
    }
}
