//! # Application State
//!
//! Reactive state of the map panel plus the glue that forwards UI and
//! engine events to the [`MapSession`] and re-synchronises deck.gl.

use district_map_domain::inspect::feature_name;
use district_map_domain::{
    AttributeTables, BuildingProperties, ClickAction, LayerId, MapError, MapSession, Result,
    Tooltip, ViewState,
};
use geojson::FeatureCollection;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config::MapConfig;
use crate::services::{DeckMap, MapEvents, PagePayload, Pick, edit_feature, fetch_layer};

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    pub config: StoredValue<MapConfig>,
    pub session: RwSignal<Option<MapSession>>,
    pub tables: StoredValue<AttributeTables>,
    pub tooltip: RwSignal<Tooltip>,
    pub properties: RwSignal<Option<BuildingProperties>>,
    deck: StoredValue<Option<DeckMap>, LocalStorage>,
}

impl AppState {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config: StoredValue::new(config),
            session: RwSignal::new(None),
            tables: StoredValue::new(AttributeTables::default()),
            tooltip: RwSignal::new(Tooltip::empty()),
            properties: RwSignal::new(None),
            deck: StoredValue::new_local(None),
        }
    }

    /// Build the session from the page payload, create the engine and frame
    /// the zone.
    pub fn start(&self, payload: PagePayload) -> Result<()> {
        let mut session = MapSession::new(payload.zone, payload.district)?;
        self.tables.set_value(payload.tables);

        let container_id = self.config.with_value(|config| config.container_id.clone());
        let deck = DeckMap::new(&container_id, &session, *self)?;
        let view = session.fit_to_viewport(deck.viewport()?);
        deck.set_view(view)?;

        self.deck.set_value(Some(deck));
        self.session.set(Some(session));
        Ok(())
    }

    /// Fetch every remote layer; each one lands in its own slot whenever it
    /// arrives.
    pub fn load_remote_layers(&self) {
        for (id, _) in LayerId::remote() {
            let state = *self;
            let config = self.config.get_value();
            spawn_local(async move {
                match fetch_layer(&config, id).await {
                    Ok(collection) => state.layer_loaded(id, collection),
                    Err(err) => state.layer_failed(id, &err),
                }
            });
        }
    }

    // -------------------------------------------------------------------------
    // Reactive reads
    // -------------------------------------------------------------------------

    pub fn is_extruded(&self) -> bool {
        self.session
            .with(|session| session.as_ref().is_some_and(MapSession::is_extruded))
    }

    pub fn checkbox_visible(&self, id: LayerId) -> bool {
        self.session
            .with(|session| session.as_ref().is_some_and(|s| s.checkbox_visible(id)))
    }

    pub fn is_layer_visible(&self, id: LayerId) -> bool {
        self.session
            .with(|session| session.as_ref().is_some_and(|s| s.is_layer_visible(id)))
    }

    // -------------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------------

    pub fn toggle_3d(&self) {
        if let Some(view) = self.update_session(MapSession::toggle_3d) {
            self.sync_layers();
            self.move_camera(view);
        }
    }

    pub fn toggle_basemap(&self) {
        if let Some(basemap) = self.update_session(MapSession::toggle_basemap) {
            self.with_deck("Basemap switch", |deck| deck.set_basemap(basemap));
        }
    }

    pub fn recenter(&self) {
        if let Some(view) = self.update_session(MapSession::recenter) {
            self.move_camera(view);
        }
    }

    pub fn set_layer_visible(&self, id: LayerId, visible: bool) {
        if self
            .update_session(|session| session.set_layer_visible(id, visible))
            .is_some()
        {
            self.sync_layers();
        }
    }

    // -------------------------------------------------------------------------
    // Remote layers
    // -------------------------------------------------------------------------

    pub fn layer_loaded(&self, id: LayerId, collection: FeatureCollection) {
        self.deck.with_value(|deck| {
            if let Some(deck) = deck {
                deck.forget_data(id);
            }
        });
        if self
            .update_session(|session| session.insert_remote(id, collection))
            .is_some()
        {
            self.sync_layers();
        }
    }

    pub fn layer_failed(&self, id: LayerId, err: &MapError) {
        self.session.with_untracked(|session| match session {
            Some(session) => session.remote_failed(id, &err.to_string()),
            None => log::warn!("Get {id} failed: {err}"),
        });
    }

    // -------------------------------------------------------------------------
    // Feature clicks
    // -------------------------------------------------------------------------

    /// Highlight the clicked building and fill the properties panel.
    pub fn show_building(&self, pick: &Pick) {
        let Some(name) = feature_name(&pick.feature).map(str::to_string) else {
            log::warn!("Clicked {} feature has no name", pick.layer);
            return;
        };

        if self
            .update_session(|session| session.select_building(name.as_str()))
            .is_some()
        {
            self.sync_layers();
        }

        let properties = self
            .tables
            .with_value(|tables| BuildingProperties::build(pick.layer, &name, tables));
        self.properties.set(Some(properties));
    }

    /// Open the attribute table's editor for a street or network feature.
    pub fn edit_feature(&self, pick: &Pick) {
        let selector = self.config.with_value(|config| config.table_selector.clone());
        if let Err(err) = edit_feature(&selector, pick.layer, &pick.feature) {
            log::warn!("Editing {} feature failed: {err}", pick.layer);
        }
    }

    // -------------------------------------------------------------------------
    // Engine sync
    // -------------------------------------------------------------------------

    fn update_session<U>(&self, action: impl FnOnce(&mut MapSession) -> U) -> Option<U> {
        self.session
            .try_update(|session| session.as_mut().map(action))
            .flatten()
    }

    fn with_deck(&self, what: &str, action: impl FnOnce(&DeckMap) -> Result<()>) {
        let outcome = self.deck.with_value(|deck| deck.as_ref().map(action));
        if let Some(Err(err)) = outcome {
            log::warn!("{what} failed: {err}");
        }
    }

    fn sync_layers(&self) {
        self.session.with_untracked(|session| {
            if let Some(session) = session {
                self.with_deck("Layer update", |deck| deck.render_layers(session));
            }
        });
    }

    fn move_camera(&self, view: ViewState) {
        self.with_deck("Camera update", |deck| deck.set_view(view));
    }
}

impl MapEvents for AppState {
    fn view_state_changed(&self, view: ViewState) {
        self.session.update_untracked(|session| {
            if let Some(session) = session {
                session.on_view_state_change(view);
            }
        });
    }

    fn drag_started(&self, right_button: bool) {
        if !right_button {
            return;
        }
        if let Some(view) = self
            .update_session(|session| session.on_drag_start(right_button))
            .flatten()
        {
            self.sync_layers();
            self.move_camera(view);
        }
    }

    fn hovered(&self, pick: Option<Pick>, x: f64, y: f64) {
        let tooltip = match pick {
            Some(pick) => Tooltip::for_feature(pick.layer, &pick.feature, x, y).unwrap_or_else(
                |err| {
                    log::warn!("Tooltip for {} feature failed: {err}", pick.layer);
                    Tooltip::empty()
                },
            ),
            None => Tooltip::empty(),
        };
        self.tooltip.set(tooltip);
    }

    fn clicked(&self, pick: Pick) {
        let action = self.session.with_untracked(|session| {
            session
                .as_ref()
                .and_then(|session| session.layers().get(pick.layer).click)
        });
        match action {
            Some(ClickAction::ShowProperties) => self.show_building(&pick),
            Some(ClickAction::EditProperties) => self.edit_feature(&pick),
            None => {}
        }
    }
}

pub fn provide_app_state() {
    let state = AppState::new(MapConfig::from_page());
    provide_context(state);
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
