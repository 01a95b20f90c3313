//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::routes::brands::panel_url;
use crate::state::AppState;

/// A brand panel placeholder that loads itself via HTMX.
#[derive(Debug, Clone)]
pub struct PanelPlaceholder {
    pub brand: String,
    pub url: String,
}

/// Home page template: one panel per configured brand.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub panels: Vec<PanelPlaceholder>,
}

impl HomeTemplate {
    #[must_use]
    pub fn new(brands: &[String]) -> Self {
        Self {
            panels: brands
                .iter()
                .map(|brand| PanelPlaceholder {
                    brand: brand.clone(),
                    url: panel_url(brand, false),
                })
                .collect(),
        }
    }
}

/// Display the home page.
///
/// Panels render as `Loading...` and fetch their content after the page loads,
/// so the page itself never waits on the catalog.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    HomeTemplate::new(&state.config().brands)
}
