use serde::Deserialize;

use crate::models::dividend::DividendEvent;

/// One page of the Polygon dividends endpoint. `next_url` carries the
/// cursor for the following page, or is absent on the last one.
#[derive(Deserialize, Debug)]
pub struct PolygonDividendsResponse {
    #[serde(default)]
    pub results: Vec<DividendEvent>,
    #[serde(default)]
    pub next_url: Option<String>,
}
