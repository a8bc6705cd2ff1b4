use serde::Deserialize;

use crate::magdist::gutenbergrichtermagfreqdist::GutenbergRichterMagFreqDist;
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;

#[derive(Deserialize)]
struct GutenbergRichterJsonProp {
    b_value: f64,
    tot_cum_rate: f64,
    mag_lower: f64,
    mag_upper: f64,
    num: usize
}

fn get_gutenberg_richter_from_json(json_value: serde_json::Value) -> Result<GutenbergRichterMagFreqDist, ManagerError> {
    let json_prop: GutenbergRichterJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let mfd = GutenbergRichterMagFreqDist::new(
        json_prop.b_value,
        json_prop.tot_cum_rate,
        json_prop.mag_lower,
        json_prop.mag_upper,
        json_prop.num
    )?;
    Ok(mfd)
}


pub struct MagFreqDistManager;

impl MagFreqDistManager {
    pub fn new() -> Manager<GutenbergRichterMagFreqDist> {
        Manager::new(get_gutenberg_richter_from_json)
    }
}
