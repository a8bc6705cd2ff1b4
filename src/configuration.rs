use std::cell::{
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::attenuation::attenuationmanager::AttenuationManager;
use crate::attenuation::kemptonstewart2006::KemptonStewart2006;
use crate::magdist::gutenbergrichtermagfreqdist::GutenbergRichterMagFreqDist;
use crate::magdist::magfreqdistmanager::MagFreqDistManager;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::manager::managererror::ManagerError;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    magfreqdist: Vec<serde_json::Value>,
    #[serde(default)]
    attenuation: Vec<serde_json::Value>
}

pub struct Configuration {
    mag_freq_dist_manager_cell: RefCell<Manager<GutenbergRichterMagFreqDist>>,
    attenuation_manager_cell: RefCell<Manager<KemptonStewart2006>>
}


impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            mag_freq_dist_manager_cell: RefCell::new(MagFreqDistManager::new()),
            attenuation_manager_cell: RefCell::new(AttenuationManager::new())
        }
    }

    pub fn mag_freq_dist_manager(&self) -> RefMut<'_, Manager<GutenbergRichterMagFreqDist>> {
        self.mag_freq_dist_manager_cell.borrow_mut()
    }

    pub fn attenuation_manager(&self) -> RefMut<'_, Manager<KemptonStewart2006>> {
        self.attenuation_manager_cell.borrow_mut()
    }

    pub fn from_reader(&self, file_path: impl AsRef<Path>) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        self.from_json(json_value)
    }

    pub fn from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
        self.mag_freq_dist_manager().insert_obj_from_json_vec(&json_prop.magfreqdist)?;
        self.attenuation_manager().insert_obj_from_json_vec(&json_prop.attenuation)?;
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
