// src/simulation/load_parameters.rs

use std::error::Error;
use std::fs::File;

use serde::de::DeserializeOwned;
use serde_yaml::from_reader;

use crate::config::{MissileParameters, Scenario};

/// YAMLファイルの読み込み
fn load_yaml<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn Error>> {
    let file = File::open(path)?;
    let data: T = from_reader(file)?;
    Ok(data)
}

/// ミサイルパラメータの読み込みと検証
pub fn load_missile_parameters(path: &str) -> Result<MissileParameters, Box<dyn Error>> {
    let params: MissileParameters = load_yaml(path)?;
    params.validate()?;
    Ok(params)
}

/// シナリオの読み込み
pub fn load_scenario(path: &str) -> Result<Scenario, Box<dyn Error>> {
    load_yaml(path)
}
