// src/config/scenario.rs

use serde::Deserialize;

use crate::models::devices::Relationship;

/// 交戦シナリオ（1発のミサイルと1つの目標）
#[derive(Debug, Deserialize, Clone)]
pub struct Scenario {
    pub max_ticks: u32,
    pub missile: MissileInstance,
    pub target: TargetInstance,
    #[serde(default)]
    pub contacts: Vec<ContactInstance>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MissileInstance {
    pub initial_position: [f64; 3],
    pub initial_velocity: [f64; 3], // 1ティックあたりの移動量
    pub devices: DeviceInstance,
}

/// ミサイルに搭載する模擬デバイス構成
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceInstance {
    pub gyros: usize,
    pub thrusters: usize,
    pub thrust_acceleration: f64, // 推力装置1基あたりの加速度（1ティックあたり）
    #[serde(default)]
    pub merge_block: bool,
    #[serde(default)]
    pub gun: bool,
    #[serde(default)]
    pub warheads: Option<usize>,
    #[serde(default)]
    pub timer: bool,
    #[serde(default)]
    pub sensor_range: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TargetInstance {
    pub initial_position: [f64; 3],
    pub velocity: [f64; 3], // 1ティックあたりの移動量
    #[serde(default)]
    pub fix_interval: u32, // 外部位置情報を送る間隔（0 で送らない）
    #[serde(default)]
    pub fix_until: Option<u32>, // このティック以降は位置情報を送らない
}

/// センサが探知し得る静止物体
#[derive(Debug, Deserialize, Clone)]
pub struct ContactInstance {
    pub id: u64,
    pub relationship: Relationship,
    pub position: [f64; 3],
}
