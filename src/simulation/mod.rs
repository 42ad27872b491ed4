// src/simulation/mod.rs

pub mod csv;
pub mod devices;
pub mod framework;
pub mod load_parameters;

use nalgebra::Vector3;

use crate::models::Missile;
use crate::simulation::devices::{SharedBody, SharedPayloadLog};

/// 等速直線運動する目標と位置情報の送信予定
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTrack {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub fix_interval: u32,
    pub fix_until: Option<u32>,
}

impl TargetTrack {
    /// このティックで外部位置情報を送るか
    pub fn fix_due(&self, tick: u32) -> bool {
        self.fix_interval > 0
            && tick % self.fix_interval == 0
            && self.fix_until.map_or(true, |until| tick < until)
    }
}

/// 交戦シミュレーションの全体状態
pub struct EngagementState {
    pub tick: u32,
    pub missile: Missile,
    pub body: SharedBody,            // 模擬機体（デバイスと共有）
    pub target: TargetTrack,
    pub payload_log: SharedPayloadLog, // 起爆デバイスの動作記録
}

/// 1ティック分の記録（CSV の1行）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRecord {
    pub tick: u32,
    pub own_position: Vector3<f64>,
    pub target_position: Vector3<f64>,
    pub estimate: Vector3<f64>,
    pub steering: Vector3<f64>,
    pub tracking: bool,
    pub detonated: bool,
}
