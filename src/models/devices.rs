// src/models/devices.rs
//
// 誘導コアが呼び出す外部デバイスのインターフェース。
// デバイスの駆動そのもの（ジャイロ制御、推力配分、起爆）は各実装側の責務。

use nalgebra::{UnitQuaternion, Vector3};
use serde::Deserialize;

/// ホストが毎ティック渡す自機の姿勢スナップショット
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Pose { position, orientation }
    }

    /// 姿勢を持たない位置だけのスナップショット
    pub fn at(position: Vector3<f64>) -> Self {
        Pose {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }
}

/// 探知物体との関係
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Friendly,
    Neutral,
    Enemy,
}

impl Relationship {
    /// 起爆対象となる関係か（敵対または中立）
    pub fn is_hostile(&self) -> bool {
        matches!(self, Relationship::Enemy | Relationship::Neutral)
    }
}

/// センサが探知した物体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedEntity {
    pub id: u64,
    pub relationship: Relationship,
    pub position: Vector3<f64>,
}

/// 姿勢制御デバイス（ジャイロ）
pub trait OrientationActuator {
    /// 現在の姿勢から `direction` の方向を向くよう指令する
    fn point_in_direction(&mut self, pose: &Pose, direction: &Vector3<f64>);
}

/// 推力デバイス
pub trait ForceActuator {
    /// 正規化された方向に基づいて推力を設定する
    fn apply_thrust(&mut self, direction: &Vector3<f64>);

    /// 現在発生している推力ベクトル
    fn thrust_vector(&self) -> Vector3<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachmentKind {
    Release,
    Weapon,
}

/// 分離機構。構築時の存在確認にのみ使い、誘導コアからは呼び出さない。
pub trait DetachmentMechanism {
    fn kind(&self) -> DetachmentKind;
}

/// 近接センサ
pub trait ProximitySensor {
    /// 現在探知している物体で `out` を上書きする
    fn detected_entities(&self, out: &mut Vec<DetectedEntity>);
}

/// 起爆前に発火する補助トリガ（タイマーブロック等）
pub trait AuxiliaryTrigger {
    fn trigger(&mut self);
}

/// 弾頭
pub trait PayloadDevice {
    fn set_armed(&mut self, armed: bool);
    fn detonate(&mut self);
}
