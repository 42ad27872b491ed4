// src/simulation/devices.rs
//
// シナリオ実行用の模擬デバイス。質点として扱う機体を共有して動かす。

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};

use crate::math::{distance_squared, normalize_with_magnitude};
use crate::models::devices::{
    AuxiliaryTrigger, DetachmentKind, DetachmentMechanism, DetectedEntity, ForceActuator,
    OrientationActuator, PayloadDevice, Pose, ProximitySensor,
};

/// 質点としての機体（単位はすべて1ティックあたり）
#[derive(Debug, Clone, PartialEq)]
pub struct SimBody {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub facing: Vector3<f64>,       // 機首方向（単位ベクトル）
    pub acceleration: Vector3<f64>, // 今ティックに指令された加速度の合計
    pub max_speed: f64,
}

pub type SharedBody = Rc<RefCell<SimBody>>;

impl SimBody {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, max_speed: f64) -> Self {
        let (facing, speed) = normalize_with_magnitude(&velocity);
        SimBody {
            position,
            velocity,
            facing: if speed > 0.0 { facing } else { Vector3::x() },
            acceleration: Vector3::zeros(),
            max_speed,
        }
    }

    /// ホストに渡す姿勢スナップショット
    pub fn pose(&self) -> Pose {
        let orientation = UnitQuaternion::rotation_between(&Vector3::x(), &self.facing)
            .unwrap_or_else(UnitQuaternion::identity);
        Pose::new(self.position, orientation)
    }

    /// 指令された加速度で1ティック進める
    pub fn advance(&mut self) {
        let velocity = self.velocity + self.acceleration;
        let (direction, speed) = normalize_with_magnitude(&velocity);
        self.velocity = if speed > self.max_speed {
            direction * self.max_speed
        } else {
            velocity
        };
        self.position += self.velocity;
        self.acceleration = Vector3::zeros();
    }
}

/// 起爆関連デバイスの動作記録
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PayloadLog {
    pub triggers: u32,
    pub detonations: u32,
}

pub type SharedPayloadLog = Rc<RefCell<PayloadLog>>;

pub struct SimGyro {
    pub body: SharedBody,
}

impl OrientationActuator for SimGyro {
    fn point_in_direction(&mut self, _pose: &Pose, direction: &Vector3<f64>) {
        let (unit, magnitude) = normalize_with_magnitude(direction);
        if magnitude > 0.0 {
            self.body.borrow_mut().facing = unit;
        }
    }
}

pub struct SimThruster {
    pub body: SharedBody,
    pub acceleration: f64,
}

impl ForceActuator for SimThruster {
    fn apply_thrust(&mut self, direction: &Vector3<f64>) {
        self.body.borrow_mut().acceleration += direction * self.acceleration;
    }

    fn thrust_vector(&self) -> Vector3<f64> {
        self.body.borrow().facing * self.acceleration
    }
}

pub struct SimDetach(pub DetachmentKind);

impl DetachmentMechanism for SimDetach {
    fn kind(&self) -> DetachmentKind {
        self.0
    }
}

/// 探知距離内の物体だけを返すセンサ
pub struct SimSensor {
    pub body: SharedBody,
    pub range_sq: f64,
    pub contacts: Vec<DetectedEntity>,
}

impl ProximitySensor for SimSensor {
    fn detected_entities(&self, out: &mut Vec<DetectedEntity>) {
        let position = self.body.borrow().position;
        out.clear();
        out.extend(
            self.contacts
                .iter()
                .filter(|contact| distance_squared(&position, &contact.position) <= self.range_sq),
        );
    }
}

pub struct SimTimer {
    pub log: SharedPayloadLog,
}

impl AuxiliaryTrigger for SimTimer {
    fn trigger(&mut self) {
        self.log.borrow_mut().triggers += 1;
    }
}

pub struct SimWarhead {
    pub log: SharedPayloadLog,
    pub armed: bool,
}

impl PayloadDevice for SimWarhead {
    fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }

    fn detonate(&mut self) {
        // 安全解除されていない弾頭は起爆しない
        if self.armed {
            self.log.borrow_mut().detonations += 1;
        }
    }
}
