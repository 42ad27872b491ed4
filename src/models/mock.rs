// src/models/mock.rs
//
// テスト用の記録デバイス。呼び出し内容を共有ログに残す。

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;

use crate::models::devices::{
    AuxiliaryTrigger, DetachmentKind, DetachmentMechanism, DetectedEntity, ForceActuator,
    OrientationActuator, PayloadDevice, Pose, ProximitySensor,
};

/// デバイス呼び出しの記録
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub orientation_commands: Vec<Vector3<f64>>,
    pub thrust_commands: Vec<Vector3<f64>>,
    pub triggers: u32,
    pub armed: u32,
    pub detonations: u32,
    pub events: Vec<&'static str>,
}

pub type SharedLog = Rc<RefCell<DeviceLog>>;

pub fn shared_log() -> SharedLog {
    Rc::new(RefCell::new(DeviceLog::default()))
}

pub struct MockGyro(pub SharedLog);

impl OrientationActuator for MockGyro {
    fn point_in_direction(&mut self, _pose: &Pose, direction: &Vector3<f64>) {
        self.0.borrow_mut().orientation_commands.push(*direction);
    }
}

pub struct MockThruster {
    pub log: SharedLog,
    pub thrust: Vector3<f64>,
}

impl ForceActuator for MockThruster {
    fn apply_thrust(&mut self, direction: &Vector3<f64>) {
        self.log.borrow_mut().thrust_commands.push(*direction);
    }

    fn thrust_vector(&self) -> Vector3<f64> {
        self.thrust
    }
}

pub struct MockDetach(pub DetachmentKind);

impl DetachmentMechanism for MockDetach {
    fn kind(&self) -> DetachmentKind {
        self.0
    }
}

pub struct MockSensor(pub Vec<DetectedEntity>);

impl ProximitySensor for MockSensor {
    fn detected_entities(&self, out: &mut Vec<DetectedEntity>) {
        out.clear();
        out.extend_from_slice(&self.0);
    }
}

pub struct MockTrigger(pub SharedLog);

impl AuxiliaryTrigger for MockTrigger {
    fn trigger(&mut self) {
        let mut log = self.0.borrow_mut();
        log.triggers += 1;
        log.events.push("trigger");
    }
}

pub struct MockWarhead(pub SharedLog);

impl PayloadDevice for MockWarhead {
    fn set_armed(&mut self, armed: bool) {
        if armed {
            let mut log = self.0.borrow_mut();
            log.armed += 1;
            log.events.push("arm");
        }
    }

    fn detonate(&mut self) {
        let mut log = self.0.borrow_mut();
        log.detonations += 1;
        log.events.push("detonate");
    }
}
