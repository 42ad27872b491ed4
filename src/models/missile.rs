// src/models/missile.rs

use bitflags::bitflags;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{MissileParameters, ParameterError};
use crate::models::devices::{
    AuxiliaryTrigger, DetachmentKind, DetachmentMechanism, ForceActuator, OrientationActuator, PayloadDevice,
    Pose, ProximitySensor,
};
use crate::models::estimator::{TargetEstimator, TrackMode};
use crate::models::fuze::{FuzeController, PayloadSet};
use crate::models::guidance::{compute_steering, GuidanceCommand, GuidanceState};

bitflags! {
    /// 構築時に検出した構成不備。空であれば飛行可能。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MissileErrorFlags: u8 {
        const MISSING_ORIENTATION_ACTUATORS = 0b001;
        const MISSING_FORCE_ACTUATORS = 0b010;
        const MISSING_DETACHMENT_MECHANISM = 0b100;
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MissileError {
    #[error("ミサイルは飛行可能な状態ではありません: {0:?}")]
    NotFlightReady(MissileErrorFlags),
    #[error("パラメータが不正です: {0}")]
    InvalidParameters(#[from] ParameterError),
}

/// 外部から観測できるミサイルの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileStatus {
    Idle,
    InFlight,
    Detonated,
}

/// ミサイルに接続されたデバイス群
#[derive(Default)]
pub struct Capabilities {
    pub orientation: Vec<Box<dyn OrientationActuator>>,
    pub force: Vec<Box<dyn ForceActuator>>,
    pub release: Option<Box<dyn DetachmentMechanism>>,
    pub weapon: Option<Box<dyn DetachmentMechanism>>,
    pub payload: Option<Vec<Box<dyn PayloadDevice>>>,
    pub trigger: Option<Box<dyn AuxiliaryTrigger>>,
    pub sensor: Option<Box<dyn ProximitySensor>>,
}

/// デバイス構成から構成不備のビットマスクを求める
pub fn validate_capabilities(capabilities: &Capabilities) -> MissileErrorFlags {
    let mut flags = MissileErrorFlags::empty();

    if capabilities.orientation.is_empty() {
        flags |= MissileErrorFlags::MISSING_ORIENTATION_ACTUATORS;
    }
    if capabilities.force.is_empty() {
        flags |= MissileErrorFlags::MISSING_FORCE_ACTUATORS;
    }
    // 弾頭は空の集合でも分離機構として扱う
    if capabilities.release.is_none()
        && capabilities.weapon.is_none()
        && capabilities.payload.is_none()
    {
        flags |= MissileErrorFlags::MISSING_DETACHMENT_MECHANISM;
    }

    flags
}

/// 1ティックの処理結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub target: Vector3<f64>,
    pub mode: TrackMode,
    pub command: GuidanceCommand,
    pub detonated: bool,
}

/// 誘導・目標推定・信管をまとめたミサイル制御
pub struct Missile {
    flags: MissileErrorFlags,
    status: MissileStatus,
    params: MissileParameters,
    estimator: TargetEstimator,
    guidance: GuidanceState,
    fuze: FuzeController,
    orientation: Vec<Box<dyn OrientationActuator>>,
    force: Vec<Box<dyn ForceActuator>>,
    release: Option<Box<dyn DetachmentMechanism>>,
    weapon: Option<Box<dyn DetachmentMechanism>>,
    payload: PayloadSet,
    sensor: Option<Box<dyn ProximitySensor>>,
}

impl Missile {
    /// デバイス構成を検証してミサイル制御を構築する
    ///
    /// 構成不備がある場合は構築せずにビットマスクを返す
    pub fn new(capabilities: Capabilities, params: MissileParameters) -> Result<Self, MissileError> {
        params.validate()?;

        let flags = validate_capabilities(&capabilities);
        if !flags.is_empty() {
            warn!(?flags, "missile is not flight-ready");
            return Err(MissileError::NotFlightReady(flags));
        }

        Ok(Missile {
            flags,
            status: MissileStatus::Idle,
            estimator: TargetEstimator::new(&params.estimator),
            guidance: GuidanceState::default(),
            fuze: FuzeController::new(&params.fuze),
            params,
            orientation: capabilities.orientation,
            force: capabilities.force,
            release: capabilities.release,
            weapon: capabilities.weapon,
            payload: PayloadSet {
                trigger: capabilities.trigger,
                devices: capabilities.payload,
            },
            sensor: capabilities.sensor,
        })
    }

    /// 初回ティックの差分が原点基準にならないよう運動履歴を初期化する
    ///
    /// # 引数
    /// - `own_position`: 1ティック前の自機位置
    /// - `target_position`: 1ティック前の目標位置
    /// - `target_velocity`: 目標の1ティックあたりの移動量（不明ならゼロ）
    pub fn seed_history(
        &mut self,
        own_position: Vector3<f64>,
        target_position: Vector3<f64>,
        target_velocity: Vector3<f64>,
    ) {
        self.guidance = GuidanceState {
            previous_own_position: own_position,
            previous_target_position: target_position,
            previous_target_velocity: target_velocity,
        };
    }

    /// 外部の照準源から目標位置を受け取る
    pub fn update_target(&mut self, position: Vector3<f64>) {
        self.estimator.update_fix(position);
    }

    pub fn ensure_flight_ready(&self) -> Result<(), MissileError> {
        if self.flags.is_empty() {
            Ok(())
        } else {
            Err(MissileError::NotFlightReady(self.flags))
        }
    }

    /// 1ティック分の制御
    ///
    /// # 引数
    /// - `pose`: ホストが渡す今ティックの自機姿勢
    ///
    /// # 戻り値
    /// - 目標推定、誘導指令、起爆の有無
    pub fn update(&mut self, pose: &Pose) -> Result<TickReport, MissileError> {
        self.ensure_flight_ready()?;

        let target = self.estimator.estimate(&self.guidance);
        let thrust_sum = self
            .force
            .iter()
            .fold(Vector3::<f64>::zeros(), |sum, thruster| sum + thruster.thrust_vector());

        let (next_state, command) = compute_steering(
            self.guidance,
            &pose.position,
            &target,
            &thrust_sum,
            &self.params.guidance,
        );
        self.guidance = next_state;

        // 姿勢制御には操舵ベクトルそのもの、推力には単位方向のみを渡す
        for gyro in self.orientation.iter_mut() {
            gyro.point_in_direction(pose, &command.steering);
        }
        let direction = command.thrust_direction();
        for thruster in self.force.iter_mut() {
            thruster.apply_thrust(&direction);
        }

        let detonated = self.fuze.evaluate_detonation(
            &pose.position,
            &target,
            self.sensor.as_deref(),
            &mut self.payload,
        );

        self.status = if detonated {
            info!(position = ?pose.position, "missile detonated");
            MissileStatus::Detonated
        } else if self.status == MissileStatus::Detonated {
            MissileStatus::Detonated
        } else {
            MissileStatus::InFlight
        };

        Ok(TickReport {
            target,
            mode: self.estimator.mode(),
            command,
            detonated,
        })
    }

    pub fn error_flags(&self) -> MissileErrorFlags {
        self.flags
    }

    pub fn status(&self) -> MissileStatus {
        self.status
    }

    pub fn target(&self) -> Vector3<f64> {
        self.estimator.target()
    }

    pub fn guidance_state(&self) -> GuidanceState {
        self.guidance
    }

    pub fn detonations(&self) -> u32 {
        self.fuze.detonations()
    }

    /// 搭載している分離機構の種類（弾頭は含まない）
    pub fn detachment_kinds(&self) -> Vec<DetachmentKind> {
        self.release
            .iter()
            .chain(self.weapon.iter())
            .map(|mechanism| mechanism.kind())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::devices::{DetectedEntity, Relationship};
    use crate::models::mock::{
        shared_log, MockDetach, MockGyro, MockSensor, MockThruster, MockTrigger, MockWarhead,
        SharedLog,
    };

    fn full_capabilities(log: &SharedLog) -> Capabilities {
        Capabilities {
            orientation: vec![Box::new(MockGyro(log.clone()))],
            force: vec![
                Box::new(MockThruster {
                    log: log.clone(),
                    thrust: Vector3::new(1.0, 0.0, 0.0),
                }),
                Box::new(MockThruster {
                    log: log.clone(),
                    thrust: Vector3::new(0.0, 2.0, 0.0),
                }),
            ],
            release: Some(Box::new(MockDetach(DetachmentKind::Release))),
            weapon: None,
            payload: Some(vec![Box::new(MockWarhead(log.clone()))]),
            trigger: Some(Box::new(MockTrigger(log.clone()))),
            sensor: None,
        }
    }

    #[test]
    fn test_all_capabilities_present() {
        let log = shared_log();

        assert_eq!(
            validate_capabilities(&full_capabilities(&log)),
            MissileErrorFlags::empty()
        );
    }

    #[test]
    fn test_missing_orientation_only() {
        let log = shared_log();
        let mut capabilities = full_capabilities(&log);
        capabilities.orientation.clear();

        assert_eq!(
            validate_capabilities(&capabilities),
            MissileErrorFlags::MISSING_ORIENTATION_ACTUATORS
        );
    }

    #[test]
    fn test_missing_everything() {
        let flags = validate_capabilities(&Capabilities::default());

        assert_eq!(flags, MissileErrorFlags::all());
    }

    #[test]
    fn test_any_detachment_mechanism_is_enough() {
        let log = shared_log();

        let mut weapon_only = full_capabilities(&log);
        weapon_only.release = None;
        weapon_only.payload = None;
        weapon_only.weapon = Some(Box::new(MockDetach(DetachmentKind::Weapon)));
        assert!(validate_capabilities(&weapon_only).is_empty());

        let mut empty_payload = full_capabilities(&log);
        empty_payload.release = None;
        empty_payload.payload = Some(Vec::new());
        assert!(validate_capabilities(&empty_payload).is_empty());
    }

    #[test]
    fn test_construction_refused_when_not_flight_ready() {
        let log = shared_log();
        let mut capabilities = full_capabilities(&log);
        capabilities.force.clear();
        capabilities.release = None;
        capabilities.payload = None;

        let result = Missile::new(capabilities, MissileParameters::default());

        match result {
            Err(MissileError::NotFlightReady(flags)) => assert_eq!(
                flags,
                MissileErrorFlags::MISSING_FORCE_ACTUATORS
                    | MissileErrorFlags::MISSING_DETACHMENT_MECHANISM
            ),
            _ => panic!("Expected MissileError::NotFlightReady"),
        }
    }

    #[test]
    fn test_construction_rejects_invalid_parameters() {
        let log = shared_log();
        let mut params = MissileParameters::default();
        params.guidance.navigation_gain = f64::NAN;

        let result = Missile::new(full_capabilities(&log), params);

        assert!(matches!(result, Err(MissileError::InvalidParameters(_))));
    }

    #[test]
    fn test_update_splits_command_between_actuators() {
        let log = shared_log();
        let mut missile = Missile::new(full_capabilities(&log), MissileParameters::default()).unwrap();
        assert_eq!(missile.status(), MissileStatus::Idle);
        assert!(missile.ensure_flight_ready().is_ok());
        assert_eq!(missile.error_flags(), MissileErrorFlags::empty());
        assert_eq!(missile.detachment_kinds(), vec![DetachmentKind::Release]);

        missile.seed_history(Vector3::zeros(), Vector3::new(1000.0, 0.0, 0.0), Vector3::zeros());
        missile.update_target(Vector3::new(1000.0, 0.0, 0.0));
        let report = missile.update(&Pose::at(Vector3::zeros())).unwrap();

        assert!(!report.detonated);
        assert_eq!(report.target, Vector3::new(1000.0, 0.0, 0.0));
        assert_eq!(report.command.steering, Vector3::new(1000.0, 0.0, 0.0));
        assert_eq!(report.command.thrust_sum, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(missile.status(), MissileStatus::InFlight);

        let log = log.borrow();
        assert_eq!(log.orientation_commands, vec![Vector3::new(1000.0, 0.0, 0.0)]);
        assert_eq!(
            log.thrust_commands,
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_update_persists_history() {
        let log = shared_log();
        let mut missile = Missile::new(full_capabilities(&log), MissileParameters::default()).unwrap();
        let target = Vector3::new(300.0, 40.0, 0.0);

        missile.update_target(target);
        missile.update(&Pose::at(Vector3::new(5.0, 0.0, 0.0))).unwrap();

        let state = missile.guidance_state();
        assert_eq!(state.previous_own_position, Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(state.previous_target_position, target);
        assert_eq!(state.previous_target_velocity, target);
    }

    #[test]
    fn test_dead_reckoning_follows_constant_velocity() {
        let log = shared_log();
        let mut missile = Missile::new(full_capabilities(&log), MissileParameters::default()).unwrap();
        missile.seed_history(Vector3::zeros(), Vector3::new(500.0, 0.0, 0.0), Vector3::zeros());

        // 目標位置情報なしでは履歴から外挿する（速度ゼロなら移動しない）
        let report = missile.update(&Pose::at(Vector3::zeros())).unwrap();
        assert_eq!(report.target, Vector3::new(500.0, 0.0, 0.0));
        assert_eq!(report.mode, TrackMode::DeadReckoning);
        assert_eq!(missile.target(), Vector3::new(500.0, 0.0, 0.0));
    }

    #[test]
    fn test_proximity_detonation_through_update() {
        let log = shared_log();
        let mut missile = Missile::new(full_capabilities(&log), MissileParameters::default()).unwrap();

        missile.seed_history(Vector3::zeros(), Vector3::new(5.0, 0.0, 0.0), Vector3::zeros());
        missile.update_target(Vector3::new(5.0, 0.0, 0.0));
        let report = missile.update(&Pose::at(Vector3::zeros())).unwrap();

        assert!(report.detonated);
        assert_eq!(missile.status(), MissileStatus::Detonated);
        assert_eq!(missile.detonations(), 1);
        assert_eq!(log.borrow().events, vec!["trigger", "arm", "detonate"]);
    }

    #[test]
    fn test_hostile_contact_detonation_through_update() {
        let log = shared_log();
        let mut capabilities = full_capabilities(&log);
        capabilities.sensor = Some(Box::new(MockSensor(vec![DetectedEntity {
            id: 42,
            relationship: Relationship::Neutral,
            position: Vector3::new(0.0, 5000.0, 0.0),
        }])));
        let mut missile = Missile::new(capabilities, MissileParameters::default()).unwrap();

        missile.update_target(Vector3::new(2000.0, 0.0, 0.0));
        let report = missile.update(&Pose::at(Vector3::zeros())).unwrap();

        assert!(report.detonated);
        assert_eq!(log.borrow().detonations, 1);
    }
}
