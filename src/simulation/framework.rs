// src/simulation/framework.rs

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::scenario::{DeviceInstance, Scenario};
use crate::config::MissileParameters;
use crate::models::devices::{
    AuxiliaryTrigger, DetachmentKind, DetachmentMechanism, DetectedEntity, ForceActuator,
    OrientationActuator, PayloadDevice, ProximitySensor,
};
use crate::models::{Capabilities, Missile, MissileError, TrackMode};
use crate::simulation::devices::{
    PayloadLog, SharedBody, SharedPayloadLog, SimBody, SimDetach, SimGyro, SimSensor, SimThruster,
    SimTimer, SimWarhead,
};
use crate::simulation::{EngagementState, TargetTrack, TickRecord};

/// 模擬機体の最大速度（1ティックあたり）
pub const MAX_SPEED: f64 = 5.0;

/// 模擬デバイスからミサイルのデバイス構成を組み立てる
pub fn build_capabilities(
    devices: &DeviceInstance,
    contacts: Vec<DetectedEntity>,
    body: &SharedBody,
    payload_log: &SharedPayloadLog,
) -> Capabilities {
    let orientation: Vec<Box<dyn OrientationActuator>> = (0..devices.gyros)
        .map(|_| Box::new(SimGyro { body: body.clone() }) as Box<dyn OrientationActuator>)
        .collect();

    let force: Vec<Box<dyn ForceActuator>> = (0..devices.thrusters)
        .map(|_| {
            Box::new(SimThruster {
                body: body.clone(),
                acceleration: devices.thrust_acceleration,
            }) as Box<dyn ForceActuator>
        })
        .collect();

    let payload = devices.warheads.map(|count| {
        (0..count)
            .map(|_| {
                Box::new(SimWarhead {
                    log: payload_log.clone(),
                    armed: false,
                }) as Box<dyn PayloadDevice>
            })
            .collect::<Vec<_>>()
    });

    Capabilities {
        orientation,
        force,
        release: devices.merge_block.then(|| {
            Box::new(SimDetach(DetachmentKind::Release)) as Box<dyn DetachmentMechanism>
        }),
        weapon: devices.gun.then(|| {
            Box::new(SimDetach(DetachmentKind::Weapon)) as Box<dyn DetachmentMechanism>
        }),
        payload,
        trigger: devices.timer.then(|| {
            Box::new(SimTimer {
                log: payload_log.clone(),
            }) as Box<dyn AuxiliaryTrigger>
        }),
        sensor: devices.sensor_range.map(|range| {
            Box::new(SimSensor {
                body: body.clone(),
                range_sq: range * range,
                contacts,
            }) as Box<dyn ProximitySensor>
        }),
    }
}

/// 交戦状態の初期化
pub fn initialize_engagement(
    params: MissileParameters,
    scenario: &Scenario,
) -> Result<EngagementState, MissileError> {
    let own_position = Vector3::from(scenario.missile.initial_position);
    let own_velocity = Vector3::from(scenario.missile.initial_velocity);
    let target_position = Vector3::from(scenario.target.initial_position);
    let target_velocity = Vector3::from(scenario.target.velocity);

    let body: SharedBody = Rc::new(RefCell::new(SimBody::new(own_position, own_velocity, MAX_SPEED)));
    let payload_log: SharedPayloadLog = Rc::new(RefCell::new(PayloadLog::default()));

    let contacts = scenario
        .contacts
        .iter()
        .map(|c| DetectedEntity {
            id: c.id,
            relationship: c.relationship,
            position: Vector3::from(c.position),
        })
        .collect();

    let capabilities = build_capabilities(&scenario.missile.devices, contacts, &body, &payload_log);
    let mut missile = Missile::new(capabilities, params)?;

    // 発射前の1ティック分の履歴を与える
    missile.seed_history(
        own_position - own_velocity,
        target_position - target_velocity,
        target_velocity,
    );

    info!(
        detachment = ?missile.detachment_kinds(),
        "engagement initialized"
    );

    Ok(EngagementState {
        tick: 0,
        missile,
        body,
        target: TargetTrack {
            position: target_position,
            velocity: target_velocity,
            fix_interval: scenario.target.fix_interval,
            fix_until: scenario.target.fix_until,
        },
        payload_log,
    })
}

/// 交戦ステップの実行
///
/// # 引数
/// - `state`: 交戦状態（ミサイル、模擬機体、目標）
///
/// # 戻り値
/// - このティックの記録
pub fn execute_engagement_step(state: &mut EngagementState) -> Result<TickRecord, MissileError> {
    let tick = state.tick;

    if state.target.fix_due(tick) {
        debug!(tick, "sending target fix");
        state.missile.update_target(state.target.position);
    }

    let pose = state.body.borrow().pose();
    let report = state.missile.update(&pose)?;

    let record = TickRecord {
        tick,
        own_position: pose.position,
        target_position: state.target.position,
        estimate: report.target,
        steering: report.command.steering,
        tracking: matches!(report.mode, TrackMode::Tracking { .. }),
        detonated: report.detonated,
    };

    state.body.borrow_mut().advance();
    state.target.position += state.target.velocity;
    state.tick += 1;

    Ok(record)
}

/// 起爆するか最大ティック数に達するまで交戦を進める
///
/// 起爆後はステップ関数を呼び出さない
pub fn run_engagement<F>(
    state: &mut EngagementState,
    max_ticks: u32,
    mut on_record: F,
) -> Result<Option<u32>, Box<dyn std::error::Error>>
where
    F: FnMut(&TickRecord) -> Result<(), Box<dyn std::error::Error>>,
{
    while state.tick < max_ticks {
        let record = execute_engagement_step(state)?;
        on_record(&record)?;
        if record.detonated {
            info!(tick = record.tick, "detonated, stopping engagement");
            return Ok(Some(record.tick));
        }
    }
    info!(max_ticks, "engagement ended without detonation");
    Ok(None)
}
