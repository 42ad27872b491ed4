// src/models/fuze.rs

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::FuzeParameters;
use crate::math::distance_squared;
use crate::models::devices::{
    AuxiliaryTrigger, DetectedEntity, PayloadDevice, ProximitySensor, Relationship,
};

/// 起爆の原因
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetonationCause {
    Proximity { distance_sq: f64 },
    HostileContact { entity_id: u64, relationship: Relationship },
}

/// 起爆時に動作させるデバイス群
#[derive(Default)]
pub struct PayloadSet {
    pub trigger: Option<Box<dyn AuxiliaryTrigger>>,
    pub devices: Option<Vec<Box<dyn PayloadDevice>>>,
}

impl PayloadSet {
    /// 補助トリガを発火し、弾頭があれば全て安全解除して起爆する
    pub fn detonate(&mut self) {
        if let Some(trigger) = self.trigger.as_mut() {
            trigger.trigger();
        }

        let Some(devices) = self.devices.as_mut() else {
            return;
        };

        for device in devices.iter_mut() {
            device.set_armed(true);
            device.detonate();
        }
    }
}

/// 起爆条件を判定する純粋関数
///
/// # 引数
/// - `own_position`: 自機位置
/// - `target_position`: 目標推定位置
/// - `contacts`: センサの探知結果（センサ未搭載なら `None`）
/// - `params`: 信管パラメータ
///
/// # 戻り値
/// - 成立した起爆原因の一覧。近接起爆が成立した場合はそれのみを返す。
///   敵対・中立の探知物体は距離に関係なく1件ずつ起爆原因になる。
pub fn detonation_causes(
    own_position: &Vector3<f64>,
    target_position: &Vector3<f64>,
    contacts: Option<&[DetectedEntity]>,
    params: &FuzeParameters,
) -> Vec<DetonationCause> {
    let distance_sq = distance_squared(own_position, target_position);
    if distance_sq < params.detonate_distance_sq {
        return vec![DetonationCause::Proximity { distance_sq }];
    }

    let Some(contacts) = contacts else {
        return Vec::new();
    };

    contacts
        .iter()
        .filter(|entity| entity.relationship.is_hostile())
        .filter(|entity| match params.hostile_gate_distance_sq {
            Some(gate) => distance_squared(own_position, &entity.position) < gate,
            None => true,
        })
        .map(|entity| DetonationCause::HostileContact {
            entity_id: entity.id,
            relationship: entity.relationship,
        })
        .collect()
}

/// 信管・安全装置の制御
#[derive(Debug, Clone)]
pub struct FuzeController {
    params: FuzeParameters,
    contacts: Vec<DetectedEntity>, // センサ読み出し用の作業領域（毎ティック上書き）
    detonations: u32,
}

impl FuzeController {
    pub fn new(params: &FuzeParameters) -> Self {
        FuzeController {
            params: params.clone(),
            contacts: Vec::new(),
            detonations: 0,
        }
    }

    /// 起爆条件を評価し、成立すれば起爆シーケンスを実行する
    ///
    /// 既定では冪等ではない。条件が成立し続ける限り呼び出しごとに起爆シーケンスを繰り返す。
    ///
    /// # 戻り値
    /// - 今回の呼び出しで起爆シーケンスを実行した場合は`true`
    pub fn evaluate_detonation(
        &mut self,
        own_position: &Vector3<f64>,
        target_position: &Vector3<f64>,
        sensor: Option<&dyn ProximitySensor>,
        payload: &mut PayloadSet,
    ) -> bool {
        if self.params.arm_once && self.detonations > 0 {
            debug!("fuze already fired, ignoring evaluation");
            return false;
        }

        self.contacts.clear();
        let contacts = match sensor {
            Some(sensor) => {
                sensor.detected_entities(&mut self.contacts);
                Some(self.contacts.as_slice())
            }
            None => None,
        };

        let causes = detonation_causes(own_position, target_position, contacts, &self.params);
        for cause in &causes {
            info!(?cause, "detonating");
            payload.detonate();
            self.detonations += 1;
            if self.params.arm_once {
                break;
            }
        }

        !causes.is_empty()
    }

    /// これまでに実行した起爆シーケンスの回数
    pub fn detonations(&self) -> u32 {
        self.detonations
    }
}
