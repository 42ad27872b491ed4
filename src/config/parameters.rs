// src/config/parameters.rs

use serde::Deserialize;

use crate::config::error::ParameterError;

/// 誘導則のパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GuidanceParameters {
    pub navigation_gain: f64, // 比例航法係数 N
    pub min_range_sq: f64,    // これ未満の距離二乗では視線角速度を 0 とする
}

impl Default for GuidanceParameters {
    fn default() -> Self {
        GuidanceParameters {
            navigation_gain: 3.0,
            min_range_sq: 1e-6,
        }
    }
}

/// 目標推定器のパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EstimatorParameters {
    /// 最後の外部位置情報から推測航法へ戻るまでの推定回数。
    /// `None` の場合は一度追尾に入ると推測航法へ戻らない。
    pub fix_timeout_ticks: Option<u32>,
}

/// 信管のパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FuzeParameters {
    pub detonate_distance_sq: f64,              // 近接起爆の距離二乗（この値未満で起爆）
    pub hostile_gate_distance_sq: Option<f64>,  // 敵対・中立目標による起爆の距離二乗ゲート
    pub arm_once: bool,                         // 一度起爆したら以降の起爆を行わない
}

impl Default for FuzeParameters {
    fn default() -> Self {
        FuzeParameters {
            detonate_distance_sq: 128.0,
            hostile_gate_distance_sq: None,
            arm_once: false,
        }
    }
}

/// ミサイル全体のパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MissileParameters {
    pub guidance: GuidanceParameters,
    pub estimator: EstimatorParameters,
    pub fuze: FuzeParameters,
}

impl MissileParameters {
    /// パラメータの妥当性を検証する
    pub fn validate(&self) -> Result<(), ParameterError> {
        let gain = self.guidance.navigation_gain;
        if !gain.is_finite() || gain <= 0.0 {
            return Err(ParameterError::InvalidNavigationGain(gain));
        }

        let min_range_sq = self.guidance.min_range_sq;
        if !min_range_sq.is_finite() || min_range_sq <= 0.0 {
            return Err(ParameterError::InvalidMinRange(min_range_sq));
        }

        let detonate = self.fuze.detonate_distance_sq;
        if !detonate.is_finite() || detonate < 0.0 {
            return Err(ParameterError::InvalidDetonateDistance(detonate));
        }

        if let Some(gate) = self.fuze.hostile_gate_distance_sq {
            if !gate.is_finite() || gate < 0.0 {
                return Err(ParameterError::InvalidHostileGate(gate));
            }
        }

        Ok(())
    }
}
