// src/models/guidance.rs

use nalgebra::Vector3;
use tracing::trace;

use crate::config::GuidanceParameters;
use crate::math::{finite_or, normalize_with_magnitude};

/// 前ティック終了時点の運動履歴
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GuidanceState {
    pub previous_own_position: Vector3<f64>,
    pub previous_target_position: Vector3<f64>,
    pub previous_target_velocity: Vector3<f64>,
}

/// 1ティック分の誘導指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceCommand {
    pub steering: Vector3<f64>,             // 操舵ベクトル（姿勢制御へそのまま渡す）
    pub range: Vector3<f64>,                // 視線ベクトル R
    pub closing_velocity: Vector3<f64>,     // 接近速度 Vc
    pub rotation: Vector3<f64>,             // 視線回転ベクトル Ω
    pub lateral_acceleration: Vector3<f64>, // 比例航法の横加速度 A
    pub thrust_sum: Vector3<f64>,           // 推力デバイスの合成推力（参考値）
}

impl GuidanceCommand {
    /// 推力配分用の単位方向（大きさは捨てる）
    pub fn thrust_direction(&self) -> Vector3<f64> {
        normalize_with_magnitude(&self.steering).0
    }
}

/// 視線回転ベクトル Ω = (R × Vc) / (R・R)
///
/// 距離二乗が `min_range_sq` 未満の場合はゼロを返す
pub fn rotation_vector(
    range: &Vector3<f64>,
    closing_velocity: &Vector3<f64>,
    min_range_sq: f64,
) -> Vector3<f64> {
    let range_sq = range.norm_squared();
    if !range_sq.is_finite() || range_sq < min_range_sq {
        return Vector3::zeros();
    }
    range.cross(closing_velocity) / range_sq
}

/// 比例航法の横加速度 A = (N・Vc) × Ω
pub fn lateral_acceleration(
    closing_velocity: &Vector3<f64>,
    rotation: &Vector3<f64>,
    navigation_gain: f64,
) -> Vector3<f64> {
    (closing_velocity * navigation_gain).cross(rotation)
}

/// 拡張比例航法による操舵ベクトルを計算する純粋関数
///
/// # 引数
/// - `state`: 前ティックの運動履歴
/// - `own_position`: 現在の自機位置
/// - `target_position`: 今ティックの目標推定位置
/// - `thrust_sum`: 推力デバイスの合成推力
/// - `params`: 誘導パラメータ
///
/// # 戻り値
/// - 今ティックの値で置き換えた運動履歴
/// - 誘導指令
pub fn compute_steering(
    state: GuidanceState,
    own_position: &Vector3<f64>,
    target_position: &Vector3<f64>,
    thrust_sum: &Vector3<f64>,
    params: &GuidanceParameters,
) -> (GuidanceState, GuidanceCommand) {
    let range = target_position - own_position;
    let own_velocity = own_position - state.previous_own_position;
    let target_velocity = target_position - state.previous_target_position;
    let closing_velocity = target_velocity - own_velocity;

    let rotation = rotation_vector(&range, &closing_velocity, params.min_range_sq);
    let accel = lateral_acceleration(&closing_velocity, &rotation, params.navigation_gain);

    // 横加速度の方向と大きさを分けてから視線ベクトルに加える
    let (accel_unit, accel_magnitude) = normalize_with_magnitude(&accel);
    let safe_range = finite_or(range, Vector3::zeros());
    let steering = finite_or(accel_unit * accel_magnitude + range, safe_range);

    trace!(
        range = ?range,
        closing_velocity = ?closing_velocity,
        rotation = ?rotation,
        steering = ?steering,
        "guidance step"
    );

    let next_state = GuidanceState {
        previous_own_position: *own_position,
        previous_target_position: *target_position,
        previous_target_velocity: target_velocity,
    };

    let command = GuidanceCommand {
        steering,
        range,
        closing_velocity,
        rotation,
        lateral_acceleration: accel_unit * accel_magnitude,
        thrust_sum: *thrust_sum,
    };

    (next_state, command)
}
