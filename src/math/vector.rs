// src/math/vector.rs

use nalgebra::Vector3;

/// ゼロとみなすノルムの閾値
pub const EPSILON: f64 = 1e-9;

/// ベクトルを正規化し、単位ベクトルと元の大きさを返す
///
/// # 引数
/// - `v`: 正規化するベクトル
///
/// # 戻り値
/// - 単位ベクトル（大きさが `EPSILON` 未満、または非有限の場合はゼロベクトル）
/// - 元のベクトルの大きさ（同条件では 0.0）
pub fn normalize_with_magnitude(v: &Vector3<f64>) -> (Vector3<f64>, f64) {
    let magnitude = v.norm();
    if !magnitude.is_finite() || magnitude < EPSILON {
        return (Vector3::zeros(), 0.0);
    }
    (v / magnitude, magnitude)
}

/// 2点間の距離の二乗
pub fn distance_squared(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm_squared()
}

/// 全成分が有限ならそのまま、そうでなければ `fallback` を返す
pub fn finite_or(v: Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    if v.iter().all(|c| c.is_finite()) {
        v
    } else {
        fallback
    }
}
