// src/config/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("比例航法係数が不正です: {0}")]
    InvalidNavigationGain(f64),
    #[error("最小距離二乗の閾値が不正です: {0}")]
    InvalidMinRange(f64),
    #[error("起爆距離二乗の閾値が不正です: {0}")]
    InvalidDetonateDistance(f64),
    #[error("敵対目標の起爆ゲートが不正です: {0}")]
    InvalidHostileGate(f64),
}
