// src/models/estimator.rs

use nalgebra::Vector3;
use tracing::debug;

use crate::config::EstimatorParameters;
use crate::models::guidance::GuidanceState;

/// 目標推定のモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    /// 前回位置 + 前回速度で外挿する
    DeadReckoning,
    /// 外部から与えられた位置をそのまま使う
    Tracking { ticks_since_fix: u32 },
}

/// 等速直線運動を仮定した目標位置の推定器
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEstimator {
    target: Vector3<f64>,
    mode: TrackMode,
    fix_timeout_ticks: Option<u32>,
}

impl TargetEstimator {
    pub fn new(params: &EstimatorParameters) -> Self {
        TargetEstimator {
            target: Vector3::zeros(),
            mode: TrackMode::DeadReckoning,
            fix_timeout_ticks: params.fix_timeout_ticks,
        }
    }

    /// 外部から与えられた目標位置を記録し、追尾モードに入る
    pub fn update_fix(&mut self, position: Vector3<f64>) {
        if self.mode == TrackMode::DeadReckoning {
            debug!(?position, "target fix received, switching to tracking");
        }
        self.target = position;
        self.mode = TrackMode::Tracking { ticks_since_fix: 0 };
    }

    /// 今ティックに向かうべき目標位置を返す
    ///
    /// # 引数
    /// - `history`: 誘導則が前ティックに残した運動履歴
    ///
    /// # 戻り値
    /// - 推定した目標位置
    pub fn estimate(&mut self, history: &GuidanceState) -> Vector3<f64> {
        if let TrackMode::Tracking { ticks_since_fix } = self.mode {
            match self.fix_timeout_ticks {
                Some(limit) if ticks_since_fix >= limit => {
                    debug!(ticks_since_fix, "target fix is stale, reverting to dead reckoning");
                    self.mode = TrackMode::DeadReckoning;
                }
                _ => {
                    self.mode = TrackMode::Tracking {
                        ticks_since_fix: ticks_since_fix.saturating_add(1),
                    };
                    return self.target;
                }
            }
        }

        self.target = history.previous_target_position + history.previous_target_velocity;
        self.target
    }

    pub fn target(&self) -> Vector3<f64> {
        self.target
    }

    pub fn mode(&self) -> TrackMode {
        self.mode
    }

    /// 外部から位置情報を受け取って追尾中か
    pub fn is_externally_provided(&self) -> bool {
        matches!(self.mode, TrackMode::Tracking { .. })
    }
}
