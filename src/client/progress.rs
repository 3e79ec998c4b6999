//! 加载进度模拟
//!
//! 进度只用于展示，和真实请求进度无关：每次刷新随机前进一段，最多到 90%，
//! 收到响应时直接跳到 100%。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 模拟进度的上限
pub const PROGRESS_CAP: f64 = 90.0;

/// 收到响应后的进度
pub const PROGRESS_DONE: f64 = 100.0;

/// 单次刷新的最大步长（不含）
pub const MAX_STEP: f64 = 15.0;

/// 前进一步，结果不超过上限；已经在上限之上（例如已完成）时保持不变
pub fn advance(progress: f64, step: f64) -> f64 {
    if progress >= PROGRESS_CAP {
        progress
    } else {
        (progress + step.max(0.0)).min(PROGRESS_CAP)
    }
}

/// 随机步长生成器
#[derive(Debug)]
pub struct ProgressTicker {
    rng: StdRng,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 使用固定种子，便于测试复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 下一步的步长，范围 `[0, 15)`
    pub fn next_step(&mut self) -> f64 {
        self.rng.gen_range(0.0..MAX_STEP)
    }
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_caps_at_ninety() {
        assert_eq!(advance(0.0, 10.0), 10.0);
        assert_eq!(advance(85.0, 14.0), PROGRESS_CAP);
        assert_eq!(advance(PROGRESS_CAP, 5.0), PROGRESS_CAP);
        assert_eq!(advance(PROGRESS_DONE, 5.0), PROGRESS_DONE);
        assert_eq!(advance(10.0, -3.0), 10.0);
    }

    #[test]
    fn test_ticker_steps_in_range() {
        let mut ticker = ProgressTicker::seeded(7);
        let mut progress = 0.0;
        for _ in 0..200 {
            let step = ticker.next_step();
            assert!((0.0..MAX_STEP).contains(&step));
            let next = advance(progress, step);
            assert!(next >= progress);
            progress = next;
        }
        assert_eq!(progress, PROGRESS_CAP);
    }
}
