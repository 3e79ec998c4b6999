/// 成绩档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Excellent,
    Good,
    Fair,
    /// 低于 40% 的默认档位
    KeepPracticing,
}

impl ResultTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 80 => ResultTier::Excellent,
            p if p >= 60 => ResultTier::Good,
            p if p >= 40 => ResultTier::Fair,
            _ => ResultTier::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Excellent => "Excellent work!",
            ResultTier::Good => "Good job!",
            ResultTier::Fair => "Nice effort!",
            ResultTier::KeepPracticing => "Keep practicing!",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ResultTier::Excellent => "🎉",
            ResultTier::Good => "👍",
            ResultTier::Fair => "💪",
            ResultTier::KeepPracticing => "📚",
        }
    }
}

/// 测验结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ResultTier,
}

impl ResultSummary {
    /// `percentage = round(score / total × 100)`，total 为 0 时记 0
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            score,
            total,
            percentage,
            tier: ResultTier::from_percentage(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tiers() {
        let good = ResultSummary::new(3, 5);
        assert_eq!(good.percentage, 60);
        assert_eq!(good.tier, ResultTier::Good);
        assert_eq!(good.tier.message(), "Good job!");

        let perfect = ResultSummary::new(5, 5);
        assert_eq!(perfect.percentage, 100);
        assert_eq!(perfect.tier.message(), "Excellent work!");

        let low = ResultSummary::new(1, 5);
        assert_eq!(low.percentage, 20);
        assert_eq!(low.tier, ResultTier::KeepPracticing);
        assert_eq!(low.tier.emoji(), "📚");
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ResultTier::from_percentage(80), ResultTier::Excellent);
        assert_eq!(ResultTier::from_percentage(79), ResultTier::Good);
        assert_eq!(ResultTier::from_percentage(40), ResultTier::Fair);
        assert_eq!(ResultTier::from_percentage(39), ResultTier::KeepPracticing);
    }

    #[test]
    fn test_rounding() {
        // 2/3 = 66.67 -> 67
        assert_eq!(ResultSummary::new(2, 3).percentage, 67);
        // 1/8 = 12.5 -> 13
        assert_eq!(ResultSummary::new(1, 8).percentage, 13);
        assert_eq!(ResultSummary::new(0, 0).percentage, 0);
    }
}
