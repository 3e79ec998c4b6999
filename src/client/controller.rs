//! 会话控制器
//!
//! 唯一持有 `Session` 的地方。用户操作通过 `dispatch` 进入状态机；
//! 上传图片时同时驱动两个独立信号：模拟进度计时器和真实的中继请求，
//! 只在状态转换时把两者合并。

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::client::progress::ProgressTicker;
use crate::client::relay_client::QuizRelay;
use crate::client::session::{Event, Phase, Session};
use crate::config::ClientConfig;
use crate::models::image::ImageUpload;

/// 会话控制器
pub struct QuizController<R> {
    relay: R,
    session: Session,
    ticker: ProgressTicker,
    tick_interval: Duration,
    settle_delay: Duration,
    progress_tx: watch::Sender<f64>,
}

impl<R: QuizRelay> QuizController<R> {
    pub fn new(relay: R, config: &ClientConfig) -> Self {
        Self::with_ticker(relay, config, ProgressTicker::new())
    }

    pub fn with_ticker(relay: R, config: &ClientConfig, ticker: ProgressTicker) -> Self {
        let (progress_tx, _) = watch::channel(0.0);
        Self {
            relay,
            session: Session::new(),
            ticker,
            // interval 不接受 0
            tick_interval: config.tick_interval.max(Duration::from_millis(1)),
            settle_delay: config.settle_delay,
            progress_tx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// 订阅展示用进度
    pub fn subscribe_progress(&self) -> watch::Receiver<f64> {
        self.progress_tx.subscribe()
    }

    /// 处理一个用户操作
    pub fn dispatch(&mut self, event: Event) -> &Session {
        step(&mut self.session, &self.progress_tx, event);
        &self.session
    }

    /// 上传图片并等待结果
    ///
    /// 非图片直接留在上传页，不发起请求。请求期间进度计时器独立运行，
    /// 响应到达或失败时立即停止。
    pub async fn submit_image(&mut self, image: ImageUpload) -> &Session {
        self.dispatch(Event::ImageSelected {
            content_type: image.content_type.clone(),
        });
        if self.session.phase() != Phase::Loading {
            warn!(
                "⚠️ 未发起请求: {} ({})",
                image.file_name, image.content_type
            );
            return &self.session;
        }

        info!("📤 正在生成题目: {}", image.file_name);

        let settle_delay = self.settle_delay;
        let mut timer = interval(self.tick_interval);
        {
            let Self {
                relay,
                session,
                ticker,
                progress_tx,
                ..
            } = &mut *self;

            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即完成
            timer.tick().await;

            let request = relay.generate_quiz(&image);
            tokio::pin!(request);

            let outcome = loop {
                tokio::select! {
                    result = &mut request => break result,
                    _ = timer.tick() => {
                        let delta = ticker.next_step();
                        step(session, progress_tx, Event::ProgressTick(delta));
                    }
                }
            };

            match outcome {
                Ok(questions) => {
                    info!("✓ 收到 {} 道题目", questions.len());
                    step(session, progress_tx, Event::ResponseArrived);
                    sleep(settle_delay).await;
                    step(session, progress_tx, Event::RelaySucceeded(questions));
                }
                Err(e) => {
                    error!("❌ 生成题目失败: {}", e);
                    step(session, progress_tx, Event::RelayFailed);
                }
            }
        }

        &self.session
    }
}

/// 应用事件并发布最新进度
fn step(session: &mut Session, progress_tx: &watch::Sender<f64>, event: Event) {
    *session = std::mem::take(session).apply(event);
    progress_tx.send_replace(session.progress());
}
