//! # 操作事件观察者
//!
//! 核心库不访问任何全局日志状态。需要记录操作结果时，调用方显式传入一个 `Observer`，
//! 由它决定事件的去向 (日志、状态栏、测试断言等)。

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadImage,
    HideText,
    RevealText,
    HideImage,
    RevealImage,
    ShowDifference,
    SaveImage,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::LoadImage => "load image",
            Action::HideText => "hide text",
            Action::RevealText => "reveal text",
            Action::HideImage => "hide image",
            Action::RevealImage => "reveal image",
            Action::ShowDifference => "show difference",
            Action::SaveImage => "save image",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Failure,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Failure => "failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub action: Action,
    pub status: Status,
    pub detail: String,
}

impl Event {
    pub fn new(action: Action, status: Status, detail: impl Into<String>) -> Self {
        Self {
            action,
            status,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.action, self.status, self.detail)
    }
}

pub trait Observer {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Observer for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// 丢弃所有事件。
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&mut self, _event: &Event) {}
}

/// 把事件转发给 `log` crate，级别随状态而定。
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&mut self, event: &Event) {
        match event.status {
            Status::Success => log::info!("{event}"),
            Status::Warning => log::warn!("{event}"),
            Status::Failure => log::error!("{event}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_collect_events() {
        let mut seen = Vec::new();
        {
            let mut observer = |e: &Event| seen.push(e.clone());
            observer.on_event(&Event::new(Action::HideText, Status::Success, "done"));
        }
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].to_string(), "[hide text] success: done");
    }
}
