//! 事件广播（Signal）
//!
//! 最小的发布/订阅原语：发布方不需要知道订阅方是谁。
//!
//! - `emit` 同步地、按订阅顺序调用每个监听器，每个监听器恰好一次
//! - 不排队、不异步投递
//! - `emit` 持有 `&mut self`，监听器无法在广播过程中修改订阅列表
//!
//! # 示例
//!
//! ```rust
//! use qbot_control::Signal;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut signal = Signal::new();
//!
//! let sink = seen.clone();
//! let id = signal.subscribe(move |v: &u32| sink.borrow_mut().push(*v));
//!
//! signal.emit(&1);
//! signal.unsubscribe(id);
//! signal.emit(&2);
//!
//! assert_eq!(*seen.borrow(), vec![1]);
//! ```

use std::fmt;

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// 事件广播器
pub struct Signal<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_id: u64,
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// 添加监听器，返回取消订阅用的句柄
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// 移除监听器
    ///
    /// 返回 `false` 表示该句柄不存在（已取消或不属于此广播器）。
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// 按订阅顺序通知所有监听器
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("listeners", &self.listeners.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new();

        for name in ["a", "b", "c"] {
            let log = log.clone();
            signal.subscribe(move |v: &i32| log.borrow_mut().push(format!("{}{}", name, v)));
        }

        signal.emit(&1);
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);

        signal.emit(&2);
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1", "a2", "b2", "c2"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new((0, 0)));
        let mut signal = Signal::new();

        let c = count.clone();
        let first = signal.subscribe(move |_: &()| c.borrow_mut().0 += 1);
        let c = count.clone();
        signal.subscribe(move |_: &()| c.borrow_mut().1 += 1);

        signal.emit(&());
        assert!(signal.unsubscribe(first));
        signal.emit(&());
        signal.emit(&());

        assert_eq!(*count.borrow(), (1, 3));
        assert_eq!(signal.len(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let mut signal: Signal<()> = Signal::new();
        let id = signal.subscribe(|_| {});
        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        assert!(signal.is_empty());
    }

    #[test]
    fn test_emit_without_listeners() {
        let mut signal: Signal<u8> = Signal::default();
        signal.emit(&7);
        assert_eq!(format!("{:?}", signal), "Signal { listeners: 0 }");
    }
}
