//! Sequential focus between sibling pin inputs.
//!
//! The host keeps one [`FocusRing`] per container with the widget ids in tab
//! order. Widgets only emit signals; the ring decides where focus lands.

/// Emitted right before focus leaves a widget that finished its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusNotice {
    pub source: usize,
    /// Stop holding focus when the notice went out.
    pub focused: Option<usize>,
}

type Listener = Box<dyn FnMut(&FocusNotice)>;

#[derive(Default)]
pub struct FocusRing {
    stops: Vec<usize>,
    focused: Option<usize>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for FocusRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusRing")
            .field("stops", &self.stops)
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FocusRing {
    pub fn new(stops: Vec<usize>) -> Self {
        Self {
            stops,
            ..Self::default()
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focus(&mut self, id: usize) {
        if self.stops.contains(&id) {
            self.focused = Some(id);
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Subscribe to focus-next notices.
    pub fn on_focus_next(&mut self, listener: impl FnMut(&FocusNotice) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn position(&self, id: usize) -> Option<usize> {
        self.stops.iter().position(|stop| *stop == id)
    }

    /// Notify listeners, then move focus to the stop after `source`.
    ///
    /// Focus stays put when `source` is the last stop.
    pub fn focus_next(&mut self, source: usize) -> Option<usize> {
        let notice = FocusNotice {
            source,
            focused: self.focused,
        };
        for listener in self.listeners.iter_mut() {
            listener(&notice);
        }
        let target = self
            .position(source)
            .and_then(|idx| self.stops.get(idx + 1).copied());
        self.move_to(source, target)
    }

    pub fn focus_previous(&mut self, source: usize) -> Option<usize> {
        let target = self
            .position(source)
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| self.stops.get(idx).copied());
        self.move_to(source, target)
    }

    /// Plain tab navigation: no notices, wraps around at the end.
    pub fn cycle(&mut self) -> Option<usize> {
        let next = match self.focused.and_then(|id| self.position(id)) {
            Some(idx) => self.stops.get((idx + 1) % self.stops.len()).copied(),
            None => self.stops.first().copied(),
        };
        if next.is_some() {
            self.focused = next;
        }
        next
    }

    fn move_to(&mut self, source: usize, target: Option<usize>) -> Option<usize> {
        if let Some(target) = target {
            tracing::debug!(from = source, to = target, "focus moved");
            self.focused = Some(target);
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn moves_by_one_in_tab_order() {
        let mut ring = FocusRing::new(vec![3, 1, 2]);
        ring.focus(3);
        assert_eq!(ring.focus_next(3), Some(1));
        assert_eq!(ring.focused(), Some(1));
        assert_eq!(ring.focus_previous(1), Some(3));
        assert_eq!(ring.focused(), Some(3));
    }

    #[test]
    fn stays_at_the_ends() {
        let mut ring = FocusRing::new(vec![0, 1]);
        ring.focus(1);
        assert_eq!(ring.focus_next(1), None);
        assert_eq!(ring.focused(), Some(1));
        ring.focus(0);
        assert_eq!(ring.focus_previous(0), None);
        assert_eq!(ring.focused(), Some(0));
    }

    #[test]
    fn listeners_hear_notice_even_without_a_next_stop() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut ring = FocusRing::new(vec![0, 1]);
        let sink = Rc::clone(&heard);
        ring.on_focus_next(move |notice| sink.borrow_mut().push((notice.source, notice.focused)));
        ring.focus(0);
        ring.focus_next(0);
        ring.focus_next(1);
        ring.focus_previous(1);
        assert_eq!(*heard.borrow(), vec![(0, Some(0)), (1, Some(1))]);
        assert_eq!(ring.focused(), Some(0));
    }

    #[test]
    fn cycle_wraps_and_starts_at_first_stop() {
        let mut ring = FocusRing::new(vec![4, 5]);
        assert_eq!(ring.cycle(), Some(4));
        assert_eq!(ring.cycle(), Some(5));
        assert_eq!(ring.cycle(), Some(4));
        assert_eq!(FocusRing::new(Vec::new()).cycle(), None);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut ring = FocusRing::new(vec![0]);
        ring.focus(7);
        assert_eq!(ring.focused(), None);
        assert_eq!(ring.focus_next(7), None);
    }
}
