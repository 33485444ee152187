//! Split-pane divider dragging.
//!
//! `ResizeController` is a two-state machine (`Idle`, `Dragging`). Entering
//! `Dragging` marks the page, attaches the move/up listeners, and starts
//! observing the size readout; leaving it undoes all three. The controller
//! never touches the page itself: every effect goes through a `DragHost`.
//!
//! Which axis a drag resizes depends on the `ScreenClass`, read on each
//! pointer move. On narrow screens the panes are stacked and the divider
//! changes the editor's height; otherwise it changes the width.

/// Viewport class derived from the breakpoint media query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreenClass {
    #[default]
    Wide,
    Narrow,
}

impl ScreenClass {
    /// From the match state of the narrow-screen media query.
    pub fn from_matches(narrow: bool) -> Self {
        if narrow {
            ScreenClass::Narrow
        } else {
            ScreenClass::Wide
        }
    }
}

/// Pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPosition {
    pub client_x: i32,
    pub client_y: i32,
}

impl PointerPosition {
    pub fn new(client_x: i32, client_y: i32) -> Self {
        Self { client_x, client_y }
    }
}

/// A dimension applied to the editor pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneSize {
    Width(i32),
    Height(i32),
}

impl PaneSize {
    /// CSS property this size is applied to.
    pub fn property(&self) -> &'static str {
        match self {
            PaneSize::Width(_) => "width",
            PaneSize::Height(_) => "height",
        }
    }

    /// CSS value, e.g. `400px`.
    pub fn css_value(&self) -> String {
        match self {
            PaneSize::Width(px) | PaneSize::Height(px) => format!("{}px", px),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Page-side effects of the resize controller.
pub trait DragHost {
    /// Toggle the "dragging" marker on the page (cursor and selection styling).
    fn set_dragging_marker(&self, on: bool);

    /// Start listening for pointer move and pointer up anywhere on the page.
    fn attach_drag_listeners(&self);

    fn detach_drag_listeners(&self);

    /// Start reporting the readout element's box size.
    fn observe_readout(&self);

    fn unobserve_readout(&self);

    fn set_pane_size(&self, size: PaneSize);

    fn set_readout(&self, text: &str);
}

/// Format an observed content box as `WxH`, rounded to whole pixels.
pub fn format_dimensions(width: f64, height: f64) -> String {
    format!("{}x{}", width.round() as i64, height.round() as i64)
}

#[derive(Debug, Default)]
pub struct ResizeController {
    state: DragState,
    screen: ScreenClass,
}

impl ResizeController {
    pub fn new(screen: ScreenClass) -> Self {
        Self {
            state: DragState::Idle,
            screen,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn screen(&self) -> ScreenClass {
        self.screen
    }

    /// Pointer pressed on the divider. Returns whether a drag started.
    pub fn pointer_down<H: DragHost + ?Sized>(&mut self, host: &H) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging;
        host.set_dragging_marker(true);
        host.attach_drag_listeners();
        host.observe_readout();
        tracing::debug!(screen = ?self.screen, "divider drag started");
        true
    }

    /// Pointer moved while dragging. Returns the size applied, if any.
    pub fn pointer_move<H: DragHost + ?Sized>(
        &mut self,
        host: &H,
        position: PointerPosition,
    ) -> Option<PaneSize> {
        if !self.is_dragging() {
            return None;
        }
        let size = match self.screen {
            ScreenClass::Narrow => PaneSize::Height(position.client_y),
            ScreenClass::Wide => PaneSize::Width(position.client_x),
        };
        host.set_pane_size(size);
        Some(size)
    }

    /// Pointer released anywhere. Returns whether a drag ended.
    pub fn pointer_up<H: DragHost + ?Sized>(&mut self, host: &H) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.state = DragState::Idle;
        host.set_dragging_marker(false);
        host.detach_drag_listeners();
        host.unobserve_readout();
        tracing::debug!("divider drag ended");
        true
    }

    /// Size observation of the readout element.
    pub fn size_observed<H: DragHost + ?Sized>(&self, host: &H, width: f64, height: f64) {
        if !self.is_dragging() {
            return;
        }
        host.set_readout(&format_dimensions(width, height));
    }

    /// The breakpoint media query changed match state.
    pub fn media_changed(&mut self, narrow: bool) {
        let screen = ScreenClass::from_matches(narrow);
        if screen != self.screen {
            tracing::debug!(?screen, "screen class changed");
        }
        self.screen = screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Effect {
        Marker(bool),
        Attach,
        Detach,
        Observe,
        Unobserve,
        Size(PaneSize),
        Readout(String),
    }

    #[derive(Default)]
    struct RecordingHost {
        effects: RefCell<Vec<Effect>>,
    }

    impl RecordingHost {
        fn take(&self) -> Vec<Effect> {
            std::mem::take(&mut *self.effects.borrow_mut())
        }
    }

    impl DragHost for RecordingHost {
        fn set_dragging_marker(&self, on: bool) {
            self.effects.borrow_mut().push(Effect::Marker(on));
        }

        fn attach_drag_listeners(&self) {
            self.effects.borrow_mut().push(Effect::Attach);
        }

        fn detach_drag_listeners(&self) {
            self.effects.borrow_mut().push(Effect::Detach);
        }

        fn observe_readout(&self) {
            self.effects.borrow_mut().push(Effect::Observe);
        }

        fn unobserve_readout(&self) {
            self.effects.borrow_mut().push(Effect::Unobserve);
        }

        fn set_pane_size(&self, size: PaneSize) {
            self.effects.borrow_mut().push(Effect::Size(size));
        }

        fn set_readout(&self, text: &str) {
            self.effects.borrow_mut().push(Effect::Readout(text.to_string()));
        }
    }

    #[test]
    fn test_wide_drag_sets_width() {
        let host = RecordingHost::default();
        let mut controller = ResizeController::new(ScreenClass::Wide);

        assert!(controller.pointer_down(&host));
        assert_eq!(
            host.take(),
            vec![Effect::Marker(true), Effect::Attach, Effect::Observe]
        );

        assert_eq!(
            controller.pointer_move(&host, PointerPosition::new(400, 120)),
            Some(PaneSize::Width(400))
        );
        assert_eq!(host.take(), vec![Effect::Size(PaneSize::Width(400))]);

        assert!(controller.pointer_up(&host));
        assert_eq!(
            host.take(),
            vec![Effect::Marker(false), Effect::Detach, Effect::Unobserve]
        );

        // Moves after release change nothing.
        assert_eq!(controller.pointer_move(&host, PointerPosition::new(600, 120)), None);
        assert!(host.take().is_empty());
    }

    #[test]
    fn test_narrow_drag_sets_height() {
        let host = RecordingHost::default();
        let mut controller = ResizeController::new(ScreenClass::Narrow);

        controller.pointer_down(&host);
        host.take();
        controller.pointer_move(&host, PointerPosition::new(300, 250));
        assert_eq!(host.take(), vec![Effect::Size(PaneSize::Height(250))]);
    }

    #[test]
    fn test_single_drag_session() {
        let host = RecordingHost::default();
        let mut controller = ResizeController::default();

        assert!(controller.pointer_down(&host));
        host.take();
        assert!(!controller.pointer_down(&host));
        assert!(host.take().is_empty());

        assert!(controller.pointer_up(&host));
        host.take();
        assert!(!controller.pointer_up(&host));
        assert!(host.take().is_empty());
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_media_flip_only_affects_later_moves() {
        let host = RecordingHost::default();
        let mut controller = ResizeController::new(ScreenClass::Wide);

        controller.pointer_down(&host);
        controller.pointer_move(&host, PointerPosition::new(400, 100));
        controller.media_changed(true);
        controller.media_changed(false);
        controller.media_changed(true);
        controller.pointer_move(&host, PointerPosition::new(420, 260));

        let sizes: Vec<_> = host
            .take()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Size(size) => Some(size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![PaneSize::Width(400), PaneSize::Height(260)]);
        assert_eq!(controller.screen(), ScreenClass::Narrow);
    }

    #[test]
    fn test_readout_only_while_dragging() {
        let host = RecordingHost::default();
        let mut controller = ResizeController::default();

        controller.size_observed(&host, 10.0, 10.0);
        assert!(host.take().is_empty());

        controller.pointer_down(&host);
        host.take();
        controller.size_observed(&host, 399.6, 250.4);
        assert_eq!(host.take(), vec![Effect::Readout("400x250".into())]);
    }

    #[test]
    fn test_format_dimensions() {
        insta::assert_snapshot!(format_dimensions(640.0, 480.0), @"640x480");
        insta::assert_snapshot!(format_dimensions(12.5, 0.49), @"13x0");
    }

    #[test]
    fn test_pane_size_css() {
        assert_eq!(PaneSize::Width(400).property(), "width");
        assert_eq!(PaneSize::Width(400).css_value(), "400px");
        assert_eq!(PaneSize::Height(250).property(), "height");
        assert_eq!(PaneSize::Height(250).css_value(), "250px");
    }
}
