//! Per-frame input record
//!
//! Window events write into [`InputState`] as they arrive; the animation loop reads
//! it once per tick. Nothing here knows about winit, so the loop can be driven
//! from tests with synthetic input.

/// Top-of-page offset in pixels: 0 at the top, negative as the page scrolls down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub offset_px: f32,
}

/// Pointer input accumulated between ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    pressed: bool,
    cursor: Option<(f64, f64)>,
    drag: (f32, f32),
    zoom: f32,
}

impl PointerState {
    pub fn on_button(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Adds a relative movement; only counts as a drag while the button is held
    pub fn on_motion(&mut self, dx: f32, dy: f32) {
        if self.pressed {
            self.drag.0 += dx;
            self.drag.1 += dy;
        }
    }

    /// Tracks an absolute cursor position and turns it into relative motion
    pub fn on_cursor(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor {
            self.on_motion((x - last_x) as f32, (y - last_y) as f32);
        }
        self.cursor = Some((x, y));
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn on_zoom(&mut self, dy: f32) {
        self.zoom += dy;
    }

    /// Returns and clears the accumulated drag
    pub fn take_drag(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.drag)
    }

    /// Returns and clears the accumulated zoom
    pub fn take_zoom(&mut self) -> f32 {
        std::mem::take(&mut self.zoom)
    }
}

/// Everything the animation loop reads from the outside world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub scroll: ScrollState,
    pub pointer: PointerState,
}

/// Keyboard scrolling commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Stand-in for the document whose scroll position drives the camera
///
/// Converts wheel and key input into a scroll offset clamped to the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualPage {
    pub height_px: f32,
    pub viewport_height_px: f32,
    /// Pixels scrolled per wheel line or arrow key
    pub line_px: f32,
}

impl VirtualPage {
    pub fn new(height_px: f32, viewport_height_px: f32, line_px: f32) -> Self {
        Self {
            height_px,
            viewport_height_px,
            line_px,
        }
    }

    /// Furthest the page can scroll down, as a positive distance
    pub fn max_scroll(&self) -> f32 {
        (self.height_px - self.viewport_height_px).max(0.0)
    }

    pub fn clamp(&self, offset_px: f32) -> f32 {
        offset_px.clamp(-self.max_scroll(), 0.0)
    }

    /// Wheel lines; positive lines scroll toward the top
    pub fn scroll_lines(&self, scroll: &mut ScrollState, lines: f32) {
        self.scroll_pixels(scroll, lines * self.line_px);
    }

    /// Wheel pixels; positive pixels scroll toward the top
    pub fn scroll_pixels(&self, scroll: &mut ScrollState, pixels: f32) {
        scroll.offset_px = self.clamp(scroll.offset_px + pixels);
    }

    pub fn apply_key(&self, scroll: &mut ScrollState, key: PageKey) {
        match key {
            PageKey::LineUp => self.scroll_pixels(scroll, self.line_px),
            PageKey::LineDown => self.scroll_pixels(scroll, -self.line_px),
            PageKey::PageUp => self.scroll_pixels(scroll, self.viewport_height_px),
            PageKey::PageDown => self.scroll_pixels(scroll, -self.viewport_height_px),
            PageKey::Home => scroll.offset_px = 0.0,
            PageKey::End => scroll.offset_px = -self.max_scroll(),
        }
    }

    /// Updates the viewport and keeps the offset within the shorter range
    pub fn set_viewport_height(&mut self, scroll: &mut ScrollState, height_px: f32) {
        self.viewport_height_px = height_px;
        scroll.offset_px = self.clamp(scroll.offset_px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> VirtualPage {
        VirtualPage::new(6000.0, 800.0, 60.0)
    }

    #[test]
    fn test_wheel_down_scrolls_negative() {
        let mut scroll = ScrollState::default();
        page().scroll_lines(&mut scroll, -3.0);
        assert_eq!(scroll.offset_px, -180.0);
        page().scroll_pixels(&mut scroll, 80.0);
        assert_eq!(scroll.offset_px, -100.0);
    }

    #[test]
    fn test_scroll_is_clamped_to_page() {
        let mut scroll = ScrollState::default();
        page().scroll_lines(&mut scroll, 5.0);
        assert_eq!(scroll.offset_px, 0.0);
        page().scroll_pixels(&mut scroll, -100_000.0);
        assert_eq!(scroll.offset_px, -5200.0);
    }

    #[test]
    fn test_page_keys() {
        let page = page();
        let mut scroll = ScrollState::default();
        page.apply_key(&mut scroll, PageKey::PageDown);
        assert_eq!(scroll.offset_px, -800.0);
        page.apply_key(&mut scroll, PageKey::LineDown);
        assert_eq!(scroll.offset_px, -860.0);
        page.apply_key(&mut scroll, PageKey::End);
        assert_eq!(scroll.offset_px, -5200.0);
        page.apply_key(&mut scroll, PageKey::Home);
        assert_eq!(scroll.offset_px, 0.0);
    }

    #[test]
    fn test_page_shorter_than_viewport_cannot_scroll() {
        let page = VirtualPage::new(500.0, 800.0, 60.0);
        let mut scroll = ScrollState::default();
        page.apply_key(&mut scroll, PageKey::End);
        assert_eq!(scroll.offset_px, 0.0);
    }

    #[test]
    fn test_taller_viewport_reclamps_offset() {
        let mut page = page();
        let mut scroll = ScrollState { offset_px: -5200.0 };
        page.set_viewport_height(&mut scroll, 1000.0);
        assert_eq!(scroll.offset_px, -5000.0);
    }

    #[test]
    fn test_motion_counts_only_while_pressed() {
        let mut pointer = PointerState::default();
        pointer.on_cursor(10.0, 10.0);
        pointer.on_cursor(20.0, 30.0);
        assert_eq!(pointer.take_drag(), (0.0, 0.0));

        pointer.on_button(true);
        pointer.on_cursor(25.0, 20.0);
        pointer.on_motion(1.0, 1.0);
        assert_eq!(pointer.take_drag(), (6.0, -9.0));
        assert_eq!(pointer.take_drag(), (0.0, 0.0));
    }

    #[test]
    fn test_zoom_accumulates_until_taken() {
        let mut pointer = PointerState::default();
        pointer.on_zoom(-1.0);
        pointer.on_zoom(-2.0);
        assert_eq!(pointer.take_zoom(), -3.0);
        assert_eq!(pointer.take_zoom(), 0.0);
    }
}
