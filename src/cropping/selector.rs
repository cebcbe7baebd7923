use crate::common_types::CropBox;
use thiserror::Error;

/// Distance in pixels, per axis, within which a pointer grabs the resize handle.
pub const DEFAULT_HANDLE_TOLERANCE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropSelectorState {
    Idle,
    Dragging,
    HandleAdjust,
    Selected,
    Confirmed(CropBox),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    PointerDown { x: i64, y: i64 },
    PointerMove { x: i64, y: i64 },
    PointerUp { x: i64, y: i64 },
    Confirm,
    Cancel,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejected {
    #[error("Select an area before confirming")]
    NoSelection,
    #[error("Selected area is empty, drag a larger rectangle")]
    EmptySelection,
    #[error("Selection is already closed")]
    Closed,
}

/// Rectangle selection over an image, with a single resize handle on the free corner.
///
/// The anchor is where the rectangle was started and never moves; dragging or
/// adjusting only changes the free corner. Coordinates are clamped to the image, so a
/// confirmed box always lies inside it.
#[derive(Debug, Clone)]
pub struct CropSelector {
    image_width: u32,
    image_height: u32,
    handle_tolerance: u32,
    state: CropSelectorState,
    anchor: Option<(u32, u32)>,
    free_corner: Option<(u32, u32)>,
}

impl CropSelector {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            handle_tolerance: DEFAULT_HANDLE_TOLERANCE,
            state: CropSelectorState::Idle,
            anchor: None,
            free_corner: None,
        }
    }

    #[cfg(test)]
    pub fn with_handle_tolerance(mut self, handle_tolerance: u32) -> Self {
        self.handle_tolerance = handle_tolerance;
        self
    }

    pub fn state(&self) -> CropSelectorState {
        self.state
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn free_corner(&self) -> Option<(u32, u32)> {
        self.free_corner
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            CropSelectorState::Confirmed(_) | CropSelectorState::Cancelled
        )
    }

    /// Current rectangle, normalized. `None` until both corners are known.
    pub fn selection(&self) -> Option<CropBox> {
        match (self.anchor, self.free_corner) {
            (Some((x0, y0)), Some((x1, y1))) => Some(CropBox::from_corners(x0, y0, x1, y1)),
            _ => None,
        }
    }

    pub fn apply(&mut self, event: SelectorEvent) -> Result<(), SelectionRejected> {
        match event {
            SelectorEvent::PointerDown { x, y } => self.pointer_down(x, y),
            SelectorEvent::PointerMove { x, y } => self.pointer_move(x, y),
            SelectorEvent::PointerUp { x, y } => self.pointer_up(x, y),
            SelectorEvent::Confirm => return self.confirm().map(|_| ()),
            SelectorEvent::Cancel => self.cancel(),
        }
        Ok(())
    }

    pub fn pointer_down(&mut self, x: i64, y: i64) {
        if self.is_finished() {
            return;
        }
        let point = self.clamp(x, y);
        if self.is_on_handle(point) {
            self.state = CropSelectorState::HandleAdjust;
        } else {
            self.anchor = Some(point);
            self.free_corner = None;
            self.state = CropSelectorState::Dragging;
        }
    }

    pub fn pointer_move(&mut self, x: i64, y: i64) {
        if matches!(
            self.state,
            CropSelectorState::Dragging | CropSelectorState::HandleAdjust
        ) {
            self.free_corner = Some(self.clamp(x, y));
        }
    }

    pub fn pointer_up(&mut self, x: i64, y: i64) {
        if matches!(
            self.state,
            CropSelectorState::Dragging | CropSelectorState::HandleAdjust
        ) {
            self.free_corner = Some(self.clamp(x, y));
            self.state = CropSelectorState::Selected;
        }
    }

    /// Accepts the current rectangle. A rejected confirmation leaves the state untouched.
    pub fn confirm(&mut self) -> Result<CropBox, SelectionRejected> {
        match self.state {
            CropSelectorState::Confirmed(crop_box) => return Ok(crop_box),
            CropSelectorState::Cancelled => return Err(SelectionRejected::Closed),
            _ => {}
        }
        let crop_box = self.selection().ok_or(SelectionRejected::NoSelection)?;
        if crop_box.is_empty() {
            return Err(SelectionRejected::EmptySelection);
        }
        self.state = CropSelectorState::Confirmed(crop_box);
        Ok(crop_box)
    }

    pub fn cancel(&mut self) {
        if !matches!(self.state, CropSelectorState::Confirmed(_)) {
            self.state = CropSelectorState::Cancelled;
        }
    }

    fn is_on_handle(&self, (x, y): (u32, u32)) -> bool {
        match (self.anchor, self.free_corner) {
            (Some(_), Some((hx, hy))) => {
                hx.abs_diff(x) <= self.handle_tolerance && hy.abs_diff(y) <= self.handle_tolerance
            }
            _ => false,
        }
    }

    fn clamp(&self, x: i64, y: i64) -> (u32, u32) {
        (
            x.clamp(0, self.image_width as i64) as u32,
            y.clamp(0, self.image_height as i64) as u32,
        )
    }
}
