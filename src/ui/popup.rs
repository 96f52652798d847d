pub const POPUP_GAP_PX: f64 = 8.0;
pub const POPUP_FADE_MS: u32 = 200;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}px; top: {:.2}px; transform: translate(-50%, -100%); transform-origin: center bottom;",
            self.x, self.y
        )
    }
}

pub fn popup_anchor(control: Option<Rect>, viewport: (f64, f64)) -> Anchor {
    match control {
        Some(rect) => Anchor {
            x: rect.left + rect.width / 2.0,
            y: rect.top - POPUP_GAP_PX,
        },
        None => Anchor {
            x: viewport.0 / 2.0,
            y: viewport.1 / 2.0,
        },
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PopupPhase {
    /// Mounted but not yet visible, so the CSS transition has a start state.
    Entering,
    Visible,
    Closing,
}

impl PopupPhase {
    pub fn on_animation_frame(self) -> Self {
        match self {
            Self::Entering => Self::Visible,
            other => other,
        }
    }

    pub fn on_close_requested(self) -> Self {
        Self::Closing
    }

    pub fn is_shown(self) -> bool {
        matches!(self, Self::Visible)
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Entering => "is-entering",
            Self::Visible => "is-visible",
            Self::Closing => "is-closing",
        }
    }
}

/// The page picker as its owner tracks it. Every open gets a fresh
/// generation, so reopening during a fade-out mounts a new popup instead of
/// reviving the one that is closing.
#[derive(Clone, PartialEq, Debug)]
pub struct OpenPopup {
    pub pages: Vec<u32>,
    pub anchor: Anchor,
    pub closing: bool,
    pub generation: u32,
}

impl OpenPopup {
    pub fn open(previous: Option<&Self>, pages: Vec<u32>, anchor: Anchor) -> Self {
        Self {
            pages,
            anchor,
            closing: false,
            generation: previous.map_or(0, |open| open.generation.wrapping_add(1)),
        }
    }

    pub fn request_close(&self) -> Self {
        Self {
            closing: true,
            ..self.clone()
        }
    }
}
