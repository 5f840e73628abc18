//! Editor modes.
//!
//! The full-screen editor is always in exactly one [`EditorMode`]:
//!
//! | Mode       | Footer           | Body          | Escape on body / menu |
//! |------------|------------------|---------------|-----------------------|
//! | `View`     | `footerView`     | read-only     | ignored               |
//! | `Edit`     | `footerEdit`     | focused       | → `EditMenu`          |
//! | `EditMenu` | `footerEditMenu` | disabled      | → `Edit`              |

use std::fmt;

use crate::region::Region;

/// The current editor mode.
///
/// Like the region enum this is pure data. Transitions are carried out by
/// the editor, which repaints the footer and moves focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorMode {
    /// Message display. Content is read-only and the mode never toggles.
    View,
    /// Typing into the body.
    #[default]
    Edit,
    /// The edit menu footer owns focus (save, abort, quote...).
    EditMenu,
}

impl EditorMode {
    /// Name used in logs and footer region names.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::EditMenu => "editMenu",
        }
    }

    /// The footer region shown in this mode.
    #[must_use]
    pub const fn footer(self) -> Region {
        match self {
            Self::View => Region::FooterView,
            Self::Edit => Region::FooterEdit,
            Self::EditMenu => Region::FooterEditMenu,
        }
    }

    /// The mode an escape toggles to, or `None` when the mode doesn't toggle.
    #[must_use]
    pub const fn toggled(self) -> Option<Self> {
        match self {
            Self::View => None,
            Self::Edit => Some(Self::EditMenu),
            Self::EditMenu => Some(Self::Edit),
        }
    }

    /// True if body content may be changed.
    #[inline]
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::View)
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
