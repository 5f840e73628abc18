//! Screen regions and their form ids.
//!
//! A full-screen editor is stacked vertically from named regions:
//!
//! ```text
//! row 0                 ┌──────────────────────────┐
//!                       │ header   (form 0)        │
//! header.height         ├──────────────────────────┤
//!                       │ body     (form 1)        │
//! header + body height  ├──────────────────────────┤
//!                       │ footer   (form 2, 3 or 4)│
//!                       └──────────────────────────┘
//! ```
//!
//! Exactly one footer variant is visible at a time. Which one follows from
//! the editor mode (see [`EditorMode::footer`](crate::mode::EditorMode::footer)).
//! The help region (form 50) overlays the body.

use std::fmt;

use serde::Deserialize;

/// Identifies which region's input a submission came from.
pub type FormId = u32;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A named area of the session's screen.
///
/// The order of the variants is the paint order of the stacked regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Header,
    Body,
    FooterEdit,
    FooterEditMenu,
    FooterView,
    Help,
}

impl Region {
    /// Every region, in paint order.
    pub const ALL: [Self; 6] = [
        Self::Header,
        Self::Body,
        Self::FooterEdit,
        Self::FooterEditMenu,
        Self::FooterView,
        Self::Help,
    ];

    /// The form id submissions from this region carry.
    #[must_use]
    pub const fn form_id(self) -> FormId {
        match self {
            Self::Header => 0,
            Self::Body => 1,
            Self::FooterEdit => 2,
            Self::FooterEditMenu => 3,
            Self::FooterView => 4,
            Self::Help => 50,
        }
    }

    /// Reverse of [`form_id`](Self::form_id).
    #[must_use]
    pub const fn from_form_id(form_id: FormId) -> Option<Self> {
        match form_id {
            0 => Some(Self::Header),
            1 => Some(Self::Body),
            2 => Some(Self::FooterEdit),
            3 => Some(Self::FooterEditMenu),
            4 => Some(Self::FooterView),
            50 => Some(Self::Help),
            _ => None,
        }
    }

    /// The region's name as themes and logs spell it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
            Self::FooterEdit => "footerEdit",
            Self::FooterEditMenu => "footerEditMenu",
            Self::FooterView => "footerView",
            Self::Help => "help",
        }
    }

    /// Reverse of [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// True for the three footer variants.
    #[inline]
    #[must_use]
    pub const fn is_footer(self) -> bool {
        matches!(
            self,
            Self::FooterEdit | Self::FooterEditMenu | Self::FooterView
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Screen row (0-indexed) of the footer, given the painted header and body
/// heights.
#[must_use]
pub const fn footer_row(header_height: u16, body_height: u16) -> u16 {
    header_height.saturating_add(body_height)
}

/// Painted heights of the stacked regions, filled in as regions are painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub header: u16,
    pub body: u16,
    /// Height of the footer currently on screen.
    pub footer: u16,
}

impl Layout {
    /// The row a region starts on.
    #[must_use]
    pub const fn row_of(&self, region: Region) -> u16 {
        match region {
            Region::Header => 0,
            Region::Body | Region::Help => self.header,
            Region::FooterEdit | Region::FooterEditMenu | Region::FooterView => {
                footer_row(self.header, self.body)
            }
        }
    }

    /// Rows a region occupies on screen right now.
    ///
    /// Footers share one slot, so every footer reports the visible one's
    /// height. Help covers the body.
    #[must_use]
    pub const fn height_of(&self, region: Region) -> u16 {
        match region {
            Region::Header => self.header,
            Region::Body | Region::Help => self.body,
            Region::FooterEdit | Region::FooterEditMenu | Region::FooterView => self.footer,
        }
    }

    /// Record a painted height.
    pub const fn record(&mut self, region: Region, height: u16) {
        match region {
            Region::Header => self.header = height,
            Region::Body => self.body = height,
            Region::FooterEdit | Region::FooterEditMenu | Region::FooterView => {
                self.footer = height;
            }
            Region::Help => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
